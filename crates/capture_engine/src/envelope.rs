use std::sync::Arc;

use capture_core::{AttemptId, ImageSource, LocationFix, SubmissionAttempt};
use serde::Serialize;

/// Metadata sent alongside the image payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionEnvelope {
    pub attempt: AttemptId,
    pub content_type: String,
    pub byte_len: usize,
    pub width: u32,
    pub height: u32,
    pub source: &'static str,
    pub location: Option<EnvelopeLocation>,
    pub sent_utc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvelopeLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub label: String,
    /// True when the fix was substituted rather than reported by the device.
    pub approximate: bool,
}

#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    pub envelope: SubmissionEnvelope,
    pub payload: Arc<[u8]>,
}

impl SubmissionRequest {
    pub fn from_attempt(attempt: &SubmissionAttempt, sent_utc: String) -> Self {
        let image = &attempt.image;
        let location = match &attempt.location {
            LocationFix::Resolved {
                coordinates,
                display_name,
                is_approximate,
            } => Some(EnvelopeLocation {
                latitude: coordinates.latitude(),
                longitude: coordinates.longitude(),
                label: display_name.clone(),
                approximate: *is_approximate,
            }),
            LocationFix::Requesting | LocationFix::Unavailable(_) => None,
        };
        let envelope = SubmissionEnvelope {
            attempt: attempt.id,
            content_type: image.content_type().to_string(),
            byte_len: image.len(),
            width: image.width(),
            height: image.height(),
            source: match image.source() {
                ImageSource::Camera => "camera",
                ImageSource::File => "file",
            },
            location,
            sent_utc,
        };
        Self {
            envelope,
            payload: image.shared_payload(),
        }
    }
}

impl SubmissionEnvelope {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
