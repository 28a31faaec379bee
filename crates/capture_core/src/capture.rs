use std::sync::Arc;

use crate::Submission;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    Camera,
    File,
}

/// Immutable encoded still. Clones share the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    payload: Arc<[u8]>,
    content_type: String,
    width: u32,
    height: u32,
    source: ImageSource,
}

impl CapturedImage {
    pub fn new(
        payload: impl Into<Arc<[u8]>>,
        content_type: impl Into<String>,
        width: u32,
        height: u32,
        source: ImageSource,
    ) -> Self {
        Self {
            payload: payload.into(),
            content_type: content_type.into(),
            width,
            height,
            source,
        }
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn shared_payload(&self) -> Arc<[u8]> {
        Arc::clone(&self.payload)
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn source(&self) -> ImageSource {
        self.source
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Capture/retake/preview state. The submission lives inside `Captured`, so a
/// send without an image cannot be represented.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CaptureState {
    /// Viewfinder showing (or waiting for) the live camera.
    #[default]
    Live,
    /// Camera unavailable; only a file selection leads to `Captured`.
    Degraded,
    Captured {
        image: CapturedImage,
        submission: Submission,
    },
}

impl CaptureState {
    pub fn image(&self) -> Option<&CapturedImage> {
        match self {
            CaptureState::Captured { image, .. } => Some(image),
            CaptureState::Live | CaptureState::Degraded => None,
        }
    }

    pub fn submission(&self) -> Option<&Submission> {
        match self {
            CaptureState::Captured { submission, .. } => Some(submission),
            CaptureState::Live | CaptureState::Degraded => None,
        }
    }

    pub fn is_captured(&self) -> bool {
        matches!(self, CaptureState::Captured { .. })
    }
}
