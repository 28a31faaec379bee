use std::fmt;

use crate::{CapturedImage, LocationFix};

pub type AttemptId = u64;

/// One send of a captured image. The location is snapshotted at send time so
/// later location updates never reach an attempt already in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionAttempt {
    pub id: AttemptId,
    pub image: CapturedImage,
    pub location: LocationFix,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionFailure {
    pub reason: String,
}

impl SubmissionFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SubmissionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Submission {
    #[default]
    Idle,
    InFlight(SubmissionAttempt),
    /// The last attempt failed; the image is kept and a new send is allowed.
    Failed {
        attempt: AttemptId,
        failure: SubmissionFailure,
    },
    /// Terminal.
    Succeeded(SubmissionAttempt),
}

impl Submission {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Submission::InFlight(_))
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, Submission::Succeeded(_))
    }

    /// Whether `send` and `retake` are currently accepted.
    pub fn accepts_user_action(&self) -> bool {
        matches!(self, Submission::Idle | Submission::Failed { .. })
    }
}
