//! Capture core: pure state machine and view-model helpers for the
//! capture-and-submit workflow.
mod capture;
mod effect;
mod msg;
mod resource;
mod state;
mod submission;
mod update;
mod view_model;

pub use capture::{CaptureState, CapturedImage, ImageSource};
pub use effect::Effect;
pub use msg::Msg;
pub use resource::{
    format_coordinates, CameraFailure, CameraStatus, Coordinates, LocationFailure, LocationFix,
    RequestId,
};
pub use state::{Lifecycle, WorkflowState};
pub use submission::{AttemptId, Submission, SubmissionAttempt, SubmissionFailure};
pub use update::update;
pub use view_model::{
    Control, LocationBadge, Viewfinder, WorkflowViewModel, APPROXIMATE_QUALIFIER,
};
