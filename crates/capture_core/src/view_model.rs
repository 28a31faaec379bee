//! Presentation selection for the capture screen.
//!
//! Each resource picks its live or degraded presentation independently: the
//! camera decides the viewfinder and shutter, the location fix decides the
//! badge.
use crate::{CameraStatus, CaptureState, CapturedImage, LocationFix, Submission, WorkflowState};

/// Shown next to any location label that did not come from the device.
pub const APPROXIMATE_QUALIFIER: &str = "(approximate)";

const HINT_LIVE: &str = "Capture your food donation";
const HINT_DEGRADED: &str = "Camera access not available. You can still select photos from your device.";
const LABEL_NO_LOCATION: &str = "Location unavailable";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Control {
    #[default]
    Hidden,
    Disabled,
    Enabled,
}

impl Control {
    pub fn is_enabled(self) -> bool {
        self == Control::Enabled
    }

    fn enabled_if(condition: bool) -> Self {
        if condition {
            Control::Enabled
        } else {
            Control::Disabled
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Viewfinder {
    /// Waiting for the camera to answer.
    #[default]
    Starting,
    Live,
    /// Camera unavailable; the alternate input is offered instead.
    Unavailable,
    Preview(CapturedImage),
    /// Fixed success screen shown until navigation.
    Confirmation,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationBadge {
    pub label: String,
    pub approximate: bool,
}

impl LocationBadge {
    /// Label as displayed; approximate fixes always carry the qualifier.
    pub fn text(&self) -> String {
        if self.approximate {
            format!("{} {}", self.label, APPROXIMATE_QUALIFIER)
        } else {
            self.label.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkflowViewModel {
    pub viewfinder: Viewfinder,
    pub shutter: Control,
    pub pick_file: Control,
    pub retake: Control,
    pub send: Control,
    pub sending: bool,
    pub location_badge: Option<LocationBadge>,
    pub hint: Option<String>,
    pub notice: Option<String>,
}

pub(crate) fn select(state: &WorkflowState) -> WorkflowViewModel {
    if state.is_closed() {
        return WorkflowViewModel {
            viewfinder: Viewfinder::Closed,
            ..WorkflowViewModel::default()
        };
    }

    let location_badge = badge(state.location());
    match state.capture() {
        CaptureState::Live => {
            let active = state.camera().is_active();
            WorkflowViewModel {
                viewfinder: if active {
                    Viewfinder::Live
                } else {
                    Viewfinder::Starting
                },
                shutter: Control::enabled_if(active),
                pick_file: Control::Enabled,
                location_badge,
                hint: active.then(|| HINT_LIVE.to_string()),
                ..WorkflowViewModel::default()
            }
        }
        CaptureState::Degraded => WorkflowViewModel {
            viewfinder: Viewfinder::Unavailable,
            shutter: Control::Disabled,
            pick_file: Control::Enabled,
            location_badge,
            hint: Some(HINT_DEGRADED.to_string()),
            notice: unavailable_notice(state.camera()),
            ..WorkflowViewModel::default()
        },
        CaptureState::Captured { image, submission } => {
            captured_view(image, submission, location_badge)
        }
    }
}

fn captured_view(
    image: &CapturedImage,
    submission: &Submission,
    location_badge: Option<LocationBadge>,
) -> WorkflowViewModel {
    match submission {
        Submission::Succeeded(_) => WorkflowViewModel {
            viewfinder: Viewfinder::Confirmation,
            ..WorkflowViewModel::default()
        },
        Submission::InFlight(_) => WorkflowViewModel {
            viewfinder: Viewfinder::Preview(image.clone()),
            retake: Control::Disabled,
            send: Control::Disabled,
            sending: true,
            location_badge,
            ..WorkflowViewModel::default()
        },
        Submission::Idle | Submission::Failed { .. } => {
            let hint = match &location_badge {
                Some(badge) if badge.label != LABEL_NO_LOCATION => {
                    format!("Photo will be sent with location: {}", badge.text())
                }
                _ => "Photo will be sent without a location".to_string(),
            };
            let notice = match submission {
                Submission::Failed { failure, .. } => {
                    Some(format!("Sending failed: {failure}. Tap Send to retry."))
                }
                _ => None,
            };
            WorkflowViewModel {
                viewfinder: Viewfinder::Preview(image.clone()),
                retake: Control::Enabled,
                send: Control::Enabled,
                location_badge,
                hint: Some(hint),
                notice,
                ..WorkflowViewModel::default()
            }
        }
    }
}

fn badge(location: &LocationFix) -> Option<LocationBadge> {
    match location {
        LocationFix::Requesting => None,
        LocationFix::Resolved {
            display_name,
            is_approximate,
            ..
        } => Some(LocationBadge {
            label: display_name.clone(),
            approximate: *is_approximate,
        }),
        LocationFix::Unavailable(_) => Some(LocationBadge {
            label: LABEL_NO_LOCATION.to_string(),
            approximate: false,
        }),
    }
}

fn unavailable_notice(camera: &CameraStatus) -> Option<String> {
    match camera {
        CameraStatus::Unavailable(failure) => Some(format!("Camera unavailable: {failure}")),
        _ => None,
    }
}
