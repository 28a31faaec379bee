use capture_logging::{capture_debug, capture_info, capture_warn};

use crate::{
    format_coordinates, CameraStatus, CaptureState, Effect, Lifecycle, LocationFix, Msg,
    WorkflowState,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: WorkflowState, msg: Msg) -> (WorkflowState, Vec<Effect>) {
    match state.lifecycle() {
        Lifecycle::Closed => {
            // Late stream after teardown still has to be stopped.
            let effects = match msg {
                Msg::CameraAcquired { request } => vec![Effect::DiscardCamera { request }],
                _ => Vec::new(),
            };
            return (state, effects);
        }
        Lifecycle::Idle if !matches!(msg, Msg::Mounted | Msg::Unmounted) => {
            capture_debug!("ignoring {:?} before mount", msg);
            return (state, Vec::new());
        }
        Lifecycle::Idle | Lifecycle::Mounted => {}
    }

    let effects = match msg {
        Msg::Mounted => {
            if state.lifecycle() != Lifecycle::Idle {
                return (state, Vec::new());
            }
            let request = state.mount();
            vec![Effect::AcquireCamera { request }, Effect::AcquireLocation]
        }
        Msg::CameraAcquired { request } => {
            if state.is_awaited_request(request) {
                capture_info!("camera request {} active", request);
                state.activate_camera(request);
                vec![Effect::ActivateCamera { request }]
            } else {
                capture_debug!("discarding stream from superseded request {}", request);
                vec![Effect::DiscardCamera { request }]
            }
        }
        Msg::CameraFailed { request, failure } => {
            if state.is_awaited_request(request) {
                capture_warn!("camera unavailable: {}", failure);
                state.camera_failed(failure);
            }
            Vec::new()
        }
        Msg::LocationResolved(coordinates) => {
            if state.location().is_requesting() {
                state.set_location(LocationFix::Resolved {
                    coordinates,
                    display_name: format_coordinates(coordinates),
                    is_approximate: false,
                });
            }
            Vec::new()
        }
        Msg::LocationApproximated {
            coordinates,
            place_name,
            failure,
        } => {
            if state.location().is_requesting() {
                capture_warn!("location unavailable ({}); using approximate fix", failure);
                state.set_location(LocationFix::Resolved {
                    coordinates,
                    display_name: place_name,
                    is_approximate: true,
                });
            }
            Vec::new()
        }
        Msg::LocationUnavailable(failure) => {
            if state.location().is_requesting() {
                capture_warn!("location unavailable ({}); sending without location", failure);
                state.set_location(LocationFix::Unavailable(failure));
            }
            Vec::new()
        }
        Msg::ShutterPressed => match (state.capture(), state.camera()) {
            (CaptureState::Live, CameraStatus::Active { request }) => {
                vec![Effect::GrabFrame { request: *request }]
            }
            _ => {
                capture_debug!("shutter ignored: camera {:?}", state.camera());
                Vec::new()
            }
        },
        Msg::FrameCaptured { request, image } => {
            let expected = state.camera() == &CameraStatus::Active { request };
            if expected && state.capture() == &CaptureState::Live {
                state.release_camera();
                state.set_captured(image);
            }
            Vec::new()
        }
        Msg::FrameGrabFailed { request, reason } => {
            capture_warn!("frame grab for request {} failed: {}", request, reason);
            Vec::new()
        }
        Msg::FileSelected(image) => {
            if state.capture().is_captured() {
                capture_debug!("file selection ignored: image already captured");
                return (state, Vec::new());
            }
            let held = state.camera().current_request().is_some();
            state.release_camera();
            state.set_captured(image);
            if held {
                vec![Effect::ReleaseCamera]
            } else {
                Vec::new()
            }
        }
        Msg::RetakePressed => {
            let allowed = state
                .submission()
                .is_some_and(|submission| submission.accepts_user_action());
            if !allowed {
                capture_debug!("retake ignored");
                return (state, Vec::new());
            }
            state.discard_capture();
            if state.camera().is_unavailable() {
                Vec::new()
            } else {
                let request = state.request_camera();
                vec![Effect::AcquireCamera { request }]
            }
        }
        Msg::SendPressed => match state.begin_attempt() {
            Some(attempt) => {
                capture_info!("submitting attempt {}", attempt.id);
                vec![Effect::Submit { attempt }]
            }
            None => {
                capture_debug!("send ignored");
                Vec::new()
            }
        },
        Msg::SubmissionFinished { attempt, outcome } => {
            if let Err(failure) = &outcome {
                capture_warn!("attempt {} failed: {}", attempt, failure);
            }
            match state.finish_attempt(attempt, outcome) {
                Some(true) => vec![Effect::ScheduleCompletion { attempt }],
                Some(false) | None => Vec::new(),
            }
        }
        Msg::CompletionElapsed { attempt } => {
            if state.succeeded_attempt() == Some(attempt) {
                state.close();
                vec![Effect::CancelPending, Effect::NavigateBack]
            } else {
                Vec::new()
            }
        }
        Msg::BackPressed => {
            state.close();
            vec![
                Effect::ReleaseCamera,
                Effect::CancelPending,
                Effect::NavigateBack,
            ]
        }
        Msg::Unmounted => {
            state.close();
            vec![Effect::ReleaseCamera, Effect::CancelPending]
        }
    };

    (state, effects)
}
