use crate::view_model::{self, WorkflowViewModel};
use crate::{
    AttemptId, CameraFailure, CameraStatus, CaptureState, CapturedImage, LocationFix, RequestId,
    Submission, SubmissionAttempt, SubmissionFailure,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Idle,
    Mounted,
    /// Navigated away or unmounted. Terminal.
    Closed,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkflowState {
    lifecycle: Lifecycle,
    camera: CameraStatus,
    location: LocationFix,
    capture: CaptureState,
    last_request: RequestId,
    last_attempt: AttemptId,
    dirty: bool,
}

impl WorkflowState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> WorkflowViewModel {
        view_model::select(self)
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_closed(&self) -> bool {
        self.lifecycle == Lifecycle::Closed
    }

    pub fn camera(&self) -> &CameraStatus {
        &self.camera
    }

    pub fn location(&self) -> &LocationFix {
        &self.location
    }

    pub fn capture(&self) -> &CaptureState {
        &self.capture
    }

    pub fn captured_image(&self) -> Option<&CapturedImage> {
        self.capture.image()
    }

    pub fn submission(&self) -> Option<&Submission> {
        self.capture.submission()
    }

    /// Returns whether anything changed since the last call, clearing the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn mount(&mut self) -> RequestId {
        self.lifecycle = Lifecycle::Mounted;
        self.location = LocationFix::Requesting;
        self.mark_dirty();
        self.request_camera()
    }

    pub(crate) fn close(&mut self) {
        self.lifecycle = Lifecycle::Closed;
        if !self.camera.is_unavailable() {
            self.camera = CameraStatus::Released;
        }
        self.mark_dirty();
    }

    pub(crate) fn request_camera(&mut self) -> RequestId {
        self.last_request += 1;
        self.camera = CameraStatus::Requesting {
            request: self.last_request,
        };
        self.mark_dirty();
        self.last_request
    }

    /// True when `request` is the acquisition the workflow is still waiting on.
    pub(crate) fn is_awaited_request(&self, request: RequestId) -> bool {
        self.camera == CameraStatus::Requesting { request }
    }

    pub(crate) fn activate_camera(&mut self, request: RequestId) {
        self.camera = CameraStatus::Active { request };
        self.mark_dirty();
    }

    pub(crate) fn camera_failed(&mut self, failure: CameraFailure) {
        self.camera = CameraStatus::Unavailable(failure);
        if self.capture == CaptureState::Live {
            self.capture = CaptureState::Degraded;
        }
        self.mark_dirty();
    }

    /// Marks a held or pending stream as released. Unavailable stays unavailable.
    pub(crate) fn release_camera(&mut self) {
        if !self.camera.is_unavailable() {
            self.camera = CameraStatus::Released;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_location(&mut self, fix: LocationFix) {
        self.location = fix;
        self.mark_dirty();
    }

    pub(crate) fn set_captured(&mut self, image: CapturedImage) {
        self.capture = CaptureState::Captured {
            image,
            submission: Submission::Idle,
        };
        self.mark_dirty();
    }

    /// Drops the captured image and returns to the live or degraded branch.
    pub(crate) fn discard_capture(&mut self) {
        self.capture = if self.camera.is_unavailable() {
            CaptureState::Degraded
        } else {
            CaptureState::Live
        };
        self.mark_dirty();
    }

    /// Starts a new attempt from the captured image and current location.
    pub(crate) fn begin_attempt(&mut self) -> Option<SubmissionAttempt> {
        let location = self.location.clone();
        let CaptureState::Captured { image, submission } = &mut self.capture else {
            return None;
        };
        if !submission.accepts_user_action() {
            return None;
        }
        self.last_attempt += 1;
        let attempt = SubmissionAttempt {
            id: self.last_attempt,
            image: image.clone(),
            location,
        };
        *submission = Submission::InFlight(attempt.clone());
        self.dirty = true;
        Some(attempt)
    }

    /// Applies a transport outcome. Returns true when the attempt succeeded.
    pub(crate) fn finish_attempt(
        &mut self,
        attempt: AttemptId,
        outcome: Result<(), SubmissionFailure>,
    ) -> Option<bool> {
        let CaptureState::Captured { submission, .. } = &mut self.capture else {
            return None;
        };
        let Submission::InFlight(in_flight) = submission else {
            return None;
        };
        if in_flight.id != attempt {
            return None;
        }
        let sent = in_flight.clone();
        let succeeded = outcome.is_ok();
        *submission = match outcome {
            Ok(()) => Submission::Succeeded(sent),
            Err(failure) => Submission::Failed { attempt, failure },
        };
        self.dirty = true;
        Some(succeeded)
    }

    pub(crate) fn succeeded_attempt(&self) -> Option<AttemptId> {
        match self.capture.submission() {
            Some(Submission::Succeeded(attempt)) => Some(attempt.id),
            _ => None,
        }
    }
}
