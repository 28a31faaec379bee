use std::sync::Arc;

use capture_core::{
    update, AttemptId, CameraStatus, Effect, Msg, RequestId, SubmissionAttempt, WorkflowState,
    WorkflowViewModel,
};
use capture_logging::{capture_debug, capture_info, capture_warn};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::task::spawn_scoped;
use crate::{
    decode_file, grab_still, locate, Camera, CameraError, DecodeError, DelayedTask, FilePicker,
    Geolocator, MediaResource, Navigator, SubmissionError, SubmissionRequest,
    SubmissionTransport, VideoSink, WorkflowSettings,
};

/// Device capabilities and collaborators injected into a workflow.
#[derive(Clone)]
pub struct Capabilities {
    pub camera: Arc<dyn Camera>,
    /// `None` when the device has no geolocation capability at all.
    pub geolocation: Option<Arc<dyn Geolocator>>,
    pub picker: Arc<dyn FilePicker>,
    pub transport: Arc<dyn SubmissionTransport>,
    pub navigator: Arc<dyn Navigator>,
    pub viewfinder: Arc<dyn VideoSink>,
}

enum EngineEvent {
    CameraReady(MediaResource),
    CameraFailed {
        request: RequestId,
        error: CameraError,
    },
    Location(Msg),
    SubmissionFinished {
        attempt: AttemptId,
        outcome: Result<(), SubmissionError>,
    },
    CompletionElapsed {
        attempt: AttemptId,
    },
}

/// One instance of the capture-and-submit screen.
///
/// Runs effects from [`capture_core::update`] on the current tokio runtime and
/// owns the live camera stream. Background work reports back through a
/// channel drained by [`Workflow::next_event`]; all state changes happen on
/// the caller's task. Must be created inside a tokio runtime.
pub struct Workflow {
    state: WorkflowState,
    caps: Capabilities,
    settings: WorkflowSettings,
    camera: Option<MediaResource>,
    arrived: Option<MediaResource>,
    scope: CancellationToken,
    completion: Option<DelayedTask>,
    event_tx: mpsc::UnboundedSender<EngineEvent>,
    event_rx: mpsc::UnboundedReceiver<EngineEvent>,
}

impl Workflow {
    pub fn new(caps: Capabilities, settings: WorkflowSettings) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            state: WorkflowState::new(),
            caps,
            settings,
            camera: None,
            arrived: None,
            scope: CancellationToken::new(),
            completion: None,
            event_tx,
            event_rx,
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn view(&self) -> WorkflowViewModel {
        self.state.view()
    }

    pub fn consume_dirty(&mut self) -> bool {
        self.state.consume_dirty()
    }

    /// True while a live stream is held.
    pub fn holds_camera(&self) -> bool {
        self.camera.is_some()
    }

    /// Starts camera and location acquisition concurrently.
    pub fn mount(&mut self) {
        self.dispatch(Msg::Mounted);
    }

    /// Shutter press. Ignored unless the camera is live.
    pub fn capture(&mut self) {
        self.dispatch(Msg::ShutterPressed);
    }

    /// Decodes a chosen file and makes it the captured image.
    ///
    /// Returns `Ok(false)` without decoding when the screen does not offer
    /// file selection (image already captured, or closed).
    pub fn select_file(&mut self, payload: &[u8]) -> Result<bool, DecodeError> {
        if !self.view().pick_file.is_enabled() {
            capture_debug!("file selection not offered; ignoring payload");
            return Ok(false);
        }
        let image = decode_file(payload)?;
        self.dispatch(Msg::FileSelected(image));
        Ok(true)
    }

    /// Opens the picker. Returns whether an image was selected.
    pub async fn pick_file(&mut self) -> Result<bool, DecodeError> {
        if !self.view().pick_file.is_enabled() {
            return Ok(false);
        }
        match self.caps.picker.pick().await {
            Some(payload) => self.select_file(&payload),
            None => {
                capture_debug!("file picker cancelled");
                Ok(false)
            }
        }
    }

    pub fn retake(&mut self) {
        self.dispatch(Msg::RetakePressed);
    }

    pub fn send(&mut self) {
        self.dispatch(Msg::SendPressed);
    }

    /// Explicit exit: releases everything and notifies the navigator.
    pub fn back(&mut self) {
        self.dispatch(Msg::BackPressed);
    }

    /// Waits for one background result and applies it.
    ///
    /// Returns `false` once the workflow is closed. Only await this while
    /// something is pending, otherwise it waits for user input forever.
    pub async fn next_event(&mut self) -> bool {
        if self.state.is_closed() {
            return false;
        }
        match self.event_rx.recv().await {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    /// Applies every result that is already available without waiting.
    pub fn drain_ready(&mut self) -> usize {
        let mut handled = 0;
        while !self.state.is_closed() {
            let Ok(event) = self.event_rx.try_recv() else {
                break;
            };
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Waits until neither the camera nor the location is still requesting.
    pub async fn settle_acquisition(&mut self) {
        while matches!(self.state.camera(), CameraStatus::Requesting { .. })
            || self.state.location().is_requesting()
        {
            if !self.next_event().await {
                break;
            }
        }
    }

    /// Processes background results until the workflow closes.
    pub async fn run_until_closed(&mut self) {
        while self.next_event().await {}
    }

    fn handle_event(&mut self, event: EngineEvent) {
        let msg = match event {
            EngineEvent::CameraReady(resource) => {
                let request = resource.request();
                self.arrived = Some(resource);
                Msg::CameraAcquired { request }
            }
            EngineEvent::CameraFailed { request, error } => Msg::CameraFailed {
                request,
                failure: error.failure(),
            },
            EngineEvent::Location(msg) => msg,
            EngineEvent::SubmissionFinished { attempt, outcome } => Msg::SubmissionFinished {
                attempt,
                outcome: outcome.map_err(|err| err.failure()),
            },
            EngineEvent::CompletionElapsed { attempt } => Msg::CompletionElapsed { attempt },
        };
        self.dispatch(msg);
        // A stream nobody claimed must not outlive this event.
        if let Some(unclaimed) = self.arrived.take() {
            unclaimed.release();
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        for effect in effects {
            self.run_effect(effect);
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::AcquireCamera { request } => self.acquire_camera(request),
            Effect::AcquireLocation => self.acquire_location(),
            Effect::ActivateCamera { request } => self.activate_camera(request),
            Effect::DiscardCamera { request } => {
                if let Some(resource) = self.arrived.take() {
                    capture_debug!(
                        "discarding stream {} (asked for {})",
                        resource.request(),
                        request
                    );
                    resource.release();
                }
            }
            Effect::GrabFrame { request } => self.grab_frame(request),
            Effect::ReleaseCamera => self.release_camera(),
            Effect::Submit { attempt } => self.submit(attempt),
            Effect::ScheduleCompletion { attempt } => {
                let tx = self.event_tx.clone();
                self.completion = Some(DelayedTask::spawn(
                    self.settings.completion_delay,
                    &self.scope,
                    move || {
                        let _ = tx.send(EngineEvent::CompletionElapsed { attempt });
                    },
                ));
            }
            Effect::CancelPending => {
                self.scope.cancel();
                if let Some(task) = self.completion.take() {
                    task.cancel();
                }
                self.discard_queued_events();
            }
            Effect::NavigateBack => {
                capture_info!("workflow complete; navigating back");
                self.caps.navigator.on_back();
            }
        }
    }

    fn acquire_camera(&mut self, request: RequestId) {
        // At most one live stream per workflow.
        self.release_camera();
        let camera = Arc::clone(&self.caps.camera);
        let constraints = self.settings.camera_constraints();
        let tx = self.event_tx.clone();
        capture_info!(
            "requesting camera {} ({:?} {}x{})",
            request,
            constraints.facing,
            constraints.target.width,
            constraints.target.height
        );
        spawn_scoped(&self.scope, async move {
            let event = match camera.request(constraints).await {
                Ok(stream) => EngineEvent::CameraReady(MediaResource::new(request, stream)),
                Err(error) => EngineEvent::CameraFailed { request, error },
            };
            // If the workflow is gone the event is dropped, which stops the stream.
            let _ = tx.send(event);
        });
    }

    fn acquire_location(&mut self) {
        let geolocator = self.caps.geolocation.clone();
        let timeout = self.settings.location_timeout;
        let fallback = self.settings.fallback.clone();
        let tx = self.event_tx.clone();
        spawn_scoped(&self.scope, async move {
            let located = locate(geolocator.as_deref(), timeout).await;
            let msg = match located {
                Ok(coordinates) => {
                    capture_info!(
                        "location resolved to {}, {}",
                        coordinates.latitude(),
                        coordinates.longitude()
                    );
                    Msg::LocationResolved(coordinates)
                }
                Err(failure) => fallback.resolve(failure, &mut rand::thread_rng()),
            };
            let _ = tx.send(EngineEvent::Location(msg));
        });
    }

    fn activate_camera(&mut self, request: RequestId) {
        match self.arrived.take() {
            Some(mut resource) if resource.request() == request => {
                self.release_camera();
                resource.attach(Arc::clone(&self.caps.viewfinder));
                self.camera = Some(resource);
            }
            other => {
                capture_warn!("no arrived stream for request {}", request);
                self.arrived = other;
            }
        }
    }

    fn grab_frame(&mut self, request: RequestId) {
        let mut resource = match self.camera.take() {
            Some(resource) if resource.request() == request => resource,
            other => {
                self.camera = other;
                capture_warn!("no live stream for request {}", request);
                return;
            }
        };
        match grab_still(&mut resource, &self.settings) {
            Ok(image) => {
                // Stream is stopped before the image becomes visible.
                resource.release();
                capture_info!(
                    "captured {}x{} still ({} bytes)",
                    image.width(),
                    image.height(),
                    image.len()
                );
                self.dispatch(Msg::FrameCaptured { request, image });
            }
            Err(err) => {
                self.camera = Some(resource);
                self.dispatch(Msg::FrameGrabFailed {
                    request,
                    reason: err.to_string(),
                });
            }
        }
    }

    /// Closes the event channel and drops everything still queued in it.
    ///
    /// A stream granted before teardown but not yet handled is stopped here;
    /// anything sent afterwards is dropped at the sender.
    fn discard_queued_events(&mut self) {
        self.event_rx.close();
        while let Ok(event) = self.event_rx.try_recv() {
            if let EngineEvent::CameraReady(resource) = event {
                capture_debug!("stopping queued stream {}", resource.request());
                resource.release();
            }
        }
        if let Some(unclaimed) = self.arrived.take() {
            unclaimed.release();
        }
    }

    fn release_camera(&mut self) {
        if let Some(resource) = self.camera.take() {
            resource.release();
        }
    }

    fn submit(&mut self, attempt: SubmissionAttempt) {
        let request = SubmissionRequest::from_attempt(&attempt, (self.settings.clock)());
        let transport = Arc::clone(&self.caps.transport);
        let tx = self.event_tx.clone();
        let attempt = attempt.id;
        // Not tied to the scope: an attempt in flight runs to completion and
        // the closed state ignores its outcome.
        tokio::spawn(async move {
            let outcome = transport.submit(request).await;
            let _ = tx.send(EngineEvent::SubmissionFinished { attempt, outcome });
        });
    }
}

impl Drop for Workflow {
    fn drop(&mut self) {
        if !self.state.is_closed() {
            self.dispatch(Msg::Unmounted);
        }
        self.release_camera();
    }
}
