//! Device and collaborator capabilities consumed by the workflow.
//!
//! Each capability is a trait so that native backends, the synthetic devices
//! of the demo binary and test fakes can be swapped freely.
use capture_core::RequestId;
use image::RgbImage;

use crate::{
    CameraConstraints, CameraError, FrameSize, LocationError, Position, SubmissionError,
    SubmissionRequest,
};

#[async_trait::async_trait]
pub trait Camera: Send + Sync {
    async fn request(
        &self,
        constraints: CameraConstraints,
    ) -> Result<Box<dyn CameraStream>, CameraError>;
}

/// A live video stream. Owned by exactly one [`crate::MediaResource`].
pub trait CameraStream: Send {
    /// Dimensions the video reports, `None` before the first frame.
    fn video_size(&self) -> Option<FrameSize>;

    /// Draws the current frame into an image of the given size.
    fn grab_frame(&mut self, size: FrameSize) -> Result<RgbImage, CameraError>;

    /// Stops every underlying track. Must be idempotent.
    fn stop(&mut self);
}

/// Renderable surface the live stream is attached to.
pub trait VideoSink: Send + Sync {
    fn attach(&self, request: RequestId, size: Option<FrameSize>);
    fn detach(&self, request: RequestId);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl VideoSink for NullSink {
    fn attach(&self, _request: RequestId, _size: Option<FrameSize>) {}
    fn detach(&self, _request: RequestId) {}
}

#[async_trait::async_trait]
pub trait Geolocator: Send + Sync {
    /// One-shot position request; no watching.
    async fn current_position(&self) -> Result<Position, LocationError>;
}

#[async_trait::async_trait]
pub trait FilePicker: Send + Sync {
    /// Raw encoded payload, or `None` when the user cancelled.
    async fn pick(&self) -> Option<Vec<u8>>;
}

#[async_trait::async_trait]
pub trait SubmissionTransport: Send + Sync {
    async fn submit(&self, request: SubmissionRequest) -> Result<(), SubmissionError>;
}

/// Routing collaborator. Owns all navigation state.
pub trait Navigator: Send + Sync {
    fn on_back(&self);
}

impl<F> Navigator for F
where
    F: Fn() + Send + Sync,
{
    fn on_back(&self) {
        self()
    }
}
