use std::fmt;
use std::sync::Arc;

use capture_core::RequestId;
use capture_logging::capture_debug;
use image::RgbImage;

use crate::{CameraError, CameraStream, FrameSize, VideoSink};

/// Exclusive owner of one live camera stream.
///
/// Dropping the resource detaches it from the viewfinder and stops every
/// track, so no path can leak an active stream.
pub struct MediaResource {
    request: RequestId,
    stream: Box<dyn CameraStream>,
    sink: Option<Arc<dyn VideoSink>>,
}

impl MediaResource {
    pub fn new(request: RequestId, stream: Box<dyn CameraStream>) -> Self {
        Self {
            request,
            stream,
            sink: None,
        }
    }

    pub fn request(&self) -> RequestId {
        self.request
    }

    pub fn is_attached(&self) -> bool {
        self.sink.is_some()
    }

    pub fn attach(&mut self, sink: Arc<dyn VideoSink>) {
        if let Some(previous) = self.sink.take() {
            previous.detach(self.request);
        }
        sink.attach(self.request, self.stream.video_size());
        self.sink = Some(sink);
    }

    pub fn video_size(&self) -> Option<FrameSize> {
        self.stream.video_size()
    }

    pub fn grab_frame(&mut self, size: FrameSize) -> Result<RgbImage, CameraError> {
        self.stream.grab_frame(size)
    }

    /// Stops the stream now.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for MediaResource {
    fn drop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.detach(self.request);
        }
        self.stream.stop();
        capture_debug!("camera stream for request {} stopped", self.request);
    }
}

impl fmt::Debug for MediaResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaResource")
            .field("request", &self.request)
            .field("attached", &self.sink.is_some())
            .finish()
    }
}
