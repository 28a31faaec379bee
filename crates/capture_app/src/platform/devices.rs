//! Synthetic devices for running the workflow without hardware.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use capture_core::RequestId;
use capture_engine::{
    Camera, CameraConstraints, CameraError, CameraStream, FilePicker, FrameSize, Geolocator,
    LocationError, Position, SimulatedTransport, SubmissionError, SubmissionRequest,
    SubmissionTransport, VideoSink,
};
use capture_logging::{capture_info, capture_warn};
use image::{Rgb, RgbImage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LocationMode {
    Granted,
    Denied,
    /// No geolocation capability at all.
    Unsupported,
    /// The device never answers.
    Silent,
}

/// Camera producing gradient frames at the requested resolution.
pub struct SyntheticCamera {
    denied: bool,
}

impl SyntheticCamera {
    pub fn new(denied: bool) -> Self {
        Self { denied }
    }
}

#[async_trait::async_trait]
impl Camera for SyntheticCamera {
    async fn request(
        &self,
        constraints: CameraConstraints,
    ) -> Result<Box<dyn CameraStream>, CameraError> {
        if self.denied {
            return Err(CameraError::Denied);
        }
        Ok(Box::new(SyntheticStream {
            size: constraints.target,
            frames: 0,
            stopped: false,
        }))
    }
}

struct SyntheticStream {
    size: FrameSize,
    frames: u32,
    stopped: bool,
}

impl CameraStream for SyntheticStream {
    fn video_size(&self) -> Option<FrameSize> {
        Some(self.size)
    }

    fn grab_frame(&mut self, size: FrameSize) -> Result<RgbImage, CameraError> {
        if self.stopped {
            return Err(CameraError::Device("stream stopped".to_string()));
        }
        self.frames += 1;
        let shade = (self.frames * 40 % 256) as u8;
        Ok(gradient(size, shade))
    }

    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            capture_info!("synthetic camera stopped after {} frames", self.frames);
        }
    }
}

fn gradient(size: FrameSize, shade: u8) -> RgbImage {
    let width = size.width.max(1);
    let height = size.height.max(1);
    RgbImage::from_fn(size.width, size.height, |x, y| {
        Rgb([
            (x * 255 / width) as u8,
            (y * 255 / height) as u8,
            shade,
        ])
    })
}

/// Geolocation device behaving according to a [`LocationMode`].
pub struct ScriptedGeolocator {
    mode: LocationMode,
    position: Position,
}

impl ScriptedGeolocator {
    /// `None` for [`LocationMode::Unsupported`], which has no device.
    pub fn for_mode(mode: LocationMode, position: Position) -> Option<Self> {
        match mode {
            LocationMode::Unsupported => None,
            _ => Some(Self { mode, position }),
        }
    }
}

#[async_trait::async_trait]
impl Geolocator for ScriptedGeolocator {
    async fn current_position(&self) -> Result<Position, LocationError> {
        match self.mode {
            LocationMode::Granted => Ok(self.position),
            LocationMode::Denied => Err(LocationError::Denied),
            LocationMode::Unsupported => Err(LocationError::Unsupported),
            LocationMode::Silent => std::future::pending().await,
        }
    }
}

/// Picker that "selects" a fixed path, or cancels when none is configured.
pub struct PathPicker {
    path: Option<PathBuf>,
}

impl PathPicker {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

#[async_trait::async_trait]
impl FilePicker for PathPicker {
    async fn pick(&self) -> Option<Vec<u8>> {
        let path = self.path.as_ref()?;
        match tokio::fs::read(path).await {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                capture_warn!("could not read {:?}: {}", path, err);
                None
            }
        }
    }
}

/// Simulated transport that rejects its first submission when asked to.
pub struct FlakyTransport {
    inner: SimulatedTransport,
    fail_next: AtomicBool,
}

impl FlakyTransport {
    pub fn new(inner: SimulatedTransport, fail_first: bool) -> Self {
        Self {
            inner,
            fail_next: AtomicBool::new(fail_first),
        }
    }
}

#[async_trait::async_trait]
impl SubmissionTransport for FlakyTransport {
    async fn submit(&self, request: SubmissionRequest) -> Result<(), SubmissionError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(SubmissionError::Transport(
                "connection reset by peer".to_string(),
            ));
        }
        self.inner.submit(request).await
    }
}

/// Viewfinder that only logs what it would show.
pub struct LoggingSink;

impl VideoSink for LoggingSink {
    fn attach(&self, request: RequestId, size: Option<FrameSize>) {
        match size {
            Some(size) => capture_info!(
                "viewfinder showing stream {} at {}x{}",
                request,
                size.width,
                size.height
            ),
            None => capture_info!("viewfinder showing stream {}", request),
        }
    }

    fn detach(&self, request: RequestId) {
        capture_info!("viewfinder cleared stream {}", request);
    }
}
