use capture_core::{CameraFailure, LocationFailure, SubmissionFailure};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Rear,
    Front,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraConstraints {
    pub facing: Facing,
    pub target: FrameSize,
}

/// Raw position as reported by a geolocation device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CameraError {
    #[error("camera permission denied")]
    Denied,
    #[error("no camera device")]
    NoDevice,
    #[error("camera capability absent")]
    Unsupported,
    #[error("camera device error: {0}")]
    Device(String),
}

impl CameraError {
    pub fn failure(&self) -> CameraFailure {
        match self {
            CameraError::Denied => CameraFailure::Denied,
            CameraError::NoDevice => CameraFailure::NoDevice,
            CameraError::Unsupported => CameraFailure::Unsupported,
            CameraError::Device(message) => CameraFailure::Device(message.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("location permission denied")]
    Denied,
    #[error("geolocation capability absent")]
    Unsupported,
    #[error("location request timed out")]
    Timeout,
    #[error("no position available")]
    NoSignal,
}

impl LocationError {
    pub fn failure(&self) -> LocationFailure {
        match self {
            LocationError::Denied => LocationFailure::Denied,
            LocationError::Unsupported => LocationFailure::Unsupported,
            LocationError::Timeout => LocationFailure::Timeout,
            LocationError::NoSignal => LocationFailure::NoSignal,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error(transparent)]
    Camera(#[from] CameraError),
    #[error("failed to encode frame: {0}")]
    Encode(#[from] image::ImageError),
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("selected file is empty")]
    Empty,
    #[error("unrecognized image format: {0}")]
    Unrecognized(#[source] image::ImageError),
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("submission rejected: {0}")]
    Rejected(String),
    #[error("transport error: {0}")]
    Transport(String),
}

impl SubmissionError {
    pub fn failure(&self) -> SubmissionFailure {
        SubmissionFailure::new(self.to_string())
    }
}
