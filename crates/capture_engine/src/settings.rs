use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::{CameraConstraints, Facing, FallbackLocation, FrameSize};

/// Produces RFC 3339 timestamps for submission envelopes.
pub type Clock = Arc<dyn Fn() -> String + Send + Sync>;

#[derive(Clone)]
pub struct WorkflowSettings {
    pub facing: Facing,
    pub target_size: FrameSize,
    /// Used when the stream has not reported its dimensions yet.
    pub default_frame_size: FrameSize,
    pub jpeg_quality: u8,
    /// Simulated transport latency.
    pub processing_delay: Duration,
    /// Time the confirmation stays up before navigating back.
    pub completion_delay: Duration,
    pub location_timeout: Duration,
    pub fallback: FallbackLocation,
    pub clock: Clock,
}

impl WorkflowSettings {
    pub fn camera_constraints(&self) -> CameraConstraints {
        CameraConstraints {
            facing: self.facing,
            target: self.target_size,
        }
    }
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            facing: Facing::Rear,
            target_size: FrameSize::new(1280, 720),
            default_frame_size: FrameSize::new(640, 480),
            jpeg_quality: 90,
            processing_delay: Duration::from_secs(2),
            completion_delay: Duration::from_secs(2),
            location_timeout: Duration::from_secs(10),
            fallback: FallbackLocation::default(),
            clock: Arc::new(|| "1970-01-01T00:00:00Z".to_string()),
        }
    }
}

impl fmt::Debug for WorkflowSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkflowSettings")
            .field("facing", &self.facing)
            .field("target_size", &self.target_size)
            .field("default_frame_size", &self.default_frame_size)
            .field("jpeg_quality", &self.jpeg_quality)
            .field("processing_delay", &self.processing_delay)
            .field("completion_delay", &self.completion_delay)
            .field("location_timeout", &self.location_timeout)
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}
