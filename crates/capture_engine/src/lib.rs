//! Capture engine: device capabilities and effect execution for the
//! capture-and-submit workflow.
mod capability;
mod encode;
mod envelope;
mod locate;
mod resource;
mod settings;
mod task;
mod transport;
mod types;
mod workflow;

pub use capability::{
    Camera, CameraStream, FilePicker, Geolocator, Navigator, NullSink, SubmissionTransport,
    VideoSink,
};
pub use encode::{decode_file, encode_jpeg, grab_still};
pub use envelope::{EnvelopeLocation, SubmissionEnvelope, SubmissionRequest};
pub use locate::{locate, FallbackLocation, FallbackPolicy};
pub use resource::MediaResource;
pub use settings::{Clock, WorkflowSettings};
pub use task::DelayedTask;
pub use transport::SimulatedTransport;
pub use types::{
    CameraConstraints, CameraError, CaptureError, DecodeError, Facing, FrameSize, LocationError,
    Position, SubmissionError,
};
pub use workflow::{Capabilities, Workflow};
