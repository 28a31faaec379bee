use crate::{
    AttemptId, CameraFailure, CapturedImage, Coordinates, LocationFailure, RequestId,
    SubmissionFailure,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Workflow screen entered; starts both acquisitions.
    Mounted,
    /// Camera acquisition produced a live stream (held by the engine).
    CameraAcquired { request: RequestId },
    /// Camera acquisition failed.
    CameraFailed {
        request: RequestId,
        failure: CameraFailure,
    },
    /// Device reported a position.
    LocationResolved(Coordinates),
    /// Device position unavailable; a fallback fix was substituted.
    LocationApproximated {
        coordinates: Coordinates,
        place_name: String,
        failure: LocationFailure,
    },
    /// Device position unavailable and no fallback is allowed.
    LocationUnavailable(LocationFailure),
    /// User pressed the shutter.
    ShutterPressed,
    /// Engine grabbed and encoded a frame and released the stream.
    FrameCaptured {
        request: RequestId,
        image: CapturedImage,
    },
    /// Engine could not grab a frame; the stream is still held.
    FrameGrabFailed { request: RequestId, reason: String },
    /// User picked a file that decoded into an image.
    FileSelected(CapturedImage),
    /// User pressed Retake.
    RetakePressed,
    /// User pressed Send.
    SendPressed,
    /// Transport finished an attempt.
    SubmissionFinished {
        attempt: AttemptId,
        outcome: Result<(), SubmissionFailure>,
    },
    /// Post-success delay elapsed.
    CompletionElapsed { attempt: AttemptId },
    /// User explicitly exited.
    BackPressed,
    /// Screen torn down without an explicit exit.
    Unmounted,
}
