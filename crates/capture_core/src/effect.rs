use crate::{AttemptId, RequestId, SubmissionAttempt};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Release any held stream, then request a new one.
    AcquireCamera { request: RequestId },
    AcquireLocation,
    /// Bind the stream produced by `request` to the viewfinder.
    ActivateCamera { request: RequestId },
    /// Stop the stream produced by a superseded request.
    DiscardCamera { request: RequestId },
    /// Grab the current frame, encode it, release the stream, then report
    /// `Msg::FrameCaptured`.
    GrabFrame { request: RequestId },
    ReleaseCamera,
    Submit { attempt: SubmissionAttempt },
    /// Report `Msg::CompletionElapsed` after the post-success delay.
    ScheduleCompletion { attempt: AttemptId },
    /// Cancel pending acquisitions and timers.
    CancelPending,
    NavigateBack,
}
