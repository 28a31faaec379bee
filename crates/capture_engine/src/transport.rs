use std::time::Duration;

use capture_logging::{capture_debug, capture_info};

use crate::{SubmissionError, SubmissionRequest, SubmissionTransport};

/// Stand-in transport: accepts every submission after a fixed delay.
#[derive(Debug, Clone)]
pub struct SimulatedTransport {
    delay: Duration,
}

impl SimulatedTransport {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait::async_trait]
impl SubmissionTransport for SimulatedTransport {
    async fn submit(&self, request: SubmissionRequest) -> Result<(), SubmissionError> {
        let metadata = request
            .envelope
            .to_json()
            .map_err(|err| SubmissionError::Transport(err.to_string()))?;
        capture_debug!("simulated submit {}", metadata);
        tokio::time::sleep(self.delay).await;
        capture_info!(
            "attempt {} accepted ({} bytes)",
            request.envelope.attempt,
            request.payload.len()
        );
        Ok(())
    }
}
