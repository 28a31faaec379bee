use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A one-shot action that runs after a delay unless cancelled first.
///
/// The task is a child of `parent`, so cancelling the workflow scope also
/// suppresses it.
#[derive(Debug)]
pub struct DelayedTask {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl DelayedTask {
    pub fn spawn<F>(delay: Duration, parent: &CancellationToken, action: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let token = parent.child_token();
        let guard = token.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = guard.cancelled() => {}
                _ = tokio::time::sleep(delay) => action(),
            }
        });
        Self { token, handle }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Runs `work` until it completes or the scope is cancelled.
pub(crate) fn spawn_scoped<F>(scope: &CancellationToken, work: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    let token = scope.child_token();
    tokio::spawn(async move {
        tokio::select! {
            biased;
            _ = token.cancelled() => {}
            _ = work => {}
        }
    });
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use tokio_util::sync::CancellationToken;

    use super::DelayedTask;

    #[tokio::test(start_paused = true)]
    async fn fires_once_after_delay() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let task = DelayedTask::spawn(Duration::from_secs(2), &CancellationToken::new(), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(task.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_parent_suppresses_action() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let scope = CancellationToken::new();
        let task = DelayedTask::spawn(Duration::from_secs(2), &scope, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        scope.cancel();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(task.is_cancelled());
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
