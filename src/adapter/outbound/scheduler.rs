//! Tokio-backed timer scheduler.

use std::time::Duration;

use futures_util::future::BoxFuture;

use crate::port::{Scheduler, TimerHandle};

/// Runs each scheduled task on its own tokio task after sleeping.
///
/// Cancelling aborts the task. A task that is already running its body when
/// aborted stops at its next await point.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioScheduler;

impl TokioScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: BoxFuture<'static, ()>) -> TimerHandle {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });
        let abort = handle.abort_handle();
        TimerHandle::new(move || abort.abort())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::FutureExt;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn task_runs_after_delay() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);
        let _handle = TokioScheduler::new().schedule(
            Duration::from_secs(5),
            async move { flag.store(true, Ordering::SeqCst) }.boxed(),
        );

        tokio::time::sleep(Duration::from_millis(4_900)).await;
        assert!(!fired.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(fired.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_run() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);
        let mut handle = TokioScheduler::new().schedule(
            Duration::from_secs(5),
            async move { flag.store(true, Ordering::SeqCst) }.boxed(),
        );

        handle.cancel();
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert!(!fired.load(Ordering::SeqCst));
    }
}
