//! One-shot timer scheduling port.
//!
//! The aggregator arms one timer per buffered group. Routing that through a
//! trait lets tests drive the aggregation window with a virtual clock instead
//! of real sleeps.

use std::fmt;
use std::time::Duration;

use futures_util::future::BoxFuture;

/// Handle to an armed timer.
///
/// Dropping the handle does not cancel the timer; only [`TimerHandle::cancel`]
/// does. A flush task drops its own group's handle while running.
pub struct TimerHandle {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl TimerHandle {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Prevent the timer's task from running if it has not started yet.
    ///
    /// Calling this more than once is a no-op.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}

/// Arms fire-once timers.
pub trait Scheduler: Send + Sync {
    /// Run `task` once, `delay` from now, unless cancelled first.
    fn schedule(&self, delay: Duration, task: BoxFuture<'static, ()>) -> TimerHandle;
}
