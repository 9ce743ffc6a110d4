//! Virtual-clock scheduler for driving aggregation windows in tests.
//!
//! Nothing runs until [`ManualScheduler::advance`] moves the clock; due tasks
//! then run in due-time order on the caller's task.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use parking_lot::Mutex;

use crate::port::{Scheduler, TimerHandle};

struct Armed {
    id: u64,
    due: Duration,
    task: BoxFuture<'static, ()>,
}

#[derive(Default)]
struct Clock {
    now: Duration,
    next_id: u64,
    armed: Vec<Armed>,
}

/// A [`Scheduler`] whose time only moves when told to.
pub struct ManualScheduler {
    clock: Arc<Mutex<Clock>>,
    honor_cancel: bool,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self {
            clock: Arc::new(Mutex::new(Clock::default())),
            honor_cancel: true,
        }
    }

    /// A scheduler whose handles never cancel anything, modelling a timer
    /// that had already fired by the time `cancel()` ran.
    pub fn ignoring_cancellation() -> Self {
        Self {
            honor_cancel: false,
            ..Self::new()
        }
    }

    /// Virtual time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.clock.lock().now
    }

    /// Number of armed timers that have not run yet.
    pub fn pending(&self) -> usize {
        self.clock.lock().armed.len()
    }

    /// Move the clock forward by `by`, running every timer that comes due.
    pub async fn advance(&self, by: Duration) {
        let target = self.now() + by;

        loop {
            let next = {
                let mut clock = self.clock.lock();
                let due = clock
                    .armed
                    .iter()
                    .enumerate()
                    .filter(|(_, armed)| armed.due <= target)
                    .min_by_key(|(_, armed)| (armed.due, armed.id))
                    .map(|(index, _)| index);

                match due {
                    Some(index) => {
                        let armed = clock.armed.remove(index);
                        clock.now = armed.due;
                        Some(armed.task)
                    }
                    None => {
                        clock.now = target;
                        None
                    }
                }
            };

            match next {
                Some(task) => task.await,
                None => break,
            }
        }
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: BoxFuture<'static, ()>) -> TimerHandle {
        let id = {
            let mut clock = self.clock.lock();
            let id = clock.next_id;
            clock.next_id += 1;
            let due = clock.now + delay;
            clock.armed.push(Armed { id, due, task });
            id
        };

        if !self.honor_cancel {
            return TimerHandle::new(|| {});
        }

        let clock = Arc::downgrade(&self.clock);
        TimerHandle::new(move || {
            if let Some(clock) = clock.upgrade() {
                clock.lock().armed.retain(|armed| armed.id != id);
            }
        })
    }
}
