//! Periodic tick scheduling.
//!
//! Engines never own a runtime loop themselves. They register a
//! repeating callback with a [`TickScheduler`] and keep the returned
//! [`TaskHandle`] inside their own state. Cancelling the handle is
//! synchronous; engines additionally gate every callback on their own
//! running flag, so a tick that raced a cancel degrades to a no-op
//! instead of reviving dead state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::MissedTickBehavior;

/// A repeating callback registration.
pub type TickFn = Box<dyn FnMut() + Send>;

pub trait TickScheduler: Send + Sync {
    /// Run `tick` every `period` until the handle is cancelled. The
    /// first invocation fires immediately.
    fn schedule_repeating(&self, period: Duration, tick: TickFn) -> TaskHandle;
}

/// Cancellation handle for a scheduled task.
pub struct TaskHandle {
    cancel: Box<dyn FnOnce() + Send>,
}

impl TaskHandle {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Box::new(cancel),
        }
    }

    /// Stop the task. No tick runs after this returns.
    pub fn cancel(self) {
        (self.cancel)();
    }
}

/// Scheduler backed by spawned tokio tasks. Must be used from within a
/// runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl TickScheduler for TokioScheduler {
    fn schedule_repeating(&self, period: Duration, mut tick: TickFn) -> TaskHandle {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                tick();
            }
        });
        TaskHandle::new(move || handle.abort())
    }
}

/// Test scheduler that collects registrations and fires them on demand.
///
/// Cancellation flips a per-task flag rather than touching the task
/// list, so a callback may cancel its own registration while a
/// `fire_all` sweep is in progress.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    tasks: Arc<Mutex<Vec<ManualTask>>>,
}

struct ManualTask {
    period: Duration,
    tick: TickFn,
    cancelled: Arc<AtomicBool>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every live callback once, pruning cancelled registrations.
    pub fn fire_all(&self) {
        let mut tasks = self.tasks.lock().unwrap();
        tasks.retain(|t| !t.cancelled.load(Ordering::SeqCst));
        for task in tasks.iter_mut() {
            if !task.cancelled.load(Ordering::SeqCst) {
                (task.tick)();
            }
        }
        tasks.retain(|t| !t.cancelled.load(Ordering::SeqCst));
    }

    /// Number of registrations that have not been cancelled.
    pub fn live_tasks(&self) -> usize {
        self.tasks
            .lock()
            .unwrap()
            .iter()
            .filter(|t| !t.cancelled.load(Ordering::SeqCst))
            .count()
    }

    /// Period of the most recently registered live task.
    pub fn last_period(&self) -> Option<Duration> {
        self.tasks
            .lock()
            .unwrap()
            .iter()
            .filter(|t| !t.cancelled.load(Ordering::SeqCst))
            .next_back()
            .map(|t| t.period)
    }
}

impl TickScheduler for ManualScheduler {
    fn schedule_repeating(&self, period: Duration, tick: TickFn) -> TaskHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        self.tasks.lock().unwrap().push(ManualTask {
            period,
            tick,
            cancelled: Arc::clone(&cancelled),
        });
        TaskHandle::new(move || cancelled.store(true, Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn manual_scheduler_stops_firing_after_cancel() {
        let scheduler = ManualScheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&fired);
        let handle = scheduler.schedule_repeating(
            Duration::from_millis(16),
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        scheduler.fire_all();
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        handle.cancel();
        scheduler.fire_all();
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.live_tasks(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_scheduler_ticks_immediately_then_on_period() {
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&fired);
        let handle = TokioScheduler.schedule_repeating(
            Duration::from_millis(250),
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        // Immediate first tick plus one per 250 ms.
        tokio::time::sleep(Duration::from_millis(1_100)).await;
        let seen = fired.load(Ordering::SeqCst);
        assert!(seen >= 5, "expected five ticks by 1.1s, saw {seen}");

        handle.cancel();
        tokio::time::sleep(Duration::from_millis(1)).await;
        let at_cancel = fired.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(
            fired.load(Ordering::SeqCst),
            at_cancel,
            "cancelled task must not tick again"
        );
    }
}
