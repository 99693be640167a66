use std::sync::Arc;

use tempo_core::{
    BellAlert, ConfyStore, CountdownTimerEngine, StopwatchEngine, SystemClock, TokioScheduler,
    WorldClockEngine,
};

/// Holds all shared state for the CLI application.
/// This is a lightweight container - logic lives in the engines.
#[derive(Clone)]
pub struct CliContext {
    pub stopwatch: StopwatchEngine,
    pub countdown: CountdownTimerEngine,
    pub world_clock: WorldClockEngine,
}

impl CliContext {
    /// Wire the engines to the system clock, the tokio tick scheduler,
    /// the terminal bell, and on-disk preferences.
    pub fn new() -> Self {
        let clock = Arc::new(SystemClock);
        let scheduler = Arc::new(TokioScheduler);
        Self {
            stopwatch: StopwatchEngine::new(clock.clone(), scheduler.clone()),
            countdown: CountdownTimerEngine::new(
                clock.clone(),
                scheduler.clone(),
                Arc::new(BellAlert),
            ),
            world_clock: WorldClockEngine::new(clock, scheduler, Arc::new(ConfyStore)),
        }
    }
}

impl Default for CliContext {
    fn default() -> Self {
        Self::new()
    }
}
