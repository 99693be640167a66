//! Stopwatch engine: elapsed time across start/pause cycles, with lap
//! capture.
//!
//! Elapsed time is always recomputed from absolute monotonic
//! timestamps (`accumulated + (now - reference_start)`), never by
//! summing tick deltas, so irregular tick delivery cannot drift the
//! reading. Ticks exist purely to republish the display.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::sync::watch;

use crate::clock::MonotonicClock;
use crate::format::format_elapsed;
use crate::scheduler::{TaskHandle, TickScheduler};

/// Nominal render period, roughly one display frame.
const RENDER_TICK: Duration = Duration::from_millis(16);

/// Elapsed value captured by `lap()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LapRecord {
    pub elapsed: Duration,
}

#[derive(Default)]
struct StopwatchState {
    running: bool,
    /// Start of the currently open run interval. `None` while paused.
    reference_start: Option<Instant>,
    /// Sum of all closed run intervals.
    accumulated: Duration,
    /// Newest first.
    laps: Vec<LapRecord>,
    task: Option<TaskHandle>,
}

impl StopwatchState {
    fn elapsed_at(&self, now: Instant) -> Duration {
        match self.reference_start {
            Some(start) => self.accumulated + now.duration_since(start),
            None => self.accumulated,
        }
    }
}

#[derive(Clone)]
pub struct StopwatchEngine {
    state: Arc<Mutex<StopwatchState>>,
    clock: Arc<dyn MonotonicClock>,
    scheduler: Arc<dyn TickScheduler>,
    display: Arc<watch::Sender<String>>,
}

impl StopwatchEngine {
    pub fn new(clock: Arc<dyn MonotonicClock>, scheduler: Arc<dyn TickScheduler>) -> Self {
        let (display, _) = watch::channel(format_elapsed(Duration::ZERO));
        Self {
            state: Arc::new(Mutex::new(StopwatchState::default())),
            clock,
            scheduler,
            display: Arc::new(display),
        }
    }

    /// Latest published display string. Republished on every render
    /// tick and on every state-changing command.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.display.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().unwrap().running
    }

    /// Begin or resume timing. No-op while already running.
    pub fn start(&self) {
        let mut state = self.state.lock().unwrap();
        if state.running {
            return;
        }
        state.running = true;
        state.reference_start = Some(self.clock.now());

        let shared = Arc::clone(&self.state);
        let clock = Arc::clone(&self.clock);
        let display = Arc::clone(&self.display);
        let handle = self.scheduler.schedule_repeating(
            RENDER_TICK,
            Box::new(move || {
                let state = shared.lock().unwrap();
                if !state.running {
                    // Raced a pause/reset; the cancel wins.
                    return;
                }
                display.send_replace(format_elapsed(state.elapsed_at(clock.now())));
            }),
        );
        state.task = Some(handle);
    }

    /// Fold the open interval into the accumulator and stop ticking.
    /// Publishes the same value a tick at this instant would have.
    pub fn pause(&self) {
        let mut state = self.state.lock().unwrap();
        if !state.running {
            return;
        }
        state.accumulated = state.elapsed_at(self.clock.now());
        state.reference_start = None;
        state.running = false;
        if let Some(task) = state.task.take() {
            task.cancel();
        }
        self.display.send_replace(format_elapsed(state.accumulated));
    }

    /// Return to idle: zero elapsed, no laps.
    pub fn reset(&self) {
        let mut state = self.state.lock().unwrap();
        if let Some(task) = state.task.take() {
            task.cancel();
        }
        *state = StopwatchState::default();
        self.display.send_replace(format_elapsed(Duration::ZERO));
    }

    /// Capture the current elapsed value without disturbing the
    /// running state. Works while paused too.
    pub fn lap(&self) -> LapRecord {
        let mut state = self.state.lock().unwrap();
        let record = LapRecord {
            elapsed: state.elapsed_at(self.clock.now()),
        };
        state.laps.insert(0, record);
        record
    }

    /// Captured laps, newest first.
    pub fn laps(&self) -> Vec<LapRecord> {
        self.state.lock().unwrap().laps.clone()
    }

    pub fn current_elapsed(&self) -> Duration {
        let state = self.state.lock().unwrap();
        state.elapsed_at(self.clock.now())
    }
}
