//! Countdown timer engine: duration parsing, drift-free pause/resume,
//! and a one-shot completion alert.
//!
//! Unlike the stopwatch, the countdown advances by per-tick deltas
//! against the monotonic clock. The delta chain breaks at every pause
//! (the next resume re-anchors `last_tick`), so time spent paused can
//! never be deducted from the remaining duration.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::watch;

use crate::alert::AlertService;
use crate::clock::MonotonicClock;
use crate::format::format_remaining;
use crate::scheduler::{TaskHandle, TickScheduler};

/// Nominal count-tick period.
const COUNT_TICK: Duration = Duration::from_millis(250);

/// Rejected duration input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DurationParseError {
    #[error("duration input is empty")]
    Empty,

    #[error("duration input '{input}' has no numeric field")]
    NotNumeric { input: String },

    #[error("duration input '{input}' has more than three fields")]
    TooManyFields { input: String },
}

/// Parse user input as a duration: `M`, `M:S`, or `H:M:S`.
///
/// Fields degrade independently: a non-numeric or missing field counts
/// as zero and negative values clamp to zero, matching the forgiving
/// way the dashboard's input box always behaved. Only input that is
/// empty, has no numeric field at all, or has more than three fields
/// is rejected.
pub fn parse_duration(raw: &str) -> Result<Duration, DurationParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DurationParseError::Empty);
    }
    let fields: Vec<Option<u64>> = raw.split(':').map(parse_field).collect();
    if fields.len() > 3 {
        return Err(DurationParseError::TooManyFields {
            input: raw.to_owned(),
        });
    }
    if fields.iter().all(Option::is_none) {
        return Err(DurationParseError::NotNumeric {
            input: raw.to_owned(),
        });
    }
    let field = |i: usize| fields.get(i).copied().flatten().unwrap_or(0);
    let secs = match fields.len() {
        1 => field(0).saturating_mul(60),
        2 => field(0).saturating_mul(60).saturating_add(field(1)),
        _ => field(0)
            .saturating_mul(3_600)
            .saturating_add(field(1).saturating_mul(60))
            .saturating_add(field(2)),
    };
    Ok(Duration::from_secs(secs))
}

/// Leading-integer parse; negative values clamp to zero.
fn parse_field(field: &str) -> Option<u64> {
    let field = field.trim();
    let (negative, digits) = match field.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, field),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    if negative {
        return Some(0);
    }
    // All digits up to `end`, so the only parse failure is overflow.
    Some(digits[..end].parse().unwrap_or(u64::MAX))
}

#[derive(Default)]
struct CountdownState {
    running: bool,
    completed: bool,
    remaining: Duration,
    /// Anchor for the next tick's delta. `None` while not running.
    last_tick: Option<Instant>,
    /// Raw input staged by `configure`, consulted by an idle `start`.
    pending_input: Option<String>,
    task: Option<TaskHandle>,
}

#[derive(Clone)]
pub struct CountdownTimerEngine {
    state: Arc<Mutex<CountdownState>>,
    clock: Arc<dyn MonotonicClock>,
    scheduler: Arc<dyn TickScheduler>,
    alert: Arc<dyn AlertService>,
    display: Arc<watch::Sender<String>>,
}

impl CountdownTimerEngine {
    pub fn new(
        clock: Arc<dyn MonotonicClock>,
        scheduler: Arc<dyn TickScheduler>,
        alert: Arc<dyn AlertService>,
    ) -> Self {
        let (display, _) = watch::channel(format_remaining(Duration::ZERO));
        Self {
            state: Arc::new(Mutex::new(CountdownState::default())),
            clock,
            scheduler,
            alert,
            display: Arc::new(display),
        }
    }

    /// Latest published display string.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.display.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().unwrap().running
    }

    pub fn is_completed(&self) -> bool {
        self.state.lock().unwrap().completed
    }

    pub fn remaining(&self) -> Duration {
        self.state.lock().unwrap().remaining
    }

    /// Stage input for the next idle `start()`. Staged input is only
    /// consulted while `remaining` is zero; changing the duration of a
    /// paused countdown requires `reset()` first.
    pub fn configure(&self, raw: &str) {
        self.state.lock().unwrap().pending_input = Some(raw.to_owned());
    }

    /// Start a fresh countdown from the staged input, or resume a
    /// paused one. No-op while running, or when idle with no usable
    /// input.
    pub fn start(&self) {
        let mut state = self.state.lock().unwrap();
        if state.running {
            return;
        }
        if state.remaining.is_zero() {
            let Some(raw) = state.pending_input.clone() else {
                tracing::debug!("no countdown input staged");
                return;
            };
            match parse_duration(&raw) {
                Ok(duration) if !duration.is_zero() => {
                    state.remaining = duration;
                }
                Ok(_) => {
                    tracing::debug!(input = %raw, "countdown input parses to zero, not starting");
                    return;
                }
                Err(e) => {
                    tracing::debug!(input = %raw, "rejected countdown input: {e}");
                    return;
                }
            }
        }
        state.running = true;
        state.completed = false;
        state.last_tick = Some(self.clock.now());

        let shared = Arc::clone(&self.state);
        let clock = Arc::clone(&self.clock);
        let alert = Arc::clone(&self.alert);
        let display = Arc::clone(&self.display);
        let handle = self.scheduler.schedule_repeating(
            COUNT_TICK,
            Box::new(move || {
                Self::tick(&shared, clock.as_ref(), alert.as_ref(), &display);
            }),
        );
        state.task = Some(handle);
        self.display.send_replace(format_remaining(state.remaining));
    }

    fn tick(
        shared: &Mutex<CountdownState>,
        clock: &dyn MonotonicClock,
        alert: &dyn AlertService,
        display: &watch::Sender<String>,
    ) {
        let completed_now = {
            let mut state = shared.lock().unwrap();
            if !state.running {
                // Raced a pause/reset; the cancel wins.
                return;
            }
            let now = clock.now();
            let delta = state
                .last_tick
                .map_or(Duration::ZERO, |last| now.duration_since(last));
            state.last_tick = Some(now);
            state.remaining = state.remaining.saturating_sub(delta);
            display.send_replace(format_remaining(state.remaining));

            if state.remaining.is_zero() {
                state.running = false;
                state.completed = true;
                state.last_tick = None;
                if let Some(task) = state.task.take() {
                    task.cancel();
                }
                true
            } else {
                false
            }
        };
        // Fired outside the state lock so a slow cue cannot stall
        // commands. The Running -> Completed transition above happens
        // at most once per cycle, which makes the alert one-shot.
        if completed_now {
            alert.fire();
        }
    }

    /// Freeze the countdown. `remaining` is left exactly as the last
    /// tick computed it.
    pub fn pause(&self) {
        let mut state = self.state.lock().unwrap();
        if !state.running {
            return;
        }
        state.running = false;
        state.last_tick = None;
        if let Some(task) = state.task.take() {
            task.cancel();
        }
        self.display.send_replace(format_remaining(state.remaining));
    }

    /// Return to idle with zero remaining. The next `start()` parses
    /// the staged input again.
    pub fn reset(&self) {
        let mut state = self.state.lock().unwrap();
        if let Some(task) = state.task.take() {
            task.cancel();
        }
        state.running = false;
        state.completed = false;
        state.remaining = Duration::ZERO;
        state.last_tick = None;
        self.display.send_replace(format_remaining(Duration::ZERO));
    }
}

#[cfg(test)]
mod tests;
