pub mod alert;
pub mod clock;
pub mod countdown;
pub mod format;
pub mod preferences;
pub mod scheduler;
pub mod stopwatch;
pub mod world_clock;

// Re-exports for convenience
pub use alert::{AlertService, BellAlert, CountingAlert};
pub use clock::{FakeClock, MonotonicClock, SystemClock, WallClock};
pub use countdown::{CountdownTimerEngine, DurationParseError, parse_duration};
pub use format::{format_elapsed, format_remaining};
pub use preferences::{
    ConfyStore, DashboardPrefs, MemoryStore, PreferenceError, PreferenceStore,
};
pub use scheduler::{ManualScheduler, TaskHandle, TickScheduler, TokioScheduler};
pub use stopwatch::{LapRecord, StopwatchEngine};
pub use world_clock::{WorldClockEngine, WorldClockSnapshot, ZoneTime};
