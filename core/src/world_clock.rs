//! World clock engine: one sampled instant rendered across a fixed
//! set of zones plus an optional persisted user selection.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use chrono_tz::Tz;
use tokio::sync::watch;

use crate::clock::WallClock;
use crate::preferences::PreferenceStore;
use crate::scheduler::{TaskHandle, TickScheduler};

/// Nominal refresh period.
const REFRESH_TICK: Duration = Duration::from_secs(1);

/// Zones every dashboard shows, in display order.
pub const FIXED_ZONES: [Tz; 3] = [
    chrono_tz::America::New_York,
    chrono_tz::Europe::London,
    chrono_tz::Asia::Tokyo,
];

/// One rendered zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneTime {
    /// IANA identifier as displayed, e.g. `America/New_York`.
    pub zone: String,
    /// `HH:MM:SS` in that zone.
    pub time: String,
}

/// All zones rendered from a single sampled instant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorldClockSnapshot {
    pub zones: Vec<ZoneTime>,
}

struct WorldClockState {
    /// The extra zone after the fixed three. Kept verbatim, resolved
    /// at render time.
    selection: Option<String>,
    task: Option<TaskHandle>,
}

#[derive(Clone)]
pub struct WorldClockEngine {
    state: Arc<Mutex<WorldClockState>>,
    clock: Arc<dyn WallClock>,
    scheduler: Arc<dyn TickScheduler>,
    store: Arc<dyn PreferenceStore>,
    display: Arc<watch::Sender<WorldClockSnapshot>>,
}

impl WorldClockEngine {
    /// Restores the persisted zone selection on construction.
    pub fn new(
        clock: Arc<dyn WallClock>,
        scheduler: Arc<dyn TickScheduler>,
        store: Arc<dyn PreferenceStore>,
    ) -> Self {
        let selection = store.load_timezone();
        let (display, _) = watch::channel(WorldClockSnapshot::default());
        Self {
            state: Arc::new(Mutex::new(WorldClockState {
                selection,
                task: None,
            })),
            clock,
            scheduler,
            store,
            display: Arc::new(display),
        }
    }

    /// Latest published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<WorldClockSnapshot> {
        self.display.subscribe()
    }

    pub fn selection(&self) -> Option<String> {
        self.state.lock().unwrap().selection.clone()
    }

    /// Begin the refresh tick. Publishes once immediately; no-op while
    /// already running.
    pub fn start(&self) {
        let mut state = self.state.lock().unwrap();
        if state.task.is_some() {
            return;
        }

        let shared = Arc::clone(&self.state);
        let clock = Arc::clone(&self.clock);
        let display = Arc::clone(&self.display);
        let handle = self.scheduler.schedule_repeating(
            REFRESH_TICK,
            Box::new(move || {
                let selection = shared.lock().unwrap().selection.clone();
                display.send_replace(render(clock.now_utc(), selection.as_deref()));
            }),
        );
        state.task = Some(handle);
        self.display
            .send_replace(render(self.clock.now_utc(), state.selection.as_deref()));
    }

    pub fn stop(&self) {
        if let Some(task) = self.state.lock().unwrap().task.take() {
            task.cancel();
        }
    }

    /// Change the extra zone, republish, and write through to the
    /// preference store. Persistence failures are logged and swallowed;
    /// the in-memory selection always updates.
    pub fn set_timezone(&self, zone: Option<&str>) {
        let mut state = self.state.lock().unwrap();
        state.selection = zone.map(str::to_owned);
        if let Err(e) = self.store.store_timezone(zone) {
            tracing::warn!("failed to persist timezone selection: {e}");
        }
        self.display
            .send_replace(render(self.clock.now_utc(), state.selection.as_deref()));
    }
}

/// Render every configured zone from one sampled instant.
fn render(now: DateTime<Utc>, selection: Option<&str>) -> WorldClockSnapshot {
    let mut zones: Vec<ZoneTime> = FIXED_ZONES
        .iter()
        .map(|tz| ZoneTime {
            zone: tz.name().to_owned(),
            time: now.with_timezone(tz).format("%H:%M:%S").to_string(),
        })
        .collect();
    if let Some(id) = selection {
        zones.push(render_zone(now, id));
    }
    WorldClockSnapshot { zones }
}

/// A zone that does not resolve falls back to local time for that
/// entry only; the rest of the snapshot is unaffected.
fn render_zone(now: DateTime<Utc>, id: &str) -> ZoneTime {
    match id.parse::<Tz>() {
        Ok(tz) => ZoneTime {
            zone: id.to_owned(),
            time: now.with_timezone(&tz).format("%H:%M:%S").to_string(),
        },
        Err(_) => {
            tracing::debug!(zone = id, "unresolvable timezone, showing local time");
            ZoneTime {
                zone: id.to_owned(),
                time: now.with_timezone(&Local).format("%H:%M:%S").to_string(),
            }
        }
    }
}
