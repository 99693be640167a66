//! Completion alerts.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Best-effort completion cue. Implementations must return quickly and
/// must not panic; delivery failure is the implementation's problem,
/// never the caller's.
pub trait AlertService: Send + Sync {
    fn fire(&self);
}

/// Terminal bell. Write failures are logged and discarded.
#[derive(Debug, Clone, Copy, Default)]
pub struct BellAlert;

impl AlertService for BellAlert {
    fn fire(&self) {
        let mut stdout = std::io::stdout();
        if let Err(e) = stdout.write_all(b"\x07").and_then(|()| stdout.flush()) {
            tracing::debug!("bell write failed: {e}");
        }
        tracing::info!("timer finished");
    }
}

/// Test double that counts deliveries.
#[derive(Debug, Default)]
pub struct CountingAlert {
    fired: AtomicUsize,
}

impl CountingAlert {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.fired.load(Ordering::SeqCst)
    }
}

impl AlertService for CountingAlert {
    fn fire(&self) {
        self.fired.fetch_add(1, Ordering::SeqCst);
    }
}
