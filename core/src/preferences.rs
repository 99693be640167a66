//! Persisted dashboard preferences.
//!
//! One value survives across sessions: the user-selected extra world
//! clock zone. It sits behind [`PreferenceStore`] so engines can be
//! wired to an in-memory store in tests instead of the user's real
//! config directory.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const APP_NAME: &str = "tempo";

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("failed to save preferences")]
    Save(#[source] confy::ConfyError),

    /// For store implementations with no usable backend; never
    /// produced by [`ConfyStore`] or [`MemoryStore`].
    #[error("preference store unavailable")]
    Unavailable,
}

pub trait PreferenceStore: Send + Sync {
    /// The persisted extra-zone selection, if any. Load failures read
    /// as no selection.
    fn load_timezone(&self) -> Option<String>;

    fn store_timezone(&self, zone: Option<&str>) -> Result<(), PreferenceError>;
}

/// Preferences file contents, stored through confy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardPrefs {
    /// IANA identifier of the user-selected extra world clock zone.
    pub extra_timezone: Option<String>,
}

/// On-disk store in the platform config directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfyStore;

impl PreferenceStore for ConfyStore {
    fn load_timezone(&self) -> Option<String> {
        match confy::load::<DashboardPrefs>(APP_NAME, None) {
            Ok(prefs) => prefs.extra_timezone,
            Err(e) => {
                tracing::warn!("failed to load preferences: {e}");
                None
            }
        }
    }

    fn store_timezone(&self, zone: Option<&str>) -> Result<(), PreferenceError> {
        let prefs = DashboardPrefs {
            extra_timezone: zone.map(str::to_owned),
        };
        confy::store(APP_NAME, None, prefs).map_err(PreferenceError::Save)
    }
}

/// In-memory store for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    zone: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timezone(zone: &str) -> Self {
        Self {
            zone: Mutex::new(Some(zone.to_owned())),
        }
    }
}

impl PreferenceStore for MemoryStore {
    fn load_timezone(&self) -> Option<String> {
        self.zone.lock().unwrap().clone()
    }

    fn store_timezone(&self, zone: Option<&str>) -> Result<(), PreferenceError> {
        *self.zone.lock().unwrap() = zone.map(str::to_owned);
        Ok(())
    }
}
