//! Key-value settings persisted as a flat JSON object.

use crate::error::StockroomError;
use serde_json::{Map, Value};
use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

pub const PREF_RECEIVE_NOTIFICATIONS: &str = "pref_receive_notifications";

/// Outcome of the host's SMS permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmsPermission {
    Granted,
    Denied,
}

impl From<bool> for SmsPermission {
    fn from(granted: bool) -> Self {
        if granted { Self::Granted } else { Self::Denied }
    }
}

pub struct Preferences {
    path: PathBuf,
    values: Map<String, Value>,
}

impl Preferences {
    /// Load the settings file. A missing or undecodable file is an empty
    /// store; only I/O failures are errors.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StockroomError> {
        let path = path.into();
        let values = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "preferences file unreadable; using defaults"
                );
                Map::new()
            })
        } else {
            info!(path = %path.display(), "preferences file not found; using defaults");
            Map::new()
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.values
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(default)
    }

    /// Set and write the whole file back.
    pub fn set_bool(&mut self, key: &str, value: bool) -> Result<(), StockroomError> {
        self.values.insert(key.to_string(), Value::Bool(value));
        self.save()
    }

    fn save(&self) -> Result<(), StockroomError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        // Write beside the target and rename over it, so a crash mid-write
        // never leaves a truncated file.
        let tmp = self.temp_path();
        fs::write(&tmp, serde_json::to_string_pretty(&self.values)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "preferences saved");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("preferences"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Stored opt-in, `false` when never set.
    pub fn receive_notifications(&self) -> bool {
        self.get_bool(PREF_RECEIVE_NOTIFICATIONS, false)
    }

    /// What the toggle should show on entry: opted in and still permitted.
    pub fn initial_toggle_state(&self, permission: SmsPermission) -> bool {
        self.receive_notifications() && permission == SmsPermission::Granted
    }

    /// The user flipped the toggle. Opting in only sticks with permission;
    /// the effective value is persisted and returned.
    pub fn toggle(
        &mut self,
        requested: bool,
        permission: SmsPermission,
    ) -> Result<bool, StockroomError> {
        let enabled = requested && permission == SmsPermission::Granted;
        self.set_bool(PREF_RECEIVE_NOTIFICATIONS, enabled)?;
        Ok(enabled)
    }

    /// The host's permission prompt finished.
    pub fn on_permission_result(&mut self, granted: bool) -> Result<bool, StockroomError> {
        self.set_bool(PREF_RECEIVE_NOTIFICATIONS, granted)?;
        Ok(granted)
    }
}
