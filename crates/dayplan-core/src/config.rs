//! Engine configuration.

use std::path::PathBuf;

use jiff::SignedDuration;

use crate::{
    error::{Result, SyncError},
    scheduler::DEFAULT_MIN_SAVE_INTERVAL,
    store::RetentionPolicy,
};

/// Key of the working document holding the date-keyed records.
pub const DEFAULT_STATE_KEY: &str = "daily_session_state.json";

/// Key of the history log of finalized days.
pub const DEFAULT_HISTORY_KEY: &str = "study_history.json";

/// Settings shared by every session of an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub state_key: String,
    pub history_key: String,
    /// Retention applied to the working document after every upsert
    pub retention: RetentionPolicy,
    /// Minimum time between two non-forced saves
    pub min_save_interval: SignedDuration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            state_key: DEFAULT_STATE_KEY.to_string(),
            history_key: DEFAULT_HISTORY_KEY.to_string(),
            retention: RetentionPolicy::default(),
            min_save_interval: DEFAULT_MIN_SAVE_INTERVAL,
        }
    }
}

impl EngineConfig {
    /// Checks the settings for values the engine cannot work with.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Configuration` for blank or identical document
    /// keys, a zero retention count or a negative save interval.
    pub fn validate(&self) -> Result<()> {
        if self.state_key.trim().is_empty() || self.history_key.trim().is_empty() {
            return Err(SyncError::Configuration {
                message: "Document keys cannot be empty".to_string(),
            });
        }
        if self.state_key == self.history_key {
            return Err(SyncError::Configuration {
                message: format!(
                    "Working document and history log share the key '{}'",
                    self.state_key
                ),
            });
        }
        if self.retention == RetentionPolicy::KeepLatest(0) {
            return Err(SyncError::Configuration {
                message: "Retention must keep at least one record".to_string(),
            });
        }
        if self.min_save_interval.is_negative() {
            return Err(SyncError::Configuration {
                message: format!(
                    "Minimum save interval cannot be negative, got {:?}",
                    self.min_save_interval
                ),
            });
        }
        Ok(())
    }
}

/// Returns the default database path following the XDG Base Directory
/// specification: `$XDG_DATA_HOME/dayplan/dayplan.db`.
pub(crate) fn default_database_path() -> Result<PathBuf> {
    xdg::BaseDirectories::with_prefix("dayplan")
        .place_data_file("dayplan.db")
        .map_err(|e| SyncError::XdgDirectory(e.to_string()))
}
