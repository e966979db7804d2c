//! Builder for creating and configuring SyncEngine instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use jiff::SignedDuration;
use log::debug;

use super::SyncEngine;
use crate::{
    clock::{Clock, SystemClock},
    config::{default_database_path, EngineConfig},
    error::{Result, SyncError},
    store::{BlobStore, HistoryLog, MultiRecordStore, RetentionPolicy, SqliteBlobStore},
};

/// Builder for creating and configuring SyncEngine instances.
#[derive(Clone, Default)]
pub struct EngineBuilder {
    database_path: Option<PathBuf>,
    blob_store: Option<Arc<dyn BlobStore>>,
    clock: Option<Arc<dyn Clock>>,
    config: EngineConfig,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/dayplan/dayplan.db` or
    /// `~/.local/share/dayplan/dayplan.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Uses `store` instead of opening a SQLite file. Takes precedence over
    /// any database path.
    pub fn with_blob_store(mut self, store: Arc<dyn BlobStore>) -> Self {
        self.blob_store = Some(store);
        self
    }

    pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.config.retention = retention;
        self
    }

    pub fn with_min_save_interval(mut self, interval: SignedDuration) -> Self {
        self.config.min_save_interval = interval;
        self
    }

    /// Sets the source of "now" and "today". Defaults to the system clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the configured engine.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Configuration` if the configuration is invalid
    /// Returns `SyncError::FileSystem` if the database directory cannot be
    /// created
    /// Returns `SyncError::Database` if database initialization fails
    pub fn build(self) -> Result<SyncEngine> {
        self.config.validate()?;

        let blob: Arc<dyn BlobStore> = match self.blob_store {
            Some(store) => store,
            None => {
                let db_path = match self.database_path {
                    Some(path) => path,
                    None => default_database_path()?,
                };
                if let Some(parent) = db_path.parent() {
                    std::fs::create_dir_all(parent).map_err(|e| SyncError::FileSystem {
                        path: parent.to_path_buf(),
                        source: e,
                    })?;
                }
                Arc::new(SqliteBlobStore::open(&db_path)?)
            }
        };
        debug!("Building engine on {} with {:?}", blob.describe(), self.config);

        let records = MultiRecordStore::new(
            Arc::clone(&blob),
            self.config.state_key.clone(),
            self.config.retention,
        );
        let history = HistoryLog::new(Arc::clone(&blob), self.config.history_key.clone());
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        Ok(SyncEngine {
            blob,
            records,
            history,
            clock,
            config: self.config,
        })
    }
}

impl std::fmt::Debug for EngineBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineBuilder")
            .field("database_path", &self.database_path)
            .field(
                "blob_store",
                &self.blob_store.as_ref().map(|store| store.describe()),
            )
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
