//! Plan state synchronization engine.
//!
//! The [`SyncEngine`] keeps an actively edited [`PlanRecord`] consistent with
//! the date-keyed working document. It holds no per-session state: callers
//! own a [`SessionContext`] and pass it to every call.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  record_ops     │    │    sync_ops     │    │     store/      │
//! │ (edit rules,    │───▶│ (save gates,    │───▶│ (working doc,   │
//! │  confirmation)  │    │  date switch)   │    │  history log)   │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Failure model
//!
//! Store failures never escape an engine call. A failed write becomes
//! [`SaveOutcome::Failed`], a failed read behaves like "nothing stored", and
//! either one flips the session to [`ConnectionStatus::Degraded`]. The next
//! successful store operation flips it back. Only validation problems
//! (overlapping tasks, edits to a finalized record, malformed input) are
//! returned as errors.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use dayplan_core::{
//!     params::TaskDraft,
//!     store::MemoryBlobStore,
//!     EngineBuilder,
//! };
//! use jiff::civil::date;
//!
//! # fn main() -> dayplan_core::Result<()> {
//! let engine = EngineBuilder::new()
//!     .with_blob_store(Arc::new(MemoryBlobStore::new()))
//!     .build()?;
//!
//! let mut session = engine.open_session(date(2026, 10, 19));
//! engine.add_task(&mut session, &TaskDraft {
//!     name: "Group theory".to_string(),
//!     subject: Some("math".to_string()),
//!     difficulty: Some(4),
//!     start_time: "09:00".to_string(),
//!     end_time: "10:30".to_string(),
//! })?;
//! let outcome = engine.confirm_tasks(&mut session)?;
//! assert!(outcome.is_saved());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use jiff::civil::Date;

use crate::{
    clock::Clock,
    config::EngineConfig,
    error::{Result, SyncError},
    models::PlanRecord,
    store::{BlobStore, HistoryLog, MultiRecordStore},
};

pub mod builder;
pub mod outcomes;
pub mod record_ops;
pub mod session;
pub mod sync_ops;


pub use builder::EngineBuilder;
pub use outcomes::{
    CleanupReport, FinalizeOutcome, HistoryReport, RecordOrigin, SaveOutcome, StateInfo,
    SwitchOutcome,
};
pub use session::{ConnectionStatus, SessionContext};

/// Main engine interface for loading, editing and persisting plan records.
pub struct SyncEngine {
    pub(crate) blob: Arc<dyn BlobStore>,
    pub(crate) records: MultiRecordStore,
    pub(crate) history: HistoryLog,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) config: EngineConfig,
}

impl SyncEngine {
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The working document store.
    pub fn records(&self) -> &MultiRecordStore {
        &self.records
    }

    pub fn history_log(&self) -> &HistoryLog {
        &self.history
    }

    /// Today's date according to the engine clock.
    pub fn today(&self) -> Date {
        self.clock.today()
    }

    fn ensure_not_finalized(record: &PlanRecord) -> Result<()> {
        if record.finalized {
            Err(SyncError::RecordFinalized {
                date: record.plan_date,
            })
        } else {
            Ok(())
        }
    }
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("backend", &self.blob.describe())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
