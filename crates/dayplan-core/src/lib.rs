//! Core library for the Dayplan daily planning tool.
//!
//! This crate keeps one actively edited daily plan record consistent with a
//! versioned blob store. It covers the record model and its JSON codec, the
//! save gates that decide when a record is written, a date-keyed working
//! document with a retention window, the history log of finalized days and
//! the metrics computed from it.
//!
//! # Layers
//!
//! - **Models** ([`models`], [`codec`]): records, tasks and executions, and
//!   their stored JSON form
//! - **Persistence** ([`store`]): the [`store::BlobStore`] seam, the working
//!   document and the history log
//! - **Sync** ([`engine`], [`scheduler`], [`lifecycle`]): sessions, save
//!   gates, confirmation and date switching
//! - **Display** ([`display`]): markdown rendering for the CLI
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use dayplan_core::{params::RecordUpdate, store::MemoryBlobStore, EngineBuilder};
//! use jiff::civil::date;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = EngineBuilder::new()
//!     .with_blob_store(Arc::new(MemoryBlobStore::new()))
//!     .build()?;
//!
//! let mut session = engine.open_session(date(2026, 10, 19));
//! engine.mutate(
//!     &mut session,
//!     &RecordUpdate {
//!         reflection: Some("Read two chapters".to_string()),
//!         ..RecordUpdate::default()
//!     },
//! )?;
//!
//! let outcome = engine.request_save(&mut session, false);
//! println!("{outcome}");
//! println!("{}", session.record());
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod codec;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod lifecycle;
pub mod metrics;
pub mod models;
pub mod params;
pub mod scheduler;
pub mod store;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::EngineConfig;
pub use display::{Conflicts, HistoryEntries, LocalDateTime, OperationStatus};
pub use engine::{
    CleanupReport, ConnectionStatus, EngineBuilder, FinalizeOutcome, HistoryReport,
    RecordOrigin, SaveOutcome, SessionContext, StateInfo, SwitchOutcome, SyncEngine,
};
pub use error::{Result, SyncError};
pub use models::{DailySummary, DateStatus, Execution, PlanRecord, PlanSource, Subject, Task, Weather};
pub use params::{CleanupRequest, ExecutionDraft, RecordUpdate, TaskDraft};
pub use store::{BlobStore, MemoryBlobStore, RetentionPolicy, SqliteBlobStore};
