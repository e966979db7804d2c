//! Markdown rendering of records, outcomes and history.
//!
//! Domain models and engine outcomes implement [`std::fmt::Display`]
//! directly. Lists that need a header or an empty-state message are wrapped
//! in newtypes. The CLI renders the resulting markdown in the terminal.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  PlanRecord,    │    │ Display impls & │    │    Markdown     │
//! │  outcomes       │───▶│ list wrappers   │───▶│    (terminal)   │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`models`]: records, tasks, executions, summaries and conflicts
//! - [`results`]: save, switch, finalize and cleanup outcomes, session state
//! - [`collections`]: history tables and conflict lists
//! - [`status`]: one-line action feedback
//! - [`datetime`]: timestamps, time ranges, minutes and percentages
//!
//! # Examples
//!
//! ```rust
//! use dayplan_core::{
//!     display::{Minutes, OperationStatus},
//!     engine::SaveOutcome,
//!     scheduler::SkipReason,
//! };
//!
//! assert_eq!(Minutes(90).to_string(), "1h 30m");
//!
//! let status = OperationStatus::after_save(
//!     "Reflection updated",
//!     &SaveOutcome::Skipped(SkipReason::EmptyRecord),
//! );
//! assert!(status.to_string().contains("the plan has no content yet"));
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{Conflicts, HistoryEntries};
pub use datetime::{LocalDateTime, Minutes, Percent, TimeRange};
pub use status::{OperationStatus, StatusLevel};
