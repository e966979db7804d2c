//! Result types returned by engine operations.
//!
//! Display implementations live in [`crate::display`].

use jiff::{civil::Date, Timestamp};

use super::ConnectionStatus;
use crate::{
    metrics::{DailyMetrics, MetricAverages, SubjectStats},
    models::{DailySummary, DateStatus, PlanSource, Subject},
    params::CleanupRequest,
    scheduler::SkipReason,
    store::{HistoryEntry, RetentionPolicy},
};

/// What happened to a save request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The record was written
    Saved {
        revision: String,
        /// Dates dropped by the retention policy
        evicted: Vec<Date>,
    },
    /// A gate stopped the save before it reached the store
    Skipped(SkipReason),
    /// The store rejected the write; the session is degraded
    Failed { reason: String },
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved { .. })
    }
}

/// Where the active record came from after a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOrigin {
    /// Restored from the working document
    Stored,
    /// Nothing stored for the date; a fresh record was created
    Fresh,
    /// The store could not be read; a fresh record was created
    Unavailable,
    /// Unsaved changes could not be flushed, so the active record was kept
    Kept,
}

/// Result of switching the active date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchOutcome {
    pub previous: Date,
    /// The active date afterwards; equals `previous` when the switch was
    /// refused
    pub current: Date,
    /// Forced save of pending changes on the previous date, if any
    pub flushed: Option<SaveOutcome>,
    pub origin: RecordOrigin,
    pub status: DateStatus,
}

/// Result of finalizing the active record.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalizeOutcome {
    pub date: Date,
    pub summary: DailySummary,
    pub save: SaveOutcome,
    /// Whether the history log accepted the record
    pub archived: bool,
}

/// Result of an operator cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    pub request: CleanupRequest,
    /// Working entries removed, most recent first
    pub removed: Vec<Date>,
    /// Whether the working document was deleted
    pub document_deleted: bool,
    /// Whether the session was reset to the stored or a fresh record
    pub session_reset: bool,
    /// Store error that cut the cleanup short
    pub error: Option<String>,
}

impl CleanupReport {
    pub(crate) fn new(request: CleanupRequest) -> Self {
        Self {
            request,
            removed: Vec::new(),
            document_deleted: false,
            session_reset: false,
            error: None,
        }
    }
}

/// Snapshot of a session for status displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateInfo {
    pub connection: ConnectionStatus,
    /// Backend description, e.g. `sqlite:/path/to/dayplan.db`
    pub backend: String,
    pub active_date: Date,
    pub date_status: DateStatus,
    pub plan_source: PlanSource,
    pub task_count: usize,
    pub execution_count: usize,
    pub tasks_confirmed: bool,
    pub pending_final_confirmation: bool,
    pub finalized: bool,
    pub last_saved_at: Option<Timestamp>,
    pub last_modified_at: Timestamp,
    pub retention: RetentionPolicy,
    /// Dates held by the working document; `None` when the store was
    /// unreachable
    pub stored_dates: Option<Vec<Date>>,
}

/// Recent history with its dashboard aggregates.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryReport {
    pub days: u32,
    pub entries: Vec<HistoryEntry>,
    pub daily: Vec<DailyMetrics>,
    pub averages: MetricAverages,
    pub subjects: Vec<(Subject, SubjectStats)>,
}
