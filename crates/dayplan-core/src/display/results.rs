//! Display implementations for engine outcomes and session state.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::{
    engine::{
        CleanupReport, ConnectionStatus, FinalizeOutcome, RecordOrigin, SaveOutcome, StateInfo,
        SwitchOutcome,
    },
    params::CleanupRequest,
    scheduler::SkipReason,
};

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::EmptyRecord => write!(f, "the plan has no content yet"),
            SkipReason::TooSoon { remaining } => {
                // Round up so "0s" is never shown for a pending save.
                let secs = remaining.as_secs() + i64::from(remaining.subsec_nanos() > 0);
                write!(f, "last save was too recent, retry in {secs}s")
            }
            SkipReason::Unchanged => write!(f, "no changes since the last save"),
        }
    }
}

impl fmt::Display for SaveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveOutcome::Saved { revision, evicted } => {
                write!(f, "Saved (revision {})", short_revision(revision))?;
                if !evicted.is_empty() {
                    let dates: Vec<String> = evicted.iter().map(ToString::to_string).collect();
                    write!(f, ", evicted {}", dates.join(", "))?;
                }
                Ok(())
            }
            SaveOutcome::Skipped(reason) => write!(f, "Not saved: {reason}"),
            SaveOutcome::Failed { reason } => {
                write!(f, "Save failed, changes kept locally: {reason}")
            }
        }
    }
}

impl fmt::Display for RecordOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordOrigin::Stored => write!(f, "restored from store"),
            RecordOrigin::Fresh => write!(f, "new plan"),
            RecordOrigin::Unavailable => write!(f, "new plan, store unreachable"),
            RecordOrigin::Kept => write!(f, "unsaved changes kept"),
        }
    }
}

impl fmt::Display for SwitchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.origin == RecordOrigin::Kept {
            writeln!(f, "Stayed on {} ({}, {})", self.current, self.status, self.origin)?;
        } else {
            writeln!(
                f,
                "Switched from {} to {} ({}, {})",
                self.previous, self.current, self.status, self.origin
            )?;
        }
        if let Some(flushed) = &self.flushed {
            writeln!(f, "- Previous day: {flushed}")?;
        }
        Ok(())
    }
}

impl fmt::Display for FinalizeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Finalized {}", self.date)?;
        writeln!(f)?;
        write!(f, "{}", self.summary)?;
        writeln!(f, "- Save: {}", self.save)?;
        if self.archived {
            writeln!(f, "- History: archived")
        } else {
            writeln!(f, "- History: not archived, run finalize again to retry")
        }
    }
}

impl fmt::Display for CleanupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleanupRequest::RetentionDays(days) => write!(f, "keep the last {days} day(s)"),
            CleanupRequest::ClearCache => write!(f, "reload session"),
            CleanupRequest::ClearAll => write!(f, "clear all working data"),
        }
    }
}

impl fmt::Display for CleanupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cleanup: {}", self.request)?;
        if !self.removed.is_empty() {
            let dates: Vec<String> = self.removed.iter().map(ToString::to_string).collect();
            writeln!(f, "- Removed: {}", dates.join(", "))?;
        } else if matches!(self.request, CleanupRequest::RetentionDays(_)) {
            writeln!(f, "- Removed: nothing")?;
        }
        if self.document_deleted {
            writeln!(f, "- Working document deleted")?;
        }
        if self.session_reset {
            writeln!(f, "- Session reset")?;
        }
        if let Some(error) = &self.error {
            writeln!(f, "- Error: {error}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Connected => write!(f, "connected"),
            ConnectionStatus::Degraded { reason } => write!(f, "offline ({reason})"),
        }
    }
}

impl fmt::Display for StateInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Session")?;
        writeln!(f)?;
        writeln!(f, "- Store: {} ({})", self.backend, self.connection)?;
        writeln!(f, "- Active date: {} ({})", self.active_date, self.date_status)?;
        writeln!(f, "- Source: {}", self.plan_source)?;
        writeln!(
            f,
            "- Tasks: {} planned, {} executed",
            self.task_count, self.execution_count
        )?;
        writeln!(
            f,
            "- Confirmed: {}, in review: {}, finalized: {}",
            yes_no(self.tasks_confirmed),
            yes_no(self.pending_final_confirmation),
            yes_no(self.finalized)
        )?;
        match &self.last_saved_at {
            Some(saved) => writeln!(f, "- Last saved: {}", LocalDateTime(saved))?,
            None => writeln!(f, "- Last saved: never")?,
        }
        writeln!(f, "- Last modified: {}", LocalDateTime(&self.last_modified_at))?;
        writeln!(f, "- Retention: {}", self.retention)?;
        match &self.stored_dates {
            Some(dates) if dates.is_empty() => writeln!(f, "- Stored dates: none")?,
            Some(dates) => {
                let dates: Vec<String> = dates.iter().map(ToString::to_string).collect();
                writeln!(f, "- Stored dates: {}", dates.join(", "))?;
            }
            None => writeln!(f, "- Stored dates: unknown")?,
        }
        Ok(())
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn short_revision(revision: &str) -> &str {
    revision.get(..12).unwrap_or(revision)
}
