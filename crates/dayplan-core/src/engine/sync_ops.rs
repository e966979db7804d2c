//! Operations that move records between the session and the store.

use jiff::{civil::Date, ToSpan};
use log::{debug, info, warn};

use super::{
    CleanupReport, HistoryReport, RecordOrigin, SaveOutcome, SessionContext, StateInfo,
    SwitchOutcome, SyncEngine,
};
use crate::{
    error::Result,
    fingerprint::fingerprint,
    lifecycle::{classify_date, fresh_record},
    metrics::{averages, subject_stats, DailyMetrics},
    params::CleanupRequest,
    scheduler::{SaveDecision, SaveScheduler},
    store::HistoryEntry,
};

impl SyncEngine {
    /// Creates a session positioned on `date`, loading its stored record
    /// when there is one.
    pub fn open_session(&self, date: Date) -> SessionContext {
        let mut session = SessionContext::new(
            fresh_record(date, self.clock.now()),
            SaveScheduler::new(self.config.min_save_interval),
        );
        self.load(&mut session, date);
        session
    }

    /// Replaces the active record with the one stored for `date`, or with a
    /// fresh record when nothing is stored or the store is unreachable.
    ///
    /// A stored record is restored verbatim and counts as already saved
    /// content, so an immediate non-forced save is skipped as unchanged.
    pub fn load(&self, session: &mut SessionContext, date: Date) -> RecordOrigin {
        session.scheduler.reset();
        match self.records.get(date) {
            Ok(Some(record)) => {
                session.mark_connected();
                session.scheduler.prime(fingerprint(&record));
                session.record = record;
                info!("Loaded stored record for {date}");
                RecordOrigin::Stored
            }
            Ok(None) => {
                session.mark_connected();
                session.record = fresh_record(date, self.clock.now());
                debug!("No stored record for {date}, starting fresh");
                RecordOrigin::Fresh
            }
            Err(e) => {
                session.mark_degraded(e.to_string());
                session.record = fresh_record(date, self.clock.now());
                RecordOrigin::Unavailable
            }
        }
    }

    /// Runs the save gates and writes the active record when they pass.
    ///
    /// A failed write leaves the scheduler untouched, so the next request
    /// retries the same content.
    pub fn request_save(&self, session: &mut SessionContext, force: bool) -> SaveOutcome {
        let now = self.clock.now();
        let fingerprint = match session.scheduler.evaluate(&session.record, now, force) {
            SaveDecision::Proceed(fingerprint) => fingerprint,
            SaveDecision::Skip(reason) => {
                debug!("Save of {} skipped: {reason:?}", session.record.plan_date);
                return SaveOutcome::Skipped(reason);
            }
        };

        match self.records.upsert(&session.record) {
            Ok(report) => {
                session.scheduler.record_success(fingerprint, now);
                session.mark_connected();
                SaveOutcome::Saved {
                    revision: report.revision,
                    evicted: report.evicted,
                }
            }
            Err(e) => {
                let reason = e.to_string();
                session.mark_degraded(reason.clone());
                SaveOutcome::Failed { reason }
            }
        }
    }

    /// Moves the session to `new_date`.
    ///
    /// Pending changes on the current date are force-saved first. Then the
    /// stored record for `new_date` is restored, or a fresh one is created.
    /// Nothing is inherited automatically; see [`SyncEngine::inherit_from`].
    ///
    /// When the flush fails the session stays on the current date with its
    /// unsaved record, and the outcome reports [`RecordOrigin::Kept`].
    pub fn switch_date(&self, session: &mut SessionContext, new_date: Date) -> SwitchOutcome {
        let previous = session.record.plan_date;
        let flushed = if Self::has_pending_changes(session) {
            Some(self.request_save(session, true))
        } else {
            None
        };

        if let Some(SaveOutcome::Failed { reason }) = &flushed {
            warn!("Staying on {previous}, unsaved changes could not be flushed: {reason}");
            return SwitchOutcome {
                previous,
                current: previous,
                flushed,
                origin: RecordOrigin::Kept,
                status: classify_date(previous, self.clock.today()),
            };
        }

        let origin = self.load(session, new_date);
        info!("Switched active date from {previous} to {new_date} ({origin:?})");
        SwitchOutcome {
            previous,
            current: new_date,
            flushed,
            origin,
            status: classify_date(new_date, self.clock.today()),
        }
    }

    /// Removes the active date from the working document and resets the
    /// session to a fresh record. Returns whether an entry was removed.
    ///
    /// # Errors
    ///
    /// * `SyncError::RecordFinalized` - the active record is finalized
    pub fn clear_date(&self, session: &mut SessionContext) -> Result<bool> {
        Self::ensure_not_finalized(&session.record)?;
        let date = session.record.plan_date;
        let removed = match self.records.clear(date) {
            Ok(removed) => {
                session.mark_connected();
                removed
            }
            Err(e) => {
                session.mark_degraded(e.to_string());
                false
            }
        };
        session.record = fresh_record(date, self.clock.now());
        session.scheduler.reset();
        Ok(removed)
    }

    /// Operator maintenance on the working document and the session.
    pub fn cleanup(&self, session: &mut SessionContext, request: CleanupRequest) -> CleanupReport {
        let mut report = CleanupReport::new(request);
        let date = session.record.plan_date;
        match request {
            CleanupRequest::RetentionDays(days) => {
                let cutoff = self
                    .clock
                    .today()
                    .checked_sub(i64::from(days).days())
                    .unwrap_or(Date::MIN);
                match self.records.retain_since(cutoff) {
                    Ok(removed) => {
                        session.mark_connected();
                        if removed.contains(&date) {
                            session.scheduler.reset();
                        }
                        report.removed = removed;
                    }
                    Err(e) => {
                        session.mark_degraded(e.to_string());
                        report.error = Some(e.to_string());
                    }
                }
            }
            CleanupRequest::ClearCache => {
                if self.load(session, date) == RecordOrigin::Unavailable {
                    report.error = Some("store unreachable while reloading".to_string());
                }
                report.session_reset = true;
            }
            CleanupRequest::ClearAll => {
                match self.records.clear_all() {
                    Ok(deleted) => {
                        session.mark_connected();
                        report.document_deleted = deleted;
                    }
                    Err(e) => {
                        session.mark_degraded(e.to_string());
                        report.error = Some(e.to_string());
                    }
                }
                session.record = fresh_record(date, self.clock.now());
                session.scheduler.reset();
                report.session_reset = true;
            }
        }
        info!("Cleanup {request:?} removed {} entr(ies)", report.removed.len());
        report
    }

    /// Snapshot of the session and of the working document.
    pub fn get_state_info(&self, session: &mut SessionContext) -> StateInfo {
        let stored_dates = match self.records.dates() {
            Ok(dates) => {
                session.mark_connected();
                Some(dates)
            }
            Err(e) => {
                session.mark_degraded(e.to_string());
                None
            }
        };
        let record = &session.record;
        StateInfo {
            connection: session.connection.clone(),
            backend: self.blob.describe(),
            active_date: record.plan_date,
            date_status: classify_date(record.plan_date, self.clock.today()),
            plan_source: record.plan_source,
            task_count: record.planned_tasks.len(),
            execution_count: record.actual_executions.len(),
            tasks_confirmed: record.tasks_confirmed,
            pending_final_confirmation: record.pending_final_confirmation,
            finalized: record.finalized,
            last_saved_at: session.scheduler.last_saved_at(),
            last_modified_at: record.last_modified_at,
            retention: self.records.retention(),
            stored_dates,
        }
    }

    /// Finalized days from the history log, newest first. `None` returns the
    /// whole log; `Some(days)` only the last `days` days.
    pub fn history(&self, session: &mut SessionContext, days: Option<u32>) -> Vec<HistoryEntry> {
        let result = match days {
            Some(days) => self.history.recent(days, self.clock.today()),
            None => self.history.all(),
        };
        match result {
            Ok(entries) => {
                session.mark_connected();
                entries
            }
            Err(e) => {
                session.mark_degraded(e.to_string());
                Vec::new()
            }
        }
    }

    /// Recent history together with per-day metrics, averages and
    /// per-subject totals.
    pub fn history_report(&self, session: &mut SessionContext, days: u32) -> HistoryReport {
        let entries = self.history(session, Some(days));
        let daily: Vec<DailyMetrics> = entries.iter().map(DailyMetrics::from_entry).collect();
        let averages = averages(&daily);
        let subjects = subject_stats(&entries).into_iter().collect();
        HistoryReport {
            days,
            entries,
            daily,
            averages,
            subjects,
        }
    }

    fn has_pending_changes(session: &SessionContext) -> bool {
        !session.record.is_empty()
            && session.scheduler.last_fingerprint() != Some(&fingerprint(&session.record))
    }
}
