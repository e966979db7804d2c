//! Editing operations and confirmation transitions.
//!
//! Editing rules:
//!
//! - tasks can be added or replaced only while the plan is unconfirmed
//! - executions can be recorded only after confirmation and must reference
//!   a planned task
//! - a finalized record accepts no edit at all
//!
//! Every transition that must not lose data (confirming, reopening,
//! entering or leaving the final review, finalizing) ends with a forced
//! save. Plain edits only touch memory; callers follow up with
//! [`SyncEngine::request_save`].

use jiff::civil::Date;
use log::info;

use super::{FinalizeOutcome, SaveOutcome, SessionContext, SyncEngine};
use crate::{
    error::{Result, SyncError},
    lifecycle::{inherit_tasks, validate_plan},
    models::{DailySummary, Execution, PlanRecord, Task},
    params::{ExecutionDraft, RecordUpdate, TaskDraft},
};

impl SyncEngine {
    /// Applies a partial update of weather, energy level and reflection.
    ///
    /// # Errors
    ///
    /// * `SyncError::RecordFinalized` - the record is finalized
    /// * `SyncError::InvalidInput` - unknown weather or energy out of range
    pub fn mutate(&self, session: &mut SessionContext, update: &RecordUpdate) -> Result<()> {
        Self::ensure_not_finalized(&session.record)?;
        let (weather, energy_level) = update.validate()?;
        if update.is_empty() {
            return Ok(());
        }

        let record = &mut session.record;
        if let Some(weather) = weather {
            record.weather = weather;
        }
        if let Some(energy_level) = energy_level {
            record.energy_level = energy_level;
        }
        if let Some(reflection) = &update.reflection {
            record.reflection = reflection.trim().to_string();
        }
        record.touch(self.clock.now());
        Ok(())
    }

    /// Appends a task with the next free identifier.
    ///
    /// # Errors
    ///
    /// * `SyncError::RecordFinalized` - the record is finalized
    /// * `SyncError::InvalidInput` - the plan is confirmed or the draft is
    ///   invalid
    pub fn add_task(&self, session: &mut SessionContext, draft: &TaskDraft) -> Result<Task> {
        Self::ensure_plan_editable(&session.record)?;
        let task = draft.to_task(session.record.next_task_id())?;
        session.record.planned_tasks.push(task.clone());
        session.record.touch(self.clock.now());
        Ok(task)
    }

    /// Replaces the task `task_id` in place, keeping its identifier.
    ///
    /// # Errors
    ///
    /// * `SyncError::RecordFinalized` - the record is finalized
    /// * `SyncError::InvalidInput` - the plan is confirmed or the draft is
    ///   invalid
    /// * `SyncError::TaskNotFound` - no task has this identifier
    pub fn replace_task(
        &self,
        session: &mut SessionContext,
        task_id: u32,
        draft: &TaskDraft,
    ) -> Result<Task> {
        Self::ensure_plan_editable(&session.record)?;
        let task = draft.to_task(task_id)?;
        let slot = session
            .record
            .planned_tasks
            .iter_mut()
            .find(|existing| existing.task_id == task_id)
            .ok_or(SyncError::TaskNotFound { task_id })?;
        *slot = task.clone();
        session.record.touch(self.clock.now());
        Ok(task)
    }

    /// Records the execution of a planned task, replacing an earlier
    /// execution of the same task.
    ///
    /// # Errors
    ///
    /// * `SyncError::RecordFinalized` - the record is finalized
    /// * `SyncError::InvalidInput` - the plan is not confirmed or the draft is
    ///   invalid
    /// * `SyncError::TaskNotFound` - the execution references no planned task
    pub fn record_execution(
        &self,
        session: &mut SessionContext,
        draft: &ExecutionDraft,
    ) -> Result<Execution> {
        Self::ensure_not_finalized(&session.record)?;
        if !session.record.tasks_confirmed {
            return Err(SyncError::invalid_input("tasks_confirmed")
                .with_reason("Confirm the plan before recording executions"));
        }
        if session.record.task(draft.task_id).is_none() {
            return Err(SyncError::TaskNotFound {
                task_id: draft.task_id,
            });
        }
        let execution = draft.to_execution()?;

        let executions = &mut session.record.actual_executions;
        match executions
            .iter_mut()
            .find(|existing| existing.task_id == execution.task_id)
        {
            Some(existing) => *existing = execution.clone(),
            None => executions.push(execution.clone()),
        }
        session.record.touch(self.clock.now());
        Ok(execution)
    }

    /// Confirms the task list after the overlap check and force-saves.
    ///
    /// Unnamed draft tasks are dropped on confirmation.
    ///
    /// # Errors
    ///
    /// * `SyncError::RecordFinalized` - the record is finalized
    /// * `SyncError::EmptyPlan` - no task has a name
    /// * `SyncError::OverlapConflict` - tasks overlap; every pair is listed
    pub fn confirm_tasks(&self, session: &mut SessionContext) -> Result<SaveOutcome> {
        Self::ensure_not_finalized(&session.record)?;
        validate_plan(&session.record.planned_tasks)?;

        let record = &mut session.record;
        record.planned_tasks.retain(Task::is_named);
        record.tasks_confirmed = true;
        record.touch(self.clock.now());
        info!(
            "Confirmed {} task(s) for {}",
            record.planned_tasks.len(),
            record.plan_date
        );
        Ok(self.request_save(session, true))
    }

    /// Returns a confirmed plan to editing and force-saves. Recorded
    /// executions are kept.
    ///
    /// # Errors
    ///
    /// * `SyncError::RecordFinalized` - the record is finalized
    pub fn reopen_tasks(&self, session: &mut SessionContext) -> Result<SaveOutcome> {
        Self::ensure_not_finalized(&session.record)?;
        session.record.tasks_confirmed = false;
        session.record.pending_final_confirmation = false;
        session.record.touch(self.clock.now());
        Ok(self.request_save(session, true))
    }

    /// Starts the final review of the day and force-saves.
    ///
    /// # Errors
    ///
    /// * `SyncError::RecordFinalized` - the record is finalized
    /// * `SyncError::InvalidInput` - the plan is not confirmed
    pub fn enter_final_confirmation(&self, session: &mut SessionContext) -> Result<SaveOutcome> {
        Self::ensure_not_finalized(&session.record)?;
        if !session.record.tasks_confirmed {
            return Err(SyncError::invalid_input("tasks_confirmed")
                .with_reason("Confirm the plan before reviewing the day"));
        }
        session.record.pending_final_confirmation = true;
        session.record.touch(self.clock.now());
        Ok(self.request_save(session, true))
    }

    /// Cancels the final review and force-saves.
    ///
    /// # Errors
    ///
    /// * `SyncError::RecordFinalized` - the record is finalized
    pub fn leave_final_confirmation(&self, session: &mut SessionContext) -> Result<SaveOutcome> {
        Self::ensure_not_finalized(&session.record)?;
        session.record.pending_final_confirmation = false;
        session.record.touch(self.clock.now());
        Ok(self.request_save(session, true))
    }

    /// Finalizes the day: sets the terminal flag, force-saves the working
    /// document and appends the record to the history log.
    ///
    /// Calling it again on a finalized record changes nothing in the record
    /// but repeats the save and the history append, which replaces the
    /// earlier history entry. This is how a finalization that hit an
    /// unreachable store is retried.
    ///
    /// # Errors
    ///
    /// * `SyncError::InvalidInput` - the plan is not confirmed
    pub fn finalize(&self, session: &mut SessionContext) -> Result<FinalizeOutcome> {
        if !session.record.finalized {
            if !session.record.tasks_confirmed {
                return Err(SyncError::invalid_input("tasks_confirmed")
                    .with_reason("Confirm the plan before finalizing the day"));
            }
            session.record.finalized = true;
            session.record.pending_final_confirmation = false;
            session.record.touch(self.clock.now());
        }

        let save = self.request_save(session, true);
        let archived = match self.history.append(&session.record) {
            Ok(_) => true,
            Err(e) => {
                session.mark_degraded(e.to_string());
                false
            }
        };
        info!("Finalized {} (archived: {archived})", session.record.plan_date);

        Ok(FinalizeOutcome {
            date: session.record.plan_date,
            summary: DailySummary::from_record(&session.record),
            save,
            archived,
        })
    }

    /// Copies the named tasks of the record stored for `source_date` into
    /// the active record, then requests a regular save.
    ///
    /// The source is looked up in the working document first and in the
    /// history log second.
    ///
    /// # Errors
    ///
    /// * `SyncError::InvalidInput` - nothing is stored for `source_date`, or
    ///   the active date is in the past or equal to `source_date`
    /// * `SyncError::RecordFinalized` - the active record is finalized
    /// * `SyncError::EmptyPlan` - the source has no named task
    pub fn inherit_from(
        &self,
        session: &mut SessionContext,
        source_date: Date,
    ) -> Result<SaveOutcome> {
        Self::ensure_not_finalized(&session.record)?;
        let source = self.find_stored(session, source_date).ok_or_else(|| {
            SyncError::invalid_input("source_date")
                .with_reason(format!("No plan is stored for {source_date}"))
        })?;

        let inherited = inherit_tasks(
            &source,
            &session.record,
            self.clock.today(),
            self.clock.now(),
        )?;
        info!(
            "Inherited {} task(s) from {source_date} into {}",
            inherited.planned_tasks.len(),
            inherited.plan_date
        );
        session.record = inherited;
        Ok(self.request_save(session, false))
    }

    fn find_stored(
        &self,
        session: &mut SessionContext,
        date: Date,
    ) -> Option<PlanRecord> {
        match self.records.get(date) {
            Ok(Some(record)) => {
                session.mark_connected();
                return Some(record);
            }
            Ok(None) => session.mark_connected(),
            Err(e) => {
                session.mark_degraded(e.to_string());
                return None;
            }
        }
        match self.history.get(date) {
            Ok(entry) => entry.map(|entry| entry.record),
            Err(e) => {
                session.mark_degraded(e.to_string());
                None
            }
        }
    }

    fn ensure_plan_editable(record: &PlanRecord) -> Result<()> {
        Self::ensure_not_finalized(record)?;
        if record.tasks_confirmed {
            return Err(SyncError::invalid_input("tasks_confirmed")
                .with_reason("The plan is confirmed; reopen it to edit tasks"));
        }
        Ok(())
    }
}
