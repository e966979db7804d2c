//! Plan record model definition.

use std::collections::HashSet;

use jiff::{civil::Date, Timestamp};

use super::{Execution, PlanSource, Task, Weather};

/// The full set of planned and actual data for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRecord {
    /// Calendar date this record plans; unique within the working store
    pub plan_date: Date,

    pub weather: Weather,

    /// Energy level at the start of the day, 1 to 10
    pub energy_level: u8,

    /// Free-text reflection on the day
    pub reflection: String,

    /// Set once the task list passed the overlap check
    pub tasks_confirmed: bool,

    /// Set while the user reviews the day before finalizing it
    pub pending_final_confirmation: bool,

    /// Set once the day was saved for good; never goes back to false
    pub finalized: bool,

    pub planned_tasks: Vec<Task>,

    pub actual_executions: Vec<Execution>,

    pub plan_source: PlanSource,

    /// Timestamp when the record was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp of the last edit (UTC)
    pub last_modified_at: Timestamp,
}

impl PlanRecord {
    /// Energy level assumed when nothing was recorded.
    pub const DEFAULT_ENERGY_LEVEL: u8 = 7;

    /// Creates an empty record for `plan_date` with default values.
    pub fn new(plan_date: Date, now: Timestamp) -> Self {
        Self {
            plan_date,
            weather: Weather::default(),
            energy_level: Self::DEFAULT_ENERGY_LEVEL,
            reflection: String::new(),
            tasks_confirmed: false,
            pending_final_confirmation: false,
            finalized: false,
            planned_tasks: Vec::new(),
            actual_executions: Vec::new(),
            plan_source: PlanSource::New,
            created_at: now,
            last_modified_at: now,
        }
    }

    /// Whether the record carries nothing worth persisting: no named task,
    /// no execution, no reflection and neither confirmed nor finalized.
    pub fn is_empty(&self) -> bool {
        !self.has_named_tasks()
            && self.actual_executions.is_empty()
            && self.reflection.trim().is_empty()
            && !self.tasks_confirmed
            && !self.finalized
    }

    /// Whether at least one planned task has a name.
    pub fn has_named_tasks(&self) -> bool {
        self.planned_tasks.iter().any(Task::is_named)
    }

    /// Identifier the next appended task receives.
    pub fn next_task_id(&self) -> u32 {
        self.planned_tasks
            .iter()
            .map(|task| task.task_id)
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Looks up a planned task by identifier.
    pub fn task(&self, task_id: u32) -> Option<&Task> {
        self.planned_tasks.iter().find(|task| task.task_id == task_id)
    }

    /// Executions whose task exists in the plan. Orphaned executions are
    /// kept in storage but excluded from every aggregate.
    pub fn matched_executions(&self) -> impl Iterator<Item = &Execution> {
        let ids: HashSet<u32> = self.planned_tasks.iter().map(|t| t.task_id).collect();
        self.actual_executions
            .iter()
            .filter(move |execution| ids.contains(&execution.task_id))
    }

    /// Executions referencing a task that is not in the plan.
    pub fn orphaned_executions(&self) -> impl Iterator<Item = &Execution> {
        let ids: HashSet<u32> = self.planned_tasks.iter().map(|t| t.task_id).collect();
        self.actual_executions
            .iter()
            .filter(move |execution| !ids.contains(&execution.task_id))
    }

    /// Marks the record as modified at `now`.
    pub fn touch(&mut self, now: Timestamp) {
        self.last_modified_at = now;
    }
}
