//! Record lifecycle rules: fresh records, inheritance and plan validation.
//!
//! Times of day carry no date, so overlap is decided on a circular day. Each
//! task becomes a half-open minute interval `[start, start + duration)` whose
//! end may run past midnight (`> 1440`). Two intervals conflict when they
//! intersect directly or when either one intersects the other shifted by a
//! full day. This makes `[23:00-01:00]` and `[00:30-02:00]` collide while
//! back-to-back tasks such as `[09:00-10:00]` and `[10:00-11:00]` do not.

use jiff::{
    civil::{Date, Time},
    Timestamp,
};

use crate::{
    error::{Result, SyncError},
    models::{DateStatus, PlanRecord, PlanSource, Task, MINUTES_PER_DAY},
};

/// One side of a conflicting task pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictingTask {
    pub task_id: u32,
    pub name: String,
    pub start_time: Time,
    pub end_time: Time,
}

impl From<&Task> for ConflictingTask {
    fn from(task: &Task) -> Self {
        Self {
            task_id: task.task_id,
            name: task.name.clone(),
            start_time: task.start_time,
            end_time: task.end_time,
        }
    }
}

/// Two planned tasks whose intervals overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskConflict {
    pub first: ConflictingTask,
    pub second: ConflictingTask,
}

/// Classifies `date` relative to `today`.
pub fn classify_date(date: Date, today: Date) -> DateStatus {
    DateStatus::classify(date, today)
}

/// Creates the record shown for a date with nothing stored.
///
/// Every such record starts as `new`, whatever side of today it falls on.
pub fn fresh_record(date: Date, now: Timestamp) -> PlanRecord {
    PlanRecord::new(date, now)
}

/// Builds the record that results from copying the named tasks of `source`
/// into `target`.
///
/// The copied tasks are renumbered from 1, executions are dropped and the
/// plan has to be confirmed again. Everything else on `target` (weather,
/// energy, reflection) is kept.
///
/// # Errors
///
/// * `SyncError::RecordFinalized` - `target` is finalized
/// * `SyncError::InvalidInput` - `target` is in the past or is `source` itself
/// * `SyncError::EmptyPlan` - `source` has no named task
pub fn inherit_tasks(
    source: &PlanRecord,
    target: &PlanRecord,
    today: Date,
    now: Timestamp,
) -> Result<PlanRecord> {
    if target.finalized {
        return Err(SyncError::RecordFinalized {
            date: target.plan_date,
        });
    }
    if classify_date(target.plan_date, today) == DateStatus::Past {
        return Err(SyncError::invalid_input("plan_date").with_reason(format!(
            "Cannot inherit into past date {}",
            target.plan_date
        )));
    }
    if source.plan_date == target.plan_date {
        return Err(SyncError::invalid_input("source_date")
            .with_reason("A record cannot inherit from its own date"));
    }

    let planned_tasks: Vec<Task> = source
        .planned_tasks
        .iter()
        .filter(|task| task.is_named())
        .zip(1..)
        .map(|(task, task_id)| {
            Task::new(
                task_id,
                task.name.clone(),
                task.subject,
                task.difficulty,
                task.start_time,
                task.end_time,
            )
        })
        .collect();
    if planned_tasks.is_empty() {
        return Err(SyncError::EmptyPlan);
    }

    let mut record = target.clone();
    record.planned_tasks = planned_tasks;
    record.actual_executions.clear();
    record.tasks_confirmed = false;
    record.pending_final_confirmation = false;
    record.plan_source = PlanSource::InheritedFrom(source.plan_date);
    record.touch(now);
    Ok(record)
}

/// Reports every pair of overlapping tasks, in task order.
pub fn find_conflicts(tasks: &[Task]) -> Vec<TaskConflict> {
    let mut conflicts = Vec::new();
    for (i, first) in tasks.iter().enumerate() {
        for second in &tasks[i + 1..] {
            if overlaps(first.interval(), second.interval()) {
                conflicts.push(TaskConflict {
                    first: first.into(),
                    second: second.into(),
                });
            }
        }
    }
    conflicts
}

/// Checks that the named tasks of a plan can be confirmed.
///
/// Unnamed tasks are drafts and take no part in the check.
///
/// # Errors
///
/// * `SyncError::EmptyPlan` - no task has a name
/// * `SyncError::OverlapConflict` - at least one pair of tasks overlaps
pub fn validate_plan(tasks: &[Task]) -> Result<()> {
    let named: Vec<Task> = tasks.iter().filter(|task| task.is_named()).cloned().collect();
    if named.is_empty() {
        return Err(SyncError::EmptyPlan);
    }
    let conflicts = find_conflicts(&named);
    if conflicts.is_empty() {
        Ok(())
    } else {
        Err(SyncError::OverlapConflict { conflicts })
    }
}

fn overlaps(a: (u32, u32), b: (u32, u32)) -> bool {
    let shift = |(start, end): (u32, u32)| (start + MINUTES_PER_DAY, end + MINUTES_PER_DAY);
    intersects(a, b) || intersects(a, shift(b)) || intersects(shift(a), b)
}

fn intersects((start_a, end_a): (u32, u32), (start_b, end_b): (u32, u32)) -> bool {
    start_a < end_b && end_a > start_b
}
