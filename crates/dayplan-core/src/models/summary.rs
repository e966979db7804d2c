//! Daily summary derived from a plan record.

use std::collections::HashSet;

use super::PlanRecord;

/// Planned and actual totals for one day, stored next to finalized records
/// in the history log.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DailySummary {
    /// Sum of planned durations in minutes
    pub planned_total_time: u32,
    /// Sum of actual durations of matched executions in minutes
    pub actual_total_time: u32,
    pub planned_focus_time: u32,
    pub actual_focus_time: u32,
    /// Share of planned tasks that have an execution, 0 when nothing was
    /// planned
    pub completion_rate: f64,
    pub reflection: String,
}

impl DailySummary {
    /// Aggregates `record`, ignoring orphaned executions.
    pub fn from_record(record: &PlanRecord) -> Self {
        let planned_total_time = record.planned_tasks.iter().map(|t| t.planned_duration).sum();
        let planned_focus_time = record
            .planned_tasks
            .iter()
            .map(|t| t.planned_focus_duration)
            .sum();

        let mut executed = HashSet::new();
        let mut actual_total_time = 0;
        let mut actual_focus_time = 0;
        for execution in record.matched_executions() {
            executed.insert(execution.task_id);
            actual_total_time += execution.actual_duration;
            actual_focus_time += execution.actual_focus_duration;
        }

        let completion_rate = if record.planned_tasks.is_empty() {
            0.0
        } else {
            executed.len() as f64 / record.planned_tasks.len() as f64
        };

        Self {
            planned_total_time,
            actual_total_time,
            planned_focus_time,
            actual_focus_time,
            completion_rate,
            reflection: record.reflection.clone(),
        }
    }
}

impl From<&PlanRecord> for DailySummary {
    fn from(record: &PlanRecord) -> Self {
        Self::from_record(record)
    }
}
