//! Dashboard metrics over the history of finalized days.

use std::collections::BTreeMap;

use jiff::civil::Date;

use crate::{models::Subject, store::HistoryEntry};

/// Ratios and counts for one finalized day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyMetrics {
    pub date: Date,
    /// Share of planned tasks that were executed
    pub completion_rate: f64,
    /// Actual focus time over actual total time, 0 without executions
    pub focus_efficiency: f64,
    /// `1 - |planned - actual| / planned`, 0 when nothing was planned.
    /// Negative when the actual time exceeds twice the plan.
    pub planning_accuracy: f64,
    /// Actual focus minutes
    pub total_focus_time: u32,
    pub task_count: usize,
    pub completed_count: usize,
}

impl DailyMetrics {
    /// Computes the metrics of one history entry from its stored summary.
    pub fn from_entry(entry: &HistoryEntry) -> Self {
        let summary = &entry.summary;
        let planned = f64::from(summary.planned_total_time);
        let actual = f64::from(summary.actual_total_time);

        let focus_efficiency = if summary.actual_total_time > 0 {
            f64::from(summary.actual_focus_time) / actual
        } else {
            0.0
        };
        let planning_accuracy = if summary.planned_total_time > 0 {
            1.0 - (planned - actual).abs() / planned
        } else {
            0.0
        };

        Self {
            date: entry.date(),
            completion_rate: summary.completion_rate,
            focus_efficiency,
            planning_accuracy,
            total_focus_time: summary.actual_focus_time,
            task_count: entry.record.planned_tasks.len(),
            completed_count: entry
                .record
                .matched_executions()
                .filter(|execution| execution.completed)
                .count(),
        }
    }
}

/// Planned and actual minutes spent on one subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubjectStats {
    pub planned_time: u32,
    pub actual_time: u32,
    /// Number of planned tasks
    pub count: usize,
}

/// Per-subject totals across `entries`. Orphaned executions are ignored.
pub fn subject_stats(entries: &[HistoryEntry]) -> BTreeMap<Subject, SubjectStats> {
    let mut stats: BTreeMap<Subject, SubjectStats> = BTreeMap::new();
    for entry in entries {
        let record = &entry.record;
        for task in &record.planned_tasks {
            let subject = stats.entry(task.subject).or_default();
            subject.planned_time += task.planned_duration;
            subject.count += 1;
        }
        for execution in record.matched_executions() {
            if let Some(task) = record.task(execution.task_id) {
                stats.entry(task.subject).or_default().actual_time += execution.actual_duration;
            }
        }
    }
    stats
}

/// Means over a run of days.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MetricAverages {
    pub days: usize,
    pub completion_rate: f64,
    pub focus_efficiency: f64,
    pub planning_accuracy: f64,
    /// Sum of actual focus time, in hours
    pub total_focus_hours: f64,
}

/// Averages `metrics`; all zero for an empty slice.
pub fn averages(metrics: &[DailyMetrics]) -> MetricAverages {
    if metrics.is_empty() {
        return MetricAverages::default();
    }
    let n = metrics.len() as f64;
    let mean = |value: fn(&DailyMetrics) -> f64| metrics.iter().map(value).sum::<f64>() / n;
    MetricAverages {
        days: metrics.len(),
        completion_rate: mean(|m| m.completion_rate),
        focus_efficiency: mean(|m| m.focus_efficiency),
        planning_accuracy: mean(|m| m.planning_accuracy),
        total_focus_hours: metrics
            .iter()
            .map(|m| f64::from(m.total_focus_time))
            .sum::<f64>()
            / 60.0,
    }
}
