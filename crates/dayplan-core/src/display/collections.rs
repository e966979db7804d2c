//! Collection wrapper types for displaying lists.
//!
//! This module provides newtype wrappers around vectors so lists of
//! conflicts and finalized days can carry their own markdown rendering.

use std::{fmt, ops::Index};

use super::datetime::{Minutes, Percent};
use crate::{engine::HistoryReport, lifecycle::TaskConflict, store::HistoryEntry};

/// Overlapping task pairs that blocked a confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflicts(pub Vec<TaskConflict>);

impl Conflicts {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Conflicts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No overlapping tasks.");
        }
        writeln!(f, "# Overlapping tasks")?;
        writeln!(f)?;
        for conflict in &self.0 {
            write!(f, "{conflict}")?;
        }
        Ok(())
    }
}

/// Finalized days, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntries(pub Vec<HistoryEntry>);

impl HistoryEntries {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.0.iter()
    }
}

impl Index<usize> for HistoryEntries {
    type Output = HistoryEntry;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IntoIterator for HistoryEntries {
    type Item = HistoryEntry;
    type IntoIter = std::vec::IntoIter<HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a HistoryEntries {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for HistoryEntries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No finalized days found.");
        }

        writeln!(f, "| Date | Tasks | Planned | Actual | Focus | Completion |")?;
        writeln!(f, "|---|---:|---:|---:|---:|---:|")?;
        for entry in &self.0 {
            let summary = &entry.summary;
            writeln!(
                f,
                "| {} | {} | {} | {} | {} | {} |",
                entry.date(),
                entry.record.planned_tasks.len(),
                Minutes(summary.planned_total_time),
                Minutes(summary.actual_total_time),
                Minutes(summary.actual_focus_time),
                Percent(summary.completion_rate),
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for HistoryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Last {} day(s)", self.days)?;
        writeln!(f)?;
        if self.daily.is_empty() {
            return writeln!(f, "No finalized days found.");
        }

        writeln!(
            f,
            "| Date | Completed | Completion | Focus efficiency | Planning accuracy | Focus |"
        )?;
        writeln!(f, "|---|---:|---:|---:|---:|---:|")?;
        for day in &self.daily {
            writeln!(
                f,
                "| {} | {}/{} | {} | {} | {} | {} |",
                day.date,
                day.completed_count,
                day.task_count,
                Percent(day.completion_rate),
                Percent(day.focus_efficiency),
                Percent(day.planning_accuracy),
                Minutes(day.total_focus_time),
            )?;
        }

        let averages = &self.averages;
        writeln!(f, "\n## Averages")?;
        writeln!(f)?;
        writeln!(f, "- Completion: {}", Percent(averages.completion_rate))?;
        writeln!(f, "- Focus efficiency: {}", Percent(averages.focus_efficiency))?;
        writeln!(f, "- Planning accuracy: {}", Percent(averages.planning_accuracy))?;
        writeln!(f, "- Total focus: {:.1}h", averages.total_focus_hours)?;

        if !self.subjects.is_empty() {
            writeln!(f, "\n## Subjects")?;
            writeln!(f)?;
            writeln!(f, "| Subject | Tasks | Planned | Actual |")?;
            writeln!(f, "|---|---:|---:|---:|")?;
            for (subject, stats) in &self.subjects {
                writeln!(
                    f,
                    "| {} | {} | {} | {} |",
                    subject,
                    stats.count,
                    Minutes(stats.planned_time),
                    Minutes(stats.actual_time),
                )?;
            }
        }
        Ok(())
    }
}
