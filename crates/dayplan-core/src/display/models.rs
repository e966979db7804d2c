//! Display implementations for domain models.
//!
//! Records render as markdown: a header, a metadata list and one table each
//! for tasks and executions.

use std::fmt;

use super::datetime::{LocalDateTime, Minutes, Percent, TimeRange};
use crate::{
    lifecycle::TaskConflict,
    models::{DailySummary, DateStatus, Execution, PlanRecord, PlanSource, Subject, Task, Weather},
};

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PlanSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

impl fmt::Display for DateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PlanRecord {
    /// Short label for where the record is in its lifecycle.
    pub fn stage(&self) -> &'static str {
        if self.finalized {
            "finalized"
        } else if self.pending_final_confirmation {
            "in review"
        } else if self.tasks_confirmed {
            "confirmed"
        } else {
            "draft"
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "| {} | {} | {} | {} | {} | {} | {} |",
            self.task_id,
            if self.is_named() { self.name.as_str() } else { "*(unnamed)*" },
            self.subject,
            self.difficulty,
            TimeRange(self.start_time, self.end_time),
            Minutes(self.planned_duration),
            Minutes(self.planned_focus_duration),
        )
    }
}

impl fmt::Display for Execution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "| {} | {} | {} | {} | {} | {} | {} |",
            self.task_id,
            TimeRange(self.actual_start_time, self.actual_end_time),
            Minutes(self.actual_duration),
            Minutes(self.actual_focus_duration),
            self.interruptions,
            self.post_energy,
            if self.completed { "yes" } else { "no" },
        )
    }
}

impl fmt::Display for PlanRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Plan for {}", self.plan_date)?;
        writeln!(f)?;

        writeln!(f, "- Stage: {}", self.stage())?;
        writeln!(f, "- Weather: {}", self.weather)?;
        writeln!(f, "- Energy: {}/10", self.energy_level)?;
        writeln!(f, "- Source: {}", self.plan_source)?;
        writeln!(f, "- Modified: {}", LocalDateTime(&self.last_modified_at))?;

        writeln!(f, "\n## Tasks")?;
        writeln!(f)?;
        if self.planned_tasks.is_empty() {
            writeln!(f, "No tasks planned.")?;
        } else {
            writeln!(f, "| ID | Task | Subject | Difficulty | Time | Planned | Focus |")?;
            writeln!(f, "|---:|---|---|---:|---|---:|---:|")?;
            for task in &self.planned_tasks {
                write!(f, "{task}")?;
            }
        }

        if !self.actual_executions.is_empty() {
            writeln!(f, "\n## Executions")?;
            writeln!(f)?;
            writeln!(f, "| Task | Time | Actual | Focus | Interruptions | Energy | Done |")?;
            writeln!(f, "|---:|---|---:|---:|---:|---:|:---:|")?;
            for execution in &self.actual_executions {
                write!(f, "{execution}")?;
            }
            let orphaned = self.orphaned_executions().count();
            if orphaned > 0 {
                writeln!(f)?;
                writeln!(f, "{orphaned} execution(s) reference no planned task and are not counted.")?;
            }
        }

        if !self.reflection.is_empty() {
            writeln!(f, "\n## Reflection")?;
            writeln!(f)?;
            writeln!(f, "{}", self.reflection)?;
        }

        Ok(())
    }
}

impl fmt::Display for DailySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "- Planned: {} ({} focus)",
            Minutes(self.planned_total_time),
            Minutes(self.planned_focus_time)
        )?;
        writeln!(
            f,
            "- Actual: {} ({} focus)",
            Minutes(self.actual_total_time),
            Minutes(self.actual_focus_time)
        )?;
        writeln!(f, "- Completion: {}", Percent(self.completion_rate))
    }
}

impl fmt::Display for TaskConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "- Task {} '{}' ({}) overlaps task {} '{}' ({})",
            self.first.task_id,
            self.first.name,
            TimeRange(self.first.start_time, self.first.end_time),
            self.second.task_id,
            self.second.name,
            TimeRange(self.second.start_time, self.second.end_time),
        )
    }
}
