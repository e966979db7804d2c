//! Parameter structures for engine operations.
//!
//! These structures carry user input into the [`SyncEngine`] without tying
//! the core to an interface framework. Times and enums travel as strings and
//! are parsed and validated here, so every interface reports the same
//! `InvalidInput` errors.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │  Core Params    │    │   SyncEngine    │
//! │  (clap derives) │───▶│ (plain structs) │───▶│  (validated)    │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! [`SyncEngine`]: crate::engine::SyncEngine

use std::str::FromStr;

use jiff::civil::Time;

use crate::{
    codec::parse_time,
    error::{Result, SyncError},
    models::{Execution, Subject, Task, Weather},
};

/// A task as entered by the user.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    /// Name of the task (required)
    pub name: String,
    /// Subject name, unknown values fall back to `other`
    pub subject: Option<String>,
    /// Difficulty from 1 to 5, defaults to 3
    pub difficulty: Option<u8>,
    /// Start time, `HH:MM`
    pub start_time: String,
    /// End time, `HH:MM`; an end not after the start runs past midnight
    pub end_time: String,
}

impl TaskDraft {
    /// Validates the draft and builds the task with identifier `task_id`.
    ///
    /// # Errors
    ///
    /// * `SyncError::InvalidInput` - blank name, malformed time or a
    ///   difficulty outside 1-5
    pub fn to_task(&self, task_id: u32) -> Result<Task> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(SyncError::invalid_input("name").with_reason("Task name cannot be empty"));
        }
        let difficulty = self.difficulty.unwrap_or(3);
        if !(1..=5).contains(&difficulty) {
            return Err(SyncError::invalid_input("difficulty")
                .with_reason(format!("Difficulty must be between 1 and 5, got {difficulty}")));
        }
        let subject = self
            .subject
            .as_deref()
            .map(|s| Subject::from_str(s).unwrap_or_default())
            .unwrap_or_default();

        Ok(Task::new(
            task_id,
            name,
            subject,
            difficulty,
            time_input("start_time", &self.start_time)?,
            time_input("end_time", &self.end_time)?,
        ))
    }
}

/// An execution as entered by the user.
#[derive(Debug, Clone, Default)]
pub struct ExecutionDraft {
    /// Identifier of the planned task
    pub task_id: u32,
    pub start_time: String,
    pub end_time: String,
    /// Energy after the task, 1 to 10
    pub post_energy: u8,
    pub interruptions: u32,
    pub completed: bool,
}

impl ExecutionDraft {
    /// Validates the draft and builds the execution.
    ///
    /// # Errors
    ///
    /// * `SyncError::InvalidInput` - malformed time or energy outside 1-10
    pub fn to_execution(&self) -> Result<Execution> {
        energy_input("post_energy", self.post_energy)?;
        Ok(Execution::new(
            self.task_id,
            time_input("start_time", &self.start_time)?,
            time_input("end_time", &self.end_time)?,
            self.post_energy,
            self.completed,
        )
        .with_interruptions(self.interruptions))
    }
}

/// Partial update of the record's day-level fields.
#[derive(Debug, Clone, Default)]
pub struct RecordUpdate {
    pub weather: Option<String>,
    pub energy_level: Option<u8>,
    pub reflection: Option<String>,
}

impl RecordUpdate {
    /// Whether the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.weather.is_none() && self.energy_level.is_none() && self.reflection.is_none()
    }

    /// Parses the weather and checks the energy range.
    ///
    /// # Errors
    ///
    /// * `SyncError::InvalidInput` - unknown weather or energy outside 1-10
    pub fn validate(&self) -> Result<(Option<Weather>, Option<u8>)> {
        let weather = match &self.weather {
            Some(text) => Some(Weather::from_str(text).map_err(|_| {
                SyncError::invalid_input("weather").with_reason(format!(
                    "Invalid weather: {text}. Must be one of {}",
                    Weather::ALL
                        .iter()
                        .map(Weather::as_str)
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })?),
            None => None,
        };
        if let Some(energy) = self.energy_level {
            energy_input("energy_level", energy)?;
        }
        Ok((weather, self.energy_level))
    }
}

/// Operator maintenance request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupRequest {
    /// Drop working entries older than this many days before today
    RetentionDays(u32),
    /// Drop the in-memory session and reload it from the store
    ClearCache,
    /// Delete the working document and reset the session
    ClearAll,
}

fn time_input(field: &str, text: &str) -> Result<Time> {
    parse_time(text).ok_or_else(|| {
        SyncError::invalid_input(field).with_reason(format!("Invalid time '{text}', expected HH:MM"))
    })
}

fn energy_input(field: &str, energy: u8) -> Result<()> {
    if (1..=10).contains(&energy) {
        Ok(())
    } else {
        Err(SyncError::invalid_input(field)
            .with_reason(format!("Energy must be between 1 and 10, got {energy}")))
    }
}
