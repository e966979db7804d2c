//! Planned task and execution models.

use jiff::civil::Time;

use super::Subject;

/// Share of a duration assumed to be spent focused, in percent.
pub const FOCUS_RATIO_PERCENT: u32 = 80;

/// Minutes in one day, the wrap-around length for overnight intervals.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A task planned for the day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Sequential identifier within the record (1-based)
    pub task_id: u32,

    /// Short name of the task; unnamed tasks are treated as drafts
    pub name: String,

    pub subject: Subject,

    /// Difficulty from 1 (easy) to 5 (hard)
    pub difficulty: u8,

    pub start_time: Time,

    pub end_time: Time,

    /// Minutes between start and end, wrapping past midnight
    pub planned_duration: u32,

    /// Focused share of the planned duration
    pub planned_focus_duration: u32,
}

impl Task {
    /// Creates a task, deriving both durations from the interval.
    pub fn new(
        task_id: u32,
        name: impl Into<String>,
        subject: Subject,
        difficulty: u8,
        start_time: Time,
        end_time: Time,
    ) -> Self {
        let start_time = to_minute(start_time);
        let end_time = to_minute(end_time);
        let planned_duration = span_minutes(start_time, end_time);
        Self {
            task_id,
            name: name.into(),
            subject,
            difficulty: difficulty.clamp(1, 5),
            start_time,
            end_time,
            planned_duration,
            planned_focus_duration: focus_minutes(planned_duration),
        }
    }

    /// Whether the task has a non-blank name.
    pub fn is_named(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// The planned interval as minutes since midnight, with the end rolled
    /// forward by one day when it is not after the start.
    pub fn interval(&self) -> (u32, u32) {
        let start = minute_of_day(self.start_time);
        (start, start + self.planned_duration)
    }
}

/// The recorded execution of a planned task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    /// Identifier of the planned task this execution belongs to
    pub task_id: u32,

    pub actual_start_time: Time,

    pub actual_end_time: Time,

    pub actual_duration: u32,

    pub actual_focus_duration: u32,

    /// Number of interruptions during the execution
    pub interruptions: u32,

    /// Energy level after the task, 1 to 10
    pub post_energy: u8,

    pub completed: bool,
}

impl Execution {
    /// Creates an execution, deriving both durations from the interval.
    pub fn new(
        task_id: u32,
        actual_start_time: Time,
        actual_end_time: Time,
        post_energy: u8,
        completed: bool,
    ) -> Self {
        let actual_start_time = to_minute(actual_start_time);
        let actual_end_time = to_minute(actual_end_time);
        let actual_duration = span_minutes(actual_start_time, actual_end_time);
        Self {
            task_id,
            actual_start_time,
            actual_end_time,
            actual_duration,
            actual_focus_duration: focus_minutes(actual_duration),
            interruptions: 0,
            post_energy: post_energy.clamp(1, 10),
            completed,
        }
    }

    /// Sets the interruption count.
    pub fn with_interruptions(mut self, interruptions: u32) -> Self {
        self.interruptions = interruptions;
        self
    }
}

/// Minutes since midnight.
pub(crate) fn minute_of_day(time: Time) -> u32 {
    // hour() and minute() are never negative for a valid civil time
    time.hour().unsigned_abs() as u32 * 60 + time.minute().unsigned_abs() as u32
}

/// Minutes from `start` to `end`, wrapping to the next day when
/// `end <= start`.
pub fn span_minutes(start: Time, end: Time) -> u32 {
    let start = minute_of_day(start);
    let end = minute_of_day(end);
    if end <= start {
        end + MINUTES_PER_DAY - start
    } else {
        end - start
    }
}

/// Focused share of `minutes`, rounded down.
pub fn focus_minutes(minutes: u32) -> u32 {
    minutes * FOCUS_RATIO_PERCENT / 100
}

/// Drops seconds and sub-seconds.
pub(crate) fn to_minute(time: Time) -> Time {
    Time::new(time.hour(), time.minute(), 0, 0).unwrap_or(time)
}
