//! Data models for daily plan records.
//!
//! A [`PlanRecord`] is the unit of persistence: one calendar date with its
//! planned [`Task`]s, the recorded [`Execution`]s and the confirmation flags
//! that drive the record lifecycle. Display implementations for these models
//! are located in [`crate::display::models`] so that presentation stays out
//! of the data definitions.
//!
//! # Derived fields
//!
//! Durations are never entered directly. [`Task::new`] and
//! [`Execution::new`] derive them from the time-of-day pair, wrapping past
//! midnight when the end is not after the start, and apply the fixed
//! [`FOCUS_RATIO_PERCENT`] to get the focus duration.
//!
//! # Examples
//!
//! ```rust
//! use dayplan_core::models::{PlanRecord, Subject, Task};
//! use jiff::{Timestamp, civil::{date, time}};
//!
//! let mut record = PlanRecord::new(date(2026, 10, 19), Timestamp::UNIX_EPOCH);
//! let task = Task::new(1, "Group theory", Subject::Math, 3, time(23, 0, 0, 0), time(1, 0, 0, 0));
//! assert_eq!(task.planned_duration, 120);
//! assert_eq!(task.planned_focus_duration, 96);
//!
//! record.planned_tasks.push(task);
//! assert!(!record.is_empty());
//! ```

pub mod kinds;
pub mod record;
pub mod summary;
pub mod task;


pub use kinds::{DateStatus, PlanSource, Subject, Weather};
pub use record::PlanRecord;
pub use summary::DailySummary;
pub use task::{Execution, Task, FOCUS_RATIO_PERCENT, MINUTES_PER_DAY};
