//! Change fingerprints over the meaningful part of a plan record.
//!
//! The fingerprint is a cheap equality oracle used to skip saves that would
//! write back identical content. It hashes a reduced projection of the
//! record (timestamps and presentation-only state are left out) rendered as
//! compact JSON, so two projections with the same content hash the same
//! regardless of how they were built.

use std::fmt;

use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use crate::{codec::format_time, models::PlanRecord};

/// Hex-encoded SHA-256 of a record's meaningful content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// The hex digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Computes the fingerprint of `record`.
pub fn fingerprint(record: &PlanRecord) -> Fingerprint {
    fingerprint_value(&projection(record))
}

/// Computes the fingerprint of an arbitrary JSON value.
///
/// `serde_json` maps are ordered by key, so the compact rendering is already
/// canonical.
pub fn fingerprint_value(value: &Value) -> Fingerprint {
    Fingerprint(hex::encode(Sha256::digest(value.to_string().as_bytes())))
}

/// The subset of a record that counts as user-visible content.
fn projection(record: &PlanRecord) -> Value {
    let tasks: Vec<Value> = record
        .planned_tasks
        .iter()
        .map(|task| {
            json!({
                "task_id": task.task_id,
                "name": task.name,
                "subject": task.subject.as_str(),
                "difficulty": task.difficulty,
                "start_time": format_time(task.start_time),
                "end_time": format_time(task.end_time),
                "planned_duration": task.planned_duration,
                "planned_focus_duration": task.planned_focus_duration,
            })
        })
        .collect();
    let executions: Vec<Value> = record
        .actual_executions
        .iter()
        .map(|execution| {
            json!({
                "task_id": execution.task_id,
                "actual_start_time": format_time(execution.actual_start_time),
                "actual_end_time": format_time(execution.actual_end_time),
                "actual_duration": execution.actual_duration,
                "actual_focus_duration": execution.actual_focus_duration,
                "interruptions": execution.interruptions,
                "post_energy": execution.post_energy,
                "completed": execution.completed,
            })
        })
        .collect();

    json!({
        "plan_date": record.plan_date.to_string(),
        "weather": record.weather.as_str(),
        "energy_level": record.energy_level,
        "reflection": record.reflection,
        "tasks_confirmed": record.tasks_confirmed,
        "pending_final_confirmation": record.pending_final_confirmation,
        "finalized": record.finalized,
        "planned_tasks": tasks,
        "actual_executions": executions,
    })
}
