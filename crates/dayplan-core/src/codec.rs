//! Conversion between [`PlanRecord`] and its JSON-safe document form.
//!
//! Times of day are stored as `"HH:MM"`, dates as ISO-8601 strings and
//! timestamps as RFC 3339 strings. Task and execution lists become arrays of
//! flat objects.
//!
//! Decoding is deliberately tolerant. The working document has been written
//! by several versions of the application, so every field falls back to the
//! record default when it is missing or malformed, and legacy key names are
//! honoured when the current ones are absent. Durations are always
//! recomputed from the stored times.

use std::collections::HashSet;

use jiff::{
    civil::{time, Date, DateTime, Time},
    Timestamp,
};
use log::debug;
use serde_json::{json, Map, Value};

use crate::{
    error::{Result, SyncError},
    models::{Execution, PlanRecord, PlanSource, Subject, Task, Weather},
};

/// Start time used when a stored start cannot be parsed.
pub const DEFAULT_START_TIME: Time = time(9, 0, 0, 0);

/// End time used when a stored end cannot be parsed.
pub const DEFAULT_END_TIME: Time = time(10, 0, 0, 0);

const DEFAULT_DIFFICULTY: u8 = 3;
const DEFAULT_POST_ENERGY: u8 = 7;

/// Encodes a record into its document form.
pub fn encode(record: &PlanRecord) -> Value {
    json!({
        "plan_date": record.plan_date.to_string(),
        "weather": record.weather.as_str(),
        "energy_level": record.energy_level,
        "reflection": record.reflection,
        "tasks_confirmed": record.tasks_confirmed,
        "pending_final_confirmation": record.pending_final_confirmation,
        "finalized": record.finalized,
        "planned_tasks": record.planned_tasks.iter().map(encode_task).collect::<Vec<_>>(),
        "actual_executions": record
            .actual_executions
            .iter()
            .map(encode_execution)
            .collect::<Vec<_>>(),
        "plan_source": record.plan_source.tag(),
        "created_at": record.created_at.to_string(),
        "last_modified_at": record.last_modified_at.to_string(),
    })
}

fn encode_task(task: &Task) -> Value {
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
}

fn encode_execution(execution: &Execution) -> Value {
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
}

/// Decodes a standalone record document.
///
/// # Errors
///
/// Returns [`SyncError::MalformedRecord`] only when the value is not an
/// object or carries no recognisable plan date. Every other defect is
/// repaired with a default.
pub fn decode(value: &Value) -> Result<PlanRecord> {
    let object = value.as_object().ok_or_else(|| SyncError::MalformedRecord {
        reason: "record is not a JSON object".to_string(),
    })?;
    let plan_date = str_field(object, &["plan_date", "current_date", "date"])
        .and_then(parse_date)
        .ok_or_else(|| SyncError::MalformedRecord {
            reason: "record has no parseable plan date".to_string(),
        })?;
    Ok(decode_for_date(plan_date, value))
}

/// Decodes a record whose date is known from its position in the store.
///
/// The supplied `plan_date` wins over any date stored inside the value.
/// Non-object values decode to a default record.
pub fn decode_for_date(plan_date: Date, value: &Value) -> PlanRecord {
    let mut record = PlanRecord::new(plan_date, Timestamp::UNIX_EPOCH);
    let Some(object) = value.as_object() else {
        debug!("Entry for {plan_date} is not an object, using defaults");
        return record;
    };

    if let Some(weather) = str_field(object, &["weather", "current_weather"]) {
        record.weather = weather.parse().unwrap_or_else(|_| {
            debug!("Unknown weather '{weather}' for {plan_date}, using default");
            Weather::default()
        });
    }
    record.energy_level = small_int_field(
        object,
        &["energy_level", "current_energy_level"],
        1..=10,
        PlanRecord::DEFAULT_ENERGY_LEVEL,
    );
    record.reflection = str_field(object, &["reflection", "current_reflection"])
        .unwrap_or_default()
        .to_string();
    record.tasks_confirmed = bool_field(object, &["tasks_confirmed"]);
    record.pending_final_confirmation =
        bool_field(object, &["pending_final_confirmation", "show_final_confirmation"]);
    record.finalized = bool_field(object, &["finalized", "tasks_saved"]);

    let tasks = array_field(object, &["planned_tasks"])
        .iter()
        .enumerate()
        .filter_map(|(index, value)| decode_task(index, value))
        .collect();
    record.planned_tasks = assign_task_ids(tasks);
    record.actual_executions = array_field(object, &["actual_executions", "actual_execution"])
        .iter()
        .filter_map(decode_execution)
        .collect();

    if let Some(source) = str_field(object, &["plan_source"]) {
        record.plan_source = source.parse().unwrap_or_else(|_| {
            debug!("Unknown plan source '{source}' for {plan_date}, using default");
            PlanSource::default()
        });
    }
    record.created_at = timestamp_field(object, &["created_at"]);
    record.last_modified_at = timestamp_field(object, &["last_modified_at", "last_auto_save"]);

    record
}

/// Decodes one planned task along with its stored id, if it had a usable
/// one. The task itself carries a placeholder id until
/// [`assign_task_ids`] runs.
fn decode_task(index: usize, value: &Value) -> Option<(Option<u32>, Task)> {
    let Some(object) = value.as_object() else {
        debug!("Skipping planned task #{index}: not an object");
        return None;
    };
    let task_id = int_field(object, &["task_id"])
        .and_then(|id| u32::try_from(id).ok())
        .filter(|id| *id > 0);
    let name = str_field(object, &["name", "task_name"]).unwrap_or_default();
    let subject = str_field(object, &["subject"])
        .and_then(|s| s.parse::<Subject>().ok())
        .unwrap_or_default();
    let difficulty = small_int_field(object, &["difficulty"], 1..=5, DEFAULT_DIFFICULTY);
    let start = time_field(object, &["start_time", "planned_start_time"], DEFAULT_START_TIME);
    let end = time_field(object, &["end_time", "planned_end_time"], DEFAULT_END_TIME);

    Some((task_id, Task::new(0, name, subject, difficulty, start, end)))
}

/// Keeps the first occurrence of every stored id. Missing and repeated ids
/// are numbered after the highest stored one, in document order.
fn assign_task_ids(decoded: Vec<(Option<u32>, Task)>) -> Vec<Task> {
    let mut next_id = decoded
        .iter()
        .filter_map(|(id, _)| *id)
        .max()
        .unwrap_or(0)
        .saturating_add(1);
    let mut seen = HashSet::with_capacity(decoded.len());
    decoded
        .into_iter()
        .map(|(stored, mut task)| {
            task.task_id = match stored {
                Some(id) if seen.insert(id) => id,
                _ => {
                    let id = next_id;
                    next_id = next_id.saturating_add(1);
                    seen.insert(id);
                    debug!("Assigned id {id} to planned task '{}'", task.name);
                    id
                }
            };
            task
        })
        .collect()
}

fn decode_execution(value: &Value) -> Option<Execution> {
    let object = value.as_object()?;
    let task_id = int_field(object, &["task_id"])
        .and_then(|id| u32::try_from(id).ok())
        .unwrap_or(0);
    let start = time_field(object, &["actual_start_time"], DEFAULT_START_TIME);
    let end = time_field(object, &["actual_end_time"], DEFAULT_END_TIME);
    let post_energy = small_int_field(object, &["post_energy"], 1..=10, DEFAULT_POST_ENERGY);
    let completed = object
        .get("completed")
        .and_then(Value::as_bool)
        .unwrap_or(true);
    let interruptions = int_field(object, &["interruptions"])
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0);

    Some(Execution::new(task_id, start, end, post_energy, completed).with_interruptions(interruptions))
}

/// Formats a time of day as `HH:MM`.
pub fn format_time(time: Time) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Parses `HH:MM` (or `HH:MM:SS`, seconds dropped) into a time of day.
pub fn parse_time(text: &str) -> Option<Time> {
    let mut parts = text.trim().split(':');
    let hour = parts.next()?.parse::<i8>().ok()?;
    let minute = parts.next()?.parse::<i8>().ok()?;
    if let Some(second) = parts.next() {
        second.parse::<i8>().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Time::new(hour, minute, 0, 0).ok()
}

/// Parses an ISO-8601 date, also accepting a full date-time.
pub fn parse_date(text: &str) -> Option<Date> {
    let text = text.trim();
    text.parse::<Date>()
        .ok()
        .or_else(|| text.parse::<DateTime>().ok().map(|dt| dt.date()))
}

fn field<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
}

fn str_field<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    field(object, keys).and_then(Value::as_str)
}

fn bool_field(object: &Map<String, Value>, keys: &[&str]) -> bool {
    field(object, keys).and_then(Value::as_bool).unwrap_or(false)
}

fn int_field(object: &Map<String, Value>, keys: &[&str]) -> Option<i64> {
    match field(object, keys)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn small_int_field(
    object: &Map<String, Value>,
    keys: &[&str],
    range: std::ops::RangeInclusive<u8>,
    default: u8,
) -> u8 {
    int_field(object, keys)
        .map(|n| n.clamp(i64::from(*range.start()), i64::from(*range.end())) as u8)
        .unwrap_or(default)
}

fn array_field<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> &'a [Value] {
    field(object, keys)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn time_field(object: &Map<String, Value>, keys: &[&str], default: Time) -> Time {
    match str_field(object, keys) {
        Some(text) => parse_time(text).unwrap_or_else(|| {
            debug!("Unparseable time '{text}', falling back to {}", format_time(default));
            default
        }),
        None => default,
    }
}

fn timestamp_field(object: &Map<String, Value>, keys: &[&str]) -> Timestamp {
    str_field(object, keys)
        .and_then(|text| {
            text.parse::<Timestamp>().ok().or_else(|| {
                // Earlier versions wrote naive local date-times
                text.parse::<DateTime>()
                    .ok()
                    .and_then(|dt| dt.to_zoned(jiff::tz::TimeZone::UTC).ok())
                    .map(|zoned| zoned.timestamp())
            })
        })
        .unwrap_or(Timestamp::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    fn sample_record() -> PlanRecord {
        let now: Timestamp = "2026-10-19T08:15:30Z".parse().unwrap();
        let mut record = PlanRecord::new(date(2026, 10, 19), now);
        record.weather = Weather::Rainy;
        record.energy_level = 6;
        record.reflection = "Focus dropped after lunch".to_string();
        record.tasks_confirmed = true;
        record.planned_tasks = vec![
            Task::new(1, "Group theory", Subject::Math, 4, time(9, 0, 0, 0), time(10, 30, 0, 0)),
            Task::new(2, "Night reading", Subject::Econ, 2, time(23, 0, 0, 0), time(0, 30, 0, 0)),
        ];
        record.actual_executions =
            vec![Execution::new(1, time(9, 5, 0, 0), time(10, 20, 0, 0), 5, true).with_interruptions(2)];
        record.plan_source = PlanSource::InheritedFrom(date(2026, 10, 18));
        record.last_modified_at = "2026-10-19T09:00:00Z".parse().unwrap();
        record
    }

    #[test]
    fn round_trip_preserves_record() {
        let record = sample_record();
        let decoded = decode(&encode(&record)).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn encode_uses_flat_strings() {
        let value = encode(&sample_record());
        assert_eq!(value["plan_date"], "2026-10-19");
        assert_eq!(value["planned_tasks"][1]["start_time"], "23:00");
        assert_eq!(value["planned_tasks"][1]["planned_duration"], 90);
        assert_eq!(value["actual_executions"][0]["actual_end_time"], "10:20");
        assert_eq!(value["plan_source"], "inherited_from_2026-10-18");
    }

    #[test]
    fn malformed_times_fall_back_to_defaults() {
        let value = json!({
            "plan_date": "2026-10-19",
            "planned_tasks": [
                {"task_id": 1, "name": "Broken", "start_time": "nine", "end_time": "25:99"}
            ],
            "actual_executions": [
                {"task_id": 1, "actual_start_time": 42}
            ]
        });
        let record = decode(&value).unwrap();
        let task = &record.planned_tasks[0];
        assert_eq!(task.start_time, DEFAULT_START_TIME);
        assert_eq!(task.end_time, DEFAULT_END_TIME);
        assert_eq!(task.planned_duration, 60);
        assert_eq!(record.actual_executions[0].actual_start_time, DEFAULT_START_TIME);
    }

    #[test]
    fn missing_fields_use_record_defaults() {
        let record = decode_for_date(date(2026, 10, 19), &json!({}));
        assert_eq!(record, PlanRecord::new(date(2026, 10, 19), Timestamp::UNIX_EPOCH));
    }

    #[test]
    fn legacy_keys_are_honoured() {
        let value = json!({
            "current_date": "2026-10-17",
            "current_weather": "多云",
            "current_energy_level": 9,
            "current_reflection": "ok",
            "tasks_confirmed": true,
            "show_final_confirmation": true,
            "tasks_saved": false,
            "planned_tasks": [
                {"task_id": 1, "task_name": "Linear algebra", "subject": "math",
                 "planned_start_time": "14:00", "planned_end_time": "15:30", "difficulty": 3}
            ],
            "actual_execution": [
                {"task_id": 1, "actual_start_time": "14:10:00", "actual_end_time": "15:20",
                 "post_energy": 6, "completed": true}
            ],
            "last_auto_save": "2026-10-17T15:21:00"
        });
        let record = decode(&value).unwrap();
        assert_eq!(record.plan_date, date(2026, 10, 17));
        assert_eq!(record.weather, Weather::Cloudy);
        assert_eq!(record.energy_level, 9);
        assert!(record.pending_final_confirmation);
        assert_eq!(record.planned_tasks[0].name, "Linear algebra");
        assert_eq!(record.planned_tasks[0].planned_duration, 90);
        assert_eq!(record.actual_executions[0].actual_start_time, time(14, 10, 0, 0));
        assert_eq!(
            record.last_modified_at,
            "2026-10-17T15:21:00Z".parse::<Timestamp>().unwrap()
        );
    }

    #[test]
    fn out_of_range_numbers_are_clamped() {
        let value = json!({
            "plan_date": "2026-10-19",
            "energy_level": 42,
            "planned_tasks": [{"name": "x", "difficulty": -3}]
        });
        let record = decode(&value).unwrap();
        assert_eq!(record.energy_level, 10);
        assert_eq!(record.planned_tasks[0].difficulty, 1);
        assert_eq!(record.planned_tasks[0].task_id, 1);
    }

    #[test]
    fn missing_and_repeated_task_ids_are_renumbered() {
        let value = json!({
            "plan_date": "2026-10-19",
            "planned_tasks": [
                {"task_id": 2, "name": "A"},
                {"name": "B"},
                {"task_id": 2, "name": "C"},
                {"task_id": 1, "name": "D"}
            ]
        });
        let record = decode(&value).unwrap();
        let ids: Vec<u32> = record.planned_tasks.iter().map(|t| t.task_id).collect();
        assert_eq!(ids, vec![2, 3, 4, 1]);
        assert_eq!(record.planned_tasks[1].name, "B");
    }

    #[test]
    fn decode_without_date_is_malformed() {
        let err = decode(&json!({"weather": "sunny"})).unwrap_err();
        assert!(matches!(err, SyncError::MalformedRecord { .. }));
        assert!(decode(&json!([1, 2])).is_err());
    }

    #[test]
    fn parse_time_accepts_seconds_and_rejects_garbage() {
        assert_eq!(parse_time("07:05"), Some(time(7, 5, 0, 0)));
        assert_eq!(parse_time("07:05:59"), Some(time(7, 5, 0, 0)));
        assert_eq!(parse_time("24:00"), None);
        assert_eq!(parse_time("7"), None);
        assert_eq!(parse_time("07:05:00:00"), None);
    }

    #[test]
    fn parse_date_accepts_date_times() {
        assert_eq!(parse_date("2026-10-19"), Some(date(2026, 10, 19)));
        assert_eq!(parse_date("2026-10-19T12:00:00"), Some(date(2026, 10, 19)));
        assert_eq!(parse_date("19/10/2026"), None);
    }
}
