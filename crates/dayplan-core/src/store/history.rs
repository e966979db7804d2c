//! Append-oriented log of finalized days.

use std::{fmt, sync::Arc};

use jiff::{civil::Date, ToSpan};
use log::{info, warn};
use serde_json::{json, Map, Value};

use super::BlobStore;
use crate::{
    codec::{self, parse_date},
    error::Result,
    models::{DailySummary, PlanRecord},
};

/// A finalized record together with its summary.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub record: PlanRecord,
    pub summary: DailySummary,
}

impl HistoryEntry {
    pub fn date(&self) -> Date {
        self.record.plan_date
    }
}

/// JSON array of finalized days, newest first, one entry per date.
///
/// The log is never trimmed by a retention policy. Documents written as
/// newline-delimited records are read as well and rewritten as an array on
/// the next append.
#[derive(Clone)]
pub struct HistoryLog {
    blob: Arc<dyn BlobStore>,
    key: String,
}

impl HistoryLog {
    pub fn new(blob: Arc<dyn BlobStore>, key: impl Into<String>) -> Self {
        Self {
            blob,
            key: key.into(),
        }
    }

    /// Appends `record`, replacing an earlier entry for the same date.
    pub fn append(&self, record: &PlanRecord) -> Result<HistoryEntry> {
        let summary = DailySummary::from_record(record);
        let mut entries = self.load_values()?;
        let date_key = record.plan_date.to_string();
        entries.retain(|value| entry_date(value) != Some(record.plan_date));

        let mut encoded = codec::encode(record);
        if let Value::Object(ref mut object) = encoded {
            object.insert("date".to_string(), Value::String(date_key));
            object.insert("daily_summary".to_string(), encode_summary(&summary));
        }
        entries.push(encoded);
        // Undated entries sink to the end
        entries.sort_by(|a, b| entry_date(b).cmp(&entry_date(a)));

        let content = serde_json::to_string_pretty(&entries)?;
        self.blob.put_raw(
            &self.key,
            &content,
            &format!("Record finalized day {}", record.plan_date),
        )?;
        info!("Appended {} to history log", record.plan_date);

        Ok(HistoryEntry {
            record: record.clone(),
            summary,
        })
    }

    /// Every decodable entry, newest first.
    pub fn all(&self) -> Result<Vec<HistoryEntry>> {
        Ok(self
            .load_values()?
            .iter()
            .filter_map(decode_entry)
            .collect())
    }

    /// Entries dated within the last `days` days before `today`, inclusive.
    pub fn recent(&self, days: u32, today: Date) -> Result<Vec<HistoryEntry>> {
        let cutoff = today
            .checked_sub(i64::from(days).days())
            .unwrap_or(Date::MIN);
        Ok(self
            .all()?
            .into_iter()
            .filter(|entry| entry.date() >= cutoff)
            .collect())
    }

    /// The entry for `date`.
    pub fn get(&self, date: Date) -> Result<Option<HistoryEntry>> {
        Ok(self.all()?.into_iter().find(|entry| entry.date() == date))
    }

    fn load_values(&self) -> Result<Vec<Value>> {
        let Some(document) = self.blob.get_raw(&self.key)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Value>(&document.content) {
            Ok(Value::Array(entries)) => Ok(entries),
            _ => {
                let entries: Vec<Value> = document
                    .content
                    .lines()
                    .filter(|line| !line.trim().is_empty())
                    .filter_map(|line| serde_json::from_str(line).ok())
                    .collect();
                if entries.is_empty() && !document.content.trim().is_empty() {
                    warn!("History log '{}' could not be parsed", self.key);
                }
                Ok(entries)
            }
        }
    }
}

impl fmt::Debug for HistoryLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryLog")
            .field("backend", &self.blob.describe())
            .field("key", &self.key)
            .finish()
    }
}

fn entry_date(value: &Value) -> Option<Date> {
    let object = value.as_object()?;
    ["plan_date", "date"]
        .iter()
        .filter_map(|key| object.get(*key).and_then(Value::as_str))
        .find_map(parse_date)
}

fn decode_entry(value: &Value) -> Option<HistoryEntry> {
    let date = entry_date(value)?;
    let record = codec::decode_for_date(date, value);
    let summary = value
        .get("daily_summary")
        .and_then(Value::as_object)
        .map(|object| decode_summary(object, &record))
        .unwrap_or_else(|| DailySummary::from_record(&record));
    Some(HistoryEntry { record, summary })
}

fn encode_summary(summary: &DailySummary) -> Value {
    json!({
        "planned_total_time": summary.planned_total_time,
        "actual_total_time": summary.actual_total_time,
        "planned_focus_time": summary.planned_focus_time,
        "actual_focus_time": summary.actual_focus_time,
        "completion_rate": summary.completion_rate,
        "reflection": summary.reflection,
    })
}

/// Stored summaries win over recomputation: early log entries only kept
/// durations, not the times they could be rebuilt from.
fn decode_summary(object: &Map<String, Value>, record: &PlanRecord) -> DailySummary {
    let computed = DailySummary::from_record(record);
    let minutes = |key: &str, fallback: u32| {
        object
            .get(key)
            .and_then(Value::as_f64)
            .map(|n| n.max(0.0) as u32)
            .unwrap_or(fallback)
    };
    DailySummary {
        planned_total_time: minutes("planned_total_time", computed.planned_total_time),
        actual_total_time: minutes("actual_total_time", computed.actual_total_time),
        planned_focus_time: minutes("planned_focus_time", computed.planned_focus_time),
        actual_focus_time: minutes("actual_focus_time", computed.actual_focus_time),
        completion_rate: object
            .get("completion_rate")
            .and_then(Value::as_f64)
            .unwrap_or(computed.completion_rate),
        reflection: object
            .get("reflection")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or(computed.reflection),
    }
}

#[cfg(test)]
mod tests {
    use jiff::{
        civil::{date, time},
        Timestamp,
    };

    use super::*;
    use crate::{
        models::{Execution, Subject, Task},
        store::MemoryBlobStore,
    };

    fn create_test_log() -> (Arc<MemoryBlobStore>, HistoryLog) {
        let blob = Arc::new(MemoryBlobStore::new());
        let log = HistoryLog::new(blob.clone(), "history.json");
        (blob, log)
    }

    fn finalized(day: i8) -> PlanRecord {
        let mut record = PlanRecord::new(date(2026, 10, day), Timestamp::UNIX_EPOCH);
        record.planned_tasks = vec![Task::new(
            1,
            "Topology",
            Subject::Math,
            3,
            time(9, 0, 0, 0),
            time(11, 0, 0, 0),
        )];
        record.actual_executions = vec![Execution::new(
            1,
            time(9, 0, 0, 0),
            time(10, 30, 0, 0),
            6,
            true,
        )];
        record.tasks_confirmed = true;
        record.finalized = true;
        record
    }

    #[test]
    fn append_keeps_one_entry_per_date_newest_first() {
        let (_blob, log) = create_test_log();
        log.append(&finalized(1)).unwrap();
        log.append(&finalized(3)).unwrap();
        log.append(&finalized(2)).unwrap();
        let mut again = finalized(3);
        again.reflection = "second pass".to_string();
        log.append(&again).unwrap();

        let entries = log.all().unwrap();
        let dates: Vec<Date> = entries.iter().map(HistoryEntry::date).collect();
        assert_eq!(dates, vec![date(2026, 10, 3), date(2026, 10, 2), date(2026, 10, 1)]);
        assert_eq!(entries[0].summary.reflection, "second pass");
    }

    #[test]
    fn appended_entry_carries_summary() {
        let (_blob, log) = create_test_log();
        let entry = log.append(&finalized(5)).unwrap();
        assert_eq!(entry.summary.planned_total_time, 120);
        assert_eq!(entry.summary.actual_total_time, 90);
        assert_eq!(log.get(date(2026, 10, 5)).unwrap(), Some(entry));
    }

    #[test]
    fn recent_filters_by_cutoff() {
        let (_blob, log) = create_test_log();
        for day in [1, 10, 18, 19] {
            log.append(&finalized(day)).unwrap();
        }
        let recent = log.recent(7, date(2026, 10, 19)).unwrap();
        assert_eq!(recent.len(), 2);
    }

    #[test]
    fn reads_legacy_newline_delimited_log() {
        let (blob, log) = create_test_log();
        let legacy = concat!(
            r#"{"date": "2026-09-01", "weather": "晴", "energy_level": 8, "planned_tasks": [], "actual_execution": [], "#,
            r#""daily_summary": {"planned_total_time": 180, "actual_total_time": 150, "planned_focus_time": 144, "actual_focus_time": 120, "completion_rate": 0.75}}"#,
            "\n\n",
            r#"{"date": "2026-09-02", "planned_tasks": []}"#,
            "\n"
        );
        blob.put_raw("history.json", legacy, "seed").unwrap();

        let entries = log.all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].summary.planned_total_time, 180);
        assert!((entries[0].summary.completion_rate - 0.75).abs() < f64::EPSILON);
        assert_eq!(entries[1].summary.planned_total_time, 0);

        log.append(&finalized(3)).unwrap();
        let content = blob.get_raw("history.json").unwrap().unwrap().content;
        assert!(content.trim_start().starts_with('['));
        assert_eq!(log.all().unwrap().len(), 3);
    }
}
