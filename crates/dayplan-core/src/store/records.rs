//! Date-keyed record mapping on top of a single document.

use std::{collections::BTreeMap, fmt, sync::Arc};

use jiff::civil::Date;
use log::{debug, info, warn};
use serde_json::{Map, Value};

use super::BlobStore;
use crate::{
    codec::{self, parse_date},
    error::Result,
    models::PlanRecord,
};

/// How many date entries the working document keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionPolicy {
    /// Keep only the `n` most recent dates
    KeepLatest(usize),
    /// Never trim
    Unlimited,
}

impl RetentionPolicy {
    /// Trims `mapping` in place and returns the evicted dates, most recent
    /// first. Keys that are not dates are always dropped.
    fn apply(&self, mapping: &mut Map<String, Value>) -> Vec<Date> {
        let mut dated: Vec<(Date, String)> = Vec::new();
        let mut undated = Vec::new();
        for key in mapping.keys() {
            match parse_date(key) {
                Some(date) => dated.push((date, key.clone())),
                None => undated.push(key.clone()),
            }
        }
        for key in undated {
            warn!("Dropping non-date key '{key}' from working document");
            mapping.remove(&key);
        }

        dated.sort_by(|a, b| b.0.cmp(&a.0));
        let keep = match self {
            RetentionPolicy::KeepLatest(n) => *n,
            RetentionPolicy::Unlimited => usize::MAX,
        };
        dated
            .into_iter()
            .skip(keep)
            .map(|(date, key)| {
                mapping.remove(&key);
                date
            })
            .collect()
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        RetentionPolicy::KeepLatest(7)
    }
}

impl fmt::Display for RetentionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetentionPolicy::KeepLatest(n) => write!(f, "latest {n}"),
            RetentionPolicy::Unlimited => write!(f, "unlimited"),
        }
    }
}

/// Result of an upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertReport {
    /// Revision of the written document
    pub revision: String,
    /// Dates dropped by the retention policy
    pub evicted: Vec<Date>,
}

/// Emulates a key-value store of plan records inside one document whose
/// top-level keys are ISO dates.
///
/// Every mutation loads the whole mapping, changes it and writes it back.
/// Two interleaved upserts without a fresh read in between lose the first
/// one's changes.
#[derive(Clone)]
pub struct MultiRecordStore {
    blob: Arc<dyn BlobStore>,
    key: String,
    retention: RetentionPolicy,
}

impl MultiRecordStore {
    /// Creates a store over the document `key` of `blob`.
    pub fn new(blob: Arc<dyn BlobStore>, key: impl Into<String>, retention: RetentionPolicy) -> Self {
        Self {
            blob,
            key: key.into(),
            retention,
        }
    }

    pub fn retention(&self) -> RetentionPolicy {
        self.retention
    }

    /// All decodable records, keyed by date.
    pub fn load_all(&self) -> Result<BTreeMap<Date, PlanRecord>> {
        let mapping = self.load_mapping()?;
        let mut records = BTreeMap::new();
        for (key, value) in &mapping {
            match parse_date(key) {
                Some(date) => {
                    records.insert(date, codec::decode_for_date(date, value));
                }
                None => warn!("Skipping entry with non-date key '{key}'"),
            }
        }
        Ok(records)
    }

    /// Stored dates, most recent first.
    pub fn dates(&self) -> Result<Vec<Date>> {
        Ok(self.load_all()?.into_keys().rev().collect())
    }

    /// The record stored for `date`.
    pub fn get(&self, date: Date) -> Result<Option<PlanRecord>> {
        let mapping = self.load_mapping()?;
        Ok(mapping
            .get(&date.to_string())
            .map(|value| codec::decode_for_date(date, value)))
    }

    /// Inserts or replaces the record for its date, then applies the
    /// retention policy and writes the whole mapping back.
    pub fn upsert(&self, record: &PlanRecord) -> Result<UpsertReport> {
        let mut mapping = self.load_mapping()?;
        mapping.insert(record.plan_date.to_string(), codec::encode(record));
        let evicted = self.retention.apply(&mut mapping);
        if !evicted.is_empty() {
            debug!("Retention evicted {} entr(ies): {evicted:?}", evicted.len());
        }

        let message = format!("Update plan state for {}", record.plan_date);
        let revision = self.write_mapping(&mapping, &message)?;
        info!("Saved plan record for {} (revision {})", record.plan_date, short(&revision));

        Ok(UpsertReport { revision, evicted })
    }

    /// Removes the entry for `date`. Returns whether it existed; nothing is
    /// written when it did not.
    pub fn clear(&self, date: Date) -> Result<bool> {
        let mut mapping = self.load_mapping()?;
        if mapping.remove(&date.to_string()).is_none() {
            return Ok(false);
        }
        self.write_mapping(&mapping, &format!("Clear plan state for {date}"))?;
        info!("Cleared plan record for {date}");
        Ok(true)
    }

    /// Removes every entry older than `cutoff` and returns the removed
    /// dates, most recent first.
    pub fn retain_since(&self, cutoff: Date) -> Result<Vec<Date>> {
        let mut mapping = self.load_mapping()?;
        let mut removed: Vec<Date> = mapping
            .keys()
            .filter_map(|key| parse_date(key))
            .filter(|date| *date < cutoff)
            .collect();
        if removed.is_empty() {
            return Ok(removed);
        }
        for date in &removed {
            mapping.remove(&date.to_string());
        }
        removed.sort_by(|a, b| b.cmp(a));
        self.write_mapping(&mapping, &format!("Drop plan state older than {cutoff}"))?;
        Ok(removed)
    }

    /// Deletes the whole working document. Returns whether it existed.
    pub fn clear_all(&self) -> Result<bool> {
        self.blob.delete_raw(&self.key, "Clear all plan state")
    }

    fn load_mapping(&self) -> Result<Map<String, Value>> {
        let Some(document) = self.blob.get_raw(&self.key)? else {
            return Ok(Map::new());
        };
        match serde_json::from_str::<Value>(&document.content) {
            Ok(Value::Object(mapping)) => Ok(mapping),
            Ok(_) | Err(_) => {
                warn!(
                    "Working document '{}' is not a JSON object, treating it as empty",
                    self.key
                );
                Ok(Map::new())
            }
        }
    }

    fn write_mapping(&self, mapping: &Map<String, Value>, message: &str) -> Result<String> {
        let content = serde_json::to_string_pretty(mapping)?;
        self.blob.put_raw(&self.key, &content, message)
    }
}

impl fmt::Debug for MultiRecordStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiRecordStore")
            .field("backend", &self.blob.describe())
            .field("key", &self.key)
            .field("retention", &self.retention)
            .finish()
    }
}

fn short(revision: &str) -> &str {
    revision.get(..8).unwrap_or(revision)
}

#[cfg(test)]
mod tests {
    use jiff::{civil::date, Timestamp};

    use super::*;
    use crate::store::MemoryBlobStore;

    fn create_test_store(retention: RetentionPolicy) -> (Arc<MemoryBlobStore>, MultiRecordStore) {
        let blob = Arc::new(MemoryBlobStore::new());
        let store = MultiRecordStore::new(blob.clone(), "state.json", retention);
        (blob, store)
    }

    fn record_for(day: i8) -> PlanRecord {
        let mut record = PlanRecord::new(date(2026, 10, day), Timestamp::UNIX_EPOCH);
        record.reflection = format!("day {day}");
        record
    }

    #[test]
    fn upsert_replaces_existing_entry() {
        let (_blob, store) = create_test_store(RetentionPolicy::default());
        store.upsert(&record_for(1)).unwrap();

        let mut updated = record_for(1);
        updated.reflection = "rewritten".to_string();
        store.upsert(&updated).unwrap();

        let all = store.load_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[&date(2026, 10, 1)].reflection, "rewritten");
    }

    #[test]
    fn retention_keeps_most_recent_dates() {
        let (_blob, store) = create_test_store(RetentionPolicy::KeepLatest(3));
        for day in [5, 1, 4, 2] {
            store.upsert(&record_for(day)).unwrap();
        }
        let report = store.upsert(&record_for(3)).unwrap();

        assert_eq!(report.evicted, vec![date(2026, 10, 2)]);
        assert_eq!(
            store.dates().unwrap(),
            vec![date(2026, 10, 5), date(2026, 10, 4), date(2026, 10, 3)]
        );
    }

    #[test]
    fn upserting_an_old_date_can_evict_itself() {
        let (_blob, store) = create_test_store(RetentionPolicy::KeepLatest(1));
        store.upsert(&record_for(9)).unwrap();
        let report = store.upsert(&record_for(2)).unwrap();
        assert_eq!(report.evicted, vec![date(2026, 10, 2)]);
        assert_eq!(store.get(date(2026, 10, 2)).unwrap(), None);
    }

    #[test]
    fn clear_only_writes_when_entry_exists() {
        let (blob, store) = create_test_store(RetentionPolicy::default());
        store.upsert(&record_for(1)).unwrap();
        assert!(!store.clear(date(2026, 10, 2)).unwrap());
        assert_eq!(blob.write_count(), 1);

        assert!(store.clear(date(2026, 10, 1)).unwrap());
        assert_eq!(blob.write_count(), 2);
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn retain_since_drops_older_entries() {
        let (_blob, store) = create_test_store(RetentionPolicy::Unlimited);
        for day in 1..=5 {
            store.upsert(&record_for(day)).unwrap();
        }
        let removed = store.retain_since(date(2026, 10, 4)).unwrap();
        assert_eq!(
            removed,
            vec![date(2026, 10, 3), date(2026, 10, 2), date(2026, 10, 1)]
        );
        assert_eq!(store.dates().unwrap().len(), 2);
    }

    #[test]
    fn malformed_document_and_keys_are_tolerated() {
        let (blob, store) = create_test_store(RetentionPolicy::default());
        blob.put_raw(
            "state.json",
            r#"{"2026-10-01": {"reflection": "kept"}, "daily_session_state": {}}"#,
            "seed",
        )
        .unwrap();
        let all = store.load_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[&date(2026, 10, 1)].reflection, "kept");

        blob.put_raw("state.json", "not json", "corrupt").unwrap();
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn offline_backend_surfaces_store_unavailable() {
        let (blob, store) = create_test_store(RetentionPolicy::default());
        blob.set_online(false);
        let err = store.upsert(&record_for(1)).unwrap_err();
        assert!(err.is_store_failure());
    }
}
