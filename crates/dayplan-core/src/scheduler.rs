//! Save throttling.
//!
//! A non-forced save has to pass three gates in order:
//!
//! 1. **Emptiness**: blank drafts are never written.
//! 2. **Rate**: at least the minimum interval has passed since the last
//!    successful save.
//! 3. **Novelty**: the fingerprint differs from the one saved last.
//!
//! `force` skips the rate and novelty gates. The emptiness gate always
//! applies. Only a successful write advances the scheduler, so a failed
//! write is retried with the same content on the next request.

use jiff::{SignedDuration, Timestamp};

use crate::{
    fingerprint::{fingerprint, Fingerprint},
    models::PlanRecord,
};

/// Default minimum time between two non-forced saves.
pub const DEFAULT_MIN_SAVE_INTERVAL: SignedDuration = SignedDuration::from_secs(30);

/// Why a save request did not reach the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The record has no meaningful content
    EmptyRecord,
    /// The last save is too recent
    TooSoon { remaining: SignedDuration },
    /// Nothing changed since the last save
    Unchanged,
}

/// Outcome of evaluating the gates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveDecision {
    /// Write the record; record the fingerprint on success
    Proceed(Fingerprint),
    Skip(SkipReason),
}

/// Tracks the last successful save of one session.
#[derive(Debug, Clone)]
pub struct SaveScheduler {
    min_interval: SignedDuration,
    last_saved_at: Option<Timestamp>,
    last_fingerprint: Option<Fingerprint>,
}

impl SaveScheduler {
    /// Creates a scheduler with the given minimum interval.
    pub fn new(min_interval: SignedDuration) -> Self {
        Self {
            min_interval,
            last_saved_at: None,
            last_fingerprint: None,
        }
    }

    /// Evaluates the gates for `record` at `now`.
    pub fn evaluate(&self, record: &PlanRecord, now: Timestamp, force: bool) -> SaveDecision {
        if record.is_empty() {
            return SaveDecision::Skip(SkipReason::EmptyRecord);
        }

        if !force {
            if let Some(last) = self.last_saved_at {
                let elapsed = now.duration_since(last);
                if elapsed < self.min_interval {
                    return SaveDecision::Skip(SkipReason::TooSoon {
                        remaining: self.min_interval - elapsed,
                    });
                }
            }
        }

        let current = fingerprint(record);
        if !force && self.last_fingerprint.as_ref() == Some(&current) {
            return SaveDecision::Skip(SkipReason::Unchanged);
        }

        SaveDecision::Proceed(current)
    }

    /// Records a successful write.
    pub fn record_success(&mut self, fingerprint: Fingerprint, at: Timestamp) {
        self.last_fingerprint = Some(fingerprint);
        self.last_saved_at = Some(at);
    }

    /// Treats `fingerprint` as already persisted without starting the rate
    /// window, e.g. right after loading a stored record.
    pub fn prime(&mut self, fingerprint: Fingerprint) {
        self.last_fingerprint = Some(fingerprint);
    }

    /// Forgets all save history.
    pub fn reset(&mut self) {
        self.last_saved_at = None;
        self.last_fingerprint = None;
    }

    pub fn last_saved_at(&self) -> Option<Timestamp> {
        self.last_saved_at
    }

    pub fn last_fingerprint(&self) -> Option<&Fingerprint> {
        self.last_fingerprint.as_ref()
    }

    pub fn min_interval(&self) -> SignedDuration {
        self.min_interval
    }
}

impl Default for SaveScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_SAVE_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::{date, time};

    use super::*;
    use crate::models::{Subject, Task};

    fn t(seconds: i64) -> Timestamp {
        Timestamp::from_second(1_792_396_800 + seconds).unwrap()
    }

    fn named_record() -> PlanRecord {
        let mut record = PlanRecord::new(date(2026, 10, 19), t(0));
        record.planned_tasks.push(Task::new(
            1,
            "Group theory",
            Subject::Math,
            3,
            time(9, 0, 0, 0),
            time(10, 0, 0, 0),
        ));
        record
    }

    #[test]
    fn empty_records_are_skipped_even_when_forced() {
        let scheduler = SaveScheduler::default();
        let record = PlanRecord::new(date(2026, 10, 19), t(0));
        assert_eq!(
            scheduler.evaluate(&record, t(0), true),
            SaveDecision::Skip(SkipReason::EmptyRecord)
        );
    }

    #[test]
    fn first_save_proceeds() {
        let scheduler = SaveScheduler::default();
        assert!(matches!(
            scheduler.evaluate(&named_record(), t(0), false),
            SaveDecision::Proceed(_)
        ));
    }

    #[test]
    fn rate_gate_blocks_within_interval() {
        let mut scheduler = SaveScheduler::default();
        let mut record = named_record();
        scheduler.record_success(fingerprint(&record), t(0));

        record.reflection = "changed".to_string();
        assert_eq!(
            scheduler.evaluate(&record, t(10), false),
            SaveDecision::Skip(SkipReason::TooSoon {
                remaining: SignedDuration::from_secs(20)
            })
        );
        assert!(matches!(
            scheduler.evaluate(&record, t(30), false),
            SaveDecision::Proceed(_)
        ));
    }

    #[test]
    fn novelty_gate_blocks_unchanged_content() {
        let mut scheduler = SaveScheduler::default();
        let record = named_record();
        scheduler.record_success(fingerprint(&record), t(0));
        assert_eq!(
            scheduler.evaluate(&record, t(120), false),
            SaveDecision::Skip(SkipReason::Unchanged)
        );
    }

    #[test]
    fn force_bypasses_rate_and_novelty() {
        let mut scheduler = SaveScheduler::default();
        let record = named_record();
        scheduler.record_success(fingerprint(&record), t(0));
        assert_eq!(
            scheduler.evaluate(&record, t(1), true),
            SaveDecision::Proceed(fingerprint(&record))
        );
    }

    #[test]
    fn primed_fingerprint_does_not_start_rate_window() {
        let mut scheduler = SaveScheduler::default();
        let mut record = named_record();
        scheduler.prime(fingerprint(&record));
        assert_eq!(
            scheduler.evaluate(&record, t(0), false),
            SaveDecision::Skip(SkipReason::Unchanged)
        );

        record.energy_level = 3;
        assert!(matches!(
            scheduler.evaluate(&record, t(0), false),
            SaveDecision::Proceed(_)
        ));
        assert!(scheduler.last_saved_at().is_none());
    }

    #[test]
    fn reset_forgets_history() {
        let mut scheduler = SaveScheduler::default();
        let record = named_record();
        scheduler.record_success(fingerprint(&record), t(0));
        scheduler.reset();
        assert!(matches!(
            scheduler.evaluate(&record, t(1), false),
            SaveDecision::Proceed(_)
        ));
    }
}
