#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use dayplan_core::{EngineBuilder, ManualClock, SyncEngine, TaskDraft};
use tempfile::TempDir;

/// Start of every test clock: 2026-10-19 08:00 UTC.
pub const TEST_NOW: &str = "2026-10-19T08:00:00Z";

/// Helper function to create a SQLite-backed test engine
pub fn create_test_engine() -> (TempDir, Arc<ManualClock>, SyncEngine) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let clock = Arc::new(ManualClock::new(TEST_NOW.parse().expect("valid timestamp")));
    let engine = engine_at(&database_path(&temp_dir), clock.clone());
    (temp_dir, clock, engine)
}

/// A second engine over the same database, as a restarted process would see it
pub fn engine_at(path: &Path, clock: Arc<ManualClock>) -> SyncEngine {
    EngineBuilder::new()
        .with_database_path(Some(path))
        .with_clock(clock)
        .build()
        .expect("Failed to create engine")
}

pub fn database_path(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("test.db")
}

pub fn draft(name: &str, subject: &str, start: &str, end: &str) -> TaskDraft {
    TaskDraft {
        name: name.to_string(),
        subject: Some(subject.to_string()),
        difficulty: Some(3),
        start_time: start.to_string(),
        end_time: end.to_string(),
    }
}
