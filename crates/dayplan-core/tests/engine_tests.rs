mod common;

use common::{create_test_engine, database_path, draft, engine_at};
use dayplan_core::{
    scheduler::SkipReason, ConnectionStatus, ExecutionDraft, PlanSource, RecordOrigin,
    RecordUpdate, SaveOutcome, SqliteBlobStore, SyncError,
};
use jiff::{civil::date, tz::TimeZone, SignedDuration, ToSpan};

fn execution(task_id: u32, start: &str, end: &str) -> ExecutionDraft {
    ExecutionDraft {
        task_id,
        start_time: start.to_string(),
        end_time: end.to_string(),
        post_energy: 7,
        interruptions: 1,
        completed: true,
    }
}

#[test]
fn test_record_survives_restart() {
    let (temp_dir, clock, engine) = create_test_engine();
    let today = engine.today();

    let mut session = engine.open_session(today);
    engine
        .add_task(&mut session, &draft("Linear algebra", "math", "09:00", "10:30"))
        .expect("Failed to add task");
    engine
        .add_task(&mut session, &draft("Mechanics", "physics", "11:00", "12:00"))
        .expect("Failed to add task");
    let outcome = engine.confirm_tasks(&mut session).expect("Failed to confirm");
    assert!(outcome.is_saved());

    let restarted = engine_at(&database_path(&temp_dir), clock);
    let mut reopened = restarted.open_session(today);
    let record = reopened.record();
    assert_eq!(record.planned_tasks.len(), 2);
    assert!(record.tasks_confirmed);
    assert_eq!(record.planned_tasks[0].name, "Linear algebra");
    assert_eq!(record.planned_tasks[1].planned_duration, 60);

    // Restored content counts as saved
    assert_eq!(
        restarted.request_save(&mut reopened, false),
        SaveOutcome::Skipped(SkipReason::Unchanged)
    );
}

#[test]
fn test_fresh_day_after_switch() {
    let (_temp_dir, _clock, engine) = create_test_engine();
    let mut session = engine.open_session(engine.today());

    let outcome = engine.switch_date(&mut session, date(2026, 10, 25));
    assert_eq!(outcome.origin, RecordOrigin::Fresh);
    assert_eq!(outcome.flushed, None);

    let record = session.record();
    assert!(record.planned_tasks.is_empty());
    assert!(!record.tasks_confirmed);
    assert_eq!(record.plan_source, PlanSource::New);
}

#[test]
fn test_repeated_saves_write_once() {
    let (temp_dir, clock, engine) = create_test_engine();
    let mut session = engine.open_session(engine.today());
    engine
        .mutate(
            &mut session,
            &RecordUpdate {
                reflection: Some("Started early".to_string()),
                ..RecordUpdate::default()
            },
        )
        .expect("Failed to update record");

    assert!(engine.request_save(&mut session, false).is_saved());
    clock.advance(SignedDuration::from_secs(120));
    assert_eq!(
        engine.request_save(&mut session, false),
        SaveOutcome::Skipped(SkipReason::Unchanged)
    );

    let store = SqliteBlobStore::open(database_path(&temp_dir)).expect("Failed to open store");
    let revisions = store
        .revisions(&engine.config().state_key)
        .expect("Failed to list revisions");
    assert_eq!(revisions.len(), 1);
    assert_eq!(revisions[0].message, "Update plan state for 2026-10-19");
}

#[test]
fn test_rate_gate_and_force() {
    let (_temp_dir, clock, engine) = create_test_engine();
    let mut session = engine.open_session(engine.today());
    engine
        .add_task(&mut session, &draft("Essay outline", "econ", "14:00", "15:00"))
        .expect("Failed to add task");
    assert!(engine.request_save(&mut session, false).is_saved());

    engine
        .add_task(&mut session, &draft("Problem set", "math", "15:00", "16:00"))
        .expect("Failed to add task");
    clock.advance(SignedDuration::from_secs(10));
    assert!(matches!(
        engine.request_save(&mut session, false),
        SaveOutcome::Skipped(SkipReason::TooSoon { .. })
    ));
    assert!(engine.request_save(&mut session, true).is_saved());
}

#[test]
fn test_retention_keeps_latest_seven() {
    let (_temp_dir, clock, engine) = create_test_engine();
    let first = date(2026, 10, 1);
    let mut session = engine.open_session(first);

    // N + 3 distinct dates
    for offset in 0..10 {
        let day = first.checked_add(offset.days()).expect("valid date");
        clock.set(
            day.to_zoned(TimeZone::UTC)
                .expect("valid zoned date")
                .timestamp(),
        );
        engine.switch_date(&mut session, day);
        engine
            .add_task(&mut session, &draft("Reading", "other", "20:00", "21:00"))
            .expect("Failed to add task");
        assert!(engine.request_save(&mut session, true).is_saved());
    }

    let dates = engine.records().dates().expect("Failed to list dates");
    let expected: Vec<_> = (3..10)
        .rev()
        .map(|offset| first.checked_add(offset.days()).expect("valid date"))
        .collect();
    assert_eq!(dates, expected);
}

#[test]
fn test_inheritance_from_previous_day() {
    let (_temp_dir, _clock, engine) = create_test_engine();
    let yesterday = date(2026, 10, 18);
    let today = engine.today();

    let mut session = engine.open_session(yesterday);
    for (name, start, end) in [
        ("Calculus", "08:00", "09:00"),
        ("Circuits", "09:30", "10:30"),
        ("Databases", "13:00", "14:30"),
    ] {
        engine
            .add_task(&mut session, &draft(name, "cs", start, end))
            .expect("Failed to add task");
    }
    engine.confirm_tasks(&mut session).expect("Failed to confirm");
    engine
        .record_execution(&mut session, &execution(1, "08:00", "09:10"))
        .expect("Failed to record execution");
    engine.request_save(&mut session, true);

    engine.switch_date(&mut session, today);
    let outcome = engine
        .inherit_from(&mut session, yesterday)
        .expect("Failed to inherit");
    assert!(outcome.is_saved());

    let record = session.record();
    let ids: Vec<u32> = record.planned_tasks.iter().map(|t| t.task_id).collect();
    assert_eq!(ids, [1, 2, 3]);
    assert!(record.actual_executions.is_empty());
    assert!(!record.tasks_confirmed);
    assert_eq!(record.plan_source, PlanSource::InheritedFrom(yesterday));
    assert_eq!(record.plan_source.tag(), "inherited_from_2026-10-18");

    // The source day is untouched
    let source = engine
        .records()
        .get(yesterday)
        .expect("Failed to read record")
        .expect("Record should exist");
    assert_eq!(source.actual_executions.len(), 1);
    assert!(source.tasks_confirmed);
}

#[test]
fn test_overlapping_plan_cannot_be_confirmed() {
    let (_temp_dir, _clock, engine) = create_test_engine();
    let mut session = engine.open_session(engine.today());
    engine
        .add_task(&mut session, &draft("Late review", "math", "23:00", "01:00"))
        .expect("Failed to add task");
    engine
        .add_task(&mut session, &draft("Night reading", "other", "00:30", "02:00"))
        .expect("Failed to add task");

    let err = engine
        .confirm_tasks(&mut session)
        .expect_err("Overlap should block confirmation");
    match err {
        SyncError::OverlapConflict { conflicts } => {
            assert_eq!(conflicts.len(), 1);
            assert_eq!(conflicts[0].first.task_id, 1);
            assert_eq!(conflicts[0].second.task_id, 2);
        }
        other => panic!("Unexpected error: {other:?}"),
    }
    assert!(!session.record().tasks_confirmed);
}

#[test]
fn test_finalize_archives_and_reports_metrics() {
    let (temp_dir, clock, engine) = create_test_engine();
    let mut session = engine.open_session(engine.today());
    engine
        .add_task(&mut session, &draft("Proofs", "math", "09:00", "11:00"))
        .expect("Failed to add task");
    engine
        .add_task(&mut session, &draft("Lab report", "physics", "13:00", "14:00"))
        .expect("Failed to add task");
    engine.confirm_tasks(&mut session).expect("Failed to confirm");
    engine
        .record_execution(&mut session, &execution(1, "09:00", "11:30"))
        .expect("Failed to record execution");
    engine
        .enter_final_confirmation(&mut session)
        .expect("Failed to enter review");

    let outcome = engine.finalize(&mut session).expect("Failed to finalize");
    assert!(outcome.archived);
    assert!(outcome.save.is_saved());
    assert_eq!(outcome.summary.planned_total_time, 180);
    assert_eq!(outcome.summary.actual_total_time, 150);
    assert!((outcome.summary.completion_rate - 0.5).abs() < f64::EPSILON);

    // A restarted engine reads the same history
    let restarted = engine_at(&database_path(&temp_dir), clock);
    let mut other = restarted.open_session(restarted.today());
    assert!(other.record().finalized);

    let report = restarted.history_report(&mut other, 7);
    assert_eq!(report.entries.len(), 1);
    let day = &report.daily[0];
    assert_eq!(day.task_count, 2);
    assert_eq!(day.completed_count, 1);
    assert!((day.focus_efficiency - 0.8).abs() < 1e-9);
    assert!((day.planning_accuracy - (1.0 - 30.0 / 180.0)).abs() < 1e-9);
    assert_eq!(report.averages.days, 1);
}

#[test]
fn test_finalize_then_save_keeps_finalized() {
    let (_temp_dir, clock, engine) = create_test_engine();
    let mut session = engine.open_session(engine.today());
    engine
        .add_task(&mut session, &draft("Revision", "econ", "10:00", "11:00"))
        .expect("Failed to add task");
    engine.confirm_tasks(&mut session).expect("Failed to confirm");
    engine.finalize(&mut session).expect("Failed to finalize");

    clock.advance(SignedDuration::from_secs(60));
    assert_eq!(
        engine.request_save(&mut session, false),
        SaveOutcome::Skipped(SkipReason::Unchanged)
    );
    assert!(matches!(
        engine.mutate(
            &mut session,
            &RecordUpdate {
                energy_level: Some(3),
                ..RecordUpdate::default()
            }
        ),
        Err(SyncError::RecordFinalized { .. })
    ));

    let stored = engine
        .records()
        .get(engine.today())
        .expect("Failed to read record")
        .expect("Record should exist");
    assert!(stored.finalized);
}

#[test]
fn test_unreachable_database_degrades_session() {
    let (temp_dir, _clock, engine) = create_test_engine();
    let mut session = engine.open_session(engine.today());
    engine
        .add_task(&mut session, &draft("Flashcards", "other", "07:00", "07:30"))
        .expect("Failed to add task");

    // Removing the directory makes every connection attempt fail
    drop(temp_dir);

    let outcome = engine.request_save(&mut session, false);
    assert!(matches!(outcome, SaveOutcome::Failed { .. }));
    assert!(session.connection().is_degraded());

    // The edit is still there and the next attempt retries the same content
    assert_eq!(session.record().planned_tasks.len(), 1);
    assert!(matches!(
        engine.request_save(&mut session, false),
        SaveOutcome::Failed { .. }
    ));
    assert_ne!(session.connection(), &ConnectionStatus::Connected);
}
