use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// Dates far in the future keep the tests independent of the current day
const DAY: &str = "2099-01-10";
const NEXT_DAY: &str = "2099-01-11";

/// Helper function to create a temporary directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Helper function to create a Command with --no-color and a test database
fn dp_cmd(db_path: &Path, date: &str) -> Command {
    let mut cmd = Command::cargo_bin("dp").expect("Failed to find dp binary");
    cmd.arg("--no-color")
        .arg("--database-file")
        .arg(db_path)
        .arg("--date")
        .arg(date);
    cmd
}

fn add_task(db_path: &Path, date: &str, name: &str, start: &str, end: &str) {
    dp_cmd(db_path, date)
        .args(["task", "add", name, start, end, "--subject", "math"])
        .assert()
        .success();
}

#[test]
fn test_cli_status_is_default() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    dp_cmd(&db_path, DAY)
        .assert()
        .success()
        .stdout(predicate::str::contains("# Session"))
        .stdout(predicate::str::contains("- Store: sqlite:"))
        .stdout(predicate::str::contains("- Active date: 2099-01-10 (future)"))
        .stdout(predicate::str::contains("- Stored dates: none"));
}

#[test]
fn test_cli_add_and_show_task() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    dp_cmd(&db_path, DAY)
        .args(["task", "add", "Topology", "09:00", "10:30", "-s", "math"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Success: Task 1 'Topology' added. Saved"));

    dp_cmd(&db_path, DAY)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("# Plan for 2099-01-10"))
        .stdout(predicate::str::contains("- Stage: draft"))
        .stdout(predicate::str::contains("| Topology | math |"))
        .stdout(predicate::str::contains("09:00-10:30 | 1h 30m | 1h 12m |"));
}

#[test]
fn test_cli_empty_save_is_skipped() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    dp_cmd(&db_path, DAY)
        .args(["save", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not saved: the plan has no content yet"));
}

#[test]
fn test_cli_unchanged_plan_is_not_rewritten() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    add_task(&db_path, DAY, "Reading", "20:00", "21:00");

    dp_cmd(&db_path, DAY)
        .arg("save")
        .assert()
        .success()
        .stdout(predicate::str::contains("no changes since the last save"));
}

#[test]
fn test_cli_confirm_reports_overlaps() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    add_task(&db_path, DAY, "Late review", "23:00", "01:00");
    add_task(&db_path, DAY, "Night reading", "00:30", "02:00");

    dp_cmd(&db_path, DAY)
        .arg("confirm")
        .assert()
        .failure()
        .stdout(predicate::str::contains("# Overlapping tasks"))
        .stdout(predicate::str::contains(
            "Task 1 'Late review' (23:00-01:00 (+1)) overlaps task 2 'Night reading'",
        ))
        .stderr(predicate::str::contains("1 overlapping task pair(s)"));
}

#[test]
fn test_cli_exec_requires_confirmation() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    add_task(&db_path, DAY, "Proofs", "09:00", "10:00");

    dp_cmd(&db_path, DAY)
        .args(["exec", "1", "09:00", "10:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to record execution"));
}

#[test]
fn test_cli_full_day_flow() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    add_task(&db_path, DAY, "Proofs", "09:00", "11:00");
    add_task(&db_path, DAY, "Lab report", "13:00", "14:00");

    dp_cmd(&db_path, DAY)
        .arg("confirm")
        .assert()
        .success()
        .stdout(predicate::str::contains("Success: Plan confirmed. Saved"));

    dp_cmd(&db_path, DAY)
        .args(["exec", "1", "09:00", "11:30", "--interruptions", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Execution of task 1 recorded (150 min)"));

    dp_cmd(&db_path, DAY)
        .args(["set", "--weather", "rainy", "--reflection", "Long but good"])
        .assert()
        .success();

    dp_cmd(&db_path, DAY)
        .arg("review")
        .assert()
        .success()
        .stdout(predicate::str::contains("Final review started"));

    dp_cmd(&db_path, DAY)
        .arg("finalize")
        .assert()
        .success()
        .stdout(predicate::str::contains("# Finalized 2099-01-10"))
        .stdout(predicate::str::contains("- Completion: 50.0%"))
        .stdout(predicate::str::contains("- History: archived"));

    dp_cmd(&db_path, DAY)
        .args(["task", "add", "Too late", "15:00", "16:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("finalized"));

    dp_cmd(&db_path, DAY)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("| 2099-01-10 | 2 | 3h | 2h 30m | 2h | 50.0% |"));

    dp_cmd(&db_path, DAY)
        .args(["metrics", "--days", "100000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("| 2099-01-10 | 1/2 |"))
        .stdout(predicate::str::contains("## Subjects"))
        .stdout(predicate::str::contains("| math | 2 | 3h | 2h 30m |"));
}

#[test]
fn test_cli_inherit_previous_day() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    add_task(&db_path, DAY, "Calculus", "08:00", "09:00");
    add_task(&db_path, DAY, "Circuits", "09:30", "10:30");

    dp_cmd(&db_path, NEXT_DAY)
        .arg("inherit")
        .assert()
        .success()
        .stdout(predicate::str::contains("Inherited 2 task(s) from 2099-01-10"));

    dp_cmd(&db_path, NEXT_DAY)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("- Source: inherited_from_2099-01-10"))
        .stdout(predicate::str::contains("| 2 | Circuits |"));
}

#[test]
fn test_cli_inherit_missing_source_fails() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    dp_cmd(&db_path, NEXT_DAY)
        .args(["inherit", "2099-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No plan is stored for 2099-01-01"));
}

#[test]
fn test_cli_switch_shows_target_day() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    dp_cmd(&db_path, DAY)
        .args(["switch", NEXT_DAY])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Switched from 2099-01-10 to 2099-01-11 (future, new plan)",
        ))
        .stdout(predicate::str::contains("# Plan for 2099-01-11"));
}

#[test]
fn test_cli_retention_flag() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    for date in ["2099-01-01", "2099-01-02", "2099-01-03"] {
        let mut cmd = dp_cmd(&db_path, date);
        cmd.args(["--retention", "2", "task", "add", "Reading", "20:00", "21:00"])
            .assert()
            .success();
    }

    dp_cmd(&db_path, DAY)
        .args(["--retention", "2", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Retention: latest 2"))
        .stdout(predicate::str::contains("- Stored dates: 2099-01-03, 2099-01-02"));
}

#[test]
fn test_cli_clear_and_cleanup() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    add_task(&db_path, DAY, "Reading", "20:00", "21:00");

    dp_cmd(&db_path, DAY)
        .arg("clear")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared the plan for 2099-01-10"));

    dp_cmd(&db_path, DAY)
        .arg("clear")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing stored for 2099-01-10"));

    dp_cmd(&db_path, DAY).arg("cleanup").assert().failure();

    add_task(&db_path, DAY, "Reading", "20:00", "21:00");
    dp_cmd(&db_path, DAY)
        .args(["cleanup", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Working document deleted"))
        .stdout(predicate::str::contains("Session reset"));
}

#[test]
fn test_cli_set_validation() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    dp_cmd(&db_path, DAY)
        .arg("set")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to set"));

    dp_cmd(&db_path, DAY)
        .args(["set", "--energy", "11"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to update the plan"));
}

#[test]
fn test_cli_history_empty() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    dp_cmd(&db_path, DAY)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No finalized days found."));
}
