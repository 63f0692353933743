//! Integration tests for the liftlog binary.
//!
//! These tests verify end-to-end behavior including:
//! - Plan management and the starter template
//! - The interactive session loop (driven over stdin)
//! - History, records and chart output
//! - Export/import round trips

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("liftlog"))
}

/// Seed a state file with one plan whose rest is "0:00" so the
/// interactive loop never sleeps on the rest timer.
fn seed_state(data_dir: &Path) {
    let plan_id = "11111111-1111-1111-1111-111111111111";
    let day_id = "22222222-2222-2222-2222-222222222222";
    let state = serde_json::json!({
        "plans": [{
            "id": plan_id,
            "name": "Test Plan",
            "days": [{
                "id": day_id,
                "name": "Push",
                "weekday": 1,
                "exercises": [
                    {
                        "name": "Bench Press",
                        "scheme": {"sets": 2, "rep_min": 8, "rep_max": 10, "rest": "0:00"}
                    },
                    {
                        "name": "Dips",
                        "scheme": {"sets": 2, "rep_min": 8, "rep_max": 12, "rest": "0:00"}
                    }
                ]
            }]
        }],
        "active_plan_id": plan_id
    });
    fs::create_dir_all(data_dir).unwrap();
    fs::write(
        data_dir.join("state.json"),
        serde_json::to_string(&state).unwrap(),
    )
    .unwrap();
}

/// Like `seed_state`, but with one finished Bench Press session
/// (100kg x 12) already in the log.
fn seed_state_with_history(data_dir: &Path) {
    let plan_id = "11111111-1111-1111-1111-111111111111";
    let day_id = "22222222-2222-2222-2222-222222222222";
    let state = serde_json::json!({
        "plans": [{
            "id": plan_id,
            "name": "Test Plan",
            "days": [{
                "id": day_id,
                "name": "Push",
                "weekday": 1,
                "exercises": [
                    {
                        "name": "Bench Press",
                        "scheme": {"sets": 2, "rep_min": 8, "rep_max": 10, "rest": "0:00"}
                    }
                ]
            }]
        }],
        "active_plan_id": plan_id,
        "sessions": [{
            "id": "33333333-3333-3333-3333-333333333333",
            "ts": 1000,
            "date": "2026-01-01",
            "plan_name": "Test Plan",
            "day_name": "Push",
            "closed": true,
            "items": [{
                "exercise": "Bench Press",
                "target": {"sets": 2, "rep_min": 8, "rep_max": 10, "rest": "0:00"},
                "sets": [{"kg": "100", "reps": "12"}]
            }]
        }]
    });
    fs::create_dir_all(data_dir).unwrap();
    fs::write(
        data_dir.join("state.json"),
        serde_json::to_string(&state).unwrap(),
    )
    .unwrap();
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Workout plan, session and diet tracker",
        ));
}

#[test]
fn test_start_without_plan_fails() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("start")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure();
}

#[test]
fn test_starter_plan_install_and_show() {
    let temp_dir = setup_test_dir();

    cli()
        .args(["plan", "starter"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Starter 4-Day"));

    cli()
        .args(["plan", "list"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Starter 4-Day"))
        .stdout(predicate::str::contains("4 days"));

    cli()
        .args(["plan", "show"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Upper A"))
        .stdout(predicate::str::contains("Lower B"));
}

#[test]
fn test_session_quit_keeps_session_resumable() {
    let temp_dir = setup_test_dir();
    seed_state(temp_dir.path());

    // Start, then immediately save and quit
    cli()
        .arg("start")
        .args(["--day", "Push"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bench Press"))
        .stdout(predicate::str::contains("Session saved"));

    // The session stays in the history list
    cli()
        .arg("sessions")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Test Plan"))
        .stdout(predicate::str::contains("0 sets"));
}

#[test]
fn test_logged_sets_feed_history_and_records() {
    let temp_dir = setup_test_dir();
    seed_state(temp_dir.path());

    // Log two Bench Press sets, then quit
    cli()
        .arg("start")
        .args(["--day", "Push"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .write_stdin("100 x 8\ns\n95 x 10\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Set 2 of 2"));

    cli()
        .args(["history", "Bench Press"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Last: 100kg x 8"))
        .stdout(predicate::str::contains("Best: 100kg"));

    cli()
        .arg("pr")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Bench Press  100kg"));
}

#[test]
fn test_session_prefills_load_from_history() {
    let temp_dir = setup_test_dir();
    seed_state_with_history(temp_dir.path());

    // Hitting the top of the 8-10 range at 100kg steps the load up by
    // 2.5kg. The fill happens when the set is shown, before any input.
    cli()
        .arg("start")
        .args(["--day", "Push"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Suggested load filled in: 102.5 kg"));

    let raw = fs::read_to_string(temp_dir.path().join("state.json")).unwrap();
    let state: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let sessions = state["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[1]["items"][0]["sets"][0]["kg"], "102.5");
    // Reps stay blank until the user logs the set
    assert_eq!(sessions[1]["items"][0]["sets"][0]["reps"], "");
}

#[test]
fn test_comma_decimal_input_is_accepted() {
    let temp_dir = setup_test_dir();
    seed_state(temp_dir.path());

    cli()
        .arg("start")
        .args(["--day", "Push"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .write_stdin("82,5 x 8\nq\n")
        .assert()
        .success();

    cli()
        .args(["history", "bench press"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Last: 82.5kg x 8"));
}

#[test]
fn test_chart_output() {
    let temp_dir = setup_test_dir();
    seed_state(temp_dir.path());

    cli()
        .arg("start")
        .args(["--day", "Push"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .write_stdin("100 x 8\ns\n95 x 10\nq\n")
        .assert()
        .success();

    cli()
        .args(["chart", "Bench Press", "--mode", "volume"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        // 100*8 + 95*10 = 1750
        .stdout(predicate::str::contains("VOLUME: 1750"))
        .stdout(predicate::str::contains("1 sessions"));

    cli()
        .args(["chart", "Deadlift"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No data for this exercise yet."));
}

#[test]
fn test_exercise_index_covers_plans_without_sessions() {
    let temp_dir = setup_test_dir();
    seed_state(temp_dir.path());

    cli()
        .arg("exercises")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Bench Press"))
        .stdout(predicate::str::contains("Dips"));
}

#[test]
fn test_plan_duplicate_and_delete() {
    let temp_dir = setup_test_dir();
    seed_state(temp_dir.path());

    cli()
        .args(["plan", "duplicate", "1"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Test Plan (copy)"));

    cli()
        .args(["plan", "delete", "2"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    cli()
        .args(["plan", "list"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Test Plan").count(1));
}

#[test]
fn test_delete_session_by_number() {
    let temp_dir = setup_test_dir();
    seed_state(temp_dir.path());

    cli()
        .arg("start")
        .args(["--day", "Push"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .write_stdin("q\n")
        .assert()
        .success();

    cli()
        .args(["delete", "1"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted session"));

    cli()
        .arg("sessions")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No sessions logged yet."));
}

#[test]
fn test_export_import_roundtrip() {
    let temp_dir = setup_test_dir();
    seed_state(temp_dir.path());
    let backup = temp_dir.path().join("backup.json");

    cli()
        .arg("export")
        .arg("--out")
        .arg(&backup)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    // Import into a fresh data dir
    let fresh_dir = setup_test_dir();
    cli()
        .arg("import")
        .arg(&backup)
        .arg("--data-dir")
        .arg(fresh_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1 plans"));

    cli()
        .args(["plan", "list"])
        .arg("--data-dir")
        .arg(fresh_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Test Plan"));
}

#[test]
fn test_import_rejects_garbage() {
    let temp_dir = setup_test_dir();
    let bad = temp_dir.path().join("bad.json");
    fs::write(&bad, "not json at all").unwrap();

    cli()
        .arg("import")
        .arg(&bad)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure();
}

#[test]
fn test_diet_grocery_list() {
    let temp_dir = setup_test_dir();

    cli()
        .args(["diet", "create", "Bulk"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    cli()
        .args(["diet", "grocery"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Grocery list is empty."));
}

#[test]
fn test_plan_day_and_exercise_editing() {
    let temp_dir = setup_test_dir();
    seed_state(temp_dir.path());

    cli()
        .args(["plan", "add-day", "Pull", "--weekday", "2"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    cli()
        .args([
            "plan",
            "add-exercise",
            "Pull",
            "Barbell Row",
            "--sets",
            "3",
            "--rep-min",
            "6",
            "--rep-max",
            "8",
            "--rest",
            "2:00",
        ])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    cli()
        .args(["plan", "show"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Tuesday — Pull"))
        .stdout(predicate::str::contains("Barbell Row  3 x 6-8  rest 2:00"));

    cli()
        .args(["plan", "remove-exercise", "Pull", "1"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    cli()
        .args(["plan", "delete-day", "Pull"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    cli()
        .args(["plan", "show"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Pull").not());
}

#[test]
fn test_diet_food_editing_feeds_grocery_list() {
    let temp_dir = setup_test_dir();

    cli()
        .args(["diet", "create", "Bulk"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    cli()
        .args(["diet", "add-food", "1", "1", "Oats", "80", "g"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    // Spread day 1 over the whole week, then 80g x 7 days = 560g
    cli()
        .args(["diet", "copy-day", "1"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    cli()
        .args(["diet", "grocery"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Oats  560 g"));

    cli()
        .args(["diet", "remove-food", "1", "1", "1"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    cli()
        .args(["diet", "show"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Bulk"))
        .stdout(predicate::str::contains("Oats").count(6));
}

#[test]
fn test_corrupt_state_falls_back_to_defaults() {
    let temp_dir = setup_test_dir();
    fs::write(temp_dir.path().join("state.json"), "{ invalid").unwrap();

    cli()
        .arg("sessions")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No sessions logged yet."));
}
