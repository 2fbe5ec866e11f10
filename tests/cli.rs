use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::tempdir;

fn vestigium(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("vestigium"));
    cmd.env_remove("VESTIGIUM_HOME");
    cmd.arg("--dir").arg(dir);
    cmd
}

/// Run `add` and return the id it printed.
fn add_task(dir: &Path, text: &str, date: &str) -> u64 {
    let output = vestigium(dir)
        .args(["add", text, "--date", date])
        .output()
        .expect("vestigium runs");
    assert!(
        output.status.success(),
        "add failed:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .split_whitespace()
        .nth(2)
        .and_then(|id| id.parse().ok())
        .expect("id in add output")
}

#[test]
fn add_then_list_shows_task_and_progress() {
    let dir = tempdir().unwrap();
    add_task(dir.path(), "Read 10 pages", "today");
    add_task(dir.path(), "Walk", "today");

    vestigium(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Read 10 pages"))
        .stdout(predicate::str::contains("0/2"));

    assert!(dir.path().join("dailyTasks.json").exists());
}

#[test]
fn completing_every_task_starts_a_streak() {
    let dir = tempdir().unwrap();
    let id = add_task(dir.path(), "Meditate", "today");

    vestigium(dir.path())
        .arg("streak")
        .assert()
        .success()
        .stdout(predicate::str::contains("Current streak: 0"));

    vestigium(dir.path())
        .args(["toggle", &id.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("marked done"));

    vestigium(dir.path())
        .arg("streak")
        .assert()
        .success()
        .stdout(predicate::str::contains("Current streak: 1"));
}

#[test]
fn past_days_reject_new_tasks() {
    let dir = tempdir().unwrap();
    vestigium(dir.path())
        .args(["add", "too late", "--date", "yesterday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("past day"));
}

#[test]
fn blank_task_text_is_rejected() {
    let dir = tempdir().unwrap();
    vestigium(dir.path())
        .args(["add", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be empty"));
}

#[test]
fn edit_and_delete_unknown_task_fail() {
    let dir = tempdir().unwrap();
    let id = add_task(dir.path(), "Stretch", "tomorrow");

    vestigium(dir.path())
        .args(["edit", &id.to_string(), "Stretch 15 min", "--date", "tomorrow"])
        .assert()
        .success();
    vestigium(dir.path())
        .args(["list", "--date", "tomorrow"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stretch 15 min"));

    vestigium(dir.path())
        .args(["delete", "42", "--date", "tomorrow"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn calendar_json_lists_task_markers_before_completed_days() {
    let dir = tempdir().unwrap();
    let id = add_task(dir.path(), "Journal", "today");
    vestigium(dir.path())
        .args(["toggle", &id.to_string()])
        .assert()
        .success();

    let output = vestigium(dir.path())
        .args(["calendar", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let events: Value = serde_json::from_slice(&output.stdout).unwrap();
    let events = events.as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["title"], "Journal");
    assert!(events[0]["id"].as_str().unwrap().ends_with(&format!("-{id}")));
    assert_eq!(events[1]["title"], "Day completed");
    assert_eq!(events[1]["display"], "background");
}

#[test]
fn calendar_month_grid_and_bad_month() {
    let dir = tempdir().unwrap();
    vestigium(dir.path())
        .args(["calendar", "--month", "2024-02"])
        .assert()
        .success()
        .stdout(predicate::str::contains("February 2024"))
        .stdout(predicate::str::contains(" 29"));

    vestigium(dir.path())
        .args(["calendar", "--month", "2024-13"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid month"));
}

#[test]
fn notes_round_trip_through_the_vault() {
    let dir = tempdir().unwrap();
    vestigium(dir.path()).args(["notes", "set", "first"]).assert().success();
    vestigium(dir.path()).args(["notes", "append", "second"]).assert().success();
    vestigium(dir.path())
        .args(["notes", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("first\nsecond"));

    vestigium(dir.path()).args(["notes", "clear"]).assert().success();
    vestigium(dir.path())
        .args(["notes", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(no notes)"));
}

#[test]
fn settings_validate_volume() {
    let dir = tempdir().unwrap();
    vestigium(dir.path())
        .args(["settings", "set", "--sound", "chime", "--volume", "40", "--mute"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Chime"))
        .stdout(predicate::str::contains("Playing: 0"))
        .stdout(predicate::str::contains("Muted:   yes"));

    vestigium(dir.path())
        .args(["settings", "set", "--volume", "150"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 0 and 100"));

    vestigium(dir.path())
        .args(["settings", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Volume:  40"));
}

#[test]
fn friends_are_unique_case_insensitively() {
    let dir = tempdir().unwrap();
    vestigium(dir.path()).args(["friends", "add", "Ana"]).assert().success();
    vestigium(dir.path())
        .args(["friends", "add", "ana"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already"));
    vestigium(dir.path()).args(["friends", "remove", "ANA"]).assert().success();
    vestigium(dir.path())
        .args(["friends", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No friends yet."));
}

#[test]
fn plan_defaults_to_free_and_persists() {
    let dir = tempdir().unwrap();
    vestigium(dir.path())
        .args(["plan", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Free"));
    vestigium(dir.path()).args(["plan", "set", "pro"]).assert().success();
    vestigium(dir.path())
        .args(["plan", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pro"));
}

#[test]
fn corrupt_snapshot_falls_back_to_empty() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("dailyTasks.json"), "{not json").unwrap();
    vestigium(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks"));
}

#[test]
fn failed_write_is_reported_and_exits_nonzero() {
    let dir = tempdir().unwrap();
    // A directory where the snapshot file should be makes every write fail.
    fs::create_dir(dir.path().join("dailyTasks.json")).unwrap();

    vestigium(dir.path())
        .args(["add", "Important"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Added task").not())
        .stderr(predicate::str::contains("could not save the task list"))
        .stderr(predicate::str::contains("dailyTasks"));
    assert!(!dir.path().join("dailyTasks.json.tmp").exists());

    fs::create_dir(dir.path().join("notepadContent.json")).unwrap();
    vestigium(dir.path())
        .args(["notes", "set", "lost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not save the notes"));
}

#[test]
fn export_writes_snapshot_file() {
    let dir = tempdir().unwrap();
    add_task(dir.path(), "Ship it", "tomorrow");
    let out = dir.path().join("export.json");

    vestigium(dir.path())
        .args(["export", "--output"])
        .arg(&out)
        .assert()
        .success();
    let exported: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let days = exported.as_object().unwrap();
    assert_eq!(days.len(), 1);
    let day = days.values().next().unwrap();
    assert_eq!(day["tasks"][0]["text"], "Ship it");
    assert_eq!(day["isCompleted"], false);
}

#[test]
fn completions_do_not_touch_the_data_dir() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("never-created");
    vestigium(&data)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vestigium"));
    assert!(!data.exists());
}
