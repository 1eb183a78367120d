//! Integration tests for the `rr` binary
//!
//! Every test runs in a scratch directory with its own config and data homes,
//! so no user config, project config or log file leaks in.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SCENARIO: &str = r#"{
    "tasks": [
        {"id": 1, "task": "Write report", "mood": "Focused", "timestamp": "2025-06-11T08:00:00", "length": 60},
        {"id": 2, "task": "Answer emails", "mood": ["Tired", "Calm"], "timestamp": "2025-06-11T09:00:00", "length": 30}
    ],
    "blockedSlots": [{"start": "2025-06-11T10:00:00", "end": "2025-06-11T10:30:00"}],
    "currentMood": "Tired"
}"#;

const UNSET_KEY: &str = "RR_CLI_TEST_API_KEY_NEVER_SET";

fn rr(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("rr").expect("binary builds");
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env_remove("RUST_LOG")
        .env_remove(UNSET_KEY);
    cmd
}

fn write_config(home: &Path, yaml: &str) -> std::path::PathBuf {
    let path = home.join("rr.yml");
    fs::write(&path, yaml).expect("write config");
    path
}

// =============================================================================
// Error surface
// =============================================================================

#[test]
fn test_missing_tasks_is_input_error() {
    let home = TempDir::new().expect("Failed to create temp dir");

    let output = rr(home.path())
        .args(["--now", "09:15"])
        .write_stdin(r#"{"blockedSlots": []}"#)
        .output()
        .expect("run rr");

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty(), "nothing on stdout after a failure");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("input error:"), "stderr was: {stderr}");
    assert_eq!(stderr.lines().count(), 1);
}

#[test]
fn test_invalid_json_is_input_error() {
    let home = TempDir::new().expect("Failed to create temp dir");

    rr(home.path())
        .write_stdin("tasks: [1, 2")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::starts_with("input error:"));
}

#[test]
fn test_unreadable_input_file_is_input_error() {
    let home = TempDir::new().expect("Failed to create temp dir");

    rr(home.path())
        .args(["--input", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("input error:"));
}

#[test]
fn test_bad_blocked_range_is_format_error() {
    let home = TempDir::new().expect("Failed to create temp dir");
    let input = r#"{"tasks": [], "blockedSlots": [{"start": "not-a-date", "end": "2025-06-11T10:30:00"}]}"#;

    rr(home.path())
        .args(["--dry-run", "--now", "09:15"])
        .write_stdin(input)
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::starts_with("format error:").and(predicate::str::contains("not-a-date")));
}

#[test]
fn test_bad_now_is_format_error() {
    let home = TempDir::new().expect("Failed to create temp dir");

    rr(home.path())
        .args(["--dry-run", "--now", "quarter past nine"])
        .write_stdin(SCENARIO)
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("format error:"));
}

#[test]
fn test_missing_api_key_is_service_error() {
    let home = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(home.path(), &format!("llm:\n  api-key-env: {}\n", UNSET_KEY));

    let output = rr(home.path())
        .arg("--config")
        .arg(&config)
        .args(["--now", "09:15"])
        .write_stdin(SCENARIO)
        .output()
        .expect("run rr");

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("service error:"), "stderr was: {stderr}");
    assert!(stderr.contains(UNSET_KEY));
    assert!(stderr.contains("check llm.api-key-env"), "stderr was: {stderr}");
    assert_eq!(stderr.lines().count(), 1);
}

#[test]
fn test_unknown_provider_is_service_error() {
    let home = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(home.path(), "llm:\n  provider: carrier-pigeon\n");

    rr(home.path())
        .arg("--config")
        .arg(&config)
        .write_stdin(SCENARIO)
        .assert()
        .failure()
        .stderr(
            predicate::str::starts_with("service error:")
                .and(predicate::str::contains("carrier-pigeon"))
                .and(predicate::str::contains("api-key-env").not()),
        );
}

#[test]
fn test_broken_config_fails() {
    let home = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(home.path(), "schedule:\n  day-start: nine\n");

    rr(home.path())
        .arg("--config")
        .arg(&config)
        .write_stdin(SCENARIO)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::starts_with("config error:"));
}

#[test]
fn test_skipped_project_config_is_logged() {
    let home = TempDir::new().expect("Failed to create temp dir");
    fs::write(
        home.path().join(".rescheduler.yml"),
        "log-level: DEBUG\nschedule:\n  day-start: nine\n",
    )
    .expect("write project config");

    rr(home.path())
        .args(["--dry-run", "--now", "09:15"])
        .write_stdin(SCENARIO)
        .assert()
        .success()
        .stderr(predicate::str::is_empty());

    let log = fs::read_to_string(home.path().join("data/rescheduler/logs/rescheduler.log")).expect("log written");
    assert!(log.contains("Failed to load config from .rescheduler.yml"), "log was: {log}");
    assert!(log.contains("read_input: called"), "log level from the skipped file still applies");
}

// =============================================================================
// Dry run
// =============================================================================

#[test]
fn test_dry_run_prints_prompt_without_key() {
    let home = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(home.path(), &format!("llm:\n  api-key-env: {}\n", UNSET_KEY));

    rr(home.path())
        .arg("--config")
        .arg(&config)
        .args(["--dry-run", "--now", "09:15"])
        .write_stdin(SCENARIO)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("The current time is 09:15")
                .and(predicate::str::contains("- 10:00 - 10:30"))
                .and(predicate::str::contains("currently feeling \"Tired\""))
                .and(predicate::str::contains("between 09:15 and 24:00")),
        )
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_dry_run_reads_input_file_and_variant() {
    let home = TempDir::new().expect("Failed to create temp dir");
    let input = home.path().join("tasks.json");
    fs::write(&input, SCENARIO).expect("write input");

    rr(home.path())
        .arg("--input")
        .arg(&input)
        .args(["--dry-run", "--now", "07:30", "--variant", "base"])
        .assert()
        .success()
        .stdout(predicate::str::contains("between 09:00 and 18:00"));
}

#[test]
fn test_dry_run_accepts_bare_task_array() {
    let home = TempDir::new().expect("Failed to create temp dir");
    let input = r#"[{"id": 5, "task": "Walk", "mood": "Calm", "timestamp": "2025-06-11T17:00:00", "length": 20}]"#;

    rr(home.path())
        .args(["--dry-run", "--now", "16:00"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\": 5").and(predicate::str::contains("are blocked").not()));
}

#[test]
fn test_current_time_file_is_written() {
    let home = TempDir::new().expect("Failed to create temp dir");
    let now_file = home.path().join("now.txt");
    let config = write_config(
        home.path(),
        &format!("debug:\n  current-time-file: {}\n", now_file.display()),
    );

    rr(home.path())
        .arg("--config")
        .arg(&config)
        .args(["--dry-run", "--now", "11:05"])
        .write_stdin(SCENARIO)
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&now_file).expect("time file written"), "11:05");
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().expect("Failed to create temp dir");

    rr(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("rr "));
}
