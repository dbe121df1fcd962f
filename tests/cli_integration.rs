//! CLI integration tests for taskrank
//!
//! These tests run the binary end to end with a fixed evaluation date so
//! scores are stable, and an isolated config environment.

use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const TODAY: &str = "2025-06-15";

/// Get a command instance for the taskrank binary, isolated from user config
fn taskrank_cmd(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("taskrank"));
    cmd.current_dir(dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join("xdg"))
        .env_remove("TASKRANK_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

/// Write a request document into the temp dir
fn write_request(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    path
}

fn parse_stdout(output: &assert_cmd::assert::Assert) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    serde_json::from_str(&stdout).unwrap()
}

fn ids(values: &serde_json::Value) -> Vec<serde_json::Value> {
    values
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].clone())
        .collect()
}

const MIXED_TASKS: &str = r#"{
  "tasks": [
    {"id": 1, "title": "Fix login bug", "due_date": "2025-06-14", "estimated_hours": 3, "importance": 7, "dependencies": []},
    {"id": 2, "title": "Write report", "due_date": "2025-07-30", "estimated_hours": 10, "importance": 2, "dependencies": [3]},
    {"id": 3, "title": "Update deps", "due_date": "2025-06-18", "estimated_hours": 1, "importance": 5, "dependencies": []}
  ]
}"#;

const FIVE_TASKS: &str = r#"[
  {"id": 1, "title": "One", "due_date": "2025-06-20", "estimated_hours": 4, "importance": 3},
  {"id": 2, "title": "Two", "due_date": "2025-06-20", "estimated_hours": 4, "importance": 10},
  {"id": 3, "title": "Three", "due_date": "2025-06-20", "estimated_hours": 4, "importance": 1},
  {"id": 4, "title": "Four", "due_date": "2025-06-20", "estimated_hours": 4, "importance": 8},
  {"id": 5, "title": "Five", "due_date": "2025-06-20", "estimated_hours": 4, "importance": 6}
]"#;

const MUTUAL_TASKS: &str = r#"{"tasks": [
  {"id": 1, "title": "A", "due_date": "2025-12-01", "estimated_hours": 2, "importance": 5, "dependencies": [2]},
  {"id": 2, "title": "B", "due_date": "2025-12-01", "estimated_hours": 2, "importance": 5, "dependencies": [1]}
]}"#;

const THREE_CYCLE: &str = r#"[
  {"id": "a", "due_date": "2025-06-20", "dependencies": ["c"]},
  {"id": "b", "due_date": "2025-06-20", "dependencies": ["a"]},
  {"id": "c", "due_date": "2025-06-20", "dependencies": ["b"]}
]"#;

// =============================================================================
// Analyze
// =============================================================================

#[test]
fn test_analyze_sorts_by_score() {
    let dir = TempDir::new().unwrap();
    let request = write_request(&dir, "tasks.json", MIXED_TASKS);

    let output = taskrank_cmd(&dir)
        .args(["analyze", "--today", TODAY, "--format", "json"])
        .arg(&request)
        .assert()
        .success();

    let json = parse_stdout(&output);
    let tasks = &json["tasks"];
    assert_eq!(ids(tasks), vec![1, 3, 2]);

    // 40 urgency + 24.5 importance + 10 effort
    assert_eq!(tasks[0]["priority_score"], 74.5);
    assert_eq!(tasks[0]["priority_explanation"], "OVERDUE");

    // 30 urgency + 17.5 importance + 15 effort + 5 for blocking task 2
    assert_eq!(tasks[1]["priority_score"], 67.5);
    assert_eq!(tasks[1]["priority_explanation"], "Due very soon • Quick win");

    assert_eq!(tasks[2]["title"], "Write report");
    assert_eq!(tasks[2]["due_date"], "2025-07-30");
    assert_eq!(tasks[2]["dependencies"], serde_json::json!([3]));
    assert!(json.get("skipped").is_none());
}

#[test]
fn test_analyze_text_output() {
    let dir = TempDir::new().unwrap();
    let request = write_request(&dir, "tasks.json", MIXED_TASKS);

    taskrank_cmd(&dir)
        .args(["analyze", "--today", TODAY])
        .arg(&request)
        .assert()
        .success()
        .stdout(predicate::str::contains("Ranked tasks (3) using smart_balance"))
        .stdout(predicate::str::contains("Fix login bug"))
        .stdout(predicate::str::contains("74.50"))
        .stdout(predicate::str::contains("HIGH"))
        .stdout(predicate::str::contains("Due very soon • Quick win"));
}

#[test]
fn test_analyze_empty_tasks_rejected() {
    let dir = TempDir::new().unwrap();
    let request = write_request(&dir, "empty.json", r#"{"tasks": []}"#);

    let output = taskrank_cmd(&dir)
        .args(["analyze", "--today", TODAY, "--format", "json"])
        .arg(&request)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No tasks provided"));

    assert_eq!(
        parse_stdout(&output),
        serde_json::json!({ "error": "No tasks provided" })
    );
}

#[test]
fn test_analyze_rejects_mutual_dependency() {
    let dir = TempDir::new().unwrap();
    let request = write_request(&dir, "cycle.json", MUTUAL_TASKS);

    let output = taskrank_cmd(&dir)
        .args(["analyze", "--today", TODAY, "--format", "json"])
        .arg(&request)
        .assert()
        .failure();

    assert_eq!(
        parse_stdout(&output),
        serde_json::json!({ "error": "Circular dependencies detected" })
    );
}

#[test]
fn test_analyze_full_cycle_check_flag() {
    let dir = TempDir::new().unwrap();
    let request = write_request(&dir, "cycle3.json", THREE_CYCLE);

    // Pairwise check lets a three-task cycle through
    taskrank_cmd(&dir)
        .args(["analyze", "--today", TODAY])
        .arg(&request)
        .assert()
        .success();

    taskrank_cmd(&dir)
        .args(["analyze", "--today", TODAY, "--cycle-check", "full"])
        .arg(&request)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Circular dependencies detected"));
}

#[test]
fn test_analyze_reports_skipped_tasks() {
    let dir = TempDir::new().unwrap();
    let request = write_request(
        &dir,
        "bad.json",
        r#"[
          {"id": 1, "title": "Good", "due_date": "2025-06-16", "importance": 5},
          {"id": 2, "title": "Bad", "due_date": "16/06/2025", "importance": 5}
        ]"#,
    );

    let output = taskrank_cmd(&dir)
        .args(["analyze", "--today", TODAY, "--format", "json"])
        .arg(&request)
        .assert()
        .success();

    let json = parse_stdout(&output);
    assert_eq!(ids(&json["tasks"]), vec![1]);
    assert_eq!(json["skipped"][0]["id"], 2);
    assert!(json["skipped"][0]["reason"]
        .as_str()
        .unwrap()
        .contains("16/06/2025"));
}

#[test]
fn test_wrongly_typed_fields_skip_only_that_task() {
    let dir = TempDir::new().unwrap();
    let request = write_request(
        &dir,
        "typed.json",
        r#"[
          {"id": 1, "title": "Good", "due_date": "2025-06-16", "importance": 5},
          {"id": 2, "title": "Wordy", "due_date": "2025-06-16", "importance": "high"},
          {"id": 3, "title": "Quoted", "due_date": "2025-06-16", "estimated_hours": "3"},
          {"title": "Imported", "due_date": "2025-06-16", "importance": 9}
        ]"#,
    );

    for (command, key) in [("analyze", "tasks"), ("suggest", "suggestions")] {
        let output = taskrank_cmd(&dir)
            .args([command, "--today", TODAY, "--format", "json"])
            .arg(&request)
            .assert()
            .success();

        let json = parse_stdout(&output);
        assert_eq!(ids(&json[key]), vec![0, 1]);
        assert_eq!(ids(&json["skipped"]), vec![2, 3]);
        assert!(json["skipped"][0]["reason"]
            .as_str()
            .unwrap()
            .contains("importance"));
    }
}

#[test]
fn test_invalid_task_scores_zero() {
    let dir = TempDir::new().unwrap();
    let request = write_request(
        &dir,
        "invalid.json",
        r#"[{"id": 1, "title": "Too important", "due_date": "2025-12-01", "estimated_hours": 2, "importance": 15}]"#,
    );

    let output = taskrank_cmd(&dir)
        .args(["analyze", "--today", TODAY, "--format", "json"])
        .arg(&request)
        .assert()
        .success();

    assert_eq!(parse_stdout(&output)["tasks"][0]["priority_score"], 0.0);
}

// =============================================================================
// Strategy selection
// =============================================================================

#[test]
fn test_request_strategy_used() {
    let dir = TempDir::new().unwrap();
    let request = write_request(
        &dir,
        "impact.json",
        r#"{"strategy": "high_impact", "tasks": [{"id": 1, "due_date": "2025-06-20", "importance": 8}]}"#,
    );

    let output = taskrank_cmd(&dir)
        .args(["analyze", "--today", TODAY, "--format", "json"])
        .arg(&request)
        .assert()
        .success();

    let json = parse_stdout(&output);
    assert_eq!(json["tasks"][0]["priority_score"], 80.0);
    assert_eq!(
        json["tasks"][0]["priority_explanation"],
        "High importance • Quick win • Impact prioritized"
    );
}

#[test]
fn test_strategy_flag_overrides_request() {
    let dir = TempDir::new().unwrap();
    let request = write_request(
        &dir,
        "impact.json",
        r#"{"strategy": "high_impact", "tasks": [{"id": 1, "due_date": "2025-06-20", "estimated_hours": 2, "importance": 8}]}"#,
    );

    let output = taskrank_cmd(&dir)
        .args(["analyze", "--today", TODAY, "--format", "json", "--strategy", "fastest_wins"])
        .arg(&request)
        .assert()
        .success();

    // 40 effort + 40 importance
    assert_eq!(parse_stdout(&output)["tasks"][0]["priority_score"], 80.0);
    assert!(parse_stdout(&output)["tasks"][0]["priority_explanation"]
        .as_str()
        .unwrap()
        .ends_with("Low effort prioritized"));
}

#[test]
fn test_unknown_request_strategy_falls_back() {
    let dir = TempDir::new().unwrap();
    let request = write_request(
        &dir,
        "unknown.json",
        r#"{"strategy": "random", "tasks": [{"id": 1, "due_date": "2025-06-14", "estimated_hours": 3, "importance": 7}]}"#,
    );

    let output = taskrank_cmd(&dir)
        .args(["analyze", "--today", TODAY, "--format", "json"])
        .arg(&request)
        .assert()
        .success()
        .stderr(predicate::str::contains("unknown strategy"));

    assert_eq!(parse_stdout(&output)["tasks"][0]["priority_score"], 74.5);
}

#[test]
fn test_unknown_strategy_flag_rejected() {
    let dir = TempDir::new().unwrap();
    let request = write_request(&dir, "tasks.json", MIXED_TASKS);

    taskrank_cmd(&dir)
        .args(["analyze", "--strategy", "random"])
        .arg(&request)
        .assert()
        .failure();
}

#[test]
fn test_strategies_lists_all() {
    let dir = TempDir::new().unwrap();

    taskrank_cmd(&dir)
        .arg("strategies")
        .assert()
        .success()
        .stdout(predicate::str::contains("smart_balance"))
        .stdout(predicate::str::contains("(default)"))
        .stdout(predicate::str::contains("fastest_wins"))
        .stdout(predicate::str::contains("high_impact"))
        .stdout(predicate::str::contains("deadline_driven"));
}

// =============================================================================
// Suggest and plan
// =============================================================================

#[test]
fn test_suggest_returns_top_three() {
    let dir = TempDir::new().unwrap();
    let request = write_request(&dir, "five.json", FIVE_TASKS);

    let output = taskrank_cmd(&dir)
        .args(["suggest", "--today", TODAY, "--format", "json", "--strategy", "high_impact"])
        .arg(&request)
        .assert()
        .success();

    let json = parse_stdout(&output);
    assert_eq!(ids(&json["suggestions"]), vec![2, 4, 5]);
    assert_eq!(json["suggestions"][0]["priority_score"], 100.0);
}

#[test]
fn test_suggest_reads_stdin() {
    let dir = TempDir::new().unwrap();

    let output = taskrank_cmd(&dir)
        .args(["suggest", "--today", TODAY, "--format", "json", "--strategy", "high_impact", "-"])
        .write_stdin(FIVE_TASKS)
        .assert()
        .success();

    assert_eq!(ids(&parse_stdout(&output)["suggestions"]), vec![2, 4, 5]);
}

#[test]
fn test_suggest_skips_cycle_check() {
    let dir = TempDir::new().unwrap();
    let request = write_request(&dir, "cycle.json", MUTUAL_TASKS);

    let output = taskrank_cmd(&dir)
        .args(["suggest", "--today", TODAY, "--format", "json"])
        .arg(&request)
        .assert()
        .success();

    assert_eq!(parse_stdout(&output)["suggestions"].as_array().unwrap().len(), 2);
}

#[test]
fn test_suggest_empty_rejected() {
    let dir = TempDir::new().unwrap();
    let request = write_request(&dir, "empty.json", "[]");

    let output = taskrank_cmd(&dir)
        .args(["suggest", "--format", "json"])
        .arg(&request)
        .assert()
        .failure();

    assert_eq!(
        parse_stdout(&output),
        serde_json::json!({ "error": "No tasks provided" })
    );
}

#[test]
fn test_suggest_limit_flag() {
    let dir = TempDir::new().unwrap();
    let request = write_request(&dir, "five.json", FIVE_TASKS);

    let output = taskrank_cmd(&dir)
        .args(["suggest", "--today", TODAY, "--format", "json", "-s", "high_impact", "-n", "1"])
        .arg(&request)
        .assert()
        .success();

    assert_eq!(ids(&parse_stdout(&output)["suggestions"]), vec![2]);

    taskrank_cmd(&dir)
        .args(["suggest", "--limit", "0"])
        .arg(&request)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--limit must be at least 1"));
}

#[test]
fn test_plan_shows_both_lists() {
    let dir = TempDir::new().unwrap();
    let request = write_request(&dir, "five.json", FIVE_TASKS);

    let output = taskrank_cmd(&dir)
        .args(["plan", "--today", TODAY, "--format", "json", "--strategy", "high_impact"])
        .arg(&request)
        .assert()
        .success();

    let json = parse_stdout(&output);
    assert_eq!(ids(&json["suggestions"]), vec![2, 4, 5]);
    assert_eq!(ids(&json["tasks"]), vec![2, 4, 5, 1, 3]);

    taskrank_cmd(&dir)
        .args(["plan", "--today", TODAY])
        .arg(&request)
        .assert()
        .success()
        .stdout(predicate::str::contains("Top 3 recommendation(s):"))
        .stdout(predicate::str::contains("All tasks (5)"));
}

// =============================================================================
// Check
// =============================================================================

#[test]
fn test_check_mutual_and_full() {
    let dir = TempDir::new().unwrap();
    let mutual = write_request(&dir, "cycle.json", MUTUAL_TASKS);
    let three = write_request(&dir, "cycle3.json", THREE_CYCLE);

    let output = taskrank_cmd(&dir)
        .args(["check", "--format", "json"])
        .arg(&mutual)
        .assert()
        .success();
    assert_eq!(
        parse_stdout(&output),
        serde_json::json!({ "circular": true, "mode": "mutual", "cycle": [1, 2] })
    );

    let output = taskrank_cmd(&dir)
        .args(["check", "--format", "json"])
        .arg(&three)
        .assert()
        .success();
    assert_eq!(
        parse_stdout(&output),
        serde_json::json!({ "circular": false, "mode": "mutual" })
    );

    taskrank_cmd(&dir)
        .args(["check", "--cycle-check", "full"])
        .arg(&three)
        .assert()
        .success()
        .stdout(predicate::str::contains("Circular dependencies detected (full check): a, b, c"));
}

// =============================================================================
// Configuration and input errors
// =============================================================================

#[test]
fn test_project_config_applies() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".taskrank.toml"),
        "default_strategy = \"high_impact\"\nsuggestion_limit = 2\n",
    )
    .unwrap();
    let request = write_request(&dir, "five.json", FIVE_TASKS);

    let output = taskrank_cmd(&dir)
        .args(["suggest", "--today", TODAY, "--format", "json"])
        .arg(&request)
        .assert()
        .success();

    assert_eq!(ids(&parse_stdout(&output)["suggestions"]), vec![2, 4]);
}

#[test]
fn test_explicit_config_flag() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("custom.toml");
    fs::write(&config, "cycle_check = \"full\"\n").unwrap();
    let request = write_request(&dir, "cycle3.json", THREE_CYCLE);

    taskrank_cmd(&dir)
        .args(["analyze", "--today", TODAY, "--config"])
        .arg(&config)
        .arg(&request)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Circular dependencies detected"));
}

#[test]
fn test_bad_config_reported() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".taskrank.toml"), "suggestion_limit = 0\n").unwrap();

    taskrank_cmd(&dir)
        .arg("strategies")
        .assert()
        .failure()
        .stderr(predicate::str::contains("suggestion_limit must be at least 1"));
}

#[test]
fn test_invalid_json_reported() {
    let dir = TempDir::new().unwrap();
    let request = write_request(&dir, "broken.json", "{ tasks: ");

    taskrank_cmd(&dir)
        .arg("analyze")
        .arg(&request)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse request"));
}

#[test]
fn test_missing_request_file() {
    let dir = TempDir::new().unwrap();

    taskrank_cmd(&dir)
        .args(["analyze", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read request"));
}

#[test]
fn test_verbose_logs_to_stderr() {
    let dir = TempDir::new().unwrap();
    let request = write_request(&dir, "tasks.json", MIXED_TASKS);

    taskrank_cmd(&dir)
        .args(["--verbose", "analyze", "--today", TODAY])
        .arg(&request)
        .assert()
        .success()
        .stderr(predicate::str::contains("ranking complete"));
}
