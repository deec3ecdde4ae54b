//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data directory.

use std::io::Write;
use std::process::{Command, Stdio};
use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(dir: &TempDir, args: &[&str]) -> (String, String, i32) {
    run_cli_with_input(dir, args, None)
}

fn run_cli_with_input(dir: &TempDir, args: &[&str], input: Option<&str>) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_dailylog"))
        .args(args)
        .env("DAILYLOG_DATA_DIR", dir.path())
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");

    {
        let mut stdin = child.stdin.take().unwrap();
        if let Some(input) = input {
            stdin.write_all(input.as_bytes()).unwrap();
        }
    }

    let output = child.wait_with_output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(dir: &TempDir, args: &[&str]) -> serde_json::Value {
    let (stdout, stderr, code) = run_cli(dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

fn add_routine(dir: &TempDir, title: &str, category: &str) -> String {
    let routine = run_json(dir, &["routine", "add", title, "--category", category]);
    routine["id"].as_str().unwrap().to_string()
}

#[test]
fn test_routine_add_and_list() {
    let dir = TempDir::new().unwrap();
    add_routine(&dir, "Water", "Morning");
    add_routine(&dir, "Read", "evening");

    let all = run_json(&dir, &["routine", "list"]);
    let all = all.as_array().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[1]["order"], 1);
    assert_eq!(all[1]["category"], "Evening");

    let morning = run_json(&dir, &["routine", "list", "--category", "Morning"]);
    assert_eq!(morning.as_array().unwrap().len(), 1);
}

#[test]
fn test_routine_add_uses_config_defaults() {
    let dir = TempDir::new().unwrap();
    let (_, _, code) = run_cli(&dir, &["config", "set", "new_routine.emoji", "🌙"]);
    assert_eq!(code, 0);

    let routine = run_json(&dir, &["routine", "add"]);
    assert_eq!(routine["title"], "New habit");
    assert_eq!(routine["emoji"], "🌙");
    assert_eq!(routine["category"], "Morning");
}

#[test]
fn test_focus_show_end_to_end() {
    let dir = TempDir::new().unwrap();
    let a = add_routine(&dir, "A", "Morning");
    let b = add_routine(&dir, "B", "Morning");

    let focus = run_json(&dir, &["focus", "show", "--category", "Morning"]);
    assert_eq!(focus["completed_count"], 0);
    assert_eq!(focus["total_count"], 2);
    assert_eq!(focus["next_routine_id"], a.as_str());

    run_json(&dir, &["log", "done", &a]);
    let focus = run_json(&dir, &["focus", "show", "--category", "Morning"]);
    assert_eq!(focus["completed_count"], 1);
    assert_eq!(focus["next_routine_id"], b.as_str());
}

#[test]
fn test_focus_skip_persists() {
    let dir = TempDir::new().unwrap();
    let a = add_routine(&dir, "A", "Afternoon");
    let b = add_routine(&dir, "B", "Afternoon");

    let (_, _, code) = run_cli(&dir, &["focus", "skip", &a]);
    assert_eq!(code, 0);

    let focus = run_json(&dir, &["focus", "show", "--category", "Afternoon"]);
    assert_eq!(focus["total_count"], 1);
    assert_eq!(focus["next_routine_id"], b.as_str());
}

#[test]
fn test_focus_run_rotates_postponed() {
    let dir = TempDir::new().unwrap();
    add_routine(&dir, "Alpha", "Morning");
    add_routine(&dir, "Beta", "Morning");
    add_routine(&dir, "Gamma", "Morning");

    let (stdout, stderr, code) = run_cli_with_input(
        &dir,
        &["focus", "run", "--category", "Morning"],
        Some("p\np\np\ndone\nq\n"),
    );
    assert_eq!(code, 0, "{stderr}");

    let lines: Vec<_> = stdout.lines().collect();
    assert!(lines[0].contains("next: ✨ Alpha"), "{stdout}");
    assert!(lines[1].contains("next: ✨ Beta"), "{stdout}");
    assert!(lines[2].contains("next: ✨ Gamma"), "{stdout}");
    assert!(lines[3].contains("next: ✨ Alpha"), "{stdout}");
    assert!(lines[4].contains("1/3"), "{stdout}");

    // Postponement is gone in a new process; the completion is not.
    let focus = run_json(&dir, &["focus", "show", "--category", "Morning"]);
    assert_eq!(focus["completed_count"], 1);
    let next = focus["next_routine_id"].as_str().unwrap();
    let beta = run_json(&dir, &["routine", "list"])[1]["id"].as_str().unwrap().to_string();
    assert_eq!(next, beta);
}

#[test]
fn test_routine_move_out_of_range_is_noop() {
    let dir = TempDir::new().unwrap();
    add_routine(&dir, "A", "Morning");
    add_routine(&dir, "B", "Morning");

    let (stdout, _, code) = run_cli(&dir, &["routine", "move", "--category", "Morning", "0", "-1"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("No change"));

    let view = run_json(&dir, &["routine", "move", "--category", "Morning", "1", "0"]);
    assert_eq!(view[0]["title"], "B");
    assert_eq!(view[0]["order"], 0);
}

#[test]
fn test_log_toggle_and_history() {
    let dir = TempDir::new().unwrap();
    let a = add_routine(&dir, "A", "Evening");

    let (stdout, _, code) = run_cli(&dir, &["log", "toggle", &a]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("Done:"));

    let history = run_json(&dir, &["log", "history", "--routine", &a]);
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["routine"]["title"], "A");

    let (stdout, _, _) = run_cli(&dir, &["log", "toggle", &a]);
    assert!(stdout.starts_with("Log removed:"));
    let history = run_json(&dir, &["log", "history"]);
    assert!(history.as_array().unwrap().is_empty());
}

#[test]
fn test_log_history_by_day() {
    let dir = TempDir::new().unwrap();
    let a = add_routine(&dir, "A", "Morning");
    let b = add_routine(&dir, "B", "Morning");
    run_json(&dir, &["log", "done", &a]);
    run_json(&dir, &["log", "done", &b]);

    let days = run_json(&dir, &["log", "history", "--by-day"]);
    let days = days.as_array().unwrap();
    assert_eq!(days.len(), 1);
    assert_eq!(days[0]["entries"].as_array().unwrap().len(), 2);
    assert!(days[0]["date"].is_string());

    let only_b = run_json(&dir, &["log", "history", "--by-day", "--routine", &b]);
    assert_eq!(only_b[0]["entries"].as_array().unwrap().len(), 1);
    assert_eq!(only_b[0]["entries"][0]["routine"]["title"], "B");
}

#[test]
fn test_broken_config_is_kept_and_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    let original = "default_category = \"Night\"\n";
    std::fs::write(&path, original).unwrap();

    let (stdout, stderr, code) = run_cli(&dir, &["routine", "add", "Water"]);
    assert_eq!(code, 0, "{stderr}");
    let routine: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(routine["category"], "Morning");
    assert!(stderr.contains("using default configuration"), "{stderr}");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_unknown_routine_fails() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&dir, &["log", "done", "missing"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Routine not found: missing"));
}

#[test]
fn test_data_export_import_round_trip() {
    let source = TempDir::new().unwrap();
    let a = add_routine(&source, "A", "Morning");
    run_json(&source, &["log", "done", &a, "--note", "first"]);

    let file = source.path().join("export.json");
    let (_, _, code) = run_cli(&source, &["data", "export", "--output", file.to_str().unwrap()]);
    assert_eq!(code, 0);

    let target = TempDir::new().unwrap();
    let (_, _, code) = run_cli(&target, &["data", "import", file.to_str().unwrap()]);
    assert_eq!(code, 0);

    let exported = run_json(&target, &["data", "export"]);
    assert_eq!(exported["routines"][0]["id"], a.as_str());
    assert_eq!(exported["logs"][0]["routineId"], a.as_str());
    assert_eq!(exported["logs"][0]["note"], "first");
}

#[test]
fn test_config_get_set() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(&dir, &["config", "get", "history.limit"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "50");

    let (_, _, code) = run_cli(&dir, &["config", "set", "default_category", "Night"]);
    assert_ne!(code, 0);
    let (_, _, code) = run_cli(&dir, &["config", "get", "no.such.key"]);
    assert_ne!(code, 0);
}
