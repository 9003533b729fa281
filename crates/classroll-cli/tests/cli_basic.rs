//! Basic CLI E2E tests.
//!
//! Tests invoke the built `classroll` binary against a plan file in a
//! temporary directory and verify its outputs.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

const FALL_PLAN: &str = r#"
[semester]
start_date = "2024-09-16"
end_date = "2024-12-27"

[[holidays]]
id = "h-29ekim"
name = "Cumhuriyet Bayramı"
date = "2024-10-29"
type = "national"

[[exam_periods]]
id = "e-mid"
name = "Ara Sınavlar"
start_date = "2024-11-11"
end_date = "2024-11-15"
type = "midterm"

[[schedule]]
course_id = "c-bil101"
code = "BIL101"
name = "Programlamaya Giriş"
section = "1"
classroom = "D-201"
day = "monday"
start_time = "09:00"
end_time = "11:00"

[[schedule]]
course_id = "c-mat101"
code = "MAT101"
name = "Analiz I"
day = "tuesday"
start_time = "13:00"
end_time = "15:00"
"#;

const CLASHING_PLAN: &str = r#"{
  "schedule": [
    {"course_id": "a", "code": "FIZ101", "name": "Fizik I", "day": "wednesday",
     "start_time": "09:00", "end_time": "11:00"},
    {"course_id": "b", "code": "KIM101", "name": "Kimya I", "day": "wednesday",
     "start_time": "10:00", "end_time": "12:00"}
  ]
}"#;

const SAME_START_PLAN: &str = r#"{
  "schedule": [
    {"course_id": "a", "code": "FIZ101", "name": "Fizik I", "day": "monday",
     "start_time": "09:00", "end_time": "11:00"},
    {"course_id": "b", "code": "KIM101", "name": "Kimya I", "day": "monday",
     "start_time": "09:00", "end_time": "10:00"}
  ]
}"#;

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("fall.toml"), FALL_PLAN).unwrap();
        std::fs::write(dir.path().join("clash.json"), CLASHING_PLAN).unwrap();
        std::fs::write(dir.path().join("same_start.json"), SAME_START_PLAN).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Run a CLI command and return (stdout, stderr, exit code).
    fn run(&self, args: &[&str]) -> (String, String, i32) {
        let output = Command::new(env!("CARGO_BIN_EXE_classroll"))
            .args(args)
            .env("HOME", self.dir.path())
            .env_remove("RUST_LOG")
            .env_remove("CLASSROLL_ENV")
            .output()
            .expect("Failed to execute CLI command");

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);

        (stdout, stderr, code)
    }

    fn run_with_plan(&self, plan: &str, args: &[&str]) -> (String, String, i32) {
        let plan = self.path(plan);
        let mut full = vec!["--plan", path_str(&plan)];
        full.extend_from_slice(args);
        self.run(&full)
    }
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp path is UTF-8")
}

fn json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("stdout is JSON")
}

#[test]
fn test_expand_json_over_semester() {
    let sb = Sandbox::new();
    let (stdout, stderr, code) = sb.run_with_plan("fall.toml", &["expand", "--json"]);
    assert_eq!(code, 0, "expand failed: {stderr}");

    let sessions = json(&stdout);
    let sessions = sessions.as_array().unwrap();
    let count = |code: &str| sessions.iter().filter(|s| s["code"] == code).count();
    assert_eq!(count("BIL101"), 14);
    assert_eq!(count("MAT101"), 13);
    assert!(sessions.iter().all(|s| s["date"] != "2024-10-29"));
    assert_eq!(sessions[0]["date"], "2024-09-16");
    assert_eq!(sessions[0]["status"], "scheduled");
}

#[test]
fn test_expand_table_with_explicit_range() {
    let sb = Sandbox::new();
    let (stdout, _, code) = sb.run_with_plan(
        "fall.toml",
        &["expand", "--from", "2024-09-16", "--to", "2024-09-22"],
    );
    assert_eq!(code, 0);

    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Tarih\tGün"));
    assert!(lines[1].starts_with("16.09.2024\tPazartesi\t09:00\t11:00\tBIL101"));
    assert!(lines[2].starts_with("17.09.2024\tSalı\t13:00\t15:00\tMAT101"));
}

#[test]
fn test_expand_without_plan_fails() {
    let sb = Sandbox::new();
    let (_, stderr, code) = sb.run(&["expand"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
    assert!(stderr.contains("--plan"));
}

#[test]
fn test_summary() {
    let sb = Sandbox::new();
    let (stdout, _, code) = sb.run_with_plan("fall.toml", &["summary"]);
    assert_eq!(code, 0);

    let summary = json(&stdout);
    assert_eq!(summary["total_courses"], 2);
    assert_eq!(summary["total_hours"], 4.0);
    assert_eq!(summary["courses_by_day"]["monday"], 1);
    assert_eq!(summary["courses_by_day"]["tuesday"], 1);
}

#[test]
fn test_status_of_holiday_and_exam_days() {
    let sb = Sandbox::new();
    let (stdout, _, code) = sb.run_with_plan("fall.toml", &["status", "2024-10-29"]);
    assert_eq!(code, 0);
    let status = json(&stdout);
    assert_eq!(status["type"], "holiday");
    assert_eq!(status["message"], "Cumhuriyet Bayramı");

    let (stdout, _, _) = sb.run_with_plan("fall.toml", &["status", "2024-11-13"]);
    assert_eq!(json(&stdout)["type"], "exam");

    let (stdout, _, _) = sb.run_with_plan("fall.toml", &["status", "2025-02-03"]);
    assert_eq!(json(&stdout)["type"], "non-academic");
}

#[test]
fn test_status_rejects_malformed_date() {
    let sb = Sandbox::new();
    let (_, stderr, code) = sb.run_with_plan("fall.toml", &["status", "29.10.2024"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("29.10.2024"));
}

#[test]
fn test_check_teaching_date() {
    let sb = Sandbox::new();
    let (stdout, _, code) = sb.run_with_plan("fall.toml", &["check", "2024-09-23", "monday"]);
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["valid"], true);

    let (stdout, _, _) = sb.run_with_plan("fall.toml", &["check", "2024-09-24", "monday"]);
    let check = json(&stdout);
    assert_eq!(check["valid"], false);
    assert!(check["reason"].as_str().unwrap().contains("is not a monday"));
}

#[test]
fn test_can_start_during_exams() {
    let sb = Sandbox::new();
    let (stdout, _, code) = sb.run_with_plan("fall.toml", &["can-start", "--at", "2024-11-12T10:00"]);
    assert_eq!(code, 0);
    let decision = json(&stdout);
    assert_eq!(decision["allowed"], false);
    assert_eq!(decision["reason"], "Exam period: Ara Sınavlar");

    let (stdout, _, _) = sb.run_with_plan(
        "fall.toml",
        &["can-start", "--at", "2024-11-12T10:00", "--makeup"],
    );
    assert_eq!(json(&stdout)["allowed"], true);
}

#[test]
fn test_can_start_inside_slot_window() {
    let sb = Sandbox::new();
    let inside = ["can-start", "--at", "2024-09-16T09:30", "--day", "monday", "--start", "09:00"];
    let (stdout, _, code) = sb.run_with_plan("fall.toml", &inside);
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["allowed"], true);

    let late = ["can-start", "--at", "2024-09-16T11:30", "--day", "monday", "--start", "09:00"];
    let (stdout, _, _) = sb.run_with_plan("fall.toml", &late);
    assert_eq!(json(&stdout)["allowed"], false);
}

#[test]
fn test_can_start_unknown_slot_fails() {
    let sb = Sandbox::new();
    let args = ["can-start", "--at", "2024-09-16T09:30", "--day", "friday", "--start", "09:00"];
    let (_, stderr, code) = sb.run_with_plan("fall.toml", &args);
    assert_eq!(code, 1);
    assert!(stderr.contains("no slot"));
}

#[test]
fn test_upcoming_events() {
    let sb = Sandbox::new();
    let (stdout, _, code) = sb.run_with_plan("fall.toml", &["upcoming", "--today", "2024-10-01"]);
    assert_eq!(code, 0);

    let events = json(&stdout);
    let ids: Vec<_> = events.as_array().unwrap().iter().map(|e| e["id"].clone()).collect();
    assert_eq!(ids, ["h-29ekim", "e-mid"]);

    let (stdout, _, _) = sb.run_with_plan(
        "fall.toml",
        &["upcoming", "--today", "2024-10-01", "--count", "1"],
    );
    assert_eq!(json(&stdout).as_array().unwrap().len(), 1);
}

#[test]
fn test_export_ics() {
    let sb = Sandbox::new();
    let (stdout, _, code) = sb.run_with_plan("fall.toml", &["export", "--format", "ics", "--name", "Güz 2024"]);
    assert_eq!(code, 0);

    assert!(stdout.starts_with("BEGIN:VCALENDAR\r\n"));
    assert!(stdout.contains("X-WR-CALNAME:Güz 2024\r\n"));
    assert!(stdout.contains("DTSTAMP:"));
    assert_eq!(stdout.matches("BEGIN:VEVENT").count(), 27);
    assert!(stdout.ends_with("END:VCALENDAR\r\n"));
}

#[test]
fn test_export_ics_honours_stamp_setting() {
    let sb = Sandbox::new();
    let config = sb.path("config.toml");
    let (_, _, code) = sb.run(&["--config", path_str(&config), "config", "set", "export.stamp_events", "false"]);
    assert_eq!(code, 0);

    let plan = sb.path("fall.toml");
    let (stdout, _, code) = sb.run(&[
        "--plan",
        path_str(&plan),
        "--config",
        path_str(&config),
        "export",
        "--format",
        "ics",
    ]);
    assert_eq!(code, 0);
    assert!(!stdout.contains("DTSTAMP:"));
    assert!(stdout.contains("X-WR-CALNAME:Ders Programı\r\n"));
}

#[test]
fn test_conflicts() {
    let sb = Sandbox::new();
    let (stdout, _, code) = sb.run_with_plan("clash.json", &["conflicts"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Çarşamba"));
    assert!(stdout.contains("FIZ101"));
    assert!(stdout.contains("KIM101"));

    let (stdout, _, _) = sb.run_with_plan("clash.json", &["conflicts", "--json"]);
    assert_eq!(json(&stdout).as_array().unwrap().len(), 1);

    let (stdout, _, _) = sb.run_with_plan("fall.toml", &["conflicts"]);
    assert_eq!(stdout.trim(), "no conflicts");
}

#[test]
fn test_same_start_slots_are_reported() {
    let sb = Sandbox::new();
    let commands: [&[&str]; 3] = [
        &["conflicts"],
        &["summary"],
        &["expand", "--from", "2024-09-16", "--to", "2024-09-30"],
    ];
    for args in commands {
        let (stdout, stderr, code) = sb.run_with_plan("same_start.json", args);
        assert_eq!(code, 1, "{args:?} should fail");
        assert!(stdout.is_empty());
        assert!(stderr.contains("FIZ101"));
        assert!(stderr.contains("KIM101"));
    }
}

#[test]
fn test_config_set_get_reset() {
    let sb = Sandbox::new();
    let config = sb.path("config.toml");
    let cfg = path_str(&config);

    let (stdout, _, code) = sb.run(&["--config", cfg, "config", "set", "upcoming.default_count", "3"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "ok");

    let (stdout, _, _) = sb.run(&["--config", cfg, "config", "get", "upcoming.default_count"]);
    assert_eq!(stdout.trim(), "3");

    let (_, _, code) = sb.run(&["--config", cfg, "config", "reset"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = sb.run(&["--config", cfg, "config", "get", "upcoming.default_count"]);
    assert_eq!(stdout.trim(), "5");
}

#[test]
fn test_config_unknown_key() {
    let sb = Sandbox::new();
    let (_, stderr, code) = sb.run(&["config", "get", "export.nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_missing_semester_deny_from_config() {
    let sb = Sandbox::new();
    let (_, _, code) = sb.run(&["config", "set", "policy.missing_semester", "deny"]);
    assert_eq!(code, 0);

    let (stdout, _, code) = sb.run_with_plan("clash.json", &["status", "2024-10-02"]);
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["type"], "non-academic");
}
