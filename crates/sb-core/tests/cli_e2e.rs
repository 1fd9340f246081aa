//! End-to-end tests for the steepbook binary.
//!
//! Each test gets its own data and config directories; stdin is never a
//! terminal here, so confirmations are declined unless `--yes` is given.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        fs::create_dir_all(dir.path().join("config")).unwrap();
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn store_file(&self) -> std::path::PathBuf {
        self.path().join("data").join("steepbook_sessions.json")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("steepbook").expect("steepbook binary should exist");
        cmd.env("STEEPBOOK_DATA", self.path().join("data"))
            .env("STEEPBOOK_CONFIG", self.path().join("config"))
            .env("STEEPBOOK_LOG", "off")
            .env_remove("STEEPBOOK_EXPORT_DIR")
            .env_remove("STEEPBOOK_LOG_FORMAT");
        cmd
    }

    fn add(&self, tea: &str) {
        self.cmd()
            .args(["add", "--datetime", "2024-01-01T10:00", "--tea-name", tea])
            .assert()
            .success();
    }

    fn write(&self, name: &str, content: &[u8]) -> std::path::PathBuf {
        let path = self.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }
}

// ============================================================================
// Recording sessions
// ============================================================================

#[test]
fn add_then_list() {
    let sb = Sandbox::new();
    sb.cmd()
        .args([
            "add",
            "--datetime",
            "2024-01-01T10:00",
            "--tea-name",
            "Dragon Well",
            "--tea-producer",
            "Shifeng",
            "--steep",
            "Grassy",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Session saved successfully!"));

    sb.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. 2024-01-01 - Shifeng - Dragon Well"));
}

#[test]
fn empty_list() {
    Sandbox::new()
        .cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No sessions recorded yet."));
}

#[test]
fn add_requires_tea_name() {
    let sb = Sandbox::new();
    sb.cmd().arg("add").assert().code(10);
    assert!(!sb.store_file().exists());
}

#[test]
fn add_rejects_bad_datetime() {
    Sandbox::new()
        .cmd()
        .args(["add", "--tea-name", "Tea", "--datetime", "not-a-date"])
        .assert()
        .code(10)
        .stderr(predicate::str::contains("Invalid datetime"));
}

#[test]
fn add_defaults_datetime_to_now() {
    let sb = Sandbox::new();
    sb.cmd().args(["add", "--tea-name", "Tea"]).assert().success();
    let stored = fs::read_to_string(sb.store_file()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&stored).unwrap();
    let datetime = value[0]["datetime"].as_str().unwrap();
    assert_eq!(datetime.len(), "YYYY-MM-DDTHH:MM".len());
}

#[test]
fn empty_steeps_and_custom_fields_are_not_stored() {
    let sb = Sandbox::new();
    sb.cmd()
        .args([
            "add",
            "--tea-name",
            "Dragon Well",
            "--steep",
            "Wash",
            "--steep",
            "",
            "--steep",
            "Floral",
            "--custom",
            "Rating=",
        ])
        .assert()
        .success();

    let stored = || -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(sb.store_file()).unwrap()).unwrap()
    };
    let value = stored();
    assert_eq!(value[0]["steeps"], serde_json::json!(["Wash", "Floral"]));
    assert_eq!(value[0]["customFields"], serde_json::json!([]));

    sb.cmd()
        .args(["edit", "1", "--steep", "", "--custom", "Water Temperature="])
        .assert()
        .success();
    let value = stored();
    assert_eq!(value[0]["steeps"], serde_json::json!([]));
    assert_eq!(value[0]["customFields"], serde_json::json!([]));
}

#[test]
fn jsonl_logs_without_timestamps() {
    let sb = Sandbox::new();
    let assert = sb
        .cmd()
        .args([
            "add",
            "--tea-name",
            "Tea",
            "--log-level",
            "info",
            "--log-format",
            "jsonl",
            "--no-timestamps",
        ])
        .assert()
        .success();
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    let lines: Vec<serde_json::Value> = stderr
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert!(lines
        .iter()
        .any(|line| line["fields"]["message"] == "Session stored"));
    assert!(lines.iter().all(|line| line.get("timestamp").is_none()));
}

#[test]
fn show_prints_labels() {
    let sb = Sandbox::new();
    sb.cmd()
        .args([
            "add",
            "--datetime",
            "2024-01-01T10:00",
            "--tea-name",
            "7542",
            "--steep",
            "Wash",
            "--steep",
            "Fruity",
            "--custom",
            "Water Temperature=100°C",
        ])
        .assert()
        .success();

    sb.cmd()
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tea Name: 7542"))
        .stdout(predicate::str::contains("Steep 2: Fruity"))
        .stdout(predicate::str::contains("Water temperature: 100°C"));
}

#[test]
fn show_out_of_range() {
    let sb = Sandbox::new();
    sb.add("Only");
    sb.cmd().args(["show", "2"]).assert().code(10);
    sb.cmd().args(["show", "0"]).assert().code(10);
}

#[test]
fn edit_replaces_in_place() {
    let sb = Sandbox::new();
    sb.add("First");
    sb.add("Second");

    sb.cmd()
        .args(["edit", "1", "--tea-name", "First (rebrewed)", "--origin", "Fujian"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Session updated successfully!"));

    sb.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. 2024-01-01 -  - First (rebrewed)"))
        .stdout(predicate::str::contains("2. 2024-01-01 -  - Second"));

    sb.cmd()
        .args(["show", "1"])
        .assert()
        .stdout(predicate::str::contains("Origin: Fujian"));
}

// ============================================================================
// Deleting
// ============================================================================

#[test]
fn delete_needs_confirmation() {
    let sb = Sandbox::new();
    sb.add("Keep me");

    sb.cmd().args(["delete", "1"]).assert().code(4);
    sb.cmd()
        .arg("list")
        .assert()
        .stdout(predicate::str::contains("Keep me"));

    sb.cmd()
        .args(["delete", "1", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Session deleted."));
    sb.cmd()
        .arg("list")
        .assert()
        .stdout(predicate::str::contains("No sessions recorded yet."));
}

// ============================================================================
// Export / import
// ============================================================================

#[test]
fn export_csv_writes_file() {
    let sb = Sandbox::new();
    sb.add("Dragon Well");
    let out = sb.path().join("exports");

    sb.cmd()
        .args(["export", "--format", "csv", "--out-dir"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Sessions exported successfully!"))
        .stdout(predicate::str::contains("steepbook_sessions.csv"));

    let text = fs::read_to_string(out.join("steepbook_sessions.csv")).unwrap();
    assert!(text.starts_with("datetime,teaName,brewingVessel"));
    assert!(text.contains("2024-01-01T10:00,Dragon Well"));
}

#[test]
fn export_json_then_import_round_trip() {
    let sb = Sandbox::new();
    sb.add("A");
    sb.add("B");
    let out = sb.path().join("exports");
    sb.cmd()
        .args(["export", "--format", "json", "--out-dir"])
        .arg(&out)
        .assert()
        .success();

    let other = Sandbox::new();
    other
        .cmd()
        .arg("import")
        .arg(out.join("steepbook_sessions.json"))
        .arg("--yes")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sessions imported successfully!"));
    other
        .cmd()
        .arg("list")
        .assert()
        .stdout(predicate::str::contains("1. 2024-01-01 -  - A"))
        .stdout(predicate::str::contains("2. 2024-01-01 -  - B"));
}

#[test]
fn export_to_unwritable_dir_fails() {
    let sb = Sandbox::new();
    sb.add("Tea");
    let blocker = sb.write("blocker", b"file");
    sb.cmd()
        .args(["export", "--format", "json", "--out-dir"])
        .arg(&blocker)
        .assert()
        .code(16)
        .stderr(predicate::str::contains("Error exporting sessions to JSON."));
}

#[test]
fn import_partial_keeps_valid_rows() {
    let sb = Sandbox::new();
    sb.add("Replaced");
    let file = sb.write(
        "log.csv",
        b"datetime,teaName\n2024-02-01T09:00,Valid\nnot-a-date,Broken\n",
    );

    sb.cmd()
        .arg("import")
        .arg(&file)
        .arg("--yes")
        .assert()
        .code(3)
        .stderr(predicate::str::contains(
            "Some sessions in the CSV file were invalid and were skipped.",
        ));

    sb.cmd()
        .arg("list")
        .assert()
        .stdout(predicate::str::contains("1. 2024-02-01 -  - Valid"))
        .stdout(predicate::str::contains("Replaced").not());
}

#[test]
fn import_header_only_leaves_sessions() {
    let sb = Sandbox::new();
    sb.add("Survivor");
    let before = fs::read(sb.store_file()).unwrap();
    let file = sb.write("empty.csv", b"datetime,teaName\n");

    sb.cmd()
        .arg("import")
        .arg(&file)
        .arg("--yes")
        .assert()
        .code(15)
        .stderr(predicate::str::contains("Error importing sessions from CSV."));

    assert_eq!(fs::read(sb.store_file()).unwrap(), before);
}

#[test]
fn import_needs_confirmation() {
    let sb = Sandbox::new();
    sb.add("Original");
    let file = sb.write("new.json", b"[]");
    sb.cmd().arg("import").arg(&file).assert().code(4);
    sb.cmd()
        .arg("list")
        .assert()
        .stdout(predicate::str::contains("Original"));
}

#[test]
fn assume_yes_from_config_file() {
    let sb = Sandbox::new();
    sb.add("Original");
    fs::write(sb.path().join("config/config.toml"), "assume_yes = true\n").unwrap();
    let file = sb.write("new.json", b"[]");
    sb.cmd().arg("import").arg(&file).assert().success();
    sb.cmd()
        .arg("list")
        .assert()
        .stdout(predicate::str::contains("No sessions recorded yet."));
}

#[test]
fn import_format_from_flag_or_extension() {
    let sb = Sandbox::new();
    let file = sb.write("sessions.txt", b"[]");
    sb.cmd().arg("import").arg(&file).arg("--yes").assert().code(10);
    sb.cmd()
        .arg("import")
        .arg(&file)
        .args(["--format", "json", "--yes"])
        .assert()
        .success();
}

#[test]
fn import_non_text_file_fails() {
    let sb = Sandbox::new();
    let file = sb.write("binary.json", &[0xff, 0xfe, 0xfd]);
    sb.cmd()
        .arg("import")
        .arg(&file)
        .arg("--yes")
        .assert()
        .code(15)
        .stderr(predicate::str::contains("Error importing sessions from JSON."));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn corrupt_store_is_storage_error() {
    let sb = Sandbox::new();
    fs::create_dir_all(sb.path().join("data")).unwrap();
    fs::write(sb.store_file(), "{broken").unwrap();
    sb.cmd()
        .arg("list")
        .assert()
        .code(17)
        .stderr(predicate::str::contains(
            "Error loading sessions from local storage.",
        ));
}

#[test]
fn unknown_command_is_args_error() {
    Sandbox::new()
        .cmd()
        .arg("brew")
        .assert()
        .code(10)
        .stderr(predicate::str::contains("error"));
}

#[test]
fn bad_config_file_is_reported() {
    let sb = Sandbox::new();
    fs::write(sb.path().join("config/config.toml"), "assume_yes = maybe").unwrap();
    sb.cmd()
        .arg("list")
        .assert()
        .code(10)
        .stderr(predicate::str::contains("config.toml"));
}

#[test]
fn help_succeeds() {
    Sandbox::new()
        .cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("import"));
}
