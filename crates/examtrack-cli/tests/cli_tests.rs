//! CLI integration tests using assert_cmd.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures")
        .join(name)
}

/// Runs inside an empty directory with an empty HOME so no stray config is found.
fn examtrack(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("examtrack").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env_remove("EXAMTRACK_DATA")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn analyze_text_summary() {
    let dir = TempDir::new().unwrap();
    examtrack(&dir)
        .arg("analyze")
        .arg("--data")
        .arg(fixture("submissions.json"))
        .arg("--student")
        .arg("student-1")
        .arg("--exam-type")
        .arg("tyt")
        .assert()
        .success()
        .stdout(predicate::str::contains("75.50"))
        .stdout(predicate::str::contains("81.00"))
        .stdout(predicate::str::contains("11.00"))
        .stdout(predicate::str::contains("TYT Genel 2"));
}

#[test]
fn analyze_json_output() {
    let dir = TempDir::new().unwrap();
    let output = examtrack(&dir)
        .arg("analyze")
        .arg("--data")
        .arg(fixture("submissions.json"))
        .arg("--exam-type")
        .arg("AYT")
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let report = &json["report"];
    assert_eq!(report["stats"]["totalExams"], 1);
    assert_eq!(report["stats"]["latestNet"], "27.00");
    assert_eq!(report["sittings"][0]["name"], "Deneme1");
    assert_eq!(json["filter"]["examType"], "AYT");
    assert!(json["id"].is_string());
}

#[test]
fn analyze_markdown_to_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("report.md");
    examtrack(&dir)
        .arg("analyze")
        .arg("--data")
        .arg(fixture("submissions.json"))
        .arg("--format")
        .arg("markdown")
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written"));

    let md = std::fs::read_to_string(out).unwrap();
    assert!(md.contains("## Exam summary"));
    assert!(md.contains("| 2024-03-01 | AYT | Deneme1 | 27.00 | 2 |"));
}

#[test]
fn analyze_unknown_exam_type_fails() {
    let dir = TempDir::new().unwrap();
    examtrack(&dir)
        .arg("analyze")
        .arg("--data")
        .arg(fixture("submissions.json"))
        .arg("--exam-type")
        .arg("KPSS")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown exam type"));
}

#[test]
fn analyze_unknown_format_fails() {
    let dir = TempDir::new().unwrap();
    examtrack(&dir)
        .arg("analyze")
        .arg("--data")
        .arg(fixture("submissions.json"))
        .arg("--format")
        .arg("yaml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn analyze_missing_data_file() {
    let dir = TempDir::new().unwrap();
    examtrack(&dir)
        .arg("analyze")
        .arg("--data")
        .arg("no_such_file.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn analyze_uses_env_data_file() {
    let dir = TempDir::new().unwrap();
    examtrack(&dir)
        .env("EXAMTRACK_DATA", fixture("submissions.json"))
        .arg("analyze")
        .arg("--exam-type")
        .arg("LGS")
        .assert()
        .success()
        .stdout(predicate::str::contains("LGS Deneme 1"));
}

#[test]
fn analyze_empty_data_reports_zeros() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("empty.json");
    std::fs::write(&data, "[]").unwrap();
    examtrack(&dir)
        .arg("analyze")
        .arg("--data")
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("No exam sittings found"));
}

#[test]
fn validate_clean_fixture() {
    let dir = TempDir::new().unwrap();
    examtrack(&dir)
        .arg("validate")
        .arg("--data")
        .arg(fixture("submissions.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("6 loaded"))
        .stdout(predicate::str::contains("All submissions valid"));
}

#[test]
fn validate_reports_problems() {
    let dir = TempDir::new().unwrap();
    examtrack(&dir)
        .arg("validate")
        .arg("--data")
        .arg(fixture("messy.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("SKIPPED"))
        .stdout(predicate::str::contains("duplicate submission ID: dup"))
        .stdout(predicate::str::contains("exceeds totalQuestions"))
        .stdout(predicate::str::contains("Astronomi"))
        .stdout(predicate::str::contains("[no-payload] WARNING: subject payload is missing"));
}

#[test]
fn validate_strict_fails_on_warnings() {
    let dir = TempDir::new().unwrap();
    examtrack(&dir)
        .arg("validate")
        .arg("--strict")
        .arg("--data")
        .arg(fixture("messy.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("validation failed"));
}

#[test]
fn practice_summary() {
    let dir = TempDir::new().unwrap();
    examtrack(&dir)
        .arg("practice")
        .arg("--log")
        .arg(fixture("practice.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("60 questions, 50 correct, 10 wrong (83.3% success)"))
        .stdout(predicate::str::contains("Recent activity"));
}

#[test]
fn practice_json() {
    let dir = TempDir::new().unwrap();
    let output = examtrack(&dir)
        .arg("practice")
        .arg("--log")
        .arg(fixture("practice.json"))
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["totalQuestions"], 60);
    assert_eq!(json["recent"][0]["date"], "2024-03-12");
    assert_eq!(json["recent"].as_array().unwrap().len(), 4);
}

#[test]
fn delete_removes_submission() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data.json");
    std::fs::copy(fixture("submissions.json"), &data).unwrap();

    examtrack(&dir)
        .arg("delete")
        .arg("--data")
        .arg(&data)
        .arg("--id")
        .arg("ayt-d1-fiz")
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted ayt-d1-fiz (5 submission(s) remain)"));

    // the sitting survives with its remaining member
    examtrack(&dir)
        .arg("analyze")
        .arg("--data")
        .arg(&data)
        .arg("--exam-type")
        .arg("AYT")
        .arg("--format")
        .arg("markdown")
        .assert()
        .success()
        .stdout(predicate::str::contains("| 2024-03-01 | AYT | Deneme1 | 18.00 | 1 |"));

    examtrack(&dir)
        .arg("delete")
        .arg("--data")
        .arg(&data)
        .arg("--id")
        .arg("ayt-d1-fiz")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no submission with id"));
}

#[test]
fn delete_refuses_file_with_unreadable_records() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("messy.json");
    std::fs::copy(fixture("messy.json"), &data).unwrap();

    examtrack(&dir)
        .arg("delete")
        .arg("--data")
        .arg(&data)
        .arg("--id")
        .arg("no-payload")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unreadable record"));
}

#[test]
fn config_file_controls_engine() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("custom.toml");
    std::fs::write(
        &config,
        format!(
            "data_file = {:?}\ndefault_exam_type = \"TYT\"\n\n[engine]\nnet_decimals = 1\n",
            fixture("submissions.json").display().to_string()
        ),
    )
    .unwrap();

    examtrack(&dir)
        .arg("analyze")
        .arg("--config")
        .arg(&config)
        .arg("--student")
        .arg("student-1")
        .assert()
        .success()
        .stdout(predicate::str::contains("75.5"))
        .stdout(predicate::str::contains("75.50").not());
}

#[test]
fn missing_config_file_fails() {
    let dir = TempDir::new().unwrap();
    examtrack(&dir)
        .arg("analyze")
        .arg("--config")
        .arg("absent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    examtrack(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created examtrack.toml"))
        .stdout(predicate::str::contains("Created examtrack-data.json"));

    assert!(dir.path().join("examtrack.toml").exists());
    assert!(dir.path().join("examtrack-practice.json").exists());

    // the starter files are picked up without flags
    examtrack(&dir)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("All submissions valid"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    examtrack(&dir).arg("init").assert().success();

    examtrack(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn help_output() {
    let dir = TempDir::new().unwrap();
    examtrack(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exam practice scoring and progress analytics"));
}

#[test]
fn version_output() {
    let dir = TempDir::new().unwrap();
    examtrack(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("examtrack"));
}
