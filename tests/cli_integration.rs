//! CLI integration tests
//!
//! These drive the built binary and cover argument parsing, error reporting
//! and exit codes. None of them reach a model or the network.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const KEY_VAR: &str = "DECKCHECK_CLI_TEST_KEY";
/// Nothing listens on the discard port, so model calls fail fast
const UNREACHABLE_ENDPOINT: &str = "http://127.0.0.1:9/v1/";

fn deckcheck_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_deckcheck"))
}

/// Runs the binary inside `dir` with a controlled model configuration
fn run_in(dir: &Path, args: &[&str], api_key: Option<&str>) -> Output {
    let mut cmd = Command::new(deckcheck_bin());
    cmd.current_dir(dir)
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("DECKCHECK_PROVIDER")
        .env_remove("DECKCHECK_MODEL")
        .env("DECKCHECK_API_BASE_URL", UNREACHABLE_ENDPOINT)
        .env("DECKCHECK_API_KEY_ENV", KEY_VAR)
        .env("DECKCHECK_LOG_LEVEL", "error");

    match api_key {
        Some(key) => cmd.env(KEY_VAR, key),
        None => cmd.env_remove(KEY_VAR),
    };

    cmd.output().expect("Failed to execute deckcheck")
}

fn write_deck(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(
        &path,
        "Acme Robotics builds picking robots for warehouses. We have 10000 active users \
         and are raising a $3M seed round led by Jane Doe.",
    )
    .unwrap();
    path
}

#[test]
fn test_cli_help() {
    let output = Command::new(deckcheck_bin())
        .arg("--help")
        .output()
        .expect("Failed to execute deckcheck");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("deckcheck"));
    for command in ["run", "plan", "research", "validate"] {
        assert!(stdout.contains(command), "help is missing {}", command);
    }
}

#[test]
fn test_cli_version() {
    let output = Command::new(deckcheck_bin())
        .arg("--version")
        .output()
        .expect("Failed to execute deckcheck");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_run_requires_deck_argument() {
    let dir = TempDir::new().unwrap();
    let output = run_in(dir.path(), &["run"], None);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("<DECK>"));
}

#[test]
fn test_invalid_format_rejected() {
    let dir = TempDir::new().unwrap();
    let deck = write_deck(dir.path(), "acme.txt");
    let output = run_in(
        dir.path(),
        &["plan", deck.to_str().unwrap(), "--format", "dockerfile"],
        Some("dummy"),
    );

    assert!(!output.status.success());
}

#[test]
fn test_missing_deck_exits_with_error() {
    let dir = TempDir::new().unwrap();
    let output = run_in(dir.path(), &["run", "nowhere.pdf", "--yes"], Some("dummy"));

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Input file does not exist"));
}

#[test]
fn test_missing_api_key_names_the_variable() {
    let dir = TempDir::new().unwrap();
    let deck = write_deck(dir.path(), "acme.txt");
    let output = run_in(dir.path(), &["plan", deck.to_str().unwrap()], None);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(KEY_VAR));
    assert!(!dir.path().join("output").exists());
}

#[test]
fn test_unsupported_deck_format() {
    let dir = TempDir::new().unwrap();
    let deck = write_deck(dir.path(), "acme.ppt");
    let output = run_in(
        dir.path(),
        &["plan", deck.to_str().unwrap(), "--output-dir", "reports"],
        Some("dummy"),
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Phase ExtractPhase failed"));
    assert!(stderr.contains(".ppt"));
}

#[test]
fn test_research_with_corrupt_plan() {
    let dir = TempDir::new().unwrap();
    let plan = dir.path().join("acme_research_plan.json");
    fs::write(&plan, "{\"company_name\": ").unwrap();

    let output = run_in(dir.path(), &["research", plan.to_str().unwrap(), "-y"], Some("dummy"));

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load research plan"));
}

#[test]
fn test_validate_rejects_empty_plan() {
    let dir = TempDir::new().unwrap();
    let plan = dir.path().join("acme_validation_plan.json");
    fs::write(
        &plan,
        r#"{"company_name": "Acme", "validation_tasks": [], "total_tasks": 0}"#,
    )
    .unwrap();

    let output = run_in(dir.path(), &["validate", plan.to_str().unwrap()], Some("dummy"));

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No validation tasks found in plan"));
    assert!(!dir.path().join("acme_validation_report.json").exists());
    assert!(!dir.path().join("acme_FINAL_REPORT.md").exists());
}

#[test]
fn test_validate_completes_offline() {
    let dir = TempDir::new().unwrap();
    let plan = dir.path().join("acme_validation_plan.json");
    fs::write(
        &plan,
        r#"{"company_name": "Acme", "validation_tasks": [
            {"validation_id": "V001", "claim": "Acme has 10000 users", "evidence": []}
        ], "total_tasks": 1}"#,
    )
    .unwrap();

    // Every model call fails to connect; the claim stays unverified and the
    // assessment falls back to rules
    let output = run_in(
        dir.path(),
        &[
            "validate",
            plan.to_str().unwrap(),
            "--yes",
            "--format",
            "json",
            "--timeout",
            "5",
        ],
        Some("dummy"),
    );

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let summary: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(summary["company_name"], "Acme");
    assert_eq!(summary["status"], "completed");
    assert_eq!(summary["validation"]["total_claims_checked"], 1);
    assert_eq!(summary["validation"]["unverified"], 1);
    assert!(dir.path().join("acme_FINAL_REPORT.md").exists());
}
