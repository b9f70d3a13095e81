//! Binary-level CLI tests
//!
//! Spawns the real binary for argument parsing and the offline
//! subcommands. Nothing here talks to the network: the model registry
//! commands run entirely from configuration, and the failure cases are
//! rejected before a request is made.

use assert_cmd::Command;
use predicates::prelude::*;

fn fitsage() -> Command {
    Command::cargo_bin("fitsage").unwrap()
}

/// --help lists every subcommand.
#[test]
fn test_help_lists_subcommands() {
    fitsage()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("summarize"))
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("models"));
}

#[test]
fn test_version_flag() {
    fitsage()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fitsage"));
}

/// No subcommand is a usage error.
#[test]
fn test_missing_subcommand_fails() {
    fitsage()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_unknown_subcommand_fails() {
    fitsage().arg("definitely-not-a-command").assert().failure();
}

/// A missing config file falls back to defaults, so the registry commands
/// still work.
#[test]
fn test_models_list_with_default_config() {
    fitsage()
        .args(["--config", "does-not-exist.yaml", "models", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gemini-2.5-flash"))
        .stdout(predicate::str::contains("llama-3.3-70b-versatile"));
}

#[test]
fn test_models_current_with_default_config() {
    fitsage()
        .args(["--config", "does-not-exist.yaml", "models", "current"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Chat model"))
        .stdout(predicate::str::contains("Plan model"));
}

/// Plan generation requires a profile path at parse time.
#[test]
fn test_plan_requires_profile_flag() {
    fitsage()
        .args(["plan"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--profile"));
}

/// Giving summarize both inline text and a file is rejected before any
/// request goes out.
#[test]
fn test_summarize_rejects_text_and_file_together() {
    fitsage()
        .args([
            "--config",
            "does-not-exist.yaml",
            "summarize",
            "some text",
            "--file",
            "notes.txt",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not both"));
}

/// A nonexistent profile file is a profile error, not a crash.
#[test]
fn test_plan_with_missing_profile_fails_cleanly() {
    fitsage()
        .args([
            "--config",
            "does-not-exist.yaml",
            "plan",
            "--profile",
            "no-such-profile.yaml",
        ])
        .assert()
        .failure();
}
