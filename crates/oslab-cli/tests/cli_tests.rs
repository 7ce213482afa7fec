//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn oslab() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("oslab").unwrap()
}

#[test]
fn help_output() {
    oslab()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Interactive OS architecture lab"));
}

#[test]
fn version_output() {
    oslab()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("oslab"));
}

#[test]
fn validate_shipped_lab() {
    oslab()
        .arg("validate")
        .arg("--lab")
        .arg("../../labs/os-architectures.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("5 cards, 4 commands, 3 scenarios"))
        .stdout(predicate::str::contains("All lab definitions valid."));
}

#[test]
fn validate_directory() {
    oslab()
        .arg("validate")
        .arg("--lab")
        .arg("../../labs")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Practical work report: OS architecture approaches",
        ));
}

#[test]
fn validate_nonexistent_file() {
    oslab()
        .arg("validate")
        .arg("--lab")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn validate_reports_warnings_without_failing() {
    let dir = TempDir::new().unwrap();
    let shipped = std::fs::read_to_string("../../labs/os-architectures.toml").unwrap();
    let broken = shipped.replace("global_budget_minutes = 60", "global_budget_minutes = 0");
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, broken).unwrap();

    oslab()
        .arg("validate")
        .arg("--lab")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("WARNING"))
        .stdout(predicate::str::contains("warning(s) found."));
}

#[test]
fn init_creates_example_lab() {
    let dir = TempDir::new().unwrap();

    oslab()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created labs/example.toml"));

    assert!(dir.path().join("labs/example.toml").exists());

    // the generated file validates cleanly
    oslab()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--lab")
        .arg("labs/example.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("All lab definitions valid."));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    oslab().current_dir(dir.path()).arg("init").assert().success();

    oslab()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn run_with_missing_lab_fails() {
    oslab()
        .arg("run")
        .arg("--lab")
        .arg("no_such_lab.toml")
        .write_stdin("quit\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn run_smoke_script() {
    oslab()
        .arg("run")
        .write_stdin("start\nstatus\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Type 'start' to begin, 'help' for commands.",
        ))
        .stdout(predicate::str::contains("Task 1 of 4: OS classification"))
        .stdout(predicate::str::contains("Cards in the pool"));
}

#[test]
fn run_ends_cleanly_at_eof() {
    oslab()
        .arg("run")
        .write_stdin("start\n")
        .assert()
        .success();
}

#[test]
fn run_help_lists_the_task_verbs() {
    oslab()
        .arg("run")
        .write_stdin("help\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("pick <card> [zone]"))
        .stdout(predicate::str::contains("write <field> <text>"));
}
