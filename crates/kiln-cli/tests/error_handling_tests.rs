//! Tests for error output: suggestions, plain rendering, and verbosity.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn kiln(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("kiln").unwrap();
    cmd.current_dir(home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("HOME", home)
        .env_remove("KILN_CONFIG");
    cmd
}

#[test]
fn unknown_stack_suggests_available_stacks() {
    let home = TempDir::new().unwrap();
    kiln(home.path())
        .args(["install", "react", "-y"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Suggestions:"))
        .stderr(predicate::str::contains("Available stacks"))
        .stderr(predicate::str::contains("svelte"));
}

#[test]
fn piped_errors_carry_no_ansi_codes() {
    let home = TempDir::new().unwrap();
    kiln(home.path())
        .args(["install", "react", "-y"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\u{1b}[").not());
}

#[test]
fn verbose_hint_only_without_verbose() {
    let home = TempDir::new().unwrap();
    kiln(home.path())
        .args(["install", "react", "-y"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Use -v / --verbose"));

    kiln(home.path())
        .args(["-v", "install", "react", "-y"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Use -v / --verbose").not());
}

#[test]
fn missing_project_suggests_path_flag() {
    let home = TempDir::new().unwrap();
    kiln(home.path())
        .args(["install", "svelte", "-y", "--path", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--path"));
}
