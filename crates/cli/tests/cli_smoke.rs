//! CLI smoke tests for bindfix.
//!
//! These tests verify that all CLI commands run without panicking and
//! return appropriate exit codes.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a Command for the bindfix binary.
fn bindfix_cmd() -> Command {
    cargo_bin_cmd!("bindfix")
}

/// Create a temp directory holding a generated bindings file.
fn temp_bindings(content: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("bindings.js"), content).unwrap();
    temp
}

/// Bindings glue containing the browser-only type check.
const GLUE: &str =
    "export function check(arg0) { return getObject(arg0) instanceof Window; }\n";

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
    bindfix_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_works() {
    bindfix_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bindfix"));
}

#[test]
fn subcommand_help_works() {
    for cmd in &["patch", "plan", "status"] {
        bindfix_cmd()
            .arg(cmd)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage"));
    }
}

// =============================================================================
// patch
// =============================================================================

#[test]
fn patch_rewrites_in_place() {
    let temp = temp_bindings(GLUE);
    let file = temp.path().join("bindings.js");

    bindfix_cmd()
        .arg("patch")
        .arg(&file)
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote"));

    let patched = std::fs::read_to_string(&file).unwrap();
    assert!(patched.starts_with("import fetch from 'node-fetch';\n"));
    assert!(patched.contains("return true; // patched"));
    assert!(!patched.contains("instanceof Window"));
}

#[test]
fn patch_to_separate_output() {
    let temp = temp_bindings(GLUE);
    let file = temp.path().join("bindings.js");
    let out = temp.path().join("patched.js");

    bindfix_cmd()
        .arg("patch")
        .arg(&file)
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    // Input untouched, output patched
    assert_eq!(std::fs::read_to_string(&file).unwrap(), GLUE);
    assert!(std::fs::read_to_string(&out)
        .unwrap()
        .contains("true; // patched"));
}

#[test]
fn patch_nonexistent_file_fails() {
    bindfix_cmd()
        .arg("patch")
        .arg("/nonexistent/path/bindings.js")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn patch_strict_fails_when_pattern_absent() {
    let temp = temp_bindings("no browser globals here\n");
    let file = temp.path().join("bindings.js");

    bindfix_cmd()
        .arg("patch")
        .arg(&file)
        .arg("--strict")
        .assert()
        .failure()
        .stderr(predicate::str::contains("matched nothing"));
}

#[test]
fn patch_with_custom_config() {
    let temp = temp_bindings("var x = OLD;\n");
    let file = temp.path().join("bindings.js");
    let config = temp.path().join("patch.toml");
    std::fs::write(
        &config,
        r#"
preamble = ["// header"]

[[rule]]
pattern = "OLD"
replacement = "NEW"
"#,
    )
    .unwrap();

    bindfix_cmd()
        .arg("patch")
        .arg(&file)
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    let patched = std::fs::read_to_string(&file).unwrap();
    assert!(patched.starts_with("// header\n"));
    assert!(patched.contains("var x = NEW;"));
}

#[test]
fn patch_invalid_config_fails() {
    let temp = temp_bindings(GLUE);
    let file = temp.path().join("bindings.js");
    let config = temp.path().join("patch.toml");
    std::fs::write(&config, "this is not valid toml {{{").unwrap();

    bindfix_cmd()
        .arg("patch")
        .arg(&file)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

// =============================================================================
// plan
// =============================================================================

#[test]
fn plan_reports_changes_without_writing() {
    let temp = temp_bindings(GLUE);
    let file = temp.path().join("bindings.js");

    bindfix_cmd()
        .arg("plan")
        .arg(&file)
        .assert()
        .success()
        .stderr(predicate::str::contains("Would insert 2 preamble line(s)"));

    // Dry run leaves the file untouched
    assert_eq!(std::fs::read_to_string(&file).unwrap(), GLUE);
}

#[test]
fn plan_nonexistent_file_fails() {
    bindfix_cmd()
        .arg("plan")
        .arg("/nonexistent/path/bindings.js")
        .assert()
        .failure();
}

// =============================================================================
// status
// =============================================================================

#[test]
fn status_shows_builtin_config() {
    bindfix_cmd()
        .arg("status")
        .assert()
        .success()
        .stderr(predicate::str::contains("preamble"));
}
