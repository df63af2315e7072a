// crates/checkup-cli/src/engine_tests.rs
// ============================================================================
// Module: Command Engine Tests
// Description: Unit tests for the bundled shell-command check engine.
// Purpose: Pin outcome mapping, ordering, and target filtering.
// Dependencies: checkup-core, serde_json, tempfile.
// ============================================================================

//! ## Overview
//! Runs the bundled engine against small compiled checks files inside
//! throwaway working areas.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::PathBuf;

use checkup_core::CheckEngine;
use checkup_core::CheckSpec;
use checkup_core::CheckStatus;
use checkup_core::ChecksFile;
use checkup_core::Failure;
use tempfile::TempDir;

use crate::engine::CommandEngine;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn write_checks(checks: Vec<CheckSpec>) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("checks.json");
    let text = serde_json::to_string_pretty(&ChecksFile {
        checks,
    })
    .expect("serialize checks");
    fs::write(&path, text).expect("write checks file");
    (dir, path)
}

fn spec(name: &str, run: &str, exit: i32) -> CheckSpec {
    CheckSpec {
        name: name.to_string(),
        description: Some(format!("{name} description")),
        run: run.to_string(),
        exit,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn matching_exit_code_passes_and_mismatch_fails() {
    let (_guard, checks) = write_checks(vec![
        spec("exists", "test -f hello.txt", 0),
        spec("rejects", "exit 3", 0),
    ]);
    let area = tempfile::tempdir().expect("working area");
    fs::write(area.path().join("hello.txt"), "hello\n").expect("stage file");

    let outcomes = CommandEngine::default().run(&checks, area.path(), None).expect("run checks");
    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].status, CheckStatus::Passed);
    assert!(outcomes[0].message.is_none());
    assert_eq!(outcomes[1].status, CheckStatus::Failed);
    assert_eq!(outcomes[1].message.as_deref(), Some("expected exit code 0, got 3"));
}

#[test]
fn nonzero_expected_exit_code_is_honored() {
    let (_guard, checks) = write_checks(vec![spec("wants_two", "exit 2", 2)]);
    let area = tempfile::tempdir().expect("working area");

    let outcomes = CommandEngine::default().run(&checks, area.path(), None).expect("run checks");
    assert_eq!(outcomes[0].status, CheckStatus::Passed);
}

#[test]
fn check_output_is_captured_into_the_hidden_log() {
    let (_guard, checks) =
        write_checks(vec![spec("chatty", "echo out; echo err >&2; exit 0", 0)]);
    let area = tempfile::tempdir().expect("working area");

    let outcomes = CommandEngine::default().run(&checks, area.path(), None).expect("run checks");
    assert_eq!(outcomes[0].log, vec!["out".to_string(), "err".to_string()]);
}

#[test]
fn verbose_engine_streams_output_instead_of_capturing_it() {
    let (_guard, checks) =
        write_checks(vec![spec("chatty", "echo out; echo err >&2; exit 0", 0)]);
    let area = tempfile::tempdir().expect("working area");

    let outcomes =
        CommandEngine::new(true).run(&checks, area.path(), None).expect("run checks");
    assert_eq!(outcomes[0].status, CheckStatus::Passed);
    // Output went to the inherited streams, so nothing lands in the log.
    assert!(outcomes[0].log.is_empty());
}

#[test]
fn outcomes_preserve_checks_file_order() {
    let (_guard, checks) = write_checks(vec![
        spec("zeta", "exit 0", 0),
        spec("alpha", "exit 0", 0),
        spec("mid", "exit 0", 0),
    ]);
    let area = tempfile::tempdir().expect("working area");

    let outcomes = CommandEngine::default().run(&checks, area.path(), None).expect("run checks");
    let names: Vec<&str> = outcomes.iter().map(|outcome| outcome.name.as_str()).collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn targets_restrict_the_run() {
    let (_guard, checks) = write_checks(vec![
        spec("first", "exit 0", 0),
        spec("second", "exit 0", 0),
    ]);
    let area = tempfile::tempdir().expect("working area");

    let outcomes = CommandEngine::default()
        .run(&checks, area.path(), Some(&["second".to_string()]))
        .expect("run checks");
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].name, "second");
}

#[test]
fn unknown_target_is_rejected_with_suggestions() {
    let (_guard, checks) = write_checks(vec![spec("first", "exit 0", 0)]);
    let area = tempfile::tempdir().expect("working area");

    let err = CommandEngine::default()
        .run(&checks, area.path(), Some(&["fist".to_string()]))
        .expect_err("expected unknown target");
    let Failure::InvalidTarget {
        suggestions, ..
    } = err
    else {
        panic!("expected invalid target");
    };
    assert_eq!(suggestions, vec!["first".to_string()]);
}

#[test]
fn missing_checks_file_is_not_found() {
    let area = tempfile::tempdir().expect("working area");

    let err = CommandEngine::default()
        .run(&area.path().join("absent.json"), area.path(), None)
        .expect_err("expected missing file");
    assert!(matches!(err, Failure::NotFound { .. }));
}

#[test]
fn malformed_checks_file_is_invalid_target() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("checks.json");
    fs::write(&path, "not json").expect("write checks file");

    let err = CommandEngine::default().run(&path, dir.path(), None).expect_err("expected parse failure");
    assert!(matches!(err, Failure::InvalidTarget { .. }));
}
