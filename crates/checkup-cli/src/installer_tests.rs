// crates/checkup-cli/src/installer_tests.rs
// ============================================================================
// Module: Dependency Installer Tests
// Description: Unit tests for the single-shot dependency installer.
// Purpose: Pin exit-code handling without invoking a real package manager.
// Dependencies: checkup-core.
// ============================================================================

//! ## Overview
//! Substitutes `true`/`false` for the installer program so the subprocess
//! contract (one attempt, non-zero is a failure) can be asserted cheaply.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use checkup_core::Failure;

use crate::installer::run_installer;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn empty_dependency_list_skips_the_installer_entirely() {
    run_installer("this-program-does-not-exist", &[], false).expect("nothing to install");
}

#[test]
fn successful_installer_exit_is_ok() {
    let dependencies = vec!["requests".to_string(), "flask==2.0".to_string()];
    run_installer("true", &dependencies, false).expect("installer succeeded");
}

#[test]
fn nonzero_installer_exit_is_a_dependency_failure() {
    let dependencies = vec!["requests".to_string()];

    let err = run_installer("false", &dependencies, false).expect_err("installer failed");
    assert!(matches!(err, Failure::DependencyInstall { .. }));
}

#[test]
fn unlaunchable_installer_is_a_dependency_failure() {
    let dependencies = vec!["requests".to_string()];

    let err = run_installer("this-program-does-not-exist", &dependencies, false)
        .expect_err("installer missing");
    assert!(matches!(err, Failure::DependencyInstall { .. }));
}
