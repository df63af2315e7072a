// crates/checkup-cli/src/installer.rs
// ============================================================================
// Module: Dependency Installer
// Description: Installs a checks package's declared dependencies via pip.
// Purpose: Stage a requirements manifest and delegate installation once.
// Dependencies: checkup-core, tempfile, tracing.
// ============================================================================

//! ## Overview
//! Checks packages may declare runtime dependencies. The installer writes
//! them into a `requirements.txt` inside a staging directory and runs
//! `python3 -m pip install -r` against it exactly once; a non-zero exit is a
//! [`Failure::DependencyInstall`] and is never retried. Installation is
//! user-scoped unless a virtual environment is active, and installer output
//! is suppressed unless the run is verbose.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::process::Command;
use std::process::Stdio;

use checkup_core::Failure;
use tracing::debug;

use crate::t;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable marking an active virtual environment.
pub const VIRTUAL_ENV_ENV: &str = "VIRTUAL_ENV";

// ============================================================================
// SECTION: Installation
// ============================================================================

/// Installs `dependencies` with the system installer.
///
/// # Errors
///
/// Returns [`Failure::DependencyInstall`] when the installer cannot be
/// launched or exits non-zero.
pub fn install_dependencies(dependencies: &[String], verbose: bool) -> Result<(), Failure> {
    run_installer("python3", dependencies, verbose)
}

/// Installs `dependencies` with an explicit installer program.
///
/// Split out so tests can substitute a harmless program for `python3`.
pub(crate) fn run_installer(
    program: &str,
    dependencies: &[String],
    verbose: bool,
) -> Result<(), Failure> {
    if dependencies.is_empty() {
        return Ok(());
    }

    let staging = tempfile::tempdir()?;
    let manifest = staging.path().join("requirements.txt");
    let mut contents = dependencies.join("\n");
    contents.push('\n');
    fs::write(&manifest, contents)?;

    let mut command = Command::new(program);
    command.arg("-m").arg("pip").arg("install").arg("-r").arg(&manifest);
    if std::env::var_os(VIRTUAL_ENV_ENV).is_none() {
        command.arg("--user");
    }
    if !verbose {
        command.stdout(Stdio::null()).stderr(Stdio::null());
    }

    debug!(dependencies = dependencies.len(), "installing package dependencies");
    let status = command.status().map_err(|err| Failure::DependencyInstall {
        message: t!("installer.launch_failed", error = err),
    })?;
    if !status.success() {
        return Err(Failure::DependencyInstall {
            message: t!("installer.failed"),
        });
    }
    Ok(())
}
