// crates/checkup-cli/src/engine.rs
// ============================================================================
// Module: Command Check Engine
// Description: Bundled engine evaluating checks as shell commands.
// Purpose: Run a compiled checks file inside the working area, in order.
// Dependencies: checkup-core, serde_json, tracing.
// ============================================================================

//! ## Overview
//! [`CommandEngine`] is the bundled [`CheckEngine`] implementation: each
//! check's `run` string is evaluated with `sh -c` inside the working area
//! and its exit code compared against the expected one. Check output is
//! captured into the hidden log so it never reaches the real output streams;
//! verbose runs inherit those streams instead, so print statements written
//! in checks show up live. A failing check is an outcome, never an error;
//! only an unreadable or malformed checks file aborts the run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::process::Command;
use std::process::Stdio;

use checkup_core::CheckEngine;
use checkup_core::CheckOutcome;
use checkup_core::CheckSpec;
use checkup_core::CheckStatus;
use checkup_core::ChecksFile;
use checkup_core::Failure;
use tracing::debug;
use tracing::info;

use crate::t;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Engine evaluating checks as shell commands.
///
/// # Invariants
/// - Verbose engines stream check output to the real output streams and
///   leave the hidden log empty; non-verbose engines capture it instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandEngine {
    /// Stream check output instead of capturing it.
    verbose: bool,
}

impl CommandEngine {
    /// Builds an engine; `verbose` selects streaming over capture.
    #[must_use]
    pub const fn new(verbose: bool) -> Self {
        Self {
            verbose,
        }
    }
}

impl CheckEngine for CommandEngine {
    fn run(
        &self,
        checks_file: &Path,
        working_area: &Path,
        targets: Option<&[String]>,
    ) -> Result<Vec<CheckOutcome>, Failure> {
        let text = fs::read_to_string(checks_file).map_err(|_| Failure::NotFound {
            path: checks_file.to_path_buf(),
        })?;
        let parsed: ChecksFile = serde_json::from_str(&text).map_err(|err| Failure::InvalidTarget {
            message: format!("checks file at {} is invalid: {err}", checks_file.display()),
            suggestions: Vec::new(),
        })?;

        let selected = select_checks(parsed.checks, targets)?;
        let mut outcomes = Vec::with_capacity(selected.len());
        for check in &selected {
            info!(check = %check.name, "running check");
            outcomes.push(evaluate(check, working_area, self.verbose));
        }
        Ok(outcomes)
    }
}

// ============================================================================
// SECTION: Selection
// ============================================================================

/// Restricts `checks` to `targets`, preserving file order.
///
/// # Errors
///
/// Returns [`Failure::InvalidTarget`] when a target names no known check,
/// suggesting the available check names.
fn select_checks(
    checks: Vec<CheckSpec>,
    targets: Option<&[String]>,
) -> Result<Vec<CheckSpec>, Failure> {
    let Some(targets) = targets else {
        return Ok(checks);
    };
    for target in targets {
        if !checks.iter().any(|check| check.name == *target) {
            let suggestions: Vec<String> =
                checks.iter().map(|check| check.name.clone()).collect();
            return Err(Failure::InvalidTarget {
                message: t!("engine.unknown_target", name = target),
                suggestions,
            });
        }
    }
    Ok(checks.into_iter().filter(|check| targets.contains(&check.name)).collect())
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

/// Evaluates one check inside the working area.
///
/// Verbose runs inherit the real output streams, so the captured output
/// vectors stay empty and the hidden log carries nothing.
fn evaluate(check: &CheckSpec, working_area: &Path, verbose: bool) -> CheckOutcome {
    let mut command = Command::new("sh");
    command.arg("-c").arg(&check.run).current_dir(working_area);
    if verbose {
        command.stdout(Stdio::inherit()).stderr(Stdio::inherit());
    }
    let output = command.output();

    let (status, message, log) = match output {
        Ok(output) => {
            let mut log: Vec<String> = Vec::new();
            log.extend(String::from_utf8_lossy(&output.stdout).lines().map(str::to_string));
            log.extend(String::from_utf8_lossy(&output.stderr).lines().map(str::to_string));
            match output.status.code() {
                Some(code) if code == check.exit => (CheckStatus::Passed, None, log),
                Some(code) => (
                    CheckStatus::Failed,
                    Some(t!("engine.exit_mismatch", expected = check.exit, actual = code)),
                    log,
                ),
                None => (CheckStatus::Failed, Some(t!("engine.signal")), log),
            }
        }
        Err(err) => (
            CheckStatus::Failed,
            Some(format!("could not run the check: {err}")),
            Vec::new(),
        ),
    };

    debug!(check = %check.name, status = status.as_str(), "check finished");
    CheckOutcome {
        name: check.name.clone(),
        description: check.description.clone(),
        status,
        message,
        log,
    }
}
