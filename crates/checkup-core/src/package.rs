// crates/checkup-core/src/package.rs
// ============================================================================
// Module: Checks Package Configuration
// Description: Package config loading and declarative-check compilation.
// Purpose: Turn a package's TOML config into inputs the executor can run.
// Dependencies: serde, serde_json, toml.
// ============================================================================

//! ## Overview
//! A checks package carries a `.checkup.toml` describing its entry point,
//! dependency list, optional translation catalog, and optional file-inclusion
//! filter. The entry point is either a ready checks file or a declarative
//! table of checks that must first be compiled to `checks.json`.
//!
//! Compilation is a pure transform ([`compile_checks`]); the side-effecting
//! write goes through [`write_compiled_checks`], which consults an injectable
//! [`ConfirmPolicy`] before overwriting an existing compiled file. Declining
//! the prompt is a user cancellation, not a defect.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::engine::CheckSpec;
use crate::engine::ChecksFile;
use crate::failure::Failure;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Name of the package configuration file.
pub const CONFIG_FILE: &str = ".checkup.toml";
/// Name of the compiled checks file written by [`write_compiled_checks`].
pub const COMPILED_CHECKS_FILE: &str = "checks.json";
/// Maximum size of a package configuration file.
pub const MAX_CONFIG_BYTES: u64 = 1024 * 1024;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A single declaratively-specified check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredCheck {
    /// Shell command evaluated inside the working area.
    pub run: String,
    /// Optional human description.
    #[serde(default)]
    pub description: Option<String>,
    /// Expected exit code for the check to pass.
    #[serde(default)]
    pub exit: i32,
}

/// Entry point for check definitions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ChecksSource {
    /// Name of a ready checks file relative to the package root.
    File(String),
    /// Declarative checks to compile; iteration order is name order.
    Declared(BTreeMap<String, DeclaredCheck>),
}

/// Parsed checks package configuration.
///
/// # Invariants
/// - Owned by the local executor for the duration of one run; never shared
///   across runs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackageConfig {
    /// Check definitions entry point.
    pub checks: ChecksSource,
    /// Dependency specifiers handed to the installer.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Optional translation catalog relative to the package root.
    #[serde(default)]
    pub translations: Option<PathBuf>,
    /// Optional file-inclusion glob filter for the working area.
    #[serde(default)]
    pub files: Option<Vec<String>>,
}

/// Injectable confirmation policy for destructive prompts.
pub trait ConfirmPolicy {
    /// Returns whether the user (or policy) accepts the prompt.
    fn confirm(&self, prompt: &str) -> bool;
}

/// Policy that accepts every prompt, for non-interactive runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl ConfirmPolicy for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

// ============================================================================
// SECTION: Loading
// ============================================================================

/// Loads the package configuration from `check_dir`.
///
/// # Errors
///
/// Returns [`Failure::NotFound`] when the config file is missing,
/// [`Failure::InvalidTarget`] when it is oversized or malformed.
pub fn load_config(check_dir: &Path) -> Result<PackageConfig, Failure> {
    let path = check_dir.join(CONFIG_FILE);
    let metadata = fs::metadata(&path).map_err(|_| Failure::NotFound {
        path: path.clone(),
    })?;
    if metadata.len() > MAX_CONFIG_BYTES {
        return Err(Failure::InvalidTarget {
            message: format!(
                "checks package config at {} exceeds {MAX_CONFIG_BYTES} bytes",
                path.display()
            ),
            suggestions: Vec::new(),
        });
    }
    let text = fs::read_to_string(&path)?;
    toml::from_str(&text).map_err(|err| Failure::InvalidTarget {
        message: format!("checks package config at {} is invalid: {err}", path.display()),
        suggestions: Vec::new(),
    })
}

// ============================================================================
// SECTION: Compilation
// ============================================================================

/// Compiles declarative checks into the text of a checks file.
///
/// Pure transform: the output depends only on the input map, so compiling
/// the same declarations twice yields byte-identical text.
#[must_use]
pub fn compile_checks(declared: &BTreeMap<String, DeclaredCheck>) -> String {
    let file = ChecksFile {
        checks: declared
            .iter()
            .map(|(name, check)| CheckSpec {
                name: name.clone(),
                description: check.description.clone(),
                run: check.run.clone(),
                exit: check.exit,
            })
            .collect(),
    };
    let mut text = serde_json::to_string_pretty(&file).unwrap_or_else(|_| String::from("{}"));
    text.push('\n');
    text
}

/// Writes the compiled checks file into `check_dir`, consulting `policy`
/// before overwriting an existing file.
///
/// # Errors
///
/// Returns [`Failure::Cancelled`] when the policy declines the overwrite and
/// propagates filesystem errors otherwise.
pub fn write_compiled_checks(
    check_dir: &Path,
    declared: &BTreeMap<String, DeclaredCheck>,
    policy: &dyn ConfirmPolicy,
    prompt: &str,
) -> Result<String, Failure> {
    let destination = check_dir.join(COMPILED_CHECKS_FILE);
    if destination.exists() && !policy.confirm(prompt) {
        return Err(Failure::Cancelled);
    }
    fs::write(&destination, compile_checks(declared))?;
    Ok(COMPILED_CHECKS_FILE.to_string())
}
