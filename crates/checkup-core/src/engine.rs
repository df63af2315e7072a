// crates/checkup-core/src/engine.rs
// ============================================================================
// Module: Check Engine Seam
// Description: Interface to the external check-evaluation engine.
// Purpose: Keep the orchestrator ignorant of how a check is evaluated.
// Dependencies: serde.
// ============================================================================

//! ## Overview
//! The orchestrator never evaluates a check itself; it hands a compiled
//! checks file, a prepared working area, and an optional name filter to a
//! [`CheckEngine`] and collects structured outcomes. The compiled file schema
//! ([`ChecksFile`]) lives here because both the declarative-check compiler
//! and the bundled engine implementation read it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::failure::Failure;
use crate::results::CheckOutcome;

// ============================================================================
// SECTION: Types
// ============================================================================

/// One executable check entry in a compiled checks file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckSpec {
    /// Unique check name.
    pub name: String,
    /// Optional human description.
    #[serde(default)]
    pub description: Option<String>,
    /// Shell command evaluated inside the working area.
    pub run: String,
    /// Expected exit code for the check to pass.
    #[serde(default)]
    pub exit: i32,
}

/// Schema of the compiled checks file (`checks.json`).
///
/// # Invariants
/// - `checks` preserves declaration order; engines run checks in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecksFile {
    /// Ordered check entries.
    pub checks: Vec<CheckSpec>,
}

// ============================================================================
// SECTION: Engine Trait
// ============================================================================

/// External collaborator that evaluates checks against a working area.
pub trait CheckEngine {
    /// Runs the checks described by `checks_file` inside `working_area`,
    /// restricted to `targets` when a filter is given.
    ///
    /// # Errors
    ///
    /// Returns [`Failure`] when the checks file is unreadable or malformed;
    /// individual check failures are reported through the outcome list, not
    /// as errors.
    fn run(
        &self,
        checks_file: &Path,
        working_area: &Path,
        targets: Option<&[String]>,
    ) -> Result<Vec<CheckOutcome>, Failure>;
}
