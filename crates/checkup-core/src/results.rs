// crates/checkup-core/src/results.rs
// ============================================================================
// Module: Result Payload
// Description: Channel-agnostic result record produced by either execution path.
// Purpose: Let every output channel render one immutable payload shape.
// Dependencies: serde.
// ============================================================================

//! ## Overview
//! Exactly one [`ResultPayload`] is produced per run, by the local executor
//! or by the remote poller, and consumed without mutation by every requested
//! output channel. The serialized form doubles as the wire shape of the
//! nested result object in the remote results protocol.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Terminal status of a single named check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// The check ran and passed.
    Passed,
    /// The check ran and failed.
    Failed,
    /// The check was not run.
    Skipped,
}

impl CheckStatus {
    /// Returns the canonical lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

/// Structured outcome of one check.
///
/// # Invariants
/// - `message` is safe to show in every channel; `log` lines are hidden
///   unless the run is verbose or log interleaving is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Check name as declared by the checks package.
    pub name: String,
    /// Optional human description.
    #[serde(default)]
    pub description: Option<String>,
    /// Terminal status.
    pub status: CheckStatus,
    /// Visible message, typically the failure cause.
    #[serde(default)]
    pub message: Option<String>,
    /// Hidden output captured while the check ran.
    #[serde(default)]
    pub log: Vec<String>,
}

/// Unified result record produced by either execution path.
///
/// # Invariants
/// - Built once per run and never mutated by a renderer.
/// - `results` preserves check declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPayload {
    /// Identifier the run was invoked with.
    pub slug: String,
    /// Ordered per-check outcomes.
    pub results: Vec<CheckOutcome>,
    /// Format version tag (the producing tool's version).
    pub version: String,
}

impl ResultPayload {
    /// Counts the checks that passed.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|outcome| outcome.status == CheckStatus::Passed).count()
    }

    /// Counts the checks that ran (passed or failed).
    #[must_use]
    pub fn ran(&self) -> usize {
        self.results.iter().filter(|outcome| outcome.status != CheckStatus::Skipped).count()
    }
}
