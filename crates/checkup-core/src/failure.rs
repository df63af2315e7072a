// crates/checkup-core/src/failure.rs
// ============================================================================
// Module: Failure Taxonomy
// Description: Closed error taxonomy mapped to user-visible behavior.
// Purpose: Give every component one tagged failure type the reporter can match.
// Dependencies: serde_json, thiserror.
// ============================================================================

//! ## Overview
//! Every fallible operation in the orchestrator surfaces a [`Failure`]. The
//! taxonomy is closed: the error reporter matches it exhaustively to choose
//! the user-visible rendering per output channel. No component above the
//! remote poller retries; failures propagate immediately to the reporter.
//!
//! Messages are built at the point of failure (already localized where the
//! raising component has a catalog) and printed verbatim for domain failures.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::error::Error as StdError;
use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Closed failure taxonomy for a checkup run.
///
/// # Invariants
/// - Variants are stable; the reporter and the machine-readable error
///   document depend on [`Failure::kind`] names.
/// - Structured payloads are attached at construction and never mutated.
#[derive(Debug, Error)]
pub enum Failure {
    /// Raw options could not be resolved into a plan.
    #[error("{message}")]
    InvalidOptions {
        /// Human-readable message.
        message: String,
    },
    /// The checks package identifier is unknown or invalid.
    #[error("{message}")]
    InvalidTarget {
        /// Human-readable message, including any suggestion list.
        message: String,
        /// Similar locally-known identifiers, best match first.
        suggestions: Vec<String>,
    },
    /// The package manager subprocess exited non-zero.
    #[error("{message}")]
    DependencyInstall {
        /// Human-readable message.
        message: String,
    },
    /// The distribution service could not be reached.
    #[error("{message}")]
    Network {
        /// Human-readable message, including retry guidance.
        message: String,
    },
    /// The remote execution failed or returned a malformed success.
    #[error("{message}")]
    RemoteService {
        /// Human-readable message.
        message: String,
        /// Raw remote response body, when one was obtained.
        payload: Option<Value>,
    },
    /// Polling exhausted every attempt without a completed payload.
    #[error("{message}")]
    RemoteTimeout {
        /// Human-readable message directing the user to the hosted results.
        message: String,
        /// Tracking handle of the stalled submission.
        commit_hash: String,
    },
    /// The user interrupted the run.
    #[error("check cancelled")]
    Cancelled,
    /// A required file was missing.
    #[error("{} not found", path.display())]
    NotFound {
        /// The missing path.
        path: PathBuf,
    },
    /// Unclassified catch-all.
    #[error("{message}")]
    Unexpected {
        /// Human-readable message.
        message: String,
        /// Underlying cause, when one exists.
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
}

impl Failure {
    /// Wraps an arbitrary error into the unclassified catch-all.
    pub fn unexpected(message: impl Into<String>, source: impl StdError + Send + Sync + 'static) -> Self {
        Self::Unexpected {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns the stable kind tag used by the machine-readable error document.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidOptions {
                ..
            } => "InvalidOptionCombination",
            Self::InvalidTarget {
                ..
            } => "InvalidTargetError",
            Self::DependencyInstall {
                ..
            } => "DependencyInstallError",
            Self::Network {
                ..
            } => "NetworkError",
            Self::RemoteService {
                ..
            } => "RemoteServiceError",
            Self::RemoteTimeout {
                ..
            } => "RemoteTimeoutError",
            Self::Cancelled => "CancellationError",
            Self::NotFound {
                ..
            } => "NotFoundError",
            Self::Unexpected {
                ..
            } => "UnexpectedError",
        }
    }

    /// Returns the structured payload attached to this failure, if any.
    #[must_use]
    pub const fn payload(&self) -> Option<&Value> {
        match self {
            Self::RemoteService {
                payload, ..
            } => payload.as_ref(),
            _ => None,
        }
    }

    /// Renders the source chain, outermost message first.
    #[must_use]
    pub fn trace(&self) -> Vec<String> {
        let mut lines = vec![format!("{}: {self}", self.kind())];
        let mut current: Option<&(dyn StdError + 'static)> = self.source();
        while let Some(cause) = current {
            lines.push(format!("caused by: {cause}"));
            current = cause.source();
        }
        lines
    }
}

impl From<std::io::Error> for Failure {
    fn from(error: std::io::Error) -> Self {
        Self::Unexpected {
            message: error.to_string(),
            source: Some(Box::new(error)),
        }
    }
}
