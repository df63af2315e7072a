// crates/checkup-client/src/protocol.rs
// ============================================================================
// Module: Remote Results Protocol
// Description: Wire shapes and body interpretation for the results endpoint.
// Purpose: Keep response parsing pure so the poller loop stays testable.
// Dependencies: checkup-core, serde, serde_json.
// ============================================================================

//! ## Overview
//! The results endpoint replies with a JSON body carrying a `received_at`
//! timestamp (null until the run completed), a nested `checkup` result
//! object, a `tag_hash` handle for the hosted results page, and optionally an
//! `error` field. [`interpret_results_body`] turns one polled body into the
//! poller's verdict without performing any I/O.
//!
//! Response bodies are untrusted; parsing fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use checkup_core::Failure;
use checkup_core::ResultPayload;
use serde::Deserialize;
use serde_json::Value;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Body of a successful submission push.
#[derive(Debug, Deserialize)]
pub(crate) struct SubmitResponse {
    /// Opaque tracking handle for the submission.
    pub commit_hash: String,
}

/// Body of one results poll.
///
/// # Invariants
/// - Field values are untrusted server output.
#[derive(Debug, Deserialize)]
pub(crate) struct ResultsResponse {
    /// Set once the remote run completed.
    #[serde(default)]
    pub received_at: Option<String>,
    /// Handle keying the hosted results page.
    #[serde(default)]
    pub tag_hash: Option<String>,
    /// Nested result object, absent until completion.
    #[serde(default)]
    pub checkup: Option<Value>,
}

/// Downloadable checks package: relative path to file contents.
#[derive(Debug, Deserialize)]
pub(crate) struct PackageArchive {
    /// File map of the package.
    pub files: Vec<PackageFile>,
}

/// One file inside a downloaded checks package.
#[derive(Debug, Deserialize)]
pub(crate) struct PackageFile {
    /// Path relative to the package root.
    pub path: String,
    /// UTF-8 file contents.
    pub contents: String,
}

/// Verdict of interpreting one completed results body.
#[derive(Debug)]
pub(crate) struct CompletedResults {
    /// Handle keying the hosted results page.
    pub tag_hash: String,
    /// Unified result payload extracted from the nested object.
    pub payload: ResultPayload,
}

// ============================================================================
// SECTION: Interpretation
// ============================================================================

/// Extracts the tag handle and result payload from a completed results body.
///
/// # Errors
///
/// Returns [`Failure::RemoteService`] when `received_at` is null, the nested
/// result object is absent, carries an embedded `error` field, or does not
/// match the payload schema, attaching the offending body as structured
/// payload.
pub(crate) fn interpret_results_body(body: &Value) -> Result<CompletedResults, Failure> {
    let response: ResultsResponse =
        serde_json::from_value(body.clone()).map_err(|_| remote_error(body.clone()))?;
    if response.received_at.is_none() {
        return Err(remote_error(body.clone()));
    }
    let Some(nested) = response.checkup else {
        return Err(remote_error(body.clone()));
    };
    if nested.get("error").is_some() {
        return Err(remote_error(nested));
    }
    let Some(tag_hash) = response.tag_hash else {
        return Err(remote_error(body.clone()));
    };
    let payload: ResultPayload =
        serde_json::from_value(nested.clone()).map_err(|_| remote_error(nested))?;
    Ok(CompletedResults {
        tag_hash,
        payload,
    })
}

/// Builds the uniform remote-execution failure carrying the raw body.
pub(crate) fn remote_error(body: Value) -> Failure {
    Failure::RemoteService {
        message: "checkup ran into an error while running checks! \
                  Please contact sysadmins@checkup.dev!"
            .to_string(),
        payload: Some(body),
    }
}
