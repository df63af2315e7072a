// crates/checkup-client/src/lib.rs
// ============================================================================
// Module: Checkup Remote Client
// Description: HTTP client for submission, result polling, and package download.
// Purpose: Implement the remote half of the execution dispatch behind one type.
// Dependencies: checkup-core, reqwest, serde, serde_json, thiserror, tokio.
// ============================================================================

//! ## Overview
//! [`RemoteClient`] talks to the distribution service: it pushes a tagged
//! submission and returns the tracking handle, polls the results endpoint
//! with the system's only retry loop (bounded by attempts, paced by a fixed
//! interval, and purely time-based — error-class responses terminate
//! immediately), and downloads checks packages into the local cache.
//!
//! Security posture: response bodies are untrusted; sizes are bounded and
//! archive paths are validated before any file is written.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod protocol;
#[cfg(test)]
mod protocol_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Component;
use std::path::Path;
use std::time::Duration;

use checkup_core::Failure;
use checkup_core::ResultPayload;
use reqwest::Client;
use reqwest::Response;
use reqwest::redirect::Policy;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

use crate::protocol::PackageArchive;
use crate::protocol::SubmitResponse;
use crate::protocol::interpret_results_body;
use crate::protocol::remote_error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default distribution service endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://submit.checkup.dev";
/// Environment variable overriding the distribution endpoint.
pub const ENDPOINT_ENV: &str = "CHECKUP_ENDPOINT";
/// Default number of result polls before timing out.
pub const DEFAULT_PINGS: u32 = 45;
/// Default pause between result polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
/// Maximum response body size accepted from the service.
pub const MAX_RESPONSE_BYTES: usize = 8 * 1024 * 1024;
/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// SECTION: Types
// ============================================================================

/// Package download failures, mapped by the caller into the failure taxonomy.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The service does not know the requested slug.
    #[error("checks package {slug} was not found")]
    NotFound {
        /// The unknown slug.
        slug: String,
    },
    /// The service could not be reached.
    #[error("{0}")]
    Unreachable(String),
    /// The service replied with something other than a package archive.
    #[error("{0}")]
    Protocol(String),
}

/// HTTP client for the distribution service.
///
/// # Invariants
/// - `endpoint` has no trailing slash.
pub struct RemoteClient {
    /// Underlying reqwest client.
    http: Client,
    /// Service base URL.
    endpoint: String,
}

impl RemoteClient {
    /// Builds a client against an explicit endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Failure::Network`] when the HTTP client cannot be constructed.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, Failure> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .redirect(Policy::none())
            .build()
            .map_err(|err| Failure::Network {
                message: format!("could not initialize the http client: {err}"),
            })?;
        let mut endpoint = endpoint.into();
        while endpoint.ends_with('/') {
            endpoint.pop();
        }
        Ok(Self {
            http,
            endpoint,
        })
    }

    /// Builds a client against `CHECKUP_ENDPOINT` or the default endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Failure::Network`] when the HTTP client cannot be constructed.
    pub fn from_env() -> Result<Self, Failure> {
        Self::new(endpoint_from_env())
    }

    /// Returns the service base URL this client talks to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    // ------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------

    /// Pushes a submission tagged as a checks run and returns its tracking
    /// handle.
    ///
    /// # Errors
    ///
    /// Returns [`Failure::Network`] when the service is unreachable and
    /// [`Failure::RemoteService`] when it rejects the submission or replies
    /// with an unparsable body.
    pub async fn submit(&self, slug: &str) -> Result<String, Failure> {
        let url = format!("{}/api/submissions", self.endpoint);
        let body = json!({ "slug": slug, "checkup": true });
        let response =
            self.http.post(&url).json(&body).send().await.map_err(|err| Failure::Network {
                message: format!("could not reach the distribution service: {err}"),
            })?;
        let status = response.status();
        let body = read_body_with_limit(response).await?;
        if !status.is_success() {
            return Err(remote_error(parse_body(&body)));
        }
        let parsed: SubmitResponse =
            serde_json::from_slice(&body).map_err(|_| remote_error(parse_body(&body)))?;
        Ok(parsed.commit_hash)
    }

    // ------------------------------------------------------------------
    // Polling
    // ------------------------------------------------------------------

    /// Polls the results endpoint until a completed payload, an error-class
    /// response, or exhaustion of `pings` attempts, pausing `interval`
    /// between attempts.
    ///
    /// The loop is time-based only: an HTTP status outside {200, 404} or a
    /// malformed completed body terminates immediately and is never retried.
    ///
    /// # Errors
    ///
    /// Returns [`Failure::RemoteService`] on error-class responses,
    /// [`Failure::RemoteTimeout`] after the final unsuccessful attempt, and
    /// [`Failure::Network`] when the service is unreachable.
    pub async fn await_results(
        &self,
        commit_hash: &str,
        slug: &str,
        pings: u32,
        interval: Duration,
    ) -> Result<(String, ResultPayload), Failure> {
        let url = format!("{}/api/results/checkup", self.endpoint);
        let mut completed: Option<Value> = None;

        for attempt in 1..=pings {
            let response = self
                .http
                .get(&url)
                .query(&[("commit_hash", commit_hash), ("slug", slug)])
                .send()
                .await
                .map_err(|err| Failure::Network {
                    message: format!("could not reach the results service: {err}"),
                })?;
            let status = response.status().as_u16();
            let body = parse_body(&read_body_with_limit(response).await?);

            if status != 200 && status != 404 {
                return Err(remote_error(body));
            }
            if status == 200 && body.get("received_at").is_some_and(|value| !value.is_null()) {
                completed = Some(body);
                break;
            }
            if attempt < pings {
                tokio::time::sleep(interval).await;
            }
        }

        let Some(body) = completed else {
            return Err(Failure::RemoteTimeout {
                message: format!(
                    "checkup is taking longer than normal!\nSee {} for more detail",
                    self.hosted_results_url(commit_hash)
                ),
                commit_hash: commit_hash.to_string(),
            });
        };
        let results = interpret_results_body(&body)?;
        Ok((results.tag_hash, results.payload))
    }

    /// Returns the hosted results page URL for a tracking or tag handle.
    #[must_use]
    pub fn hosted_results_url(&self, handle: &str) -> String {
        format!("{}/checkup/{handle}", self.endpoint)
    }

    // ------------------------------------------------------------------
    // Package download
    // ------------------------------------------------------------------

    /// Downloads the checks package for `slug` into `dest`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::NotFound`] for unknown slugs,
    /// [`FetchError::Unreachable`] when the service cannot be reached, and
    /// [`FetchError::Protocol`] for malformed archives or write failures.
    pub async fn fetch_package(&self, slug: &str, dest: &Path) -> Result<(), FetchError> {
        let url = format!("{}/api/packages/{slug}", self.endpoint);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|err| FetchError::Unreachable(err.to_string()))?;
        let status = response.status();
        if status.as_u16() == 404 {
            return Err(FetchError::NotFound {
                slug: slug.to_string(),
            });
        }
        let body = read_body_with_limit(response)
            .await
            .map_err(|err| FetchError::Unreachable(err.to_string()))?;
        if !status.is_success() {
            return Err(FetchError::Protocol(format!(
                "package download failed with status {}",
                status.as_u16()
            )));
        }
        let archive: PackageArchive = serde_json::from_slice(&body)
            .map_err(|err| FetchError::Protocol(format!("invalid package archive: {err}")))?;
        write_archive(&archive, dest)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the endpoint from the environment, or the default.
#[must_use]
pub fn endpoint_from_env() -> String {
    std::env::var(ENDPOINT_ENV).unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string())
}

/// Reads a response body while enforcing a hard byte limit.
async fn read_body_with_limit(mut response: Response) -> Result<Vec<u8>, Failure> {
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(|err| Failure::Network {
        message: format!("could not read the service response: {err}"),
    })? {
        if body.len().saturating_add(chunk.len()) > MAX_RESPONSE_BYTES {
            return Err(Failure::RemoteService {
                message: format!("service response exceeds {MAX_RESPONSE_BYTES} bytes"),
                payload: None,
            });
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Parses a body as JSON, falling back to a string preview for diagnostics.
fn parse_body(body: &[u8]) -> Value {
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

/// Materializes a downloaded archive under `dest`, rejecting unsafe paths.
fn write_archive(archive: &PackageArchive, dest: &Path) -> Result<(), FetchError> {
    for file in &archive.files {
        let relative = Path::new(&file.path);
        let safe = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if !safe {
            return Err(FetchError::Protocol(format!(
                "archive path {} escapes the package root",
                file.path
            )));
        }
        let target = dest.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| FetchError::Protocol(format!("could not write package: {err}")))?;
        }
        fs::write(&target, &file.contents)
            .map_err(|err| FetchError::Protocol(format!("could not write package: {err}")))?;
    }
    Ok(())
}
