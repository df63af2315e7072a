// crates/checkup-cli/src/reporter.rs
// ============================================================================
// Module: Error Reporter
// Description: Terminal failure rendering per output channel.
// Purpose: Turn any failure into exactly one report per channel and exit 1.
// Dependencies: checkup-core, serde_json, tracing.
// ============================================================================

//! ## Overview
//! Every failed run ends here. The reporter renders the failure once per
//! requested channel kind: `json` receives a machine-readable error document,
//! while the terminal channels (`ansi` and `html`) share a single red line on
//! stderr chosen by the failure kind. Domain failures print their message
//! verbatim, missing files go through the localized catalog, and unclassified
//! failures print a generic apology; the full trace follows when the run is
//! verbose.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use checkup_core::ExecutionPlan;
use checkup_core::Failure;
use checkup_core::OutputChannel;
use serde_json::Value;
use serde_json::json;

use crate::renderer::RED;
use crate::renderer::paint;
use crate::t;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Renders failures for the channels a run requested.
///
/// # Invariants
/// - Reporting consumes the reporter; a failure is reported at most once.
pub struct ErrorReporter {
    /// Channels to report on, deduplicated.
    channels: Vec<OutputChannel>,
    /// Shared output sink for machine-readable documents.
    output_file: Option<PathBuf>,
    /// Slug echoed into the error document, when known.
    slug: Option<String>,
    /// Whether terminal output includes the full trace.
    verbose: bool,
}

impl ErrorReporter {
    /// Reporter used before options resolve: terminal output, full trace.
    #[must_use]
    pub fn bootstrap() -> Self {
        Self {
            channels: vec![OutputChannel::Ansi],
            output_file: None,
            slug: None,
            verbose: true,
        }
    }

    /// Reporter configured from a resolved plan.
    #[must_use]
    pub fn from_plan(plan: &ExecutionPlan) -> Self {
        Self {
            channels: plan.output.clone(),
            output_file: plan.output_file.clone(),
            slug: Some(plan.slug.clone()),
            verbose: plan.verbose,
        }
    }

    /// Reports `failure` on every channel and returns the failure exit code.
    pub fn report(self, failure: &Failure) -> ExitCode {
        let mut terminal_done = false;
        let mut document_done = false;
        for channel in &self.channels {
            match channel {
                OutputChannel::Json => {
                    if !document_done {
                        self.write_document(failure);
                        document_done = true;
                    }
                }
                OutputChannel::Ansi | OutputChannel::Html => {
                    if !terminal_done {
                        self.write_terminal(failure);
                        terminal_done = true;
                    }
                }
            }
        }
        ExitCode::FAILURE
    }

    /// Writes the machine-readable error document.
    fn write_document(&self, failure: &Failure) {
        let document = error_document(self.slug.as_deref(), failure);
        let rendered = serde_json::to_string_pretty(&document).unwrap_or_default();
        let outcome: io::Result<()> = match &self.output_file {
            Some(path) => File::create(path).and_then(|mut file| writeln!(file, "{rendered}")),
            None => writeln!(io::stdout(), "{rendered}"),
        };
        if let Err(err) = outcome {
            eprintln!("{}", paint(&format!("could not write the error report: {err}"), RED, true));
        }
    }

    /// Writes the single red terminal line (plus trace when verbose).
    fn write_terminal(&self, failure: &Failure) {
        eprintln!("{}", paint(&terminal_line(failure), RED, true));

        if self.verbose {
            for trace_line in failure.trace() {
                eprintln!("{trace_line}");
            }
            if let Some(payload) = failure.payload() {
                let rendered =
                    serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
                eprintln!("{rendered}");
            }
        }
    }
}

// ============================================================================
// SECTION: Terminal Line
// ============================================================================

/// Chooses the single terminal line for a failure.
///
/// Domain failures carry already-localized messages and print them verbatim;
/// missing files and the unclassified catch-all render through the catalog.
pub(crate) fn terminal_line(failure: &Failure) -> String {
    match failure {
        Failure::NotFound {
            path,
        } => t!("error.not_found", path = path.display()),
        Failure::Cancelled
        | Failure::InvalidOptions {
            ..
        }
        | Failure::InvalidTarget {
            ..
        }
        | Failure::DependencyInstall {
            ..
        }
        | Failure::Network {
            ..
        }
        | Failure::RemoteService {
            ..
        }
        | Failure::RemoteTimeout {
            ..
        } => failure.to_string(),
        Failure::Unexpected {
            ..
        } => t!("error.generic"),
    }
}

// ============================================================================
// SECTION: Error Document
// ============================================================================

/// Builds the machine-readable error document.
#[must_use]
pub fn error_document(slug: Option<&str>, failure: &Failure) -> Value {
    json!({
        "slug": slug,
        "error": {
            "type": failure.kind(),
            "value": failure.to_string(),
            "traceback": failure.trace(),
            "data": failure.payload().cloned().unwrap_or_else(|| json!({})),
        },
        "version": env!("CARGO_PKG_VERSION"),
    })
}
