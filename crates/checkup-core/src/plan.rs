// crates/checkup-core/src/plan.rs
// ============================================================================
// Module: Execution Plan Resolution
// Description: Normalizes raw run options into an immutable execution plan.
// Purpose: Apply option implication rules once so every component reads one plan.
// Dependencies: serde, thiserror.
// ============================================================================

//! ## Overview
//! Raw CLI options are mutually implying: developer mode forces offline and
//! verbose, offline forces local execution and disables downloads and
//! dependency installation. [`resolve`] applies those rules in a fixed order,
//! deduplicates the requested output channels, and returns the resulting
//! [`ExecutionPlan`] together with any non-fatal [`PlanWarning`]s for the
//! caller to log.
//!
//! ## Invariants
//! - Resolution is idempotent: resolving a resolved plan yields the same plan.
//! - The resolved channel sequence is never empty and contains no duplicates,
//!   preserving first-occurrence order.
//! - The plan is read-only after resolution.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::failure::Failure;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Logging verbosity thresholds, ordered from most to least verbose.
///
/// # Invariants
/// - Declaration order defines the ordering: `Debug < Info < Warning < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Log all commands run and their output.
    Debug,
    /// Log all commands run.
    Info,
    /// Display usage warnings (default).
    Warning,
    /// Log errors only.
    Error,
}

impl LogLevel {
    /// Returns the canonical lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Output channels a run may produce simultaneously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputChannel {
    /// Line-oriented colorized terminal summary.
    Ansi,
    /// Machine-readable serialization of the full payload.
    Json,
    /// Self-contained document rendering.
    Html,
}

impl OutputChannel {
    /// Returns the canonical lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ansi => "ansi",
            Self::Json => "json",
            Self::Html => "html",
        }
    }
}

/// Raw run options as parsed from the CLI, before implication rules apply.
///
/// # Invariants
/// - `log_level` is `None` when the flag was left at its default; resolution
///   must be able to distinguish "defaulted" from "explicitly set to warning".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOptions {
    /// Prescribed identifier (or literal path in developer mode) of the work to check.
    pub slug: String,
    /// Developer mode: slug is a literal checks directory.
    pub dev: bool,
    /// Run completely offline.
    pub offline: bool,
    /// Run checks locally instead of submitting them.
    pub local: bool,
    /// Requested output channels, possibly containing duplicates.
    pub output: Vec<OutputChannel>,
    /// Optional file to write channel output to.
    pub output_file: Option<PathBuf>,
    /// Optional name filter restricting which checks run.
    pub targets: Option<Vec<String>>,
    /// Show full traces and check output.
    pub verbose: bool,
    /// Explicit log level, if one was given.
    pub log_level: Option<LogLevel>,
    /// Interleave captured log lines into the ansi rendering.
    pub ansi_log: bool,
    /// Use previously downloaded checks instead of fetching.
    pub no_download_checks: bool,
    /// Skip dependency installation.
    pub no_install_dependencies: bool,
}

/// Immutable execution plan derived from [`RawOptions`].
///
/// # Invariants
/// - `offline` implies `local`, `no_download_checks`, and
///   `no_install_dependencies`.
/// - `dev` implies `offline` and `verbose`.
/// - `output` is non-empty and free of duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    /// Prescribed identifier of the work to check.
    pub slug: String,
    /// Developer mode flag.
    pub dev: bool,
    /// Offline flag.
    pub offline: bool,
    /// Local execution flag; false selects the remote path.
    pub local: bool,
    /// Ordered, deduplicated output channels.
    pub output: Vec<OutputChannel>,
    /// Optional shared output sink path.
    pub output_file: Option<PathBuf>,
    /// Optional target-check filter.
    pub targets: Option<Vec<String>>,
    /// Verbose flag.
    pub verbose: bool,
    /// Resolved log level.
    pub log_level: LogLevel,
    /// Interleave captured log lines into the ansi rendering.
    pub ansi_log: bool,
    /// Skip checks package downloads.
    pub no_download_checks: bool,
    /// Skip dependency installation.
    pub no_install_dependencies: bool,
}

impl ExecutionPlan {
    /// Converts the plan back into raw options with every value explicit.
    ///
    /// Feeding the result to [`resolve`] reproduces the plan unchanged.
    #[must_use]
    pub fn to_raw_options(&self) -> RawOptions {
        RawOptions {
            slug: self.slug.clone(),
            dev: self.dev,
            offline: self.offline,
            local: self.local,
            output: self.output.clone(),
            output_file: self.output_file.clone(),
            targets: self.targets.clone(),
            verbose: self.verbose,
            log_level: Some(self.log_level),
            ansi_log: self.ansi_log,
            no_download_checks: self.no_download_checks,
            no_install_dependencies: self.no_install_dependencies,
        }
    }
}

/// Non-fatal conditions observed during resolution.
///
/// # Invariants
/// - Warnings never change the resolved plan; they are advisory only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanWarning {
    /// The same output channel was requested more than once.
    #[error("duplicate output format specified: {}", channel.as_str())]
    DuplicateChannel {
        /// The repeated channel.
        channel: OutputChannel,
    },
    /// A local-only flag was set while running remotely.
    #[error("you should always use --local when using: {flag}")]
    FlagRequiresLocal {
        /// The flag name as given on the command line.
        flag: &'static str,
    },
    /// Log interleaving was requested without the ansi channel.
    #[error("--ansi-log has no effect when ansi is not among the output formats")]
    AnsiLogWithoutAnsi,
}

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Resolves raw options into an [`ExecutionPlan`], applying implication rules
/// in order: developer mode, then offline, then channel deduplication.
///
/// # Errors
///
/// Returns [`Failure::InvalidOptions`] when the requested channel set is empty.
pub fn resolve(raw: RawOptions) -> Result<(ExecutionPlan, Vec<PlanWarning>), Failure> {
    let mut warnings = Vec::new();

    let dev = raw.dev;
    let offline = raw.offline || dev;
    let verbose = raw.verbose || dev;
    let local = raw.local || offline;
    let no_download_checks = raw.no_download_checks || offline;
    let no_install_dependencies = raw.no_install_dependencies || offline;

    // Developer mode elevates the default log level but never an explicit one.
    let log_level = match raw.log_level {
        Some(level) => level,
        None if dev => LogLevel::Info,
        None => LogLevel::Warning,
    };

    if !local {
        if raw.no_download_checks {
            warnings.push(PlanWarning::FlagRequiresLocal {
                flag: "--no-download-checks",
            });
        }
        if raw.no_install_dependencies {
            warnings.push(PlanWarning::FlagRequiresLocal {
                flag: "--no-install-dependencies",
            });
        }
    }

    let mut output = Vec::new();
    for channel in raw.output {
        if output.contains(&channel) {
            warnings.push(PlanWarning::DuplicateChannel {
                channel,
            });
        } else {
            output.push(channel);
        }
    }
    if output.is_empty() {
        return Err(Failure::InvalidOptions {
            message: "at least one output format is required".to_string(),
        });
    }

    let mut ansi_log = raw.ansi_log;
    if output.contains(&OutputChannel::Ansi) {
        if log_level <= LogLevel::Info {
            ansi_log = true;
        }
    } else if raw.ansi_log {
        warnings.push(PlanWarning::AnsiLogWithoutAnsi);
    }

    let plan = ExecutionPlan {
        slug: raw.slug,
        dev,
        offline,
        local,
        output,
        output_file: raw.output_file,
        targets: raw.targets,
        verbose,
        log_level,
        ansi_log,
        no_download_checks,
        no_install_dependencies,
    };
    Ok((plan, warnings))
}
