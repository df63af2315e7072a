// crates/checkup-core/src/lib.rs
// ============================================================================
// Module: Checkup Core Library
// Description: Domain types shared by the checkup CLI and remote client.
// Purpose: Keep plan resolution, payloads, and the failure taxonomy in one place.
// Dependencies: serde, serde_json, thiserror, toml.
// ============================================================================

//! ## Overview
//! `checkup-core` holds the channel-agnostic domain layer of the checkup
//! orchestrator: raw run options and their resolution into an immutable
//! [`plan::ExecutionPlan`], the unified [`results::ResultPayload`] produced by
//! both execution paths, the closed [`failure::Failure`] taxonomy, the checks
//! package configuration plus its declarative-check compiler, and the
//! [`engine::CheckEngine`] seam behind which check evaluation lives.
//!
//! The crate performs no I/O beyond reading a package configuration file and
//! writing a compiled checks file; everything network- or terminal-facing
//! lives in `checkup-client` and `checkup-cli`.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Check evaluation seam and the compiled checks file schema.
pub mod engine;
/// Closed failure taxonomy surfaced to the error reporter.
pub mod failure;
/// Checks package configuration and declarative-check compilation.
pub mod package;
/// Raw option resolution into an execution plan.
pub mod plan;
/// Unified result payload shared by the local and remote paths.
pub mod results;

#[cfg(test)]
mod plan_tests;

pub use engine::CheckEngine;
pub use engine::CheckSpec;
pub use engine::ChecksFile;
pub use failure::Failure;
pub use package::CONFIG_FILE;
pub use package::ChecksSource;
pub use package::ConfirmPolicy;
pub use package::PackageConfig;
pub use plan::ExecutionPlan;
pub use plan::LogLevel;
pub use plan::OutputChannel;
pub use plan::PlanWarning;
pub use plan::RawOptions;
pub use plan::resolve;
pub use results::CheckOutcome;
pub use results::CheckStatus;
pub use results::ResultPayload;
