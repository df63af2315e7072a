// crates/checkup-cli/src/lib.rs
// ============================================================================
// Module: Checkup CLI Library
// Description: Local execution path, output rendering, and error reporting.
// Purpose: Keep the binary thin by hosting every run component behind a library.
// Dependencies: checkup-core, checkup-client, globset, tempfile, tokio, tracing, walkdir.
// ============================================================================

//! ## Overview
//! Everything the `checkup` binary does lives here: the i18n catalog, log
//! setup with optional capture, the checks package cache, the dependency
//! installer, the bundled command engine, the local and remote execution
//! paths, per-channel result rendering, and the terminal error reporter.
//! All user-facing strings are routed through the [`t!`](crate::t) macro.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Bundled shell-command check engine.
pub mod engine;
/// Local and remote execution paths.
pub mod executor;
/// Message catalog and translation utilities.
pub mod i18n;
/// Single-shot dependency installer.
pub mod installer;
/// Log setup with optional line capture.
pub mod logging;
/// Per-channel result rendering and the progress indicator.
pub mod renderer;
/// Terminal and machine-readable failure reporting.
pub mod reporter;
/// Package cache, slug resolution, and working-area staging.
pub mod store;

#[cfg(test)]
mod engine_tests;
#[cfg(test)]
mod i18n_tests;
#[cfg(test)]
mod installer_tests;
#[cfg(test)]
mod renderer_tests;
