// crates/checkup-cli/src/executor.rs
// ============================================================================
// Module: Run Executor
// Description: Local and remote execution paths behind one entry point.
// Purpose: Drive one run from resolved plan to unified result payload.
// Dependencies: checkup-core, checkup-client, tempfile, tokio, toml.
// ============================================================================

//! ## Overview
//! [`execute`] dispatches a resolved plan: the remote path submits the work
//! and polls for results, the local path resolves the checks package
//! (developer mode treats the slug as a literal directory), compiles
//! declarative checks, installs package translations and dependencies,
//! stages the working area, and runs the bundled engine. Both paths end in
//! the same [`RunArtifacts`] so rendering stays path-agnostic.
//!
//! Blocking work (dependency installation, check execution) runs on the
//! blocking pool so cancellation stays responsive.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::io::BufRead;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use checkup_client::DEFAULT_PINGS;
use checkup_client::DEFAULT_POLL_INTERVAL;
use checkup_client::RemoteClient;
use checkup_core::CheckEngine;
use checkup_core::ConfirmPolicy;
use checkup_core::ExecutionPlan;
use checkup_core::Failure;
use checkup_core::LogLevel;
use checkup_core::OutputChannel;
use checkup_core::ResultPayload;
use checkup_core::package::AssumeYes;
use checkup_core::package::COMPILED_CHECKS_FILE;
use checkup_core::package::ChecksSource;
use checkup_core::package::load_config;
use checkup_core::package::write_compiled_checks;

use crate::engine::CommandEngine;
use crate::i18n;
use crate::installer;
use crate::renderer::Progress;
use crate::store;
use crate::store::PackageStore;
use crate::t;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Everything a finished run hands to the renderers.
#[derive(Debug)]
pub struct RunArtifacts {
    /// Unified result payload.
    pub payload: ResultPayload,
    /// Hosted results handle, present after a remote run.
    pub tag_hash: Option<String>,
    /// Hosted results page URL, present after a remote run.
    pub hosted_url: Option<String>,
}

/// Confirmation policy that asks the user on the terminal.
pub struct StdinConfirm;

impl ConfirmPolicy for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        eprint!("{prompt} ");
        let _ = io::stderr().flush();
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

// ============================================================================
// SECTION: Dispatch
// ============================================================================

/// Executes one resolved plan to completion.
///
/// # Errors
///
/// Propagates every [`Failure`] from the selected execution path.
pub async fn execute(plan: &ExecutionPlan) -> Result<RunArtifacts, Failure> {
    if plan.local {
        run_local(plan).await
    } else {
        run_remote(plan).await
    }
}

/// Whether the progress indicator may animate for this plan.
#[must_use]
pub fn progress_animates(plan: &ExecutionPlan) -> bool {
    plan.output.contains(&OutputChannel::Ansi)
        && plan.output_file.is_none()
        && plan.log_level >= LogLevel::Warning
}

// ============================================================================
// SECTION: Remote Path
// ============================================================================

async fn run_remote(plan: &ExecutionPlan) -> Result<RunArtifacts, Failure> {
    let animate = progress_animates(plan);
    let client = RemoteClient::from_env()?;

    let commit_hash = {
        let _progress = Progress::start(&t!("progress.uploading"), animate);
        client.submit(&plan.slug).await?
    };

    let (tag_hash, payload) = {
        let _progress = Progress::start(&t!("progress.waiting"), animate);
        client
            .await_results(&commit_hash, &plan.slug, DEFAULT_PINGS, DEFAULT_POLL_INTERVAL)
            .await?
    };

    let hosted_url = client.hosted_results_url(&tag_hash);
    Ok(RunArtifacts {
        payload,
        tag_hash: Some(tag_hash),
        hosted_url: Some(hosted_url),
    })
}

// ============================================================================
// SECTION: Local Path
// ============================================================================

async fn run_local(plan: &ExecutionPlan) -> Result<RunArtifacts, Failure> {
    let animate = progress_animates(plan);
    let check_dir = resolve_check_dir(plan, animate).await?;
    let config = load_config(&check_dir)?;

    if let Some(relative) = &config.translations {
        install_package_translations(&check_dir.join(relative))?;
    }

    let checks_file = check_dir.join(compiled_checks_name(plan, &check_dir, &config.checks)?);

    if !plan.no_install_dependencies && !config.dependencies.is_empty() {
        let _progress = Progress::start(&t!("progress.installing"), animate);
        let dependencies = config.dependencies.clone();
        let verbose = plan.verbose;
        tokio::task::spawn_blocking(move || {
            installer::install_dependencies(&dependencies, verbose)
        })
        .await
        .map_err(|err| Failure::unexpected("dependency installation task failed", err))??;
    }

    let base = std::env::current_dir()?;
    let files = store::included_files(&base, config.files.as_deref())?;
    let area = store::working_area(&base, &files)?;

    let outcomes = {
        let _progress = Progress::start(&t!("progress.checking"), animate);
        let engine = CommandEngine::new(plan.verbose);
        let area_path = area.path().to_path_buf();
        let targets = plan.targets.clone();
        tokio::task::spawn_blocking(move || {
            engine.run(&checks_file, &area_path, targets.as_deref())
        })
        .await
        .map_err(|err| Failure::unexpected("check execution task failed", err))??
    };

    Ok(RunArtifacts {
        payload: ResultPayload {
            slug: plan.slug.clone(),
            results: outcomes,
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        tag_hash: None,
        hosted_url: None,
    })
}

/// Resolves the checks directory: a literal path in developer mode, the
/// package cache otherwise.
async fn resolve_check_dir(plan: &ExecutionPlan, animate: bool) -> Result<PathBuf, Failure> {
    if plan.dev {
        let path = PathBuf::from(&plan.slug);
        if !path.is_dir() {
            return Err(Failure::InvalidTarget {
                message: t!("dev.not_a_directory", path = path.display()),
                suggestions: Vec::new(),
            });
        }
        return Ok(path);
    }

    let store = PackageStore::from_env()?;
    let client = if plan.no_download_checks {
        None
    } else {
        Some(RemoteClient::from_env()?)
    };
    let _progress = Progress::start(&t!("progress.preparing"), animate);
    store.resolve(client.as_ref(), &plan.slug).await
}

/// Returns the checks file name, compiling declarative checks when needed.
///
/// Developer mode confirms on the terminal before overwriting an existing
/// compiled file; normal runs overwrite silently inside the cache.
fn compiled_checks_name(
    plan: &ExecutionPlan,
    check_dir: &Path,
    checks: &ChecksSource,
) -> Result<String, Failure> {
    match checks {
        ChecksSource::File(name) => Ok(name.clone()),
        ChecksSource::Declared(declared) => {
            let prompt =
                t!("compile.overwrite", path = check_dir.join(COMPILED_CHECKS_FILE).display());
            if plan.dev {
                write_compiled_checks(check_dir, declared, &StdinConfirm, &prompt)
            } else {
                write_compiled_checks(check_dir, declared, &AssumeYes, &prompt)
            }
        }
    }
}

/// Loads a package's translation catalog into the i18n layer.
fn install_package_translations(path: &Path) -> Result<(), Failure> {
    let text = fs::read_to_string(path).map_err(|_| Failure::NotFound {
        path: path.to_path_buf(),
    })?;
    let entries: BTreeMap<String, String> =
        toml::from_str(&text).map_err(|err| Failure::InvalidTarget {
            message: format!("translation catalog at {} is invalid: {err}", path.display()),
            suggestions: Vec::new(),
        })?;
    i18n::add_translations(entries);
    Ok(())
}
