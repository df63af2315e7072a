// crates/checkup-cli/src/renderer.rs
// ============================================================================
// Module: Result Renderers
// Description: Per-channel rendering of the unified result payload.
// Purpose: Fan one immutable payload out to ansi, json, and html consumers.
// Dependencies: checkup-core, serde_json, tempfile, tokio, tracing.
// ============================================================================

//! ## Overview
//! Every requested output channel renders the same [`ResultPayload`]: `ansi`
//! writes a colorized line per check (optionally interleaving the captured
//! log), `json` serializes the payload verbatim and deterministically, and
//! `html` produces a self-contained document, persisted to a temporary file
//! for local runs or referenced through the hosted results page for remote
//! ones. All channels share one sink: the output file when given, stdout
//! otherwise.
//!
//! The module also hosts the stderr progress indicator used while a run is
//! in flight.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io;
use std::io::Write;
use std::process::Command;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::time::Duration;

use checkup_core::CheckStatus;
use checkup_core::ExecutionPlan;
use checkup_core::Failure;
use checkup_core::OutputChannel;
use checkup_core::ResultPayload;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::executor::RunArtifacts;
use crate::t;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// ANSI color code for passed checks.
pub const GREEN: &str = "32";
/// ANSI color code for failed checks and errors.
pub const RED: &str = "31";
/// ANSI color code for skipped checks.
pub const YELLOW: &str = "33";
/// ANSI attribute code for emphasized lines.
pub const BOLD: &str = "1";

/// Environment variable marking an embedded IDE able to render results itself.
pub const IDE_ENV: &str = "CHECKUP_IDE_TYPE";
/// External helper invoked to display results inside an embedded IDE.
const IDE_RENDERER: &str = "checkup-ide";
/// Dot cadence of the progress indicator.
const PROGRESS_TICK: Duration = Duration::from_millis(500);

// ============================================================================
// SECTION: Painting
// ============================================================================

/// Wraps `text` in an ANSI escape when `enabled`, returning it verbatim otherwise.
#[must_use]
pub fn paint(text: &str, code: &str, enabled: bool) -> String {
    if enabled {
        format!("\x1b[{code}m{text}\x1b[0m")
    } else {
        text.to_string()
    }
}

// ============================================================================
// SECTION: Channel Renderers
// ============================================================================

/// Serializes the payload to pretty-printed JSON.
///
/// Field order is fixed by the payload types, so rendering the same payload
/// twice yields byte-identical text.
///
/// # Errors
///
/// Returns [`Failure::Unexpected`] when serialization fails.
pub fn to_json(payload: &ResultPayload) -> Result<String, Failure> {
    let mut text = serde_json::to_string_pretty(payload)
        .map_err(|err| Failure::unexpected("could not render the json report", err))?;
    text.push('\n');
    Ok(text)
}

/// Renders the line-oriented terminal summary.
#[must_use]
pub fn to_ansi(
    payload: &ResultPayload,
    log_lines: &[String],
    include_log: bool,
    color: bool,
) -> String {
    let mut out = String::new();
    for outcome in &payload.results {
        let description = outcome.description.as_deref().unwrap_or(&outcome.name);
        match outcome.status {
            CheckStatus::Passed => {
                out.push_str(&paint(&format!(":) {description}"), GREEN, color));
                out.push('\n');
            }
            CheckStatus::Failed => {
                out.push_str(&paint(&format!(":( {description}"), RED, color));
                out.push('\n');
                if let Some(message) = &outcome.message {
                    out.push_str("    ");
                    out.push_str(message);
                    out.push('\n');
                }
            }
            CheckStatus::Skipped => {
                out.push_str(&paint(&format!(":| {description}"), YELLOW, color));
                out.push('\n');
                out.push_str("    ");
                out.push_str(outcome.message.as_deref().unwrap_or(&t!("ansi.skipped")));
                out.push('\n');
            }
        }
    }

    out.push_str(&paint(
        &t!("ansi.score", passed = payload.passed(), ran = payload.ran()),
        BOLD,
        color,
    ));
    out.push('\n');

    if include_log && !log_lines.is_empty() {
        out.push('\n');
        out.push_str(&paint(&t!("ansi.log_header"), BOLD, color));
        out.push('\n');
        for line in log_lines {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

/// Renders the self-contained HTML document.
#[must_use]
pub fn to_html(payload: &ResultPayload) -> String {
    let mut items = String::new();
    for outcome in &payload.results {
        let description = outcome.description.as_deref().unwrap_or(&outcome.name);
        let status = outcome.status.as_str();
        items.push_str(&format!(
            "    <li class=\"{status}\">{}",
            html_escape(description)
        ));
        if let Some(message) = &outcome.message {
            items.push_str(&format!("<br><small>{}</small>", html_escape(message)));
        }
        items.push_str("</li>\n");
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>checkup: {slug}</title>\n<style>\n\
         body {{ font-family: sans-serif; margin: 2em; }}\n\
         li.passed {{ color: #1a7f37; }}\n\
         li.failed {{ color: #cf222e; }}\n\
         li.skipped {{ color: #9a6700; }}\n\
         </style>\n</head>\n<body>\n<h1>{slug}</h1>\n<ul>\n{items}</ul>\n\
         <footer>checkup {version}</footer>\n</body>\n</html>\n",
        slug = html_escape(&payload.slug),
        version = html_escape(&payload.version),
        items = items,
    )
}

/// Escapes text for embedding into the HTML document.
fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

// ============================================================================
// SECTION: Fan-Out
// ============================================================================

/// Renders every channel in the plan into the shared sink.
///
/// # Errors
///
/// Propagates sink and serialization failures.
pub fn render_all(
    plan: &ExecutionPlan,
    artifacts: &RunArtifacts,
    log_lines: &[String],
) -> Result<(), Failure> {
    let color = plan.output_file.is_none();
    let mut sink: Box<dyn Write> = match &plan.output_file {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout()),
    };

    for channel in &plan.output {
        match channel {
            OutputChannel::Json => {
                sink.write_all(to_json(&artifacts.payload)?.as_bytes())?;
            }
            OutputChannel::Ansi => {
                let rendered =
                    to_ansi(&artifacts.payload, log_lines, plan.ansi_log, color);
                sink.write_all(rendered.as_bytes())?;
            }
            OutputChannel::Html => {
                render_html_channel(plan, artifacts, &mut sink, color)?;
            }
        }
    }
    sink.flush()?;
    Ok(())
}

/// Renders the html channel: hosted URL for remote runs, persisted document
/// (or embedded-IDE hand-off) for local ones.
fn render_html_channel(
    plan: &ExecutionPlan,
    artifacts: &RunArtifacts,
    sink: &mut dyn Write,
    color: bool,
) -> Result<(), Failure> {
    if let Some(url) = &artifacts.hosted_url {
        writeln!(sink, "{}", paint(&t!("results.detailed", url = url), BOLD, color))?;
        return Ok(());
    }

    let document = to_html(&artifacts.payload);
    let mut file = tempfile::Builder::new().prefix("checkup_").suffix(".html").tempfile()?;
    file.write_all(document.as_bytes())?;
    let (_, path) = file
        .keep()
        .map_err(|err| Failure::unexpected("could not persist the html report", err))?;

    if plan.local && std::env::var_os(IDE_ENV).is_some() {
        match Command::new(IDE_RENDERER).arg("render").arg(&path).status() {
            Ok(status) if status.success() => return Ok(()),
            Ok(status) => warn!(%status, "ide renderer exited non-zero"),
            Err(err) => warn!(%err, "ide renderer unavailable"),
        }
    }

    let url = format!("file://{}", path.display());
    writeln!(sink, "{}", paint(&t!("results.detailed", url = url), BOLD, color))?;
    Ok(())
}

// ============================================================================
// SECTION: Progress
// ============================================================================

/// Animated stderr progress indicator.
///
/// Prints `message...` immediately; when animation is enabled, a background
/// task appends a dot every tick until the indicator is dropped.
pub struct Progress {
    active: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Progress {
    /// Starts the indicator.
    #[must_use]
    pub fn start(message: &str, animate: bool) -> Self {
        eprint!("{message}...");
        let _ = io::stderr().flush();
        let active = Arc::new(AtomicBool::new(true));
        let handle = animate.then(|| {
            let active = Arc::clone(&active);
            tokio::spawn(async move {
                while active.load(Ordering::Relaxed) {
                    tokio::time::sleep(PROGRESS_TICK).await;
                    if !active.load(Ordering::Relaxed) {
                        break;
                    }
                    eprint!(".");
                    let _ = io::stderr().flush();
                }
            })
        });
        Self {
            active,
            handle,
        }
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        eprintln!();
    }
}
