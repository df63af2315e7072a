// crates/checkup-cli/src/main.rs
// ============================================================================
// Module: Checkup CLI Entry Point
// Description: Argument parsing and top-level run orchestration.
// Purpose: Resolve options into a plan, execute it, and render or report.
// Dependencies: checkup-cli, checkup-core, clap, tokio, tracing.
// ============================================================================

//! ## Overview
//! The `checkup` binary checks a piece of work against a prescribed set of
//! checks, remotely by default and locally on request. This entry point only
//! parses arguments, resolves them into an execution plan, and wires the
//! library components together; every failure funnels through the error
//! reporter so each requested channel sees exactly one report.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::process::ExitCode;

use checkup_cli::executor::execute;
use checkup_cli::i18n::LANG_ENV;
use checkup_cli::i18n::Locale;
use checkup_cli::i18n::set_locale;
use checkup_cli::logging;
use checkup_cli::logging::LogBuffer;
use checkup_cli::renderer::GREEN;
use checkup_cli::renderer::RED;
use checkup_cli::renderer::paint;
use checkup_cli::renderer::render_all;
use checkup_cli::reporter::ErrorReporter;
use checkup_cli::store::PackageStore;
use checkup_cli::t;
use checkup_core::Failure;
use checkup_core::LogLevel;
use checkup_core::OutputChannel;
use checkup_core::RawOptions;
use checkup_core::resolve;
use clap::ArgAction;
use clap::CommandFactory;
use clap::Parser;
use clap::ValueEnum;
use tracing::warn;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "checkup", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Identifier of the checks to run against the current directory
    /// (a literal checks directory with --dev).
    slug: Option<String>,
    /// Print version information and exit.
    #[arg(short = 'V', long = "version", action = ArgAction::SetTrue)]
    show_version: bool,
    /// Clear stored credentials and exit.
    #[arg(long, action = ArgAction::SetTrue)]
    logout: bool,
    /// Developer mode: treat the slug as a literal checks directory.
    #[arg(short, long)]
    dev: bool,
    /// Run completely offline (implies --local).
    #[arg(long)]
    offline: bool,
    /// Run the checks on this machine instead of submitting them.
    #[arg(short, long)]
    local: bool,
    /// Output formats to render, in order.
    #[arg(
        short,
        long = "output",
        value_enum,
        value_name = "FORMAT",
        num_args = 1..,
        default_values_t = [ChannelArg::Ansi, ChannelArg::Html]
    )]
    output: Vec<ChannelArg>,
    /// Write all channel output to this file instead of stdout.
    #[arg(long = "output-file", value_name = "FILE")]
    output_file: Option<PathBuf>,
    /// Run only the named checks.
    #[arg(long = "target", value_name = "CHECK", num_args = 1..)]
    targets: Option<Vec<String>>,
    /// Show full traces and check output.
    #[arg(short, long)]
    verbose: bool,
    /// Log level threshold.
    #[arg(long = "log-level", value_enum, value_name = "LEVEL")]
    log_level: Option<LogLevelArg>,
    /// Interleave the captured log into the ansi rendering.
    #[arg(long = "ansi-log")]
    ansi_log: bool,
    /// Use previously downloaded checks (requires --local).
    #[arg(long = "no-download-checks")]
    no_download_checks: bool,
    /// Skip dependency installation (requires --local).
    #[arg(long = "no-install-dependencies")]
    no_install_dependencies: bool,
    /// Preferred output language (overrides `CHECKUP_LANG`).
    #[arg(long, value_enum, value_name = "LANG")]
    lang: Option<LangArg>,
}

/// CLI-facing output channel names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ChannelArg {
    /// Colorized terminal summary.
    Ansi,
    /// Machine-readable payload.
    Json,
    /// Self-contained document.
    Html,
}

impl std::fmt::Display for ChannelArg {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(OutputChannel::from(*self).as_str())
    }
}

impl From<ChannelArg> for OutputChannel {
    fn from(value: ChannelArg) -> Self {
        match value {
            ChannelArg::Ansi => Self::Ansi,
            ChannelArg::Json => Self::Json,
            ChannelArg::Html => Self::Html,
        }
    }
}

/// CLI-facing log level names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevelArg {
    /// Log all commands run and their output.
    Debug,
    /// Log all commands run.
    Info,
    /// Display usage warnings.
    Warning,
    /// Log errors only.
    Error,
}

impl From<LogLevelArg> for LogLevel {
    fn from(value: LogLevelArg) -> Self {
        match value {
            LogLevelArg::Debug => Self::Debug,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Warning => Self::Warning,
            LogLevelArg::Error => Self::Error,
        }
    }
}

/// CLI-facing locale names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LangArg {
    /// English.
    En,
    /// Spanish.
    Es,
}

impl From<LangArg> for Locale {
    fn from(value: LangArg) -> Self {
        match value {
            LangArg::En => Self::En,
            LangArg::Es => Self::Es,
        }
    }
}

impl Cli {
    /// Converts parsed arguments into raw run options for `slug`.
    fn to_raw_options(&self, slug: String) -> RawOptions {
        RawOptions {
            slug,
            dev: self.dev,
            offline: self.offline,
            local: self.local,
            output: self.output.iter().copied().map(OutputChannel::from).collect(),
            output_file: self.output_file.clone(),
            targets: self.targets.clone(),
            verbose: self.verbose,
            log_level: self.log_level.map(LogLevel::from),
            ansi_log: self.ansi_log,
            no_download_checks: self.no_download_checks,
            no_install_dependencies: self.no_install_dependencies,
        }
    }
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_locale(cli.lang);

    if cli.show_version {
        println!("{}", t!("main.version", version = env!("CARGO_PKG_VERSION")));
        return ExitCode::SUCCESS;
    }
    if cli.logout {
        return run_logout();
    }
    let Some(slug) = cli.slug.clone() else {
        let _ = Cli::command().print_help();
        return ExitCode::FAILURE;
    };

    let (plan, warnings) = match resolve(cli.to_raw_options(slug)) {
        Ok(resolved) => resolved,
        Err(failure) => return ErrorReporter::bootstrap().report(&failure),
    };

    let capture = plan.ansi_log.then(LogBuffer::new);
    logging::init(plan.log_level, capture.as_ref());
    for warning in &warnings {
        warn!("{warning}");
    }

    let reporter = ErrorReporter::from_plan(&plan);
    let outcome = tokio::select! {
        result = execute(&plan) => result,
        _ = tokio::signal::ctrl_c() => Err(Failure::Cancelled),
    };

    match outcome {
        Ok(artifacts) => {
            let log_lines = capture.map(|buffer| buffer.captured_lines()).unwrap_or_default();
            match render_all(&plan, &artifacts, &log_lines) {
                Ok(()) => ExitCode::SUCCESS,
                Err(failure) => reporter.report(&failure),
            }
        }
        Err(failure) => reporter.report(&failure),
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Selects the locale from the flag or the environment.
fn init_locale(flag: Option<LangArg>) {
    if let Some(lang) = flag {
        set_locale(lang.into());
        return;
    }
    if let Ok(value) = std::env::var(LANG_ENV) {
        if let Some(locale) = Locale::parse(&value) {
            set_locale(locale);
        }
    }
}

/// Clears stored credentials.
fn run_logout() -> ExitCode {
    let cleared = PackageStore::from_env().and_then(|store| store.clear_credentials());
    match cleared {
        Ok(()) => {
            println!("{}", paint(&t!("logout.ok"), GREEN, true));
            ExitCode::SUCCESS
        }
        Err(_) => {
            eprintln!("{}", paint(&t!("logout.failed"), RED, true));
            ExitCode::FAILURE
        }
    }
}
