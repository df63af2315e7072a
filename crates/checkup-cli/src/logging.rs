// crates/checkup-cli/src/logging.rs
// ============================================================================
// Module: CLI Log Setup
// Description: Tracing subscriber installation with optional line capture.
// Purpose: Map the resolved log level onto a subscriber and feed --ansi-log.
// Dependencies: checkup-core, tracing, tracing-subscriber.
// ============================================================================

//! ## Overview
//! Log output goes to stderr through `tracing-subscriber`. The resolved
//! [`LogLevel`] becomes the default filter directive; `CHECKUP_LOG` overrides
//! it with a full filter expression when set. When the ansi rendering should
//! interleave the log (`--ansi-log`), a [`LogBuffer`] tees every emitted line
//! into memory so the renderer can replay it after the run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::io::Write;
use std::sync::Arc;
use std::sync::Mutex;

use checkup_core::LogLevel;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable carrying a full tracing filter expression.
pub const LOG_FILTER_ENV: &str = "CHECKUP_LOG";

// ============================================================================
// SECTION: Capture
// ============================================================================

/// In-memory tee of everything the subscriber writes to stderr.
///
/// # Invariants
/// - Captured bytes are append-only; lines are split only at read time.
#[derive(Clone, Default)]
pub struct LogBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl LogBuffer {
    /// Creates an empty capture buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the captured log split into lines.
    #[must_use]
    pub fn captured_lines(&self) -> Vec<String> {
        let Ok(bytes) = self.inner.lock() else {
            return Vec::new();
        };
        String::from_utf8_lossy(&bytes).lines().map(str::to_string).collect()
    }
}

/// Writer handed out per log event: stderr plus the capture buffer.
pub struct TeeWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Ok(mut captured) = self.buffer.lock() {
            captured.extend_from_slice(buf);
        }
        io::stderr().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = TeeWriter;

    fn make_writer(&'a self) -> Self::Writer {
        TeeWriter {
            buffer: Arc::clone(&self.inner),
        }
    }
}

// ============================================================================
// SECTION: Initialization
// ============================================================================

/// Returns the default filter directive for a resolved log level.
#[must_use]
pub const fn directive_for(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warning => "warn",
        LogLevel::Error => "error",
    }
}

/// Installs the global subscriber.
///
/// Repeated initialization (as happens across tests) is silently ignored;
/// only the first subscriber wins.
pub fn init(level: LogLevel, capture: Option<&LogBuffer>) {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(directive_for(level)));
    match capture {
        Some(buffer) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(buffer.clone())
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(io::stderr)
                .try_init();
        }
    }
}
