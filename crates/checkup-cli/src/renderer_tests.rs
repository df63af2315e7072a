// crates/checkup-cli/src/renderer_tests.rs
// ============================================================================
// Module: Renderer Tests
// Description: Unit tests for the per-channel result renderers.
// Purpose: Pin json determinism and the ansi/html shapes.
// Dependencies: checkup-core, serde_json.
// ============================================================================

//! ## Overview
//! Renders fixed payloads through each channel and asserts on the produced
//! text, without touching any sink.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use checkup_core::CheckOutcome;
use checkup_core::CheckStatus;
use checkup_core::ResultPayload;

use crate::renderer::paint;
use crate::renderer::to_ansi;
use crate::renderer::to_html;
use crate::renderer::to_json;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn outcome(name: &str, status: CheckStatus, message: Option<&str>) -> CheckOutcome {
    CheckOutcome {
        name: name.to_string(),
        description: Some(format!("{name} description")),
        status,
        message: message.map(str::to_string),
        log: Vec::new(),
    }
}

fn payload() -> ResultPayload {
    ResultPayload {
        slug: "org/problems/demo".to_string(),
        results: vec![
            outcome("exists", CheckStatus::Passed, None),
            outcome("compiles", CheckStatus::Failed, Some("expected exit code 0, got 2")),
            outcome("style", CheckStatus::Skipped, None),
        ],
        version: "1.0.0".to_string(),
    }
}

// ============================================================================
// SECTION: JSON Tests
// ============================================================================

#[test]
fn json_rendering_is_deterministic_and_round_trips() {
    let payload = payload();

    let first = to_json(&payload).expect("render json");
    let second = to_json(&payload).expect("render json again");
    assert_eq!(first, second);
    assert!(first.ends_with('\n'));

    let parsed: ResultPayload = serde_json::from_str(&first).expect("parse rendered json");
    assert_eq!(parsed, payload);
}

// ============================================================================
// SECTION: ANSI Tests
// ============================================================================

#[test]
fn ansi_rendering_marks_each_status() {
    let rendered = to_ansi(&payload(), &[], false, false);
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines[0], ":) exists description");
    assert_eq!(lines[1], ":( compiles description");
    assert_eq!(lines[2], "    expected exit code 0, got 2");
    assert_eq!(lines[3], ":| style description");
    assert_eq!(lines[4], "    check skipped");
    assert_eq!(lines[5], "1 of 2 checks passed");
}

#[test]
fn ansi_rendering_colors_status_lines_when_enabled() {
    let rendered = to_ansi(&payload(), &[], false, true);

    assert!(rendered.contains("\x1b[32m:) exists description\x1b[0m"));
    assert!(rendered.contains("\x1b[31m:( compiles description\x1b[0m"));
    assert!(rendered.contains("\x1b[33m:| style description\x1b[0m"));
}

#[test]
fn ansi_rendering_interleaves_the_captured_log_on_request() {
    let log = vec!["running check exists".to_string()];

    let without = to_ansi(&payload(), &log, false, false);
    assert!(!without.contains("running check exists"));

    let with = to_ansi(&payload(), &log, true, false);
    assert!(with.contains("Log"));
    assert!(with.contains("running check exists"));
}

#[test]
fn ansi_rendering_falls_back_to_the_check_name_without_a_description() {
    let payload = ResultPayload {
        slug: "org/problems/demo".to_string(),
        results: vec![CheckOutcome {
            name: "exists".to_string(),
            description: None,
            status: CheckStatus::Passed,
            message: None,
            log: Vec::new(),
        }],
        version: "1.0.0".to_string(),
    };

    let rendered = to_ansi(&payload, &[], false, false);
    assert_eq!(rendered.lines().next(), Some(":) exists"));
}

// ============================================================================
// SECTION: HTML Tests
// ============================================================================

#[test]
fn html_rendering_escapes_untrusted_text() {
    let payload = ResultPayload {
        slug: "org/<script>".to_string(),
        results: vec![outcome("quotes", CheckStatus::Failed, Some("expected \"a\" & got 'b'"))],
        version: "1.0.0".to_string(),
    };

    let rendered = to_html(&payload);
    assert!(rendered.contains("org/&lt;script&gt;"));
    assert!(rendered.contains("&quot;a&quot; &amp; got &#39;b&#39;"));
    assert!(!rendered.contains("<script>"));
}

#[test]
fn html_rendering_tags_each_status_class() {
    let rendered = to_html(&payload());

    assert!(rendered.contains("class=\"passed\""));
    assert!(rendered.contains("class=\"failed\""));
    assert!(rendered.contains("class=\"skipped\""));
}

// ============================================================================
// SECTION: Paint Tests
// ============================================================================

#[test]
fn paint_is_a_no_op_when_disabled() {
    assert_eq!(paint("plain", "31", false), "plain");
    assert_eq!(paint("red", "31", true), "\x1b[31mred\x1b[0m");
}
