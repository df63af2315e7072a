// crates/checkup-core/src/plan_tests.rs
// ============================================================================
// Module: Plan Resolution Tests
// Description: Unit and property tests for raw option resolution.
// Purpose: Pin the implication rules, channel dedup, and idempotency.
// Dependencies: checkup-core plan module, proptest.
// ============================================================================

//! ## Overview
//! Validates the option implication chains, duplicate-channel handling, and
//! the idempotency of [`resolve`] over arbitrary raw option sets.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use proptest::prelude::Just;
use proptest::prelude::Strategy;
use proptest::prop_oneof;
use proptest::proptest;

use crate::failure::Failure;
use crate::plan::LogLevel;
use crate::plan::OutputChannel;
use crate::plan::PlanWarning;
use crate::plan::RawOptions;
use crate::plan::resolve;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn base_options() -> RawOptions {
    RawOptions {
        slug: "org/problems/demo".to_string(),
        dev: false,
        offline: false,
        local: false,
        output: vec![OutputChannel::Ansi, OutputChannel::Html],
        output_file: None,
        targets: None,
        verbose: false,
        log_level: None,
        ansi_log: false,
        no_download_checks: false,
        no_install_dependencies: false,
    }
}

fn channel_strategy() -> impl Strategy<Value = OutputChannel> {
    prop_oneof![
        Just(OutputChannel::Ansi),
        Just(OutputChannel::Json),
        Just(OutputChannel::Html),
    ]
}

fn level_strategy() -> impl Strategy<Value = Option<LogLevel>> {
    prop_oneof![
        Just(None),
        Just(Some(LogLevel::Debug)),
        Just(Some(LogLevel::Info)),
        Just(Some(LogLevel::Warning)),
        Just(Some(LogLevel::Error)),
    ]
}

fn options_strategy() -> impl Strategy<Value = RawOptions> {
    (
        proptest::bool::ANY,
        proptest::bool::ANY,
        proptest::bool::ANY,
        proptest::collection::vec(channel_strategy(), 1..6),
        proptest::bool::ANY,
        level_strategy(),
        (proptest::bool::ANY, proptest::bool::ANY, proptest::bool::ANY),
    )
        .prop_map(|(dev, offline, local, output, verbose, log_level, flags)| RawOptions {
            slug: "org/problems/demo".to_string(),
            dev,
            offline,
            local,
            output,
            output_file: None,
            targets: None,
            verbose,
            log_level,
            ansi_log: flags.0,
            no_download_checks: flags.1,
            no_install_dependencies: flags.2,
        })
}

// ============================================================================
// SECTION: Implication Tests
// ============================================================================

#[test]
fn dev_implies_offline_verbose_and_info_log_level() {
    let mut raw = base_options();
    raw.dev = true;

    let (plan, _) = resolve(raw).expect("resolve dev options");
    assert!(plan.offline);
    assert!(plan.verbose);
    assert!(plan.local);
    assert_eq!(plan.log_level, LogLevel::Info);
}

#[test]
fn dev_never_overrides_explicit_log_level() {
    let mut raw = base_options();
    raw.dev = true;
    raw.log_level = Some(LogLevel::Error);

    let (plan, _) = resolve(raw).expect("resolve dev options");
    assert_eq!(plan.log_level, LogLevel::Error);
}

#[test]
fn offline_implies_local_and_skips_downloads_and_installs() {
    let mut raw = base_options();
    raw.offline = true;

    let (plan, _) = resolve(raw).expect("resolve offline options");
    assert!(plan.local);
    assert!(plan.no_download_checks);
    assert!(plan.no_install_dependencies);
}

#[test]
fn default_log_level_is_warning() {
    let (plan, _) = resolve(base_options()).expect("resolve defaults");
    assert_eq!(plan.log_level, LogLevel::Warning);
}

// ============================================================================
// SECTION: Channel Tests
// ============================================================================

#[test]
fn duplicate_channels_are_removed_keeping_first_occurrence() {
    let mut raw = base_options();
    raw.output = vec![OutputChannel::Html, OutputChannel::Ansi, OutputChannel::Html];

    let (plan, warnings) = resolve(raw).expect("resolve duplicate channels");
    assert_eq!(plan.output, vec![OutputChannel::Html, OutputChannel::Ansi]);
    assert_eq!(warnings, vec![PlanWarning::DuplicateChannel {
        channel: OutputChannel::Html,
    }]);
}

#[test]
fn empty_channel_set_is_rejected() {
    let mut raw = base_options();
    raw.output = Vec::new();

    let err = resolve(raw).expect_err("expected empty channel failure");
    assert!(matches!(err, Failure::InvalidOptions { .. }));
}

#[test]
fn ansi_log_is_auto_enabled_at_info_level() {
    let mut raw = base_options();
    raw.log_level = Some(LogLevel::Info);

    let (plan, _) = resolve(raw).expect("resolve info level");
    assert!(plan.ansi_log);
}

#[test]
fn ansi_log_without_ansi_channel_warns_but_resolves() {
    let mut raw = base_options();
    raw.output = vec![OutputChannel::Json];
    raw.ansi_log = true;

    let (_, warnings) = resolve(raw).expect("resolve json-only options");
    assert!(warnings.contains(&PlanWarning::AnsiLogWithoutAnsi));
}

#[test]
fn local_only_flags_warn_when_running_remotely() {
    let mut raw = base_options();
    raw.no_download_checks = true;
    raw.no_install_dependencies = true;

    let (plan, warnings) = resolve(raw).expect("resolve remote options");
    assert!(!plan.local);
    assert_eq!(warnings.len(), 2);
    assert!(warnings.iter().all(|warning| matches!(
        warning,
        PlanWarning::FlagRequiresLocal { .. }
    )));
}

// ============================================================================
// SECTION: Property Tests
// ============================================================================

proptest! {
    #[test]
    fn resolution_is_idempotent(raw in options_strategy()) {
        let (plan, _) = resolve(raw).expect("first resolution");
        let (again, _) = resolve(plan.to_raw_options()).expect("second resolution");
        assert_eq!(plan, again);
    }

    #[test]
    fn dev_always_forces_offline_and_verbose(mut raw in options_strategy()) {
        raw.dev = true;
        let (plan, _) = resolve(raw).expect("resolve dev options");
        assert!(plan.offline);
        assert!(plan.verbose);
    }

    #[test]
    fn offline_always_forces_local_chain(mut raw in options_strategy()) {
        raw.offline = true;
        let (plan, _) = resolve(raw).expect("resolve offline options");
        assert!(plan.local);
        assert!(plan.no_download_checks);
        assert!(plan.no_install_dependencies);
    }

    #[test]
    fn resolved_channels_are_unique_and_ordered(raw in options_strategy()) {
        let expected = {
            let mut seen = Vec::new();
            for channel in &raw.output {
                if !seen.contains(channel) {
                    seen.push(*channel);
                }
            }
            seen
        };
        let (plan, _) = resolve(raw).expect("resolve options");
        assert_eq!(plan.output, expected);
    }
}
