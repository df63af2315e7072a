// crates/checkup-cli/src/i18n_tests.rs
// ============================================================================
// Module: Internationalization Tests
// Description: Unit tests for locale parsing and message translation.
// Purpose: Pin catalog lookup order and placeholder substitution.
// Dependencies: Standard library only.
// ============================================================================

//! ## Overview
//! Tests run under the default (English) locale; none of them call
//! `set_locale`, so they stay independent of execution order.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::i18n::Locale;
use crate::i18n::add_translations;
use crate::t;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn locale_parsing_tolerates_case_and_region_tags() {
    assert_eq!(Locale::parse("en"), Some(Locale::En));
    assert_eq!(Locale::parse("ES"), Some(Locale::Es));
    assert_eq!(Locale::parse("es_MX"), Some(Locale::Es));
    assert_eq!(Locale::parse("en-US"), Some(Locale::En));
    assert_eq!(Locale::parse("fr"), None);
    assert_eq!(Locale::parse(""), None);
}

#[test]
fn placeholders_are_substituted_in_order() {
    let message = t!("engine.exit_mismatch", expected = 0, actual = 3);
    assert_eq!(message, "expected exit code 0, got 3");
}

#[test]
fn unknown_keys_fall_back_to_the_key_itself() {
    assert_eq!(t!("does.not.exist"), "does.not.exist");
}

#[test]
fn package_translations_fill_catalog_gaps() {
    add_translations([(
        "package.check.exists".to_string(),
        "hello.c exists".to_string(),
    )]);

    assert_eq!(t!("package.check.exists"), "hello.c exists");
    // Built-in entries are never shadowed by package entries.
    add_translations([("logout.ok".to_string(), "shadowed".to_string())]);
    assert_eq!(t!("logout.ok"), "logged out successfully");
}
