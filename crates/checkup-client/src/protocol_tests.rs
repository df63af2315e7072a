// crates/checkup-client/src/protocol_tests.rs
// ============================================================================
// Module: Results Protocol Tests
// Description: Unit tests for results body interpretation.
// Purpose: Pin the success and malformed-success handling of polled bodies.
// Dependencies: checkup-client protocol module, serde_json.
// ============================================================================

//! ## Overview
//! Validates [`interpret_results_body`] against completed, errored, and
//! malformed bodies without any network involvement.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use checkup_core::CheckStatus;
use checkup_core::Failure;
use serde_json::json;

use crate::protocol::interpret_results_body;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn completed_body_yields_tag_and_payload() {
    let body = json!({
        "received_at": "2026-08-23T10:00:00Z",
        "tag_hash": "tag123",
        "checkup": {
            "slug": "org/problems/demo",
            "results": [
                { "name": "exists", "status": "passed" },
                { "name": "compiles", "status": "failed", "message": "expected exit code 0, got 2" }
            ],
            "version": "1.0.0"
        }
    });

    let completed = interpret_results_body(&body).expect("interpret completed body");
    assert_eq!(completed.tag_hash, "tag123");
    assert_eq!(completed.payload.slug, "org/problems/demo");
    assert_eq!(completed.payload.results.len(), 2);
    assert_eq!(completed.payload.results[0].status, CheckStatus::Passed);
    assert_eq!(completed.payload.results[1].status, CheckStatus::Failed);
}

#[test]
fn missing_nested_result_is_remote_service_failure() {
    let body = json!({ "received_at": "2026-08-23T10:00:00Z", "tag_hash": "tag123" });

    let err = interpret_results_body(&body).expect_err("expected failure");
    assert!(matches!(err, Failure::RemoteService { .. }));
}

#[test]
fn embedded_error_field_is_remote_service_failure() {
    let body = json!({
        "received_at": "2026-08-23T10:00:00Z",
        "tag_hash": "tag123",
        "checkup": { "error": { "type": "EngineCrash", "value": "boom" } }
    });

    let err = interpret_results_body(&body).expect_err("expected failure");
    let Failure::RemoteService {
        payload, ..
    } = err
    else {
        panic!("expected remote service failure");
    };
    let payload = payload.expect("error payload attached");
    assert_eq!(payload["error"]["type"], "EngineCrash");
}

#[test]
fn missing_tag_hash_is_remote_service_failure() {
    let body = json!({
        "received_at": "2026-08-23T10:00:00Z",
        "checkup": { "slug": "org/problems/demo", "results": [], "version": "1.0.0" }
    });

    let err = interpret_results_body(&body).expect_err("expected failure");
    assert!(matches!(err, Failure::RemoteService { .. }));
}

#[test]
fn schema_mismatch_is_remote_service_failure() {
    let body = json!({
        "received_at": "2026-08-23T10:00:00Z",
        "tag_hash": "tag123",
        "checkup": { "slug": "org/problems/demo", "results": "not-a-list", "version": "1.0.0" }
    });

    let err = interpret_results_body(&body).expect_err("expected failure");
    assert!(matches!(err, Failure::RemoteService { .. }));
}
