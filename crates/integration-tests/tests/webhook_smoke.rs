//! Smoke suites against fake booking and email-hook services.

use std::time::Duration;

use axum::http::StatusCode;
use bookingops_admin::webhook::{
    Expectation, NoResponseKind, ProbeOutcome, WebhookProbe, run_booking_check,
    run_email_hook_suite,
};
use bookingops_integration_tests::fakes::booking::FakeBookingWebhook;
use bookingops_integration_tests::fakes::email_hook::FakeEmailHook;
use bookingops_integration_tests::{closed_addr, spawn};

fn probe(timeout: Duration) -> WebhookProbe {
    WebhookProbe::new(timeout).expect("Failed to build probe")
}

// ============================================================================
// Booking Webhook
// ============================================================================

#[tokio::test]
async fn test_booking_check_passes_on_success() {
    let fake = FakeBookingWebhook::responding(StatusCode::OK);
    let addr = spawn(fake.router()).await;
    let url = format!("http://{addr}/webhook/booking");

    let report = run_booking_check(&probe(Duration::from_secs(5)), &url).await;

    assert!(report.passed());
    let received = fake.received();
    assert_eq!(received.len(), 1);
    assert!(received[0].get("bookingId").is_some());
    assert_eq!(
        received[0]["preferredCommunication"],
        serde_json::json!(["whatsapp", "email"])
    );
}

#[tokio::test]
async fn test_booking_check_fails_on_server_error() {
    let fake = FakeBookingWebhook::responding(StatusCode::INTERNAL_SERVER_ERROR);
    let addr = spawn(fake.router()).await;
    let url = format!("http://{addr}/webhook/booking");

    let report = run_booking_check(&probe(Duration::from_secs(5)), &url).await;

    assert!(!report.passed());
    assert_eq!(report.checks[0].outcome.status(), Some(500));
    assert!(report.unreachable().is_none());
}

#[tokio::test]
async fn test_booking_check_times_out() {
    let fake = FakeBookingWebhook::responding(StatusCode::OK).slow(Duration::from_secs(2));
    let addr = spawn(fake.router()).await;
    let url = format!("http://{addr}/webhook/booking");

    let report = run_booking_check(&probe(Duration::from_millis(200)), &url).await;

    assert!(!report.passed());
    assert!(matches!(
        report.checks[0].outcome,
        ProbeOutcome::NoResponse {
            kind: NoResponseKind::Timeout,
            ..
        }
    ));
}

// ============================================================================
// Email-Hook API
// ============================================================================

#[tokio::test]
async fn test_email_hook_suite_against_conforming_service() {
    let fake = FakeEmailHook::default();
    let addr = spawn(fake.router()).await;

    let report = run_email_hook_suite(&probe(Duration::from_secs(5)), &format!("http://{addr}/")).await;

    for check in &report.checks {
        assert!(check.passed(), "{} failed: {}", check.name, check.actual());
    }
    assert_eq!(report.checks.len(), 6);
    assert!(report.passed());
    assert_eq!(fake.stored(), 2, "only the two valid payloads are stored");

    let rejected: Vec<_> = report
        .checks
        .iter()
        .filter(|c| c.expectation == Expectation::Status(400))
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(rejected, vec!["missing subject", "malformed from"]);
}

#[tokio::test]
async fn test_email_hook_suite_flags_missing_validation() {
    let fake = FakeEmailHook::lax();
    let addr = spawn(fake.router()).await;

    let report = run_email_hook_suite(&probe(Duration::from_secs(5)), &format!("http://{addr}")).await;

    assert!(!report.passed());
    let failed: Vec<_> = report
        .checks
        .iter()
        .filter(|c| !c.passed())
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(failed, vec!["missing subject", "malformed from"]);
}

#[tokio::test]
async fn test_email_hook_suite_stops_when_unreachable() {
    let addr = closed_addr().await;

    let report = run_email_hook_suite(&probe(Duration::from_secs(2)), &format!("http://{addr}")).await;

    assert!(!report.passed());
    assert_eq!(report.checks.len(), 1);
    assert_eq!(report.skipped, 5);

    let unreachable = report.unreachable().expect("first check got no response");
    match &unreachable.outcome {
        ProbeOutcome::NoResponse { kind, .. } => {
            assert_eq!(*kind, NoResponseKind::Connect);
            assert!(!kind.hints().is_empty());
        }
        ProbeOutcome::Responded { .. } => panic!("expected no response"),
    }
}
