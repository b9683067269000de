//! Booking webhook check.

use tracing::info;

use bookingops_core::BookingPayload;

use super::probe::WebhookProbe;
use super::report::{CheckResult, Expectation, SmokeReport};

/// POST a sample booking to the booking webhook and expect a 2xx.
pub async fn run_booking_check(probe: &WebhookProbe, url: &str) -> SmokeReport {
    let payload = BookingPayload::sample();
    info!(booking_id = %payload.booking_id, %url, "Sending sample booking");

    let outcome = probe.post_json(url, &payload).await;

    let mut report = SmokeReport::new(url);
    report.checks.push(CheckResult::new(
        "booking webhook",
        format!("POST {url}"),
        Expectation::Success,
        outcome,
    ));
    report
}
