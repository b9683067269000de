//! Email-hook API smoke suite.
//!
//! Four `POST /api/email-hook` cases (two valid, two deliberately invalid)
//! followed by the read endpoints `logs` and `stats`. Expected statuses for
//! the POST cases come from [`EmailHookPayload::violations`].

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use bookingops_core::{EmailHookLogs, EmailHookPayload, EmailHookStats};

use super::probe::{ProbeOutcome, WebhookProbe};
use super::report::{CheckResult, Expectation, SmokeReport};

const HOOK_PATH: &str = "/api/email-hook";
const LOGS_LIMIT: u32 = 5;
const BAD_REQUEST: u16 = 400;

/// One POST case of the suite.
#[derive(Debug, Clone)]
pub struct EmailHookCase {
    pub name: &'static str,
    pub payload: EmailHookPayload,
}

impl EmailHookCase {
    /// `400` if the payload violates the API contract, otherwise any 2xx.
    #[must_use]
    pub fn expectation(&self) -> Expectation {
        if self.payload.is_valid() {
            Expectation::Success
        } else {
            Expectation::Status(BAD_REQUEST)
        }
    }
}

/// The POST cases, timestamped at `now`.
#[must_use]
pub fn email_hook_cases(now: DateTime<Utc>) -> Vec<EmailHookCase> {
    vec![
        EmailHookCase {
            name: "full payload",
            payload: EmailHookPayload::new("customer@example.com", "Re: Your repair booking")
                .with_reply("Thanks! Tuesday morning works for me.")
                .at(now),
        },
        EmailHookCase {
            name: "minimal payload",
            payload: EmailHookPayload::new("customer@example.com", "Re: Booking confirmation"),
        },
        EmailHookCase {
            name: "missing subject",
            payload: EmailHookPayload {
                from: "customer@example.com".to_string(),
                ..EmailHookPayload::default()
            }
            .with_reply("No subject here"),
        },
        EmailHookCase {
            name: "malformed from",
            payload: EmailHookPayload::new("not-an-email", "Re: Your repair booking"),
        },
    ]
}

/// Run the full suite against `base_url`.
///
/// Stops at the first request that gets no response; the remaining checks
/// are counted as skipped.
pub async fn run_email_hook_suite(probe: &WebhookProbe, base_url: &str) -> SmokeReport {
    let base = base_url.trim_end_matches('/');
    let hook_url = format!("{base}{HOOK_PATH}");
    let logs_url = format!("{hook_url}/logs?limit={LOGS_LIMIT}");
    let stats_url = format!("{hook_url}/stats");

    let cases = email_hook_cases(Utc::now());
    let total = cases.len() + 2;
    let mut report = SmokeReport::new(base);

    for case in cases {
        let outcome = probe.post_json(&hook_url, &case.payload).await;
        let check = CheckResult::new(
            case.name,
            format!("POST {hook_url}"),
            case.expectation(),
            outcome,
        );
        if !record(&mut report, check, total) {
            return report;
        }
    }

    let check = read_check::<EmailHookLogs>("recent logs", probe, &logs_url).await;
    if !record(&mut report, check, total) {
        return report;
    }

    let check = read_check::<EmailHookStats>("stats", probe, &stats_url).await;
    record(&mut report, check, total);

    info!(
        passed = report.passed_count(),
        total = report.checks.len(),
        "Email-hook suite finished"
    );
    report
}

/// Push `check`; returns `false` (and marks the rest skipped) if the
/// target did not respond.
fn record(report: &mut SmokeReport, check: CheckResult, total: usize) -> bool {
    let reachable = !matches!(check.outcome, ProbeOutcome::NoResponse { .. });
    report.checks.push(check);
    if !reachable {
        report.skipped = total - report.checks.len();
        warn!(skipped = report.skipped, "Target unreachable, stopping");
    }
    reachable
}

/// GET `url` expecting a 2xx whose body parses as `T`.
async fn read_check<T: DeserializeOwned>(
    name: &str,
    probe: &WebhookProbe,
    url: &str,
) -> CheckResult {
    let outcome = probe.get(url).await;
    let parse_error = match &outcome {
        ProbeOutcome::Responded { body, .. } if outcome.is_success() => {
            serde_json::from_str::<T>(body).err()
        }
        _ => None,
    };

    let check = CheckResult::new(name, format!("GET {url}"), Expectation::Success, outcome);
    match parse_error {
        Some(e) => check.with_problem(format!("unexpected body: {e}")),
        None => check,
    }
}
