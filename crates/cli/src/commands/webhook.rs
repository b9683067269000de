//! Webhook smoke test commands.
//!
//! # Environment Variables
//!
//! - `BOOKING_WEBHOOK_URL` - booking automation webhook
//! - `EMAIL_HOOK_API_URL` - email-hook API base URL (default `http://localhost:3000`)
//! - `WEBHOOK_TIMEOUT_SECS` - per-request timeout (default 10)

use core::fmt::Write as _;

use bookingops_admin::OpsError;
use bookingops_admin::config::WebhookConfig;
use bookingops_admin::console::{LogKind, log_formatted, log_webhook};
use bookingops_admin::webhook::{
    CheckResult, ProbeOutcome, SmokeReport, WebhookProbe, run_booking_check, run_email_hook_suite,
};
use serde_json::{Value, json};

/// Response bodies of failed checks are cut to this many characters.
const BODY_PREVIEW_CHARS: usize = 200;

pub async fn booking(url: Option<String>) -> Result<(), OpsError> {
    let config = WebhookConfig::from_env()?;
    let url = match url {
        Some(url) => url,
        None => config.booking_url()?.to_string(),
    };

    let probe = WebhookProbe::new(config.timeout)?;
    let report = run_booking_check(&probe, &url).await;
    finish("booking webhook", &report)
}

pub async fn email_hook(base_url: Option<String>) -> Result<(), OpsError> {
    let config = WebhookConfig::from_env()?;
    let base_url = base_url.unwrap_or(config.email_hook_base_url);

    let probe = WebhookProbe::new(config.timeout)?;
    let report = run_email_hook_suite(&probe, &base_url).await;
    finish("email-hook api", &report)
}

/// Print the report and fail unless every check passed.
fn finish(title: &str, report: &SmokeReport) -> Result<(), OpsError> {
    let lines: Vec<(String, Value)> = report
        .checks
        .iter()
        .map(|check| (check.name.clone(), json!(check_line(check))))
        .collect();

    let mut fields: Vec<(&str, Value)> = vec![("target", json!(report.target))];
    fields.extend(lines.iter().map(|(k, v)| (k.as_str(), v.clone())));
    fields.push((
        "passed",
        json!(format!("{}/{}", report.passed_count(), report.checks.len())),
    ));
    if report.skipped > 0 {
        fields.push(("skipped", json!(report.skipped)));
    }
    log_webhook(title, &fields);

    if let Some(ProbeOutcome::NoResponse { kind, detail }) =
        report.unreachable().map(|check| &check.outcome)
    {
        let hints: Vec<(&str, Value)> = std::iter::once(("error", json!(detail)))
            .chain(kind.hints().iter().map(|h| ("hint", json!(h))))
            .collect();
        log_formatted("no response", &hints, LogKind::Error);
        return Err(OpsError::Failed(format!("{} is unreachable", report.target)));
    }

    if report.passed() {
        Ok(())
    } else {
        Err(OpsError::Failed(format!(
            "{} of {} checks failed",
            report.checks.len() - report.passed_count(),
            report.checks.len()
        )))
    }
}

/// One report line: verdict, request, expected and actual status, plus the
/// recorded problem and response body of a failed check.
fn check_line(check: &CheckResult) -> String {
    let passed = check.passed();
    let verdict = if passed { "PASS" } else { "FAIL" };
    let mut line = format!(
        "{verdict} {} expected {} got {}",
        check.request,
        check.expectation,
        check.actual()
    );
    if let Some(problem) = &check.problem {
        let _ = write!(line, " ({problem})");
    }
    let failed_body = check
        .outcome
        .body()
        .map(str::trim)
        .filter(|body| !passed && !body.is_empty());
    if let Some(body) = failed_body {
        let preview: String = body.chars().take(BODY_PREVIEW_CHARS).collect();
        let ellipsis = if body.chars().count() > BODY_PREVIEW_CHARS { "..." } else { "" };
        let _ = write!(line, " body: {preview}{ellipsis}");
    }
    line
}
