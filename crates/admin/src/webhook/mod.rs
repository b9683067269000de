//! Webhook smoke tests.
//!
//! Manual integration checks against two HTTP endpoints:
//! - the booking automation webhook ([`run_booking_check`])
//! - the email-hook API of the booking application ([`run_email_hook_suite`])
//!
//! Each request is classified as either a response (with its status) or no
//! response at all, and compared with the expected outcome. Nothing is retried.

mod booking;
mod email_hook;
mod probe;
mod report;

use thiserror::Error;

pub use booking::run_booking_check;
pub use email_hook::{EmailHookCase, email_hook_cases, run_email_hook_suite};
pub use probe::{NoResponseKind, ProbeOutcome, WebhookProbe};
pub use report::{CheckResult, Expectation, SmokeReport};

/// Errors that prevent a smoke test from running at all.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}
