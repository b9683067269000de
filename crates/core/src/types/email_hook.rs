//! Payloads and responses of the email-hook API.
//!
//! The API itself lives in the booking application. These types describe
//! the request it accepts and the validation it applies, so the smoke tests
//! can predict the status each request should get.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::email::Email;

/// Reasons the email-hook API rejects a payload with `400 Bad Request`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadViolation {
    /// `subject` is absent or blank.
    #[error("subject is required")]
    MissingSubject,
    /// `from` is absent or not an email address.
    #[error("from must be a valid email address (got {0:?})")]
    InvalidFrom(String),
}

/// Inbound email-reply event posted to `POST /api/email-hook`.
///
/// Fields are kept loose (`from` is a plain string, `subject` optional) so
/// that deliberately invalid payloads can be built for negative checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailHookPayload {
    #[serde(default)]
    pub from: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_sent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl EmailHookPayload {
    /// A payload with only the required fields.
    #[must_use]
    pub fn new(from: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            subject: Some(subject.into()),
            ..Self::default()
        }
    }

    /// Attach the reply text and mark the reply as sent.
    #[must_use]
    pub fn with_reply(mut self, text: impl Into<String>) -> Self {
        self.reply_text = Some(text.into());
        self.reply_sent = Some(true);
        self
    }

    /// Set the event timestamp.
    #[must_use]
    pub const fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Validation failures the API reports for this payload, in the order
    /// it checks them. Empty means the payload is accepted.
    #[must_use]
    pub fn violations(&self) -> Vec<PayloadViolation> {
        let mut violations = Vec::new();

        if self
            .subject
            .as_deref()
            .is_none_or(|subject| subject.trim().is_empty())
        {
            violations.push(PayloadViolation::MissingSubject);
        }

        if !Email::is_valid(&self.from) {
            violations.push(PayloadViolation::InvalidFrom(self.from.clone()));
        }

        violations
    }

    /// Returns `true` if the API accepts this payload.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations().is_empty()
    }
}

/// A stored email-hook event as returned by `GET /api/email-hook/logs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailHookLogEntry {
    pub from: Option<String>,
    pub subject: Option<String>,
    pub reply_text: Option<String>,
    pub reply_sent: Option<bool>,
    pub timestamp: Option<String>,
}

/// Body of `GET /api/email-hook/logs`: either a bare array or `{ "logs": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EmailHookLogs {
    List(Vec<EmailHookLogEntry>),
    Wrapped { logs: Vec<EmailHookLogEntry> },
}

impl EmailHookLogs {
    /// The log entries regardless of envelope.
    #[must_use]
    pub fn into_entries(self) -> Vec<EmailHookLogEntry> {
        match self {
            Self::List(entries) | Self::Wrapped { logs: entries } => entries,
        }
    }
}

/// Body of `GET /api/email-hook/stats`.
///
/// Only the counters the tooling prints are typed; everything else the
/// service reports is kept in `other`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailHookStats {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default, alias = "replied")]
    pub replies_sent: Option<u64>,
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_payload_has_no_violations() {
        let payload = EmailHookPayload::new("customer@example.com", "Re: Your booking")
            .with_reply("Thanks, see you Tuesday!");
        assert!(payload.is_valid());
    }

    #[test]
    fn test_missing_subject() {
        let payload = EmailHookPayload {
            from: "customer@example.com".to_owned(),
            ..EmailHookPayload::default()
        };
        assert_eq!(payload.violations(), vec![PayloadViolation::MissingSubject]);

        let blank = EmailHookPayload::new("customer@example.com", "   ");
        assert_eq!(blank.violations(), vec![PayloadViolation::MissingSubject]);
    }

    #[test]
    fn test_malformed_from() {
        let payload = EmailHookPayload::new("not-an-email", "Re: Booking");
        assert_eq!(
            payload.violations(),
            vec![PayloadViolation::InvalidFrom("not-an-email".to_owned())]
        );
    }

    #[test]
    fn test_serializes_camel_case_without_nulls() {
        let payload = EmailHookPayload::new("a@b.co", "Hi").with_reply("Hello");
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["replyText"], "Hello");
        assert_eq!(json["replySent"], true);
        assert!(json.get("timestamp").is_none());

        let minimal = serde_json::to_value(EmailHookPayload::default()).unwrap();
        assert!(minimal.get("subject").is_none());
    }

    #[test]
    fn test_logs_envelopes() {
        let bare: EmailHookLogs =
            serde_json::from_str(r#"[{"from":"a@b.co","subject":"Hi"}]"#).unwrap();
        assert_eq!(bare.into_entries().len(), 1);

        let wrapped: EmailHookLogs =
            serde_json::from_str(r#"{"logs":[{"subject":"Hi","replySent":false}]}"#).unwrap();
        let entries = wrapped.into_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].reply_sent, Some(false));
    }

    #[test]
    fn test_stats_keeps_unknown_fields() {
        let stats: EmailHookStats =
            serde_json::from_str(r#"{"total":4,"replied":3,"lastEventAt":"2026-01-01"}"#).unwrap();
        assert_eq!(stats.total, Some(4));
        assert_eq!(stats.replies_sent, Some(3));
        assert!(stats.other.contains_key("lastEventAt"));
    }
}
