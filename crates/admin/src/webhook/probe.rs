//! HTTP probe with outcome classification.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use tracing::{debug, instrument};

use super::WebhookError;

/// Why no response was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoResponseKind {
    /// The request exceeded the probe timeout.
    Timeout,
    /// The connection could not be established.
    Connect,
    /// Any other transport failure.
    Transport,
}

impl NoResponseKind {
    /// Troubleshooting hints printed alongside the failure.
    #[must_use]
    pub const fn hints(self) -> &'static [&'static str] {
        match self {
            Self::Timeout => &[
                "The endpoint accepted the connection but did not answer in time",
                "Check the receiving service's logs for slow or stuck handlers",
                "Raise WEBHOOK_TIMEOUT_SECS if the endpoint is known to be slow",
            ],
            Self::Connect => &[
                "Make sure the target service is running and reachable",
                "Check the host, port and scheme of the configured URL",
                "Local API: start the booking application before running the checks",
            ],
            Self::Transport => &[
                "Check network connectivity and TLS configuration",
                "Verify the configured URL is correct",
            ],
        }
    }
}

/// Result of one probe request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The server answered, with any status.
    Responded { status: u16, body: String },
    /// No response was received.
    NoResponse { kind: NoResponseKind, detail: String },
}

impl ProbeOutcome {
    /// The response status, if there was a response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Responded { status, .. } => Some(*status),
            Self::NoResponse { .. } => None,
        }
    }

    /// The response body, if there was a response.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Responded { body, .. } => Some(body),
            Self::NoResponse { .. } => None,
        }
    }

    /// Returns `true` for a 2xx response.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status().is_some_and(|s| (200..300).contains(&s))
    }

    fn from_error(err: &reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            NoResponseKind::Timeout
        } else if err.is_connect() {
            NoResponseKind::Connect
        } else {
            NoResponseKind::Transport
        };
        Self::NoResponse {
            kind,
            detail: err.to_string(),
        }
    }
}

/// HTTP client for smoke checks with a fixed per-request timeout.
#[derive(Debug, Clone)]
pub struct WebhookProbe {
    client: Client,
}

impl WebhookProbe {
    /// Create a probe whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::Client` if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, WebhookError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WebhookError::Client(e.to_string()))?;
        Ok(Self { client })
    }

    /// POST `body` as JSON to `url`.
    #[instrument(skip(self, body))]
    pub async fn post_json<T: Serialize + Sync>(&self, url: &str, body: &T) -> ProbeOutcome {
        Self::send(self.client.post(url).json(body)).await
    }

    /// GET `url`.
    #[instrument(skip(self))]
    pub async fn get(&self, url: &str) -> ProbeOutcome {
        Self::send(self.client.get(url)).await
    }

    async fn send(request: RequestBuilder) -> ProbeOutcome {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return ProbeOutcome::from_error(&e),
        };

        let status = response.status().as_u16();
        match response.text().await {
            Ok(body) => {
                debug!(status, bytes = body.len(), "Probe response");
                ProbeOutcome::Responded { status, body }
            }
            // Status arrived but the body did not; keep the status.
            Err(e) => {
                debug!(status, error = %e, "Probe response body unreadable");
                ProbeOutcome::Responded {
                    status,
                    body: String::new(),
                }
            }
        }
    }
}
