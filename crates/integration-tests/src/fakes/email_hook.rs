//! Fake email-hook API enforcing the payload contract.

use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use bookingops_core::EmailHookPayload;
use serde::Deserialize;
use serde_json::{Value, json};

/// Stored events.
#[derive(Debug, Clone, Default)]
pub struct FakeEmailHook {
    events: Arc<Mutex<Vec<EmailHookPayload>>>,
    /// Accept every payload instead of validating.
    lax: bool,
}

impl FakeEmailHook {
    /// A fake that accepts anything with `201`, ignoring the contract.
    #[must_use]
    pub fn lax() -> Self {
        Self {
            lax: true,
            ..Self::default()
        }
    }

    /// Number of stored events.
    ///
    /// # Panics
    ///
    /// Panics if the events lock is poisoned.
    #[must_use]
    pub fn stored(&self) -> usize {
        self.events.lock().expect("events lock").len()
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/email-hook", post(receive))
            .route("/api/email-hook/logs", get(logs))
            .route("/api/email-hook/stats", get(stats))
            .with_state(self.clone())
    }
}

async fn receive(
    State(fake): State<FakeEmailHook>,
    Json(payload): Json<EmailHookPayload>,
) -> (StatusCode, Json<Value>) {
    if !fake.lax {
        if let Some(first) = payload.violations().first() {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": first.to_string() })),
            );
        }
    }

    fake.events.lock().expect("events lock").push(payload);
    (StatusCode::CREATED, Json(json!({ "success": true })))
}

#[derive(Deserialize)]
struct LogsQuery {
    limit: Option<usize>,
}

async fn logs(State(fake): State<FakeEmailHook>, Query(query): Query<LogsQuery>) -> Json<Value> {
    let limit = query.limit.unwrap_or(50);
    let events = fake.events.lock().expect("events lock");
    let recent: Vec<EmailHookPayload> = events.iter().rev().take(limit).cloned().collect();
    drop(events);
    Json(json!({ "logs": recent }))
}

async fn stats(State(fake): State<FakeEmailHook>) -> Json<Value> {
    let events = fake.events.lock().expect("events lock");
    let total = events.len();
    let replied = events.iter().filter(|e| e.reply_sent == Some(true)).count();
    drop(events);
    Json(json!({ "total": total, "repliesSent": replied, "lastHour": total }))
}
