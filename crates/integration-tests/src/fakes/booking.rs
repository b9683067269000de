//! Fake booking automation webhook.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;

/// Records received bookings and answers with a fixed status.
#[derive(Debug, Clone)]
pub struct FakeBookingWebhook {
    received: Arc<Mutex<Vec<Value>>>,
    status: StatusCode,
    delay: Duration,
}

impl FakeBookingWebhook {
    #[must_use]
    pub fn responding(status: StatusCode) -> Self {
        Self {
            received: Arc::default(),
            status,
            delay: Duration::ZERO,
        }
    }

    /// Wait `delay` before answering.
    #[must_use]
    pub const fn slow(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Bodies received so far.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn received(&self) -> Vec<Value> {
        self.received.lock().expect("received lock").clone()
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/webhook/booking", post(receive))
            .with_state(self.clone())
    }
}

async fn receive(State(fake): State<FakeBookingWebhook>, Json(body): Json<Value>) -> StatusCode {
    if !fake.delay.is_zero() {
        tokio::time::sleep(fake.delay).await;
    }
    fake.received.lock().expect("received lock").push(body);
    fake.status
}
