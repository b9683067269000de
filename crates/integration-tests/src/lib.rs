//! Integration tests for the booking ops tooling.
//!
//! # Running Tests
//!
//! ```bash
//! # Fake-service tests (no external dependencies)
//! cargo test -p bookingops-integration-tests
//!
//! # Include live-database tests
//! DATABASE_URL=postgres://... cargo test -p bookingops-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `identity_roles` - role assignment against a fake auth emulator
//! - `webhook_smoke` - smoke suites against fake booking and email-hook services
//! - `admin_components` - resource list rendering
//! - `db_maintenance` - collection repository against a live `PostgreSQL` (ignored)

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

pub mod fakes;

/// Serve `router` on an ephemeral loopback port and return its address.
///
/// The server runs until the test's runtime shuts down.
///
/// # Panics
///
/// Panics if the listener cannot be bound.
pub async fn spawn(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    addr
}

/// An address nothing listens on.
///
/// # Panics
///
/// Panics if a probe listener cannot be bound.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind probe listener");
    let addr = listener.local_addr().expect("Listener has no address");
    drop(listener);
    addr
}
