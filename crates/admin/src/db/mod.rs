//! Database access for maintenance and inspection commands.
//!
//! # Model
//!
//! The booking application's collections are tables in the connection's
//! current schema. Each row is treated as a document and rendered as a JSON
//! object with `row_to_json`.
//!
//! ## Collections touched by the tooling
//!
//! - `categories` - `name`, optional `description`
//! - `brands` - counted and cleared only
//! - `users` - looked up by `email`
//! - `bookings` - sampled only
//!
//! Commands open one pool, run a handful of queries in sequence, and close
//! the pool before exiting.

pub mod collections;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use url::Url;

pub use collections::{ClearOutcome, CollectionCount, CollectionRepository};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// The named collection does not exist.
    #[error("collection not found: {0}")]
    CollectionNotFound(String),
}

/// Errors that can occur when resolving a connection URL.
#[derive(Debug, Error)]
pub enum DatabaseUrlError {
    /// The URL does not parse.
    #[error("invalid database URL: {0}")]
    Parse(#[from] url::ParseError),

    /// The URL cannot carry a path (e.g. `mailto:`-style URLs).
    #[error("database URL cannot carry a database name")]
    CannotBeABase,
}

/// Apply a separately configured database name to a connection URL.
///
/// The name becomes the URL path only when the URL does not already name a
/// database. Credentials, host, port and query parameters are preserved.
///
/// # Errors
///
/// Returns `DatabaseUrlError` if the URL does not parse or cannot carry a path.
pub fn resolve_database_url(
    database_url: &str,
    database_name: Option<&str>,
) -> Result<String, DatabaseUrlError> {
    let Some(name) = database_name.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(database_url.to_string());
    };

    let mut url = Url::parse(database_url)?;
    if url.cannot_be_a_base() {
        return Err(DatabaseUrlError::CannotBeABase);
    }

    let has_database = !url.path().trim_matches('/').is_empty();
    if has_database {
        return Ok(database_url.to_string());
    }

    url.set_path(&format!("/{name}"));
    Ok(url.to_string())
}

/// Create a `PostgreSQL` connection pool for a one-shot command.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(2)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
