//! Identity-provider errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when talking to the identity provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The service-account key file could not be read.
    #[error("Failed to read credential file {path}: {source}")]
    CredentialRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The service-account key file is not a valid key.
    #[error("Invalid credential file: {0}")]
    CredentialParse(String),

    /// Signing the token assertion failed.
    #[error("Failed to sign token assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    /// HTTP request failed.
    #[error("Identity request failed: {0}")]
    Request(String),

    /// Failed to parse response.
    #[error("Identity response error: {0}")]
    Response(String),

    /// The API returned an error status.
    #[error("Identity API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// No user exists with the given email.
    #[error("No identity user with email {0}")]
    UserNotFound(String),

    /// Stored custom claims are not a JSON object.
    #[error("Invalid custom claims: {0}")]
    InvalidClaims(String),

    /// Serialized custom claims exceed the provider's size limit.
    #[error("Custom claims are {size} bytes (limit {limit})")]
    ClaimsTooLarge { size: usize, limit: usize },
}
