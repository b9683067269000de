//! Unified error handling for the ops commands.

use thiserror::Error;

use crate::components::ComponentError;
use crate::config::ConfigError;
use crate::db::RepositoryError;
use crate::identity::IdentityError;
use crate::webhook::WebhookError;

/// Any failure of an ops command. The CLI exits with code 1 on every variant.
#[derive(Debug, Error)]
pub enum OpsError {
    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Connecting to the database failed.
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Identity provider operation failed.
    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    /// Smoke test could not run.
    #[error("Webhook error: {0}")]
    Webhook(#[from] WebhookError),

    /// Component rendering failed.
    #[error("Render error: {0}")]
    Component(#[from] ComponentError),

    /// Reading an input file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An input file did not parse.
    #[error("Invalid input file: {0}")]
    InputFile(#[from] serde_yaml::Error),

    /// Bad command-line input.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A destructive operation was not confirmed.
    #[error("Refused: {0}")]
    Refused(String),

    /// The command ran but some of its work failed.
    #[error("{0}")]
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_error() {
        let err: OpsError = ConfigError::MissingEnvVar("DATABASE_URL".to_string()).into();
        assert!(matches!(err, OpsError::Config(_)));
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_refused_message() {
        let err = OpsError::Refused("pass --yes to delete documents".to_string());
        assert_eq!(err.to_string(), "Refused: pass --yes to delete documents");
    }
}
