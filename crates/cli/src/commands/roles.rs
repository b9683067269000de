//! Role claim commands.
//!
//! # Environment Variables
//!
//! - `GOOGLE_APPLICATION_CREDENTIALS` - service-account key file
//! - `IDENTITY_API_BASE` - admin API base URL (optional)
//! - `FIREBASE_AUTH_EMULATOR_HOST` - use a local auth emulator instead
//! - `IDENTITY_PROJECT_ID` - project id when using the emulator

use std::path::Path;

use bookingops_admin::OpsError;
use bookingops_admin::config::IdentityConfig;
use bookingops_admin::console::{LogKind, log_formatted};
use bookingops_admin::identity::{
    AssignmentOutcome, IdentityClient, RoleAssignment, assign_roles, parse_assignments_yaml,
};
use serde_json::{Value, json};

/// Printed after every run.
const REAUTH_CAVEAT: &str =
    "Claims take effect only after each user signs out and back in (or their ID token refreshes).";

/// Apply `assignments` plus any listed in `file`.
pub async fn assign(
    mut assignments: Vec<RoleAssignment>,
    file: Option<&Path>,
) -> Result<(), OpsError> {
    if let Some(path) = file {
        let yaml = tokio::fs::read_to_string(path).await?;
        assignments.extend(parse_assignments_yaml(&yaml)?);
    }
    if assignments.is_empty() {
        return Err(OpsError::InvalidArgument(
            "no assignments given; use --assign EMAIL=ROLE or --file".to_string(),
        ));
    }

    let config = IdentityConfig::from_env()?;
    let client = IdentityClient::from_config(&config).await?;

    tracing::info!(count = assignments.len(), "Assigning roles...");
    let report = assign_roles(&client, &assignments).await;

    let lines: Vec<(String, Value)> = report
        .results
        .iter()
        .map(|r| {
            let status = match &r.outcome {
                AssignmentOutcome::Assigned { uid } => format!("{} (uid {uid})", r.assignment.role),
                AssignmentOutcome::Failed { error } => format!("FAILED: {error}"),
            };
            (r.assignment.email.to_string(), json!(status))
        })
        .collect();

    let mut fields: Vec<(&str, Value)> = lines.iter().map(|(k, v)| (k.as_str(), v.clone())).collect();
    fields.push(("succeeded", json!(report.succeeded())));
    fields.push(("failed", json!(report.failed())));
    fields.push(("note", json!(REAUTH_CAVEAT)));

    let kind = if report.is_complete() {
        LogKind::Success
    } else {
        LogKind::Warning
    };
    log_formatted("role assignment", &fields, kind);

    if report.is_complete() {
        Ok(())
    } else {
        Err(OpsError::Failed(format!(
            "{} of {} role assignments failed",
            report.failed(),
            report.results.len()
        )))
    }
}
