//! Batch role assignment.
//!
//! Every assignment is attempted; one failing user never stops the rest.
//! The report keeps one tagged outcome per input so callers can tell exactly
//! which identities were updated.

use std::str::FromStr;

use serde::Deserialize;
use tracing::{info, warn};

use bookingops_core::{Email, UserRole};

use super::client::IdentityProvider;
use super::error::IdentityError;

/// A requested `(email, role)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoleAssignment {
    pub email: Email,
    pub role: UserRole,
}

impl RoleAssignment {
    #[must_use]
    pub const fn new(email: Email, role: UserRole) -> Self {
        Self { email, role }
    }
}

impl FromStr for RoleAssignment {
    type Err = String;

    /// Parse `email=role`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (email, role) = s
            .split_once('=')
            .ok_or_else(|| format!("expected EMAIL=ROLE, got {s:?}"))?;

        let email = Email::parse(email.trim()).map_err(|e| format!("{email:?}: {e}"))?;
        let role = UserRole::parse(role).map_err(|e| e.to_string())?;
        Ok(Self { email, role })
    }
}

/// Assignment file layout: either a bare list or `{ assignments: [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum AssignmentFile {
    List(Vec<RoleAssignment>),
    Wrapped { assignments: Vec<RoleAssignment> },
}

/// Parse role assignments from YAML.
///
/// ```yaml
/// - email: owner@example.com
///   role: admin
/// - email: tech@example.com
///   role: staff
/// ```
///
/// # Errors
///
/// Returns an error if the YAML is malformed or contains an invalid email
/// or role.
pub fn parse_assignments_yaml(yaml: &str) -> Result<Vec<RoleAssignment>, serde_yaml::Error> {
    let file: AssignmentFile = serde_yaml::from_str(yaml)?;
    Ok(match file {
        AssignmentFile::List(list) | AssignmentFile::Wrapped { assignments: list } => list,
    })
}

/// Outcome of one assignment.
#[derive(Debug)]
pub enum AssignmentOutcome {
    /// The role claim was written for user `uid`.
    Assigned { uid: String },
    /// Lookup or update failed.
    Failed { error: IdentityError },
}

impl AssignmentOutcome {
    #[must_use]
    pub const fn is_assigned(&self) -> bool {
        matches!(self, Self::Assigned { .. })
    }
}

/// An assignment paired with its outcome.
#[derive(Debug)]
pub struct AssignmentResult {
    pub assignment: RoleAssignment,
    pub outcome: AssignmentOutcome,
}

/// Per-item results of a batch run, in input order.
#[derive(Debug, Default)]
pub struct AssignmentReport {
    pub results: Vec<AssignmentResult>,
}

impl AssignmentReport {
    /// Number of assignments written.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.outcome.is_assigned())
            .count()
    }

    /// Number of assignments that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    /// The failed assignments and their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&RoleAssignment, &IdentityError)> {
        self.results.iter().filter_map(|r| match &r.outcome {
            AssignmentOutcome::Failed { error } => Some((&r.assignment, error)),
            AssignmentOutcome::Assigned { .. } => None,
        })
    }

    /// Returns `true` if every assignment succeeded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed() == 0
    }
}

/// Attach each assignment's role to its user, continuing past failures.
pub async fn assign_roles<P: IdentityProvider>(
    provider: &P,
    assignments: &[RoleAssignment],
) -> AssignmentReport {
    let mut report = AssignmentReport {
        results: Vec::with_capacity(assignments.len()),
    };

    for assignment in assignments {
        let outcome = match assign_one(provider, assignment).await {
            Ok(uid) => {
                info!(email = %assignment.email, role = %assignment.role, %uid, "Role assigned");
                AssignmentOutcome::Assigned { uid }
            }
            Err(error) => {
                warn!(email = %assignment.email, role = %assignment.role, %error, "Role assignment failed");
                AssignmentOutcome::Failed { error }
            }
        };

        report.results.push(AssignmentResult {
            assignment: assignment.clone(),
            outcome,
        });
    }

    report
}

async fn assign_one<P: IdentityProvider>(
    provider: &P,
    assignment: &RoleAssignment,
) -> Result<String, IdentityError> {
    let user = provider.find_user_by_email(&assignment.email).await?;
    provider.set_role(&user, &assignment.role).await?;
    Ok(user.uid)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use serde_json::Map;

    use super::*;
    use crate::identity::IdentityUser;

    /// In-memory provider keyed by email.
    #[derive(Default)]
    struct FakeProvider {
        users: HashMap<String, String>,
        roles: Mutex<HashMap<String, String>>,
        fail_updates_for: Option<String>,
    }

    impl FakeProvider {
        fn with_users(emails: &[&str]) -> Self {
            Self {
                users: emails
                    .iter()
                    .enumerate()
                    .map(|(i, e)| ((*e).to_string(), format!("uid-{i}")))
                    .collect(),
                ..Self::default()
            }
        }
    }

    impl IdentityProvider for FakeProvider {
        async fn find_user_by_email(&self, email: &Email) -> Result<IdentityUser, IdentityError> {
            self.users
                .get(email.as_str())
                .map(|uid| IdentityUser {
                    uid: uid.clone(),
                    email: Some(email.to_string()),
                    claims: Map::new(),
                })
                .ok_or_else(|| IdentityError::UserNotFound(email.to_string()))
        }

        async fn set_role(&self, user: &IdentityUser, role: &UserRole) -> Result<(), IdentityError> {
            if self.fail_updates_for.as_deref() == Some(user.uid.as_str()) {
                return Err(IdentityError::Api {
                    status: 500,
                    message: "backend unavailable".to_string(),
                });
            }
            self.roles
                .lock()
                .unwrap()
                .insert(user.uid.clone(), role.to_string());
            Ok(())
        }
    }

    fn assignment(s: &str) -> RoleAssignment {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_assignment_arg() {
        let a = assignment("owner@example.com=admin");
        assert_eq!(a.email.as_str(), "owner@example.com");
        assert_eq!(a.role, UserRole::Admin);

        assert!("owner@example.com".parse::<RoleAssignment>().is_err());
        assert!("nope=admin".parse::<RoleAssignment>().is_err());
        assert!("owner@example.com=".parse::<RoleAssignment>().is_err());
    }

    #[test]
    fn test_parse_yaml_list_and_wrapped() {
        let list = parse_assignments_yaml(
            "- email: owner@example.com\n  role: admin\n- email: tech@example.com\n  role: staff\n",
        )
        .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].role, UserRole::Staff);

        let wrapped = parse_assignments_yaml(
            "assignments:\n  - email: buyer@example.com\n    role: customer\n",
        )
        .unwrap();
        assert_eq!(wrapped.len(), 1);

        assert!(parse_assignments_yaml("- email: bad\n  role: admin\n").is_err());
    }

    #[tokio::test]
    async fn test_assign_roles_continues_after_missing_user() {
        let provider = FakeProvider::with_users(&["owner@example.com", "tech@example.com"]);
        let assignments = vec![
            assignment("owner@example.com=admin"),
            assignment("ghost@example.com=customer"),
            assignment("tech@example.com=staff"),
        ];

        let report = assign_roles(&provider, &assignments).await;

        assert_eq!(report.results.len(), 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_complete());

        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0.email.as_str(), "ghost@example.com");
        assert!(matches!(failures[0].1, IdentityError::UserNotFound(_)));

        let roles = provider.roles.lock().unwrap();
        assert_eq!(roles.get("uid-0").map(String::as_str), Some("admin"));
        assert_eq!(roles.get("uid-1").map(String::as_str), Some("staff"));
    }

    #[tokio::test]
    async fn test_assign_roles_reports_update_failure() {
        let mut provider = FakeProvider::with_users(&["owner@example.com"]);
        provider.fail_updates_for = Some("uid-0".to_string());

        let report = assign_roles(&provider, &[assignment("owner@example.com=admin")]).await;

        assert_eq!(report.failed(), 1);
        assert!(matches!(
            report.results[0].outcome,
            AssignmentOutcome::Failed {
                error: IdentityError::Api { status: 500, .. }
            }
        ));
    }

    #[tokio::test]
    async fn test_assign_roles_empty_batch() {
        let provider = FakeProvider::default();
        let report = assign_roles(&provider, &[]).await;
        assert!(report.is_complete());
        assert_eq!(report.succeeded(), 0);
    }

    #[test]
    fn test_outcome_is_assigned() {
        assert!(
            AssignmentOutcome::Assigned {
                uid: "u".to_string()
            }
            .is_assigned()
        );
    }
}
