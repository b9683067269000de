//! Role assignment against a fake auth emulator.
//!
//! The emulator path uses the fixed `owner` token, so no service-account key
//! is needed.

use bookingops_admin::identity::{
    AssignmentOutcome, IdentityClient, IdentityError, IdentityProvider, RoleAssignment,
    assign_roles,
};
use bookingops_core::{Email, UserRole};
use bookingops_integration_tests::fakes::identity::FakeIdentity;
use bookingops_integration_tests::spawn;
use serde_json::json;

const PROJECT: &str = "demo-bookings";

async fn emulator_with_users() -> (FakeIdentity, IdentityClient) {
    let fake = FakeIdentity::default();
    fake.add_user("uid-owner", "owner@example.com", Some(json!({ "branch": "north" })));
    fake.add_user("uid-tech", "tech@example.com", None);

    let addr = spawn(fake.router()).await;
    let client = IdentityClient::emulator(&addr.to_string(), PROJECT);
    (fake, client)
}

fn assignment(s: &str) -> RoleAssignment {
    s.parse().expect("valid assignment")
}

// ============================================================================
// Lookup
// ============================================================================

#[tokio::test]
async fn test_lookup_existing_user() {
    let (_fake, client) = emulator_with_users().await;

    let email = Email::parse("owner@example.com").expect("valid email");
    let user = client.find_user_by_email(&email).await.expect("user exists");

    assert_eq!(user.uid, "uid-owner");
    assert_eq!(user.claims.get("branch"), Some(&json!("north")));
    assert_eq!(user.role(), None);
}

#[tokio::test]
async fn test_lookup_missing_user() {
    let (_fake, client) = emulator_with_users().await;

    let email = Email::parse("ghost@example.com").expect("valid email");
    let result = client.find_user_by_email(&email).await;

    assert!(matches!(result, Err(IdentityError::UserNotFound(_))));
}

// ============================================================================
// Batch Assignment
// ============================================================================

#[tokio::test]
async fn test_assign_roles_merges_claims_and_continues() {
    let (fake, client) = emulator_with_users().await;

    let assignments = vec![
        assignment("owner@example.com=admin"),
        assignment("ghost@example.com=customer"),
        assignment("tech@example.com=staff"),
    ];
    let report = assign_roles(&client, &assignments).await;

    assert_eq!(report.results.len(), 3);
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 1);
    assert!(matches!(
        report.results[1].outcome,
        AssignmentOutcome::Failed {
            error: IdentityError::UserNotFound(_)
        }
    ));

    assert_eq!(
        fake.claims("uid-owner"),
        Some(json!({ "branch": "north", "role": "admin" }))
    );
    assert_eq!(fake.claims("uid-tech"), Some(json!({ "role": "staff" })));
}

#[tokio::test]
async fn test_set_role_replaces_previous_role() {
    let (fake, client) = emulator_with_users().await;

    let email = Email::parse("tech@example.com").expect("valid email");
    let user = client.find_user_by_email(&email).await.expect("user exists");
    client
        .set_role(&user, &UserRole::Customer)
        .await
        .expect("first update");

    let user = client.find_user_by_email(&email).await.expect("user exists");
    assert_eq!(user.role(), Some("customer"));
    client
        .set_role(&user, &UserRole::Admin)
        .await
        .expect("second update");

    assert_eq!(fake.claims("uid-tech"), Some(json!({ "role": "admin" })));
}
