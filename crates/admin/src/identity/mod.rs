//! Identity-provider integration for role claims.
//!
//! This module provides:
//! - [`ServiceAccountKey`] for loading the admin API credential
//! - [`TokenSource`] for minting OAuth2 access tokens from that credential
//! - [`IdentityClient`], the REST client implementing [`IdentityProvider`]
//! - [`assign_roles`] for attaching `role` claims to a batch of users
//!
//! # Flow
//!
//! 1. The key file named by `GOOGLE_APPLICATION_CREDENTIALS` is loaded
//! 2. A signed JWT assertion is exchanged for an access token
//! 3. Each email is looked up with `accounts:lookup`
//! 4. The user's custom claims are rewritten with the new `role`
//! 5. Clients see the claim after their next sign-in
//!
//! Against the local auth emulator steps 1 and 2 are skipped.

mod assign;
mod client;
mod credential;
mod error;
mod token;
mod types;

pub use assign::{
    AssignmentOutcome, AssignmentReport, AssignmentResult, RoleAssignment, assign_roles,
    parse_assignments_yaml,
};
pub use client::{IdentityClient, IdentityProvider};
pub use credential::ServiceAccountKey;
pub use error::IdentityError;
pub use token::TokenSource;
pub use types::IdentityUser;
