//! Booking application operations library.
//!
//! Everything the `bo-cli` binary does lives here so it can be tested
//! without a process boundary:
//!
//! - [`db`]: inspect and clear document collections
//! - [`identity`]: attach role claims to identity-provider users
//! - [`webhook`]: smoke-test the booking webhook and the email-hook API
//! - [`console`]: framed console blocks for operator output
//! - [`components`]: admin-panel cell components
//!
//! # Security
//!
//! This crate holds HIGH PRIVILEGE access:
//! - database credentials with delete rights
//! - an identity-provider service account that can rewrite user claims
//!
//! Only run it from trusted operator machines.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod components;
pub mod config;
pub mod console;
pub mod db;
pub mod error;
pub mod identity;
pub mod models;
pub mod webhook;

pub use error::OpsError;
