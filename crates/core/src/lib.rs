//! Booking Ops Core - Shared types library.
//!
//! This crate provides common types used across the booking operations tooling:
//! - `admin` - Database maintenance, identity roles, webhook probes, admin-panel cells
//! - `cli` - The `bo-cli` operator binary
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Validated newtypes for emails, roles, collection names, and the
//!   payload shapes exchanged with the booking webhook and email-hook API

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
