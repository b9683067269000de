//! Core types for booking operations.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod booking;
pub mod collection;
pub mod communication;
pub mod email;
pub mod email_hook;
pub mod role;

pub use booking::BookingPayload;
pub use collection::{CollectionName, CollectionNameError, FieldName};
pub use communication::CommunicationChannel;
pub use email::{Email, EmailError};
pub use email_hook::{
    EmailHookLogEntry, EmailHookLogs, EmailHookPayload, EmailHookStats, PayloadViolation,
};
pub use role::{RoleError, UserRole};
