//! In-process fakes of the external services.

pub mod booking;
pub mod email_hook;
pub mod identity;
