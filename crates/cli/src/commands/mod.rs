//! Command implementations.

pub mod db;
pub mod roles;
pub mod webhook;
