//! Domain models for admin tooling.

pub mod category;

pub use category::Category;
