//! Collection (table) names.
//!
//! Collection names end up interpolated into SQL, so they are restricted to
//! plain identifiers and always emitted quoted.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`CollectionName`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectionNameError {
    /// The name is empty.
    #[error("collection name cannot be empty")]
    Empty,
    /// The name exceeds the `PostgreSQL` identifier limit.
    #[error("collection name must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The name is not a plain identifier.
    #[error("collection name {0:?} must match [A-Za-z_][A-Za-z0-9_]*")]
    InvalidIdentifier(String),
}

/// A validated collection name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CollectionName(String);

/// A column (document field) name, validated with the same identifier rules
/// as [`CollectionName`].
pub type FieldName = CollectionName;

impl CollectionName {
    /// `PostgreSQL` identifier length limit (`NAMEDATALEN - 1`).
    pub const MAX_LENGTH: usize = 63;

    /// Product categories (`name`, optional `description`).
    pub const CATEGORIES: &'static str = "categories";
    /// Device brands.
    pub const BRANDS: &'static str = "brands";
    /// Application users (`email`).
    pub const USERS: &'static str = "users";
    /// Service bookings.
    pub const BOOKINGS: &'static str = "bookings";

    /// Parse a collection name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, too long, or not a plain
    /// identifier.
    pub fn parse(s: &str) -> Result<Self, CollectionNameError> {
        if s.is_empty() {
            return Err(CollectionNameError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(CollectionNameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        let mut chars = s.chars();
        let starts_ok = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

        if !(starts_ok && rest_ok) {
            return Err(CollectionNameError::InvalidIdentifier(s.to_owned()));
        }

        Ok(Self(s.to_owned()))
    }

    /// Parse a comma-separated list, skipping blank entries.
    ///
    /// # Errors
    ///
    /// Returns the first invalid entry's error.
    pub fn parse_list(s: &str) -> Result<Vec<Self>, CollectionNameError> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(Self::parse)
            .collect()
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the name as a quoted SQL identifier.
    #[must_use]
    pub fn quoted(&self) -> String {
        // Identifier rules exclude '"', so no escaping is needed.
        format!("\"{}\"", self.0)
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CollectionName {
    type Err = CollectionNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CollectionName {
    type Error = CollectionNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CollectionName> for String {
    fn from(name: CollectionName) -> Self {
        name.0
    }
}

impl AsRef<str> for CollectionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(CollectionName::parse("categories").is_ok());
        assert!(CollectionName::parse("email_hook_logs").is_ok());
        assert!(CollectionName::parse("_private").is_ok());
        assert!(CollectionName::parse("Bookings2025").is_ok());
    }

    #[test]
    fn test_field_name_quoting() {
        let field = FieldName::parse("customerEmail").unwrap();
        assert_eq!(field.quoted(), "\"customerEmail\"");
        assert!(FieldName::parse("email = email OR 1").is_err());
    }

    #[test]
    fn test_parse_rejects_injection() {
        assert!(matches!(
            CollectionName::parse("users; DROP TABLE users"),
            Err(CollectionNameError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            CollectionName::parse("a\"b"),
            Err(CollectionNameError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            CollectionName::parse("1abc"),
            Err(CollectionNameError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_parse_empty_and_long() {
        assert_eq!(CollectionName::parse(""), Err(CollectionNameError::Empty));
        assert!(matches!(
            CollectionName::parse(&"a".repeat(64)),
            Err(CollectionNameError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_list() {
        let names = CollectionName::parse_list(" categories, brands ,,").unwrap();
        let names: Vec<&str> = names.iter().map(CollectionName::as_str).collect();
        assert_eq!(names, vec!["categories", "brands"]);

        assert!(CollectionName::parse_list("categories,bad name").is_err());
    }

    #[test]
    fn test_quoted() {
        let name = CollectionName::parse("bookings").unwrap();
        assert_eq!(name.quoted(), "\"bookings\"");
    }
}
