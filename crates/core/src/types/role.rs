//! User role attached to identity-provider accounts as a custom claim.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`UserRole`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RoleError {
    /// The role string is empty or only whitespace.
    #[error("role cannot be empty")]
    Empty,
    /// The role contains characters outside `[a-z0-9_-]`.
    #[error("role {0:?} may only contain lowercase letters, digits, '_' and '-'")]
    InvalidCharacters(String),
}

/// Role claim for a user of the booking application.
///
/// The set is open: the client applications understand `admin`, `customer`
/// and `staff`, but any other lowercase identifier is carried through as
/// [`UserRole::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum UserRole {
    /// Full access to the admin panel.
    Admin,
    /// Booking customer.
    Customer,
    /// Service staff handling bookings.
    Staff,
    /// Any other role understood by a client application.
    Other(String),
}

impl UserRole {
    /// Parse a role name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or contains characters other
    /// than lowercase ASCII letters, digits, `_` or `-`.
    pub fn parse(s: &str) -> Result<Self, RoleError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(RoleError::Empty);
        }

        match trimmed {
            "admin" => Ok(Self::Admin),
            "customer" => Ok(Self::Customer),
            "staff" => Ok(Self::Staff),
            other => {
                let valid = other
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-');
                if valid {
                    Ok(Self::Other(other.to_owned()))
                } else {
                    Err(RoleError::InvalidCharacters(other.to_owned()))
                }
            }
        }
    }

    /// Returns the claim value for this role.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::Customer => "customer",
            Self::Staff => "staff",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for UserRole {
    type Error = RoleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_owned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_roles() {
        assert_eq!(UserRole::parse("admin").unwrap(), UserRole::Admin);
        assert_eq!(UserRole::parse("customer").unwrap(), UserRole::Customer);
        assert_eq!(UserRole::parse(" staff ").unwrap(), UserRole::Staff);
    }

    #[test]
    fn test_parse_open_set() {
        let role = UserRole::parse("technician").unwrap();
        assert_eq!(role, UserRole::Other("technician".to_owned()));
        assert_eq!(role.as_str(), "technician");
    }

    #[test]
    fn test_parse_rejects_empty_and_invalid() {
        assert_eq!(UserRole::parse("  "), Err(RoleError::Empty));
        assert!(matches!(
            UserRole::parse("Super Admin"),
            Err(RoleError::InvalidCharacters(_))
        ));
    }

    #[test]
    fn test_serde_as_plain_string() {
        let json = serde_json::to_string(&UserRole::Staff).unwrap();
        assert_eq!(json, "\"staff\"");

        let role: UserRole = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, UserRole::Admin);
    }
}
