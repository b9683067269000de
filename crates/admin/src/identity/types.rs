//! Identity Toolkit REST types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::IdentityError;

/// A user record in the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityUser {
    /// Opaque user identifier (`localId`).
    pub uid: String,
    /// Email address as stored by the provider.
    pub email: Option<String>,
    /// Current custom claims.
    pub claims: Map<String, Value>,
}

impl IdentityUser {
    /// The `role` claim, if set to a string.
    #[must_use]
    pub fn role(&self) -> Option<&str> {
        self.claims.get("role").and_then(Value::as_str)
    }
}

// =============================================================================
// Wire Types
// =============================================================================

/// `accounts:lookup` request.
#[derive(Debug, Serialize)]
pub(super) struct LookupRequest<'a> {
    pub email: [&'a str; 1],
}

/// `accounts:lookup` response. `users` is omitted when nothing matches.
#[derive(Debug, Deserialize)]
pub(super) struct LookupResponse {
    #[serde(default)]
    pub users: Vec<UserInfo>,
}

/// User entry in a lookup response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UserInfo {
    pub local_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub custom_attributes: Option<String>,
}

impl TryFrom<UserInfo> for IdentityUser {
    type Error = IdentityError;

    fn try_from(info: UserInfo) -> Result<Self, Self::Error> {
        let claims = match info.custom_attributes.as_deref().map(str::trim) {
            None | Some("") => Map::new(),
            Some(raw) => match serde_json::from_str::<Value>(raw) {
                Ok(Value::Object(map)) => map,
                Ok(other) => {
                    return Err(IdentityError::InvalidClaims(format!(
                        "expected an object, got {other}"
                    )));
                }
                Err(e) => return Err(IdentityError::InvalidClaims(e.to_string())),
            },
        };

        Ok(Self {
            uid: info.local_id,
            email: info.email,
            claims,
        })
    }
}

/// `accounts:update` request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UpdateRequest<'a> {
    pub local_id: &'a str,
    /// Claims as a JSON-encoded string.
    pub custom_attributes: String,
}

/// OAuth2 token endpoint response.
#[derive(Debug, Deserialize)]
pub(super) struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
}

const fn default_expires_in() -> i64 {
    3600
}

/// Error envelope returned by Google APIs.
#[derive(Debug, Deserialize)]
pub(super) struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
}

/// OAuth2 token endpoint error.
#[derive(Debug, Deserialize)]
pub(super) struct TokenErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}
