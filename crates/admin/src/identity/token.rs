//! OAuth2 access tokens for the identity admin API.
//!
//! Service accounts authenticate with the JWT bearer grant: a short-lived
//! RS256 assertion signed with the account's private key is exchanged for an
//! access token at the key's `token_uri`.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use super::credential::ServiceAccountKey;
use super::error::IdentityError;
use super::types::{TokenErrorResponse, TokenResponse};

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const SCOPES: &str =
    "https://www.googleapis.com/auth/identitytoolkit https://www.googleapis.com/auth/cloud-platform";
/// Maximum assertion lifetime accepted by the token endpoint.
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Cached tokens are refreshed this long before they expire.
const EXPIRY_MARGIN_SECS: i64 = 60;
/// The auth emulator accepts this fixed bearer token.
const EMULATOR_TOKEN: &str = "owner";

/// Claims of the signed token assertion.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub(super) struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl AssertionClaims {
    pub(super) fn new(key: &ServiceAccountKey, now: DateTime<Utc>) -> Self {
        let iat = now.timestamp();
        Self {
            iss: key.client_email.clone(),
            scope: SCOPES.to_string(),
            aud: key.token_uri.clone(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        }
    }
}

struct CachedToken {
    token: SecretString,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_MARGIN_SECS) < self.expires_at
    }
}

enum Credentials {
    ServiceAccount(Box<ServiceAccountKey>),
    Emulator,
}

/// Source of bearer tokens for identity API calls.
pub struct TokenSource {
    http: Client,
    credentials: Credentials,
    cached: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.credentials {
            Credentials::ServiceAccount(_) => "service_account",
            Credentials::Emulator => "emulator",
        };
        f.debug_struct("TokenSource")
            .field("credentials", &kind)
            .finish_non_exhaustive()
    }
}

impl TokenSource {
    /// Tokens minted from a service-account key.
    #[must_use]
    pub fn service_account(http: Client, key: ServiceAccountKey) -> Self {
        Self {
            http,
            credentials: Credentials::ServiceAccount(Box::new(key)),
            cached: Mutex::new(None),
        }
    }

    /// The fixed token accepted by the local auth emulator.
    #[must_use]
    pub fn emulator(http: Client) -> Self {
        Self {
            http,
            credentials: Credentials::Emulator,
            cached: Mutex::new(None),
        }
    }

    /// Returns a valid access token, minting a new one when the cached
    /// token is missing or about to expire.
    ///
    /// # Errors
    ///
    /// Returns an error if signing the assertion or the token exchange fails.
    pub async fn access_token(&self) -> Result<SecretString, IdentityError> {
        let key = match &self.credentials {
            Credentials::Emulator => return Ok(SecretString::from(EMULATOR_TOKEN)),
            Credentials::ServiceAccount(key) => key,
        };

        let mut cached = self.cached.lock().await;
        let now = Utc::now();
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(now)) {
            return Ok(token.token.clone());
        }

        let fresh = self.exchange(key, now).await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }

    #[instrument(skip_all, fields(issuer = %key.client_email))]
    async fn exchange(
        &self,
        key: &ServiceAccountKey,
        now: DateTime<Utc>,
    ) -> Result<CachedToken, IdentityError> {
        let assertion = sign_assertion(key, now)?;

        let response = self
            .http
            .post(&key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| IdentityError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<TokenErrorResponse>(&body).map_or(body, |e| {
                e.error_description
                    .map_or_else(|| e.error.clone(), |d| format!("{}: {d}", e.error))
            });
            return Err(IdentityError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| IdentityError::Response(e.to_string()))?;

        debug!(expires_in = token.expires_in, "Access token minted");

        Ok(CachedToken {
            token: SecretString::from(token.access_token),
            expires_at: token_expiry(now, token.expires_in)?,
        })
    }
}

/// Absolute expiry of a token minted at `now` with lifetime `expires_in`.
fn token_expiry(now: DateTime<Utc>, expires_in: i64) -> Result<DateTime<Utc>, IdentityError> {
    Duration::try_seconds(expires_in)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| IdentityError::Response(format!("expires_in out of range: {expires_in}")))
}

/// Sign the JWT bearer assertion for `key`.
fn sign_assertion(key: &ServiceAccountKey, now: DateTime<Utc>) -> Result<String, IdentityError> {
    let claims = AssertionClaims::new(key, now);

    let mut header = Header::new(Algorithm::RS256);
    header.kid.clone_from(&key.private_key_id);

    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.expose_secret().as_bytes())?;
    Ok(jsonwebtoken::encode(&header, &claims, &encoding_key)?)
}
