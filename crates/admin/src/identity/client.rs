//! Identity Toolkit admin client.

use std::future::Future;

use reqwest::{Client, Response};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, error, instrument};

use bookingops_core::{Email, UserRole};

use super::credential::ServiceAccountKey;
use super::error::IdentityError;
use super::token::TokenSource;
use super::types::{
    ApiErrorResponse, IdentityUser, LookupRequest, LookupResponse, UpdateRequest,
};
use crate::config::{IdentityConfig, IdentityEndpoint};

/// Maximum serialized size of a user's custom claims.
pub const MAX_CLAIMS_BYTES: usize = 1000;

/// Operations the role-assignment flow needs from an identity provider.
pub trait IdentityProvider {
    /// Look up a user by exact email.
    fn find_user_by_email(
        &self,
        email: &Email,
    ) -> impl Future<Output = Result<IdentityUser, IdentityError>> + Send;

    /// Set the user's `role` claim, keeping their other claims.
    fn set_role(
        &self,
        user: &IdentityUser,
        role: &UserRole,
    ) -> impl Future<Output = Result<(), IdentityError>> + Send;
}

/// REST client for the Identity Toolkit admin API.
#[derive(Debug)]
pub struct IdentityClient {
    http: Client,
    /// `{base}/v1/projects/{project_id}`
    project_root: String,
    tokens: TokenSource,
}

impl IdentityClient {
    /// Client for the production API using a service-account key.
    #[must_use]
    pub fn with_service_account(key: ServiceAccountKey, api_base: &str) -> Self {
        let http = Client::new();
        let project_root = project_root(api_base, &key.project_id);
        Self {
            tokens: TokenSource::service_account(http.clone(), key),
            http,
            project_root,
        }
    }

    /// Client for a local auth emulator at `host` (`host:port`).
    #[must_use]
    pub fn emulator(host: &str, project_id: &str) -> Self {
        let http = Client::new();
        let base = format!("http://{host}/identitytoolkit.googleapis.com");
        Self {
            tokens: TokenSource::emulator(http.clone()),
            project_root: project_root(&base, project_id),
            http,
        }
    }

    /// Build a client from configuration, loading the key file if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the service-account key cannot be loaded.
    pub async fn from_config(config: &IdentityConfig) -> Result<Self, IdentityError> {
        match &config.endpoint {
            IdentityEndpoint::Emulator { host, project_id } => {
                debug!(%host, "Using identity emulator");
                Ok(Self::emulator(host, project_id))
            }
            IdentityEndpoint::Google {
                credentials_path,
                api_base,
            } => {
                let key = ServiceAccountKey::load(credentials_path).await?;
                debug!(project_id = %key.project_id, "Loaded service-account key");
                Ok(Self::with_service_account(key, api_base))
            }
        }
    }

    /// Look up a user by email.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::UserNotFound` if no user has this email, or a
    /// request/API error.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn lookup_by_email(&self, email: &Email) -> Result<IdentityUser, IdentityError> {
        let request = LookupRequest {
            email: [email.as_str()],
        };
        let response: LookupResponse = self.post("accounts:lookup", &request).await?;

        let info = response
            .users
            .into_iter()
            .next()
            .ok_or_else(|| IdentityError::UserNotFound(email.to_string()))?;

        IdentityUser::try_from(info)
    }

    /// Replace a user's custom claims.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::ClaimsTooLarge` if the claims exceed the
    /// provider's limit, or a request/API error.
    #[instrument(skip(self, claims), fields(uid = %uid))]
    pub async fn set_custom_claims(
        &self,
        uid: &str,
        claims: &Map<String, Value>,
    ) -> Result<(), IdentityError> {
        let encoded = serde_json::to_string(claims)
            .map_err(|e| IdentityError::InvalidClaims(e.to_string()))?;
        if encoded.len() > MAX_CLAIMS_BYTES {
            return Err(IdentityError::ClaimsTooLarge {
                size: encoded.len(),
                limit: MAX_CLAIMS_BYTES,
            });
        }

        let request = UpdateRequest {
            local_id: uid,
            custom_attributes: encoded,
        };
        let _: Value = self.post("accounts:update", &request).await?;

        debug!("Custom claims updated");
        Ok(())
    }

    async fn post<B, T>(&self, method: &str, body: &B) -> Result<T, IdentityError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let token = self.tokens.access_token().await?;

        let response = self
            .http
            .post(format!("{}/{method}", self.project_root))
            .bearer_auth(token.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|e| IdentityError::Request(e.to_string()))?;

        parse_response(method, response).await
    }
}

impl IdentityProvider for IdentityClient {
    async fn find_user_by_email(&self, email: &Email) -> Result<IdentityUser, IdentityError> {
        self.lookup_by_email(email).await
    }

    async fn set_role(&self, user: &IdentityUser, role: &UserRole) -> Result<(), IdentityError> {
        let claims = merge_role(&user.claims, role);
        self.set_custom_claims(&user.uid, &claims).await
    }
}

/// `claims` with `role` replaced.
#[must_use]
pub fn merge_role(claims: &Map<String, Value>, role: &UserRole) -> Map<String, Value> {
    let mut merged = claims.clone();
    merged.insert("role".to_string(), Value::from(role.as_str()));
    merged
}

fn project_root(api_base: &str, project_id: &str) -> String {
    format!(
        "{}/v1/projects/{project_id}",
        api_base.trim_end_matches('/')
    )
}

async fn parse_response<T: DeserializeOwned>(
    method: &str,
    response: Response,
) -> Result<T, IdentityError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorResponse>(&body)
            .map_or(body, |e| e.error.message);
        error!(%method, status = status.as_u16(), %message, "Identity API error");
        return Err(IdentityError::Api {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json()
        .await
        .map_err(|e| IdentityError::Response(e.to_string()))
}
