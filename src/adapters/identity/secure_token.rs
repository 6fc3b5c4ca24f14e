//! Refresh-token exchange against a secure-token endpoint.
//!
//! POSTs `grant_type=refresh_token` and caches the returned ID token until
//! shortly before it expires. Rotated refresh tokens replace the stored one.

use crate::domain::{DomainError, Identity};
use crate::ports::TokenIssuer;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub const DEFAULT_SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com/v1/token";

/// Tokens this close to expiry are refreshed.
const EXPIRY_MARGIN_SECS: i64 = 300;

/// Used when the endpoint omits or garbles `expires_in`.
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

pub struct SecureTokenIssuer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    state: Mutex<TokenState>,
}

struct TokenState {
    refresh_token: String,
    cached: Option<CachedToken>,
}

struct CachedToken {
    uid: String,
    id_token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: Option<String>,
    expires_in: Option<String>,
    user_id: Option<String>,
}

#[derive(Deserialize)]
struct RefreshError {
    error: RefreshErrorBody,
}

#[derive(Deserialize)]
struct RefreshErrorBody {
    message: String,
}

impl SecureTokenIssuer {
    /// Create an issuer.
    ///
    /// # Arguments
    /// * `endpoint` - Token endpoint (e.g. "https://securetoken.googleapis.com/v1/token")
    /// * `api_key` - Project web API key, sent as `?key=`
    /// * `refresh_token` - Long-lived refresh token of the signed-in user
    pub fn new(endpoint: String, api_key: String, refresh_token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
            state: Mutex::new(TokenState {
                refresh_token,
                cached: None,
            }),
        }
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, DomainError> {
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await
            .map_err(|e| DomainError::CredentialFetchFailed(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            DomainError::CredentialFetchFailed(format!("Failed to read token response: {}", e))
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<RefreshError>(&text)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| text.chars().take(200).collect());
            warn!(status = %status, message = %message, "token refresh rejected");
            return Err(DomainError::CredentialFetchFailed(format!(
                "token endpoint error {}: {}",
                status, message
            )));
        }

        serde_json::from_str(&text).map_err(|e| {
            DomainError::CredentialFetchFailed(format!("Failed to parse token response: {}", e))
        })
    }
}

fn expires_at(now: DateTime<Utc>, expires_in: Option<&str>) -> DateTime<Utc> {
    let secs = expires_in
        .and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(DEFAULT_EXPIRES_IN_SECS);
    now + Duration::seconds(secs)
}

#[async_trait::async_trait]
impl TokenIssuer for SecureTokenIssuer {
    async fn issue_token(&self, identity: &Identity) -> Result<String, DomainError> {
        // Held across the refresh so concurrent callers share one exchange.
        let mut state = self.state.lock().await;
        let now = Utc::now();

        if let Some(cached) = &state.cached {
            if cached.uid == identity.uid
                && cached.expires_at - Duration::seconds(EXPIRY_MARGIN_SECS) > now
            {
                debug!(uid = %identity.uid, "using cached ID token");
                return Ok(cached.id_token.clone());
            }
        }

        let refreshed = self.refresh(&state.refresh_token).await?;
        if let Some(user_id) = refreshed.user_id.as_deref() {
            if user_id != identity.uid {
                warn!(expected = %identity.uid, actual = %user_id, "token issued for a different user");
                return Err(DomainError::CredentialFetchFailed(format!(
                    "token issued for a different user: expected {}, got {}",
                    identity.uid, user_id
                )));
            }
        }
        if let Some(rotated) = refreshed.refresh_token {
            state.refresh_token = rotated;
        }

        let expires_at = expires_at(now, refreshed.expires_in.as_deref());
        info!(uid = %identity.uid, expires_at = %expires_at, "refreshed ID token");
        state.cached = Some(CachedToken {
            uid: identity.uid.clone(),
            id_token: refreshed.id_token.clone(),
            expires_at,
        });
        Ok(refreshed.id_token)
    }
}
