//! Authenticated request executor for callable functions.
//!
//! Every call is a `POST <base_url>/<function>` with body `{"data": payload}`.
//! Authenticated calls resolve the current identity first and fail with
//! `AuthenticationRequired` before any I/O when nobody is signed in.
//! No retries: callers own retry policy.

use crate::adapters::callable::envelope;
use crate::domain::DomainError;
use crate::ports::IdentityPort;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Undecoded response. The body is never empty.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

pub struct CallableExecutor {
    client: reqwest::Client,
    base_url: String,
    identity: Arc<dyn IdentityPort>,
}

impl CallableExecutor {
    /// Create an executor.
    ///
    /// # Arguments
    /// * `base_url` - Functions host (e.g. "https://us-central1-project.cloudfunctions.net")
    /// * `identity` - Source of the signed-in identity and its bearer tokens
    /// * `timeout` - Per-request timeout
    pub fn new(
        base_url: impl Into<String>,
        identity: Arc<dyn IdentityPort>,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            identity,
        })
    }

    /// Full URL of a callable function.
    pub fn endpoint(&self, function: &str) -> String {
        format!("{}/{}", self.base_url, function)
    }

    /// Invoke `function` and return the raw response body.
    pub async fn call(
        &self,
        function: &str,
        payload: Value,
        requires_auth: bool,
    ) -> Result<RawResponse, DomainError> {
        let token = if requires_auth {
            let identity = self
                .identity
                .current_identity()
                .ok_or(DomainError::AuthenticationRequired)?;
            Some(self.identity.fetch_id_token(&identity).await?)
        } else {
            None
        };

        info!(function, requires_auth, "invoking callable function");

        let body = serde_json::json!({ "data": payload });
        let mut request = self
            .client
            .post(self.endpoint(function))
            .header("Content-Type", "application/json")
            .json(&body);
        if let Some(token) = token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| DomainError::Network(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| DomainError::Network(format!("Failed to read response body: {}", e)))?;

        if bytes.is_empty() {
            warn!(function, status = %status, "callable returned empty body");
            return Err(DomainError::EmptyResponse);
        }
        if !status.is_success() {
            warn!(
                function,
                status = %status,
                body = %String::from_utf8_lossy(&bytes).chars().take(200).collect::<String>(),
                "callable returned error status"
            );
        }
        debug!(function, status = %status, body_len = bytes.len(), "callable responded");

        Ok(RawResponse {
            status: status.as_u16(),
            body: bytes.to_vec(),
        })
    }

    /// Invoke `function` and decode the envelope into `T`.
    pub async fn call_decoded<T: DeserializeOwned>(
        &self,
        function: &str,
        payload: Value,
        requires_auth: bool,
    ) -> Result<T, DomainError> {
        let raw = self.call(function, payload, requires_auth).await?;
        envelope::decode_response(&raw.body).inspect_err(|e| {
            warn!(function, status = raw.status, error = %e, "callable response rejected");
        })
    }
}
