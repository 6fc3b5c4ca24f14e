//! Application configuration. Functions host, timeouts, credentials.

use crate::adapters::callable::{DEFAULT_COMMENTS_LIMIT, DEFAULT_TIMEOUT};
use crate::adapters::identity::DEFAULT_SECURE_TOKEN_URL;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://us-central1-goldenarmorstudios.cloudfunctions.net";

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Callable functions host. Read from ARMOR_NEWS_BASE_URL.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds (default 20). Read from ARMOR_NEWS_REQUEST_TIMEOUT_SECS.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Comments fetched per article (default 100). Read from ARMOR_NEWS_COMMENTS_LIMIT.
    #[serde(default)]
    pub comments_limit: Option<u32>,

    // ─────────────────────────────────────────────────────────────────────────
    // Identity
    // ─────────────────────────────────────────────────────────────────────────
    /// Signed-in user id. Read from ARMOR_NEWS_UID.
    #[serde(default)]
    pub uid: Option<String>,

    /// Display name shown when posting. Read from ARMOR_NEWS_DISPLAY_NAME.
    #[serde(default)]
    pub display_name: Option<String>,

    /// Fixed bearer token. Read from ARMOR_NEWS_ID_TOKEN.
    #[serde(default)]
    pub id_token: Option<String>,

    /// Web API key for the token endpoint. Read from ARMOR_NEWS_API_KEY.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Refresh token exchanged for ID tokens. Read from ARMOR_NEWS_REFRESH_TOKEN.
    #[serde(default)]
    pub refresh_token: Option<String>,

    /// Token endpoint. Read from ARMOR_NEWS_SECURE_TOKEN_URL.
    #[serde(default)]
    pub secure_token_url: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("ARMOR_NEWS"));
        if let Ok(path) = std::env::var("ARMOR_NEWS_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c.build()?.try_deserialize()
    }

    pub fn base_url_or_default(&self) -> String {
        self.base_url
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Returns the request timeout. Zero is treated as unset.
    pub fn request_timeout_or_default(&self) -> Duration {
        self.request_timeout_secs
            .filter(|s| *s > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    pub fn comments_limit_or_default(&self) -> u32 {
        self.comments_limit
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_COMMENTS_LIMIT)
    }

    pub fn secure_token_url_or_default(&self) -> String {
        self.secure_token_url
            .clone()
            .unwrap_or_else(|| DEFAULT_SECURE_TOKEN_URL.to_string())
    }

    /// Returns true if refresh-token exchange is configured.
    pub fn has_refresh_credentials(&self) -> bool {
        self.uid.is_some() && self.api_key.is_some() && self.refresh_token.is_some()
    }

    /// Returns true if a fixed ID token is configured.
    pub fn has_static_token(&self) -> bool {
        self.uid.is_some() && self.id_token.is_some()
    }
}
