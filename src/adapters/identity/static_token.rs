//! Fixed bearer token. For development and tests.

use crate::domain::{DomainError, Identity};
use crate::ports::TokenIssuer;

pub struct StaticTokenIssuer {
    token: String,
}

impl StaticTokenIssuer {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait::async_trait]
impl TokenIssuer for StaticTokenIssuer {
    async fn issue_token(&self, _identity: &Identity) -> Result<String, DomainError> {
        if self.token.is_empty() {
            return Err(DomainError::CredentialFetchFailed(
                "no ID token configured".to_string(),
            ));
        }
        Ok(self.token.clone())
    }
}
