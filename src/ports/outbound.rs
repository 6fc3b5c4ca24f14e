//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{
    AddedComment, ArticleDetail, ArticleSummary, Comment, DomainError, Engagement, FlagToggle,
    Identity, LikeToggle,
};

/// News backend. One method per callable function.
///
/// Read operations are public; mutations and engagement require a signed-in
/// identity and fail with `DomainError::AuthenticationRequired` otherwise.
#[async_trait::async_trait]
pub trait NewsPort: Send + Sync {
    /// Fetch all published articles.
    async fn list_published(&self) -> Result<Vec<ArticleSummary>, DomainError>;

    async fn article_detail(&self, article_id: &str) -> Result<ArticleDetail, DomainError>;

    /// Fetch the most recent comments for an article (server caps the count).
    async fn comments(&self, article_id: &str) -> Result<Vec<Comment>, DomainError>;

    async fn toggle_like(&self, news_id: &str) -> Result<LikeToggle, DomainError>;

    async fn toggle_comment_like(
        &self,
        news_id: &str,
        comment_id: &str,
    ) -> Result<LikeToggle, DomainError>;

    async fn toggle_comment_flag(
        &self,
        news_id: &str,
        comment_id: &str,
    ) -> Result<FlagToggle, DomainError>;

    /// Post a comment. The message is trimmed; empty messages are rejected
    /// with `DomainError::InvalidRequest` before any I/O.
    async fn add_comment(
        &self,
        news_id: &str,
        message: &str,
    ) -> Result<AddedComment, DomainError>;

    /// The signed-in caller's relationship to an article.
    async fn engagement(&self, article_id: &str) -> Result<Engagement, DomainError>;
}

/// Identity provider. Read-only from the client's point of view.
#[async_trait::async_trait]
pub trait IdentityPort: Send + Sync {
    /// Currently signed-in identity, if any.
    fn current_identity(&self) -> Option<Identity>;

    /// Fresh bearer token for `identity`. Failures are returned as
    /// `DomainError::CredentialFetchFailed`.
    async fn fetch_id_token(&self, identity: &Identity) -> Result<String, DomainError>;
}

/// Issues ID tokens for a signed-in identity (static token, refresh-token
/// exchange, ...).
#[async_trait::async_trait]
pub trait TokenIssuer: Send + Sync {
    async fn issue_token(&self, identity: &Identity) -> Result<String, DomainError>;
}
