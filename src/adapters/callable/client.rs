//! Typed news client. Implements `NewsPort` over the callable executor.

use crate::adapters::callable::CallableExecutor;
use crate::domain::{
    AddedComment, ArticleDetail, ArticleSummary, Comment, DomainError, Engagement, FlagToggle,
    LikeToggle,
};
use crate::ports::NewsPort;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

/// Callable function names.
pub mod functions {
    pub const LIST_PUBLISHED_NEWS: &str = "listPublishedNews";
    pub const GET_PUBLISHED_NEWS_ARTICLE: &str = "getPublishedNewsArticle";
    pub const GET_PUBLISHED_NEWS_COMMENTS: &str = "getPublishedNewsComments";
    pub const TOGGLE_NEWS_LIKE: &str = "toggleNewsLike";
    pub const TOGGLE_NEWS_COMMENT_LIKE: &str = "toggleNewsCommentLike";
    pub const TOGGLE_NEWS_COMMENT_FLAG: &str = "toggleNewsCommentFlag";
    pub const ADD_NEWS_COMMENT: &str = "addNewsComment";
    pub const GET_NEWS_ENGAGEMENT: &str = "getNewsEngagement";
}

/// Comments requested per article.
pub const DEFAULT_COMMENTS_LIMIT: u32 = 100;

// Read payloads arrive wrapped (`{"articles": [..]}`); the bare form is
// accepted too.
#[derive(Deserialize)]
#[serde(untagged)]
enum ArticlesPayload {
    Wrapped { articles: Vec<ArticleSummary> },
    Bare(Vec<ArticleSummary>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ArticlePayload {
    Wrapped { article: ArticleDetail },
    Bare(ArticleDetail),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CommentsPayload {
    Wrapped { comments: Vec<Comment> },
    Bare(Vec<Comment>),
}

pub struct CallableNewsClient {
    executor: CallableExecutor,
    comments_limit: u32,
}

impl CallableNewsClient {
    pub fn new(executor: CallableExecutor) -> Self {
        Self {
            executor,
            comments_limit: DEFAULT_COMMENTS_LIMIT,
        }
    }

    pub fn with_comments_limit(mut self, limit: u32) -> Self {
        self.comments_limit = limit;
        self
    }
}

fn require_id<'a>(field: &str, value: &'a str) -> Result<&'a str, DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::InvalidRequest(format!("{} must not be empty", field)));
    }
    Ok(value)
}

#[async_trait::async_trait]
impl NewsPort for CallableNewsClient {
    async fn list_published(&self) -> Result<Vec<ArticleSummary>, DomainError> {
        let payload: ArticlesPayload = self
            .executor
            .call_decoded(functions::LIST_PUBLISHED_NEWS, json!({}), false)
            .await?;
        let articles = match payload {
            ArticlesPayload::Wrapped { articles } | ArticlesPayload::Bare(articles) => articles,
        };
        info!(count = articles.len(), "fetched published news");
        Ok(articles)
    }

    async fn article_detail(&self, article_id: &str) -> Result<ArticleDetail, DomainError> {
        let id = require_id("id", article_id)?;
        let payload: ArticlePayload = self
            .executor
            .call_decoded(functions::GET_PUBLISHED_NEWS_ARTICLE, json!({ "id": id }), false)
            .await?;
        Ok(match payload {
            ArticlePayload::Wrapped { article } | ArticlePayload::Bare(article) => article,
        })
    }

    async fn comments(&self, article_id: &str) -> Result<Vec<Comment>, DomainError> {
        let id = require_id("id", article_id)?;
        let payload: CommentsPayload = self
            .executor
            .call_decoded(
                functions::GET_PUBLISHED_NEWS_COMMENTS,
                json!({ "id": id, "limit": self.comments_limit }),
                false,
            )
            .await?;
        let comments = match payload {
            CommentsPayload::Wrapped { comments } | CommentsPayload::Bare(comments) => comments,
        };
        info!(article_id = id, count = comments.len(), "fetched comments");
        Ok(comments)
    }

    async fn toggle_like(&self, news_id: &str) -> Result<LikeToggle, DomainError> {
        let news_id = require_id("newsId", news_id)?;
        self.executor
            .call_decoded(functions::TOGGLE_NEWS_LIKE, json!({ "newsId": news_id }), true)
            .await
    }

    async fn toggle_comment_like(
        &self,
        news_id: &str,
        comment_id: &str,
    ) -> Result<LikeToggle, DomainError> {
        let news_id = require_id("newsId", news_id)?;
        let comment_id = require_id("commentId", comment_id)?;
        self.executor
            .call_decoded(
                functions::TOGGLE_NEWS_COMMENT_LIKE,
                json!({ "newsId": news_id, "commentId": comment_id }),
                true,
            )
            .await
    }

    async fn toggle_comment_flag(
        &self,
        news_id: &str,
        comment_id: &str,
    ) -> Result<FlagToggle, DomainError> {
        let news_id = require_id("newsId", news_id)?;
        let comment_id = require_id("commentId", comment_id)?;
        self.executor
            .call_decoded(
                functions::TOGGLE_NEWS_COMMENT_FLAG,
                json!({ "newsId": news_id, "commentId": comment_id }),
                true,
            )
            .await
    }

    async fn add_comment(
        &self,
        news_id: &str,
        message: &str,
    ) -> Result<AddedComment, DomainError> {
        let news_id = require_id("newsId", news_id)?;
        let message = message.trim();
        if message.is_empty() {
            return Err(DomainError::InvalidRequest(
                "comment message must not be empty".to_string(),
            ));
        }
        let added: AddedComment = self
            .executor
            .call_decoded(
                functions::ADD_NEWS_COMMENT,
                json!({ "newsId": news_id, "message": message }),
                true,
            )
            .await?;
        info!(
            news_id,
            comment_id = %added.comment.id,
            comments_count = added.comments_count,
            "comment posted"
        );
        Ok(added)
    }

    async fn engagement(&self, article_id: &str) -> Result<Engagement, DomainError> {
        let id = require_id("id", article_id)?;
        self.executor
            .call_decoded(functions::GET_NEWS_ENGAGEMENT, json!({ "id": id }), true)
            .await
    }
}
