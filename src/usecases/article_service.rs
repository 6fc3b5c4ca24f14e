//! Article view: load detail, comments and engagement, then merge toggle
//! results into the caller-held state.
//!
//! - Detail, comments and engagement are fetched concurrently and may finish
//!   in any order
//! - Engagement is only requested for a signed-in caller
//! - Comments/engagement failures leave the view usable; detail failure is
//!   returned

use crate::domain::{ArticleDetail, ArticleEngagement, ArticleSummary, DomainError};
use crate::ports::{IdentityPort, NewsPort};
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

/// Everything a detail screen renders for one article.
#[derive(Debug, Clone)]
pub struct ArticleView {
    pub summary: ArticleSummary,
    pub detail: ArticleDetail,
    pub state: ArticleEngagement,
}

impl ArticleView {
    /// Detail cover when it resolves, else the summary hero image.
    pub fn hero_image_url(&self) -> Option<Url> {
        self.detail
            .cover_image_url()
            .or_else(|| self.summary.hero_image_url())
    }
}

pub struct ArticleService {
    news: Arc<dyn NewsPort>,
    identity: Arc<dyn IdentityPort>,
}

impl ArticleService {
    pub fn new(news: Arc<dyn NewsPort>, identity: Arc<dyn IdentityPort>) -> Self {
        Self { news, identity }
    }

    pub async fn list(&self) -> Result<Vec<ArticleSummary>, DomainError> {
        self.news.list_published().await
    }

    /// Open an article from its feed summary.
    pub async fn open(&self, summary: &ArticleSummary) -> Result<ArticleView, DomainError> {
        self.load(&summary.id, Some(summary)).await
    }

    /// Open by id alone. The summary and seed counts come from the detail.
    pub async fn open_by_id(&self, article_id: &str) -> Result<ArticleView, DomainError> {
        self.load(article_id, None).await
    }

    async fn load(
        &self,
        article_id: &str,
        summary: Option<&ArticleSummary>,
    ) -> Result<ArticleView, DomainError> {
        let signed_in = self.identity.current_identity().is_some();

        let engagement = async {
            if signed_in {
                Some(self.news.engagement(article_id).await)
            } else {
                None
            }
        };
        let (detail, comments, engagement) = tokio::join!(
            self.news.article_detail(article_id),
            self.news.comments(article_id),
            engagement
        );

        let detail = detail?;
        let summary = summary.cloned().unwrap_or_else(|| detail.to_summary());
        let mut state = ArticleEngagement::from_summary(&summary);
        state.apply_detail(&detail);

        match comments {
            Ok(comments) => state.apply_comments(comments),
            Err(e) => warn!(article_id, error = %e, "failed to load comments"),
        }
        match engagement {
            Some(Ok(engagement)) => state.apply_engagement(&engagement),
            Some(Err(e)) => warn!(article_id, error = %e, "failed to load engagement"),
            None => {}
        }

        info!(
            article_id,
            likes = state.likes_count,
            comments = state.comments_total(),
            "article opened"
        );

        Ok(ArticleView {
            summary,
            detail,
            state,
        })
    }

    pub async fn toggle_like(&self, state: &mut ArticleEngagement) -> Result<(), DomainError> {
        let toggle = self.news.toggle_like(&state.article_id).await?;
        state.apply_like_toggle(&toggle);
        Ok(())
    }

    pub async fn toggle_comment_like(
        &self,
        state: &mut ArticleEngagement,
        comment_id: &str,
    ) -> Result<(), DomainError> {
        let toggle = self
            .news
            .toggle_comment_like(&state.article_id, comment_id)
            .await?;
        if !state.apply_comment_like_toggle(comment_id, &toggle) {
            warn!(article_id = %state.article_id, comment_id, "liked comment no longer loaded");
        }
        Ok(())
    }

    pub async fn toggle_comment_flag(
        &self,
        state: &mut ArticleEngagement,
        comment_id: &str,
    ) -> Result<(), DomainError> {
        let toggle = self
            .news
            .toggle_comment_flag(&state.article_id, comment_id)
            .await?;
        if !state.apply_comment_flag_toggle(comment_id, &toggle) {
            warn!(article_id = %state.article_id, comment_id, "flagged comment no longer loaded");
        }
        Ok(())
    }

    pub async fn add_comment(
        &self,
        state: &mut ArticleEngagement,
        message: &str,
    ) -> Result<(), DomainError> {
        let added = self.news.add_comment(&state.article_id, message).await?;
        state.apply_added_comment(added);
        Ok(())
    }
}
