//! Caller-held engagement state for one article.
//!
//! Counts coming back from the backend always overwrite local values; nothing
//! is incremented locally. Detail, comments and engagement fetches for the
//! same article complete in any order, so the displayed comment total is the
//! max of the last authoritative count and the number of comments loaded.

use crate::domain::{
    AddedComment, ArticleDetail, ArticleSummary, Comment, Engagement, FlagToggle, LikeToggle,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ArticleEngagement {
    pub article_id: String,
    pub liked: bool,
    pub likes_count: u64,
    /// Last authoritative comment count (summary hint, engagement fetch, or
    /// add-comment response).
    pub comments_count: u64,
    pub comments: Vec<Comment>,
}

impl ArticleEngagement {
    pub fn new(article_id: impl Into<String>) -> Self {
        Self {
            article_id: article_id.into(),
            liked: false,
            likes_count: 0,
            comments_count: 0,
            comments: Vec::new(),
        }
    }

    /// Seed from the feed's point-in-time hints.
    pub fn from_summary(summary: &ArticleSummary) -> Self {
        Self {
            likes_count: summary.likes_count.unwrap_or(0),
            comments_count: summary.comments_count.unwrap_or(0),
            ..Self::new(summary.id.clone())
        }
    }

    /// Comment total to display.
    pub fn comments_total(&self) -> u64 {
        self.comments_count.max(self.comments.len() as u64)
    }

    pub fn apply_detail(&mut self, detail: &ArticleDetail) {
        if let Some(likes) = detail.likes_count {
            self.likes_count = likes;
        }
    }

    /// Replace the loaded comment list.
    pub fn apply_comments(&mut self, comments: Vec<Comment>) {
        self.comments = comments;
        self.comments_count = self.comments_total();
    }

    pub fn apply_engagement(&mut self, engagement: &Engagement) {
        self.liked = engagement.liked;
        self.likes_count = engagement.likes_count;
        if let Some(total) = engagement.comments_count {
            self.comments_count = total;
        }
    }

    pub fn apply_like_toggle(&mut self, toggle: &LikeToggle) {
        self.liked = toggle.liked;
        self.likes_count = toggle.likes_count;
    }

    /// Returns false when the comment is no longer in the list.
    pub fn apply_comment_like_toggle(&mut self, comment_id: &str, toggle: &LikeToggle) -> bool {
        match self.comment_mut(comment_id) {
            Some(comment) => {
                comment.liked_by_current_user = Some(toggle.liked);
                comment.likes_count = Some(toggle.likes_count);
                true
            }
            None => false,
        }
    }

    /// Only `flagged_by_current_user` is updated; the flag count is not shown.
    pub fn apply_comment_flag_toggle(&mut self, comment_id: &str, toggle: &FlagToggle) -> bool {
        match self.comment_mut(comment_id) {
            Some(comment) => {
                comment.flagged_by_current_user = Some(toggle.flagged);
                true
            }
            None => false,
        }
    }

    /// New comment goes first; the response count becomes authoritative.
    pub fn apply_added_comment(&mut self, added: AddedComment) {
        self.comments.insert(0, added.comment);
        self.comments_count = added.comments_count;
    }

    pub fn comment(&self, comment_id: &str) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == comment_id)
    }

    fn comment_mut(&mut self, comment_id: &str) -> Option<&mut Comment> {
        self.comments.iter_mut().find(|c| c.id == comment_id)
    }
}
