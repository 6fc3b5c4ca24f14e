//! Domain entities. Pure data structures decoded from callable responses.
//!
//! Field names follow the backend's camelCase wire format.

use crate::domain::Timestamp;
use serde::{Deserialize, Serialize};
use url::Url;

/// Stored media reference. At least one of `download_url`/`url` is needed
/// for the asset to contribute an image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaAsset {
    pub download_url: Option<String>,
    pub url: Option<String>,
    pub storage_path: Option<String>,
}

impl MediaAsset {
    /// Preferred URL string: download URL first, then plain URL.
    pub fn preferred_url(&self) -> Option<&str> {
        self.download_url.as_deref().or(self.url.as_deref())
    }
}

/// Published article as listed in the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub id: String,
    pub title: String,
    pub summary: Option<String>,
    pub status: Option<String>,
    pub cover_image: Option<MediaAsset>,
    pub media: Option<Vec<MediaAsset>>,
    pub likes_count: Option<u64>,
    pub comments_count: Option<u64>,
    pub published_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

impl ArticleSummary {
    /// Cover asset URL if it parses, else the first media item exposing a URL.
    pub fn hero_image_url(&self) -> Option<Url> {
        hero_image_url(self.cover_image.as_ref(), self.media.as_deref())
    }
}

/// Full article. Rendered body is `content_html` when non-empty, otherwise
/// `legacy_content`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDetail {
    pub id: String,
    pub title: String,
    pub summary: Option<String>,
    pub status: Option<String>,
    pub content_html: Option<String>,
    pub legacy_content: Option<String>,
    pub cover_image: Option<MediaAsset>,
    pub media: Option<Vec<MediaAsset>>,
    pub likes_count: Option<u64>,
    pub comments_count: Option<u64>,
    pub published_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
    pub created_by: Option<String>,
}

/// Which field the rendered article body came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodySource {
    Html,
    Legacy,
}

impl ArticleDetail {
    /// The single body to render, if any.
    pub fn body(&self) -> Option<(BodySource, &str)> {
        non_empty(&self.content_html)
            .map(|html| (BodySource::Html, html))
            .or_else(|| non_empty(&self.legacy_content).map(|l| (BodySource::Legacy, l)))
    }

    /// Cover URL from the detail payload only (no media fallback).
    pub fn cover_image_url(&self) -> Option<Url> {
        self.cover_image
            .as_ref()
            .and_then(MediaAsset::preferred_url)
            .and_then(|s| Url::parse(s).ok())
    }

    pub fn hero_image_url(&self) -> Option<Url> {
        hero_image_url(self.cover_image.as_ref(), self.media.as_deref())
    }

    /// Feed-level view of this article, for opening without a feed entry.
    pub fn to_summary(&self) -> ArticleSummary {
        ArticleSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            summary: self.summary.clone(),
            status: self.status.clone(),
            cover_image: self.cover_image.clone(),
            media: self.media.clone(),
            likes_count: self.likes_count,
            comments_count: self.comments_count,
            published_at: self.published_at,
            updated_at: self.updated_at,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn hero_image_url(cover: Option<&MediaAsset>, media: Option<&[MediaAsset]>) -> Option<Url> {
    if let Some(url) = cover
        .and_then(MediaAsset::preferred_url)
        .and_then(|s| Url::parse(s).ok())
    {
        return Some(url);
    }
    // Only the first media item with a URL is considered.
    media?
        .iter()
        .find_map(MediaAsset::preferred_url)
        .and_then(|s| Url::parse(s).ok())
}

/// A comment on an article. Only `likes_count`, `liked_by_current_user` and
/// `flagged_by_current_user` change after the initial fetch, and only from
/// toggle responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub uid: Option<String>,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub message: String,
    pub created_at: Option<Timestamp>,
    pub likes_count: Option<u64>,
    pub liked_by_current_user: Option<bool>,
    pub flags_count: Option<u64>,
    pub flagged_by_current_user: Option<bool>,
}

impl Comment {
    pub fn is_liked(&self) -> bool {
        self.liked_by_current_user.unwrap_or(false)
    }

    pub fn is_flagged(&self) -> bool {
        self.flagged_by_current_user.unwrap_or(false)
    }
}

/// The caller's relationship to an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Engagement {
    pub liked: bool,
    pub likes_count: u64,
    pub comments_count: Option<u64>,
}

/// Response of the article and comment like toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggle {
    pub liked: bool,
    pub likes_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagToggle {
    pub flagged: bool,
    pub flags_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddedComment {
    pub comment: Comment,
    pub comments_count: u64,
}

/// Signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

impl Identity {
    pub const FALLBACK_DISPLAY_NAME: &'static str = "Golden Armor fan";

    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            display_name: None,
            photo_url: None,
        }
    }

    /// Name shown next to the comment composer.
    pub fn display_name_or_default(&self) -> &str {
        non_empty(&self.display_name).unwrap_or(Self::FALLBACK_DISPLAY_NAME)
    }
}

/// Compact count for badges: `0` when absent, `12.3k` from ten thousand,
/// `1.2M` from a million.
pub fn format_count(value: Option<u64>) -> String {
    match value {
        None => "0".to_string(),
        Some(v) if v >= 1_000_000 => format!("{:.1}M", v as f64 / 1_000_000.0),
        Some(v) if v >= 10_000 => format!("{:.1}k", v as f64 / 1_000.0),
        Some(v) => v.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn asset(download_url: Option<&str>, url: Option<&str>) -> MediaAsset {
        MediaAsset {
            download_url: download_url.map(String::from),
            url: url.map(String::from),
            storage_path: None,
        }
    }

    fn summary(cover: Option<MediaAsset>, media: Option<Vec<MediaAsset>>) -> ArticleSummary {
        ArticleSummary {
            id: "a1".into(),
            title: "Title".into(),
            summary: None,
            status: None,
            cover_image: cover,
            media,
            likes_count: None,
            comments_count: None,
            published_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_hero_prefers_cover_download_url() {
        let s = summary(
            Some(asset(Some("https://cdn.test/dl.png"), Some("https://cdn.test/plain.png"))),
            Some(vec![asset(Some("https://cdn.test/media.png"), None)]),
        );
        assert_eq!(s.hero_image_url().unwrap().as_str(), "https://cdn.test/dl.png");
    }

    #[test]
    fn test_hero_falls_back_to_cover_url_then_media() {
        let s = summary(Some(asset(None, Some("https://cdn.test/plain.png"))), None);
        assert_eq!(s.hero_image_url().unwrap().as_str(), "https://cdn.test/plain.png");

        let s = summary(
            Some(asset(None, None)),
            Some(vec![
                asset(None, None),
                asset(None, Some("https://cdn.test/second.png")),
            ]),
        );
        assert_eq!(s.hero_image_url().unwrap().as_str(), "https://cdn.test/second.png");
    }

    #[test]
    fn test_hero_absent_without_resolvable_url() {
        assert!(summary(None, None).hero_image_url().is_none());
        assert!(summary(None, Some(vec![asset(None, None)])).hero_image_url().is_none());
        assert!(
            summary(Some(asset(Some("not a url"), None)), None)
                .hero_image_url()
                .is_none()
        );
    }

    #[test]
    fn test_summary_decodes_wire_shape() {
        let s: ArticleSummary = serde_json::from_value(json!({
            "id": "n1",
            "title": "Launch",
            "coverImage": { "downloadUrl": "https://cdn.test/c.png", "storagePath": "news/c.png" },
            "likesCount": 3,
            "publishedAt": { "_seconds": 1700000000, "_nanoseconds": 0 },
            "updatedAt": "1700000100.5"
        }))
        .unwrap();
        assert_eq!(s.likes_count, Some(3));
        assert_eq!(s.comments_count, None);
        assert_eq!(s.published_at.unwrap().seconds(), 1_700_000_000.0);
        assert_eq!(s.updated_at.unwrap().seconds(), 1_700_000_100.5);
    }

    #[test]
    fn test_body_prefers_non_empty_html() {
        let mut detail: ArticleDetail = serde_json::from_value(json!({
            "id": "n1",
            "title": "T",
            "contentHtml": "<p>hi</p>",
            "legacyContent": "old"
        }))
        .unwrap();
        assert_eq!(detail.body(), Some((BodySource::Html, "<p>hi</p>")));

        detail.content_html = Some(String::new());
        assert_eq!(detail.body(), Some((BodySource::Legacy, "old")));

        detail.legacy_content = None;
        assert_eq!(detail.body(), None);
    }

    #[test]
    fn test_comment_flags_default_false() {
        let c: Comment = serde_json::from_value(json!({
            "id": "c1",
            "displayName": "Fan",
            "message": "Nice"
        }))
        .unwrap();
        assert!(!c.is_liked());
        assert!(!c.is_flagged());
    }

    #[test]
    fn test_identity_display_name_fallback() {
        let mut identity = Identity::new("u1");
        assert_eq!(identity.display_name_or_default(), "Golden Armor fan");
        identity.display_name = Some(String::new());
        assert_eq!(identity.display_name_or_default(), "Golden Armor fan");
        identity.display_name = Some("Ada".into());
        assert_eq!(identity.display_name_or_default(), "Ada");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(None), "0");
        assert_eq!(format_count(Some(9_999)), "9999");
        assert_eq!(format_count(Some(12_345)), "12.3k");
        assert_eq!(format_count(Some(1_240_000)), "1.2M");
    }
}
