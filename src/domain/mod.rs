//! Core domain layer. No external I/O dependencies.
//!
//! Entities, the wire timestamp codec and the engagement merge rules live
//! here. Dependencies flow inward.

pub mod engagement;
pub mod entities;
pub mod errors;
pub mod timestamp;

pub use engagement::ArticleEngagement;
pub use entities::{
    AddedComment, ArticleDetail, ArticleSummary, BodySource, Comment, Engagement, FlagToggle,
    Identity, LikeToggle, MediaAsset, format_count,
};
pub use errors::DomainError;
pub use timestamp::Timestamp;
