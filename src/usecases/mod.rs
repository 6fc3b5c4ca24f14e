//! Application use cases. Orchestrate domain logic via ports.

pub mod article_service;

pub use article_service::{ArticleService, ArticleView};
