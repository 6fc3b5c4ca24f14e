//! Wiring & DI. Entry point: bootstrap identity and the callable client,
//! then render the feed or one article as plain text.
//!
//! Usage: `armor-news` lists published articles; `armor-news <article-id>`
//! opens one with its comments.

use anyhow::Context;
use armor_news::adapters::callable::{CallableExecutor, CallableNewsClient};
use armor_news::adapters::identity::{AuthSession, SecureTokenIssuer, StaticTokenIssuer};
use armor_news::domain::{ArticleSummary, BodySource, Identity, format_count};
use armor_news::ports::{IdentityPort, NewsPort, TokenIssuer};
use armor_news::shared::AppConfig;
use armor_news::usecases::{ArticleService, ArticleView};
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = AppConfig::load().context("failed to load configuration")?;
    let session = Arc::new(build_session(&cfg));
    let _listener = session.subscribe(|identity| match identity {
        Some(identity) => info!(
            uid = %identity.uid,
            name = identity.display_name_or_default(),
            "posting as signed-in user"
        ),
        None => info!("not signed in; likes, flags and comments are unavailable"),
    });

    let identity: Arc<dyn IdentityPort> = session.clone();
    let executor = CallableExecutor::new(
        cfg.base_url_or_default(),
        Arc::clone(&identity),
        cfg.request_timeout_or_default(),
    )?;
    let news: Arc<dyn NewsPort> = Arc::new(
        CallableNewsClient::new(executor).with_comments_limit(cfg.comments_limit_or_default()),
    );
    let service = ArticleService::new(news, identity);

    match std::env::args().nth(1) {
        Some(article_id) => {
            let view = service.open_by_id(&article_id).await?;
            print_article(&view);
        }
        None => {
            let articles = service.list().await?;
            print_feed(&articles);
        }
    }

    session.teardown();
    Ok(())
}

fn build_session(cfg: &AppConfig) -> AuthSession {
    let issuer: Arc<dyn TokenIssuer> = if cfg.has_refresh_credentials() {
        Arc::new(SecureTokenIssuer::new(
            cfg.secure_token_url_or_default(),
            cfg.api_key.clone().unwrap_or_default(),
            cfg.refresh_token.clone().unwrap_or_default(),
        ))
    } else {
        Arc::new(StaticTokenIssuer::new(
            cfg.id_token.clone().unwrap_or_default(),
        ))
    };

    match cfg.uid.as_ref() {
        Some(uid) if cfg.has_refresh_credentials() || cfg.has_static_token() => {
            let identity = Identity {
                uid: uid.clone(),
                display_name: cfg.display_name.clone(),
                photo_url: None,
            };
            AuthSession::signed_in(identity, issuer)
        }
        _ => AuthSession::new(issuer),
    }
}

fn published_label(article: &ArticleSummary) -> String {
    article
        .published_at
        .filter(|ts| !ts.is_epoch())
        .and_then(|ts| ts.to_datetime())
        .map(|dt| format!("Published {}", dt.format("%b %e, %Y %H:%M")))
        .unwrap_or_default()
}

fn print_feed(articles: &[ArticleSummary]) {
    if articles.is_empty() {
        println!("No published news.");
        return;
    }
    for article in articles {
        println!("[{}] {}", article.id, article.title);
        if let Some(summary) = article.summary.as_deref().map(str::trim) {
            println!("    {}", summary);
        }
        println!(
            "    {}  likes {}  comments {}",
            published_label(article),
            format_count(article.likes_count),
            format_count(article.comments_count)
        );
        if let Some(url) = article.hero_image_url() {
            println!("    image {}", url);
        }
    }
}

fn print_article(view: &ArticleView) {
    println!("{}", view.detail.title);
    println!("{}", published_label(&view.summary));
    if let Some(url) = view.hero_image_url() {
        println!("image {}", url);
    }
    match view.detail.body() {
        Some((BodySource::Html, body)) => println!("\n{}\n", body),
        Some((BodySource::Legacy, body)) => println!("\n(legacy)\n{}\n", body),
        None => println!("\n(no content)\n"),
    }

    let state = &view.state;
    println!(
        "{} likes{}  {} comments",
        state.likes_count,
        if state.liked { " (liked)" } else { "" },
        state.comments_total()
    );
    for comment in &state.comments {
        let mut marks = Vec::new();
        if comment.is_liked() {
            marks.push("liked");
        }
        if comment.is_flagged() {
            marks.push("flagged");
        }
        println!(
            "- {} ({} likes{}{}): {}",
            comment.display_name,
            format_count(comment.likes_count),
            if marks.is_empty() { "" } else { ", " },
            marks.join(", "),
            comment.message
        );
    }
}
