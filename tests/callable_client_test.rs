//! Integration tests for the callable news client against a mock functions host.

use armor_news::adapters::callable::{CallableExecutor, CallableNewsClient, functions};
use armor_news::adapters::identity::{AuthSession, StaticTokenIssuer};
use armor_news::domain::{ArticleSummary, DomainError, Identity};
use armor_news::ports::{NewsPort, TokenIssuer};
use armor_news::usecases::ArticleService;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use wiremock::matchers::{any, body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn signed_in(token: &str) -> Arc<AuthSession> {
    Arc::new(AuthSession::signed_in(
        Identity::new("u1"),
        Arc::new(StaticTokenIssuer::new(token)),
    ))
}

fn signed_out() -> Arc<AuthSession> {
    Arc::new(AuthSession::new(Arc::new(StaticTokenIssuer::new("unused"))))
}

fn create_client(server: &MockServer, session: Arc<AuthSession>) -> CallableNewsClient {
    create_client_with_timeout(server, session, Duration::from_secs(5))
}

fn create_client_with_timeout(
    server: &MockServer,
    session: Arc<AuthSession>,
    timeout: Duration,
) -> CallableNewsClient {
    let executor =
        CallableExecutor::new(server.uri(), session, timeout).expect("Failed to build executor");
    CallableNewsClient::new(executor)
}

fn fn_path(name: &str) -> String {
    format!("/{}", name)
}

#[tokio::test]
async fn test_list_published_decodes_articles() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(fn_path(functions::LIST_PUBLISHED_NEWS)))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({ "data": {} })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "articles": [
                    {
                        "id": "n1",
                        "title": "Season launch",
                        "coverImage": { "url": "https://cdn.test/cover.png" },
                        "likesCount": 12,
                        "publishedAt": { "_seconds": 1700000000, "_nanoseconds": 0 }
                    },
                    {
                        "id": "n2",
                        "title": "Patch notes",
                        "media": [{ "downloadUrl": "https://cdn.test/m.png" }],
                        "publishedAt": "1700000500"
                    }
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server, signed_out());
    let articles = client.list_published().await.expect("list failed");

    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].likes_count, Some(12));
    assert_eq!(articles[0].published_at.unwrap().seconds(), 1_700_000_000.0);
    assert_eq!(
        articles[1].hero_image_url().unwrap().as_str(),
        "https://cdn.test/m.png"
    );

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

/// Issuer that counts how often a token is requested.
#[derive(Default)]
struct CountingIssuer {
    issued: AtomicUsize,
}

#[async_trait::async_trait]
impl TokenIssuer for CountingIssuer {
    async fn issue_token(&self, _identity: &Identity) -> Result<String, DomainError> {
        self.issued.fetch_add(1, Ordering::SeqCst);
        Ok("tok".to_string())
    }
}

#[tokio::test]
async fn test_public_reads_skip_credentials_when_signed_in() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(fn_path(functions::LIST_PUBLISHED_NEWS)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "articles": [] } })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(fn_path(functions::GET_PUBLISHED_NEWS_ARTICLE)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "article": { "id": "n1", "title": "Launch" } }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(fn_path(functions::GET_PUBLISHED_NEWS_COMMENTS)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "comments": [] } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let issuer = Arc::new(CountingIssuer::default());
    let session = Arc::new(AuthSession::signed_in(Identity::new("u1"), issuer.clone()));
    let client = create_client(&server, session);

    client.list_published().await.expect("list failed");
    client.article_detail("n1").await.expect("detail failed");
    client.comments("n1").await.expect("comments failed");

    assert_eq!(issuer.issued.load(Ordering::SeqCst), 0);
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
    for request in &requests {
        assert!(
            request.headers.get("authorization").is_none(),
            "unexpected credential on {}",
            request.url.path()
        );
    }
}

#[tokio::test]
async fn test_detail_accepts_result_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(fn_path(functions::GET_PUBLISHED_NEWS_ARTICLE)))
        .and(body_json(json!({ "data": { "id": "n1" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {
                "article": {
                    "id": "n1",
                    "title": "Season launch",
                    "contentHtml": "",
                    "legacyContent": "Plain body",
                    "createdBy": "admin"
                }
            }
        })))
        .mount(&server)
        .await;

    let client = create_client(&server, signed_out());
    let detail = client.article_detail("n1").await.expect("detail failed");

    assert_eq!(detail.created_by.as_deref(), Some("admin"));
    assert_eq!(detail.body().map(|(_, body)| body), Some("Plain body"));
}

#[tokio::test]
async fn test_comments_request_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(fn_path(functions::GET_PUBLISHED_NEWS_COMMENTS)))
        .and(body_json(json!({ "data": { "id": "n1", "limit": 100 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "comments": [
                    {
                        "id": "c1",
                        "uid": "u9",
                        "displayName": "Fan",
                        "message": "Great",
                        "createdAt": 1700000000.25,
                        "likesCount": 2,
                        "likedByCurrentUser": true
                    }
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    // Public read: no identity needed.
    let client = create_client(&server, signed_out());
    let comments = client.comments("n1").await.expect("comments failed");

    assert_eq!(comments.len(), 1);
    assert!(comments[0].is_liked());
    assert_eq!(comments[0].created_at.unwrap().seconds(), 1_700_000_000.25);
}

#[tokio::test]
async fn test_toggle_like_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(fn_path(functions::TOGGLE_NEWS_LIKE)))
        .and(header("Authorization", "Bearer tok-123"))
        .and(body_json(json!({ "data": { "newsId": "n1" } })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": { "liked": true, "likesCount": 42 } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server, signed_in("tok-123"));
    let toggle = client.toggle_like("n1").await.expect("toggle failed");

    assert!(toggle.liked);
    assert_eq!(toggle.likes_count, 42);
}

#[tokio::test]
async fn test_comment_flag_and_like_payloads() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(fn_path(functions::TOGGLE_NEWS_COMMENT_FLAG)))
        .and(body_json(json!({ "data": { "newsId": "n1", "commentId": "c1" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "flagged": true }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(fn_path(functions::TOGGLE_NEWS_COMMENT_LIKE)))
        .and(body_json(json!({ "data": { "newsId": "n1", "commentId": "c1" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "liked": false, "likesCount": 0 }
        })))
        .mount(&server)
        .await;

    let client = create_client(&server, signed_in("tok"));

    let flag = client.toggle_comment_flag("n1", "c1").await.unwrap();
    assert!(flag.flagged);
    assert_eq!(flag.flags_count, None);

    let like = client.toggle_comment_like("n1", "c1").await.unwrap();
    assert!(!like.liked);
}

#[tokio::test]
async fn test_remote_error_message_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(fn_path(functions::ADD_NEWS_COMMENT)))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "message": "Comment is too long", "status": "INVALID_ARGUMENT" }
        })))
        .mount(&server)
        .await;

    let client = create_client(&server, signed_in("tok"));
    let err = client.add_comment("n1", "hello").await.unwrap_err();

    assert_eq!(err, DomainError::Remote("Comment is too long".to_string()));
}

#[tokio::test]
async fn test_authenticated_call_without_identity_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = create_client(&server, signed_out());

    assert_eq!(
        client.toggle_like("n1").await.unwrap_err(),
        DomainError::AuthenticationRequired
    );
    assert_eq!(
        client.engagement("n1").await.unwrap_err(),
        DomainError::AuthenticationRequired
    );
    assert_eq!(
        client.add_comment("n1", "hi").await.unwrap_err(),
        DomainError::AuthenticationRequired
    );
}

#[tokio::test]
async fn test_credential_failure_propagates_without_request() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    // Empty static token: issuer fails.
    let client = create_client(&server, signed_in(""));
    let err = client.toggle_comment_flag("n1", "c1").await.unwrap_err();

    assert!(matches!(err, DomainError::CredentialFetchFailed(_)), "{err:?}");
}

#[tokio::test]
async fn test_empty_body_is_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = create_client(&server, signed_out());
    assert_eq!(
        client.list_published().await.unwrap_err(),
        DomainError::EmptyResponse
    );
}

#[tokio::test]
async fn test_timeout_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": { "articles": [] } }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = create_client_with_timeout(&server, signed_out(), Duration::from_millis(200));
    let err = client.list_published().await.unwrap_err();

    assert!(matches!(err, DomainError::Network(_)), "{err:?}");
}

#[tokio::test]
async fn test_unknown_envelope_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "payload": {} })))
        .mount(&server)
        .await;

    let client = create_client(&server, signed_in("tok"));
    assert_eq!(
        client.engagement("n1").await.unwrap_err(),
        DomainError::MalformedEnvelope
    );
}

#[tokio::test]
async fn test_add_comment_trims_and_rejects_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(fn_path(functions::ADD_NEWS_COMMENT)))
        .and(body_json(json!({ "data": { "newsId": "n1", "message": "Nice work" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "comment": { "id": "c9", "displayName": "Ada", "message": "Nice work" },
                "commentsCount": 4
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server, signed_in("tok"));

    let err = client.add_comment("n1", "   \n").await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidRequest(_)), "{err:?}");

    let added = client.add_comment("n1", "  Nice work \n").await.unwrap();
    assert_eq!(added.comment.id, "c9");
    assert_eq!(added.comments_count, 4);
}

#[tokio::test]
async fn test_article_service_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(fn_path(functions::GET_PUBLISHED_NEWS_ARTICLE)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "article": { "id": "n1", "title": "Launch", "likesCount": 7 } }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(fn_path(functions::GET_PUBLISHED_NEWS_COMMENTS)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "comments": [
                { "id": "c1", "displayName": "A", "message": "one" },
                { "id": "c2", "displayName": "B", "message": "two" },
                { "id": "c3", "displayName": "C", "message": "three" }
            ] }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(fn_path(functions::GET_NEWS_ENGAGEMENT)))
        .and(header("Authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": { "liked": true, "likesCount": 8, "commentsCount": 5 }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(fn_path(functions::TOGGLE_NEWS_LIKE)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "liked": false, "likesCount": 7 }
        })))
        .mount(&server)
        .await;

    let session = signed_in("tok");
    let client = create_client(&server, session.clone());
    let service = ArticleService::new(Arc::new(client), session);

    let summary: ArticleSummary = serde_json::from_value(json!({ "id": "n1", "title": "Launch" })).unwrap();
    let mut view = service.open(&summary).await.expect("open failed");

    assert!(view.state.liked);
    assert_eq!(view.state.likes_count, 8);
    assert_eq!(view.state.comments.len(), 3);
    assert_eq!(view.state.comments_total(), 5);

    service.toggle_like(&mut view.state).await.unwrap();
    assert!(!view.state.liked);
    assert_eq!(view.state.likes_count, 7);
}
