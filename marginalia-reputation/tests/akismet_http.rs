//! AkismetClient against a local stand-in for the reputation service.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Form, Router};
use marginalia_core::Environment;
use marginalia_reputation::{
    AkismetClient, ClientManager, CommentClassifier, CommentParams, JsonFileStore,
    ReputationClient, ReputationError,
};
use marginalia_types::{ClassificationState, Comment};

const KEY: &str = "test-key";
const BLOG: &str = "https://example.com";

type Requests = Arc<Mutex<Vec<(String, HashMap<String, String>)>>>;

async fn comment_check(
    State(requests): State<Requests>,
    Form(form): Form<HashMap<String, String>>,
) -> (HeaderMap, String) {
    let author = form.get("comment_author").cloned().unwrap_or_default();
    requests
        .lock()
        .unwrap()
        .push(("comment-check".to_string(), form));

    let mut headers = HeaderMap::new();
    let body = match author.as_str() {
        "viagra-test-123" => "true",
        "garbled" => {
            headers.insert("x-akismet-debug-help", "Empty \"blog\" value".parse().unwrap());
            "maybe"
        }
        _ => "false",
    };
    (headers, body.to_string())
}

async fn submit_spam(
    State(requests): State<Requests>,
    Form(form): Form<HashMap<String, String>>,
) -> &'static str {
    requests
        .lock()
        .unwrap()
        .push(("submit-spam".to_string(), form));
    "Thanks for making the web a better place."
}

async fn verify_key(Form(form): Form<HashMap<String, String>>) -> &'static str {
    if form.get("key").map(String::as_str) == Some(KEY) {
        "valid"
    } else {
        "invalid"
    }
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn fake_service() -> (String, Requests) {
    let requests: Requests = Arc::default();
    let app = Router::new()
        .route("/1.1/comment-check", post(comment_check))
        .route("/1.1/submit-spam", post(submit_spam))
        .route("/1.1/verify-key", post(verify_key))
        .with_state(requests.clone());
    let addr = serve(app).await;
    (format!("http://{addr}"), requests)
}

fn client(endpoint: &str, key: &str) -> AkismetClient {
    AkismetClient::new(key, BLOG, Some(endpoint), Duration::from_secs(5)).unwrap()
}

fn params(author: &str) -> CommentParams {
    let mut comment = Comment::new("https://example.com/writings/hello", "First!");
    comment.author = Some(author.to_string());
    comment.ip = Some("127.0.0.1".to_string());
    CommentParams::from_comment(&comment)
}

#[tokio::test]
async fn test_comment_check_verdicts() {
    let (endpoint, requests) = fake_service().await;
    let client = client(&endpoint, KEY);

    assert!(client.check(&params("viagra-test-123")).await.unwrap());
    assert!(!client.check(&params("Ada")).await.unwrap());

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    let (method, form) = &requests[1];
    assert_eq!(method, "comment-check");
    assert_eq!(form.get("blog").map(String::as_str), Some(BLOG));
    assert_eq!(form.get("comment_type").map(String::as_str), Some("comment"));
    assert_eq!(form.get("user_ip").map(String::as_str), Some("127.0.0.1"));
    assert_eq!(form.get("comment_content").map(String::as_str), Some("First!"));
}

#[tokio::test]
async fn test_unexpected_body_is_protocol_error() {
    let (endpoint, _) = fake_service().await;
    let client = client(&endpoint, KEY);

    match client.check(&params("garbled")).await {
        Err(ReputationError::Protocol(message)) => {
            assert!(message.contains("maybe"));
            assert!(message.contains("Empty \"blog\" value"));
        }
        other => panic!("expected protocol error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_submit_spam() {
    let (endpoint, requests) = fake_service().await;
    client(&endpoint, KEY)
        .submit_spam(&params("Ada"))
        .await
        .unwrap();

    let requests = requests.lock().unwrap();
    assert_eq!(requests[0].0, "submit-spam");
}

#[tokio::test]
async fn test_verify_key() {
    let (endpoint, _) = fake_service().await;
    assert!(client(&endpoint, KEY).verify_key().await.unwrap());
    assert!(!client(&endpoint, "wrong").verify_key().await.unwrap());
}

#[tokio::test]
async fn test_error_status() {
    let app = Router::new().route(
        "/1.1/comment-check",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "down") }),
    );
    let endpoint = format!("http://{}", serve(app).await);

    assert!(matches!(
        client(&endpoint, KEY).check(&params("Ada")).await,
        Err(ReputationError::Status { status: 500 })
    ));
}

#[tokio::test]
async fn test_slow_service_times_out() {
    let app = Router::new().route(
        "/1.1/comment-check",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "false"
        }),
    );
    let endpoint = format!("http://{}", serve(app).await);
    let client = AkismetClient::new(KEY, BLOG, Some(&endpoint), Duration::from_millis(200)).unwrap();

    assert!(matches!(
        client.check(&params("Ada")).await,
        Err(ReputationError::Timeout(_))
    ));
}

#[tokio::test]
async fn test_classifier_round_trip_through_store() {
    let (endpoint, _) = fake_service().await;
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("comment.json"));

    let manager = ClientManager::new(
        move || {
            let client = AkismetClient::new(KEY, BLOG, Some(&endpoint), Duration::from_secs(5))?;
            Ok(Arc::new(client) as Arc<dyn ReputationClient>)
        },
        Duration::from_secs(600),
    );
    let classifier = CommentClassifier::new(Arc::new(manager), Environment::Production);

    let mut comment = Comment::new("https://example.com/writings/hello", "Cheap pills");
    comment.author = Some("viagra-test-123".to_string());

    let result = classifier
        .classify_and_save(&mut comment, &store)
        .await
        .unwrap();
    assert_eq!(result.state, ClassificationState::Spam);

    let saved = store.load().unwrap();
    assert_eq!(saved.state, ClassificationState::Spam);
    assert!(saved.checked);
}

#[tokio::test]
async fn test_unreachable_service_fails_open() {
    // Nothing listens on this port once the listener is dropped
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let manager = ClientManager::new(
        move || {
            let client = AkismetClient::new(KEY, BLOG, Some(&endpoint), Duration::from_secs(2))?;
            Ok(Arc::new(client) as Arc<dyn ReputationClient>)
        },
        Duration::from_secs(600),
    );
    let classifier = CommentClassifier::new(Arc::new(manager), Environment::Production);
    let mut comment = Comment::new("https://example.com/writings/hello", "Hello");

    let result = classifier.classify(&mut comment).await;
    assert_eq!(result.state, ClassificationState::CheckFailed);
    assert!(!comment.checked);
}
