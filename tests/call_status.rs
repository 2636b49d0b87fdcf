//! Integration tests for the Vapi call-status poller against a local mock
//! of the call endpoint.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::time::timeout;

use voice_todo::config::VapiConfig;
use voice_todo::error::CallError;
use voice_todo::vapi::VapiClient;

const TEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
struct MockState {
    hits: Arc<AtomicUsize>,
    /// Number of polls answered with "in-progress" before "ended".
    ends_after: usize,
}

async fn get_call(
    State(state): State<MockState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Bearer sk-test") {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Invalid key"})));
    }
    if id == "missing" {
        return (StatusCode::NOT_FOUND, Json(json!({"message": "Not Found"})));
    }

    let hit = state.hits.fetch_add(1, Ordering::SeqCst) + 1;
    let status = if hit > state.ends_after {
        "ended"
    } else {
        "in-progress"
    };
    (
        StatusCode::OK,
        Json(json!({
            "id": id,
            "type": "inboundPhoneCall",
            "status": status,
            "createdAt": "2026-01-01T00:00:00Z",
            "transcript": "AI: What should I add?\nUser: Buy milk",
            "assistantId": "asst_1",
            "cost": 0.04
        })),
    )
}

/// Start the mock on a random port, return (client config, hit counter).
async fn start_mock(ends_after: usize, attempts: u32) -> (VapiConfig, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/call/{id}", get(get_call))
        .with_state(MockState {
            hits: Arc::clone(&hits),
            ends_after,
        });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let mut config = VapiConfig::new("sk-test");
    config.api_url = format!("http://127.0.0.1:{port}");
    config.poll_attempts = attempts;
    config.poll_interval = Duration::from_millis(10);
    (config, hits)
}

#[tokio::test]
async fn ended_call_returns_on_first_poll() {
    timeout(TEST_TIMEOUT, async {
        let (config, hits) = start_mock(0, 3).await;
        let details = VapiClient::new(&config)
            .get_call_details("call_1")
            .await
            .unwrap();

        assert!(details.found);
        let data = details.data.unwrap();
        assert_eq!(data.id.as_deref(), Some("call_1"));
        assert_eq!(data.status.as_deref(), Some("ended"));
        assert_eq!(data.call_type.as_deref(), Some("inboundPhoneCall"));
        assert!(data.ended_at.is_none());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn polls_until_call_ends() {
    timeout(TEST_TIMEOUT, async {
        let (config, hits) = start_mock(2, 3).await;
        let details = VapiClient::new(&config)
            .get_call_details("call_2")
            .await
            .unwrap();

        assert!(details.found);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn gives_up_after_configured_attempts() {
    timeout(TEST_TIMEOUT, async {
        let (config, hits) = start_mock(10, 3).await;
        let details = VapiClient::new(&config)
            .get_call_details("call_3")
            .await
            .unwrap();

        assert!(!details.found);
        assert!(details.data.is_none());
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn http_errors_surface_as_call_errors() {
    timeout(TEST_TIMEOUT, async {
        let (config, _hits) = start_mock(0, 3).await;
        let err = VapiClient::new(&config)
            .get_call_details("missing")
            .await
            .unwrap_err();
        assert!(matches!(err, CallError::Http { status: 404, .. }));

        let mut wrong_key = config.clone();
        wrong_key.private_key = "sk-wrong".to_string().into();
        let err = VapiClient::new(&wrong_key)
            .fetch_call("call_1")
            .await
            .unwrap_err();
        assert!(matches!(err, CallError::Http { status: 401, .. }));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn unreachable_endpoint_is_request_failure() {
    timeout(TEST_TIMEOUT, async {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let mut config = VapiConfig::new("sk-test");
        config.api_url = format!("http://127.0.0.1:{port}");
        let err = VapiClient::new(&config)
            .fetch_call("call_1")
            .await
            .unwrap_err();
        assert!(matches!(err, CallError::RequestFailed(_)));
    })
    .await
    .expect("test timed out");
}
