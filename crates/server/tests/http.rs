//! HTTP tests against a real listener on an ephemeral port.

use askrelay::{router, AppState, HealthResponse, Relay, COMPLETION_MARKER};
use askrelay_core::CivilClock;
use askrelay_llm::{MockClient, ToolCall};
use serde_json::json;
use std::sync::Arc;

const SERVICE_NAME: &str = "AI Assistant with Islamic Knowledge";

async fn spawn_server(mock: &Arc<MockClient>) -> String {
    let clock = CivilClock::default();
    let relay = Arc::new(Relay::new(mock.clone(), "gemini-2.0-flash-exp", clock));
    let state = AppState::new(relay, clock, SERVICE_NAME);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn health_reports_status() {
    let mock = Arc::new(MockClient::new());
    let base = spawn_server(&mock).await;

    let response = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert_eq!(response.status(), 200);

    let health: HealthResponse = response.json().await.unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.service, SERVICE_NAME);
    // "YYYY-MM-DD HH:MM:SS TZ"
    assert_eq!(&health.timestamp[4..5], "-");
    assert_eq!(&health.timestamp[13..14], ":");
    assert!(health.timestamp.len() > 20);
}

#[tokio::test]
async fn generate_streams_plain_text() {
    let mock = Arc::new(MockClient::new());
    mock.push_text("Wa alaikum salam! 😊");
    let base = spawn_server(&mock).await;

    let response = reqwest::Client::new()
        .post(format!("{}/generate", base))
        .json(&json!({"question": "Assalamualaikum", "chat_history": []}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["content-type"],
        "text/plain; charset=utf-8"
    );

    let body = response.text().await.unwrap();
    assert_eq!(body, format!("Wa alaikum salam! 😊{}", COMPLETION_MARKER));
}

#[tokio::test]
async fn generate_trims_history() {
    let mock = Arc::new(MockClient::new());
    mock.push_text("ok");
    let base = spawn_server(&mock).await;

    let history: Vec<_> = (0..12)
        .map(|i| json!({"role": "user", "message": format!("turn-{:02}", i)}))
        .collect();

    reqwest::Client::new()
        .post(format!("{}/generate", base))
        .json(&json!({"question": "again?", "chat_history": history}))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    let prompt = &mock.requests()[0].prompt;
    assert!(!prompt.contains("turn-00"));
    assert!(!prompt.contains("turn-01"));
    assert!(prompt.contains("user: turn-02"));
    assert!(prompt.contains("user: turn-11"));
}

#[tokio::test]
async fn generate_accepts_missing_fields() {
    let mock = Arc::new(MockClient::new());
    mock.push_text("Could you tell me more?");
    let base = spawn_server(&mock).await;

    let body = reqwest::Client::new()
        .post(format!("{}/generate", base))
        .json(&json!({}))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.ends_with(COMPLETION_MARKER));
    assert!(mock.requests()[0].prompt.contains("User Question: \n"));
}

#[tokio::test]
async fn generate_accepts_null_fields() {
    let mock = Arc::new(MockClient::new());
    mock.push_text("Could you say that again?");
    let base = spawn_server(&mock).await;

    let response = reqwest::Client::new()
        .post(format!("{}/generate", base))
        .json(&json!({
            "question": null,
            "chat_history": [{"role": null, "message": "x"}]
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert_eq!(body, format!("Could you say that again?{}", COMPLETION_MARKER));

    let prompt = &mock.requests()[0].prompt;
    assert!(prompt.contains("UNKNOWN: x\n"));
    assert!(prompt.contains("User Question: \n"));
}

#[tokio::test]
async fn generate_accepts_null_history() {
    let mock = Arc::new(MockClient::new());
    mock.push_text("ok");
    let base = spawn_server(&mock).await;

    let response = reqwest::Client::new()
        .post(format!("{}/generate", base))
        .json(&json!({"question": "hi", "chat_history": null}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert!(response.text().await.unwrap().ends_with(COMPLETION_MARKER));
}

#[tokio::test]
async fn generate_with_tool_streams_markers() {
    let mock = Arc::new(MockClient::new());
    mock.push_tool_calls(vec![
        ToolCall::new("get_general_response").with_argument("query", "weather today")
    ]);
    mock.push_text("Sunny");
    mock.push_stream_text(&["It is sunny."]);
    let base = spawn_server(&mock).await;

    let body = reqwest::Client::new()
        .post(format!("{}/generate", base))
        .json(&json!({"question": "weather?"}))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.starts_with("🔍 Searching for current information...\n\n"));
    assert!(
        body.contains("💭 Processing information and generating response...\n\nIt is sunny.")
    );
    assert!(body.ends_with(COMPLETION_MARKER));
}

#[tokio::test]
async fn generate_reports_errors_in_body() {
    let mock = Arc::new(MockClient::new());
    mock.push_error("quota exceeded");
    let base = spawn_server(&mock).await;

    let response = reqwest::Client::new()
        .post(format!("{}/generate", base))
        .json(&json!({"question": "hi"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.starts_with("❌ Error: "));
    assert!(body.contains("quota exceeded"));
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let mock = Arc::new(MockClient::new());
    let base = spawn_server(&mock).await;

    let response = reqwest::Client::new()
        .get(format!("{}/health", base))
        .header("Origin", "https://example.org")
        .send()
        .await
        .unwrap();

    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}
