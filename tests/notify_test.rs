//! Notification relay tests
//!
//! Lead requests await the relay and surface its failures; review and login
//! notifications are sent in the background.

mod common;

use axum::http::StatusCode;
use common::{FakeRelay, TestServer};
use serde_json::json;

async fn server_with_relay(relay: &FakeRelay) -> TestServer {
    let base = relay.base_url();
    TestServer::start_with(move |c| {
        c.tg_bot_token = Some("123:abc".to_string());
        c.tg_chat_id = Some("42".to_string());
        c.tg_api_base = base;
    })
    .await
}

#[tokio::test]
async fn test_lead_is_forwarded() {
    let relay = FakeRelay::start(StatusCode::OK).await;
    let server = server_with_relay(&relay).await;

    let (status, body) = server
        .post_json(
            "/api/lead",
            json!({ "name": " Ivan ", "phone": " +7 900 000 ", "model": "", "problem": "Noisy" }),
        )
        .await;
    assert_eq!(status, 200, "{body}");

    let messages = relay.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["chat_id"], "42");
    let text = messages[0]["text"].as_str().unwrap();
    assert!(text.contains("Name: Ivan"));
    assert!(text.contains("Phone: +7 900 000"));
    assert!(text.contains("Model: —"));
    assert!(messages[0].get("parse_mode").is_none());
}

#[tokio::test]
async fn test_lead_validation_and_relay_errors() {
    let relay = FakeRelay::start(StatusCode::BAD_REQUEST).await;
    let server = server_with_relay(&relay).await;

    let (status, body) = server
        .post_json("/api/lead", json!({ "phone": "12345" }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "invalid_phone");

    let resp = server
        .client
        .post(server.url("/api/lead"))
        .header("content-type", "application/json")
        .body("{ broken")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "bad_request");

    let (status, body) = server
        .post_json("/api/lead", json!({ "phone": "+7 900 000" }))
        .await;
    assert_eq!(status, 502);
    assert_eq!(body["error"], "tg_error");
    assert!(body["details"].as_str().unwrap().contains("chat not found"));

    let unconfigured = TestServer::start().await;
    let (status, body) = unconfigured
        .post_json("/api/lead", json!({ "phone": "+7 900 000" }))
        .await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "tg_not_configured");
}

#[tokio::test]
async fn test_background_notifications() {
    let relay = FakeRelay::start(StatusCode::OK).await;
    let server = server_with_relay(&relay).await;

    let (status, _) = server
        .post_json("/api/review", json!({ "name": "<Eve>", "text": "Great & fast" }))
        .await;
    assert_eq!(status, 200);
    server.login().await;

    let messages = relay.wait_for(2).await;
    assert_eq!(messages.len(), 2);

    let review = messages
        .iter()
        .find(|m| m["parse_mode"] == "HTML")
        .expect("review notification");
    let text = review["text"].as_str().unwrap();
    assert!(text.contains("&lt;Eve&gt;"));
    assert!(text.contains("Great &amp; fast"));

    let login = messages
        .iter()
        .find(|m| m["text"].as_str().unwrap().contains("Admin login"))
        .expect("login notification");
    assert!(login["text"].as_str().unwrap().contains("IP: unknown"));
}

#[tokio::test]
async fn test_failing_relay_does_not_block_review() {
    let relay = FakeRelay::start(StatusCode::INTERNAL_SERVER_ERROR).await;
    let server = server_with_relay(&relay).await;

    let (status, body) = server
        .post_json("/api/review", json!({ "text": "Still saved" }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "ok": true }));
}
