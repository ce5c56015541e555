//! HTTP API tests against a navigator running on a random port.

mod common;

use common::{navigator_config, start_fake_gemini, start_navigator};
use serde_json::{json, Value};

async fn get(base: &str, path: &str) -> (u16, String) {
    let resp = reqwest::Client::new()
        .get(format!("{}{}", base, path))
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.text().await.unwrap())
}

async fn post_json(base: &str, path: &str, body: Value) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .post(format!("{}{}", base, path))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap_or(Value::Null))
}

async fn new_session(base: &str) -> String {
    let (status, body) = post_json(base, "/api/sessions", json!({})).await;
    assert_eq!(status, 201);
    body["session_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_endpoint() {
    let gemini = start_fake_gemini(false).await;
    let base = start_navigator(navigator_config(&gemini.base_url)).await;

    let (status, body) = get(&base, "/api/health").await;
    assert_eq!(status, 200);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["provider"], "gemini_llm");
    assert_eq!(json["model"], "gemini-2.5-flash");
    assert_eq!(json["credential_configured"], true);
}

#[tokio::test]
async fn test_new_session_starts_with_welcome() {
    let gemini = start_fake_gemini(false).await;
    let base = start_navigator(navigator_config(&gemini.base_url)).await;

    let (status, body) = post_json(&base, "/api/sessions", json!({})).await;
    assert_eq!(status, 201);
    assert_eq!(body["phase"], "idle");
    assert_eq!(body["active_agent"], Value::Null);
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["sender"], "BOT");
    assert_eq!(messages[0]["agent"], "ORCHESTRATOR");
    assert!(messages[0]["text"]
        .as_str()
        .unwrap()
        .starts_with("Selamat datang di Hospital System Navigator"));
}

#[tokio::test]
async fn test_message_round_trip_and_views() {
    let gemini = start_fake_gemini(false).await;
    let base = start_navigator(navigator_config(&gemini.base_url)).await;
    let id = new_session(&base).await;

    let (status, body) = post_json(
        &base,
        &format!("/api/sessions/{}/messages", id),
        json!({"text": "Tolong cek tagihan saya"}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["outcome"], "completed");
    assert_eq!(body["message"]["agent"], "BILLING_AGENT");

    let (status, body) = get(&base, &format!("/api/sessions/{}/views", id)).await;
    assert_eq!(status, 200);
    let views: Value = serde_json::from_str(&body).unwrap();
    let reply = &views[2];
    assert_eq!(reply["sender_label"], "Billing & Finance");
    assert_eq!(reply["icon"], "credit-card");
    let rows = reply["payload"]["data_rows"].as_array().unwrap();
    assert!(rows.contains(&json!({"label": "Status", "value": "UNPAID"})));
    assert!(rows.contains(&json!({"label": "Total", "value": "Rp\u{a0}150.000,00"})));
    assert_eq!(reply["payload"]["document"]["caption"], "Document generated");

    let (status, html) = get(&base, &format!("/api/sessions/{}/transcript", id)).await;
    assert_eq!(status, 200);
    assert!(html.contains("Tolong cek tagihan saya"));
    assert!(html.contains("Download PDF"));
}

#[tokio::test]
async fn test_blank_message_is_unprocessable() {
    let gemini = start_fake_gemini(false).await;
    let base = start_navigator(navigator_config(&gemini.base_url)).await;
    let id = new_session(&base).await;

    let (status, body) = post_json(
        &base,
        &format!("/api/sessions/{}/messages", id),
        json!({"text": "   \n"}),
    )
    .await;
    assert_eq!(status, 422);
    assert_eq!(body["reason"], "empty_input");

    let (_, body) = get(&base, &format!("/api/sessions/{}", id)).await;
    let snapshot: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(snapshot["messages"].as_array().unwrap().len(), 1);
    assert!(gemini.requests().is_empty());
}

#[tokio::test]
async fn test_reset_and_delete() {
    let gemini = start_fake_gemini(false).await;
    let base = start_navigator(navigator_config(&gemini.base_url)).await;
    let id = new_session(&base).await;

    for text in ["daftar pasien", "cek bill"] {
        let (status, _) = post_json(
            &base,
            &format!("/api/sessions/{}/messages", id),
            json!({ "text": text }),
        )
        .await;
        assert_eq!(status, 200);
    }

    let (status, body) = post_json(&base, &format!("/api/sessions/{}/reset", id), json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    assert_eq!(body["active_agent"], Value::Null);

    let status = reqwest::Client::new()
        .delete(format!("{}/api/sessions/{}", base, id))
        .send()
        .await
        .unwrap()
        .status()
        .as_u16();
    assert_eq!(status, 204);

    let (status, _) = get(&base, &format!("/api/sessions/{}", id)).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let gemini = start_fake_gemini(false).await;
    let base = start_navigator(navigator_config(&gemini.base_url)).await;

    let (status, body) = post_json(
        &base,
        "/api/sessions/does-not-exist/messages",
        json!({"text": "hello"}),
    )
    .await;
    assert_eq!(status, 404);
    assert!(body["error"].as_str().unwrap().contains("does-not-exist"));
}
