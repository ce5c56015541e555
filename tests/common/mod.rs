//! Shared fixtures: a fake Gemini `generateContent` endpoint and a helper
//! that runs the navigator against it on a random port.
#![allow(dead_code)]

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use hsn_navigator::config_manager::Config;
use hsn_navigator::routes::build_app;
use hsn_navigator::state::AppState;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

pub const TEST_API_KEY: &str = "test-key";

#[derive(Clone, Default)]
struct FakeGeminiState {
    requests: Arc<Mutex<Vec<Value>>>,
    fail_classify: bool,
}

/// Handle on a running fake model server.
pub struct FakeGemini {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Value>>>,
}

impl FakeGemini {
    /// Every `generateContent` body received so far.
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }
}

fn system_text(body: &Value) -> &str {
    body["systemInstruction"]["parts"][0]["text"].as_str().unwrap_or("")
}

fn user_text(body: &Value) -> &str {
    body["contents"][0]["parts"][0]["text"].as_str().unwrap_or("")
}

fn candidate(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

/// Routing: "bill"/"tagihan" goes to billing, everything else to patient
/// services. Specialists answer from a small script keyed on the query.
async fn generate_content(
    State(state): State<FakeGeminiState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) != Some(TEST_API_KEY) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"message": "API key not valid"}})),
        );
    }
    state.requests.lock().unwrap().push(body.clone());

    let system = system_text(&body);
    let query = user_text(&body).to_lowercase();

    if system.contains("(Orchestrator)") {
        if state.fail_classify {
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"error": {"message": "overloaded"}})),
            );
        }
        let decision = if query.contains("bill") || query.contains("tagihan") {
            json!({"agent": "BILLING_AGENT", "reason": "Billing question", "parameters": {"invoice": "INV-77"}})
        } else {
            json!({"agent": "PATIENT_AGENT", "reason": "Registration", "parameters": {"name": "Budi Santoso", "age": 42}})
        };
        let fenced = format!("```json\n{}\n```", decision);
        return (StatusCode::OK, Json(candidate(&fenced)));
    }

    let reply = if query.contains("garbage") {
        "I am not JSON".to_string()
    } else if system.contains("Patient Information Agent") {
        json!({
            "action": "registration",
            "message": "Pendaftaran berhasil. Nomor rekam medis Anda sudah dibuat.",
            "next_steps": ["Bawa KTP ke loket", "Ambil nomor antrian"],
            "data": {"patient_id": "RM-2024-0001", "queue_number": 12}
        })
        .to_string()
    } else {
        json!({
            "action": "invoice_check",
            "message": "Tagihan Anda sebesar Rp 150.000.",
            "data": {"total": 150000, "status": "UNPAID"},
            "document_url": "https://files.example/inv-77.pdf"
        })
        .to_string()
    };
    (StatusCode::OK, Json(candidate(&reply)))
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

pub async fn start_fake_gemini(fail_classify: bool) -> FakeGemini {
    let state = FakeGeminiState {
        fail_classify,
        ..FakeGeminiState::default()
    };
    let requests = state.requests.clone();
    let router = Router::new()
        .route("/v1beta/models/:call", post(generate_content))
        .with_state(state);
    FakeGemini {
        base_url: serve(router).await,
        requests,
    }
}

pub fn navigator_config(gemini_base_url: &str) -> Config {
    let mut config = Config::default();
    config.llm_config.base_url = Some(gemini_base_url.to_string());
    config.llm_config.llm_api_key = Some(TEST_API_KEY.to_string());
    config
}

/// Run the full navigator app and return its base URL.
pub async fn start_navigator(config: Config) -> String {
    let state = AppState::new(config).unwrap();
    serve(build_app(state)).await
}
