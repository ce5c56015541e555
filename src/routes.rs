use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::conversations::{RejectReason, SessionSnapshot, TurnOutcome};
use crate::error::NavigatorError;
use crate::presentation::{agent_directory, message_views, AgentCard, MessageView};
use crate::state::AppState;

type ApiError = (StatusCode, Json<Value>);
type ApiResult<T> = Result<T, ApiError>;

/// Full application: API routes, optional static page, CORS and tracing.
pub fn build_app(state: AppState) -> Router {
    let mut app = create_routes();

    if let Some(static_dir) = &state.config.system_config.static_dir {
        app = app.fallback_service(ServeDir::new(static_dir));
    }

    app.layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn create_routes() -> Router<AppState> {
    Router::new()
        // WebSocket
        .route("/client-ws", get(crate::websocket::websocket_handler))

        // Health check
        .route("/api/health", get(health_check))

        // Sessions
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session).delete(delete_session))
        .route("/api/sessions/:id/messages", post(submit_message))
        .route("/api/sessions/:id/reset", post(reset_session))
        .route("/api/sessions/:id/views", get(get_views))
        .route("/api/sessions/:id/agents", get(get_agents))
        .route("/api/sessions/:id/transcript", get(get_transcript))
}

fn error_response(err: NavigatorError) -> ApiError {
    let status = match &err {
        NavigatorError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        _ => {
            error!("Request failed: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(json!({ "error": err.to_string() })))
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let info = &state.model_info;
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "provider": info.provider,
        "model": info.model,
        "credential_configured": info.credential_configured,
    }))
}

async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionSnapshot>) {
    let session = state.create_session();
    (StatusCode::CREATED, Json(session.snapshot()))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SessionSnapshot>> {
    let session = state.get_session(&id).map_err(error_response)?;
    Ok(Json(session.snapshot()))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.remove_session(&id).map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct SubmitRequest {
    text: String,
}

async fn submit_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<SubmitRequest>,
) -> ApiResult<Json<TurnOutcome>> {
    let session = state.get_session(&id).map_err(error_response)?;

    match session.submit(&payload.text).await {
        TurnOutcome::Rejected { reason } => {
            let (status, message) = match reason {
                RejectReason::EmptyInput => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "Message text is empty")
                }
                RejectReason::Busy => (StatusCode::CONFLICT, "A request is already in progress"),
            };
            Err((status, Json(json!({ "error": message, "reason": reason }))))
        }
        outcome => Ok(Json(outcome)),
    }
}

async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SessionSnapshot>> {
    let session = state.get_session(&id).map_err(error_response)?;
    Ok(Json(session.reset()))
}

async fn get_views(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<MessageView>>> {
    let session = state.get_session(&id).map_err(error_response)?;
    Ok(Json(message_views(&session.messages())))
}

async fn get_agents(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<AgentCard>>> {
    let session = state.get_session(&id).map_err(error_response)?;
    Ok(Json(agent_directory(&session.status())))
}

async fn get_transcript(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Html<String>> {
    let session = state.get_session(&id).map_err(error_response)?;
    let snapshot = session.snapshot();
    let html = state
        .renderer
        .render(&message_views(&snapshot.messages), &snapshot.status.current_process)
        .map_err(error_response)?;
    Ok(Html(html))
}
