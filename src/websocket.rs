use axum::{
    extract::{ws::Message, State, WebSocketUpgrade},
    response::Response,
};
use axum::extract::ws::WebSocket;
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::handlers::{self, history_payload, ClientContext};
use crate::state::AppState;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let session = state.create_session();
    let session_id = session.session_id().to_string();
    info!("New WebSocket connection for session {}", session_id);

    let (mut ws_sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    // Single writer so turn tasks and the status forwarder can share the socket
    let writer = tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if let Err(e) = ws_sender.send(Message::Text(text)).await {
                debug!("WebSocket send failed: {}", e);
                break;
            }
        }
    });

    let mut created = history_payload(&session.snapshot());
    created["type"] = json!("session-created");
    let _ = tx.send(created.to_string());

    let status_forwarder = tokio::spawn({
        let mut status_rx = session.subscribe();
        let tx = tx.clone();
        async move {
            while status_rx.changed().await.is_ok() {
                let status = status_rx.borrow_and_update().clone();
                let msg = json!({
                    "type": "status",
                    "phase": status.phase,
                    "current_process": status.current_process,
                    "active_agent": status.active_agent,
                });
                if tx.send(msg.to_string()).is_err() {
                    break;
                }
            }
        }
    });

    let mut context = ClientContext::new(session, tx);

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                if let Err(e) = handlers::handle_message(&mut context, &text) {
                    error!("Error handling message: {}", e);
                    context.send(&json!({ "type": "error", "message": e.to_string() }));
                }
            }
            Ok(Message::Close(_)) => {
                info!("Session {} disconnected", session_id);
                break;
            }
            Err(e) => {
                error!("WebSocket error: {}", e);
                break;
            }
            _ => {}
        }
    }

    // Cleanup
    context.abort_turn();
    status_forwarder.abort();
    drop(context);
    writer.abort();
    let _ = state.remove_session(&session_id);

    info!("Cleaned up session {}", session_id);
}
