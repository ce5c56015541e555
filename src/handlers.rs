use std::sync::Arc;
use serde_json::{json, Value};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

use crate::conversations::{ConversationController, SessionSnapshot, TurnOutcome};
use crate::presentation::{message_view, message_views};

/// Per-connection state for a WebSocket client.
pub struct ClientContext {
    pub session: Arc<ConversationController>,
    sender: UnboundedSender<String>,
    turn_task: Option<AbortHandle>,
}

impl ClientContext {
    pub fn new(session: Arc<ConversationController>, sender: UnboundedSender<String>) -> Self {
        Self {
            session,
            sender,
            turn_task: None,
        }
    }

    pub fn send(&self, msg: &Value) {
        // The writer is gone once the socket closes
        let _ = self.sender.send(msg.to_string());
    }

    pub fn abort_turn(&mut self) {
        if let Some(handle) = self.turn_task.take() {
            handle.abort();
        }
    }
}

/// `{session_id, messages, views}` for the `history` and `session-created`
/// frames.
pub fn history_payload(snapshot: &SessionSnapshot) -> Value {
    json!({
        "type": "history",
        "session_id": snapshot.session_id,
        "messages": snapshot.messages,
        "views": message_views(&snapshot.messages),
    })
}

pub fn handle_message(context: &mut ClientContext, text: &str) -> anyhow::Result<()> {
    let msg: Value = serde_json::from_str(text)?;
    let msg_type = msg.get("type").and_then(|v| v.as_str());

    match msg_type {
        Some("text-input") => {
            handle_text_input(context, &msg);
        }
        Some("reset-session") => {
            let snapshot = context.session.reset();
            context.send(&history_payload(&snapshot));
        }
        Some("fetch-history") => {
            context.send(&history_payload(&context.session.snapshot()));
        }
        _ => {
            warn!("Unknown message type: {:?}", msg_type);
        }
    }

    Ok(())
}

fn handle_text_input(context: &mut ClientContext, msg: &Value) {
    let text = msg
        .get("text")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    let session = context.session.clone();
    let sender = context.sender.clone();
    let task = tokio::spawn(async move {
        let reply = match session.submit(&text).await {
            TurnOutcome::Completed { message } | TurnOutcome::Failed { message } => json!({
                "type": "bot-message",
                "view": message_view(&message),
                "message": message,
            }),
            TurnOutcome::Rejected { reason } => {
                debug!(session = %session.session_id(), "Turn rejected: {:?}", reason);
                json!({ "type": "turn-rejected", "reason": reason })
            }
            // History was reset meanwhile; the client already got the new one
            TurnOutcome::Discarded => json!({ "type": "turn-discarded" }),
        };
        let _ = sender.send(reply.to_string());
    });

    // A rejected submission must not cancel the turn already running
    if context
        .turn_task
        .as_ref()
        .map_or(true, |running| running.is_finished())
    {
        context.turn_task = Some(task.abort_handle());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentResponse, AgentType, OrchestratorDecision, ParamMap, TurnGateway};
    use crate::config_manager::SessionConfig;
    use crate::error::Result;
    use async_trait::async_trait;
    use tokio::sync::{mpsc, Notify};

    #[derive(Default)]
    struct EchoGateway {
        gate: Option<Arc<Notify>>,
    }

    #[async_trait]
    impl TurnGateway for EchoGateway {
        async fn classify(&self, _user_text: &str) -> Result<OrchestratorDecision> {
            Ok(OrchestratorDecision {
                agent: AgentType::AppointmentAgent,
                reason: "schedule".to_string(),
                parameters: ParamMap::new(),
            })
        }

        async fn respond(
            &self,
            _agent: AgentType,
            user_text: &str,
            _parameters: &ParamMap,
        ) -> Result<AgentResponse> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            Ok(AgentResponse {
                action: None,
                message: format!("Booked: {}", user_text),
                next_steps: None,
                data: None,
                document_url: None,
            })
        }
    }

    fn context() -> (ClientContext, mpsc::UnboundedReceiver<String>) {
        context_with(EchoGateway::default())
    }

    fn context_with(gateway: EchoGateway) -> (ClientContext, mpsc::UnboundedReceiver<String>) {
        let session = Arc::new(ConversationController::new(
            "ws-test".to_string(),
            Arc::new(gateway),
            SessionConfig::default(),
        ));
        let (tx, rx) = mpsc::unbounded_channel();
        (ClientContext::new(session, tx), rx)
    }

    async fn next_frame(rx: &mut mpsc::UnboundedReceiver<String>) -> Value {
        serde_json::from_str(&rx.recv().await.unwrap()).unwrap()
    }

    #[tokio::test]
    async fn text_input_produces_bot_message() {
        let (mut ctx, mut rx) = context();
        handle_message(&mut ctx, r#"{"type":"text-input","text":"dentist tomorrow"}"#).unwrap();

        let frame = next_frame(&mut rx).await;
        assert_eq!(frame["type"], "bot-message");
        assert_eq!(frame["message"]["text"], "Booked: dentist tomorrow");
        assert_eq!(frame["view"]["sender_label"], "Appointments");
        assert_eq!(ctx.session.messages().len(), 3);
    }

    #[tokio::test]
    async fn blank_input_is_rejected() {
        let (mut ctx, mut rx) = context();
        handle_message(&mut ctx, r#"{"type":"text-input","text":"  "}"#).unwrap();

        let frame = next_frame(&mut rx).await;
        assert_eq!(frame["type"], "turn-rejected");
        assert_eq!(frame["reason"], "empty_input");
    }

    #[tokio::test]
    async fn reset_and_fetch_history_send_snapshots() {
        let (mut ctx, mut rx) = context();
        ctx.session.submit("first").await;

        handle_message(&mut ctx, r#"{"type":"fetch-history"}"#).unwrap();
        let frame = next_frame(&mut rx).await;
        assert_eq!(frame["type"], "history");
        assert_eq!(frame["messages"].as_array().unwrap().len(), 3);

        handle_message(&mut ctx, r#"{"type":"reset-session"}"#).unwrap();
        let frame = next_frame(&mut rx).await;
        assert_eq!(frame["messages"].as_array().unwrap().len(), 1);
        assert_eq!(frame["messages"][0]["id"], "welcome");
    }

    #[tokio::test]
    async fn reply_after_reset_is_not_sent_as_bot_message() {
        let gate = Arc::new(Notify::new());
        let (mut ctx, mut rx) = context_with(EchoGateway {
            gate: Some(gate.clone()),
        });
        let mut status_rx = ctx.session.subscribe();

        handle_message(&mut ctx, r#"{"type":"text-input","text":"dentist"}"#).unwrap();
        status_rx
            .wait_for(|s| s.phase == crate::conversations::TurnPhase::Responding)
            .await
            .unwrap();

        handle_message(&mut ctx, r#"{"type":"reset-session"}"#).unwrap();
        assert_eq!(next_frame(&mut rx).await["type"], "history");

        gate.notify_one();
        assert_eq!(next_frame(&mut rx).await["type"], "turn-discarded");
        assert_eq!(ctx.session.messages().len(), 1);
    }

    #[test]
    fn malformed_frame_is_an_error() {
        let (mut ctx, _rx) = context();
        assert!(handle_message(&mut ctx, "not json").is_err());
    }
}
