use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::agent::{AgentResponse, AgentType, TurnGateway};
use crate::config_manager::SessionConfig;
use crate::conversations::types::{
    Message, RejectReason, SessionSnapshot, TurnOutcome, TurnPhase, TurnStatus,
};
use crate::error::Result;

pub const ORCHESTRATING_STATUS: &str = "Orchestrating request...";

pub fn delegating_status(agent: AgentType) -> String {
    format!("Delegating to {}...", agent)
}

struct ConversationState {
    messages: Vec<Message>,
    status: TurnStatus,
    /// Bumped by `reset`; a turn started before a reset drops its reply.
    epoch: u64,
}

/// Puts the session back to idle if a turn is dropped before it finishes,
/// e.g. when the HTTP client disconnects mid-request.
struct TurnGuard<'a> {
    controller: &'a ConversationController,
    finished: bool,
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        warn!(session = %self.controller.session_id, "Turn was cancelled, returning session to idle");
        let mut state = self.controller.lock();
        state.status.phase = TurnPhase::Idle;
        state.status.current_process.clear();
        self.controller.publish(&state);
    }
}

/// Owns one session's history and runs its turns.
///
/// The state lock is only held between awaits, so a submission arriving while
/// a turn is in flight sees a non-idle phase and is rejected.
pub struct ConversationController {
    session_id: String,
    gateway: Arc<dyn TurnGateway>,
    settings: SessionConfig,
    welcome: Message,
    state: Mutex<ConversationState>,
    status_tx: watch::Sender<TurnStatus>,
}

impl ConversationController {
    pub fn new(session_id: String, gateway: Arc<dyn TurnGateway>, settings: SessionConfig) -> Self {
        let welcome = Message::welcome(&settings.welcome_message);
        let (status_tx, _) = watch::channel(TurnStatus::idle());
        Self {
            session_id,
            gateway,
            settings,
            state: Mutex::new(ConversationState {
                messages: vec![welcome.clone()],
                status: TurnStatus::idle(),
                epoch: 0,
            }),
            welcome,
            status_tx,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn lock(&self) -> MutexGuard<'_, ConversationState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn publish(&self, state: &ConversationState) {
        self.status_tx.send_replace(state.status.clone());
    }

    /// Status updates, starting from the current one.
    pub fn subscribe(&self) -> watch::Receiver<TurnStatus> {
        self.status_tx.subscribe()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.lock().messages.clone()
    }

    pub fn status(&self) -> TurnStatus {
        self.lock().status.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().status.is_loading()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock();
        SessionSnapshot {
            session_id: self.session_id.clone(),
            status: state.status.clone(),
            messages: state.messages.clone(),
        }
    }

    /// Run one turn: classify, then respond, then append the reply.
    pub async fn submit(&self, input: &str) -> TurnOutcome {
        let (user_text, epoch) = {
            let mut state = self.lock();
            if input.trim().is_empty() {
                return TurnOutcome::Rejected {
                    reason: RejectReason::EmptyInput,
                };
            }
            if state.status.is_loading() {
                debug!(session = %self.session_id, "Turn already in flight, rejecting submission");
                return TurnOutcome::Rejected {
                    reason: RejectReason::Busy,
                };
            }

            let user_message = Message::user(input);
            let user_text = user_message.text.clone();
            state.messages.push(user_message);
            state.status = TurnStatus {
                phase: TurnPhase::Classifying,
                current_process: ORCHESTRATING_STATUS.to_string(),
                active_agent: Some(AgentType::Orchestrator),
            };
            self.publish(&state);
            (user_text, state.epoch)
        };

        let mut guard = TurnGuard {
            controller: self,
            finished: false,
        };
        let result = self.run_turn(&user_text, epoch).await;
        guard.finished = true;

        let mut state = self.lock();
        let outcome = match result {
            Ok((agent, response)) => TurnOutcome::Completed {
                message: Message::from_agent_response(agent, response),
            },
            Err(e) => {
                error!(session = %self.session_id, "Turn failed: {}", e);
                if self.settings.clear_active_agent_on_error && state.epoch == epoch {
                    state.status.active_agent = None;
                }
                TurnOutcome::Failed {
                    message: Message::bot(
                        &self.settings.system_error_message,
                        AgentType::Orchestrator,
                        None,
                    ),
                }
            }
        };

        let outcome = if state.epoch == epoch {
            if let TurnOutcome::Completed { message } | TurnOutcome::Failed { message } = &outcome {
                state.messages.push(message.clone());
            }
            outcome
        } else {
            info!(session = %self.session_id, "Session was reset during the turn, dropping reply");
            TurnOutcome::Discarded
        };

        state.status.phase = TurnPhase::Idle;
        state.status.current_process.clear();
        self.publish(&state);
        outcome
    }

    async fn run_turn(&self, user_text: &str, epoch: u64) -> Result<(AgentType, AgentResponse)> {
        let decision = self.gateway.classify(user_text).await?;
        info!(
            session = %self.session_id,
            agent = %decision.agent,
            reason = %decision.reason,
            "Orchestrator decision"
        );

        {
            let mut state = self.lock();
            state.status.phase = TurnPhase::Responding;
            state.status.current_process = delegating_status(decision.agent);
            if state.epoch == epoch {
                state.status.active_agent = Some(decision.agent);
            }
            self.publish(&state);
        }

        let response = self
            .gateway
            .respond(decision.agent, user_text, &decision.parameters)
            .await?;
        Ok((decision.agent, response))
    }

    /// Discard everything but the welcome message and clear the active agent.
    pub fn reset(&self) -> SessionSnapshot {
        let mut state = self.lock();
        state.messages = vec![self.welcome.clone()];
        state.status.active_agent = None;
        state.epoch += 1;
        self.publish(&state);
        info!(session = %self.session_id, "Session reset");
        SessionSnapshot {
            session_id: self.session_id.clone(),
            status: state.status.clone(),
            messages: state.messages.clone(),
        }
    }
}
