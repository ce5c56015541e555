use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agent::{AgentResponse, AgentType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sender {
    User,
    Bot,
}

/// One entry in a session's history. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender: Sender,
    pub text: String,
    /// The agent that handled this message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<AgentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured_response: Option<AgentResponse>,
    pub timestamp: DateTime<Utc>,
}

pub const WELCOME_MESSAGE_ID: &str = "welcome";

impl Message {
    pub fn user(text: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender: Sender::User,
            text: text.to_string(),
            agent: None,
            structured_response: None,
            timestamp: Utc::now(),
        }
    }

    pub fn bot(text: &str, agent: AgentType, structured_response: Option<AgentResponse>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender: Sender::Bot,
            text: text.to_string(),
            agent: Some(agent),
            structured_response,
            timestamp: Utc::now(),
        }
    }

    pub fn welcome(text: &str) -> Self {
        Self {
            id: WELCOME_MESSAGE_ID.to_string(),
            ..Self::bot(text, AgentType::Orchestrator, None)
        }
    }

    /// Bot reply carrying a specialist's structured payload.
    pub fn from_agent_response(agent: AgentType, response: AgentResponse) -> Self {
        let text = response.message.clone();
        Self::bot(&text, agent, Some(response))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnPhase {
    Idle,
    Classifying,
    Responding,
}

/// What the UI shows while (and after) a turn runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnStatus {
    pub phase: TurnPhase,
    /// Human-readable activity, empty when idle
    pub current_process: String,
    pub active_agent: Option<AgentType>,
}

impl TurnStatus {
    pub fn idle() -> Self {
        Self {
            phase: TurnPhase::Idle,
            current_process: String::new(),
            active_agent: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase != TurnPhase::Idle
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    EmptyInput,
    Busy,
}

/// Result of a submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TurnOutcome {
    /// The bot reply was appended.
    Completed { message: Message },
    /// The turn failed and the generic system error message was appended.
    Failed { message: Message },
    /// Nothing happened.
    Rejected { reason: RejectReason },
    /// The session was reset while the turn ran; its reply was not kept.
    Discarded,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    #[serde(flatten)]
    pub status: TurnStatus,
    pub messages: Vec<Message>,
}
