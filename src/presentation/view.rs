use serde::Serialize;

use crate::agent::{AgentResponse, AgentType};
use crate::conversations::{Message, Sender, TurnStatus};
use crate::presentation::formatting::{format_param_value, format_time, humanize_key};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataRow {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentView {
    pub url: String,
    pub caption: &'static str,
    pub link_text: &'static str,
}

/// Structured part of a bot message, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayloadView {
    pub data_rows: Vec<DataRow>,
    /// "Recommended Actions"; empty when there are none
    pub next_steps: Vec<String>,
    pub document: Option<DocumentView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageView {
    pub id: String,
    pub is_user: bool,
    pub sender_label: String,
    pub icon: &'static str,
    pub text: String,
    pub time: String,
    pub payload: Option<PayloadView>,
}

/// Name shown above a bot bubble.
pub fn agent_label(agent: Option<AgentType>) -> String {
    match agent {
        None => "System".to_string(),
        Some(AgentType::PatientAgent) => "Patient Services".to_string(),
        Some(AgentType::AppointmentAgent) => "Appointments".to_string(),
        Some(AgentType::BillingAgent) => "Billing & Finance".to_string(),
        Some(AgentType::RecordsAgent) => "Medical Records".to_string(),
        Some(other) => other.as_str().to_string(),
    }
}

pub fn agent_icon(agent: Option<AgentType>) -> &'static str {
    match agent {
        Some(AgentType::PatientAgent) => "user",
        Some(AgentType::AppointmentAgent) => "calendar",
        Some(AgentType::BillingAgent) => "credit-card",
        Some(AgentType::RecordsAgent) => "activity",
        _ => "bot",
    }
}

/// The model's document link, if it is `http(s)` or relative. Any other
/// scheme (`javascript:`, `data:`, ...) is dropped.
pub fn safe_document_url(url: &str) -> Option<String> {
    let url = url.trim();
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Some(url.to_string());
    }
    let head = url.split(|c| c == '/' || c == '?' || c == '#').next().unwrap_or_default();
    if url.is_empty() || url.starts_with("//") || head.contains(':') {
        None
    } else {
        Some(url.to_string())
    }
}

pub fn payload_view(response: &AgentResponse) -> PayloadView {
    let data_rows = response
        .data
        .iter()
        .flatten()
        .map(|(key, value)| DataRow {
            label: humanize_key(key),
            value: format_param_value(value),
        })
        .collect();

    PayloadView {
        data_rows,
        next_steps: response.next_steps.clone().unwrap_or_default(),
        document: response
            .document_url
            .as_deref()
            .and_then(safe_document_url)
            .map(|url| DocumentView {
                url,
                caption: "Document generated",
                link_text: "Download PDF",
            }),
    }
}

pub fn message_view(message: &Message) -> MessageView {
    let is_user = message.sender == Sender::User;
    MessageView {
        id: message.id.clone(),
        is_user,
        sender_label: if is_user {
            "You".to_string()
        } else {
            agent_label(message.agent)
        },
        icon: if is_user { "user" } else { agent_icon(message.agent) },
        text: message.text.clone(),
        time: format_time(&message.timestamp),
        payload: if is_user {
            None
        } else {
            message.structured_response.as_ref().map(payload_view)
        },
    }
}

pub fn message_views(messages: &[Message]) -> Vec<MessageView> {
    messages.iter().map(message_view).collect()
}

/// Entry of the "Active Agents" side panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentCard {
    pub agent: AgentType,
    pub name: &'static str,
    pub description: &'static str,
    pub active: bool,
}

pub fn agent_directory(status: &TurnStatus) -> Vec<AgentCard> {
    AgentType::ALL
        .into_iter()
        .map(|agent| {
            let (name, description) = match agent {
                AgentType::Orchestrator => ("Orchestrator", "Query Routing"),
                AgentType::PatientAgent => ("Patient Services", "Registration & Info"),
                AgentType::AppointmentAgent => ("Appointments", "Scheduling"),
                AgentType::BillingAgent => ("Billing", "Finance & Insurance"),
                AgentType::RecordsAgent => ("Records", "Lab & Radiology"),
            };
            AgentCard {
                agent,
                name,
                description,
                active: status.active_agent == Some(agent),
            }
        })
        .collect()
}
