use serde::{Deserialize, Serialize};
use serde_json::Value;
use indexmap::IndexMap;
use std::fmt;

/// The closed set of agents a turn can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentType {
    Orchestrator,
    PatientAgent,
    AppointmentAgent,
    BillingAgent,
    RecordsAgent,
}

impl AgentType {
    pub const ALL: [AgentType; 5] = [
        AgentType::Orchestrator,
        AgentType::PatientAgent,
        AgentType::AppointmentAgent,
        AgentType::BillingAgent,
        AgentType::RecordsAgent,
    ];

    /// Category used whenever the orchestrator's answer cannot be trusted.
    pub const FALLBACK: AgentType = AgentType::PatientAgent;

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::Orchestrator => "ORCHESTRATOR",
            AgentType::PatientAgent => "PATIENT_AGENT",
            AgentType::AppointmentAgent => "APPOINTMENT_AGENT",
            AgentType::BillingAgent => "BILLING_AGENT",
            AgentType::RecordsAgent => "RECORDS_AGENT",
        }
    }

    /// Exact, case-sensitive match against the wire labels.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|agent| agent.as_str() == label)
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value in a parameter or data bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl ParamValue {
    /// Coerce an arbitrary JSON value into one of the supported kinds.
    /// `null` has no representation and yields `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(ParamValue::Text(b.to_string())),
            Value::Number(n) => n.as_f64().map(ParamValue::Number),
            Value::String(s) => Some(ParamValue::Text(s.clone())),
            Value::Array(items) => Some(ParamValue::List(
                items
                    .iter()
                    .filter(|item| !item.is_null())
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
            )),
            Value::Object(_) => Some(ParamValue::Text(value.to_string())),
        }
    }
}

/// Open key/value bag produced by the model, reduced to [`ParamValue`]s.
/// Keys keep the order the model wrote them in.
pub type ParamMap = IndexMap<String, ParamValue>;

/// Convert a JSON object into a [`ParamMap`]. Non-object input yields an
/// empty map.
pub fn param_map_from_json(value: &Value) -> ParamMap {
    match value {
        Value::Object(map) => map
            .iter()
            .filter_map(|(key, value)| ParamValue::from_json(value).map(|v| (key.clone(), v)))
            .collect(),
        _ => ParamMap::new(),
    }
}

/// First-stage routing result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorDecision {
    pub agent: AgentType,
    pub reason: String,
    #[serde(default)]
    pub parameters: ParamMap,
}

impl OrchestratorDecision {
    pub const INVALID_AGENT_REASON: &'static str = "Fallback: Agent returned invalid type.";
    pub const ERROR_REASON: &'static str =
        "Error in orchestration, defaulting to Patient Services.";

    fn fallback(reason: &str) -> Self {
        Self {
            agent: AgentType::FALLBACK,
            reason: reason.to_string(),
            parameters: ParamMap::new(),
        }
    }

    /// Substitute for a decision naming an unknown agent.
    pub fn invalid_agent_fallback() -> Self {
        Self::fallback(Self::INVALID_AGENT_REASON)
    }

    /// Substitute for a failed orchestration call.
    pub fn error_fallback() -> Self {
        Self::fallback(Self::ERROR_REASON)
    }
}

/// Second-stage answer from a specialist agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_steps: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ParamMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_url: Option<String>,
}

impl AgentResponse {
    pub const SYSTEM_ERROR_MESSAGE: &'static str = "I apologize, but I encountered a system error \
         while processing your request. Please contact the administration desk directly.";

    /// Returned whenever the specialist call fails; always carries a message.
    pub fn system_error() -> Self {
        Self {
            action: None,
            message: Self::SYSTEM_ERROR_MESSAGE.to_string(),
            next_steps: Some(vec!["Contact Support".to_string()]),
            data: None,
            document_url: None,
        }
    }
}
