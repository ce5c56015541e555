//! Turning raw model text into typed gateway results.

use serde_json::Value;
use tracing::warn;

use crate::agent::agent_types::{param_map_from_json, AgentResponse, AgentType, OrchestratorDecision};
use crate::error::{NavigatorError, Result};

/// Strip Markdown code-fence markers around a JSON payload.
///
/// A leading ```` ```json ```` (or bare ```` ``` ````) plus the whitespace
/// after it, and a trailing ```` ``` ```` plus the whitespace before it, are
/// removed. Text that is already clean comes back trimmed and otherwise
/// unchanged.
pub fn clean_json_string(text: &str) -> String {
    let clean = text.trim();
    let body = if let Some(rest) = clean.strip_prefix("```json") {
        rest
    } else if let Some(rest) = clean.strip_prefix("```") {
        rest
    } else {
        return clean.to_string();
    };

    let body = body.trim_start();
    let body = match body.strip_suffix("```") {
        Some(inner) => inner.trim_end(),
        None => body,
    };
    body.to_string()
}

/// Parse the orchestrator's output. Malformed JSON is an error; well-formed
/// JSON naming no known agent becomes the invalid-agent fallback.
pub fn decision_from_text(text: &str) -> Result<OrchestratorDecision> {
    let value: Value = serde_json::from_str(&clean_json_string(text))?;

    let label = value.get("agent").and_then(Value::as_str);
    let Some(agent) = label.and_then(AgentType::from_label) else {
        warn!("Orchestrator returned invalid agent {:?}", label);
        return Ok(OrchestratorDecision::invalid_agent_fallback());
    };

    let reason = value
        .get("reason")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let parameters = value
        .get("parameters")
        .map(param_map_from_json)
        .unwrap_or_default();

    Ok(OrchestratorDecision {
        agent,
        reason,
        parameters,
    })
}

/// Parse a specialist agent's output. A missing or blank `message` is a
/// schema error.
pub fn response_from_text(text: &str) -> Result<AgentResponse> {
    let value: Value = serde_json::from_str(&clean_json_string(text))?;
    let object = value
        .as_object()
        .ok_or_else(|| NavigatorError::Schema("agent response is not a JSON object".to_string()))?;

    let message = object
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| NavigatorError::Schema("agent response has no message".to_string()))?
        .to_string();

    let non_empty_str = |key: &str| {
        object
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
    };

    let next_steps = object.get("next_steps").and_then(Value::as_array).map(|steps| {
        steps
            .iter()
            .filter_map(|step| match step {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect()
    });

    let data = object
        .get("data")
        .filter(|d| d.is_object())
        .map(param_map_from_json);

    Ok(AgentResponse {
        action: non_empty_str("action"),
        message,
        next_steps,
        data,
        document_url: non_empty_str("document_url"),
    })
}
