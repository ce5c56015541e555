//! The two model calls behind every conversation turn.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error};

use crate::agent::agent_types::{AgentResponse, AgentType, OrchestratorDecision, ParamMap};
use crate::agent::prompts::{system_prompt_for, ORCHESTRATOR_SYSTEM_PROMPT};
use crate::agent::stateless_llm::{GenerationRequest, StatelessLLMInterface};
use crate::agent::transformers::{decision_from_text, response_from_text};
use crate::config_manager::LlmConfig;
use crate::error::Result;

/// Routing + answering, as seen by the conversation controller.
///
/// Implementations substitute fallbacks for model failures themselves; an
/// `Err` here means something went wrong outside the model call and ends the
/// turn with a system error message.
#[async_trait]
pub trait TurnGateway: Send + Sync {
    async fn classify(&self, user_text: &str) -> Result<OrchestratorDecision>;

    async fn respond(
        &self,
        agent: AgentType,
        user_text: &str,
        parameters: &ParamMap,
    ) -> Result<AgentResponse>;
}

/// Gateway backed by a hosted language model.
pub struct ModelGateway {
    llm: Arc<dyn StatelessLLMInterface>,
    classify_temperature: f32,
    respond_temperature: f32,
}

impl ModelGateway {
    pub fn new(llm: Arc<dyn StatelessLLMInterface>, config: &LlmConfig) -> Self {
        Self {
            llm,
            classify_temperature: config.classify_temperature,
            respond_temperature: config.respond_temperature,
        }
    }

    /// Model output, with an empty answer read as an empty JSON object.
    async fn generate_json(&self, request: GenerationRequest) -> Result<String> {
        let text = self.llm.generate_content(request).await?;
        if text.trim().is_empty() {
            Ok("{}".to_string())
        } else {
            Ok(text)
        }
    }

    async fn try_classify(&self, user_text: &str) -> Result<OrchestratorDecision> {
        let text = self
            .generate_json(classify_request(user_text, self.classify_temperature))
            .await?;
        decision_from_text(&text)
    }

    async fn try_respond(
        &self,
        agent: AgentType,
        user_text: &str,
        parameters: &ParamMap,
    ) -> Result<AgentResponse> {
        let request = respond_request(agent, user_text, parameters, self.respond_temperature)?;
        let text = self.generate_json(request).await?;
        response_from_text(&text)
    }
}

#[async_trait]
impl TurnGateway for ModelGateway {
    async fn classify(&self, user_text: &str) -> Result<OrchestratorDecision> {
        match self.try_classify(user_text).await {
            Ok(decision) => {
                debug!(agent = %decision.agent, reason = %decision.reason, "Orchestrator decision");
                Ok(decision)
            }
            Err(e) => {
                error!("Orchestrator Error: {}", e);
                Ok(OrchestratorDecision::error_fallback())
            }
        }
    }

    async fn respond(
        &self,
        agent: AgentType,
        user_text: &str,
        parameters: &ParamMap,
    ) -> Result<AgentResponse> {
        match self.try_respond(agent, user_text, parameters).await {
            Ok(response) => Ok(response),
            Err(e) => {
                error!("Error in {}: {}", agent, e);
                Ok(AgentResponse::system_error())
            }
        }
    }
}

/// Request for the routing call.
pub fn classify_request(user_text: &str, temperature: f32) -> GenerationRequest {
    GenerationRequest {
        system_instruction: ORCHESTRATOR_SYSTEM_PROMPT.to_string(),
        contents: format!("User Query: \"{}\"", user_text),
        temperature,
    }
}

/// Request for the specialist call, embedding the orchestrator's parameters.
pub fn respond_request(
    agent: AgentType,
    user_text: &str,
    parameters: &ParamMap,
    temperature: f32,
) -> Result<GenerationRequest> {
    let params_json = serde_json::to_string(parameters)?;
    let contents = format!(
        "Context Parameters from Orchestrator: {}\n\
         User Query: \"{}\"\n\n\
         Respond strictly in the JSON format defined in your system instruction.",
        params_json, user_text
    );
    Ok(GenerationRequest {
        system_instruction: system_prompt_for(agent).to_string(),
        contents,
        temperature,
    })
}
