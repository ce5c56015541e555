use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use super::stateless_llm_interface::{GenerationRequest, StatelessLLMInterface};
use crate::error::{NavigatorError, Result};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: serde_json::Value,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// OpenAI compatible LLM implementation (`/chat/completions`)
pub struct OpenAICompatibleLLM {
    provider: String,
    model: String,
    base_url: String,
    api_key: Option<String>,
    http_client: reqwest::Client,
}

impl OpenAICompatibleLLM {
    pub fn new(
        provider: String,
        model: String,
        base_url: Option<String>,
        api_key: Option<String>,
    ) -> Self {
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        info!(
            "Initialized OpenAICompatibleLLM: provider={}, model={}, base_url={}",
            provider, model, base_url
        );
        Self {
            provider,
            model,
            base_url,
            api_key,
            http_client: reqwest::Client::new(),
        }
    }

    fn build_request_body(&self, request: &GenerationRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: Some(request.system_instruction.clone()),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: Some(request.contents.clone()),
                },
            ],
            temperature: request.temperature,
            response_format: json!({ "type": "json_object" }),
        }
    }
}

#[async_trait]
impl StatelessLLMInterface for OpenAICompatibleLLM {
    async fn generate_content(&self, request: GenerationRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.build_request_body(&request);

        // Local OpenAI-compatible servers commonly run without a key.
        let mut http_req = self.http_client.post(&url).json(&body);
        if let Some(ref key) = self.api_key {
            http_req = http_req.bearer_auth(key);
        }

        let response = http_req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NavigatorError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or(NavigatorError::EmptyCompletion)?;
        Ok(choice.message.content.unwrap_or_default())
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn provider_name(&self) -> &str {
        &self.provider
    }

    fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }
}
