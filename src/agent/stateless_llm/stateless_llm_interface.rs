use async_trait::async_trait;

use crate::error::Result;

/// One single-shot generation: a system instruction plus user content. The
/// model is always asked for a JSON answer.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub system_instruction: String,
    pub contents: String,
    pub temperature: f32,
}

/// Interface for a stateless language model
/// Stateless means the LLM doesn't store memory, system prompts, or user messages
#[async_trait]
pub trait StatelessLLMInterface: Send + Sync {
    /// Run one generation and return the model's raw text output. An empty
    /// string is a valid answer.
    async fn generate_content(&self, request: GenerationRequest) -> Result<String>;

    fn model_name(&self) -> &str;

    fn provider_name(&self) -> &str;

    /// Whether a credential is available for this provider.
    fn has_credentials(&self) -> bool {
        true
    }
}
