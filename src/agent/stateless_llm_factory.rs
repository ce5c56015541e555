use std::sync::Arc;
use tracing::info;

use crate::agent::stateless_llm::{GeminiLLM, OpenAICompatibleLLM, StatelessLLMInterface};
use crate::config_manager::LlmConfig;
use crate::error::{NavigatorError, Result};

/// Factory for creating stateless LLM instances
pub struct StatelessLLMFactory;

impl StatelessLLMFactory {
    /// Create an LLM based on the configuration.
    ///
    /// The credential is taken from `config.llm_api_key` as-is; a missing key
    /// is not an error here, the calls themselves fail and the gateway falls
    /// back.
    pub fn create_llm(config: &LlmConfig) -> Result<Arc<dyn StatelessLLMInterface>> {
        info!("Initializing LLM: {}", config.llm_provider);

        match config.llm_provider.as_str() {
            "gemini_llm" => Ok(Arc::new(GeminiLLM::new(
                config.model.clone(),
                config.base_url.clone(),
                config.llm_api_key.clone(),
            ))),
            "openai_compatible_llm" | "openai_llm" | "deepseek_llm" | "groq_llm"
            | "mistral_llm" => Ok(Arc::new(OpenAICompatibleLLM::new(
                config.llm_provider.clone(),
                config.model.clone(),
                config.base_url.clone(),
                config.llm_api_key.clone(),
            ))),
            other => Err(NavigatorError::UnknownProvider(other.to_string())),
        }
    }
}
