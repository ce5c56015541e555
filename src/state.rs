use std::sync::Arc;
use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

use crate::agent::{ModelGateway, StatelessLLMFactory, TurnGateway};
use crate::config_manager::Config;
use crate::conversations::ConversationController;
use crate::error::{NavigatorError, Result};
use crate::presentation::TranscriptRenderer;

/// What `/api/health` reports about the configured model.
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub provider: String,
    pub model: String,
    pub credential_configured: bool,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub gateway: Arc<dyn TurnGateway>,
    pub model_info: ModelInfo,
    pub sessions: Arc<DashMap<String, Arc<ConversationController>>>,
    pub renderer: Arc<TranscriptRenderer>,
}

impl AppState {
    /// Build the model-backed gateway described by `config.llm_config`.
    pub fn new(config: Config) -> Result<Self> {
        let llm = StatelessLLMFactory::create_llm(&config.llm_config)?;
        let model_info = ModelInfo {
            provider: llm.provider_name().to_string(),
            model: llm.model_name().to_string(),
            credential_configured: llm.has_credentials(),
        };
        let gateway = Arc::new(ModelGateway::new(llm, &config.llm_config));
        Self::with_gateway(config, gateway, model_info)
    }

    /// Use a caller-supplied gateway, e.g. a scripted one.
    pub fn with_gateway(
        config: Config,
        gateway: Arc<dyn TurnGateway>,
        model_info: ModelInfo,
    ) -> Result<Self> {
        Ok(Self {
            config,
            gateway,
            model_info,
            sessions: Arc::new(DashMap::new()),
            renderer: Arc::new(TranscriptRenderer::new()?),
        })
    }

    pub fn generate_session_id(&self) -> String {
        Uuid::new_v4().to_string()
    }

    pub fn create_session(&self) -> Arc<ConversationController> {
        let session_id = self.generate_session_id();
        let controller = Arc::new(ConversationController::new(
            session_id.clone(),
            self.gateway.clone(),
            self.config.session_config.clone(),
        ));
        self.sessions.insert(session_id.clone(), controller.clone());
        info!("Created session {}", session_id);
        controller
    }

    pub fn get_session(&self, session_id: &str) -> Result<Arc<ConversationController>> {
        self.sessions
            .get(session_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| NavigatorError::SessionNotFound(session_id.to_string()))
    }

    pub fn remove_session(&self, session_id: &str) -> Result<()> {
        self.sessions
            .remove(session_id)
            .map(|_| info!("Removed session {}", session_id))
            .ok_or_else(|| NavigatorError::SessionNotFound(session_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sessions_are_created_looked_up_and_removed() {
        let state = AppState::new(Config::default()).unwrap();
        assert_eq!(state.model_info.provider, "gemini_llm");

        let session = state.create_session();
        let id = session.session_id().to_string();
        assert_eq!(state.get_session(&id).unwrap().session_id(), id);
        assert_eq!(session.messages().len(), 1);

        state.remove_session(&id).unwrap();
        assert!(matches!(
            state.get_session(&id),
            Err(NavigatorError::SessionNotFound(_))
        ));
        assert!(state.remove_session(&id).is_err());
    }

    #[test]
    fn unknown_provider_fails_construction() {
        let mut config = Config::default();
        config.llm_config.llm_provider = "nope".to_string();
        assert!(AppState::new(config).is_err());
    }
}
