use serde::{Deserialize, Serialize};

/// Environment variables consulted, in order, when no key is configured.
pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

/// Configuration for the hosted model used by both gateway calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_provider")]
    pub llm_provider: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Overrides the provider's default endpoint
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default, skip_serializing)]
    pub llm_api_key: Option<String>,

    /// Near-deterministic routing
    #[serde(default = "default_classify_temperature")]
    pub classify_temperature: f32,

    #[serde(default = "default_respond_temperature")]
    pub respond_temperature: f32,
}

fn default_llm_provider() -> String {
    "gemini_llm".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_classify_temperature() -> f32 {
    0.1
}

fn default_respond_temperature() -> f32 {
    0.4
}

impl LlmConfig {
    /// Resolve the credential: a usable configured key wins, otherwise the
    /// first non-empty variable from [`API_KEY_ENV_VARS`].
    pub fn resolve_api_key<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let configured = self
            .llm_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !key.starts_with("${"));
        if let Some(key) = configured {
            return Some(key.to_string());
        }

        API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
    }

    /// Fill `llm_api_key` from the process environment.
    pub fn with_env_credentials(mut self) -> Self {
        self.llm_api_key = self.resolve_api_key(|name| std::env::var(name).ok());
        self
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            llm_provider: default_llm_provider(),
            model: default_model(),
            base_url: None,
            llm_api_key: None,
            classify_temperature: default_classify_temperature(),
            respond_temperature: default_respond_temperature(),
        }
    }
}
