use serde::{Deserialize, Serialize};

use crate::config_manager::session::SessionConfig;
use crate::config_manager::stateless_llm::LlmConfig;
use crate::config_manager::system::SystemConfig;

/// Main configuration for the application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "@context")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,

    #[serde(default)]
    pub system_config: SystemConfig,

    #[serde(default)]
    pub llm_config: LlmConfig,

    #[serde(default)]
    pub session_config: SessionConfig,
}

impl Config {
    /// Load configuration from a YAML or JSON(-LD) file
    pub fn load(path: &str) -> anyhow::Result<Self> {
        use crate::config_manager::utils::{parse_config, read_config_text};
        let content = read_config_text(path)?;
        parse_config(path, &content)
    }

    /// Try each path in order and return the first configuration that loads,
    /// along with the path it came from.
    pub fn load_first(paths: &[String]) -> Option<(Self, String)> {
        for path in paths {
            match Self::load(path) {
                Ok(cfg) => return Some((cfg, path.clone())),
                Err(e) => {
                    tracing::debug!("Failed to load config from {}: {}", path, e);
                }
            }
        }
        None
    }
}
