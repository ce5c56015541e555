use serde::{Deserialize, Serialize};

/// Per-session conversation behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// First bot message of every session; reset truncates back to it.
    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,

    /// Shown when a turn fails past the gateway fallbacks.
    #[serde(default = "default_system_error_message")]
    pub system_error_message: String,

    /// Whether a failed turn clears the highlighted agent. Off keeps the last
    /// resolved agent visible for context.
    #[serde(default)]
    pub clear_active_agent_on_error: bool,
}

fn default_welcome_message() -> String {
    "Selamat datang di Hospital System Navigator. Saya adalah Orchestrator AI. \
     Saya dapat membantu Anda dengan Pendaftaran, Janji Temu, Tagihan, atau Rekam Medis. \
     Apa yang bisa saya bantu hari ini?"
        .to_string()
}

fn default_system_error_message() -> String {
    "Maaf, terjadi kesalahan sistem. Mohon coba lagi.".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            welcome_message: default_welcome_message(),
            system_error_message: default_system_error_message(),
            clear_active_agent_on_error: false,
        }
    }
}
