//! Error types for the navigator service.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavigatorError {
    #[error("No API key configured for provider {0}")]
    MissingApiKey(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Model returned no text")]
    EmptyCompletion,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Response did not match the expected schema: {0}")]
    Schema(String),

    #[error("Unsupported LLM provider: {0}")]
    UnknownProvider(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Session not found: {0}")]
    SessionNotFound(String),
}

pub type Result<T> = std::result::Result<T, NavigatorError>;
