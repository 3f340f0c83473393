use thiserror::Error;

pub type Result<T> = std::result::Result<T, InsightError>;

#[derive(Error, Debug)]
pub enum InsightError {
    #[error("Connection error: {0}")]
    Transport(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Empty response from completion service")]
    EmptyResponse,

    #[error("No JSON payload in completion text")]
    MissingPayload,

    #[error("Invalid JSON payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("AI completion is disabled (offline mode)")]
    Offline,

    #[error("Configuration error: {0}")]
    Config(String),
}
