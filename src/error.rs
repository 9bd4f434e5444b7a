use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Unparseable page: {0}")]
    Unparseable(String),

    #[error("Invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed snapshot {path}: {reason}")]
    Snapshot { path: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ScoutError>;
