use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server rejected request with status {status}: {body}")]
    Server { status: u16, body: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serde JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl IngestError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IngestError::Io {
            path: path.into(),
            source,
        }
    }

    /// Short label used as the marker in console diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            IngestError::Io { .. } => "IOError",
            IngestError::Parse(_) => "ParseError",
            IngestError::Network(_) => "NetworkError",
            IngestError::Server { .. } => "ServerError",
            IngestError::Config(_) => "ConfigError",
            IngestError::Json(_) => "SerializeError",
        }
    }
}
