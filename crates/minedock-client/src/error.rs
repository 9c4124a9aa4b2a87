//! Error types for the backend transport

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Log stream error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unsupported origin scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),

    #[error("Unexpected response body (HTTP {status}): {source}")]
    Decode {
        status: u16,
        source: serde_json::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] minedock_config::ConfigError),

    #[error("Timeout waiting for connection")]
    Timeout,
}

pub type Result<T> = std::result::Result<T, ClientError>;
