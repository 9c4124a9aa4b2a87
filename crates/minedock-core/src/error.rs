//! Error types for minedock-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(#[from] minedock_config::ConfigError),

    #[error("Transport error: {0}")]
    Client(#[from] minedock_client::ClientError),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Unexpected container list: {0}")]
    InvalidList(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
