//! Wire types exchanged with the minedock backend

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Container ID wrapper
///
/// Opaque to the client; only ever echoed back to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerId(pub String);

impl ContainerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(12) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl std::fmt::Display for ContainerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ContainerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Machine-readable container state as reported by the backend
///
/// Every variant keeps the backend's text so a record serializes back
/// exactly as it was read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContainerStatus {
    Running(String),
    /// `exited`, `stopped`, `created` or `dead`
    Stopped(String),
    /// Any other backend-defined state
    Other(String),
}

impl Default for ContainerStatus {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl ContainerStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running(_))
    }

    /// The state as the backend spelled it
    pub fn as_str(&self) -> &str {
        match self {
            Self::Running(s) | Self::Stopped(s) | Self::Other(s) => s,
        }
    }
}

impl From<&str> for ContainerStatus {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<String> for ContainerStatus {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "running" => Self::Running(s),
            "stopped" | "exited" | "created" | "dead" => Self::Stopped(s),
            _ => Self::Other(s),
        }
    }
}

impl From<ContainerStatus> for String {
    fn from(status: ContainerStatus) -> Self {
        match status {
            ContainerStatus::Running(s) | ContainerStatus::Stopped(s) | ContainerStatus::Other(s) => s,
        }
    }
}

impl std::fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A container record as listed by `GET /containers`
///
/// The backend exports capitalised keys (`ID`, `Name`, ...); both spellings
/// are accepted. Anything else is carried through untouched in `metadata`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    #[serde(alias = "ID", alias = "Id")]
    pub id: ContainerId,
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(default, alias = "Image", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, alias = "State")]
    pub state: ContainerStatus,
    /// Human readable status, e.g. "Up 3 hours"
    #[serde(default, alias = "Status", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub metadata: BTreeMap<String, Value>,
}

/// Start/stop verb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Start,
    Stop,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            _ => Err(format!("Unknown action: {}", s)),
        }
    }
}

/// Body of `POST /containers/create`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    pub name: String,
    pub port: String,
    pub data_path: String,
    pub image: String,
    pub env: BTreeMap<String, String>,
}

/// Reply to action and create requests: `{}` / `{message}` on success,
/// `{error}` when the backend refused.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendReply {
    pub error: Option<String>,
    pub message: Option<String>,
    pub id: Option<String>,
}

impl BackendReply {
    /// Interpret an arbitrary JSON body. Non-object bodies count as success.
    pub fn from_value(value: &Value) -> Self {
        let field = |key: &str| match value.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        };

        Self {
            error: field("error"),
            message: field("message"),
            id: field("id"),
        }
    }

    /// `Err(text)` if the backend reported an error
    pub fn into_result(self) -> Result<Self, String> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self),
        }
    }
}

/// Lifecycle events of a log stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Open,
    Message(String),
    Close,
}
