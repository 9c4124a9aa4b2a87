//! Backend transport for minedock
//!
//! This crate wraps the two ways the control panel talks to the backend:
//! JSON request/response calls and the per-container duplex log stream.
//! It carries no business logic; callers in `minedock-core` decide what a
//! reply means.

mod error;
mod http;
mod stream;
mod types;

pub use error::*;
pub use http::HttpTransport;
pub use stream::{stream_pair, stream_url, StreamFeed, StreamHandle};
pub use types::*;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

/// HTTP method used by the backend API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        }
    }
}

/// Trait for backend transports (HTTP + websocket, mocks)
///
/// No retries or timeouts live here: failures surface as `Err` from
/// [`Transport::request`] or as a `Close` event on the stream.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a request and parse the JSON reply body
    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value>;

    /// Open the duplex stream at `path`
    ///
    /// Returns as soon as the connection attempt is under way; `Open` or
    /// `Close` arrive on the handle.
    async fn open_stream(&self, path: &str) -> Result<StreamHandle>;
}

/// Backend API paths
pub mod paths {
    use crate::{Action, ContainerId};

    pub const CONTAINERS: &str = "/containers";
    pub const CREATE: &str = "/containers/create";

    fn segment(id: &ContainerId) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(id.as_ref().as_bytes()).collect();
        // Form encoding writes a space as '+'; a literal '+' is already %2B
        encoded.replace('+', "%20")
    }

    /// `/containers/{id}/{verb}`
    pub fn action(id: &ContainerId, action: Action) -> String {
        format!("{}/{}/{}", CONTAINERS, segment(id), action)
    }

    /// `/containers/{id}/logs`
    pub fn logs(id: &ContainerId) -> String {
        format!("{}/{}/logs", CONTAINERS, segment(id))
    }
}

/// Append an absolute API path to the origin, keeping any base path
pub(crate) fn join_path(origin: &Url, path: &str) -> Result<Url> {
    let base = origin.as_str().trim_end_matches('/');
    let path = path.trim_start_matches('/');
    Ok(Url::parse(&format!("{}/{}", base, path))?)
}
