//! HTTP + websocket transport

use crate::stream::{spawn_websocket, stream_url};
use crate::{join_path, ClientError, Method, Result, StreamHandle, Transport};
use async_trait::async_trait;
use minedock_config::ServerConfig;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Talks to a live backend over reqwest and tokio-tungstenite
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    origin: Url,
    connect_timeout: Option<Duration>,
}

impl HttpTransport {
    /// Create a transport for the given origin (`http://` or `https://`)
    pub fn new(origin: Url) -> Result<Self> {
        match origin.scheme() {
            "http" | "https" => {}
            other => return Err(ClientError::UnsupportedScheme(other.to_string())),
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("minedock/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            origin,
            connect_timeout: None,
        })
    }

    /// Create a transport from the `[server]` config section
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let mut transport = Self::new(config.origin_url()?)?;
        transport.connect_timeout = config.connect_timeout();
        Ok(transport)
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let url = join_path(&self.origin, path)?;
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method.into(), url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        // The backend answers refusals with a JSON body and a 4xx/5xx code,
        // so the body is parsed regardless of status.
        if bytes.iter().all(u8::is_ascii_whitespace) {
            tracing::debug!("{} {} -> {} (empty body)", method, path, status);
            return Ok(Value::Object(Default::default()));
        }

        let value = serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode {
            status: status.as_u16(),
            source: e,
        })?;
        tracing::debug!("{} {} -> {}", method, path, status);
        Ok(value)
    }

    async fn open_stream(&self, path: &str) -> Result<StreamHandle> {
        let url = stream_url(&self.origin, path)?;
        Ok(spawn_websocket(url, self.connect_timeout))
    }
}
