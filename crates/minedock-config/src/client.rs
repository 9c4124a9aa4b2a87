//! Client configuration for minedock
//!
//! Located at `~/.config/minedock/config.toml`

use crate::{ConfigError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Environment variable that overrides `server.origin`
pub const SERVER_ENV: &str = "MINEDOCK_SERVER";

/// Top-level minedock configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub server: ServerConfig,
    pub refresh: RefreshConfig,
    pub console: ConsoleConfig,
    pub ui: UiConfig,
}

/// Which backend the control panel talks to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Origin of the backend, e.g. `http://127.0.0.1:8080`.
    /// The log stream scheme (`ws`/`wss`) is derived from this.
    pub origin: String,
    /// Optional connect timeout for the log stream in seconds (0 disables)
    pub connect_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            origin: "http://127.0.0.1:8080".to_string(),
            connect_timeout_secs: 0,
        }
    }
}

/// Re-synchronization timing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RefreshConfig {
    /// Delay before re-fetching the list after a start/stop was accepted
    pub action_delay_ms: u64,
    /// Delay before re-fetching the list after a server was created
    pub create_delay_ms: u64,
    /// Periodic full refresh in the TUI (0 disables)
    pub auto_refresh_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            action_delay_ms: 1000,
            create_delay_ms: 2000,
            auto_refresh_secs: 0,
        }
    }
}

/// Log console settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Maximum number of retained log entries (0 = unbounded)
    pub max_entries: usize,
}

/// Terminal UI settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    pub tick_rate_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { tick_rate_ms: 250 }
    }
}

impl RefreshConfig {
    pub fn action_delay(&self) -> Duration {
        Duration::from_millis(self.action_delay_ms)
    }

    pub fn create_delay(&self) -> Duration {
        Duration::from_millis(self.create_delay_ms)
    }

    pub fn auto_refresh(&self) -> Option<Duration> {
        (self.auto_refresh_secs > 0).then(|| Duration::from_secs(self.auto_refresh_secs))
    }
}

impl ConsoleConfig {
    pub fn buffer_limit(&self) -> Option<usize> {
        (self.max_entries > 0).then_some(self.max_entries)
    }
}

impl ServerConfig {
    /// Parse the configured origin
    pub fn origin_url(&self) -> Result<Url> {
        let url = Url::parse(&self.origin)
            .map_err(|e| ConfigError::Invalid(format!("server.origin '{}': {}", self.origin, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::Invalid(format!(
                "server.origin must be http or https, got '{}'",
                other
            ))),
        }
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        (self.connect_timeout_secs > 0).then(|| Duration::from_secs(self.connect_timeout_secs))
    }
}

impl ClientConfig {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        tracing::debug!("Loaded config from {:?}: origin={}", path, config.server.origin);

        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "minedock").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply an origin override (CLI flag or `MINEDOCK_SERVER`)
    pub fn with_origin(mut self, origin: Option<String>) -> Self {
        if let Some(origin) = origin.filter(|o| !o.trim().is_empty()) {
            self.server.origin = origin.trim().to_string();
        }
        self
    }

    /// Check that the configuration is usable
    pub fn validate(&self) -> Result<()> {
        self.server.origin_url()?;
        Ok(())
    }
}
