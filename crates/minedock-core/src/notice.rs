//! User-visible notices
//!
//! The only reporting channel towards the user: the TUI renders them in its
//! status bar, the CLI prints them. Each notice is mirrored to `tracing`.

use chrono::{DateTime, Local};
use tokio::sync::mpsc;

/// Standard notice texts
pub mod messages {
    pub const LIST_FAILED: &str = "Failed to load container list";
    pub const START_SENT: &str = "Start command sent";
    pub const STOP_SENT: &str = "Stop command sent";
    pub const REQUEST_FAILED: &str = "Request failed";
    pub const CREATED: &str = "Server created";
    pub const NAME_AND_PORT_REQUIRED: &str = "Name and port are required";
    pub const CREATE_IN_PROGRESS: &str = "A server is already being created";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
    pub at: DateTime<Local>,
}

/// Cloneable sending side of the notice channel
///
/// Sending after the receiver is gone is silently ignored.
#[derive(Debug, Clone, Default)]
pub struct NoticeSender {
    tx: Option<mpsc::UnboundedSender<Notice>>,
}

/// Create a notice channel
pub fn notice_channel() -> (NoticeSender, mpsc::UnboundedReceiver<Notice>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (NoticeSender { tx: Some(tx) }, rx)
}

impl NoticeSender {
    /// A sender that only logs
    pub fn detached() -> Self {
        Self { tx: None }
    }

    pub fn success(&self, text: impl Into<String>) {
        self.send(NoticeLevel::Success, text.into());
    }

    pub fn warning(&self, text: impl Into<String>) {
        self.send(NoticeLevel::Warning, text.into());
    }

    pub fn error(&self, text: impl Into<String>) {
        self.send(NoticeLevel::Error, text.into());
    }

    fn send(&self, level: NoticeLevel, text: String) {
        match level {
            NoticeLevel::Success => tracing::info!("{}", text),
            NoticeLevel::Warning => tracing::warn!("{}", text),
            NoticeLevel::Error => tracing::error!("{}", text),
        }

        if let Some(tx) = &self.tx {
            let _ = tx.send(Notice {
                level,
                text,
                at: Local::now(),
            });
        }
    }
}
