//! Live log session for one container
//!
//! The session owns at most one stream at a time and moves through
//! `Idle -> Connecting -> Streaming -> Closed`. Inbound frames are classified
//! into styled [`LogEntry`]s and appended to a buffer; after each append the
//! [`LogViewport`] is told to follow the newest entry.

use minedock_client::{paths, ContainerId, StreamEvent, StreamHandle, Transport};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;

pub const CONNECTED_TEXT: &str = ">>> connected <<<";
pub const DISCONNECTED_TEXT: &str = ">>> disconnected <<<";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Connecting,
    Streaming,
    Closed,
}

impl SessionState {
    /// Connecting or streaming
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Connecting | Self::Streaming)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStyle {
    Success,
    Info,
    Neutral,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub text: String,
    pub style: LogStyle,
}

impl LogEntry {
    pub fn new(text: impl Into<String>, style: LogStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Display-side hook run after every committed entry
pub trait LogViewport {
    /// `len` is the buffer length including the entry just appended
    fn scroll_to_latest(&mut self, len: usize);
}

impl LogViewport for () {
    fn scroll_to_latest(&mut self, _len: usize) {}
}

/// Turn one inbound frame into a styled entry.
///
/// Frames are expected as a JSON object `{"type": ..., "content": ...}`.
/// Anything else, arrays and scalars included, is kept verbatim with the
/// neutral style.
pub fn classify_frame(frame: &str) -> LogEntry {
    let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(frame) else {
        return LogEntry::new(frame, LogStyle::Neutral);
    };
    let is_error = fields.get("type").and_then(Value::as_str) == Some("error");

    match fields.get("content").and_then(Value::as_str) {
        Some(content) => {
            let text = content.trim_end_matches(['\r', '\n']).to_string();
            let style = if is_error {
                LogStyle::Error
            } else if text.contains("INFO") {
                LogStyle::Info
            } else {
                LogStyle::Neutral
            };
            LogEntry { text, style }
        }
        None if is_error => LogEntry::new(frame, LogStyle::Error),
        None => LogEntry::new(frame, LogStyle::Neutral),
    }
}

/// Log console state
pub struct LogSession {
    transport: Arc<dyn Transport>,
    state: SessionState,
    visible: bool,
    container: Option<ContainerId>,
    entries: VecDeque<LogEntry>,
    limit: Option<usize>,
    handle: Option<StreamHandle>,
}

impl LogSession {
    /// `limit` caps the buffer; older entries are evicted first
    pub fn new(transport: Arc<dyn Transport>, limit: Option<usize>) -> Self {
        Self {
            transport,
            state: SessionState::Idle,
            visible: false,
            container: None,
            entries: VecDeque::new(),
            limit,
            handle: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn container(&self) -> Option<&ContainerId> {
        self.container.as_ref()
    }

    pub fn entries(&self) -> &VecDeque<LogEntry> {
        &self.entries
    }

    /// Start streaming logs for `id`, replacing any previous session
    pub async fn open(&mut self, id: &ContainerId, viewport: &mut dyn LogViewport) {
        if let Some(mut previous) = self.handle.take() {
            tracing::debug!("Dropping previous log stream before reopening");
            previous.close();
        }

        self.entries.clear();
        self.visible = true;
        self.state = SessionState::Connecting;
        self.container = Some(id.clone());
        tracing::info!("Opening log stream for {}", id.short());

        match self.transport.open_stream(&paths::logs(id)).await {
            Ok(handle) => self.handle = Some(handle),
            Err(e) => {
                tracing::warn!("Log stream for {} failed: {}", id.short(), e);
                self.disconnect(viewport);
            }
        }
    }

    /// Next lifecycle event of the current stream.
    ///
    /// Never resolves while there is no stream, so it can sit in a
    /// `select!` next to other event sources.
    pub async fn next_event(&mut self) -> StreamEvent {
        match self.handle.as_mut() {
            Some(handle) => handle.next().await.unwrap_or(StreamEvent::Close),
            None => std::future::pending().await,
        }
    }

    /// Apply a stream event and return the entry it appended, if any
    pub fn apply(
        &mut self,
        event: StreamEvent,
        viewport: &mut dyn LogViewport,
    ) -> Option<&LogEntry> {
        match event {
            StreamEvent::Open if self.state == SessionState::Connecting => {
                self.state = SessionState::Streaming;
                self.push(LogEntry::new(CONNECTED_TEXT, LogStyle::Success), viewport)
            }
            StreamEvent::Message(frame) if self.state.is_live() => {
                self.push(classify_frame(&frame), viewport)
            }
            StreamEvent::Close if self.state.is_live() => self.disconnect(viewport),
            event => {
                tracing::debug!("Ignoring {:?} in state {:?}", event, self.state);
                None
            }
        }
    }

    /// Hide the console and drop the connection. Safe to call repeatedly.
    pub fn close(&mut self, viewport: &mut dyn LogViewport) {
        self.visible = false;
        if self.state.is_live() {
            self.disconnect(viewport);
        }
    }

    fn disconnect(&mut self, viewport: &mut dyn LogViewport) -> Option<&LogEntry> {
        if let Some(mut handle) = self.handle.take() {
            handle.close();
        }
        self.state = SessionState::Closed;
        if let Some(id) = &self.container {
            tracing::info!("Log stream for {} closed", id.short());
        }
        self.push(LogEntry::new(DISCONNECTED_TEXT, LogStyle::Warning), viewport)
    }

    fn push(&mut self, entry: LogEntry, viewport: &mut dyn LogViewport) -> Option<&LogEntry> {
        self.entries.push_back(entry);
        if let Some(limit) = self.limit {
            while self.entries.len() > limit.max(1) {
                self.entries.pop_front();
            }
        }
        viewport.scroll_to_latest(self.entries.len());
        self.entries.back()
    }
}

impl Drop for LogSession {
    fn drop(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockTransport;
    use minedock_client::StreamFeed;
    use std::time::Duration;

    #[derive(Default)]
    struct Recorder {
        scrolls: Vec<usize>,
    }

    impl LogViewport for Recorder {
        fn scroll_to_latest(&mut self, len: usize) {
            self.scrolls.push(len);
        }
    }

    fn session() -> (MockTransport, LogSession) {
        let mock = MockTransport::new();
        let session = LogSession::new(Arc::new(mock.clone()), None);
        (mock, session)
    }

    async fn opened(id: &str) -> (MockTransport, LogSession, StreamFeed, Recorder) {
        let (mock, mut session) = session();
        let mut view = Recorder::default();
        session.open(&ContainerId::new(id), &mut view).await;
        let feed = mock.take_feed().unwrap();
        (mock, session, feed, view)
    }

    async fn pump(session: &mut LogSession, view: &mut Recorder) {
        let event = session.next_event().await;
        session.apply(event, view);
    }

    fn texts(session: &LogSession) -> Vec<&str> {
        session.entries().iter().map(|e| e.text.as_str()).collect()
    }

    #[test]
    fn test_classify_error_type() {
        let entry = classify_frame(r#"{"type":"error","content":"boom"}"#);
        assert_eq!(entry, LogEntry::new("boom", LogStyle::Error));
    }

    #[test]
    fn test_classify_error_type_beats_info() {
        let entry = classify_frame(r#"{"type":"error","content":"[INFO] not really"}"#);
        assert_eq!(entry.style, LogStyle::Error);
    }

    #[test]
    fn test_classify_info_content() {
        let entry = classify_frame(
            r#"{"type":"info","content":"[12:00:01] [Server thread/INFO]: Done (3.2s)!\r\n"}"#,
        );
        assert_eq!(entry.style, LogStyle::Info);
        assert_eq!(entry.text, "[12:00:01] [Server thread/INFO]: Done (3.2s)!");
    }

    #[test]
    fn test_classify_neutral_content() {
        let entry = classify_frame(r#"{"type":"info","content":"[Server thread/WARN]: lag"}"#);
        assert_eq!(entry.style, LogStyle::Neutral);
    }

    #[test]
    fn test_classify_plain_text_kept_verbatim() {
        let entry = classify_frame("hello world\r\n");
        assert_eq!(entry, LogEntry::new("hello world\r\n", LogStyle::Neutral));
    }

    #[test]
    fn test_classify_non_object_json_kept_verbatim() {
        let array = classify_frame(r#"["error","boom"]"#);
        assert_eq!(array, LogEntry::new(r#"["error","boom"]"#, LogStyle::Neutral));

        for scalar in ["42", r#""error""#, "null", "true"] {
            assert_eq!(classify_frame(scalar), LogEntry::new(scalar, LogStyle::Neutral));
        }
    }

    #[test]
    fn test_classify_non_string_content_uses_raw_frame() {
        let entry = classify_frame(r#"{"type":"error","content":7}"#);
        assert_eq!(entry, LogEntry::new(r#"{"type":"error","content":7}"#, LogStyle::Error));
    }

    #[test]
    fn test_classify_malformed_json_kept_verbatim() {
        let entry = classify_frame(r#"{"type":"error","content":"#);
        assert_eq!(entry.text, r#"{"type":"error","content":"#);
        assert_eq!(entry.style, LogStyle::Neutral);
    }

    #[test]
    fn test_classify_missing_content() {
        let error = classify_frame(r#"{"type":"error"}"#);
        assert_eq!(error, LogEntry::new(r#"{"type":"error"}"#, LogStyle::Error));

        let other = classify_frame(r#"{"type":"info"}"#);
        assert_eq!(other.style, LogStyle::Neutral);
        assert_eq!(other.text, r#"{"type":"info"}"#);
    }

    #[tokio::test]
    async fn test_lifecycle() {
        let (mock, mut session, mut feed, mut view) = opened("abc").await;
        assert_eq!(session.state(), SessionState::Connecting);
        assert!(session.is_visible());
        assert_eq!(
            mock.get_calls()[0],
            crate::test_support::MockCall::OpenStream {
                path: "/containers/abc/logs".to_string()
            }
        );

        feed.open();
        pump(&mut session, &mut view).await;
        assert_eq!(session.state(), SessionState::Streaming);

        feed.message(r#"{"type":"info","content":"[INFO] Starting"}"#);
        feed.message("raw line");
        pump(&mut session, &mut view).await;
        pump(&mut session, &mut view).await;

        feed.close();
        pump(&mut session, &mut view).await;
        assert_eq!(session.state(), SessionState::Closed);

        assert_eq!(
            texts(&session),
            vec![CONNECTED_TEXT, "[INFO] Starting", "raw line", DISCONNECTED_TEXT]
        );
        let styles: Vec<LogStyle> = session.entries().iter().map(|e| e.style).collect();
        assert_eq!(
            styles,
            vec![
                LogStyle::Success,
                LogStyle::Info,
                LogStyle::Neutral,
                LogStyle::Warning
            ]
        );
    }

    #[tokio::test]
    async fn test_scroll_once_per_entry_after_commit() {
        let (_mock, mut session, feed, mut view) = opened("abc").await;
        feed.open();
        feed.message("one");
        feed.message("two");
        for _ in 0..3 {
            pump(&mut session, &mut view).await;
        }
        session.close(&mut view);

        assert_eq!(view.scrolls, vec![1, 2, 3, 4]);
        assert_eq!(session.entries().len(), 4);
    }

    #[tokio::test]
    async fn test_reopen_clears_buffer_and_closes_previous_stream() {
        let (mock, mut session, mut first, mut view) = opened("aaa").await;
        first.open();
        first.message("from aaa");
        pump(&mut session, &mut view).await;
        pump(&mut session, &mut view).await;
        assert_eq!(session.entries().len(), 2);

        session.open(&ContainerId::new("bbb"), &mut view).await;
        assert!(first.is_cancelled());
        assert!(session.entries().is_empty());
        assert_eq!(session.state(), SessionState::Connecting);
        assert_eq!(session.container(), Some(&ContainerId::new("bbb")));

        // Late frames from the old stream never reach the new buffer
        first.message("late from aaa");
        let second = mock.take_feed().unwrap();
        second.open();
        pump(&mut session, &mut view).await;
        assert_eq!(texts(&session), vec![CONNECTED_TEXT]);
        assert_eq!(mock.streams_opened(), 2);
    }

    #[tokio::test]
    async fn test_double_close_is_noop() {
        let (_mock, mut session, mut feed, mut view) = opened("abc").await;
        feed.open();
        pump(&mut session, &mut view).await;

        session.close(&mut view);
        assert!(feed.is_cancelled());
        assert!(!session.is_visible());
        assert_eq!(session.state(), SessionState::Closed);
        let after_first = view.scrolls.len();

        session.close(&mut view);
        assert_eq!(view.scrolls.len(), after_first);
        assert_eq!(texts(&session), vec![CONNECTED_TEXT, DISCONNECTED_TEXT]);
    }

    #[tokio::test]
    async fn test_remote_close_then_explicit_close() {
        let (_mock, mut session, mut feed, mut view) = opened("abc").await;
        feed.open();
        feed.close();
        pump(&mut session, &mut view).await;
        pump(&mut session, &mut view).await;

        session.close(&mut view);
        let disconnects = session
            .entries()
            .iter()
            .filter(|e| e.text == DISCONNECTED_TEXT)
            .count();
        assert_eq!(disconnects, 1);
    }

    #[tokio::test]
    async fn test_dropped_feed_counts_as_close() {
        let (_mock, mut session, feed, mut view) = opened("abc").await;
        drop(feed);
        pump(&mut session, &mut view).await;
        assert_eq!(session.state(), SessionState::Closed);
        assert_eq!(texts(&session), vec![DISCONNECTED_TEXT]);
    }

    #[tokio::test]
    async fn test_close_while_idle_is_noop() {
        let (_mock, mut session) = session();
        let mut view = Recorder::default();
        session.close(&mut view);
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.entries().is_empty());
        assert!(view.scrolls.is_empty());
    }

    #[tokio::test]
    async fn test_open_stream_failure() {
        let (mock, mut session) = session();
        mock.fail_streams();
        let mut view = Recorder::default();

        session.open(&ContainerId::new("abc"), &mut view).await;
        assert_eq!(session.state(), SessionState::Closed);
        assert!(session.is_visible());
        assert_eq!(texts(&session), vec![DISCONNECTED_TEXT]);
        assert_eq!(view.scrolls, vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_event_pends_without_stream() {
        let (_mock, mut session) = session();
        let waited = tokio::time::timeout(Duration::from_millis(50), session.next_event()).await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn test_buffer_limit_evicts_oldest() {
        let mock = MockTransport::new();
        let mut session = LogSession::new(Arc::new(mock.clone()), Some(2));
        let mut view = Recorder::default();
        session.open(&ContainerId::new("abc"), &mut view).await;
        let feed = mock.take_feed().unwrap();

        feed.open();
        feed.message("one");
        feed.message("two");
        for _ in 0..3 {
            pump(&mut session, &mut view).await;
        }
        assert_eq!(texts(&session), vec!["one", "two"]);
        assert_eq!(view.scrolls, vec![1, 2, 2]);
    }

    #[tokio::test]
    async fn test_apply_returns_appended_entry() {
        let (_mock, mut session, feed, mut view) = opened("abc").await;
        feed.open();
        let event = session.next_event().await;
        let entry = session.apply(event, &mut view).cloned();
        assert_eq!(entry, Some(LogEntry::new(CONNECTED_TEXT, LogStyle::Success)));

        // Events after close are ignored
        session.close(&mut view);
        assert!(session
            .apply(StreamEvent::Message("late".into()), &mut view)
            .is_none());
    }
}
