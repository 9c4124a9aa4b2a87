//! Duplex log stream plumbing
//!
//! A [`StreamHandle`] is the consumer side of a log stream: it yields
//! [`StreamEvent`]s and can be closed. The producer side is a [`StreamFeed`],
//! driven either by the websocket task in [`crate::HttpTransport`] or directly
//! by tests.

use crate::{ClientError, Result, StreamEvent};
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;
use url::Url;

/// Derive the log stream URL for `path` from the backend origin.
///
/// The stream scheme mirrors the origin's security: `http` gives `ws`,
/// `https` gives `wss`. Any other scheme is refused rather than downgraded.
pub fn stream_url(origin: &Url, path: &str) -> Result<Url> {
    let scheme = match origin.scheme() {
        "http" => "ws",
        "https" => "wss",
        other => return Err(ClientError::UnsupportedScheme(other.to_string())),
    };

    let mut url = crate::join_path(origin, path)?;
    url.set_scheme(scheme)
        .map_err(|_| ClientError::UnsupportedScheme(origin.scheme().to_string()))?;
    Ok(url)
}

/// Create a connected handle/feed pair
pub fn stream_pair() -> (StreamHandle, StreamFeed) {
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let handle = StreamHandle {
        events: events_rx,
        shutdown: Some(shutdown_tx),
    };
    let feed = StreamFeed {
        sink: EventSink {
            events: events_tx,
            closed: false,
        },
        shutdown: shutdown_rx,
        cancelled: false,
    };
    (handle, feed)
}

/// Consumer side of a log stream
///
/// Dropping the handle closes the underlying connection.
pub struct StreamHandle {
    events: mpsc::UnboundedReceiver<StreamEvent>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl StreamHandle {
    /// Wait for the next lifecycle event. `None` once the producer is gone.
    pub async fn next(&mut self) -> Option<StreamEvent> {
        self.events.recv().await
    }

    /// Ask the producer to drop the connection immediately. Idempotent.
    pub fn close(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }

    pub fn is_closed(&self) -> bool {
        self.shutdown.is_none()
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandle")
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Sends events to the handle; `Close` is sent at most once
struct EventSink {
    events: mpsc::UnboundedSender<StreamEvent>,
    closed: bool,
}

impl EventSink {
    fn send(&self, event: StreamEvent) -> bool {
        !self.closed && self.events.send(event).is_ok()
    }

    fn close(&mut self) {
        if !self.closed {
            let _ = self.events.send(StreamEvent::Close);
            self.closed = true;
        }
    }
}

/// Producer side of a log stream
pub struct StreamFeed {
    sink: EventSink,
    shutdown: oneshot::Receiver<()>,
    cancelled: bool,
}

impl StreamFeed {
    /// Report the connection as established
    pub fn open(&self) -> bool {
        self.sink.send(StreamEvent::Open)
    }

    /// Push one inbound text frame
    pub fn message(&self, text: impl Into<String>) -> bool {
        self.sink.send(StreamEvent::Message(text.into()))
    }

    /// Report the connection as closed. Only the first call emits `Close`.
    pub fn close(&mut self) {
        self.sink.close();
    }

    /// Whether the consumer closed or dropped its handle
    pub fn is_cancelled(&mut self) -> bool {
        if !self.cancelled {
            self.cancelled = !matches!(
                self.shutdown.try_recv(),
                Err(oneshot::error::TryRecvError::Empty)
            );
        }
        self.cancelled
    }
}

/// Spawn the websocket reader for `url` and return its handle
pub(crate) fn spawn_websocket(url: Url, connect_timeout: Option<Duration>) -> StreamHandle {
    let (handle, feed) = stream_pair();
    tokio::spawn(run_websocket(url, connect_timeout, feed));
    handle
}

async fn connect(
    url: &Url,
    connect_timeout: Option<Duration>,
) -> Result<
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>,
> {
    let attempt = tokio_tungstenite::connect_async(url.as_str());
    let (socket, _) = match connect_timeout {
        Some(limit) => tokio::time::timeout(limit, attempt)
            .await
            .map_err(|_| ClientError::Timeout)??,
        None => attempt.await?,
    };
    Ok(socket)
}

async fn run_websocket(url: Url, connect_timeout: Option<Duration>, feed: StreamFeed) {
    let StreamFeed {
        mut sink,
        mut shutdown,
        ..
    } = feed;

    tracing::debug!("Opening log stream {}", url);

    let connected = tokio::select! {
        _ = &mut shutdown => {
            tracing::debug!("Log stream {} closed before connecting", url);
            sink.close();
            return;
        }
        result = connect(&url, connect_timeout) => result,
    };

    let mut socket = match connected {
        Ok(socket) => socket,
        Err(e) => {
            tracing::warn!("Failed to open log stream {}: {}", url, e);
            sink.close();
            return;
        }
    };

    sink.send(StreamEvent::Open);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::debug!("Log stream {} closed locally", url);
                break;
            }
            frame = socket.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if !sink.send(StreamEvent::Message(text)) {
                        break;
                    }
                }
                Some(Ok(Message::Binary(bytes))) => {
                    let text = String::from_utf8_lossy(&bytes).into_owned();
                    if !sink.send(StreamEvent::Message(text)) {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::debug!("Log stream {} closed by server", url);
                    break;
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    tracing::warn!("Log stream {} failed: {}", url, e);
                    break;
                }
            }
        }
    }

    sink.close();
}
