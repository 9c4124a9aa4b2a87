//! Test support utilities for minedock-core
//!
//! Provides MockTransport and helpers for unit testing the registry,
//! dispatcher, create workflow and log sessions without a live backend.

use async_trait::async_trait;
use minedock_client::*;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

use crate::{Notice, NoticeLevel};

/// Records which methods were called on the mock
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Request {
        method: Method,
        path: String,
        body: Option<Value>,
    },
    OpenStream {
        path: String,
    },
}

/// One scripted reply
pub enum MockReply {
    /// Resolve with this body
    Json(Value),
    /// Reject as a transport failure
    Fail,
    /// Resolve once the paired sender fires (rejects if it is dropped)
    Deferred(oneshot::Receiver<Value>),
}

type Route = (Method, String);

/// Configurable mock transport for testing
#[derive(Clone, Default)]
pub struct MockTransport {
    pub calls: Arc<Mutex<Vec<MockCall>>>,
    /// One-shot replies, consumed in order per route
    replies: Arc<Mutex<HashMap<Route, VecDeque<MockReply>>>>,
    /// Sticky replies used once the queue for a route is empty
    defaults: Arc<Mutex<HashMap<Route, Value>>>,
    /// Producer sides of every stream opened so far, oldest first
    feeds: Arc<Mutex<VecDeque<StreamFeed>>>,
    /// Whether `open_stream` should fail outright
    pub stream_error: Arc<Mutex<bool>>,
}

impl MockTransport {
    /// Create a mock that answers `[]` to GETs and `{}` to POSTs
    pub fn new() -> Self {
        Self::default()
    }

    fn route(method: Method, path: &str) -> Route {
        (method, path.to_string())
    }

    fn push(&self, method: Method, path: &str, reply: MockReply) {
        self.replies
            .lock()
            .unwrap()
            .entry(Self::route(method, path))
            .or_default()
            .push_back(reply);
    }

    /// Queue a JSON reply
    pub fn reply(&self, method: Method, path: &str, body: Value) {
        self.push(method, path, MockReply::Json(body));
    }

    /// Queue a transport failure
    pub fn fail(&self, method: Method, path: &str) {
        self.push(method, path, MockReply::Fail);
    }

    /// Queue a reply that resolves when the returned sender fires
    pub fn defer(&self, method: Method, path: &str) -> oneshot::Sender<Value> {
        let (tx, rx) = oneshot::channel();
        self.push(method, path, MockReply::Deferred(rx));
        tx
    }

    /// Set the reply used when nothing is queued for a route
    pub fn reply_always(&self, method: Method, path: &str, body: Value) {
        self.defaults
            .lock()
            .unwrap()
            .insert(Self::route(method, path), body);
    }

    /// Get all recorded calls
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Count requests made to a route
    pub fn count(&self, method: Method, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| {
                matches!(c, MockCall::Request { method: m, path: p, .. } if *m == method && p == path)
            })
            .count()
    }

    /// Count requests of any kind
    pub fn request_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, MockCall::Request { .. }))
            .count()
    }

    /// Body of the most recent request to a route
    pub fn last_body(&self, method: Method, path: &str) -> Option<Value> {
        self.calls.lock().unwrap().iter().rev().find_map(|c| match c {
            MockCall::Request {
                method: m,
                path: p,
                body,
            } if *m == method && p == path => body.clone(),
            _ => None,
        })
    }

    /// Take the producer side of the oldest stream not yet taken
    pub fn take_feed(&self) -> Option<StreamFeed> {
        self.feeds.lock().unwrap().pop_front()
    }

    /// Number of streams opened so far
    pub fn streams_opened(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, MockCall::OpenStream { .. }))
            .count()
    }

    /// Make subsequent `open_stream` calls fail
    pub fn fail_streams(&self) {
        *self.stream_error.lock().unwrap() = true;
    }

    /// Yield to the scheduler until `n` requests have been recorded
    pub async fn wait_for_requests(&self, n: usize) {
        while self.request_count() < n {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        self.calls.lock().unwrap().push(MockCall::Request {
            method,
            path: path.to_string(),
            body,
        });

        let route = Self::route(method, path);
        let queued = self
            .replies
            .lock()
            .unwrap()
            .get_mut(&route)
            .and_then(VecDeque::pop_front);

        match queued {
            Some(MockReply::Json(value)) => Ok(value),
            Some(MockReply::Fail) => Err(ClientError::Timeout),
            Some(MockReply::Deferred(rx)) => rx.await.map_err(|_| ClientError::Timeout),
            None => {
                if let Some(value) = self.defaults.lock().unwrap().get(&route) {
                    return Ok(value.clone());
                }
                Ok(match method {
                    Method::Get => json!([]),
                    Method::Post => json!({}),
                })
            }
        }
    }

    async fn open_stream(&self, path: &str) -> Result<StreamHandle> {
        self.calls.lock().unwrap().push(MockCall::OpenStream {
            path: path.to_string(),
        });

        if *self.stream_error.lock().unwrap() {
            return Err(ClientError::UnsupportedScheme("mock".to_string()));
        }

        let (handle, feed) = stream_pair();
        self.feeds.lock().unwrap().push_back(feed);
        Ok(handle)
    }
}

/// Create a container record as the backend would list it
pub fn mock_container(id: &str, name: &str, state: &str) -> Value {
    json!({
        "ID": id,
        "Name": name,
        "Image": "itzg/minecraft-server",
        "State": state,
        "Status": if state == "running" { "Up 5 minutes" } else { "Exited (0) 1 minute ago" },
    })
}

/// Drain every notice currently queued
pub fn drain_notices(rx: &mut tokio::sync::mpsc::UnboundedReceiver<Notice>) -> Vec<Notice> {
    let mut out = Vec::new();
    while let Ok(notice) = rx.try_recv() {
        out.push(notice);
    }
    out
}

/// Count notices at a given level
pub fn count_level(notices: &[Notice], level: NoticeLevel) -> usize {
    notices.iter().filter(|n| n.level == level).count()
}
