//! Container registry
//!
//! Holds the client's snapshot of every container the backend knows about.
//! The snapshot is only ever replaced wholesale by a successful refresh.
//!
//! Concurrent refreshes are not coalesced: each one writes the snapshot when
//! its own response arrives, so the last response to *resolve* wins even if
//! it belongs to the older call.

use crate::{messages, CoreError, NoticeSender, Result};
use minedock_client::{paths, BackendReply, Container, ContainerId, Method, Transport};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug, Default)]
struct RegistryState {
    snapshot: Arc<Vec<Container>>,
    loading: bool,
    loaded: bool,
}

struct RegistryInner {
    transport: Arc<dyn Transport>,
    notices: NoticeSender,
    state: Mutex<RegistryState>,
}

/// Shared handle to the container snapshot
///
/// Cloning is cheap; clones see the same snapshot and loading flag.
#[derive(Clone)]
pub struct ContainerRegistry {
    inner: Arc<RegistryInner>,
}

impl ContainerRegistry {
    pub fn new(transport: Arc<dyn Transport>, notices: NoticeSender) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                transport,
                notices,
                state: Mutex::new(RegistryState::default()),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, RegistryState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// The latest completed snapshot
    pub fn snapshot(&self) -> Arc<Vec<Container>> {
        Arc::clone(&self.state().snapshot)
    }

    /// Look up a container in the current snapshot
    pub fn find(&self, id: &ContainerId) -> Option<Container> {
        self.state().snapshot.iter().find(|c| &c.id == id).cloned()
    }

    /// Whether a list or action request is in flight
    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    pub fn set_loading(&self, loading: bool) {
        self.state().loading = loading;
    }

    /// Whether any refresh has completed yet
    pub fn has_loaded(&self) -> bool {
        self.state().loaded
    }

    /// Fetch the container list without touching the snapshot
    pub async fn fetch(&self) -> Result<Vec<Container>> {
        let body = self
            .inner
            .transport
            .request(Method::Get, paths::CONTAINERS, None)
            .await?;
        parse_list(body)
    }

    /// Re-fetch the list and replace the snapshot.
    ///
    /// Returns `true` on success. On failure the previous snapshot is kept
    /// and an error notice is raised. The loading flag is cleared either way.
    pub async fn refresh(&self) -> bool {
        self.set_loading(true);
        let result = self.fetch().await;

        let mut state = self.state();
        state.loading = false;
        match result {
            Ok(containers) => {
                tracing::debug!("Container list refreshed ({} entries)", containers.len());
                state.snapshot = Arc::new(containers);
                state.loaded = true;
                true
            }
            Err(e) => {
                drop(state);
                tracing::warn!("Container list refresh failed: {}", e);
                self.inner.notices.error(messages::LIST_FAILED);
                false
            }
        }
    }

    /// Run one `refresh()` after `delay`
    pub fn schedule_refresh(&self, delay: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        tracing::debug!("Re-sync scheduled in {:?}", delay);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            registry.refresh().await;
        })
    }
}

/// Decode a `GET /containers` body
///
/// `null` is the backend's empty list. An object carrying `error` is a
/// refusal rather than a malformed list.
fn parse_list(body: Value) -> Result<Vec<Container>> {
    match body {
        Value::Null => Ok(Vec::new()),
        Value::Object(_) => match BackendReply::from_value(&body).error {
            Some(error) => Err(CoreError::Backend(error)),
            None => Ok(serde_json::from_value(body)?),
        },
        other => Ok(serde_json::from_value(other)?),
    }
}
