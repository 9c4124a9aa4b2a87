//! Create-server workflow
//!
//! Validates the create form, flattens its environment list and posts it.
//! On success one refresh is scheduled after a longer delay than start/stop,
//! since the backend pulls the image and provisions the container first.

use crate::{messages, ContainerRegistry, CoreError, NoticeSender, Result};
use minedock_client::{paths, BackendReply, CreateRequest, Method, Transport};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// One row of the environment list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvPair {
    pub key: String,
    pub value: String,
}

impl EnvPair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Parse `KEY=VALUE`, splitting on the first `=`
    pub fn parse(s: &str) -> std::result::Result<Self, String> {
        match s.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => Ok(Self::new(key.trim(), value)),
            _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
        }
    }
}

/// Transient state of the create dialog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateForm {
    pub name: String,
    pub port: String,
    pub data_path: String,
    pub image: String,
    pub env: Vec<EnvPair>,
}

impl CreateForm {
    /// `name` and `port` are required; everything else may be left to the
    /// backend's defaults.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() || self.port.trim().is_empty() {
            return Err(CoreError::Validation(
                messages::NAME_AND_PORT_REQUIRED.to_string(),
            ));
        }
        Ok(())
    }

    /// Flatten the env list into a map.
    ///
    /// Rows with an empty key or value are skipped; a later duplicate key
    /// overwrites an earlier one.
    pub fn flatten_env(&self) -> BTreeMap<String, String> {
        let mut env = BTreeMap::new();
        for pair in &self.env {
            if pair.key.is_empty() || pair.value.is_empty() {
                continue;
            }
            env.insert(pair.key.clone(), pair.value.clone());
        }
        env
    }

    pub fn to_request(&self) -> CreateRequest {
        CreateRequest {
            name: self.name.trim().to_string(),
            port: self.port.trim().to_string(),
            data_path: self.data_path.trim().to_string(),
            image: self.image.trim().to_string(),
            env: self.flatten_env(),
        }
    }

    /// Append an empty env row and return its index
    pub fn add_env(&mut self) -> usize {
        self.env.push(EnvPair::default());
        self.env.len() - 1
    }

    pub fn remove_env(&mut self, index: usize) -> Option<EnvPair> {
        (index < self.env.len()).then(|| self.env.remove(index))
    }
}

/// Result of a submission
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Created; `refresh` completes after the re-sync ran. Close the dialog.
    Created { refresh: JoinHandle<()> },
    /// Validation failed; nothing was sent
    Invalid(String),
    /// Another submission is still in flight; nothing was sent
    Busy,
    /// Backend answered with `{error}`
    Rejected(String),
    /// The request itself failed
    Failed(String),
}

impl SubmitOutcome {
    /// Whether the dialog should close
    pub fn closes_dialog(&self) -> bool {
        matches!(self, Self::Created { .. })
    }
}

#[derive(Clone)]
pub struct CreateWorkflow {
    transport: Arc<dyn Transport>,
    registry: ContainerRegistry,
    notices: NoticeSender,
    resync_delay: Duration,
    submitting: Arc<AtomicBool>,
}

impl CreateWorkflow {
    pub fn new(
        transport: Arc<dyn Transport>,
        registry: ContainerRegistry,
        notices: NoticeSender,
        resync_delay: Duration,
    ) -> Self {
        Self {
            transport,
            registry,
            notices,
            resync_delay,
            submitting: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a create request is in flight
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    pub async fn submit(&self, form: &CreateForm) -> SubmitOutcome {
        if let Err(e) = form.validate() {
            let text = e.to_string();
            self.notices.warning(text.clone());
            return SubmitOutcome::Invalid(text);
        }

        if self.submitting.swap(true, Ordering::SeqCst) {
            self.notices.warning(messages::CREATE_IN_PROGRESS);
            return SubmitOutcome::Busy;
        }

        let request = form.to_request();
        tracing::info!("Creating server '{}' on port {}", request.name, request.port);

        let outcome = match serde_json::to_value(&request) {
            Ok(body) => self.post(body).await,
            Err(e) => SubmitOutcome::Failed(e.to_string()),
        };

        self.submitting.store(false, Ordering::SeqCst);
        outcome
    }

    async fn post(&self, body: serde_json::Value) -> SubmitOutcome {
        let reply = match self
            .transport
            .request(Method::Post, paths::CREATE, Some(body))
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("Create request failed: {}", e);
                self.notices.error(messages::REQUEST_FAILED);
                return SubmitOutcome::Failed(e.to_string());
            }
        };

        match BackendReply::from_value(&reply).into_result() {
            Err(error) => {
                self.notices.error(error.clone());
                SubmitOutcome::Rejected(error)
            }
            Ok(reply) => {
                if let Some(id) = &reply.id {
                    tracing::info!("Backend created container {}", id);
                }
                self.notices
                    .success(reply.message.unwrap_or_else(|| messages::CREATED.to_string()));
                SubmitOutcome::Created {
                    refresh: self.registry.schedule_refresh(self.resync_delay),
                }
            }
        }
    }
}
