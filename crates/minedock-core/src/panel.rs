//! Wiring of the control panel components

use crate::{ActionDispatcher, ContainerRegistry, CreateWorkflow, LogSession, NoticeSender, Result};
use minedock_client::{HttpTransport, Transport};
use minedock_config::ClientConfig;
use std::sync::Arc;

/// One transport shared by the registry, dispatcher, create workflow and
/// log sessions
#[derive(Clone)]
pub struct ControlPanel {
    transport: Arc<dyn Transport>,
    registry: ContainerRegistry,
    dispatcher: ActionDispatcher,
    creator: CreateWorkflow,
    console_limit: Option<usize>,
}

impl ControlPanel {
    pub fn new(transport: Arc<dyn Transport>, config: &ClientConfig, notices: NoticeSender) -> Self {
        let registry = ContainerRegistry::new(Arc::clone(&transport), notices.clone());
        let dispatcher = ActionDispatcher::new(
            Arc::clone(&transport),
            registry.clone(),
            notices.clone(),
            config.refresh.action_delay(),
        );
        let creator = CreateWorkflow::new(
            Arc::clone(&transport),
            registry.clone(),
            notices,
            config.refresh.create_delay(),
        );

        Self {
            transport,
            registry,
            dispatcher,
            creator,
            console_limit: config.console.buffer_limit(),
        }
    }

    /// Connect to the backend named in `config` over HTTP
    pub fn connect(config: &ClientConfig, notices: NoticeSender) -> Result<Self> {
        let transport = HttpTransport::from_config(&config.server)?;
        tracing::debug!("Using backend at {}", transport.origin());
        Ok(Self::new(Arc::new(transport), config, notices))
    }

    pub fn registry(&self) -> &ContainerRegistry {
        &self.registry
    }

    pub fn dispatcher(&self) -> &ActionDispatcher {
        &self.dispatcher
    }

    pub fn creator(&self) -> &CreateWorkflow {
        &self.creator
    }

    /// A fresh, idle log session on the shared transport
    pub fn log_session(&self) -> LogSession {
        LogSession::new(Arc::clone(&self.transport), self.console_limit)
    }
}
