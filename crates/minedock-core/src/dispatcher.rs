//! Start/stop dispatch
//!
//! Sends a verb for one container, reports the outcome, and on success
//! schedules exactly one delayed refresh of the registry. The delay absorbs
//! the backend's start/stop latency; there is no polling until the state
//! actually changes.

use crate::{messages, ContainerRegistry, NoticeSender};
use minedock_client::{paths, Action, BackendReply, ContainerId, Method, Transport};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Result of a dispatched action
#[derive(Debug)]
pub enum DispatchOutcome {
    /// Backend accepted the verb; `refresh` completes after the re-sync ran
    Sent { refresh: JoinHandle<()> },
    /// Backend answered with `{error}`
    Rejected(String),
    /// The request itself failed
    Failed(String),
}

impl DispatchOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }
}

#[derive(Clone)]
pub struct ActionDispatcher {
    transport: Arc<dyn Transport>,
    registry: ContainerRegistry,
    notices: NoticeSender,
    resync_delay: Duration,
}

impl ActionDispatcher {
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
        }
    }

    /// Send `action` for `id`
    pub async fn dispatch(&self, id: &ContainerId, action: Action) -> DispatchOutcome {
        self.registry.set_loading(true);
        tracing::info!("Sending {} to container {}", action, id.short());

        let path = paths::action(id, action);
        let body = match self.transport.request(Method::Post, &path, None).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("{} {} failed: {}", action, id.short(), e);
                self.registry.set_loading(false);
                self.notices.error(messages::REQUEST_FAILED);
                return DispatchOutcome::Failed(e.to_string());
            }
        };

        match BackendReply::from_value(&body).into_result() {
            Err(error) => {
                self.registry.set_loading(false);
                self.notices.error(error.clone());
                DispatchOutcome::Rejected(error)
            }
            Ok(reply) => {
                let ack = match action {
                    Action::Start => messages::START_SENT,
                    Action::Stop => messages::STOP_SENT,
                };
                self.notices
                    .success(reply.message.unwrap_or_else(|| ack.to_string()));

                // Loading stays set until the scheduled refresh clears it
                DispatchOutcome::Sent {
                    refresh: self.registry.schedule_refresh(self.resync_delay),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use crate::{notice_channel, Notice, NoticeLevel};
    use serde_json::json;
    use tokio::sync::mpsc::UnboundedReceiver;
    use tokio::time::Instant;

    const DELAY: Duration = Duration::from_millis(1000);

    fn setup() -> (
        MockTransport,
        ContainerRegistry,
        ActionDispatcher,
        UnboundedReceiver<Notice>,
    ) {
        let mock = MockTransport::new();
        let transport: Arc<dyn Transport> = Arc::new(mock.clone());
        let (notices, rx) = notice_channel();
        let registry = ContainerRegistry::new(Arc::clone(&transport), notices.clone());
        let dispatcher = ActionDispatcher::new(transport, registry.clone(), notices, DELAY);
        (mock, registry, dispatcher, rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_success_schedules_one_refresh() {
        let (mock, registry, dispatcher, mut rx) = setup();
        let id = ContainerId::new("abc");
        mock.reply(Method::Post, "/containers/abc/start", json!({}));
        mock.reply(
            Method::Get,
            paths::CONTAINERS,
            json!([mock_container("abc", "survival", "running")]),
        );

        let start = Instant::now();
        let outcome = dispatcher.dispatch(&id, Action::Start).await;
        assert!(registry.is_loading());

        let refresh = match outcome {
            DispatchOutcome::Sent { refresh } => refresh,
            other => panic!("expected Sent, got {:?}", other),
        };

        // Nothing happens before the delay
        tokio::time::sleep(DELAY - Duration::from_millis(1)).await;
        assert_eq!(mock.count(Method::Get, paths::CONTAINERS), 0);

        refresh.await.unwrap();
        assert!(start.elapsed() >= DELAY);
        assert_eq!(mock.count(Method::Get, paths::CONTAINERS), 1);
        assert!(registry.snapshot()[0].state.is_running());
        assert!(!registry.is_loading());

        // Exactly one refresh, ever
        tokio::time::sleep(DELAY * 10).await;
        assert_eq!(mock.count(Method::Get, paths::CONTAINERS), 1);

        let notices = drain_notices(&mut rx);
        assert_eq!(count_level(&notices, NoticeLevel::Error), 0);
        assert_eq!(count_level(&notices, NoticeLevel::Success), 1);
        assert_eq!(notices[0].text, messages::START_SENT);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_rejected_reports_backend_text() {
        let (mock, registry, dispatcher, mut rx) = setup();
        let id = ContainerId::new("abc");
        mock.reply(
            Method::Post,
            "/containers/abc/stop",
            json!({"error": "container abc is not running"}),
        );

        let outcome = dispatcher.dispatch(&id, Action::Stop).await;
        assert!(
            matches!(&outcome, DispatchOutcome::Rejected(e) if e == "container abc is not running")
        );
        assert!(!registry.is_loading());

        tokio::time::sleep(DELAY * 5).await;
        assert_eq!(mock.count(Method::Get, paths::CONTAINERS), 0);

        let notices = drain_notices(&mut rx);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].text, "container abc is not running");
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failure_is_generic() {
        let (mock, registry, dispatcher, mut rx) = setup();
        let id = ContainerId::new("abc");
        mock.fail(Method::Post, "/containers/abc/start");

        let outcome = dispatcher.dispatch(&id, Action::Start).await;
        assert!(matches!(outcome, DispatchOutcome::Failed(_)));
        assert!(!registry.is_loading());

        tokio::time::sleep(DELAY * 5).await;
        assert_eq!(mock.count(Method::Get, paths::CONTAINERS), 0);

        let notices = drain_notices(&mut rx);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].text, messages::REQUEST_FAILED);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backend_message_used_for_ack() {
        let (mock, _registry, dispatcher, mut rx) = setup();
        let id = ContainerId::new("abc");
        mock.reply(
            Method::Post,
            "/containers/abc/stop",
            json!({"message": "Container stopped"}),
        );

        let outcome = dispatcher.dispatch(&id, Action::Stop).await;
        assert!(outcome.is_sent());

        let notices = drain_notices(&mut rx);
        assert_eq!(notices[0].level, NoticeLevel::Success);
        assert_eq!(notices[0].text, "Container stopped");
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_has_no_body() {
        let (mock, _registry, dispatcher, _rx) = setup();
        dispatcher
            .dispatch(&ContainerId::new("abc"), Action::Start)
            .await;
        assert_eq!(
            mock.get_calls()[0],
            MockCall::Request {
                method: Method::Post,
                path: "/containers/abc/start".to_string(),
                body: None,
            }
        );
    }
}
