//! Main TUI application state and logic

use crate::event::{Event, EventHandler};
use crate::form::CreateFormState;
use crate::ui;
use crossterm::event::{KeyCode, KeyModifiers};
use minedock_client::{Action, Container, StreamEvent};
use minedock_config::ClientConfig;
use minedock_core::{ControlPanel, LogSession, LogViewport, Notice, SubmitOutcome};
use ratatui::prelude::*;
use ratatui::widgets::TableState;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Core error: {0}")]
    Core(#[from] minedock_core::CoreError),
}

pub type AppResult<T> = Result<T, AppError>;

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Container list
    Main,
    /// Live log console of one container
    Console,
    /// Create-server dialog
    Create,
    Help,
}

/// Scroll position of the console
///
/// While `follow` is set the newest entries stay in view; scrolling up
/// releases it and `G` re-engages it.
#[derive(Debug, Clone)]
pub struct ConsoleView {
    /// First visible entry when not following
    pub scroll: usize,
    pub follow: bool,
    /// Visible rows, updated on every draw
    pub page: usize,
}

impl Default for ConsoleView {
    fn default() -> Self {
        Self {
            scroll: 0,
            follow: true,
            page: 20,
        }
    }
}

impl ConsoleView {
    /// First visible entry for a buffer of `len` entries
    pub fn offset(&self, len: usize) -> usize {
        if self.follow {
            len.saturating_sub(self.page)
        } else {
            self.scroll.min(len.saturating_sub(1))
        }
    }

    fn scroll_up(&mut self, lines: usize, len: usize) {
        if self.follow {
            self.scroll = len.saturating_sub(self.page);
            self.follow = false;
        }
        self.scroll = self.scroll.saturating_sub(lines);
    }

    fn scroll_down(&mut self, lines: usize, len: usize) {
        if self.follow {
            return;
        }
        let bottom = len.saturating_sub(self.page);
        self.scroll = (self.scroll + lines).min(bottom);
        if self.scroll >= bottom {
            self.follow = true;
        }
    }

    fn top(&mut self) {
        self.follow = false;
        self.scroll = 0;
    }

    fn follow_latest(&mut self, len: usize) {
        self.follow = true;
        self.scroll = len.saturating_sub(self.page);
    }
}

impl LogViewport for ConsoleView {
    fn scroll_to_latest(&mut self, len: usize) {
        if self.follow {
            self.scroll = len.saturating_sub(self.page);
        }
    }
}

/// Application state
pub struct App {
    pub panel: ControlPanel,
    pub config: ClientConfig,
    pub view: View,
    /// Last snapshot pulled from the registry
    pub containers: Arc<Vec<Container>>,
    pub selected: usize,
    pub containers_table_state: TableState,
    pub session: LogSession,
    pub console: ConsoleView,
    pub form: CreateFormState,
    /// Most recent notice, shown in the footer
    pub status: Option<Notice>,
    pub should_quit: bool,
    /// Tick counter for the spinner
    pub tick: usize,
    notices: mpsc::UnboundedReceiver<Notice>,
    submit_rx: Option<oneshot::Receiver<SubmitOutcome>>,
    last_refresh: Instant,
}

impl App {
    pub fn new(
        panel: ControlPanel,
        config: ClientConfig,
        notices: mpsc::UnboundedReceiver<Notice>,
    ) -> Self {
        let session = panel.log_session();
        Self {
            panel,
            config,
            view: View::Main,
            containers: Arc::new(Vec::new()),
            selected: 0,
            containers_table_state: TableState::default(),
            session,
            console: ConsoleView::default(),
            form: CreateFormState::default(),
            status: None,
            should_quit: false,
            tick: 0,
            notices,
            submit_rx: None,
            last_refresh: Instant::now(),
        }
    }

    /// App wired to a [`MockTransport`](minedock_core::test_support::MockTransport)
    #[cfg(any(test, feature = "test-support"))]
    pub fn new_for_testing() -> (Self, minedock_core::test_support::MockTransport) {
        let mock = minedock_core::test_support::MockTransport::new();
        let config = ClientConfig::default();
        let (notices, rx) = minedock_core::notice_channel();
        let panel = ControlPanel::new(Arc::new(mock.clone()), &config, notices);
        (Self::new(panel, config, rx), mock)
    }

    /// Run the application main loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> AppResult<()> {
        let tick_rate = Duration::from_millis(self.config.ui.tick_rate_ms.max(10));
        let mut events = EventHandler::new(tick_rate);

        self.refresh().await;

        while !self.should_quit {
            self.sync_snapshot();
            terminal.draw(|frame| ui::draw(frame, self))?;

            tokio::select! {
                event = events.next() => match event {
                    Some(e) => self.handle_event(e).await?,
                    None => self.should_quit = true,
                },
                stream_event = self.session.next_event() => {
                    self.apply_stream_event(stream_event);
                }
                notice = self.notices.recv() => {
                    if let Some(notice) = notice {
                        self.status = Some(notice);
                    }
                }
                outcome = Self::recv_submit(&mut self.submit_rx) => {
                    self.on_submitted(outcome);
                }
            }
        }

        self.session.close(&mut self.console);
        Ok(())
    }

    async fn recv_submit(
        rx: &mut Option<oneshot::Receiver<SubmitOutcome>>,
    ) -> Option<SubmitOutcome> {
        match rx {
            Some(receiver) => receiver.await.ok(),
            None => std::future::pending().await,
        }
    }

    fn on_submitted(&mut self, outcome: Option<SubmitOutcome>) {
        self.submit_rx = None;
        if outcome.is_some_and(|o| o.closes_dialog()) {
            self.form = CreateFormState::default();
            if self.view == View::Create {
                self.view = View::Main;
            }
        }
    }

    /// Wait for a pending create submission and collect queued notices
    pub async fn settle(&mut self) {
        if let Some(rx) = self.submit_rx.take() {
            let outcome = rx.await.ok();
            self.on_submitted(outcome);
        }
        self.drain_notices();
    }

    pub fn drain_notices(&mut self) {
        while let Ok(notice) = self.notices.try_recv() {
            self.status = Some(notice);
        }
    }

    pub fn apply_stream_event(&mut self, event: StreamEvent) {
        self.session.apply(event, &mut self.console);
    }

    /// Pull the registry snapshot and keep the selection in range
    pub fn sync_snapshot(&mut self) {
        self.containers = self.panel.registry().snapshot();
        if self.containers.is_empty() {
            self.selected = 0;
            self.containers_table_state.select(None);
        } else {
            self.selected = self.selected.min(self.containers.len() - 1);
            self.containers_table_state.select(Some(self.selected));
        }
    }

    pub fn selected_container(&self) -> Option<&Container> {
        self.containers.get(self.selected)
    }

    pub fn is_loading(&self) -> bool {
        self.panel.registry().is_loading()
    }

    pub fn is_submitting(&self) -> bool {
        self.submit_rx.is_some()
    }

    async fn handle_event(&mut self, event: Event) -> AppResult<()> {
        match event {
            Event::Key(key) => self.handle_key(key.code, key.modifiers).await?,
            Event::Tick => {
                self.tick = self.tick.wrapping_add(1);
                self.auto_refresh();
            }
            Event::Resize(_, _) => {}
        }
        Ok(())
    }

    fn auto_refresh(&mut self) {
        let Some(every) = self.config.refresh.auto_refresh() else {
            return;
        };
        if self.view != View::Main || self.is_loading() || self.last_refresh.elapsed() < every {
            return;
        }

        self.last_refresh = Instant::now();
        let registry = self.panel.registry().clone();
        tokio::spawn(async move {
            registry.refresh().await;
        });
    }

    /// Feed a key press through the same path as the event loop
    pub async fn send_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> AppResult<()> {
        self.handle_key(code, modifiers).await?;
        self.sync_snapshot();
        Ok(())
    }

    /// Feed one tick through the same path as the event loop
    pub async fn send_tick(&mut self) -> AppResult<()> {
        self.handle_event(Event::Tick).await?;
        self.sync_snapshot();
        Ok(())
    }

    async fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> AppResult<()> {
        match self.view {
            View::Help => self.view = View::Main,
            View::Main => self.handle_main_key(code).await,
            View::Console => self.handle_console_key(code, modifiers),
            View::Create => self.handle_create_key(code, modifiers),
        }
        Ok(())
    }

    async fn handle_main_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') | KeyCode::F(1) => self.view = View::Help,

            // Navigation
            KeyCode::Char('j') | KeyCode::Down => {
                if !self.containers.is_empty() {
                    self.selected = (self.selected + 1) % self.containers.len();
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if !self.containers.is_empty() {
                    self.selected = self
                        .selected
                        .checked_sub(1)
                        .unwrap_or(self.containers.len() - 1);
                }
            }
            KeyCode::Char('g') | KeyCode::Home => self.selected = 0,
            KeyCode::Char('G') | KeyCode::End => {
                self.selected = self.containers.len().saturating_sub(1);
            }

            // Actions
            KeyCode::Char('r') | KeyCode::F(5) => self.refresh().await,
            KeyCode::Char('s') => self.dispatch_selected(Action::Start).await,
            KeyCode::Char('x') => self.dispatch_selected(Action::Stop).await,
            KeyCode::Char('l') | KeyCode::Enter => self.open_console().await,
            KeyCode::Char('n') => {
                if !self.is_submitting() {
                    self.form = CreateFormState::default();
                }
                self.view = View::Create;
            }
            _ => {}
        }
    }

    fn handle_console_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        let len = self.session.entries().len();
        let page = self.console.page.max(1);

        match code {
            KeyCode::Esc | KeyCode::Char('q') => self.close_console(),
            KeyCode::Char('j') | KeyCode::Down => self.console.scroll_down(1, len),
            KeyCode::Char('k') | KeyCode::Up => self.console.scroll_up(1, len),
            KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.console.scroll_down(page / 2, len)
            }
            KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.console.scroll_up(page / 2, len)
            }
            KeyCode::PageDown => self.console.scroll_down(page, len),
            KeyCode::PageUp => self.console.scroll_up(page, len),
            KeyCode::Char('g') | KeyCode::Home => self.console.top(),
            KeyCode::Char('G') | KeyCode::End => self.console.follow_latest(len),
            _ => {}
        }
    }

    fn handle_create_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);
        match code {
            KeyCode::Esc => {
                self.form = CreateFormState::default();
                self.view = View::Main;
            }
            KeyCode::Enter => self.submit_form(),
            KeyCode::Tab | KeyCode::Down => self.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.form.focus_prev(),
            KeyCode::Char('a') if ctrl => self.form.add_env_row(),
            KeyCode::Char('d') if ctrl => {
                self.form.remove_focused_env_row();
            }
            _ if ctrl => {}
            _ => {
                self.form.edit(code);
            }
        }
    }

    async fn refresh(&mut self) {
        self.panel.registry().refresh().await;
        self.last_refresh = Instant::now();
        self.sync_snapshot();
    }

    async fn dispatch_selected(&mut self, action: Action) {
        let Some(container) = self.selected_container().cloned() else {
            return;
        };
        let outcome = self
            .panel
            .dispatcher()
            .dispatch(&container.id, action)
            .await;
        tracing::debug!("{} {}: sent={}", action, container.name, outcome.is_sent());
    }

    async fn open_console(&mut self) {
        let Some(id) = self.selected_container().map(|c| c.id.clone()) else {
            return;
        };
        let page = self.console.page;
        self.console = ConsoleView {
            page,
            ..ConsoleView::default()
        };
        self.session.open(&id, &mut self.console).await;
        self.view = View::Console;
    }

    fn close_console(&mut self) {
        self.session.close(&mut self.console);
        self.view = View::Main;
    }

    fn submit_form(&mut self) {
        if self.is_submitting() {
            return;
        }

        let form = self.form.to_form();
        let creator = self.panel.creator().clone();
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let outcome = creator.submit(&form).await;
            let _ = tx.send(outcome);
        });
        self.submit_rx = Some(rx);
    }
}
