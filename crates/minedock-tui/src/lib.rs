//! TUI control panel for minedock
//!
//! Built with Ratatui: a server list, a live log console per server and a
//! create-server dialog.

pub mod app;
mod event;
pub mod form;
pub mod ui;
pub mod widgets;

pub use app::{App, AppError, AppResult, ConsoleView, View};
pub use event::{Event, EventHandler};
pub use form::{CreateFormState, FormField};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use minedock_config::ClientConfig;
use minedock_core::{ControlPanel, Notice};
use ratatui::prelude::*;
use std::io;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::layer::SubscriberExt;

/// Run the TUI until the user quits
pub async fn run(
    panel: ControlPanel,
    config: ClientConfig,
    notices: UnboundedReceiver<Notice>,
) -> AppResult<()> {
    // Logs would corrupt the display; the guard restores the previous subscriber
    let _guard = tracing::subscriber::set_default(
        tracing_subscriber::registry().with(tracing_subscriber::layer::Identity::new()),
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(panel, config, notices);
    let res = app.run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}
