//! Terminal event handling

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub enum Event {
    /// No input within one tick; drives the spinner and auto refresh
    Tick,
    Key(KeyEvent),
    Resize(u16, u16),
}

/// Reads terminal input on a blocking thread and forwards it as [`Event`]s
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::task::spawn_blocking(move || loop {
            let event = match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                        Event::Key(key)
                    }
                    Ok(CrosstermEvent::Resize(w, h)) => Event::Resize(w, h),
                    Ok(_) => continue,
                    Err(e) => {
                        tracing::debug!("Terminal read failed: {}", e);
                        break;
                    }
                },
                Ok(false) => Event::Tick,
                Err(e) => {
                    tracing::debug!("Terminal poll failed: {}", e);
                    break;
                }
            };
            if tx.send(event).is_err() {
                break;
            }
        });

        Self { rx }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}
