//! UI rendering for the TUI application

mod console;
mod containers;
mod create;
mod header_footer;
mod spinner;

use crate::app::{App, View};
use crate::widgets::{centered_rect, DialogBuilder};
use ratatui::{
    prelude::*,
    widgets::{
        Block, Borders, Cell, Clear, Paragraph, Row, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Table, Wrap,
    },
};

use console::*;
use containers::*;
use create::*;
use header_footer::*;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    draw_header(frame, app, chunks[0]);

    let content_area = chunks[1];
    match app.view {
        View::Main => draw_containers(frame, app, content_area),
        View::Console => draw_console(frame, app, content_area),
        View::Create => {
            draw_containers(frame, app, content_area);
            let rows = app.form.env.len().max(1) as u16;
            let popup = popup_rect(70, 80, 60, rows + 12, content_area);
            frame.render_widget(Clear, popup);
            draw_create(frame, app, popup);
        }
        View::Help => {
            draw_containers(frame, app, content_area);
            draw_help(frame, content_area);
        }
    }

    draw_footer(frame, app, chunks[2]);
}

/// Popup centered in `area`, sized by percentage with minimums
fn popup_rect(pct_w: u16, pct_h: u16, min_w: u16, min_h: u16, area: Rect) -> Rect {
    let w = ((area.width as u32 * pct_w as u32) / 100) as u16;
    let h = ((area.height as u32 * pct_h as u32) / 100) as u16;
    let w = w.max(min_w).min(area.width);
    let h = h.max(min_h).min(area.height);
    centered_rect(w, h, area)
}
