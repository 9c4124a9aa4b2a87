use super::*;
use ansi_to_tui::IntoText;
use minedock_core::{LogEntry, LogStyle, SessionState};

fn style_color(style: LogStyle) -> Color {
    match style {
        LogStyle::Success => Color::Green,
        LogStyle::Info => Color::Cyan,
        LogStyle::Neutral => Color::Gray,
        LogStyle::Warning => Color::Yellow,
        LogStyle::Error => Color::Red,
    }
}

/// Render one entry; ANSI colours in the text override the entry style
fn entry_line(entry: &LogEntry) -> Line<'static> {
    let base = Style::default().fg(style_color(entry.style));
    // Raw frames keep their line ending in the buffer; drop it for display
    let clean = entry.text.trim_end_matches(['\r', '\n']).replace('\r', "");

    match clean.into_text() {
        Ok(text) => {
            let spans: Vec<Span<'static>> = text
                .lines
                .into_iter()
                .next()
                .map(|line| line.spans)
                .unwrap_or_default()
                .into_iter()
                .map(|mut span| {
                    span.style = base.patch(span.style);
                    span
                })
                .collect();
            Line::from(spans)
        }
        Err(_) => Line::from(Span::styled(clean, base)),
    }
}

fn state_label(state: SessionState) -> (&'static str, Color) {
    match state {
        SessionState::Idle => ("idle", Color::DarkGray),
        SessionState::Connecting => ("connecting", Color::Yellow),
        SessionState::Streaming => ("live", Color::Green),
        SessionState::Closed => ("closed", Color::DarkGray),
    }
}

pub(super) fn draw_console(frame: &mut Frame, app: &mut App, area: Rect) {
    let inner_height = area.height.saturating_sub(2) as usize;
    app.console.page = inner_height.max(1);

    let name = app
        .session
        .container()
        .map(|id| {
            app.panel
                .registry()
                .find(id)
                .map(|c| c.name)
                .unwrap_or_else(|| id.short().to_string())
        })
        .unwrap_or_else(|| "-".to_string());

    let entries = app.session.entries();
    let total = entries.len();
    let offset = app.console.offset(total);

    let text: Vec<Line> = entries
        .iter()
        .skip(offset)
        .take(inner_height)
        .map(entry_line)
        .collect();

    let (state, color) = state_label(app.session.state());
    let follow = if app.console.follow { "" } else { " (paused)" };
    let title = format!(" Console: {} [{}]{} ", name, state, follow);

    let console = Paragraph::new(text).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    );
    frame.render_widget(console, area);

    if total > inner_height {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("▲"))
            .end_symbol(Some("▼"));
        let mut scrollbar_state =
            ScrollbarState::new(total.saturating_sub(inner_height)).position(offset);

        let scrollbar_area = Rect {
            x: area.x + area.width.saturating_sub(1),
            y: area.y + 1,
            width: 1,
            height: area.height.saturating_sub(2),
        };
        frame.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
    }
}
