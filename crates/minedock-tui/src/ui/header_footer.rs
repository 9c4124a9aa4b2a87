use super::*;
use minedock_core::NoticeLevel;

pub(super) fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let running = app
        .containers
        .iter()
        .filter(|c| c.state.is_running())
        .count();

    let mut spans = vec![
        Span::styled(
            app.config.server.origin.clone(),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            format!("  {}/{} running", running, app.containers.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if app.is_loading() {
        spans.push(Span::styled(
            format!("  {} loading", spinner::frame(app.tick)),
            Style::default().fg(Color::Yellow),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(" minedock - Minecraft Server Control ")
            .title_style(Style::default().fg(Color::Cyan).bold())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(header, area);
}

fn notice_color(level: NoticeLevel) -> Color {
    match level {
        NoticeLevel::Success => Color::Green,
        NoticeLevel::Warning => Color::Yellow,
        NoticeLevel::Error => Color::Red,
    }
}

fn footer_help(app: &App) -> &'static str {
    match app.view {
        View::Main if app.containers.is_empty() => "n: New  r: Refresh  ?: Help  q: Quit",
        View::Main => {
            "j/k: Navigate  s: Start  x: Stop  l/Enter: Console  n: New  r: Refresh  ?: Help  q: Quit"
        }
        View::Console => "j/k: Scroll  g/G: Top/Follow  PgUp/PgDn: Page  Esc/q: Close",
        View::Create => {
            "Tab/S-Tab: Field  Ctrl-a: Add env  Ctrl-d: Remove env  Enter: Create  Esc: Cancel"
        }
        View::Help => "Press any key to return",
    }
}

/// Draw the footer: latest notice as the title, key help as the body
pub(super) fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    if let Some(notice) = &app.status {
        block = block.title(Line::from(Span::styled(
            format!(" {} {} ", notice.at.format("%H:%M:%S"), notice.text),
            Style::default().fg(notice_color(notice.level)).bold(),
        )));
    }

    let footer = Paragraph::new(footer_help(app))
        .style(Style::default().fg(Color::DarkGray))
        .block(block);
    frame.render_widget(footer, area);
}

pub(super) fn draw_help(frame: &mut Frame, area: Rect) {
    DialogBuilder::new("Help")
        .width(56)
        .border_color(Color::Cyan)
        .align_left()
        .heading("Servers")
        .binding("j/k", "Move selection")
        .binding("r", "Refresh list")
        .binding("s / x", "Start / stop selected server")
        .binding("l, Enter", "Open live console")
        .binding("n", "Create a new server")
        .binding("q", "Quit")
        .empty_line()
        .heading("Console")
        .binding("j/k, PgUp/Dn", "Scroll")
        .binding("G", "Follow newest output")
        .binding("Esc, q", "Close console")
        .empty_line()
        .heading("New server")
        .binding("Tab", "Next field")
        .binding("Ctrl-a/d", "Add / remove env row")
        .binding("Enter", "Create")
        .empty_line()
        .help("Press any key to close")
        .render(frame, area);
}
