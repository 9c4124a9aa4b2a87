use super::*;
use minedock_client::ContainerStatus;

/// Symbol and colour for a container state
pub(super) fn state_style(state: &ContainerStatus) -> (&'static str, Color) {
    match state {
        ContainerStatus::Running(_) => ("●", Color::Green),
        ContainerStatus::Stopped(_) => ("○", Color::DarkGray),
        ContainerStatus::Other(_) => ("◔", Color::Yellow),
    }
}

pub(super) fn draw_containers(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default().title(" Servers ").borders(Borders::ALL);

    if app.containers.is_empty() {
        let text = if app.panel.registry().has_loaded() {
            "No servers yet.\n\nPress 'n' to create one."
        } else if app.is_loading() {
            "Loading container list..."
        } else {
            "Container list not loaded.\n\nPress 'r' to retry."
        };
        let empty = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .block(block)
            .wrap(Wrap { trim: true });

        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from(" "),
        Cell::from("Name"),
        Cell::from("ID"),
        Cell::from("Image"),
        Cell::from("Status"),
    ])
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    .bottom_margin(1);

    let rows: Vec<Row> = app
        .containers
        .iter()
        .map(|container| {
            let (symbol, color) = state_style(&container.state);
            let status = container
                .status
                .clone()
                .unwrap_or_else(|| container.state.to_string());

            Row::new(vec![
                Cell::from(symbol).style(Style::default().fg(color)),
                Cell::from(container.name.clone()).style(Style::default().bold()),
                Cell::from(container.id.short().to_string())
                    .style(Style::default().fg(Color::DarkGray)),
                Cell::from(container.image.clone().unwrap_or_default()),
                Cell::from(status).style(Style::default().fg(color)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(3),  // State
        Constraint::Length(24), // Name
        Constraint::Length(14), // ID
        Constraint::Length(30), // Image
        Constraint::Min(10),    // Status
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White))
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(table, area, &mut app.containers_table_state);
}
