use super::*;
use crate::form::FormField;
use crate::widgets::TextInputState;

const LABEL_WIDTH: usize = 11;

fn field_line<'a>(
    label: &'a str,
    input: &'a TextInputState,
    focused: bool,
    placeholder: Option<&'a str>,
) -> Line<'a> {
    let label_style = if focused {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default().fg(Color::Gray)
    };
    let marker = if focused { "▶ " } else { "  " };

    let mut spans = vec![
        Span::raw(marker),
        Span::styled(format!("{:<width$}", label, width = LABEL_WIDTH), label_style),
    ];
    match placeholder {
        Some(hint) if input.is_empty() && !focused => {
            spans.push(Span::styled(hint, Style::default().fg(Color::DarkGray)));
        }
        _ => spans.extend(input.spans(focused)),
    }
    Line::from(spans)
}

pub(super) fn draw_create(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.form;
    let focus = form.focus;

    let mut lines = vec![
        Line::from(""),
        field_line("Name", &form.name, focus == FormField::Name, None),
        field_line("Port", &form.port, focus == FormField::Port, None),
        field_line(
            "Data path",
            &form.data_path,
            focus == FormField::DataPath,
            Some("(backend default)"),
        ),
        field_line(
            "Image",
            &form.image,
            focus == FormField::Image,
            Some("itzg/minecraft-server"),
        ),
        Line::from(""),
        Line::from(Span::styled(
            "  Environment",
            Style::default().fg(Color::Cyan).bold(),
        )),
    ];

    if form.env.is_empty() {
        lines.push(Line::from(Span::styled(
            "    (none, Ctrl-a to add)",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (i, row) in form.env.iter().enumerate() {
        let key_focused = focus == FormField::EnvKey(i);
        let value_focused = focus == FormField::EnvValue(i);
        let marker = if key_focused || value_focused { "▶ " } else { "  " };

        let mut spans = vec![Span::raw(format!("  {}", marker))];
        spans.extend(row.key.spans(key_focused));
        spans.push(Span::styled(" = ", Style::default().fg(Color::DarkGray)));
        spans.extend(row.value.spans(value_focused));
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    if app.is_submitting() {
        lines.push(Line::from(Span::styled(
            format!("  {} Creating server...", spinner::frame(app.tick)),
            Style::default().fg(Color::Yellow),
        )));
    }

    let dialog = Paragraph::new(lines).block(
        Block::default()
            .title(" New Server ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(dialog, area);
}
