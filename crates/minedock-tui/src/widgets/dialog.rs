//! Modal dialog builder

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

/// Builder for centered popups with a titled border
pub struct DialogBuilder<'a> {
    title: &'a str,
    lines: Vec<Line<'a>>,
    width: u16,
    border_color: Color,
    alignment: Alignment,
}

impl<'a> DialogBuilder<'a> {
    pub fn new(title: &'a str) -> Self {
        Self {
            title,
            lines: Vec::new(),
            width: 50,
            border_color: Color::Yellow,
            alignment: Alignment::Center,
        }
    }

    pub fn width(mut self, w: u16) -> Self {
        self.width = w;
        self
    }

    pub fn border_color(mut self, color: Color) -> Self {
        self.border_color = color;
        self
    }

    pub fn align_left(mut self) -> Self {
        self.alignment = Alignment::Left;
        self
    }

    pub fn message(mut self, text: &'a str) -> Self {
        self.lines.push(Line::from(text));
        self
    }

    /// A `key  description` row
    pub fn binding(mut self, key: &'a str, description: &'a str) -> Self {
        self.lines.push(Line::from(vec![
            Span::styled(format!("  {:<12}", key), Style::default().fg(Color::Yellow)),
            Span::raw(description),
        ]));
        self
    }

    /// A bold section heading
    pub fn heading(mut self, text: &'a str) -> Self {
        self.lines
            .push(Line::from(Span::styled(text, Style::default().fg(Color::Cyan).bold())));
        self
    }

    pub fn empty_line(mut self) -> Self {
        self.lines.push(Line::from(""));
        self
    }

    /// Dimmed hint at the bottom
    pub fn help(mut self, text: &'a str) -> Self {
        self.lines.push(Line::from(Span::styled(
            text,
            Style::default().fg(Color::DarkGray),
        )));
        self
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let height = (self.lines.len() as u16) + 2;
        let dialog_area = centered_rect(self.width, height, area);

        frame.render_widget(Clear, dialog_area);

        let dialog = Paragraph::new(self.lines).alignment(self.alignment).block(
            Block::default()
                .title(format!(" {} ", self.title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.border_color)),
        );

        frame.render_widget(dialog, dialog_area);
    }
}

/// Center a `width` x `height` rectangle inside `area`, clamped to fit
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect() {
        let centered = centered_rect(40, 20, Rect::new(0, 0, 100, 50));
        assert_eq!(centered, Rect::new(30, 15, 40, 20));
    }

    #[test]
    fn test_centered_rect_respects_offset() {
        let centered = centered_rect(10, 4, Rect::new(5, 3, 30, 10));
        assert_eq!(centered, Rect::new(15, 6, 10, 4));
    }

    #[test]
    fn test_centered_rect_overflow() {
        let centered = centered_rect(50, 30, Rect::new(0, 0, 30, 20));
        assert_eq!(centered, Rect::new(0, 0, 30, 20));
    }

    #[test]
    fn test_dialog_builder_chain() {
        let builder = DialogBuilder::new("Help")
            .width(60)
            .border_color(Color::Cyan)
            .heading("List")
            .binding("j/k", "Move")
            .empty_line()
            .help("Press any key");

        assert_eq!(builder.width, 60);
        assert_eq!(builder.border_color, Color::Cyan);
        assert_eq!(builder.lines.len(), 4);
    }
}
