//! Single-line text input with a cursor
//!
//! Used by every field of the create form. A field can be restricted to
//! digits (the port) so invalid input never reaches the form.

use crossterm::event::KeyCode;
use ratatui::prelude::*;

/// Which characters a field accepts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputKind {
    #[default]
    Text,
    Digits,
}

impl InputKind {
    fn accepts(&self, c: char) -> bool {
        match self {
            InputKind::Text => !c.is_control(),
            InputKind::Digits => c.is_ascii_digit(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TextInputState {
    buffer: String,
    /// Byte offset into `buffer`
    cursor: usize,
    kind: InputKind,
}

impl TextInputState {
    pub fn new(kind: InputKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Cursor is placed at the end of the value
    pub fn with_value(value: &str) -> Self {
        Self {
            buffer: value.to_string(),
            cursor: value.len(),
            kind: InputKind::Text,
        }
    }

    pub fn value(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Insert at the cursor. Returns `false` if the field refuses `c`.
    pub fn insert(&mut self, c: char) -> bool {
        if !self.kind.accepts(c) {
            return false;
        }
        self.buffer.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        true
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = self.prev_char_boundary();
            self.buffer.remove(prev);
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.buffer.len() {
            self.buffer.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.prev_char_boundary();
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.buffer.len() {
            self.cursor = self.next_char_boundary();
        }
    }

    /// Apply an editing key. Returns whether the key was consumed.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char(c) => self.insert(c),
            KeyCode::Backspace => {
                self.backspace();
                true
            }
            KeyCode::Delete => {
                self.delete();
                true
            }
            KeyCode::Left => {
                self.move_left();
                true
            }
            KeyCode::Right => {
                self.move_right();
                true
            }
            KeyCode::Home => {
                self.cursor = 0;
                true
            }
            KeyCode::End => {
                self.cursor = self.buffer.len();
                true
            }
            _ => false,
        }
    }

    /// Render the value, showing a block cursor when focused
    pub fn spans(&self, focused: bool) -> Vec<Span<'_>> {
        if !focused {
            return vec![Span::raw(self.buffer.as_str())];
        }

        let (before, rest) = self.buffer.split_at(self.cursor);
        let mut chars = rest.chars();
        let under = chars.next().map(String::from).unwrap_or_else(|| " ".to_string());
        let after = chars.as_str();

        vec![
            Span::raw(before),
            Span::styled(under, Style::default().add_modifier(Modifier::REVERSED)),
            Span::raw(after),
        ]
    }

    fn prev_char_boundary(&self) -> usize {
        let mut idx = self.cursor.saturating_sub(1);
        while idx > 0 && !self.buffer.is_char_boundary(idx) {
            idx -= 1;
        }
        idx
    }

    fn next_char_boundary(&self) -> usize {
        let mut idx = self.cursor + 1;
        while idx < self.buffer.len() && !self.buffer.is_char_boundary(idx) {
            idx += 1;
        }
        idx.min(self.buffer.len())
    }
}
