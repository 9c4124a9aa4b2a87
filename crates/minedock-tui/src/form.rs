//! Editing state of the create-server dialog

use crate::widgets::{InputKind, TextInputState};
use crossterm::event::KeyCode;
use minedock_core::{CreateForm, EnvPair};

/// Focusable field of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Port,
    DataPath,
    Image,
    EnvKey(usize),
    EnvValue(usize),
}

#[derive(Debug, Clone)]
pub struct EnvRow {
    pub key: TextInputState,
    pub value: TextInputState,
}

impl EnvRow {
    fn new() -> Self {
        Self {
            key: TextInputState::new(InputKind::Text),
            value: TextInputState::new(InputKind::Text),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateFormState {
    pub name: TextInputState,
    pub port: TextInputState,
    pub data_path: TextInputState,
    pub image: TextInputState,
    pub env: Vec<EnvRow>,
    pub focus: FormField,
}

impl Default for CreateFormState {
    fn default() -> Self {
        Self {
            name: TextInputState::new(InputKind::Text),
            port: TextInputState::new(InputKind::Digits),
            data_path: TextInputState::new(InputKind::Text),
            image: TextInputState::new(InputKind::Text),
            env: Vec::new(),
            focus: FormField::Name,
        }
    }
}

impl CreateFormState {
    /// Fields in tab order
    pub fn fields(&self) -> Vec<FormField> {
        let mut fields = vec![
            FormField::Name,
            FormField::Port,
            FormField::DataPath,
            FormField::Image,
        ];
        for i in 0..self.env.len() {
            fields.push(FormField::EnvKey(i));
            fields.push(FormField::EnvValue(i));
        }
        fields
    }

    pub fn focus_next(&mut self) {
        self.step_focus(1);
    }

    pub fn focus_prev(&mut self) {
        self.step_focus(-1);
    }

    fn step_focus(&mut self, step: isize) {
        let fields = self.fields();
        let pos = fields.iter().position(|f| *f == self.focus).unwrap_or(0) as isize;
        let len = fields.len() as isize;
        self.focus = fields[(pos + step).rem_euclid(len) as usize];
    }

    /// Append an env row and focus its key
    pub fn add_env_row(&mut self) {
        self.env.push(EnvRow::new());
        self.focus = FormField::EnvKey(self.env.len() - 1);
    }

    /// Remove the env row holding focus, if any
    pub fn remove_focused_env_row(&mut self) -> bool {
        let index = match self.focus {
            FormField::EnvKey(i) | FormField::EnvValue(i) => i,
            _ => return false,
        };
        if index >= self.env.len() {
            return false;
        }
        self.env.remove(index);
        self.focus = match self.env.len() {
            0 => FormField::Image,
            len => FormField::EnvKey(index.min(len - 1)),
        };
        true
    }

    pub fn input(&self, field: FormField) -> Option<&TextInputState> {
        match field {
            FormField::Name => Some(&self.name),
            FormField::Port => Some(&self.port),
            FormField::DataPath => Some(&self.data_path),
            FormField::Image => Some(&self.image),
            FormField::EnvKey(i) => self.env.get(i).map(|row| &row.key),
            FormField::EnvValue(i) => self.env.get(i).map(|row| &row.value),
        }
    }

    fn focused_input_mut(&mut self) -> Option<&mut TextInputState> {
        match self.focus {
            FormField::Name => Some(&mut self.name),
            FormField::Port => Some(&mut self.port),
            FormField::DataPath => Some(&mut self.data_path),
            FormField::Image => Some(&mut self.image),
            FormField::EnvKey(i) => self.env.get_mut(i).map(|row| &mut row.key),
            FormField::EnvValue(i) => self.env.get_mut(i).map(|row| &mut row.value),
        }
    }

    /// Forward an editing key to the focused field
    pub fn edit(&mut self, code: KeyCode) -> bool {
        self.focused_input_mut()
            .map(|input| input.handle_key(code))
            .unwrap_or(false)
    }

    pub fn to_form(&self) -> CreateForm {
        CreateForm {
            name: self.name.value().to_string(),
            port: self.port.value().to_string(),
            data_path: self.data_path.value().to_string(),
            image: self.image.value().to_string(),
            env: self
                .env
                .iter()
                .map(|row| EnvPair::new(row.key.value(), row.value.value()))
                .collect(),
        }
    }
}
