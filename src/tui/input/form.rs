use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::info;

use crate::model::{ColumnId, NewTask, Task, TaskColor, TaskId, TaskPatch};
use crate::tui::app::{App, Mode};
use crate::util::unicode::{next_grapheme_boundary, prev_grapheme_boundary};

/// What the form saves into
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormTarget {
    Create(ColumnId),
    Edit(TaskId),
}

/// Which field has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Color,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::Color,
            FormField::Color => FormField::Title,
        }
    }

    fn prev(self) -> Self {
        match self {
            FormField::Title => FormField::Color,
            FormField::Description => FormField::Title,
            FormField::Color => FormField::Description,
        }
    }
}

/// State of the create/edit modal
#[derive(Debug, Clone)]
pub struct FormState {
    pub target: FormTarget,
    pub title: String,
    pub description: String,
    pub color: TaskColor,
    pub field: FormField,
    /// Byte offset into the focused text field
    pub cursor: usize,
    pub error: Option<String>,
}

/// Values accepted by the form
#[derive(Debug, Clone, PartialEq)]
pub struct FormOutput {
    pub title: String,
    pub description: Option<String>,
    pub color: TaskColor,
}

impl FormState {
    pub fn create(column: ColumnId) -> Self {
        FormState {
            target: FormTarget::Create(column),
            title: String::new(),
            description: String::new(),
            color: TaskColor::default(),
            field: FormField::Title,
            cursor: 0,
            error: None,
        }
    }

    pub fn edit(task: &Task) -> Self {
        FormState {
            target: FormTarget::Edit(task.id.clone()),
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            color: task.color,
            field: FormField::Title,
            cursor: task.title.len(),
            error: None,
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.target, FormTarget::Edit(_))
    }

    fn buffer_mut(&mut self) -> Option<&mut String> {
        match self.field {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::Color => None,
        }
    }

    /// Focused text field, if the focus is on one
    pub fn buffer(&self) -> Option<&str> {
        match self.field {
            FormField::Title => Some(&self.title),
            FormField::Description => Some(&self.description),
            FormField::Color => None,
        }
    }

    fn focus(&mut self, field: FormField) {
        self.field = field;
        self.cursor = self.buffer().map_or(0, str::len);
    }

    pub fn insert(&mut self, c: char) {
        let cursor = self.cursor;
        if let Some(buf) = self.buffer_mut() {
            buf.insert(cursor, c);
            self.cursor += c.len_utf8();
        }
    }

    pub fn backspace(&mut self) {
        let cursor = self.cursor;
        let Some(buf) = self.buffer_mut() else {
            return;
        };
        if let Some(prev) = prev_grapheme_boundary(buf, cursor) {
            buf.replace_range(prev..cursor, "");
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        let cursor = self.cursor;
        let Some(buf) = self.buffer_mut() else {
            return;
        };
        if let Some(next) = next_grapheme_boundary(buf, cursor) {
            buf.replace_range(cursor..next, "");
        }
    }

    pub fn left(&mut self) {
        match self.field {
            FormField::Color => self.color = cycle_color(self.color, -1),
            _ => {
                if let Some(prev) = self
                    .buffer()
                    .and_then(|b| prev_grapheme_boundary(b, self.cursor))
                {
                    self.cursor = prev;
                }
            }
        }
    }

    pub fn right(&mut self) {
        match self.field {
            FormField::Color => self.color = cycle_color(self.color, 1),
            _ => {
                if let Some(next) = self
                    .buffer()
                    .and_then(|b| next_grapheme_boundary(b, self.cursor))
                {
                    self.cursor = next;
                }
            }
        }
    }

    /// Validate the fields. A title that is blank after trimming is
    /// rejected; a blank description is stored as absent.
    pub fn submit(&self) -> Result<FormOutput, String> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err("title is required".into());
        }
        let description = self.description.trim();
        Ok(FormOutput {
            title: title.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            color: self.color,
        })
    }
}

fn cycle_color(color: TaskColor, step: isize) -> TaskColor {
    let len = TaskColor::ALL.len() as isize;
    let idx = TaskColor::ALL.iter().position(|c| *c == color).unwrap_or(0) as isize;
    TaskColor::ALL[(idx + step).rem_euclid(len) as usize]
}

pub(super) fn handle_form(app: &mut App, key: KeyEvent) {
    let Some(form) = app.form.as_mut() else {
        app.mode = Mode::Navigate;
        return;
    };

    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => {
            app.form = None;
            app.mode = Mode::Navigate;
        }
        (_, KeyCode::Enter) => save_form(app),
        (_, KeyCode::Tab) | (_, KeyCode::Down) => {
            let next = form.field.next();
            form.focus(next);
        }
        (_, KeyCode::BackTab) | (_, KeyCode::Up) => {
            let prev = form.field.prev();
            form.focus(prev);
        }
        (_, KeyCode::Left) => form.left(),
        (_, KeyCode::Right) => form.right(),
        (_, KeyCode::Home) => form.cursor = 0,
        (_, KeyCode::End) => form.cursor = form.buffer().map_or(0, str::len),
        (_, KeyCode::Backspace) => form.backspace(),
        (_, KeyCode::Delete) => form.delete(),
        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => {
            if form.field == FormField::Color && c == ' ' {
                form.right();
            } else {
                form.insert(c);
            }
            form.error = None;
        }
        _ => {}
    }
}

/// Apply a valid form to the store and close it. An invalid form stays
/// open with its error shown.
fn save_form(app: &mut App) {
    let Some(form) = app.form.as_mut() else {
        return;
    };
    let output = match form.submit() {
        Ok(output) => output,
        Err(e) => {
            form.error = Some(e);
            return;
        }
    };
    let target = form.target.clone();
    app.form = None;
    app.mode = Mode::Navigate;

    match target {
        FormTarget::Create(column) => {
            let fields = NewTask {
                title: output.title,
                description: output.description,
                color: output.color,
            };
            match app.store.add(&column, fields) {
                Ok(task) => {
                    let id = task.id.clone();
                    info!(id = %id, column = %column, "task created");
                    app.select(&id);
                }
                Err(e) => app.status_message = Some(e.to_string()),
            }
        }
        FormTarget::Edit(id) => {
            let patch = TaskPatch {
                title: Some(output.title),
                description: Some(output.description),
                color: Some(output.color),
            };
            if let Err(e) = app.store.update(&id, patch) {
                app.status_message = Some(e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::test_app;
    use crossterm::event::KeyEvent;

    fn press(app: &mut App, code: KeyCode) {
        handle_form(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn blank_title_is_rejected_and_form_stays_open() {
        let mut app = test_app();
        app.open_form(FormState::create("todo".into()));
        type_str(&mut app, "   ");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, Mode::Form);
        let form = app.form.as_ref().unwrap();
        assert_eq!(form.error.as_deref(), Some("title is required"));
        assert_eq!(app.store.len(), 2);
    }

    #[test]
    fn create_saves_trimmed_fields() {
        let mut app = test_app();
        app.open_form(FormState::create("done".into()));
        type_str(&mut app, "  Ship it ");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "  ");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, Mode::Navigate);
        let task = app.store.tasks().last().unwrap();
        assert_eq!(task.title, "Ship it");
        assert_eq!(task.description, None);
        assert_eq!(task.color, TaskColor::Mint);
        assert_eq!(task.column_id.as_str(), "done");
        assert_eq!(app.selected_task().as_ref(), Some(&task.id));
    }

    #[test]
    fn edit_replaces_fields() {
        let mut app = test_app();
        let task = app.store.tasks()[0].clone();
        app.open_form(FormState::edit(&task));
        press(&mut app, KeyCode::Backspace);
        type_str(&mut app, "?");
        press(&mut app, KeyCode::Tab);
        for _ in 0..task.description.as_deref().unwrap_or("").chars().count() {
            press(&mut app, KeyCode::Backspace);
        }
        press(&mut app, KeyCode::Enter);

        let saved = app.store.get(&task.id).unwrap();
        assert_eq!(saved.title, "Welcome to Postio?");
        assert_eq!(saved.description, None);
        assert_eq!(saved.color, task.color);
    }

    #[test]
    fn cursor_moves_by_grapheme() {
        let mut form = FormState::create("todo".into());
        for c in "ae\u{0301}".chars() {
            form.insert(c);
        }
        form.left();
        assert_eq!(form.cursor, 1);
        form.backspace();
        assert_eq!(form.title, "e\u{0301}");
        assert_eq!(form.cursor, 0);
    }

    #[test]
    fn color_field_cycles_palette() {
        let mut form = FormState::create("todo".into());
        form.focus(FormField::Color);
        form.left();
        assert_eq!(form.color, TaskColor::DeepTeal);
        form.right();
        form.right();
        assert_eq!(form.color, TaskColor::Mint);
    }
}
