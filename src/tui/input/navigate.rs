use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::info;

use crate::tui::app::{App, ConfirmAction, Mode};

use super::form::FormState;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return;
    }
    app.status_message = None;

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.show_help = true,

        // Cursor
        KeyCode::Char('h') | KeyCode::Left => {
            app.cursor_col = app.cursor_col.saturating_sub(1);
            app.clamp_cursor();
        }
        KeyCode::Char('l') | KeyCode::Right => {
            app.cursor_col += 1;
            app.clamp_cursor();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.cursor_row = app.cursor_row.saturating_sub(1);
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.cursor_row += 1;
            app.clamp_cursor();
        }
        KeyCode::Char('g') | KeyCode::Home => app.cursor_row = 0,
        KeyCode::Char('G') | KeyCode::End => {
            app.cursor_row = app.current_column_len().saturating_sub(1);
        }

        // View mode works in both directions
        KeyCode::Char('v') => {
            let editable = !app.is_editable();
            app.set_editable(editable);
            info!(editable, "view mode toggled");
            app.status_message = Some(if editable { "edit mode" } else { "view mode" }.into());
        }
        KeyCode::Char('E') => app.export(),

        // Everything below changes the board
        _ if !app.is_editable() => {
            if is_edit_key(key.code) {
                app.status_message = Some("view mode: press v to edit".into());
            }
        }
        _ if app.drag.is_dragging() => {
            if is_edit_key(key.code) {
                app.status_message = Some("release the card first".into());
            }
        }
        KeyCode::Char('a') => {
            if let Some(column) = app.current_column().cloned() {
                app.open_form(FormState::create(column));
            }
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(task) = app.selected_task().and_then(|id| app.store.get(&id)) {
                let form = FormState::edit(task);
                app.open_form(form);
            }
        }
        KeyCode::Char('x') | KeyCode::Char(' ') => {
            if let Some(id) = app.selected_task() {
                match app.store.toggle_complete(&id) {
                    Ok(true) => app.status_message = Some("marked done".into()),
                    Ok(false) => app.status_message = Some("marked not done".into()),
                    Err(e) => app.status_message = Some(e.to_string()),
                }
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(task) = app.selected_task().and_then(|id| app.store.get(&id)) {
                let message = format!("Delete \"{}\"?", task.title);
                let action = ConfirmAction::DeleteTask(task.id.clone());
                app.open_confirm(message, action);
            }
        }
        KeyCode::Char('m') => {
            if let Some(id) = app.selected_task()
                && let Some(start) = app.keyboard.pick_up(id)
            {
                app.apply_gesture(start);
                app.mode = Mode::Drag;
            }
        }
        KeyCode::Char('R') => {
            app.open_confirm(
                "Restore the original tasks? Local changes will be lost.",
                ConfirmAction::ResetBoard,
            );
        }
        _ => {}
    }
}

fn is_edit_key(code: KeyCode) -> bool {
    matches!(
        code,
        KeyCode::Char('a' | 'e' | 'x' | ' ' | 'd' | 'm' | 'R') | KeyCode::Enter | KeyCode::Delete
    )
}
