use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::info;

use crate::tui::app::{App, ConfirmAction, Mode};

pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        // Confirm: y
        (KeyModifiers::NONE, KeyCode::Char('y')) => {
            let state = app.confirm.take();
            app.mode = Mode::Navigate;
            if let Some(state) = state {
                match state.action {
                    ConfirmAction::DeleteTask(id) => confirm_delete_task(app, &id),
                    ConfirmAction::ResetBoard => app.reset_board(),
                }
            }
        }
        // Cancel: n or Esc
        (KeyModifiers::NONE, KeyCode::Char('n')) | (_, KeyCode::Esc) => {
            app.confirm = None;
            app.mode = Mode::Navigate;
        }
        _ => {}
    }
}

fn confirm_delete_task(app: &mut App, id: &crate::model::TaskId) {
    match app.store.remove(id) {
        Ok(task) => {
            info!(id = %id, "task deleted");
            app.status_message = Some(format!("deleted \"{}\"", task.title));
            app.clamp_cursor();
        }
        Err(e) => app.status_message = Some(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::test_app;

    fn press(app: &mut App, c: char) {
        handle_confirm(app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
    }

    #[test]
    fn yes_deletes_and_clamps_cursor() {
        let mut app = test_app();
        app.select(&"2".into());
        app.open_confirm("Delete?", ConfirmAction::DeleteTask("2".into()));
        press(&mut app, 'y');

        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.store.get(&"2".into()).is_none());
        assert_eq!(app.cursor_row, 0);
        assert_eq!(app.status_message.as_deref(), Some("deleted \"Data Persistence\""));
    }

    #[test]
    fn no_leaves_board_alone() {
        let mut app = test_app();
        app.open_confirm("Reset?", ConfirmAction::ResetBoard);
        app.store.remove(&"1".into()).unwrap();
        press(&mut app, 'n');

        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.confirm.is_none());
        assert_eq!(app.store.len(), 1);
    }
}
