pub mod board_view;
pub mod confirm_popup;
pub mod form_popup;
pub mod header;
pub mod help_overlay;
pub mod helpers;
pub mod status_row;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::App;

/// Main render function, dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: header (2 rows) | board | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    header::render_header(frame, app, chunks[0]);
    board_view::render_board(frame, app, chunks[1]);
    status_row::render_status_row(frame, app, chunks[2]);

    if let Some(form) = &app.form {
        form_popup::render_form_popup(frame, app, form, area);
    }
    if let Some(confirm) = &app.confirm {
        confirm_popup::render_confirm_popup(frame, app, confirm, area);
    }
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::test_app;
    use crate::tui::input::form::FormState;
    use test_helpers::{TERM_H, TERM_W, render_to_string};

    #[test]
    fn full_screen_has_header_board_and_status() {
        let mut app = test_app();
        let out = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &mut app));
        let first = out.lines().next().unwrap();
        assert!(first.contains("postio"));
        assert!(first.ends_with("EDIT"));
        assert!(out.contains("Welcome to Postio!"));
        assert!(out.lines().last().unwrap().contains("? help"));
    }

    #[test]
    fn form_draws_over_board() {
        let mut app = test_app();
        app.open_form(FormState::create("todo".into()));
        let out = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &mut app));
        assert!(out.contains("New task"));
        assert!(out.contains("To Do"));
    }
}
