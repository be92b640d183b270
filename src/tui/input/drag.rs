use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};

use crate::model::PointerMode;
use crate::ops::sensor::{Direction, Point, Release};
use crate::tui::app::{App, Mode};

/// Keys while a card is picked up with `m`
pub(super) fn handle_drag(app: &mut App, key: KeyEvent) {
    let direction = match key.code {
        KeyCode::Char('h') | KeyCode::Left => Some(Direction::Left),
        KeyCode::Char('l') | KeyCode::Right => Some(Direction::Right),
        KeyCode::Char('k') | KeyCode::Up => Some(Direction::Up),
        KeyCode::Char('j') | KeyCode::Down => Some(Direction::Down),
        _ => None,
    };
    if let Some(direction) = direction {
        if let Some(event) = app.keyboard.step(direction, &app.store) {
            app.apply_gesture(event);
        }
        return;
    }

    let event = match key.code {
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('m') => app.keyboard.drop(),
        KeyCode::Esc => app.keyboard.cancel(),
        _ => return,
    };
    if let Some(event) = event {
        app.apply_gesture(event);
    }
    app.mode = Mode::Navigate;
}

/// Mouse input. Presses, motion and releases go through the pointer or the
/// long-press sensor depending on config; a release that never became a drag
/// selects the card.
///
/// Releases are delivered in every mode so a gesture started on the board
/// always ends, even if a popup opened underneath it.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent, now: Instant) {
    let on_board = app.mode == Mode::Navigate && !app.show_help;
    let is_release = matches!(mouse.kind, MouseEventKind::Up(MouseButton::Left));
    if !on_board && !is_release {
        return;
    }
    let at = Point::new(mouse.column, mouse.row);
    let hits = &app.hits;
    let hold = app.pointer_mode == PointerMode::Hold;

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let id = hits.card_at(at);
            if hold {
                app.touch.press(id, at, now);
            } else {
                app.pointer.press(id, at);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            let events = if hold {
                app.touch.motion(at, now, |p| hits.target_at(p))
            } else {
                app.pointer.motion(at, |p| hits.target_at(p))
            };
            app.apply_gestures(events);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            let release = if hold {
                app.touch.release(at, |p| hits.target_at(p))
            } else {
                app.pointer.release(at, |p| hits.target_at(p))
            };
            match release {
                Release::Ignored => {}
                Release::Click(id) if on_board => app.select(&id),
                Release::Click(_) => {}
                Release::Drop(event) => app.apply_gesture(event),
            }
        }
        _ => {}
    }
}
