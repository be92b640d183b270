use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};

use super::helpers::spans_width;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    let mut spans: Vec<Span> = Vec::new();
    if let Some(active) = app.drag.active() {
        let title = app.store.get(active).map_or("", |t| t.title.as_str());
        spans.push(Span::styled(
            format!(" moving \"{}\"", title),
            Style::default().fg(app.theme.primary).bg(bg),
        ));
    } else if let Some(msg) = &app.status_message {
        spans.push(Span::styled(
            format!(" {}", msg),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ));
    }

    let hint = match app.mode {
        Mode::Navigate if app.drag.is_dragging() => "release to drop",
        Mode::Navigate if app.is_editable() => {
            "a add  e edit  x done  m move  d delete  v view  ? help"
        }
        Mode::Navigate => "v edit  E export  ? help",
        Mode::Drag => "\u{2190}\u{2193}\u{2191}\u{2192} move  Enter drop  Esc cancel",
        Mode::Form => "Tab next field  Enter save  Esc cancel",
        Mode::Confirm => "y confirm  n cancel",
    };
    let used = spans_width(&spans);
    let hint_w = hint.chars().count() + 1;
    if used + hint_w <= width {
        spans.push(Span::styled(" ".repeat(width - used - hint_w), Style::default().bg(bg)));
        spans.push(Span::styled(hint, dim));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
