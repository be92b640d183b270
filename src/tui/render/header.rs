use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;

use super::helpers::spans_width;

/// Render the title row with board totals and the edit/view badge, plus a
/// separator line below.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(1), // separator
        ])
        .split(area);

    render_title(frame, app, chunks[0]);

    let sep = "\u{2500}".repeat(area.width as usize);
    frame.render_widget(
        Paragraph::new(sep).style(Style::default().fg(app.theme.dim).bg(app.theme.background)),
        chunks[1],
    );
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let total = app.store.len();
    let done = app.store.tasks().iter().filter(|t| t.completed).count();

    let mut spans = vec![
        Span::styled(" ", Style::default().bg(bg)),
        Span::styled("\u{25B6}", Style::default().fg(app.theme.primary).bg(bg)),
        Span::styled(
            " postio",
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {} tasks \u{00B7} {} done", total, done),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
    ];

    let (badge, badge_style) = if app.is_editable() {
        (
            " EDIT ",
            Style::default()
                .fg(app.theme.ink)
                .bg(app.theme.primary)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (
            " VIEW ",
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.dim)
                .add_modifier(Modifier::BOLD),
        )
    };
    let used = spans_width(&spans);
    let badge_w = badge.chars().count() + 1;
    if used + badge_w <= width {
        spans.push(Span::styled(
            " ".repeat(width - used - badge_w),
            Style::default().bg(bg),
        ));
        spans.push(Span::styled(badge, badge_style));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        area,
    );
}
