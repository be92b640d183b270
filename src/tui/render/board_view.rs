use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::model::Task;
use crate::ops::projector::{ColumnView, board_view};
use crate::tui::app::{App, HitMap};
use crate::util::unicode::truncate_to_width;

use super::helpers::format_timestamp;

/// Render every column side by side and record where each card and column
/// landed for mouse hit testing.
pub fn render_board(frame: &mut Frame, app: &mut App, area: Rect) {
    let mut hits = HitMap::default();
    {
        let app = &*app;
        let columns = board_view(&app.store);
        let constraints: Vec<Constraint> = columns
            .iter()
            .map(|_| Constraint::Ratio(1, columns.len() as u32))
            .collect();
        let areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .spacing(1)
            .split(area);

        for (i, (view, col_area)) in columns.iter().zip(areas.iter()).enumerate() {
            hits.push_column(*col_area, view.column.id.clone());
            render_column(frame, app, view, i, *col_area, &mut hits);
        }
    }
    app.hits = hits;
}

fn render_column(
    frame: &mut Frame,
    app: &App,
    view: &ColumnView,
    index: usize,
    area: Rect,
    hits: &mut HitMap,
) {
    let theme = &app.theme;
    let is_current = index == app.cursor_col;
    let border_color = if is_current { theme.primary } else { theme.dim };

    let title = Line::from(Span::styled(
        format!(" {} ", view.column.title),
        Style::default()
            .fg(theme.text_bright)
            .add_modifier(Modifier::BOLD),
    ));
    let count = Line::from(Span::styled(
        format!(" {}/{} ", view.completed(), view.total()),
        Style::default().fg(theme.primary),
    ))
    .right_aligned();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color).bg(theme.surface))
        .style(Style::default().bg(theme.surface))
        .title_top(title)
        .title_top(count);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if view.tasks.is_empty() {
        render_placeholder(frame, app, inner);
        return;
    }

    let heights: Vec<u16> = view.tasks.iter().map(|t| card_height(t)).collect();
    let offset = if is_current {
        scroll_offset(&heights, app.cursor_row, inner.height)
    } else {
        0
    };

    let mut y = inner.y;
    let bottom = inner.y + inner.height;
    for (row, task) in view.tasks.iter().enumerate().skip(offset) {
        let h = heights[row];
        if y + h > bottom {
            break;
        }
        let card_area = Rect::new(inner.x, y, inner.width, h);
        let selected = is_current && row == app.cursor_row;
        render_card(frame, app, task, selected, card_area);
        hits.push_card(card_area, task.id.clone());
        y += h;
    }
}

fn render_placeholder(frame: &mut Frame, app: &App, area: Rect) {
    if area.height == 0 {
        return;
    }
    let text = if app.is_editable() {
        "Drop items here"
    } else {
        "No tasks"
    };
    let line = Line::from(Span::styled(
        text,
        Style::default()
            .fg(app.theme.dim)
            .add_modifier(Modifier::ITALIC),
    ));
    let row = Rect::new(area.x, area.y + area.height.min(3) / 2, area.width, 1);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), row);
}

/// Borders plus title, optional description, and timestamps
fn card_height(task: &Task) -> u16 {
    let description = task.description.as_deref().is_some_and(|d| !d.trim().is_empty());
    if description { 5 } else { 4 }
}

/// First card to draw so the cursor card fits in `height` rows
fn scroll_offset(heights: &[u16], cursor: usize, height: u16) -> usize {
    let cursor = cursor.min(heights.len().saturating_sub(1));
    let mut offset = 0;
    while offset < cursor && heights[offset..=cursor].iter().sum::<u16>() > height {
        offset += 1;
    }
    offset
}

fn render_card(frame: &mut Frame, app: &App, task: &Task, selected: bool, area: Rect) {
    let theme = &app.theme;
    let bg = theme.card_bg(task.color);
    let fg = theme.card_fg(task.color);
    let dragging = app.drag.active() == Some(&task.id);

    let (border_type, border_fg) = if dragging {
        (BorderType::Double, theme.primary)
    } else if selected {
        (BorderType::Thick, theme.primary)
    } else {
        (BorderType::Plain, bg)
    };
    let mut base = Style::default().fg(fg).bg(bg);
    if dragging {
        base = base.add_modifier(Modifier::DIM);
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(border_fg).bg(bg))
        .style(base);
    let inner = block.inner(area);
    let width = inner.width as usize;

    let mut lines = Vec::new();

    let mark = if task.completed { "\u{2713} " } else { "\u{25CB} " };
    let mut title_style = base.add_modifier(Modifier::BOLD);
    if task.completed {
        title_style = title_style.add_modifier(Modifier::CROSSED_OUT);
    }
    lines.push(Line::from(vec![
        Span::styled(mark, base),
        Span::styled(
            truncate_to_width(&task.title, width.saturating_sub(2)),
            title_style,
        ),
    ]));

    if let Some(description) = task.description.as_deref().filter(|d| !d.trim().is_empty()) {
        let first = description.lines().next().unwrap_or("");
        lines.push(Line::from(Span::styled(
            truncate_to_width(first, width),
            base.add_modifier(Modifier::ITALIC),
        )));
    }

    let mut meta = format_timestamp(task.created_at);
    if let (true, Some(done_at)) = (task.completed, task.completed_at) {
        meta.push_str(&format!("  \u{2713} {}", format_timestamp(done_at)));
    }
    lines.push(Line::from(Span::styled(truncate_to_width(&meta, width), base)));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewTask;
    use crate::ops::drag::GestureEvent;
    use crate::tui::app::test_app;
    use crate::tui::render::test_helpers::{TERM_H, TERM_W, render_to_string};

    #[test]
    fn shows_columns_with_counts_and_cards() {
        let mut app = test_app();
        let out = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_board(frame, &mut app, area);
        });
        assert!(out.contains("To Do"));
        assert!(out.contains("In Progress"));
        assert!(out.contains("Done"));
        assert!(out.contains("0/1"));
        assert!(out.contains("0/0"));
        assert!(out.contains("Welcome to Postio!"));
        assert!(out.contains("Data Persistence"));
        assert!(out.contains("Drop items here"));
    }

    #[test]
    fn completed_count_and_read_only_placeholder() {
        let mut app = test_app();
        app.store.toggle_complete(&"2".into()).unwrap();
        app.set_editable(false);
        let out = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_board(frame, &mut app, area);
        });
        assert!(out.contains("1/1"));
        assert!(out.contains("No tasks"));
        assert!(!out.contains("Drop items here"));
    }

    #[test]
    fn records_hit_areas_for_cards() {
        let mut app = test_app();
        render_to_string(TERM_W, TERM_H, |frame, area| {
            render_board(frame, &mut app, area);
        });
        let card = app
            .hits
            .card_at(crate::ops::sensor::Point::new(3, 2))
            .expect("first card under the top-left of the board");
        assert_eq!(card.as_str(), "1");
    }

    #[test]
    fn dragged_card_stays_visible_in_new_column() {
        let mut app = test_app();
        app.apply_gesture(GestureEvent::Start("1".into()));
        app.apply_gesture(GestureEvent::MoveOver(
            crate::ops::drag::DropTarget::Column("done".into()),
        ));
        let out = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_board(frame, &mut app, area);
        });
        assert!(out.contains("Welcome to Postio!"));
        assert!(out.contains("0/1"));
        assert_eq!(app.hits.card_at(crate::ops::sensor::Point::new(3, 2)), None);
    }

    #[test]
    fn cursor_column_scrolls_to_selected_card() {
        let mut app = test_app();
        for i in 0..10 {
            app.store
                .add(&"todo".into(), NewTask::titled(format!("Card {}", i)))
                .unwrap();
        }
        app.cursor_row = 10;
        let out = render_to_string(TERM_W, 20, |frame, area| {
            render_board(frame, &mut app, area);
        });
        assert!(out.contains("Card 9"));
        assert!(!out.contains("Welcome"));
    }

    #[test]
    fn scroll_offset_keeps_cursor_in_view() {
        assert_eq!(scroll_offset(&[4, 4, 4], 0, 8), 0);
        assert_eq!(scroll_offset(&[4, 4, 4], 2, 8), 1);
        assert_eq!(scroll_offset(&[4, 5, 4], 2, 8), 2);
        assert_eq!(scroll_offset(&[], 0, 8), 0);
    }
}
