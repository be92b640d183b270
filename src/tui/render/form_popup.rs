use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

use crate::model::TaskColor;
use crate::tui::app::App;
use crate::tui::input::form::{FormField, FormState};

use super::helpers::{centered_rect_fixed, input_spans};

/// Render the create/edit modal
pub fn render_form_popup(frame: &mut Frame, app: &App, form: &FormState, area: Rect) {
    let popup_w: u16 = 56.min(area.width.saturating_sub(2));
    let inner_w = popup_w.saturating_sub(2) as usize;
    let field_w = inner_w.saturating_sub(3);

    let theme = &app.theme;
    let bg = theme.background;
    let text_style = Style::default().fg(theme.text).bg(bg);
    let bright_style = Style::default().fg(theme.text_bright).bg(bg);
    let cursor_style = Style::default().fg(bg).bg(theme.text_bright);
    let label_style = |field: FormField| {
        if form.field == field {
            Style::default()
                .fg(theme.primary)
                .bg(bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.dim).bg(bg)
        }
    };

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(" Title", label_style(FormField::Title))));
    let mut title = vec![Span::styled("   ", text_style)];
    title.extend(input_spans(
        &form.title,
        (form.field == FormField::Title).then_some(form.cursor),
        field_w,
        bright_style,
        cursor_style,
    ));
    lines.push(Line::from(title));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(
        " Description",
        label_style(FormField::Description),
    )));
    let mut description = vec![Span::styled("   ", text_style)];
    description.extend(input_spans(
        &form.description,
        (form.field == FormField::Description).then_some(form.cursor),
        field_w,
        text_style,
        cursor_style,
    ));
    lines.push(Line::from(description));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(" Color", label_style(FormField::Color))));
    let mut swatches = vec![Span::styled("  ", text_style)];
    for color in TaskColor::ALL {
        let selected = color == form.color;
        let mark_style = if selected { bright_style } else { text_style };
        swatches.push(Span::styled(if selected { "[" } else { " " }, mark_style));
        swatches.push(Span::styled(
            "  ",
            Style::default().bg(theme.card_bg(color)),
        ));
        swatches.push(Span::styled(if selected { "]" } else { " " }, mark_style));
    }
    swatches.push(Span::styled(format!(" {}", form.color.name()), bright_style));
    lines.push(Line::from(swatches));

    if let Some(error) = &form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            Style::default().fg(theme.red).bg(bg),
        )));
    }

    let popup_h = ((lines.len() as u16) + 2).min(area.height.saturating_sub(2));
    let overlay_area = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, overlay_area);

    let heading = if form.is_edit() { " Edit task " } else { " New task " };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.primary).bg(bg))
        .title(Span::styled(
            heading,
            Style::default()
                .fg(theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(bg));

    frame.render_widget(
        Paragraph::new(lines).block(block).style(Style::default().bg(bg)),
        overlay_area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::test_app;
    use crate::tui::render::test_helpers::{TERM_H, TERM_W, render_to_string};

    #[test]
    fn new_task_form_shows_fields_and_error() {
        let app = test_app();
        let mut form = FormState::create("todo".into());
        form.error = Some("title is required".into());
        let out = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_form_popup(frame, &app, &form, area);
        });
        assert!(out.contains("New task"));
        assert!(out.contains("Title"));
        assert!(out.contains("Description"));
        assert!(out.contains("White"));
        assert!(out.contains("title is required"));
    }

    #[test]
    fn edit_form_shows_current_values() {
        let app = test_app();
        let task = app.store.tasks()[1].clone();
        let form = FormState::edit(&task);
        let out = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_form_popup(frame, &app, &form, area);
        });
        assert!(out.contains("Edit task"));
        assert!(out.contains("Data Persistence"));
        assert!(out.contains("Changes are saved automatically"));
        assert!(out.contains("Mint"));
    }
}
