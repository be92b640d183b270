use chrono::{DateTime, Local, Utc};
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;

use crate::util::unicode::{self, next_grapheme_boundary, truncate_to_width};

/// Card timestamp in local time, e.g. "02 Mar 10:00"
pub(super) fn format_timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%d %b %H:%M").to_string()
}

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// Word-wrap `text` into lines of at most `max_width` cells.
/// Every line (including the first) is prefixed with `indent`.
pub(super) fn wrap_text(indent: &str, text: &str, max_width: usize) -> Vec<String> {
    let indent_len = unicode::display_width(indent);
    let mut lines = Vec::new();
    let mut current = indent.to_string();
    let mut width = indent_len;

    for word in text.split_whitespace() {
        let word_w = unicode::display_width(word);
        let space = if width == indent_len { 0 } else { 1 };
        if width + space + word_w > max_width && width > indent_len {
            lines.push(std::mem::replace(&mut current, indent.to_string()));
            width = indent_len;
        }
        if width > indent_len {
            current.push(' ');
            width += 1;
        }
        current.push_str(word);
        width += word_w;
    }
    if width > indent_len || lines.is_empty() {
        lines.push(current);
    }
    lines
}

pub(super) fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Spans for a one-line text input. With a cursor, the cell under it is
/// drawn in `cursor_style` and the text scrolls so the cursor stays inside
/// `width` cells.
pub(super) fn input_spans(
    text: &str,
    cursor: Option<usize>,
    width: usize,
    style: Style,
    cursor_style: Style,
) -> Vec<Span<'static>> {
    let Some(cursor) = cursor else {
        return vec![Span::styled(truncate_to_width(text, width), style)];
    };
    let cursor = cursor.min(text.len());
    let mut before = &text[..cursor];
    while !before.is_empty() && unicode::display_width(before) + 1 > width {
        let next = next_grapheme_boundary(before, 0).unwrap_or(before.len());
        before = &before[next..];
    }

    let mut spans = Vec::new();
    if !before.is_empty() {
        spans.push(Span::styled(before.to_string(), style));
    }
    match next_grapheme_boundary(text, cursor) {
        Some(end) => {
            spans.push(Span::styled(text[cursor..end].to_string(), cursor_style));
            let used = spans_width(&spans);
            let after = &text[end..];
            if !after.is_empty() && used < width {
                spans.push(Span::styled(truncate_to_width(after, width - used), style));
            }
        }
        None => spans.push(Span::styled(" ".to_string(), cursor_style)),
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(spans: &[Span]) -> String {
        spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn wrap_respects_width_and_indent() {
        let lines = wrap_text(" ", "Restore the original tasks? Local changes will be lost.", 20);
        assert_eq!(
            lines,
            vec![" Restore the", " original tasks?", " Local changes will", " be lost."]
        );
    }

    #[test]
    fn input_scrolls_to_keep_cursor_visible() {
        let style = Style::default();
        let spans = input_spans("abcdefghij", Some(10), 5, style, style);
        assert_eq!(text_of(&spans), "ghij ");

        let spans = input_spans("abcdefghij", Some(0), 5, style, style);
        assert_eq!(text_of(&spans), "abcd\u{2026}");
    }

    #[test]
    fn centered_rect_fits_area() {
        let r = centered_rect_fixed(40, 10, Rect::new(0, 0, 30, 8));
        assert_eq!(r, Rect::new(0, 0, 30, 8));
        let r = centered_rect_fixed(10, 4, Rect::new(0, 0, 30, 8));
        assert_eq!(r, Rect::new(10, 2, 10, 4));
    }
}
