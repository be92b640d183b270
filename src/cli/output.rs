use serde::Serialize;

use crate::model::Task;
use crate::ops::projector::ColumnView;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ColumnInfoJson {
    pub id: String,
    pub title: String,
    pub total: usize,
    pub done: usize,
}

#[derive(Serialize)]
pub struct ColumnTasksJson<'a> {
    pub column: String,
    pub title: String,
    pub tasks: Vec<&'a Task>,
}

pub fn column_info_json(view: &ColumnView) -> ColumnInfoJson {
    ColumnInfoJson {
        id: view.column.id.to_string(),
        title: view.column.title.clone(),
        total: view.total(),
        done: view.completed(),
    }
}

pub fn column_tasks_json<'a>(view: &ColumnView<'a>) -> ColumnTasksJson<'a> {
    ColumnTasksJson {
        column: view.column.id.to_string(),
        title: view.column.title.clone(),
        tasks: view.tasks.clone(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Format a single task as a one-line summary
pub fn format_task_line(task: &Task) -> String {
    let mark = if task.completed { 'x' } else { ' ' };
    let color = if task.color == Default::default() {
        String::new()
    } else {
        format!(" ({})", task.color)
    };
    format!("[{}] {} {}{}", mark, task.id, task.title, color)
}

/// Format a column header with its done/total count
pub fn format_column_header(view: &ColumnView) -> String {
    format!(
        "== {} ({}) {}/{} ==",
        view.column.title,
        view.column.id,
        view.completed(),
        view.total()
    )
}

/// Header plus one line per task; descriptions are indented below the title
pub fn format_column_listing(view: &ColumnView) -> Vec<String> {
    let mut lines = vec![format_column_header(view)];
    for task in &view.tasks {
        lines.push(format_task_line(task));
        if let Some(description) = &task.description {
            for line in description.lines() {
                lines.push(format!("    {}", line));
            }
        }
    }
    lines
}

/// Aligned `id  title  done/total` rows
pub fn format_columns_table(views: &[ColumnView]) -> Vec<String> {
    let id_w = views
        .iter()
        .map(|v| v.column.id.as_str().len())
        .max()
        .unwrap_or(0);
    let title_w = views
        .iter()
        .map(|v| v.column.title.chars().count())
        .max()
        .unwrap_or(0);
    views
        .iter()
        .map(|v| {
            format!(
                "{:<id_w$}  {:<title_w$}  {}/{}",
                v.column.id.as_str(),
                v.column.title,
                v.completed(),
                v.total(),
                id_w = id_w,
                title_w = title_w
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::dataset::default_dataset;
    use crate::model::{Column, TaskColor};
    use crate::ops::projector::column_view;
    use pretty_assertions::assert_eq;

    #[test]
    fn task_line_marks_completion_and_color() {
        let mut task = default_dataset().tasks[0].clone();
        assert_eq!(
            format_task_line(&task),
            "[ ] 1 Welcome to Postio! (deep-teal)"
        );
        task.completed = true;
        task.color = TaskColor::White;
        assert_eq!(format_task_line(&task), "[x] 1 Welcome to Postio!");
    }

    #[test]
    fn listing_and_table() {
        let data = default_dataset();
        let column = Column::new("in-progress", "In Progress");
        let view = ColumnView {
            tasks: column_view(&data.tasks, &column.id),
            column: &column,
        };
        assert_eq!(
            format_column_listing(&view),
            vec![
                "== In Progress (in-progress) 0/1 ==".to_string(),
                "[ ] 2 Data Persistence (mint)".to_string(),
                "    Changes are saved automatically to local storage.".to_string(),
            ]
        );
        assert_eq!(
            format_columns_table(std::slice::from_ref(&view)),
            vec!["in-progress  In Progress  0/1".to_string()]
        );
    }
}
