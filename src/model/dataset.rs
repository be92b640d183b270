use serde::{Deserialize, Serialize};

use super::column::Column;
use super::task::Task;

/// The built-in board, also the format written by export
const DEFAULT_BOARD: &str = include_str!("../templates/board.json");

/// Columns and tasks as one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub columns: Vec<Column>,
    pub tasks: Vec<Task>,
}

/// The built-in dataset. Tasks get the current time as `createdAt`.
pub fn default_dataset() -> Dataset {
    serde_json::from_str(DEFAULT_BOARD).expect("built-in board template is valid JSON")
}

/// The built-in columns (`todo`, `in-progress`, `done`)
pub fn default_columns() -> Vec<Column> {
    default_dataset().columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskColor;

    #[test]
    fn default_dataset_has_two_tasks_in_known_columns() {
        let data = default_dataset();
        let ids: Vec<&str> = data.columns.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["todo", "in-progress", "done"]);
        assert_eq!(data.tasks.len(), 2);
        assert_eq!(data.tasks[0].title, "Welcome to Postio!");
        assert_eq!(data.tasks[0].column_id.as_str(), "todo");
        assert_eq!(data.tasks[0].color, TaskColor::DeepTeal);
        assert_eq!(data.tasks[1].column_id.as_str(), "in-progress");
        assert!(data.tasks.iter().all(|t| !t.completed && t.completed_at.is_none()));
    }
}
