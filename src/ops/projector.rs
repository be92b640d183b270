use crate::model::{Column, ColumnId, Task};
use crate::ops::store::TaskStore;

/// One column with its tasks in board order
#[derive(Debug, Clone)]
pub struct ColumnView<'a> {
    pub column: &'a Column,
    pub tasks: Vec<&'a Task>,
}

impl ColumnView<'_> {
    /// Number of completed tasks (the header shows `completed/total`)
    pub fn completed(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    pub fn total(&self) -> usize {
        self.tasks.len()
    }

    pub fn position_of(&self, id: &crate::model::TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.id == id)
    }
}

/// Tasks of `column_id`, in their overall sequence order.
pub fn column_view<'a>(tasks: &'a [Task], column_id: &ColumnId) -> Vec<&'a Task> {
    tasks.iter().filter(|t| &t.column_id == column_id).collect()
}

/// Every configured column with its tasks, in column order.
pub fn board_view(store: &TaskStore) -> Vec<ColumnView<'_>> {
    store
        .columns()
        .iter()
        .map(|column| ColumnView {
            column,
            tasks: column_view(store.tasks(), &column.id),
        })
        .collect()
}

/// Overall sequence index that lands a task at `position` within the view
/// of `column_id`. Positions past the end map to just after the column's
/// last task, or to the end of the sequence for an empty column.
pub fn overall_index(tasks: &[Task], column_id: &ColumnId, position: usize) -> usize {
    let indices: Vec<usize> = tasks
        .iter()
        .enumerate()
        .filter(|(_, t)| &t.column_id == column_id)
        .map(|(i, _)| i)
        .collect();
    match indices.get(position) {
        Some(&idx) => idx,
        None => indices.last().map_or(tasks.len(), |&last| last + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use crate::model::TaskColor;

    fn task(id: &str, column: &str, completed: bool) -> Task {
        Task {
            id: id.into(),
            column_id: column.into(),
            title: id.to_string(),
            description: None,
            color: TaskColor::White,
            completed,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    fn sample() -> Vec<Task> {
        vec![
            task("1", "a", false),
            task("2", "b", true),
            task("3", "a", true),
            task("4", "b", false),
            task("5", "a", false),
        ]
    }

    fn ids(view: &[&Task]) -> Vec<String> {
        view.iter().map(|t| t.id.to_string()).collect()
    }

    #[test]
    fn test_column_view_is_ordered_subsequence() {
        let tasks = sample();
        assert_eq!(ids(&column_view(&tasks, &"a".into())), vec!["1", "3", "5"]);
        assert_eq!(ids(&column_view(&tasks, &"b".into())), vec!["2", "4"]);
        assert!(column_view(&tasks, &"c".into()).is_empty());
    }

    #[test]
    fn test_views_partition_the_sequence() {
        let tasks = sample();
        let a = column_view(&tasks, &"a".into());
        let b = column_view(&tasks, &"b".into());
        assert_eq!(a.len() + b.len(), tasks.len());
        // Relative order matches the full sequence
        let positions: Vec<usize> = a
            .iter()
            .map(|t| tasks.iter().position(|x| x.id == t.id).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_board_view_counts() {
        let store = TaskStore::new(
            vec![
                Column::new("a", "A"),
                Column::new("b", "B"),
                Column::new("c", "C"),
            ],
            sample(),
        );
        let board = board_view(&store);
        assert_eq!(board.len(), 3);
        assert_eq!((board[0].completed(), board[0].total()), (1, 3));
        assert_eq!((board[1].completed(), board[1].total()), (1, 2));
        assert_eq!((board[2].completed(), board[2].total()), (0, 0));
        assert_eq!(board[1].position_of(&"4".into()), Some(1));
    }

    #[test]
    fn test_overall_index() {
        let tasks = sample();
        assert_eq!(overall_index(&tasks, &"a".into(), 0), 0);
        assert_eq!(overall_index(&tasks, &"a".into(), 1), 2);
        assert_eq!(overall_index(&tasks, &"b".into(), 1), 3);
        // Past the end: just after the column's last task
        assert_eq!(overall_index(&tasks, &"b".into(), 7), 4);
        // Empty column: end of sequence
        assert_eq!(overall_index(&tasks, &"c".into(), 0), 5);
    }
}
