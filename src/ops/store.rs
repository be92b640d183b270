use chrono::Utc;
use tracing::{debug, warn};

use crate::model::{Column, ColumnId, NewTask, Task, TaskId, TaskPatch};

/// Error type for task store operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("task not found: {0}")]
    NotFound(TaskId),
    #[error("unknown column: {0}")]
    UnknownColumn(ColumnId),
}

/// Receives the full task sequence after every successful mutation
pub trait StoreObserver {
    fn on_change(&mut self, tasks: &[Task]);
}

/// The ordered task sequence and the fixed columns it is split into.
///
/// Tasks of one column are ordered by their position in the overall
/// sequence; the relative order of tasks in different columns carries no
/// meaning. Every task references one of `columns`.
pub struct TaskStore {
    columns: Vec<Column>,
    tasks: Vec<Task>,
    observer: Option<Box<dyn StoreObserver>>,
}

impl std::fmt::Debug for TaskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskStore")
            .field("columns", &self.columns)
            .field("tasks", &self.tasks)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl TaskStore {
    /// Build a store. Tasks that reference a column not in `columns` are
    /// dropped.
    pub fn new(columns: Vec<Column>, tasks: Vec<Task>) -> Self {
        let mut store = TaskStore {
            columns,
            tasks: Vec::new(),
            observer: None,
        };
        store.tasks = store.retain_known_columns(tasks);
        store
    }

    /// Install the change observer (persistence). Replaces any previous one.
    pub fn set_observer(&mut self, observer: Box<dyn StoreObserver>) {
        self.observer = Some(observer);
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| &c.id == id)
    }

    pub fn has_column(&self, id: &ColumnId) -> bool {
        self.column(id).is_some()
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// Position of a task in the overall sequence
    pub fn index_of(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.id == id)
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Append a new task to `column_id`. The title is taken as given.
    pub fn add(&mut self, column_id: &ColumnId, fields: NewTask) -> Result<&Task, StoreError> {
        if !self.has_column(column_id) {
            return Err(StoreError::UnknownColumn(column_id.clone()));
        }
        let task = Task {
            id: self.next_id(),
            column_id: column_id.clone(),
            title: fields.title,
            description: fields.description,
            color: fields.color,
            completed: false,
            created_at: Utc::now(),
            completed_at: None,
        };
        debug!(id = %task.id, column = %column_id, "add task");
        self.tasks.push(task);
        self.notify();
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Merge `patch` into the task with `id`.
    pub fn update(&mut self, id: &TaskId, patch: TaskPatch) -> Result<(), StoreError> {
        let idx = self.require(id)?;
        patch.apply(&mut self.tasks[idx]);
        self.notify();
        Ok(())
    }

    /// Remove a task, keeping the order of the rest.
    pub fn remove(&mut self, id: &TaskId) -> Result<Task, StoreError> {
        let idx = self.require(id)?;
        let task = self.tasks.remove(idx);
        debug!(id = %id, "remove task");
        self.notify();
        Ok(task)
    }

    /// Flip the completion flag. Returns the new value.
    pub fn toggle_complete(&mut self, id: &TaskId) -> Result<bool, StoreError> {
        let idx = self.require(id)?;
        let task = &mut self.tasks[idx];
        let completed = !task.completed;
        task.set_completed(completed, Utc::now());
        self.notify();
        Ok(completed)
    }

    /// Move a task to `target_index` in the overall sequence without
    /// changing its column. The index is clamped to the sequence. Moving a
    /// task onto its own index changes nothing and notifies no one.
    pub fn reorder(&mut self, id: &TaskId, target_index: usize) -> Result<(), StoreError> {
        let from = self.require(id)?;
        let to = target_index.min(self.tasks.len() - 1);
        if from == to {
            return Ok(());
        }
        array_move(&mut self.tasks, from, to);
        debug!(id = %id, from, to, "reorder");
        self.notify();
        Ok(())
    }

    /// Assign a task to `column_id` and move it to `target_index` in one step.
    pub fn move_to_column(
        &mut self,
        id: &TaskId,
        column_id: &ColumnId,
        target_index: usize,
    ) -> Result<(), StoreError> {
        if !self.has_column(column_id) {
            return Err(StoreError::UnknownColumn(column_id.clone()));
        }
        let from = self.require(id)?;
        let to = target_index.min(self.tasks.len() - 1);
        self.tasks[from].column_id = column_id.clone();
        array_move(&mut self.tasks, from, to);
        debug!(id = %id, column = %column_id, from, to, "move to column");
        self.notify();
        Ok(())
    }

    /// Replace the whole sequence (reset to defaults).
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = self.retain_known_columns(tasks);
        self.notify();
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn require(&self, id: &TaskId) -> Result<usize, StoreError> {
        self.index_of(id).ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn notify(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer.on_change(&self.tasks);
        }
    }

    fn retain_known_columns(&self, tasks: Vec<Task>) -> Vec<Task> {
        tasks
            .into_iter()
            .filter(|t| {
                let known = self.has_column(&t.column_id);
                if !known {
                    warn!(id = %t.id, column = %t.column_id, "dropping task with unknown column");
                }
                known
            })
            .collect()
    }

    /// Millisecond timestamp id, bumped past any collision.
    fn next_id(&self) -> TaskId {
        let mut candidate = Utc::now().timestamp_millis();
        while self.tasks.iter().any(|t| t.id.as_str() == candidate.to_string()) {
            candidate += 1;
        }
        TaskId::new(candidate.to_string())
    }
}

/// Remove the element at `from` and insert it at `to` (clamped to the
/// shortened list). `from == to` leaves the list unchanged.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() || from == to {
        return;
    }
    let item = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, item);
}
