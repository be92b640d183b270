use tracing::debug;

use crate::model::{ColumnId, TaskId};
use crate::ops::store::TaskStore;

/// What the dragged card is currently over
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// Another card
    Task(TaskId),
    /// The list area of a column (not a specific card)
    Column(ColumnId),
}

/// Input-agnostic gesture events, produced by the sensors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureEvent {
    Start(TaskId),
    MoveOver(DropTarget),
    End(Option<DropTarget>),
    Cancel,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        active: TaskId,
        over: Option<DropTarget>,
    },
}

/// Drag session state machine.
///
/// `move_over` mutates the store directly so the board shows a live preview
/// of the drop. Ending a drag without a task target keeps whatever the last
/// preview produced; nothing is rolled back.
#[derive(Debug, Clone)]
pub struct DragController {
    state: DragState,
    enabled: bool,
}

impl Default for DragController {
    fn default() -> Self {
        DragController::new()
    }
}

impl DragController {
    pub fn new() -> Self {
        DragController {
            state: DragState::Idle,
            enabled: true,
        }
    }

    /// Read-only mode disables every transition.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// The card being dragged
    pub fn active(&self) -> Option<&TaskId> {
        match &self.state {
            DragState::Dragging { active, .. } => Some(active),
            DragState::Idle => None,
        }
    }

    /// The last hover target
    pub fn over(&self) -> Option<&DropTarget> {
        match &self.state {
            DragState::Dragging { over, .. } => over.as_ref(),
            DragState::Idle => None,
        }
    }

    /// Feed one gesture event. Returns whether the store changed.
    pub fn handle(&mut self, store: &mut TaskStore, event: GestureEvent) -> bool {
        match event {
            GestureEvent::Start(id) => {
                self.start(store, &id);
                false
            }
            GestureEvent::MoveOver(target) => self.move_over(store, target),
            GestureEvent::End(target) => self.end(store, target),
            GestureEvent::Cancel => {
                self.cancel();
                false
            }
        }
    }

    /// Begin dragging `id`. Ignored while a drag is already running, in
    /// read-only mode, or for an id the store doesn't know.
    pub fn start(&mut self, store: &TaskStore, id: &TaskId) -> bool {
        if !self.enabled || self.is_dragging() || store.get(id).is_none() {
            return false;
        }
        debug!(id = %id, "drag start");
        self.state = DragState::Dragging {
            active: id.clone(),
            over: None,
        };
        true
    }

    /// Hover target changed: apply the live preview.
    pub fn move_over(&mut self, store: &mut TaskStore, target: DropTarget) -> bool {
        if !self.enabled {
            return false;
        }
        let active = match &mut self.state {
            DragState::Dragging { active, over } => {
                *over = Some(target.clone());
                active.clone()
            }
            DragState::Idle => return false,
        };

        match target {
            DropTarget::Task(over_id) => {
                if over_id == active {
                    return false;
                }
                let Some((from, over_idx, same_column)) = locate(store, &active, &over_id) else {
                    return false;
                };
                if same_column {
                    if from == over_idx {
                        return false;
                    }
                    debug!(active = %active, from, to = over_idx, "preview reorder");
                    store.reorder(&active, over_idx).is_ok()
                } else {
                    // Land directly in front of the hovered card
                    let to = if from < over_idx { over_idx - 1 } else { over_idx };
                    let column = store.tasks()[over_idx].column_id.clone();
                    debug!(active = %active, column = %column, from, to, "preview column move");
                    store.move_to_column(&active, &column, to).is_ok()
                }
            }
            DropTarget::Column(column) => {
                let Some(from) = store.index_of(&active) else {
                    return false;
                };
                if store.tasks()[from].column_id == column {
                    return false;
                }
                debug!(active = %active, column = %column, "preview column change");
                store.move_to_column(&active, &column, from).is_ok()
            }
        }
    }

    /// Release. A task target commits the final position; anything else
    /// abandons the drag and keeps the last preview.
    pub fn end(&mut self, store: &mut TaskStore, target: Option<DropTarget>) -> bool {
        if !self.enabled {
            return false;
        }
        let active = match std::mem::take(&mut self.state) {
            DragState::Dragging { active, .. } => active,
            DragState::Idle => return false,
        };

        let over_id = match target {
            Some(DropTarget::Task(over_id)) if over_id != active => over_id,
            _ => {
                debug!(active = %active, "drag ended without a target");
                return false;
            }
        };
        let Some((from, over_idx, same_column)) = locate(store, &active, &over_id) else {
            return false;
        };
        debug!(active = %active, over = %over_id, from, to = over_idx, "drag commit");
        if same_column {
            store.reorder(&active, over_idx).is_ok() && from != over_idx
        } else {
            let column = store.tasks()[over_idx].column_id.clone();
            store.move_to_column(&active, &column, over_idx).is_ok()
        }
    }

    /// Abandon the drag without touching the store.
    pub fn cancel(&mut self) {
        if !self.enabled {
            return;
        }
        if self.is_dragging() {
            debug!("drag cancelled");
        }
        self.state = DragState::Idle;
    }
}

/// Indices of the active and hovered tasks, and whether they share a column.
fn locate(store: &TaskStore, active: &TaskId, over: &TaskId) -> Option<(usize, usize, bool)> {
    let from = store.index_of(active)?;
    let over_idx = store.index_of(over)?;
    let same = store.tasks()[from].column_id == store.tasks()[over_idx].column_id;
    Some((from, over_idx, same))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use crate::model::{Column, Task, TaskColor};
    use crate::ops::projector::column_view;

    fn task(id: &str, column: &str) -> Task {
        Task {
            id: id.into(),
            column_id: column.into(),
            title: id.to_string(),
            description: None,
            color: TaskColor::White,
            completed: false,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    fn store_with(tasks: &[(&str, &str)]) -> TaskStore {
        TaskStore::new(
            vec![Column::new("a", "A"), Column::new("b", "B")],
            tasks.iter().map(|(id, col)| task(id, col)).collect(),
        )
    }

    fn order(store: &TaskStore) -> Vec<String> {
        store.tasks().iter().map(|t| t.id.to_string()).collect()
    }

    fn view(store: &TaskStore, column: &str) -> Vec<String> {
        column_view(store.tasks(), &column.into())
            .iter()
            .map(|t| t.id.to_string())
            .collect()
    }

    fn t(id: &str) -> DropTarget {
        DropTarget::Task(id.into())
    }

    #[test]
    fn drop_onto_sibling_swaps_order() {
        let mut store = store_with(&[("T1", "a"), ("T2", "a")]);
        let mut drag = DragController::new();
        assert!(drag.start(&store, &"T2".into()));
        assert!(drag.end(&mut store, Some(t("T1"))));
        assert_eq!(order(&store), vec!["T2", "T1"]);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn start_requires_known_task_and_idle_state() {
        let store = store_with(&[("T1", "a"), ("T2", "a")]);
        let mut drag = DragController::new();
        assert!(!drag.start(&store, &"nope".into()));
        assert!(drag.start(&store, &"T1".into()));
        assert!(!drag.start(&store, &"T2".into()));
        assert_eq!(drag.active(), Some(&"T1".into()));
    }

    #[test]
    fn read_only_suppresses_everything() {
        let mut store = store_with(&[("T1", "a"), ("T2", "a")]);
        let mut drag = DragController::new();
        drag.set_enabled(false);
        assert!(!drag.start(&store, &"T1".into()));
        assert_eq!(drag.state(), &DragState::Idle);

        // Disabled mid-drag: no transitions, no mutations
        drag.set_enabled(true);
        drag.start(&store, &"T2".into());
        drag.set_enabled(false);
        assert!(!drag.move_over(&mut store, t("T1")));
        assert!(!drag.end(&mut store, Some(t("T1"))));
        drag.cancel();
        assert!(drag.is_dragging());
        assert_eq!(order(&store), vec!["T1", "T2"]);
    }

    #[test]
    fn self_target_is_noop() {
        let mut store = store_with(&[("T1", "a"), ("T2", "a")]);
        let mut drag = DragController::new();
        drag.start(&store, &"T1".into());
        assert!(!drag.move_over(&mut store, t("T1")));
        assert!(!drag.end(&mut store, Some(t("T1"))));
        assert_eq!(order(&store), vec!["T1", "T2"]);
    }

    #[test]
    fn move_over_same_column_reorders_live() {
        let mut store = store_with(&[("T1", "a"), ("T2", "a"), ("T3", "a")]);
        let mut drag = DragController::new();
        drag.start(&store, &"T1".into());
        assert!(drag.move_over(&mut store, t("T3")));
        assert_eq!(order(&store), vec!["T2", "T3", "T1"]);
        assert_eq!(drag.over(), Some(&t("T3")));
        // Each new hover event on the card moves past it again
        assert!(drag.move_over(&mut store, t("T3")));
        assert_eq!(order(&store), vec!["T2", "T1", "T3"]);
        assert!(drag.move_over(&mut store, t("T3")));
        assert_eq!(order(&store), vec!["T2", "T3", "T1"]);
    }

    #[test]
    fn move_over_task_in_other_column_lands_before_it() {
        // Active earlier in the sequence than the target
        let mut store = store_with(&[("T1", "a"), ("T2", "a"), ("T3", "b"), ("T4", "b")]);
        let mut drag = DragController::new();
        drag.start(&store, &"T1".into());
        assert!(drag.move_over(&mut store, t("T4")));
        assert_eq!(store.get(&"T1".into()).unwrap().column_id.as_str(), "b");
        assert_eq!(view(&store, "b"), vec!["T3", "T1", "T4"]);
        assert_eq!(view(&store, "a"), vec!["T2"]);

        // Active later in the sequence than the target
        let mut store = store_with(&[("T3", "b"), ("T1", "a"), ("T2", "a")]);
        let mut drag = DragController::new();
        drag.start(&store, &"T2".into());
        assert!(drag.move_over(&mut store, t("T3")));
        assert_eq!(view(&store, "b"), vec!["T2", "T3"]);
        assert_eq!(view(&store, "a"), vec!["T1"]);
    }

    #[test]
    fn move_over_column_changes_column_in_place() {
        let mut store = store_with(&[("T1", "a"), ("T2", "a"), ("T3", "b")]);
        let mut drag = DragController::new();
        drag.start(&store, &"T2".into());
        assert!(drag.move_over(&mut store, DropTarget::Column("b".into())));
        assert_eq!(order(&store), vec!["T1", "T2", "T3"]);
        assert_eq!(view(&store, "b"), vec!["T2", "T3"]);
        // Already there: nothing to do
        assert!(!drag.move_over(&mut store, DropTarget::Column("b".into())));
    }

    #[test]
    fn abandon_keeps_last_preview() {
        let mut store = store_with(&[("T1", "a"), ("T2", "a"), ("T3", "b")]);
        let mut drag = DragController::new();
        drag.start(&store, &"T1".into());
        drag.move_over(&mut store, DropTarget::Column("b".into()));
        assert!(!drag.end(&mut store, None));
        assert!(!drag.is_dragging());
        assert_eq!(store.get(&"T1".into()).unwrap().column_id.as_str(), "b");

        drag.start(&store, &"T2".into());
        drag.move_over(&mut store, DropTarget::Column("b".into()));
        drag.cancel();
        assert_eq!(view(&store, "b"), vec!["T1", "T2", "T3"]);
    }

    #[test]
    fn column_target_on_release_is_abandon() {
        let mut store = store_with(&[("T1", "a"), ("T2", "b")]);
        let mut drag = DragController::new();
        drag.start(&store, &"T1".into());
        assert!(!drag.end(&mut store, Some(DropTarget::Column("b".into()))));
        assert_eq!(store.get(&"T1".into()).unwrap().column_id.as_str(), "a");
    }

    #[test]
    fn commit_across_columns_uses_target_index() {
        // Commit: plain array move to the target's index
        let mut store = store_with(&[("T1", "a"), ("T2", "a"), ("T3", "b"), ("T4", "b")]);
        let mut drag = DragController::new();
        drag.start(&store, &"T1".into());
        assert!(drag.end(&mut store, Some(t("T3"))));
        assert_eq!(order(&store), vec!["T2", "T3", "T1", "T4"]);
        assert_eq!(view(&store, "b"), vec!["T3", "T1", "T4"]);

        // The live preview for the same hover lands one slot earlier
        let mut store = store_with(&[("T1", "a"), ("T2", "a"), ("T3", "b"), ("T4", "b")]);
        let mut drag = DragController::new();
        drag.start(&store, &"T1".into());
        drag.move_over(&mut store, t("T3"));
        assert_eq!(view(&store, "b"), vec!["T1", "T3", "T4"]);
    }

    #[test]
    fn last_task_after_itself_is_noop() {
        let mut store = store_with(&[("T1", "a"), ("T2", "a")]);
        let mut drag = DragController::new();
        drag.start(&store, &"T2".into());
        assert!(!drag.move_over(&mut store, t("T2")));
        assert!(!drag.move_over(&mut store, DropTarget::Column("a".into())));
        assert_eq!(order(&store), vec!["T1", "T2"]);
    }

    #[test]
    fn handle_routes_events() {
        let mut store = store_with(&[("T1", "a"), ("T2", "a")]);
        let mut drag = DragController::new();
        assert!(!drag.handle(&mut store, GestureEvent::Start("T2".into())));
        assert!(drag.is_dragging());
        assert!(drag.handle(&mut store, GestureEvent::MoveOver(t("T1"))));
        assert_eq!(order(&store), vec!["T2", "T1"]);
        assert!(!drag.handle(&mut store, GestureEvent::End(Some(t("T2")))));
        assert!(!drag.is_dragging());
        assert_eq!(order(&store), vec!["T2", "T1"]);
    }
}
