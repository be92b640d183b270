//! Input sensors: turn raw pointer, touch and keyboard input into
//! [`GestureEvent`]s so the drag controller never sees the input modality.

use std::time::{Duration, Instant};

use crate::model::TaskId;
use crate::ops::drag::{DropTarget, GestureEvent};
use crate::ops::projector::board_view;
use crate::ops::store::TaskStore;

/// A terminal cell position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: u16,
    pub y: u16,
}

impl Point {
    pub fn new(x: u16, y: u16) -> Self {
        Point { x, y }
    }

    /// Chebyshev distance in cells
    pub fn distance(self, other: Point) -> u16 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

/// What a pointer or touch release amounted to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Release {
    /// No press was being tracked (or it was aborted)
    Ignored,
    /// Released before a drag activated
    Click(TaskId),
    /// Released while dragging
    Drop(GestureEvent),
}

#[derive(Debug, Clone, Default)]
enum Phase {
    #[default]
    Idle,
    Pending {
        id: TaskId,
        origin: Point,
        /// Press time, kept only by the hold sensor
        since: Option<Instant>,
    },
    Active {
        over: Option<DropTarget>,
    },
}

impl Phase {
    /// Activation: emit `Start`, then the first hover target if any.
    fn activate(&mut self, id: TaskId, target: Option<DropTarget>) -> Vec<GestureEvent> {
        let mut events = vec![GestureEvent::Start(id)];
        if let Some(t) = &target {
            events.push(GestureEvent::MoveOver(t.clone()));
        }
        *self = Phase::Active { over: target };
        events
    }

    /// While active, report the hover target only when it changes.
    fn hover(&mut self, target: Option<DropTarget>) -> Vec<GestureEvent> {
        match self {
            Phase::Active { over } if *over != target => {
                *over = target.clone();
                target.map(GestureEvent::MoveOver).into_iter().collect()
            }
            _ => Vec::new(),
        }
    }

    fn release(&mut self, target: Option<DropTarget>) -> Release {
        match std::mem::take(self) {
            Phase::Idle => Release::Ignored,
            Phase::Pending { id, .. } => Release::Click(id),
            Phase::Active { .. } => Release::Drop(GestureEvent::End(target)),
        }
    }

    fn cancel(&mut self) -> Option<GestureEvent> {
        match std::mem::take(self) {
            Phase::Active { .. } => Some(GestureEvent::Cancel),
            _ => None,
        }
    }

    fn is_active(&self) -> bool {
        matches!(self, Phase::Active { .. })
    }
}

/// Mouse sensor: a press becomes a drag once the pointer has travelled
/// `distance` cells, so plain clicks stay clicks.
#[derive(Debug, Clone)]
pub struct PointerSensor {
    distance: u16,
    phase: Phase,
}

impl PointerSensor {
    pub fn new(distance: u16) -> Self {
        PointerSensor {
            distance: distance.max(1),
            phase: Phase::Idle,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.phase.is_active()
    }

    /// Press on a card. Presses elsewhere (`None`) are not tracked.
    pub fn press(&mut self, id: Option<TaskId>, at: Point) {
        if self.phase.is_active() {
            return;
        }
        self.phase = match id {
            Some(id) => Phase::Pending {
                id,
                origin: at,
                since: None,
            },
            None => Phase::Idle,
        };
    }

    pub fn motion(
        &mut self,
        at: Point,
        hit: impl Fn(Point) -> Option<DropTarget>,
    ) -> Vec<GestureEvent> {
        match &self.phase {
            Phase::Pending { id, origin, .. } if origin.distance(at) >= self.distance => {
                let id = id.clone();
                self.phase.activate(id, hit(at))
            }
            Phase::Active { .. } => self.phase.hover(hit(at)),
            _ => Vec::new(),
        }
    }

    pub fn release(&mut self, at: Point, hit: impl Fn(Point) -> Option<DropTarget>) -> Release {
        let target = if self.phase.is_active() { hit(at) } else { None };
        self.phase.release(target)
    }

    pub fn cancel(&mut self) -> Option<GestureEvent> {
        self.phase.cancel()
    }
}

/// Long-press sensor: a press becomes a drag after being held for `delay`
/// without moving more than `tolerance` cells. Moving farther first aborts
/// the press (it was a scroll, not a drag).
#[derive(Debug, Clone)]
pub struct TouchSensor {
    delay: Duration,
    tolerance: u16,
    phase: Phase,
}

impl TouchSensor {
    pub fn new(delay: Duration, tolerance: u16) -> Self {
        TouchSensor {
            delay,
            tolerance,
            phase: Phase::Idle,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.phase.is_active()
    }

    pub fn press(&mut self, id: Option<TaskId>, at: Point, now: Instant) {
        if self.phase.is_active() {
            return;
        }
        self.phase = match id {
            Some(id) => Phase::Pending {
                id,
                origin: at,
                since: Some(now),
            },
            None => Phase::Idle,
        };
    }

    pub fn motion(
        &mut self,
        at: Point,
        now: Instant,
        hit: impl Fn(Point) -> Option<DropTarget>,
    ) -> Vec<GestureEvent> {
        match &self.phase {
            Phase::Pending { origin, .. } if origin.distance(at) > self.tolerance => {
                self.phase = Phase::Idle;
                Vec::new()
            }
            Phase::Pending {
                id,
                since: Some(since),
                ..
            } if now.duration_since(*since) >= self.delay => {
                let id = id.clone();
                self.phase.activate(id, hit(at))
            }
            Phase::Active { .. } => self.phase.hover(hit(at)),
            _ => Vec::new(),
        }
    }

    /// Timer tick while the press is held still
    pub fn tick(&mut self, now: Instant) -> Vec<GestureEvent> {
        match &self.phase {
            Phase::Pending {
                id,
                since: Some(since),
                ..
            } if now.duration_since(*since) >= self.delay => {
                let id = id.clone();
                self.phase.activate(id, None)
            }
            _ => Vec::new(),
        }
    }

    pub fn release(&mut self, at: Point, hit: impl Fn(Point) -> Option<DropTarget>) -> Release {
        let target = if self.phase.is_active() { hit(at) } else { None };
        self.phase.release(target)
    }

    pub fn cancel(&mut self) -> Option<GestureEvent> {
        self.phase.cancel()
    }
}

/// Arrow-key direction for keyboard moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Keyboard sensor: pick a card up, move it one slot at a time, drop it.
#[derive(Debug, Clone, Default)]
pub struct KeyboardSensor {
    active: Option<TaskId>,
}

impl KeyboardSensor {
    pub fn new() -> Self {
        KeyboardSensor::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn pick_up(&mut self, id: TaskId) -> Option<GestureEvent> {
        if self.active.is_some() {
            return None;
        }
        self.active = Some(id.clone());
        Some(GestureEvent::Start(id))
    }

    /// Target one slot away from the active card in `direction`.
    /// Up/down stay in the column; left/right take the card at the same row
    /// of the neighbouring column, or the column itself when it is shorter.
    pub fn step(&self, direction: Direction, store: &TaskStore) -> Option<GestureEvent> {
        let active = self.active.as_ref()?;
        let board = board_view(store);
        let (col, row) = board
            .iter()
            .enumerate()
            .find_map(|(c, view)| view.position_of(active).map(|r| (c, r)))?;

        let target = match direction {
            Direction::Up => {
                DropTarget::Task(board[col].tasks.get(row.checked_sub(1)?)?.id.clone())
            }
            Direction::Down => DropTarget::Task(board[col].tasks.get(row + 1)?.id.clone()),
            Direction::Left | Direction::Right => {
                let next = if direction == Direction::Left {
                    col.checked_sub(1)?
                } else {
                    col + 1
                };
                let view = board.get(next)?;
                match view.tasks.get(row) {
                    Some(task) => DropTarget::Task(task.id.clone()),
                    None => DropTarget::Column(view.column.id.clone()),
                }
            }
        };
        Some(GestureEvent::MoveOver(target))
    }

    /// Drop in place. After the live moves the card already sits in its
    /// slot, so the release target is the card itself.
    pub fn drop(&mut self) -> Option<GestureEvent> {
        let active = self.active.take()?;
        Some(GestureEvent::End(Some(DropTarget::Task(active))))
    }

    pub fn cancel(&mut self) -> Option<GestureEvent> {
        self.active.take().map(|_| GestureEvent::Cancel)
    }
}
