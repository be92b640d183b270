use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use tracing::{info, warn};

use crate::io::config_io::read_config;
use crate::io::paths::log_path;
use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::io::storage::{FileStorage, Storage, atomic_write, clear_tasks, open_store};
use crate::model::dataset::default_dataset;
use crate::model::{BoardConfig, ColumnId, PointerMode, TaskId};
use crate::ops::drag::{DragController, DropTarget, GestureEvent};
use crate::ops::export::{EXPORT_FILE_NAME, export_board};
use crate::ops::projector::column_view;
use crate::ops::sensor::{KeyboardSensor, Point, PointerSensor, TouchSensor};
use crate::ops::store::TaskStore;
use crate::util::logging;

use super::input;
use super::input::form::FormState;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Keyboard drag in progress
    Drag,
    Form,
    Confirm,
}

/// Action awaiting y/n
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteTask(TaskId),
    ResetBoard,
}

#[derive(Debug, Clone)]
pub struct ConfirmState {
    pub message: String,
    pub action: ConfirmAction,
}

/// Screen areas of the last rendered frame, used to resolve mouse positions
/// into cards and columns.
#[derive(Debug, Clone, Default)]
pub struct HitMap {
    cards: Vec<(Rect, TaskId)>,
    columns: Vec<(Rect, ColumnId)>,
}

impl HitMap {
    pub fn push_card(&mut self, area: Rect, id: TaskId) {
        self.cards.push((area, id));
    }

    pub fn push_column(&mut self, area: Rect, id: ColumnId) {
        self.columns.push((area, id));
    }

    pub fn card_at(&self, at: Point) -> Option<TaskId> {
        self.cards
            .iter()
            .find(|(r, _)| rect_contains(*r, at))
            .map(|(_, id)| id.clone())
    }

    /// Card under the point, else the column under it
    pub fn target_at(&self, at: Point) -> Option<DropTarget> {
        self.card_at(at).map(DropTarget::Task).or_else(|| {
            self.columns
                .iter()
                .find(|(r, _)| rect_contains(*r, at))
                .map(|(_, id)| DropTarget::Column(id.clone()))
        })
    }
}

fn rect_contains(r: Rect, at: Point) -> bool {
    at.x >= r.x && at.x < r.x + r.width && at.y >= r.y && at.y < r.y + r.height
}

/// Main application state
pub struct App {
    pub store: TaskStore,
    /// Same storage the store persists through; reset clears it directly
    pub storage: Box<dyn Storage>,
    pub drag: DragController,
    pub pointer: PointerSensor,
    pub touch: TouchSensor,
    pub keyboard: KeyboardSensor,
    pub pointer_mode: PointerMode,
    pub theme: Theme,
    pub mode: Mode,
    pub should_quit: bool,
    pub show_help: bool,
    pub cursor_col: usize,
    pub cursor_row: usize,
    pub form: Option<FormState>,
    pub confirm: Option<ConfirmState>,
    pub status_message: Option<String>,
    pub hits: HitMap,
    pub export_path: PathBuf,
}

impl App {
    pub fn new(store: TaskStore, storage: Box<dyn Storage>, config: &BoardConfig) -> Self {
        let input = &config.input;
        App {
            store,
            storage,
            drag: DragController::new(),
            pointer: PointerSensor::new(input.drag_distance),
            touch: TouchSensor::new(
                Duration::from_millis(input.hold_delay_ms),
                input.hold_tolerance,
            ),
            keyboard: KeyboardSensor::new(),
            pointer_mode: input.pointer,
            theme: Theme::from_config(&config.ui),
            mode: Mode::Navigate,
            should_quit: false,
            show_help: false,
            cursor_col: 0,
            cursor_row: 0,
            form: None,
            confirm: None,
            status_message: None,
            hits: HitMap::default(),
            export_path: PathBuf::from(EXPORT_FILE_NAME),
        }
    }

    pub fn is_editable(&self) -> bool {
        self.drag.is_enabled()
    }

    /// Switch between edit and view mode. Any drag in flight is cancelled
    /// first; its live moves stay where they are.
    pub fn set_editable(&mut self, editable: bool) {
        if !editable {
            self.cancel_drags();
            if self.mode == Mode::Drag {
                self.mode = Mode::Navigate;
            }
        }
        self.drag.set_enabled(editable);
    }

    fn cancel_drags(&mut self) {
        let events: Vec<GestureEvent> = [
            self.keyboard.cancel(),
            self.pointer.cancel(),
            self.touch.cancel(),
        ]
        .into_iter()
        .flatten()
        .collect();
        self.apply_gestures(events);
    }

    /// Column id under the cursor
    pub fn current_column(&self) -> Option<&ColumnId> {
        self.store.columns().get(self.cursor_col).map(|c| &c.id)
    }

    /// Number of cards in the cursor's column
    pub fn current_column_len(&self) -> usize {
        self.current_column()
            .map_or(0, |c| column_view(self.store.tasks(), c).len())
    }

    /// Task under the cursor
    pub fn selected_task(&self) -> Option<TaskId> {
        let column = self.current_column()?;
        column_view(self.store.tasks(), column)
            .get(self.cursor_row)
            .map(|t| t.id.clone())
    }

    /// Move the cursor onto a task, wherever it is on the board
    pub fn select(&mut self, id: &TaskId) {
        let Some(task) = self.store.get(id) else {
            return;
        };
        let column = task.column_id.clone();
        if let Some(col) = self.store.columns().iter().position(|c| c.id == column) {
            self.cursor_col = col;
            self.cursor_row = column_view(self.store.tasks(), &column)
                .iter()
                .position(|t| &t.id == id)
                .unwrap_or(0);
        }
    }

    /// Keep the cursor inside the board after tasks disappear
    pub fn clamp_cursor(&mut self) {
        let cols = self.store.columns().len();
        self.cursor_col = self.cursor_col.min(cols.saturating_sub(1));
        self.cursor_row = self
            .cursor_row
            .min(self.current_column_len().saturating_sub(1));
    }

    pub fn open_form(&mut self, form: FormState) {
        self.form = Some(form);
        self.mode = Mode::Form;
    }

    pub fn open_confirm(&mut self, message: impl Into<String>, action: ConfirmAction) {
        self.confirm = Some(ConfirmState {
            message: message.into(),
            action,
        });
        self.mode = Mode::Confirm;
    }

    /// Feed a gesture to the drag controller and keep the cursor on the
    /// dragged card.
    pub fn apply_gesture(&mut self, event: GestureEvent) {
        let follow = match &event {
            GestureEvent::Start(id) => Some(id.clone()),
            _ => self.drag.active().cloned(),
        };
        self.drag.handle(&mut self.store, event);
        if let Some(id) = follow {
            self.select(&id);
        }
    }

    pub fn apply_gestures(&mut self, events: Vec<GestureEvent>) {
        for event in events {
            self.apply_gesture(event);
        }
    }

    /// Drive the long-press timer
    pub fn tick(&mut self, now: Instant) {
        if self.pointer_mode == PointerMode::Hold {
            let events = self.touch.tick(now);
            self.apply_gestures(events);
        }
    }

    /// Write the board to `export_path`
    pub fn export(&mut self) {
        let result = export_board(self.store.columns(), self.store.tasks())
            .map_err(|e| e.to_string())
            .and_then(|text| {
                atomic_write(&self.export_path, text.as_bytes()).map_err(|e| e.to_string())
            });
        self.status_message = Some(match result {
            Ok(()) => {
                info!(path = %self.export_path.display(), "board exported");
                format!(
                    "exported {} tasks to {}",
                    self.store.len(),
                    self.export_path.display()
                )
            }
            Err(e) => {
                warn!("export failed: {}", e);
                format!("export failed: {}", e)
            }
        });
    }

    /// Drop the stored board and go back to the default tasks
    pub fn reset_board(&mut self) {
        if let Err(e) = clear_tasks(self.storage.as_mut()) {
            warn!("could not clear stored tasks: {}", e);
        }
        self.store.replace_all(default_dataset().tasks);
        self.cursor_col = 0;
        self.cursor_row = 0;
        info!("board reset to defaults");
        self.status_message = Some("board reset".into());
    }
}

/// Restore UI state from .state.json
pub fn restore_ui_state(app: &mut App, data_dir: &Path) {
    let Some(state) = read_ui_state(data_dir) else {
        return;
    };
    app.set_editable(state.editable);
    app.cursor_col = state.column;
    app.cursor_row = state.cursor;
    app.clamp_cursor();
}

/// Save UI state to .state.json
pub fn save_ui_state(app: &App, data_dir: &Path) {
    let state = UiState {
        editable: app.is_editable(),
        column: app.cursor_col,
        cursor: app.cursor_row,
    };
    if let Err(e) = write_ui_state(data_dir, &state) {
        warn!("could not save UI state: {}", e);
    }
}

/// Run the TUI application
pub fn run(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    logging::init_file(&log_path(data_dir));
    let config = read_config(data_dir)?;
    let store = open_store(data_dir, config.columns.clone());
    info!(data_dir = %data_dir.display(), tasks = store.len(), "starting postio");

    let mut app = App::new(store, Box::new(FileStorage::in_dir(data_dir)), &config);
    restore_ui_state(&mut app, data_dir);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    save_ui_state(&app, data_dir);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key);
                }
                Event::Mouse(mouse) => input::handle_mouse(app, mouse, Instant::now()),
                _ => {}
            }
        }
        app.tick(Instant::now());

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

/// App over the default board with in-memory storage
#[cfg(test)]
pub fn test_app() -> App {
    use crate::io::storage::MemoryStorage;

    let data = default_dataset();
    let store = TaskStore::new(data.columns, data.tasks);
    App::new(store, Box::new(MemoryStorage::default()), &BoardConfig::default())
}
