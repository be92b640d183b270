use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{error, warn};

use crate::model::dataset::default_dataset;
use crate::model::{Column, Task};
use crate::ops::store::{StoreObserver, TaskStore};

/// Storage slot holding the task sequence
pub const TASKS_KEY: &str = "kanban-tasks";

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("could not access {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("could not encode storage: {0}")]
    Json(#[from] serde_json::Error),
}

/// String key-value slots that survive restarts
pub trait Storage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

/// All slots in one JSON object file, rewritten atomically on each change.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStorage { path: path.into() }
    }

    /// `storage.json` inside the data directory
    pub fn in_dir(data_dir: &Path) -> Self {
        FileStorage::new(data_dir.join("storage.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every slot. A missing file is empty storage; an unreadable one
    /// is logged and treated as empty.
    fn read_slots(&self) -> BTreeMap<String, String> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                warn!(path = %self.path.display(), "could not read storage: {}", e);
                return BTreeMap::new();
            }
        };
        match serde_json::from_str(&content) {
            Ok(slots) => slots,
            Err(e) => {
                error!(path = %self.path.display(), "storage file is not a JSON object: {}", e);
                BTreeMap::new()
            }
        }
    }

    fn write_slots(&self, slots: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(slots)?;
        atomic_write(&self.path, content.as_bytes()).map_err(|e| StorageError::Io {
            path: self.path.clone(),
            source: e,
        })
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.read_slots().remove(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut slots = self.read_slots();
        slots.insert(key.to_string(), value.to_string());
        self.write_slots(&slots)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        let mut slots = self.read_slots();
        if slots.remove(key).is_some() {
            self.write_slots(&slots)?;
        }
        Ok(())
    }
}

/// In-memory storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: BTreeMap<String, String>,
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.slots.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.slots.remove(key);
        Ok(())
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Load the stored task sequence. An empty slot yields `defaults`; a slot
/// that fails to parse is logged and also yields `defaults`.
pub fn load_tasks(storage: &dyn Storage, defaults: Vec<Task>) -> Vec<Task> {
    let Some(raw) = storage.get_item(TASKS_KEY) else {
        return defaults;
    };
    match serde_json::from_str::<Vec<Task>>(&raw) {
        Ok(tasks) => tasks,
        Err(e) => {
            error!("error parsing stored tasks, using the default board: {}", e);
            defaults
        }
    }
}

/// Serialize the task sequence into its slot.
pub fn save_tasks(storage: &mut dyn Storage, tasks: &[Task]) -> Result<(), StorageError> {
    let json = serde_json::to_string(tasks)?;
    storage.set_item(TASKS_KEY, &json)
}

/// Drop the stored tasks so the next load starts from the defaults.
pub fn clear_tasks(storage: &mut dyn Storage) -> Result<(), StorageError> {
    storage.remove_item(TASKS_KEY)
}

/// Store observer that persists every change. Failures are logged and
/// otherwise ignored.
pub struct StoragePersistence<S: Storage> {
    storage: S,
}

impl<S: Storage> StoragePersistence<S> {
    pub fn new(storage: S) -> Self {
        StoragePersistence { storage }
    }
}

impl<S: Storage> StoreObserver for StoragePersistence<S> {
    fn on_change(&mut self, tasks: &[Task]) {
        if let Err(e) = save_tasks(&mut self.storage, tasks) {
            warn!("could not persist tasks: {}", e);
        }
    }
}

/// Load the board kept in `data_dir` and attach persistence to it.
pub fn open_store(data_dir: &Path, columns: Vec<Column>) -> TaskStore {
    let storage = FileStorage::in_dir(data_dir);
    let tasks = load_tasks(&storage, default_dataset().tasks);
    let mut store = TaskStore::new(columns, tasks);
    store.set_observer(Box::new(StoragePersistence::new(storage)));
    store
}
