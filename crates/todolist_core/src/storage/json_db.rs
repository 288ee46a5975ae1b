use crate::error::AppError;
use crate::model::{Todo, TodoRecord, TodoStatus};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use time::{Duration, OffsetDateTime};

pub const SCHEMA_VERSION: u32 = 1;
const STORE_FILE_NAME: &str = "todos.json";

#[derive(Debug, Serialize, Deserialize)]
struct StoredTable {
    schema_version: u32,
    todos: Vec<TodoRecord>,
}

/// Single-table document store over one JSON file: keyed put/get/delete,
/// full scans, a status scan standing in for a secondary index, and a
/// generic predicate scan. Knows nothing about entity rules.
#[derive(Debug, Clone)]
pub struct TodoDatabase {
    path: PathBuf,
}

pub fn store_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var("TODOLIST_STORE_PATH")
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::storage("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("todolist")
            .join(STORE_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::storage("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("todolist")
            .join(STORE_FILE_NAME))
    }
}

impl TodoDatabase {
    pub fn open(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn open_default() -> Result<Self, AppError> {
        Ok(Self { path: store_path()? })
    }

    /// Insert-or-replace by id. The whole record is written or the call
    /// fails; there is no partial write.
    pub fn put(&self, record: &TodoRecord) -> Result<(), AppError> {
        let mut todos = self.load()?;
        match todos.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => todos.push(record.clone()),
        }
        self.save(&todos)
    }

    /// Remove by id, reporting how many records went away.
    pub fn delete_by_id(&self, id: &str) -> Result<usize, AppError> {
        let mut todos = self.load()?;
        let before = todos.len();
        todos.retain(|record| record.id != id);
        let removed = before - todos.len();
        if removed > 0 {
            self.save(&todos)?;
        }
        Ok(removed)
    }

    pub fn get(&self, id: &str) -> Result<Option<TodoRecord>, AppError> {
        Ok(self.load()?.into_iter().find(|record| record.id == id))
    }

    pub fn scan(&self) -> Result<Vec<TodoRecord>, AppError> {
        self.load()
    }

    pub fn scan_by_status(&self, status: &str) -> Result<Vec<TodoRecord>, AppError> {
        Ok(self
            .load()?
            .into_iter()
            .filter(|record| record.status == status)
            .collect())
    }

    pub fn filter_scan<F>(&self, predicate: F) -> Result<Vec<TodoRecord>, AppError>
    where
        F: Fn(&TodoRecord) -> bool,
    {
        Ok(self.load()?.into_iter().filter(|r| predicate(r)).collect())
    }

    pub fn count(&self) -> Result<usize, AppError> {
        Ok(self.load()?.len())
    }

    pub fn bulk_put(&self, records: &[TodoRecord]) -> Result<(), AppError> {
        let mut todos = self.load()?;
        for record in records {
            match todos.iter_mut().find(|existing| existing.id == record.id) {
                Some(existing) => *existing = record.clone(),
                None => todos.push(record.clone()),
            }
        }
        self.save(&todos)
    }

    /// Seed one example todo per status, but only into an empty store.
    pub fn initialize(&self) -> Result<(), AppError> {
        if self.count()? > 0 {
            return Ok(());
        }

        let now = OffsetDateTime::now_utc();
        let samples = [
            Todo::new(
                "Sample todo 1",
                "An example that is not started yet.",
                Some(now + Duration::days(1)),
                Some(TodoStatus::NotStarted),
            ),
            Todo::new(
                "Sample todo 2",
                "An example that is in progress.",
                Some(now + Duration::days(7)),
                Some(TodoStatus::InProgress),
            ),
            Todo::new(
                "Sample todo 3",
                "An example that is already done.",
                Some(now),
                Some(TodoStatus::Done),
            ),
        ];

        let records = samples
            .iter()
            .map(Todo::to_record)
            .collect::<Result<Vec<_>, _>>()?;
        self.bulk_put(&records)
    }

    fn load(&self) -> Result<Vec<TodoRecord>, AppError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|err| AppError::storage(err.to_string()))?;
        let stored: StoredTable =
            serde_json::from_str(&content).map_err(|err| AppError::storage(err.to_string()))?;

        if !(1..=SCHEMA_VERSION).contains(&stored.schema_version) {
            return Err(AppError::storage("schema_version mismatch"));
        }

        Ok(stored.todos)
    }

    fn save(&self, todos: &[TodoRecord]) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|err| AppError::storage(err.to_string()))?;
        }

        let stored = StoredTable {
            schema_version: SCHEMA_VERSION,
            todos: todos.to_vec(),
        };
        let content = serde_json::to_string_pretty(&stored)
            .map_err(|err| AppError::storage(err.to_string()))?;
        std::fs::write(&self.path, content).map_err(|err| AppError::storage(err.to_string()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, permissions)
                .map_err(|err| AppError::storage(err.to_string()))?;
        }

        Ok(())
    }
}
