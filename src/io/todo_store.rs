use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::io::lock::{LockError, StoreLock};
use crate::model::todo::{Todo, date_key, parse_date};

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not encode todos: {0}")]
    EncodeError(#[from] serde_json::Error),
    #[error("could not parse settings: {0}")]
    SettingsParseError(#[from] toml::de::Error),
    #[error("could not edit settings document: {0}")]
    SettingsEditError(#[from] toml_edit::TomlError),
    #[error(transparent)]
    Lock(#[from] LockError),
}

/// Key-value store of day buckets plus the "last accessed" marker.
/// Buckets are read and written whole.
pub trait TodoStore {
    /// Todos stored for `date` (empty when the bucket does not exist)
    fn get_bucket(&self, date: NaiveDate) -> Result<Vec<Todo>, StoreError>;
    /// Replace the bucket for `date`, creating it if needed
    fn set_bucket(&mut self, date: NaiveDate, todos: &[Todo]) -> Result<(), StoreError>;
    /// Every bucket date, most recent first
    fn list_dates(&self) -> Result<Vec<NaiveDate>, StoreError>;
    fn last_accessed(&self) -> Result<Option<NaiveDate>, StoreError>;
    fn set_last_accessed(&mut self, date: NaiveDate) -> Result<(), StoreError>;
}

/// Whole-store document, as persisted in `todos.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoDocument {
    #[serde(default)]
    pub todos: BTreeMap<String, Vec<Todo>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<String>,
}

impl TodoDocument {
    fn bucket(&self, date: NaiveDate) -> Vec<Todo> {
        self.todos.get(&date_key(date)).cloned().unwrap_or_default()
    }

    fn dates(&self) -> Vec<NaiveDate> {
        // Keys that are not dates are kept on disk but never listed
        let mut dates: Vec<NaiveDate> = self.todos.keys().filter_map(|k| parse_date(k)).collect();
        dates.sort_unstable_by(|a, b| b.cmp(a));
        dates
    }

    fn last_accessed_date(&self) -> Option<NaiveDate> {
        self.last_accessed.as_deref().and_then(parse_date)
    }
}

// ---------------------------------------------------------------------------
// JSON file store
// ---------------------------------------------------------------------------

/// Store backed by a single JSON document. Every read goes to disk so a
/// concurrent CLI write is picked up; every write re-reads under the lock
/// and replaces the file atomically.
#[derive(Debug, Clone)]
pub struct JsonTodoStore {
    path: PathBuf,
}

impl JsonTodoStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonTodoStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole document. A missing file is an empty store.
    pub fn read_document(&self) -> Result<TodoDocument, StoreError> {
        if !self.path.exists() {
            return Ok(TodoDocument::default());
        }
        let text = fs::read_to_string(&self.path).map_err(|e| StoreError::ReadError {
            path: self.path.clone(),
            source: e,
        })?;
        if text.trim().is_empty() {
            return Ok(TodoDocument::default());
        }
        serde_json::from_str(&text).map_err(|e| StoreError::ParseError {
            path: self.path.clone(),
            source: e,
        })
    }

    fn update<F>(&mut self, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut TodoDocument),
    {
        let dir = self.path.parent().unwrap_or(Path::new(".")).to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| StoreError::WriteError {
            path: dir.clone(),
            source: e,
        })?;
        let _lock = StoreLock::acquire_default(&self.path)?;
        let mut doc = self.read_document()?;
        f(&mut doc);
        let content = serde_json::to_string_pretty(&doc)?;
        atomic_write(&self.path, content.as_bytes()).map_err(|e| StoreError::WriteError {
            path: self.path.clone(),
            source: e,
        })
    }
}

impl TodoStore for JsonTodoStore {
    fn get_bucket(&self, date: NaiveDate) -> Result<Vec<Todo>, StoreError> {
        Ok(self.read_document()?.bucket(date))
    }

    fn set_bucket(&mut self, date: NaiveDate, todos: &[Todo]) -> Result<(), StoreError> {
        let todos = todos.to_vec();
        self.update(|doc| {
            doc.todos.insert(date_key(date), todos);
        })
    }

    fn list_dates(&self) -> Result<Vec<NaiveDate>, StoreError> {
        Ok(self.read_document()?.dates())
    }

    fn last_accessed(&self) -> Result<Option<NaiveDate>, StoreError> {
        Ok(self.read_document()?.last_accessed_date())
    }

    fn set_last_accessed(&mut self, date: NaiveDate) -> Result<(), StoreError> {
        self.update(|doc| doc.last_accessed = Some(date_key(date)))
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Store kept entirely in memory. Backs `rollover --dry-run` and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryTodoStore {
    doc: TodoDocument,
    /// Number of `set_bucket` calls, for asserting write behaviour
    pub bucket_writes: usize,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        MemoryTodoStore::default()
    }

    pub fn from_document(doc: TodoDocument) -> Self {
        MemoryTodoStore {
            doc,
            bucket_writes: 0,
        }
    }

    pub fn document(&self) -> &TodoDocument {
        &self.doc
    }
}

impl TodoStore for MemoryTodoStore {
    fn get_bucket(&self, date: NaiveDate) -> Result<Vec<Todo>, StoreError> {
        Ok(self.doc.bucket(date))
    }

    fn set_bucket(&mut self, date: NaiveDate, todos: &[Todo]) -> Result<(), StoreError> {
        self.bucket_writes += 1;
        self.doc.todos.insert(date_key(date), todos.to_vec());
        Ok(())
    }

    fn list_dates(&self) -> Result<Vec<NaiveDate>, StoreError> {
        Ok(self.doc.dates())
    }

    fn last_accessed(&self) -> Result<Option<NaiveDate>, StoreError> {
        Ok(self.doc.last_accessed_date())
    }

    fn set_last_accessed(&mut self, date: NaiveDate) -> Result<(), StoreError> {
        self.doc.last_accessed = Some(date_key(date));
        Ok(())
    }
}
