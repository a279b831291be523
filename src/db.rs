// db.rs — Durable key-value storage.
//
// Favorites and feedback are stored as JSON strings under fixed keys, the same
// way a browser's localStorage would hold them. `KeyValueStore` is the seam:
// `SqliteStore` persists to a single-table SQLite file, `MemoryStore` keeps
// everything in a HashMap for tests and throwaway sessions.

use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use crate::error::StorageError;

/// String-keyed durable records. Writes must be durable when they return.
///
/// RUST NOTE: `Send` lets a boxed store live inside the shell's Mutex-guarded
/// state, which Tauri shares across its IPC threads.
pub trait KeyValueStore: Send {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

/// Resolve the path to storage.db inside the OS-appropriate data directory.
/// e.g. on Windows: C:\Users\<user>\AppData\Roaming\sauflix\storage.db
///      on macOS:   ~/Library/Application Support/sauflix/storage.db
///      on Linux:   ~/.local/share/sauflix/storage.db
pub fn get_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sauflix")
        .join("storage.db")
}

/// Create the table if it doesn't already exist.
pub fn init_db(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch("
        PRAGMA journal_mode = WAL;           -- readers don't block the writer
        PRAGMA synchronous  = FULL;          -- a returned write is on disk

        CREATE TABLE IF NOT EXISTS kv (
            key   TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL
        );
    ")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// SQLite implementation
// ---------------------------------------------------------------------------

/// SQLite-backed store. Cloning shares the same connection, so the favorites
/// and feedback adapters can each hold one.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

// Lock the Mutex and propagate the error if poisoned
macro_rules! conn {
    ($self:expr) => {
        $self
            .conn
            .lock()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?
    };
}

impl SqliteStore {
    /// Open (creating if needed) the database file and its parent directories.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        init_db(&conn)?;
        log::debug!("opened key-value store at {}", path.display());
        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }
}

impl KeyValueStore for SqliteStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = conn!(self);
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = conn!(self);
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let conn = conn!(self);
        conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory implementation
// ---------------------------------------------------------------------------

/// HashMap-backed store. Clone-friendly via Arc: clones see each other's writes.
#[derive(Clone, Default)]
pub struct MemoryStore {
    items: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self
            .items
            .read()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self
            .items
            .write()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self
            .items
            .write()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        items.remove(key);
        Ok(())
    }
}
