use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::app_dirs::AppDirs;

/// Key under which the last used phrase list is stored
pub const PHRASES_KEY: &str = "typeanki_phrases";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("malformed phrase list: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Where the phrase list survives between runs.
/// Loading never fails: anything unreadable counts as "nothing saved".
pub trait PhraseStore {
    fn load(&self) -> Option<Vec<String>>;
    fn save(&self, phrases: &[String]) -> Result<(), StoreError>;
}

/// Key/value table in a small SQLite database
#[derive(Debug)]
pub struct SqlitePhraseStore {
    conn: Connection,
}

impl SqlitePhraseStore {
    /// Open the store at the default data location
    pub fn new() -> Result<Self, StoreError> {
        let path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("typeanki.db"));
        Self::open(path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path.as_ref())?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            [],
        )?;
        Ok(Self { conn })
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            r#"
            INSERT INTO kv (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    fn try_load(&self) -> Result<Option<Vec<String>>, StoreError> {
        match self.get(PHRASES_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    #[cfg(test)]
    fn set_raw(&self, value: &str) {
        self.set(PHRASES_KEY, value).unwrap();
    }
}

impl PhraseStore for SqlitePhraseStore {
    fn load(&self) -> Option<Vec<String>> {
        match self.try_load() {
            Ok(Some(phrases)) if !phrases.is_empty() => {
                debug!(count = phrases.len(), "loaded saved phrases");
                Some(phrases)
            }
            Ok(_) => None,
            Err(e) => {
                warn!("failed to load phrases: {e}");
                None
            }
        }
    }

    fn save(&self, phrases: &[String]) -> Result<(), StoreError> {
        if phrases.is_empty() {
            return Ok(());
        }
        let json = serde_json::to_string(phrases)?;
        self.set(PHRASES_KEY, &json)
    }
}

/// Process-local store, for tests and `--no-save` runs
#[derive(Debug, Default)]
pub struct MemoryPhraseStore {
    phrases: RefCell<Option<Vec<String>>>,
}

impl MemoryPhraseStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PhraseStore for MemoryPhraseStore {
    fn load(&self) -> Option<Vec<String>> {
        self.phrases.borrow().clone()
    }

    fn save(&self, phrases: &[String]) -> Result<(), StoreError> {
        if !phrases.is_empty() {
            *self.phrases.borrow_mut() = Some(phrases.to_vec());
        }
        Ok(())
    }
}
