//! Memo storage: key→text maps for room-scoped and sender-scoped notes.

use crate::error::BotResult;
use crate::types::MemoScope;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

/// Trait for memo storage operations. One text value per key per scope;
/// latest write wins.
pub trait MemoStore: Send + Sync {
    /// Store (or overwrite) the memo for a key.
    fn set(&self, scope: MemoScope, key: &str, value: &str) -> BotResult<()>;

    /// Look up the memo for a key.
    fn get(&self, scope: MemoScope, key: &str) -> BotResult<Option<String>>;

    /// Delete the memo for a key, returning its prior content. `None` means
    /// there was nothing to delete, which is not an error.
    fn delete(&self, scope: MemoScope, key: &str) -> BotResult<Option<String>>;

    /// All (key, value) pairs in a scope, for the debug listing surface.
    fn list(&self, scope: MemoScope) -> BotResult<Vec<(String, String)>>;
}

/// SQLite-backed memo store.
pub struct SqliteMemoStore {
    conn: Mutex<Connection>,
}

impl SqliteMemoStore {
    /// Open (or create) a store at the given path.
    pub fn new(path: impl AsRef<Path>) -> BotResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    pub fn in_memory() -> BotResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> BotResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS memos (
                scope TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (scope, key)
            );
        "#,
        )?;
        Ok(())
    }
}

impl MemoStore for SqliteMemoStore {
    fn set(&self, scope: MemoScope, key: &str, value: &str) -> BotResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"INSERT INTO memos (scope, key, value, updated_at)
               VALUES (?1, ?2, ?3, ?4)
               ON CONFLICT (scope, key) DO UPDATE SET value = ?3, updated_at = ?4"#,
            params![
                scope.as_str(),
                key,
                value,
                chrono::Utc::now().to_rfc3339()
            ],
        )?;
        Ok(())
    }

    fn get(&self, scope: MemoScope, key: &str) -> BotResult<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let value = conn
            .query_row(
                "SELECT value FROM memos WHERE scope = ?1 AND key = ?2",
                params![scope.as_str(), key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn delete(&self, scope: MemoScope, key: &str) -> BotResult<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let prior: Option<String> = conn
            .query_row(
                "SELECT value FROM memos WHERE scope = ?1 AND key = ?2",
                params![scope.as_str(), key],
                |row| row.get(0),
            )
            .optional()?;

        if prior.is_some() {
            conn.execute(
                "DELETE FROM memos WHERE scope = ?1 AND key = ?2",
                params![scope.as_str(), key],
            )?;
        }
        Ok(prior)
    }

    fn list(&self, scope: MemoScope) -> BotResult<Vec<(String, String)>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT key, value FROM memos WHERE scope = ?1 ORDER BY key")?;
        let rows = stmt.query_map(params![scope.as_str()], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })?;
        rows.map(|r| r.map_err(Into::into)).collect()
    }
}
