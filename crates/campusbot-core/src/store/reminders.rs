//! Reminder storage trait and SQLite implementation.

use crate::error::{BotError, BotResult};
use crate::types::Reminder;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// How long past its due time a reminder stays eligible to fire, in seconds.
/// Anything older is dropped on the next poll without delivery.
pub const TRIGGER_WINDOW_SECS: i64 = 300;

/// Trait for reminder storage operations.
pub trait ReminderStore: Send + Sync {
    /// Create a new reminder. Rejects due times at or before `now` and empty
    /// content with a validation error.
    fn create(
        &self,
        due_at: DateTime<Utc>,
        content: &str,
        room: &str,
        sender: &str,
    ) -> BotResult<Reminder>;

    /// All stored reminders in insertion order, optionally filtered by room.
    fn list(&self, room: Option<&str>) -> BotResult<Vec<Reminder>>;

    /// Atomically partition stored reminders around `now`: reminders inside
    /// the trigger window (`0 <= now - due_at <= 300 s`) are removed and
    /// returned; reminders older than the window are removed and dropped;
    /// future reminders are kept.
    fn pop_due(&self, now: DateTime<Utc>) -> BotResult<Vec<Reminder>>;

    /// Delete all reminders for a room, returning how many were removed.
    fn delete_for_room(&self, room: &str) -> BotResult<usize>;
}

/// SQLite-backed reminder store.
pub struct SqliteReminderStore {
    conn: Mutex<Connection>,
}

impl SqliteReminderStore {
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
            CREATE TABLE IF NOT EXISTS reminders (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                due_at TEXT NOT NULL,
                content TEXT NOT NULL,
                room TEXT NOT NULL,
                sender TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_reminders_due ON reminders(due_at);
            CREATE INDEX IF NOT EXISTS idx_reminders_room ON reminders(room);
        "#,
        )?;
        Ok(())
    }

    fn row_to_reminder(row: &rusqlite::Row<'_>) -> BotResult<Reminder> {
        let id: String = row.get(0)?;
        let due_at: String = row.get(1)?;
        let content: String = row.get(2)?;
        let room: String = row.get(3)?;
        let sender: String = row.get(4)?;
        let created_at: String = row.get(5)?;

        Ok(Reminder {
            id: Uuid::parse_str(&id).map_err(|e| BotError::Parse(e.to_string()))?,
            due_at: parse_rfc3339(&due_at)?,
            content,
            room,
            sender,
            created_at: parse_rfc3339(&created_at)?,
        })
    }
}

fn parse_rfc3339(s: &str) -> BotResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| BotError::Parse(e.to_string()))
}

impl ReminderStore for SqliteReminderStore {
    fn create(
        &self,
        due_at: DateTime<Utc>,
        content: &str,
        room: &str,
        sender: &str,
    ) -> BotResult<Reminder> {
        if content.trim().is_empty() {
            return Err(BotError::validation_with_reply(
                "empty reminder content",
                "사용법: !리마인드 내일 14:30 회의내용 또는 !리마인드 오늘 18:00 약속내용",
            ));
        }
        if due_at <= Utc::now() {
            return Err(BotError::validation_with_reply(
                format!("due time {} is not in the future", due_at.to_rfc3339()),
                "과거 시간으로는 리마인드를 설정할 수 없다",
            ));
        }

        let reminder = Reminder::new(due_at, content.trim(), room, sender);

        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"INSERT INTO reminders (id, due_at, content, room, sender, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
            params![
                reminder.id.to_string(),
                reminder.due_at.to_rfc3339(),
                reminder.content,
                reminder.room,
                reminder.sender,
                reminder.created_at.to_rfc3339(),
            ],
        )?;
        Ok(reminder)
    }

    fn list(&self, room: Option<&str>) -> BotResult<Vec<Reminder>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = match room {
            Some(_) => conn.prepare(
                r#"SELECT id, due_at, content, room, sender, created_at
                   FROM reminders WHERE room = ?1 ORDER BY seq"#,
            )?,
            None => conn.prepare(
                r#"SELECT id, due_at, content, room, sender, created_at
                   FROM reminders ORDER BY seq"#,
            )?,
        };

        let map_row = |row: &rusqlite::Row<'_>| Ok(Self::row_to_reminder(row));
        let results = match room {
            Some(room) => stmt.query_map(params![room], map_row)?,
            None => stmt.query_map([], map_row)?,
        };

        results
            .map(|r| r.map_err(|e| e.into()).and_then(|inner| inner))
            .collect()
    }

    fn pop_due(&self, now: DateTime<Utc>) -> BotResult<Vec<Reminder>> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        let mut triggered = Vec::new();
        let mut expired = Vec::new();
        {
            let mut stmt = tx.prepare(
                r#"SELECT id, due_at, content, room, sender, created_at
                   FROM reminders ORDER BY seq"#,
            )?;
            let rows = stmt.query_map([], |row| Ok(Self::row_to_reminder(row)))?;
            for row in rows {
                let reminder = row??;
                // Not due yet; num_seconds() truncates toward zero, so a
                // sub-second-early poll must not count as elapsed 0.
                if reminder.due_at > now {
                    continue;
                }
                let elapsed = (now - reminder.due_at).num_seconds();
                if elapsed <= TRIGGER_WINDOW_SECS {
                    triggered.push(reminder);
                } else {
                    // Missed by more than the window: dropped, not retried.
                    expired.push(reminder);
                }
            }
        }

        for reminder in triggered.iter().chain(expired.iter()) {
            tx.execute(
                "DELETE FROM reminders WHERE id = ?1",
                params![reminder.id.to_string()],
            )?;
        }
        tx.commit()?;

        for reminder in &expired {
            debug!(
                id = %reminder.id,
                due_at = %reminder.due_at,
                content = %reminder.content,
                "Dropping stale reminder past the trigger window"
            );
        }

        Ok(triggered)
    }

    fn delete_for_room(&self, room: &str) -> BotResult<usize> {
        let conn = self.conn.lock().unwrap();
        let count = conn.execute("DELETE FROM reminders WHERE room = ?1", params![room])?;
        Ok(count)
    }
}
