//! Database Connection and Setup
//!
//! The widget store is a single SQLite file shared by the app process and the
//! widget process. Each process opens its own connection; exclusion across
//! processes comes from immediate transactions plus a busy timeout.

use std::path::Path;
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::DomainResult;

/// Key holding the published entries
pub const WIDGET_HABITS_KEY: &str = "widgetHabits";
/// Key holding the removal queue
pub const REMOVAL_QUEUE_KEY: &str = "queuedRemovalQueue";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open (creating if needed) the store file and run migrations
pub fn open_connection(path: &Path) -> DomainResult<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let conn = Connection::open(path)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    run_migrations(&conn)?;
    Ok(conn)
}

/// Private in-memory store, used by tests and dry runs
pub fn open_in_memory() -> DomainResult<Connection> {
    let conn = Connection::open_in_memory()?;
    run_migrations(&conn)?;
    Ok(conn)
}

fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )?;
    Ok(())
}

pub fn read_value(conn: &Connection, key: &str) -> DomainResult<Option<String>> {
    let value = conn
        .query_row(
            "SELECT value FROM kv_store WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}

pub fn write_value(conn: &Connection, key: &str, value: &str, updated_at: i64) -> DomainResult<()> {
    conn.execute(
        "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value, updated_at],
    )?;
    Ok(())
}
