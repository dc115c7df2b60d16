//! Shared Snapshot Store
//!
//! Key-value surface read by the external renderer. Every write is a full
//! read-modify-write of both keys inside one immediate transaction.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, TransactionBehavior};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use super::db::{self, REMOVAL_QUEUE_KEY, WIDGET_HABITS_KEY};
use crate::domain::{ChecklistItem, DomainError, DomainResult, RemovalQueue, SharedSnapshot, SnapshotEntry};

pub struct SnapshotStore {
    conn: Mutex<Connection>,
}

impl SnapshotStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    pub fn open(path: &Path) -> DomainResult<Self> {
        Ok(Self::new(db::open_connection(path)?))
    }

    pub fn open_in_memory() -> DomainResult<Self> {
        Ok(Self::new(db::open_in_memory()?))
    }

    /// Current entries and removal queue
    pub async fn read(&self) -> DomainResult<SharedSnapshot> {
        let conn = self.conn.lock().await;
        load(&conn)
    }

    /// Atomically read both keys, apply `mutate`, and write both back
    pub async fn update<F, R>(&self, mutate: F) -> DomainResult<R>
    where
        F: FnOnce(&mut SharedSnapshot) -> R + Send,
        R: Send,
    {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut snapshot = load(&tx)?;
        let result = mutate(&mut snapshot);
        save(&tx, &snapshot)?;

        tx.commit()?;
        Ok(result)
    }

    /// Overwrite the snapshot with `items`; returns ids seen turning checked
    pub async fn publish(&self, items: &[ChecklistItem]) -> DomainResult<Vec<String>> {
        self.publish_at(items, Utc::now()).await
    }

    pub async fn publish_at(&self, items: &[ChecklistItem], now: DateTime<Utc>) -> DomainResult<Vec<String>> {
        let newly_checked = self
            .update(|snapshot| snapshot.apply_publish(items, now))
            .await?;
        log::debug!(
            "Published {} habits to widget store ({} newly checked)",
            items.len(),
            newly_checked.len()
        );
        Ok(newly_checked)
    }
}

fn load(conn: &Connection) -> DomainResult<SharedSnapshot> {
    let entries: Vec<SnapshotEntry> = load_key(conn, WIDGET_HABITS_KEY)?;
    let queue: RemovalQueue = load_key(conn, REMOVAL_QUEUE_KEY)?;
    Ok(SharedSnapshot::new(entries, queue))
}

fn load_key<T: DeserializeOwned + Default>(conn: &Connection, key: &str) -> DomainResult<T> {
    match db::read_value(conn, key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map_err(|e| DomainError::Store(format!("Corrupt {} value: {}", key, e))),
        None => Ok(T::default()),
    }
}

fn save(conn: &Connection, snapshot: &SharedSnapshot) -> DomainResult<()> {
    let now = Utc::now().timestamp();
    db::write_value(conn, WIDGET_HABITS_KEY, &serde_json::to_string(&snapshot.entries)?, now)?;
    db::write_value(conn, REMOVAL_QUEUE_KEY, &serde_json::to_string(&snapshot.queue)?, now)?;
    Ok(())
}
