//! Habit Sync Engine
//!
//! Owns the resolved database id and the in-memory checklist. Resolution runs
//! once per process; `refresh` and `toggle` are serialized by `op_lock`, so a
//! refresh queued behind an in-flight toggle always lands after it.

use std::sync::Arc;

use tokio::sync::Mutex;

use super::notifier::SurfaceNotifier;
use crate::domain::{checklist_items, find_mut, ChecklistItem, DomainError, DomainResult};
use crate::gateway::HabitGateway;
use crate::repository::SnapshotStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    Resolving,
    Ready { database_id: String },
    /// Resolution failed; `initialize` may be called again
    Failed { reason: String },
}

impl EngineState {
    pub fn is_ready(&self) -> bool {
        matches!(self, EngineState::Ready { .. })
    }
}

/// Tentative flip of one item, undone if the remote commit fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingToggle {
    item_id: String,
    previous: bool,
}

impl PendingToggle {
    /// Flip the item in place. `None` when the id is unknown.
    pub fn apply(items: &mut [ChecklistItem], item_id: &str) -> Option<Self> {
        let item = find_mut(items, item_id)?;
        let previous = item.checked;
        item.checked = !previous;
        Some(Self {
            item_id: item_id.to_string(),
            previous,
        })
    }

    /// Value to commit remotely
    pub fn target(&self) -> bool {
        !self.previous
    }

    /// Restore the prior value; false if the item has since disappeared
    pub fn revert(&self, items: &mut [ChecklistItem]) -> bool {
        match find_mut(items, &self.item_id) {
            Some(item) => {
                item.checked = self.previous;
                true
            }
            None => false,
        }
    }
}

pub struct HabitSyncEngine {
    gateway: Arc<dyn HabitGateway>,
    store: Arc<SnapshotStore>,
    notifier: Arc<dyn SurfaceNotifier>,
    database_name: String,
    state: Mutex<EngineState>,
    items: Mutex<Vec<ChecklistItem>>,
    op_lock: Mutex<()>,
}

impl HabitSyncEngine {
    pub fn new(
        gateway: Arc<dyn HabitGateway>,
        store: Arc<SnapshotStore>,
        notifier: Arc<dyn SurfaceNotifier>,
        database_name: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            store,
            notifier,
            database_name: database_name.into(),
            state: Mutex::new(EngineState::Uninitialized),
            items: Mutex::new(Vec::new()),
            op_lock: Mutex::new(()),
        }
    }

    pub async fn state(&self) -> EngineState {
        self.state.lock().await.clone()
    }

    /// Snapshot of the in-memory checklist
    pub async fn items(&self) -> Vec<ChecklistItem> {
        self.items.lock().await.clone()
    }

    pub async fn item(&self, item_id: &str) -> Option<ChecklistItem> {
        self.items
            .lock()
            .await
            .iter()
            .find(|item| item.id == item_id)
            .cloned()
    }

    pub async fn database_id(&self) -> DomainResult<String> {
        match &*self.state.lock().await {
            EngineState::Ready { database_id } => Ok(database_id.clone()),
            EngineState::Failed { reason } => Err(DomainError::NotReady(format!(
                "database resolution failed: {}",
                reason
            ))),
            _ => Err(DomainError::NotReady("database not resolved yet".to_string())),
        }
    }

    /// Resolve the database name to an id. Cached once ready.
    pub async fn initialize(&self) -> DomainResult<String> {
        let _op = self.op_lock.lock().await;

        {
            let mut state = self.state.lock().await;
            if let EngineState::Ready { database_id } = &*state {
                return Ok(database_id.clone());
            }
            *state = EngineState::Resolving;
        }

        log::info!("Resolving database \"{}\"", self.database_name);
        let resolved = match self.gateway.resolve_database(&self.database_name).await {
            Ok(id) if id.is_empty() => Err(DomainError::NotFound(
                "search returned an empty database id".to_string(),
            )),
            other => other,
        };

        let mut state = self.state.lock().await;
        match resolved {
            Ok(database_id) => {
                log::info!("Initialized with database {}", database_id);
                *state = EngineState::Ready {
                    database_id: database_id.clone(),
                };
                Ok(database_id)
            }
            Err(err) => {
                log::error!("Failed to initialize: {}", err);
                *state = EngineState::Failed {
                    reason: err.to_string(),
                };
                Err(err)
            }
        }
    }

    /// Fetch the first page's checklist and replace the in-memory list.
    ///
    /// Any failure leaves the previous list and snapshot untouched.
    pub async fn refresh(&self) -> DomainResult<Vec<ChecklistItem>> {
        let _op = self.op_lock.lock().await;

        let result = self.refresh_locked().await;
        match &result {
            Err(err) if err.is_remote() => {
                log::warn!("Refresh failed, keeping previous habits: {}", err)
            }
            Err(err) => log::error!("Refresh failed, keeping previous habits: {}", err),
            Ok(_) => {}
        }
        result
    }

    async fn refresh_locked(&self) -> DomainResult<Vec<ChecklistItem>> {
        let database_id = self.database_id().await?;

        let pages = self.gateway.list_pages(&database_id).await?;
        let page_id = pages.into_iter().next().ok_or_else(|| {
            DomainError::NotFound(format!("database {} has no pages", database_id))
        })?;

        let blocks = self.gateway.list_blocks(&page_id).await?;
        let fresh = checklist_items(&blocks);

        // Publish first so a store failure leaves memory unchanged too
        self.store.publish(&fresh).await?;
        *self.items.lock().await = fresh.clone();
        self.notifier.reload_timelines();

        log::info!("Refreshed {} habits from page {}", fresh.len(), page_id);
        Ok(fresh)
    }

    /// Flip `item_id` optimistically, then commit it remotely.
    ///
    /// Unknown ids are a no-op. On remote failure the flip is reverted and
    /// the snapshot is left as it was.
    pub async fn toggle(&self, item_id: &str) -> DomainResult<()> {
        let _op = self.op_lock.lock().await;

        let pending = {
            let mut items = self.items.lock().await;
            match PendingToggle::apply(&mut items, item_id) {
                Some(pending) => pending,
                None => {
                    log::debug!("Ignoring toggle of unknown habit {}", item_id);
                    return Ok(());
                }
            }
        };

        match self
            .gateway
            .patch_checklist_item(item_id, pending.target())
            .await
        {
            Ok(()) => {
                log::info!("Habit {} set to checked={}", item_id, pending.target());
                let current = self.items().await;
                match self.store.publish(&current).await {
                    Ok(_) => self.notifier.reload_timelines(),
                    Err(err) => log::warn!("Toggle committed but widget publish failed: {}", err),
                }
                Ok(())
            }
            Err(err) => {
                let mut items = self.items.lock().await;
                pending.revert(&mut items);
                log::warn!("Failed to update habit {}, reverted: {}", item_id, err);
                Err(err)
            }
        }
    }
}
