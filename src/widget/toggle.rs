//! Widget-side toggle
//!
//! Runs in the widget process against the shared store. The remote patch is
//! deferred onto a detached task and never reported back to the caller.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use crate::domain::{DomainResult, ExternalToggle};
use crate::engine::SurfaceNotifier;
use crate::gateway::HabitGateway;
use crate::repository::SnapshotStore;

#[derive(Debug)]
pub struct WidgetToggleOutcome {
    pub toggle: ExternalToggle,
    /// Deferred remote patch, `None` when the id was not in the snapshot
    pub patch: Option<JoinHandle<()>>,
}

pub async fn toggle_from_widget(
    store: &SnapshotStore,
    gateway: Arc<dyn HabitGateway>,
    notifier: &dyn SurfaceNotifier,
    item_id: &str,
) -> DomainResult<WidgetToggleOutcome> {
    toggle_from_widget_at(store, gateway, notifier, item_id, Utc::now()).await
}

pub async fn toggle_from_widget_at(
    store: &SnapshotStore,
    gateway: Arc<dyn HabitGateway>,
    notifier: &dyn SurfaceNotifier,
    item_id: &str,
    now: DateTime<Utc>,
) -> DomainResult<WidgetToggleOutcome> {
    let id = item_id.to_string();
    let toggle = store
        .update(move |snapshot| snapshot.apply_external_toggle(&id, now))
        .await?;

    if let Some(removed) = &toggle.removed {
        log::info!("Removed finished habit {} from widget", removed);
    }
    notifier.reload_timelines();

    let patch = match toggle.checked {
        Some(checked) => {
            log::info!("Widget set habit {} to checked={}", item_id, checked);
            Some(spawn_deferred_patch(gateway, item_id.to_string(), checked))
        }
        None => {
            log::debug!("Widget toggle of unknown habit {}, no patch scheduled", item_id);
            None
        }
    };

    Ok(WidgetToggleOutcome { toggle, patch })
}

fn spawn_deferred_patch(
    gateway: Arc<dyn HabitGateway>,
    item_id: String,
    checked: bool,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(err) = gateway.patch_checklist_item(&item_id, checked).await {
            log::warn!("Deferred patch of habit {} failed: {}", item_id, err);
        }
    })
}
