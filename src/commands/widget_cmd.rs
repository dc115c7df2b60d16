//! Commands run on behalf of the widget

use chrono::Utc;

use crate::widget::{self, TimelinePolicy, WidgetTimeline, WidgetToggleOutcome};
use crate::AppState;

/// Toggle from the widget; the returned outcome holds the deferred patch task
pub async fn widget_toggle(state: &AppState, id: String) -> Result<WidgetToggleOutcome, String> {
    widget::toggle_from_widget(
        &state.store,
        state.gateway.clone(),
        state.notifier.as_ref(),
        &id,
    )
    .await
    .map_err(|e| e.to_string())
}

/// What the widget would render right now
pub async fn widget_view(state: &AppState) -> Result<WidgetTimeline, String> {
    let snapshot = state.store.read().await.map_err(|e| e.to_string())?;
    Ok(widget::build_timeline(
        &snapshot,
        Utc::now(),
        &TimelinePolicy::default(),
    ))
}
