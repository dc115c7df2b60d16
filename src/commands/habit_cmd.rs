//! Commands for the in-app checklist

use crate::domain::ChecklistItem;
use crate::AppState;

/// Resolve the configured database, returning its id
pub async fn initialize_engine(state: &AppState) -> Result<String, String> {
    state.engine.initialize().await.map_err(|e| e.to_string())
}

/// Pull the checklist from the remote page
pub async fn refresh_habits(state: &AppState) -> Result<Vec<ChecklistItem>, String> {
    state.engine.refresh().await.map_err(|e| e.to_string())
}

/// Current in-memory checklist
pub async fn list_habits(state: &AppState) -> Result<Vec<ChecklistItem>, String> {
    Ok(state.engine.items().await)
}

/// Toggle one item and return the updated checklist
pub async fn toggle_habit(state: &AppState, id: String) -> Result<Vec<ChecklistItem>, String> {
    state.engine.toggle(&id).await.map_err(|e| e.to_string())?;
    Ok(state.engine.items().await)
}
