//! Engine Layer
//!
//! In-app state machine over the gateway and the shared snapshot store.

mod notifier;
mod sync_engine;


pub use notifier::{CountingNotifier, LogNotifier, SurfaceNotifier};
pub use sync_engine::{EngineState, HabitSyncEngine, PendingToggle};
