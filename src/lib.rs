//! Habit Sync Backend
//!
//! Layered architecture:
//! - domain: Checklist entities, the shared snapshot model and errors
//! - gateway: Remote checklist API abstraction and its Notion client
//! - repository: Shared widget store and config persistence
//! - engine: In-app sync state machine
//! - widget: Widget-side toggle and timeline
//! - commands: Command handlers used by the CLI

use std::path::{Path, PathBuf};
use std::sync::Arc;

pub mod commands;
pub mod domain;
pub mod engine;
pub mod gateway;
pub mod repository;
pub mod widget;

use domain::{DomainError, DomainResult};
use engine::{HabitSyncEngine, LogNotifier, SurfaceNotifier};
use gateway::{HabitGateway, NotionGateway};
use repository::{HabitConfig, SnapshotStore, STORE_FILE_NAME};

/// Application state shared across commands
pub struct AppState {
    pub config: HabitConfig,
    pub data_dir: PathBuf,
    pub gateway: Arc<dyn HabitGateway>,
    pub store: Arc<SnapshotStore>,
    pub notifier: Arc<dyn SurfaceNotifier>,
    pub engine: HabitSyncEngine,
}

impl AppState {
    /// Wire the Notion gateway and the store in `data_dir` for a configured app
    pub fn bootstrap(config: HabitConfig, data_dir: &Path) -> DomainResult<Self> {
        if !config.setup_complete {
            return Err(DomainError::InvalidInput(
                "setup not complete, choose a database first".to_string(),
            ));
        }

        let gateway = Arc::new(NotionGateway::new(&config.base_endpoint, &config.token)?);
        let store = Arc::new(SnapshotStore::open(&data_dir.join(STORE_FILE_NAME))?);
        log::info!("Using widget store in {}", data_dir.display());

        Ok(Self::with_parts(
            config,
            data_dir.to_path_buf(),
            gateway,
            store,
            Arc::new(LogNotifier),
        ))
    }

    pub fn with_parts(
        config: HabitConfig,
        data_dir: PathBuf,
        gateway: Arc<dyn HabitGateway>,
        store: Arc<SnapshotStore>,
        notifier: Arc<dyn SurfaceNotifier>,
    ) -> Self {
        let engine = HabitSyncEngine::new(
            gateway.clone(),
            store.clone(),
            notifier.clone(),
            config.database_name.clone(),
        );
        Self {
            config,
            data_dir,
            gateway,
            store,
            notifier,
            engine,
        }
    }
}
