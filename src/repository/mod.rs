//! Repository Layer
//!
//! Persistence for the shared widget snapshot and the app configuration.

pub mod db;
mod config_repo;
mod snapshot_store;

#[cfg(test)]
mod tests;

pub use config_repo::{
    default_data_dir, ConfigStore, HabitConfig, BASE_ENDPOINT_ENV, CONFIG_FILE_NAME,
    STORE_FILE_NAME, TOKEN_ENV,
};
pub use db::{REMOVAL_QUEUE_KEY, WIDGET_HABITS_KEY};
pub use snapshot_store::SnapshotStore;
