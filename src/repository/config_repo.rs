//! Configuration Repository
//!
//! JSON file holding the API endpoint, the credential, the user's database
//! name, and the onboarding flag.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};
use crate::gateway::DEFAULT_BASE_ENDPOINT;

pub const CONFIG_FILE_NAME: &str = "habit_config.json";
pub const STORE_FILE_NAME: &str = "widget_store.sqlite";

pub const TOKEN_ENV: &str = "NOTION_SECRET";
pub const BASE_ENDPOINT_ENV: &str = "API_BASE_ENDPOINT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HabitConfig {
    pub base_endpoint: String,
    pub token: String,
    /// Free-text search query, not an id
    pub database_name: String,
    pub setup_complete: bool,
}

impl Default for HabitConfig {
    fn default() -> Self {
        Self {
            base_endpoint: DEFAULT_BASE_ENDPOINT.to_string(),
            token: String::new(),
            database_name: String::new(),
            setup_complete: false,
        }
    }
}

impl HabitConfig {
    /// Replace token and endpoint with `NOTION_SECRET` / `API_BASE_ENDPOINT` when set
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var(TOKEN_ENV).ok(),
            std::env::var(BASE_ENDPOINT_ENV).ok(),
        );
    }

    fn apply_overrides(&mut self, token: Option<String>, base_endpoint: Option<String>) {
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            self.token = token;
        }
        if let Some(base) = base_endpoint.filter(|b| !b.is_empty()) {
            self.base_endpoint = base;
        }
    }
}

pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Config file inside `data_dir`
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(CONFIG_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored config, or defaults when the file does not exist yet
    pub fn load(&self) -> DomainResult<HabitConfig> {
        if !self.path.exists() {
            return Ok(HabitConfig::default());
        }
        let raw = fs::read_to_string(&self.path)?;
        serde_json::from_str(&raw).map_err(|e| {
            DomainError::Store(format!("Invalid config {}: {}", self.path.display(), e))
        })
    }

    /// Stored config with environment overrides applied
    pub fn load_with_env(&self) -> DomainResult<HabitConfig> {
        let mut config = self.load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn save(&self, config: &HabitConfig) -> DomainResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, data)?;
        Ok(())
    }

    /// Store the database name and mark onboarding done
    pub fn complete_setup(&self, database_name: &str) -> DomainResult<HabitConfig> {
        let name = database_name.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidInput(
                "database name must not be blank".to_string(),
            ));
        }

        let mut config = self.load()?;
        config.database_name = name.to_string();
        config.setup_complete = true;
        self.save(&config)?;
        log::info!("Setup complete for database \"{}\"", name);
        Ok(config)
    }
}

/// Platform data directory for config, store, and logs
pub fn default_data_dir() -> DomainResult<PathBuf> {
    ProjectDirs::from("app", "habitsync", "HabitSync")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| DomainError::Store("Could not find home directory".to_string()))
}
