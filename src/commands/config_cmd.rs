//! Commands for onboarding and diagnostics

use crate::repository::{ConfigStore, HabitConfig};

/// Store the chosen database name and finish onboarding
pub fn setup_database(store: &ConfigStore, name: String) -> Result<HabitConfig, String> {
    store.complete_setup(&name).map_err(|e| e.to_string())
}

/// Most recent log lines held in memory by the logger
pub fn recent_logs() -> Result<Vec<String>, String> {
    Ok(rolling_logger::recent_lines())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_setup_database_marks_complete() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::in_dir(dir.path());

        let config = setup_database(&store, "Habits".to_string()).unwrap();

        assert!(config.setup_complete);
        assert_eq!(store.load().unwrap().database_name, "Habits");
    }

    #[test]
    fn test_setup_database_reports_blank_name() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::in_dir(dir.path());

        let err = setup_database(&store, " ".to_string()).unwrap_err();
        assert!(err.contains("blank"));
    }
}
