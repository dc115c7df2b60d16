//! Repository Integration Tests
//!
//! SnapshotStore against real SQLite files, including two connections on the
//! same file standing in for the app and widget processes.

#[cfg(test)]
mod tests {
    use crate::domain::{ChecklistItem, SharedSnapshot, SnapshotEntry};
    use crate::repository::db::{self, REMOVAL_QUEUE_KEY, WIDGET_HABITS_KEY};
    use crate::repository::SnapshotStore;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;
    use tempfile::tempdir;

    fn items() -> Vec<ChecklistItem> {
        vec![
            ChecklistItem::new("a", "Meditate", false),
            ChecklistItem::new("b", "Read", true),
        ]
    }

    #[tokio::test]
    async fn test_read_empty_store() {
        let store = SnapshotStore::open_in_memory().expect("Failed to open store");
        let snapshot = store.read().await.expect("Read failed");
        assert_eq!(snapshot, SharedSnapshot::default());
    }

    #[tokio::test]
    async fn test_publish_then_read() {
        let store = SnapshotStore::open_in_memory().unwrap();

        store.publish(&items()).await.expect("Publish failed");

        let snapshot = store.read().await.unwrap();
        let titles: Vec<&str> = snapshot.entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Meditate", "Read"]);
        assert!(snapshot.queue.is_empty());
    }

    #[tokio::test]
    async fn test_publish_is_idempotent() {
        let store = SnapshotStore::open_in_memory().unwrap();
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();

        store.publish_at(&items(), now).await.unwrap();
        let first = store.read().await.unwrap();
        store.publish_at(&items(), now).await.unwrap();
        let second = store.read().await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_layout_matches_widget_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("widget_store.sqlite");
        let store = SnapshotStore::open(&path).unwrap();
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();

        store.publish_at(&[ChecklistItem::new("a", "Meditate", false)], now).await.unwrap();
        store.publish_at(&[ChecklistItem::new("a", "Meditate", true)], now).await.unwrap();

        let conn = db::open_connection(&path).unwrap();
        let habits: serde_json::Value =
            serde_json::from_str(&db::read_value(&conn, WIDGET_HABITS_KEY).unwrap().unwrap()).unwrap();
        let queue: serde_json::Value =
            serde_json::from_str(&db::read_value(&conn, REMOVAL_QUEUE_KEY).unwrap().unwrap()).unwrap();

        assert_eq!(
            habits,
            serde_json::json!([
                {"id": "a", "title": "Meditate", "checked": true, "checkedDate": 1_700_000_000}
            ])
        );
        assert_eq!(queue, serde_json::json!(["a"]));
    }

    #[tokio::test]
    async fn test_update_visible_to_second_connection() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("widget_store.sqlite");
        let app = SnapshotStore::open(&path).unwrap();
        let widget = SnapshotStore::open(&path).unwrap();

        app.publish(&items()).await.unwrap();
        let toggled = widget
            .update(|snapshot| snapshot.apply_external_toggle("a", Utc::now()))
            .await
            .unwrap();

        assert_eq!(toggled.checked, Some(true));
        let seen_by_app = app.read().await.unwrap();
        assert!(seen_by_app.entry("a").unwrap().checked);
        assert_eq!(seen_by_app.queue.to_vec(), vec!["a".to_string()]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writers_do_not_lose_updates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("widget_store.sqlite");
        let first = Arc::new(SnapshotStore::open(&path).unwrap());
        let second = Arc::new(SnapshotStore::open(&path).unwrap());

        let mut handles = Vec::new();
        for i in 0..40 {
            let store = if i % 2 == 0 { first.clone() } else { second.clone() };
            handles.push(tokio::spawn(async move {
                store
                    .update(move |snapshot| {
                        let id = format!("item-{}", i);
                        snapshot.entries.push(SnapshotEntry {
                            id: id.clone(),
                            title: id.clone(),
                            checked: true,
                            checked_at: None,
                        });
                        snapshot.queue.enqueue(&id)
                    })
                    .await
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().expect("Update failed"));
        }

        let snapshot = first.read().await.unwrap();
        assert_eq!(snapshot.entries.len(), 40);
        assert_eq!(snapshot.queue.len(), 40);
    }

    #[tokio::test]
    async fn test_corrupt_value_is_store_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("widget_store.sqlite");
        let store = SnapshotStore::open(&path).unwrap();
        let conn = db::open_connection(&path).unwrap();
        db::write_value(&conn, REMOVAL_QUEUE_KEY, "{not json", 0).unwrap();

        let err = store.read().await.unwrap_err();
        assert!(matches!(err, crate::domain::DomainError::Store(_)));
    }
}
