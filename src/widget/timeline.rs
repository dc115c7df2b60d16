//! Widget timeline
//!
//! What the widget shows for a snapshot at a given instant, and when it
//! should be asked to render again.

use chrono::{DateTime, Duration, Utc};

use crate::domain::{SharedSnapshot, SnapshotEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelinePolicy {
    /// How long a checked entry stays visible after being checked
    pub grace: Duration,
    pub idle_refresh: Duration,
    pub max_visible: usize,
}

impl Default for TimelinePolicy {
    fn default() -> Self {
        Self {
            grace: Duration::seconds(3),
            idle_refresh: Duration::minutes(15),
            max_visible: 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetTimeline {
    pub entries: Vec<SnapshotEntry>,
    pub next_refresh: DateTime<Utc>,
}

pub fn build_timeline(
    snapshot: &SharedSnapshot,
    now: DateTime<Utc>,
    policy: &TimelinePolicy,
) -> WidgetTimeline {
    let mut next_refresh: Option<DateTime<Utc>> = None;

    let entries: Vec<SnapshotEntry> = snapshot
        .entries
        .iter()
        .filter(|entry| {
            if !entry.checked {
                return true;
            }
            match entry.checked_at {
                Some(checked_at) if now - checked_at < policy.grace => {
                    let expires = checked_at + policy.grace;
                    next_refresh = Some(next_refresh.map_or(expires, |at| at.min(expires)));
                    true
                }
                _ => false,
            }
        })
        .take(policy.max_visible)
        .cloned()
        .collect();

    WidgetTimeline {
        entries,
        next_refresh: next_refresh.unwrap_or(now + policy.idle_refresh),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn entry(id: &str, checked: bool, checked_at: Option<i64>) -> SnapshotEntry {
        SnapshotEntry {
            id: id.to_string(),
            title: id.to_string(),
            checked,
            checked_at: checked_at.map(at),
        }
    }

    fn ids(timeline: &WidgetTimeline) -> Vec<&str> {
        timeline.entries.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_unchecked_only_refreshes_when_idle() {
        let snapshot = SharedSnapshot {
            entries: vec![entry("a", false, None), entry("b", false, None)],
            ..Default::default()
        };

        let timeline = build_timeline(&snapshot, at(1_000), &TimelinePolicy::default());

        assert_eq!(ids(&timeline), vec!["a", "b"]);
        assert_eq!(timeline.next_refresh, at(1_000 + 15 * 60));
    }

    #[test]
    fn test_checked_entry_visible_during_grace() {
        let snapshot = SharedSnapshot {
            entries: vec![entry("a", true, Some(999)), entry("b", false, None)],
            ..Default::default()
        };

        let timeline = build_timeline(&snapshot, at(1_000), &TimelinePolicy::default());

        assert_eq!(ids(&timeline), vec!["a", "b"]);
        assert_eq!(timeline.next_refresh, at(1_002));
    }

    #[test]
    fn test_checked_entry_hidden_after_grace_or_without_stamp() {
        let snapshot = SharedSnapshot {
            entries: vec![
                entry("old", true, Some(990)),
                entry("unstamped", true, None),
                entry("edge", true, Some(997)),
                entry("open", false, None),
            ],
            ..Default::default()
        };

        let timeline = build_timeline(&snapshot, at(1_000), &TimelinePolicy::default());

        assert_eq!(ids(&timeline), vec!["open"]);
        assert_eq!(timeline.next_refresh, at(1_900));
    }

    #[test]
    fn test_earliest_expiry_wins_and_cap_applies() {
        let mut entries: Vec<SnapshotEntry> = (0..8)
            .map(|i| entry(&format!("u{}", i), false, None))
            .collect();
        entries.insert(0, entry("late", true, Some(1_000)));
        entries.insert(1, entry("early", true, Some(998)));
        let snapshot = SharedSnapshot {
            entries,
            ..Default::default()
        };

        let timeline = build_timeline(&snapshot, at(1_000), &TimelinePolicy::default());

        assert_eq!(timeline.entries.len(), 6);
        assert_eq!(&ids(&timeline)[..3], &["late", "early", "u0"]);
        assert_eq!(timeline.next_refresh, at(1_001));
    }
}
