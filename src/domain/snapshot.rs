//! Shared Snapshot
//!
//! What the external surface reads: the published entries plus the FIFO of
//! checked ids waiting to be removed from view. Both writers (the sync engine
//! and the widget toggle) mutate a `SharedSnapshot` inside one store
//! transaction; the functions here are the pure part of those writes.

use std::collections::VecDeque;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use super::checklist::ChecklistItem;
use super::entity::{find_mut, Entity};

/// One published row, laid out the way the widget decodes it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub id: String,
    pub title: String,
    pub checked: bool,
    /// Moment the entry was observed turning checked, epoch seconds on the wire
    #[serde(
        rename = "checkedDate",
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_seconds_option"
    )]
    pub checked_at: Option<DateTime<Utc>>,
}

impl SnapshotEntry {
    pub fn from_item(item: &ChecklistItem, checked_at: Option<DateTime<Utc>>) -> Self {
        Self {
            id: item.id.clone(),
            title: item.label.clone(),
            checked: item.checked,
            checked_at,
        }
    }
}

impl Entity for SnapshotEntry {
    fn id(&self) -> &str {
        &self.id
    }
}

/// FIFO of checked ids pending removal; an id appears at most once
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemovalQueue {
    ids: VecDeque<String>,
}

impl RemovalQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut queue = Self::new();
        for id in ids {
            queue.enqueue(&id.into());
        }
        queue
    }

    /// Append unless already queued. Returns whether it was added.
    pub fn enqueue(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push_back(id.to_string());
        true
    }

    /// Drop a pending removal. Returns whether it was queued.
    pub fn cancel(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|queued| queued != id);
        self.ids.len() != before
    }

    pub fn head(&self) -> Option<&str> {
        self.ids.front().map(String::as_str)
    }

    pub fn pop_head(&mut self) -> Option<String> {
        self.ids.pop_front()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|queued| queued == id)
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.ids.retain(|id| keep(id));
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }
}

/// Result of one external toggle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalToggle {
    /// Entry deleted from the snapshot by the deferred-removal pop
    pub removed: Option<String>,
    /// New checked value of the toggled entry, `None` if it was not found
    pub checked: Option<bool>,
}

/// Entries plus removal queue, always read and written together
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedSnapshot {
    pub entries: Vec<SnapshotEntry>,
    pub queue: RemovalQueue,
}

impl SharedSnapshot {
    pub fn new(entries: Vec<SnapshotEntry>, queue: RemovalQueue) -> Self {
        Self { entries, queue }
    }

    pub fn entry(&self, id: &str) -> Option<&SnapshotEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Overwrite the entries with `items`.
    ///
    /// Items seen turning checked since the previous snapshot are stamped
    /// with `now` and queued; unchecked items leave the queue, and queued
    /// ids that are no longer published are dropped. Returns the ids that
    /// were newly checked.
    pub fn apply_publish(&mut self, items: &[ChecklistItem], now: DateTime<Utc>) -> Vec<String> {
        let now = now.trunc_subsecs(0);
        let mut newly_checked = Vec::new();
        let mut entries = Vec::with_capacity(items.len());

        for item in items {
            let previous = self.entries.iter().find(|entry| entry.id == item.id);
            let checked_at = match previous {
                _ if !item.checked => None,
                Some(prev) if !prev.checked => {
                    newly_checked.push(item.id.clone());
                    Some(now)
                }
                Some(prev) => prev.checked_at,
                // Already checked when first seen, no transition observed
                None => None,
            };
            entries.push(SnapshotEntry::from_item(item, checked_at));
        }

        for id in &newly_checked {
            self.queue.enqueue(id);
        }
        self.queue.retain(|id| {
            entries
                .iter()
                .any(|entry| entry.id == id && entry.checked)
        });
        self.entries = entries;
        newly_checked
    }

    /// Widget-side toggle of `id`.
    ///
    /// Pops the queue head (unless it is `id` itself) and deletes that entry,
    /// then flips `id`. A newly checked entry is queued for the next toggle;
    /// a newly unchecked one is taken out of the queue.
    pub fn apply_external_toggle(&mut self, id: &str, now: DateTime<Utc>) -> ExternalToggle {
        let pop = self.queue.head().is_some_and(|head| head != id);
        let removed = if pop { self.queue.pop_head() } else { None };
        if let Some(head) = &removed {
            self.entries.retain(|entry| &entry.id != head);
        }

        let now = now.trunc_subsecs(0);
        let checked = find_mut(&mut self.entries, id).map(|entry| {
            entry.checked = !entry.checked;
            entry.checked_at = entry.checked.then_some(now);
            entry.checked
        });

        match checked {
            Some(true) => {
                self.queue.enqueue(id);
            }
            Some(false) => {
                self.queue.cancel(id);
            }
            None => {}
        }

        ExternalToggle { removed, checked }
    }
}
