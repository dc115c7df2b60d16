//! In-memory gateway for engine and widget tests

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::{Notify, Semaphore};

use super::HabitGateway;
use crate::domain::{
    BlockContent, ChecklistItem, DomainError, DomainResult, RawBlock, RichText, TextContent,
    ToDoContent,
};

pub(crate) struct FakeGateway {
    databases: Mutex<Vec<String>>,
    pages: Mutex<Vec<String>>,
    remote: Mutex<Vec<ChecklistItem>>,
    pub patches: Mutex<Vec<(String, bool)>>,
    pub resolve_calls: AtomicUsize,
    pub list_pages_calls: AtomicUsize,
    fail_reads: AtomicBool,
    fail_patches: AtomicBool,
    apply_patches: AtomicBool,
    hold_patches: AtomicBool,
    pub patch_started: Notify,
    patch_release: Semaphore,
}

impl FakeGateway {
    /// One database "db-1" with one page "page-1" holding `remote`
    pub fn with_items(remote: Vec<ChecklistItem>) -> Self {
        Self {
            databases: Mutex::new(vec!["db-1".to_string()]),
            pages: Mutex::new(vec!["page-1".to_string()]),
            remote: Mutex::new(remote),
            patches: Mutex::new(Vec::new()),
            resolve_calls: AtomicUsize::new(0),
            list_pages_calls: AtomicUsize::new(0),
            fail_reads: AtomicBool::new(false),
            fail_patches: AtomicBool::new(false),
            apply_patches: AtomicBool::new(true),
            hold_patches: AtomicBool::new(false),
            patch_started: Notify::new(),
            patch_release: Semaphore::new(0),
        }
    }

    pub fn habits() -> Self {
        Self::with_items(vec![
            ChecklistItem::new("a", "Meditate", false),
            ChecklistItem::new("b", "Read", true),
        ])
    }

    pub fn set_databases(&self, ids: &[&str]) {
        *self.databases.lock().unwrap() = ids.iter().map(|id| id.to_string()).collect();
    }

    pub fn set_pages(&self, ids: &[&str]) {
        *self.pages.lock().unwrap() = ids.iter().map(|id| id.to_string()).collect();
    }

    pub fn set_remote(&self, items: Vec<ChecklistItem>) {
        *self.remote.lock().unwrap() = items;
    }

    pub fn remote(&self) -> Vec<ChecklistItem> {
        self.remote.lock().unwrap().clone()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_patches(&self, fail: bool) {
        self.fail_patches.store(fail, Ordering::SeqCst);
    }

    /// Accept patches without changing the remote items
    pub fn ignore_patches(&self) {
        self.apply_patches.store(false, Ordering::SeqCst);
    }

    /// Park every patch until `release_patch` is called
    pub fn hold_patches(&self) {
        self.hold_patches.store(true, Ordering::SeqCst);
    }

    pub fn release_patch(&self) {
        self.patch_release.add_permits(1);
    }

    pub fn recorded_patches(&self) -> Vec<(String, bool)> {
        self.patches.lock().unwrap().clone()
    }

    fn read_guard(&self) -> DomainResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DomainError::Transport("connection reset".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl HabitGateway for FakeGateway {
    async fn resolve_database(&self, _name_query: &str) -> DomainResult<String> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        self.read_guard()?;
        self.databases
            .lock()
            .unwrap()
            .first()
            .cloned()
            .ok_or_else(|| DomainError::NotFound("no matching database".to_string()))
    }

    async fn list_pages(&self, _database_id: &str) -> DomainResult<Vec<String>> {
        self.list_pages_calls.fetch_add(1, Ordering::SeqCst);
        self.read_guard()?;
        Ok(self.pages.lock().unwrap().clone())
    }

    async fn list_blocks(&self, _page_id: &str) -> DomainResult<Vec<RawBlock>> {
        self.read_guard()?;
        let mut blocks = vec![RawBlock {
            id: "heading".to_string(),
            content: BlockContent::Paragraph(TextContent {
                rich_text: vec![RichText {
                    plain_text: "Today".to_string(),
                }],
            }),
        }];
        blocks.extend(self.remote.lock().unwrap().iter().map(|item| RawBlock {
            id: item.id.clone(),
            content: BlockContent::ToDo(ToDoContent {
                rich_text: vec![RichText {
                    plain_text: item.label.clone(),
                }],
                checked: Some(item.checked),
            }),
        }));
        Ok(blocks)
    }

    async fn patch_checklist_item(&self, block_id: &str, checked: bool) -> DomainResult<()> {
        if self.hold_patches.load(Ordering::SeqCst) {
            self.patch_started.notify_one();
            if let Ok(permit) = self.patch_release.acquire().await {
                permit.forget();
            }
        }

        self.patches
            .lock()
            .unwrap()
            .push((block_id.to_string(), checked));

        if self.fail_patches.load(Ordering::SeqCst) {
            return Err(DomainError::RemoteRejected { status: 409 });
        }
        if self.apply_patches.load(Ordering::SeqCst) {
            if let Some(item) = self
                .remote
                .lock()
                .unwrap()
                .iter_mut()
                .find(|item| item.id == block_id)
            {
                item.checked = checked;
            }
        }
        Ok(())
    }
}
