//! Gateway Layer - Core Trait
//!
//! The four remote operations the sync core depends on. Implementations do
//! no caching and no retries; every failure goes straight back to the caller.

use async_trait::async_trait;

use crate::domain::{DomainResult, RawBlock};

#[async_trait]
pub trait HabitGateway: Send + Sync {
    /// Id of the first database matching `name_query`, oldest edit first
    async fn resolve_database(&self, name_query: &str) -> DomainResult<String>;

    /// Page ids of a database, in remote order
    async fn list_pages(&self, database_id: &str) -> DomainResult<Vec<String>>;

    /// Direct child blocks of a page, single level
    async fn list_blocks(&self, page_id: &str) -> DomainResult<Vec<RawBlock>>;

    /// Set only the checked field of a checklist block
    async fn patch_checklist_item(&self, block_id: &str, checked: bool) -> DomainResult<()>;
}
