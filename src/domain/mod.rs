//! Domain Layer
//!
//! Checklist entities, the shared snapshot model, and the crate's error type.
//! Nothing here performs I/O.

mod block;
mod checklist;
mod entity;
mod snapshot;

pub use block::{flatten_rich_text, BlockContent, RawBlock, RichText, TextContent, ToDoContent};
pub use checklist::{checklist_items, ChecklistItem, NO_TEXT_LABEL};
pub use entity::{find_mut, position_of, DomainError, DomainResult, Entity};
pub use snapshot::{ExternalToggle, RemovalQueue, SharedSnapshot, SnapshotEntry};
