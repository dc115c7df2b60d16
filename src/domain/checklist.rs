//! Checklist Item Entity
//!
//! One to-do entry mirrored from the remote page. Rebuilt from the raw block
//! list on every refresh; only `checked` is ever mutated in place.

use serde::{Deserialize, Serialize};

use super::block::{flatten_rich_text, BlockContent, RawBlock};
use super::entity::Entity;

/// Label shown for items whose text is empty
pub const NO_TEXT_LABEL: &str = "(no text)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// Remote block id
    pub id: String,
    /// Flattened display text, never empty
    pub label: String,
    /// Completion state
    pub checked: bool,
}

impl ChecklistItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>, checked: bool) -> Self {
        let label = label.into();
        Self {
            id: id.into(),
            label: if label.is_empty() {
                NO_TEXT_LABEL.to_string()
            } else {
                label
            },
            checked,
        }
    }

    /// Build an item from a checklist block; other block types yield `None`
    pub fn from_block(block: &RawBlock) -> Option<Self> {
        match &block.content {
            BlockContent::ToDo(todo) => Some(Self::new(
                block.id.clone(),
                flatten_rich_text(&todo.rich_text),
                todo.checked.unwrap_or(false),
            )),
            _ => None,
        }
    }
}

impl Entity for ChecklistItem {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Keep checklist blocks only, in remote order
pub fn checklist_items(blocks: &[RawBlock]) -> Vec<ChecklistItem> {
    blocks.iter().filter_map(ChecklistItem::from_block).collect()
}
