//! Remote Block Decoding
//!
//! A block is decoded by reading its `type` tag first and then decoding only
//! the payload stored under the key of the same name. Unknown tags decode to
//! `BlockContent::Unsupported` instead of failing the whole page.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One run of rich text; only the plain rendering is consumed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichText {
    pub plain_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextContent {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ToDoContent {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    #[serde(default)]
    pub checked: Option<bool>,
}

/// Type-specific payload of a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockContent {
    Paragraph(TextContent),
    Heading { level: u8, content: TextContent },
    ToDo(ToDoContent),
    BulletedListItem(TextContent),
    /// Any tag this client does not render
    Unsupported(String),
}

/// A direct child block of a page
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BlockEnvelope")]
pub struct RawBlock {
    pub id: String,
    pub content: BlockContent,
}

impl RawBlock {
    /// The wire tag this block was decoded from
    pub fn block_type(&self) -> &str {
        match &self.content {
            BlockContent::Paragraph(_) => "paragraph",
            BlockContent::Heading { level: 1, .. } => "heading_1",
            BlockContent::Heading { level: 2, .. } => "heading_2",
            BlockContent::Heading { .. } => "heading_3",
            BlockContent::ToDo(_) => "to_do",
            BlockContent::BulletedListItem(_) => "bulleted_list_item",
            BlockContent::Unsupported(tag) => tag.as_str(),
        }
    }

    pub fn is_checklist(&self) -> bool {
        matches!(self.content, BlockContent::ToDo(_))
    }

    /// Flattened text, `None` for unsupported blocks
    pub fn plain_text(&self) -> Option<String> {
        let runs = match &self.content {
            BlockContent::Paragraph(content)
            | BlockContent::BulletedListItem(content)
            | BlockContent::Heading { content, .. } => &content.rich_text,
            BlockContent::ToDo(todo) => &todo.rich_text,
            BlockContent::Unsupported(_) => return None,
        };
        Some(flatten_rich_text(runs))
    }
}

/// Concatenate every run's plain text
pub fn flatten_rich_text(runs: &[RichText]) -> String {
    runs.iter().map(|run| run.plain_text.as_str()).collect()
}

#[derive(Deserialize)]
struct BlockEnvelope {
    id: String,
    #[serde(rename = "type")]
    block_type: String,
    #[serde(flatten)]
    payloads: Map<String, Value>,
}

impl BlockEnvelope {
    fn take_payload<T: DeserializeOwned>(&mut self) -> Result<T, String> {
        let payload = self.payloads.remove(&self.block_type).ok_or_else(|| {
            format!("block {} of type {} has no payload", self.id, self.block_type)
        })?;
        serde_json::from_value(payload)
            .map_err(|e| format!("block {} has a malformed {} payload: {}", self.id, self.block_type, e))
    }
}

impl TryFrom<BlockEnvelope> for RawBlock {
    type Error = String;

    fn try_from(mut envelope: BlockEnvelope) -> Result<Self, Self::Error> {
        let content = match envelope.block_type.as_str() {
            "paragraph" => BlockContent::Paragraph(envelope.take_payload()?),
            "heading_1" => BlockContent::Heading {
                level: 1,
                content: envelope.take_payload()?,
            },
            "heading_2" => BlockContent::Heading {
                level: 2,
                content: envelope.take_payload()?,
            },
            "heading_3" => BlockContent::Heading {
                level: 3,
                content: envelope.take_payload()?,
            },
            "to_do" => BlockContent::ToDo(envelope.take_payload()?),
            "bulleted_list_item" => BlockContent::BulletedListItem(envelope.take_payload()?),
            other => BlockContent::Unsupported(other.to_string()),
        };

        Ok(RawBlock {
            id: envelope.id,
            content,
        })
    }
}
