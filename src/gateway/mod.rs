//! Gateway Layer
//!
//! Remote access abstraction and its Notion implementation.

mod notion;
mod traits;

#[cfg(test)]
pub(crate) mod fake;

pub use notion::{NotionGateway, DEFAULT_BASE_ENDPOINT, NOTION_API_VERSION};
pub use traits::HabitGateway;
