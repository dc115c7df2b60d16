//! Widget Layer
//!
//! The external-surface side of the shared snapshot: toggles applied from
//! the widget and the timeline it renders.

mod timeline;
mod toggle;

pub use timeline::{build_timeline, TimelinePolicy, WidgetTimeline};
pub use toggle::{toggle_from_widget, toggle_from_widget_at, WidgetToggleOutcome};
