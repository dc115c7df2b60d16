//! Commands Layer
//!
//! Command handlers that bridge the CLI to the engine, the widget side and
//! the config store. Errors cross this boundary as strings.

mod config_cmd;
mod habit_cmd;
mod widget_cmd;

pub use config_cmd::*;
pub use habit_cmd::*;
pub use widget_cmd::*;
