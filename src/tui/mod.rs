//! Terminal UI for choosing a session
//!
//! A single filterable list drawn with ratatui, either inline below the
//! prompt or on the alternate screen.

mod picker;
mod theme;

pub use picker::*;
pub use theme::*;
