//! Session tree module
//!
//! Provides the two-level session hierarchy:
//! - `SessionRegistry` - Reads roots and children out of tmux
//! - `SessionManager` - Ensures and attaches roots and children, lists them
//! - `SessionSource` / `Prompter` - Interactive selection seams

mod manager;
pub mod naming;
pub mod paths;
mod registry;
mod show;
mod source;
mod types;

pub use manager::*;
pub use registry::*;
pub use source::*;
pub use types::*;
