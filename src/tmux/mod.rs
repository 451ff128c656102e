//! Tmux integration module
//!
//! - `Multiplexer` - The session operations the tree is built on
//! - `TmuxExecutor` - Multiplexer backed by the tmux binary
//! - `SessionOptions` - Typed access to the tree metadata options

mod executor;
mod multiplexer;
mod options;

pub use executor::*;
pub use multiplexer::*;
pub use options::*;
