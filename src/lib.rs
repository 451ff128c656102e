//! treemux - A two-level tree of tmux sessions
//!
//! Roots are tmux sessions bound to a directory; children are sessions
//! named `<root><separator><child>` that run inside their root's directory.
//! The hierarchy lives entirely in tmux session options, so any tmux client
//! sees the same tree.
//!
//! # Modules
//!
//! - [`session`] - Hierarchy model, attach orchestration and listings
//! - [`tmux`] - The `Multiplexer` seam and its tmux-backed implementation
//! - [`git`] - Branch and worktree provisioning for worktree roots
//! - [`tui`] - Interactive session picker
//! - [`config`] - Layered configuration
//! - [`error`] - Error types

pub mod config;
pub mod error;
pub mod git;
pub mod session;
pub mod tmux;
pub mod tui;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::{Error, Result};
pub use session::{SessionInfo, SessionManager, SessionTree, SortMode};
pub use tmux::{Multiplexer, TmuxExecutor};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
