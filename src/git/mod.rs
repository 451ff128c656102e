//! Git operations
//!
//! - `GitBackend` - Read-only queries through gitoxide
//! - `run_git` - Git CLI runner for mutations
//! - `WorktreeManager` - Branch and worktree provisioning

mod backend;
mod command;
mod worktree;

pub use backend::*;
pub use command::*;
pub use worktree::*;
