//! Error types for treemux
//!
//! Uses `thiserror` for ergonomic error definitions with automatic `Display` and `Error` impls.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for treemux
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("Tmux error: {0}")]
    Tmux(#[from] TmuxError),

    #[error("Git error: {0}")]
    Git(#[from] GitError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TUI error: {0}")]
    Tui(#[from] TuiError),
}

/// Session hierarchy errors
///
/// Validation variants are raised before any external command runs; the
/// rest describe a broken or foreign session.
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("{0} session name is empty")]
    EmptyName(&'static str),

    #[error("--{0} and --{1} are mutually exclusive")]
    MutuallyExclusive(&'static str, &'static str),

    #[error("unknown sort mode: {0}")]
    UnknownSortMode(String),

    #[error("missing path")]
    MissingPath,

    #[error("--root is required outside tmux")]
    RootRequiredOutsideTmux,

    #[error("failed to determine current tmux session")]
    CurrentSessionUnknown,

    #[error("current session is not a treemux session: {0}")]
    NotATreeSession(String),

    #[error("root session does not exist: {0}")]
    RootNotFound(String),

    #[error("missing root metadata ({key}) for session: {session}")]
    MissingMetadata { session: String, key: &'static str },

    #[error("root directory does not exist: {0}")]
    DirectoryNotFound(PathBuf),
}

/// Tmux integration errors
#[derive(Error, Debug)]
pub enum TmuxError {
    #[error("Tmux is not installed or not in PATH")]
    NotInstalled,

    #[error("Tmux server not running")]
    ServerNotRunning,

    #[error("Session '{0}' not found in tmux")]
    SessionNotFound(String),

    #[error("{command}: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Failed to run tmux: {0}")]
    Spawn(String),
}

/// Git operations errors
#[derive(Error, Debug)]
pub enum GitError {
    #[error("not inside a git repository: {0}")]
    NotARepository(PathBuf),

    #[error("missing worktree branch")]
    MissingBranch,

    #[error("{command}: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Worktree error: {0}")]
    WorktreeError(String),

    #[error("Gitoxide error: {0}")]
    Gix(String),
}

/// Configuration and environment errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),

    #[error("Could not determine home directory")]
    HomeDirUnknown,

    #[error("failed to get current directory: {0}")]
    CurrentDirUnknown(String),

    #[error("Failed to create config directory: {0}")]
    DirectoryCreationFailed(PathBuf),
}

/// TUI-related errors
#[derive(Error, Debug)]
pub enum TuiError {
    #[error("Failed to initialize terminal: {0}")]
    InitFailed(String),

    #[error("Failed to restore terminal: {0}")]
    RestoreFailed(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Event handling error: {0}")]
    EventError(String),
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<gix::reference::find::Error> for GitError {
    fn from(e: gix::reference::find::Error) -> Self {
        GitError::Gix(e.to_string())
    }
}

/// Pick the diagnostic text of a failed command: trimmed stderr, or the
/// fallback when the command printed nothing.
pub(crate) fn diagnostic(stderr: &str, fallback: impl FnOnce() -> String) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        fallback()
    } else {
        trimmed.to_string()
    }
}
