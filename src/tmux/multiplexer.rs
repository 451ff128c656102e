//! The multiplexer operations the session tree is built on

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

/// Session-level operations of a terminal multiplexer
///
/// `TmuxExecutor` is the real implementation; the session tree logic only
/// ever talks to this trait.
#[async_trait]
pub trait Multiplexer: Send + Sync {
    /// Whether a session with exactly this name exists
    async fn has_session(&self, name: &str) -> Result<bool>;

    /// Names of all live sessions; empty when no server is running
    async fn list_sessions(&self) -> Result<Vec<String>>;

    /// Read a session option, trimmed. Unset options read as empty.
    async fn show_option(&self, session: &str, key: &str) -> Result<String>;

    async fn set_option(&self, session: &str, key: &str, value: &str) -> Result<()>;

    /// Create a detached session started in `dir`, optionally running `command`
    async fn new_session(&self, name: &str, dir: &Path, command: &[String]) -> Result<()>;

    /// Switch the client when inside the multiplexer, attach otherwise
    async fn attach_or_switch(&self, name: &str) -> Result<()>;

    /// Whether this process runs inside a multiplexer client
    fn is_inside(&self) -> bool;

    /// Name of the session the current client is attached to
    async fn current_session_name(&self) -> Result<String>;
}
