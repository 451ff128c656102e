//! Typed access to the per-session metadata stored in tmux options

use chrono::Utc;
use tracing::debug;

use super::Multiplexer;
use crate::error::Result;

/// Root session a session belongs to
pub const ROOT_NAME_OPTION: &str = "@tree_root_name";

/// Working directory of the root
pub const ROOT_DIR_OPTION: &str = "@tree_root_dir";

/// Decimal nanosecond Unix timestamp of the last attach
pub const LAST_ATTACHED_OPTION: &str = "@tree_last_attached_time";

/// Reads and writes the tree metadata of sessions
pub struct SessionOptions<'a, M: ?Sized> {
    mux: &'a M,
}

impl<'a, M: Multiplexer + ?Sized> SessionOptions<'a, M> {
    pub fn new(mux: &'a M) -> Self {
        Self { mux }
    }

    async fn read(&self, session: &str, key: &str) -> Result<Option<String>> {
        let value = self.mux.show_option(session, key).await?;
        let value = value.trim();
        Ok((!value.is_empty()).then(|| value.to_string()))
    }

    /// The `@tree_root_name` tag, `None` when unset
    pub async fn root_name(&self, session: &str) -> Result<Option<String>> {
        self.read(session, ROOT_NAME_OPTION).await
    }

    /// The `@tree_root_dir` tag, `None` when unset
    pub async fn root_dir(&self, session: &str) -> Result<Option<String>> {
        self.read(session, ROOT_DIR_OPTION).await
    }

    /// Last attach time in nanoseconds; 0 when unset or unreadable
    pub async fn last_attached(&self, session: &str) -> i64 {
        match self.read(session, LAST_ATTACHED_OPTION).await {
            Ok(Some(value)) => parse_timestamp(&value),
            Ok(None) => 0,
            Err(e) => {
                debug!("Could not read last attach time of {}: {}", session, e);
                0
            }
        }
    }

    /// Tag a session as part of the tree rooted at `root_name`
    pub async fn stamp(&self, session: &str, root_name: &str, root_dir: &str) -> Result<()> {
        self.mux.set_option(session, ROOT_NAME_OPTION, root_name).await?;
        self.mux.set_option(session, ROOT_DIR_OPTION, root_dir).await
    }

    /// Record now as the last attach time
    pub async fn touch(&self, session: &str) -> Result<()> {
        let now = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        self.mux
            .set_option(session, LAST_ATTACHED_OPTION, &now.to_string())
            .await
    }
}

fn parse_timestamp(value: &str) -> i64 {
    value.trim().parse().unwrap_or(0)
}
