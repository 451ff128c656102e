//! Session registry
//!
//! Builds the root → children tree from the live session list and the
//! metadata stored on each session.

use tracing::{debug, instrument};

use super::{SessionInfo, SessionTree};
use crate::error::Result;
use crate::tmux::{Multiplexer, SessionOptions};

/// Reads the session tree out of a multiplexer
pub struct SessionRegistry<'a, M: ?Sized> {
    mux: &'a M,
    separator: &'a str,
}

impl<'a, M: Multiplexer + ?Sized> SessionRegistry<'a, M> {
    pub fn new(mux: &'a M, separator: &'a str) -> Self {
        Self { mux, separator }
    }

    /// Collect all tree sessions
    ///
    /// Sessions without root name or root dir are skipped. A child whose
    /// name starts with `<root><separator>` keeps that root listed even when
    /// the root session itself is gone.
    #[instrument(skip(self))]
    pub async fn collect(&self) -> Result<SessionTree> {
        let options = SessionOptions::new(self.mux);
        let mut tree = SessionTree::default();

        for session in self.mux.list_sessions().await? {
            let Some(root_name) = options.root_name(&session).await.ok().flatten() else {
                debug!("Skipping {}: no root name", session);
                continue;
            };
            let Some(root_dir) = options.root_dir(&session).await.ok().flatten() else {
                debug!("Skipping {}: no root dir", session);
                continue;
            };

            let info = SessionInfo {
                last_used_ns: options.last_attached(&session).await,
                name: session,
                root_name,
                root_dir,
                implicit: false,
            };

            if info.is_root() {
                tree.roots.insert(info.name.clone(), info);
                continue;
            }

            if let Some((prefix, _)) = info.name.split_once(self.separator) {
                if !prefix.is_empty() && !tree.roots.contains_key(prefix) {
                    tree.roots.insert(
                        prefix.to_string(),
                        SessionInfo {
                            name: prefix.to_string(),
                            root_name: prefix.to_string(),
                            root_dir: info.root_dir.clone(),
                            last_used_ns: 0,
                            implicit: true,
                        },
                    );
                }
            }
            tree.children
                .entry(info.root_name.clone())
                .or_default()
                .push(info);
        }

        tree.current_root = self.current_root().await;
        Ok(tree)
    }

    /// Name of the session the client is attached to, if any
    pub async fn current_session(&self) -> Option<String> {
        if !self.mux.is_inside() {
            return None;
        }
        let name = self.mux.current_session_name().await.ok()?;
        let name = name.trim();
        (!name.is_empty()).then(|| name.to_string())
    }

    /// Root of the session the client is attached to, if any
    pub async fn current_root(&self) -> Option<String> {
        let session = self.current_session().await?;
        SessionOptions::new(self.mux)
            .root_name(&session)
            .await
            .ok()
            .flatten()
    }
}
