//! Candidate sessions for interactive selection
//!
//! A `SessionSource` lists entries and activates the chosen one; a
//! `Prompter` lets the user choose. Neither knows about the other.

use std::fmt;

use async_trait::async_trait;
use tracing::info;

use super::{SessionManager, SortMode};
use crate::error::Result;
use crate::tmux::Multiplexer;

/// One selectable session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Full session name
    pub session: String,
    /// Live root session to record the attach on; `None` when the root
    /// session is gone
    pub root: Option<String>,
    /// Text shown to the user
    pub label: String,
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// A source of sessions the user can pick from
#[async_trait]
pub trait SessionSource: Send + Sync {
    /// Entries in display order
    async fn list(&self) -> Result<Vec<Entry>>;

    /// Switch to the chosen entry
    async fn activate(&self, entry: &Entry) -> Result<()>;
}

/// Asks the user to choose one of `items`
#[async_trait]
pub trait Prompter: Send + Sync {
    /// Index of the chosen item, or `None` when the user cancelled
    async fn prompt(&self, items: &[String]) -> Result<Option<usize>>;
}

/// Live tree sessions: roots by recent use, each followed by its children
///
/// A root whose session is gone is not listed itself, only its children.
pub struct ActiveSessions<'a, M> {
    manager: &'a SessionManager<M>,
}

impl<'a, M: Multiplexer> ActiveSessions<'a, M> {
    pub fn new(manager: &'a SessionManager<M>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl<M: Multiplexer> SessionSource for ActiveSessions<'_, M> {
    async fn list(&self) -> Result<Vec<Entry>> {
        let mut tree = self.manager.registry().collect().await?;

        let mut roots: Vec<_> = tree.roots.values().cloned().collect();
        SortMode::MostRecentlyUsed.sort(&mut roots);

        let mut entries = Vec::new();
        for root in roots {
            let mut children = tree.children.remove(&root.name).unwrap_or_default();
            SortMode::MostRecentlyUsed.sort(&mut children);

            let live_root = (!root.implicit).then(|| root.name.clone());
            if let Some(name) = &live_root {
                entries.push(Entry {
                    session: name.clone(),
                    root: Some(name.clone()),
                    label: name.clone(),
                });
            }
            entries.extend(children.into_iter().map(|child| Entry {
                label: child.name.clone(),
                session: child.name,
                root: live_root.clone(),
            }));
        }
        Ok(entries)
    }

    async fn activate(&self, entry: &Entry) -> Result<()> {
        let root = entry.root.as_deref().unwrap_or(&entry.session);
        self.manager.activate(&entry.session, root).await
    }
}

/// Let the user pick an entry from `source` and activate it
///
/// Returns the activated entry, or `None` when there was nothing to pick or
/// the user cancelled.
pub async fn pick<S, P>(source: &S, prompter: &P) -> Result<Option<Entry>>
where
    S: SessionSource + ?Sized,
    P: Prompter + ?Sized,
{
    let entries = source.list().await?;
    if entries.is_empty() {
        return Ok(None);
    }

    let labels: Vec<String> = entries.iter().map(ToString::to_string).collect();
    let Some(index) = prompter.prompt(&labels).await? else {
        info!("Selection cancelled");
        return Ok(None);
    };
    let Some(entry) = entries.into_iter().nth(index) else {
        return Ok(None);
    };

    source.activate(&entry).await?;
    Ok(Some(entry))
}
