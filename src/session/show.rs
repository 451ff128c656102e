//! Listing of roots and children
//!
//! Each line is `"<marker> <label>"` where the marker is `*` for the
//! current entry and a space otherwise.

use super::naming::child_label;
use super::{SessionInfo, SessionManager, ShowChildrenRequest, ShowRootsRequest, SortMode};
use crate::error::{Result, TreeError};
use crate::tmux::Multiplexer;

fn format_line(is_current: bool, label: &str) -> String {
    let marker = if is_current { '*' } else { ' ' };
    format!("{marker} {label}")
}

impl<M: Multiplexer> SessionManager<M> {
    /// Sort mode from the flag, falling back to the configured default
    pub fn sort_mode(&self, sort_by: Option<&str>) -> Result<SortMode> {
        Ok(sort_by
            .unwrap_or(&self.config().default_sort)
            .parse::<SortMode>()?)
    }

    /// Lines listing every root
    pub async fn show_roots(&self, req: &ShowRootsRequest) -> Result<Vec<String>> {
        let mode = self.sort_mode(req.sort_by.as_deref())?;
        let tree = self.registry().collect().await?;
        let current = tree.current_root.as_deref();

        let mut entries: Vec<SessionInfo> = tree
            .roots
            .into_values()
            .filter(|info| !(req.hide_current && Some(info.name.as_str()) == current))
            .collect();
        mode.sort(&mut entries);

        Ok(entries
            .iter()
            .map(|info| format_line(Some(info.name.as_str()) == current, &info.name))
            .collect())
    }

    /// Lines listing the children of a root, labelled by their local name
    pub async fn show_children(&self, req: &ShowChildrenRequest) -> Result<Vec<String>> {
        let mode = self.sort_mode(req.sort_by.as_deref())?;
        let root = self.resolve_root(req.root.as_deref()).await?;

        let registry = self.registry();
        let mut tree = registry.collect().await?;
        if !tree.roots.contains_key(&root) {
            return Err(TreeError::RootNotFound(root).into());
        }
        let current = registry.current_session().await;
        let current = current.as_deref();

        let mut entries: Vec<SessionInfo> = tree
            .children
            .remove(&root)
            .unwrap_or_default()
            .into_iter()
            .filter(|info| !(req.hide_current && Some(info.name.as_str()) == current))
            .collect();
        mode.sort(&mut entries);

        Ok(entries
            .iter()
            .map(|info| {
                let label = child_label(&root, self.separator(), &info.name);
                format_line(Some(info.name.as_str()) == current, label)
            })
            .collect())
    }
}
