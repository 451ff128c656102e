//! Core session types
//!
//! Defines the two-level session tree:
//! - a root is a session whose root name is its own name
//! - a child is a session named `root + separator + local name`

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::TreeError;

/// A live session carrying tree metadata
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionInfo {
    /// Session name
    pub name: String,
    /// Root the session belongs to
    pub root_name: String,
    /// Root working directory
    pub root_dir: String,
    /// Last attach time in nanoseconds, 0 for never
    pub last_used_ns: i64,
    /// Root inferred from a child's name rather than read from a session
    pub implicit: bool,
}

impl SessionInfo {
    pub fn is_root(&self) -> bool {
        self.name == self.root_name
    }
}

/// Roots and their children as found in the multiplexer
#[derive(Debug, Clone, Default)]
pub struct SessionTree {
    /// Roots keyed by name
    pub roots: BTreeMap<String, SessionInfo>,
    /// Children keyed by root name
    pub children: BTreeMap<String, Vec<SessionInfo>>,
    /// Root of the session the client is attached to
    pub current_root: Option<String>,
}

impl SessionTree {
    pub fn children_of(&self, root: &str) -> &[SessionInfo] {
        self.children.get(root).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Ordering of listed sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// By name
    #[default]
    Alphabetic,
    /// Most recently attached first, ties by name
    MostRecentlyUsed,
}

impl SortMode {
    /// Sort entries in place
    pub fn sort(self, entries: &mut [SessionInfo]) {
        match self {
            Self::Alphabetic => entries.sort_by(|a, b| a.name.cmp(&b.name)),
            Self::MostRecentlyUsed => {
                entries.sort_by(|a, b| {
                    Reverse(a.last_used_ns)
                        .cmp(&Reverse(b.last_used_ns))
                        .then_with(|| a.name.cmp(&b.name))
                });
            }
        }
    }
}

impl FromStr for SortMode {
    type Err = TreeError;

    /// Case-insensitive; empty means alphabetic
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "alphabetic" => Ok(Self::Alphabetic),
            "most-recently-used" | "mru" => Ok(Self::MostRecentlyUsed),
            _ => Err(TreeError::UnknownSortMode(s.to_string())),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alphabetic => write!(f, "alphabetic"),
            Self::MostRecentlyUsed => write!(f, "most-recently-used"),
        }
    }
}

/// Options for `attach-root`
#[derive(Debug, Clone, Default)]
pub struct AttachRootRequest {
    /// Root session name; derived from the directory when absent
    pub name: Option<String>,
    /// Session start directory
    pub dir: Option<String>,
    /// Git branch whose worktree becomes the start directory
    pub worktree: Option<String>,
}

/// Options for `attach-child`
#[derive(Debug, Clone, Default)]
pub struct AttachChildRequest {
    /// Root session name; the current session's root when absent
    pub root: Option<String>,
    /// Child name, local to the root
    pub name: String,
    /// Command run through `sh -lc` in a new child
    pub command: Option<String>,
}

/// Options for `show-roots`
#[derive(Debug, Clone, Default)]
pub struct ShowRootsRequest {
    pub sort_by: Option<String>,
    /// Leave out the root of the current session
    pub hide_current: bool,
}

/// Options for `show-children`
#[derive(Debug, Clone, Default)]
pub struct ShowChildrenRequest {
    pub root: Option<String>,
    pub sort_by: Option<String>,
    /// Leave out the current session
    pub hide_current: bool,
}
