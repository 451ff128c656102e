//! Git worktree management
//!
//! Worktrees live at `<repo root>/<worktrees dir>/<branch>`. Creating one
//! makes sure the branch exists locally first, tracking a remote branch
//! when one of the remotes has it.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use super::{git_succeeds, run_git, GitBackend};
use crate::error::{GitError, Result};

/// Comment line written above the ignore pattern
const IGNORE_COMMENT: &str = "# treemux worktrees";

/// Remote preferred over all others when looking for a branch
const PREFERRED_REMOTE: &str = "origin";

/// Worktree manager
///
/// gitoxide answers the read-only questions; mutations go through the git
/// CLI.
pub struct WorktreeManager {
    /// Git backend
    backend: GitBackend,
    /// Directory name under the repository root holding worktrees
    dir_name: String,
}

impl WorktreeManager {
    /// Locate the repository containing `cwd`
    pub fn discover(cwd: &Path, dir_name: impl Into<String>) -> Result<Self> {
        Ok(Self {
            backend: GitBackend::discover(cwd)?,
            dir_name: dir_name.into(),
        })
    }

    /// Get the repository root
    pub fn repo_root(&self) -> &Path {
        self.backend.path()
    }

    /// Path the worktree for `branch` lives at
    pub fn default_path(&self, branch: &str) -> Result<PathBuf> {
        let branch = branch.trim();
        if branch.is_empty() {
            return Err(GitError::MissingBranch.into());
        }
        Ok(self.repo_root().join(&self.dir_name).join(branch))
    }

    /// Create the worktree for `branch` at `path` unless the directory exists
    ///
    /// Returns whether a worktree was created.
    #[instrument(skip(self))]
    pub async fn ensure_worktree(&self, branch: &str, path: &Path) -> Result<bool> {
        let branch = branch.trim();
        if branch.is_empty() {
            return Err(GitError::MissingBranch.into());
        }
        if path.is_dir() {
            debug!("Worktree {:?} already exists", path);
            return Ok(false);
        }

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                GitError::WorktreeError(format!("failed to create worktree parent dir: {e}"))
            })?;
        }

        self.ensure_branch(branch).await?;

        let path_str = path.to_string_lossy();
        run_git(self.repo_root(), &["worktree", "add", &path_str, branch]).await?;
        info!("Created worktree at {:?} for branch {}", path, branch);

        self.ensure_ignored().await?;
        Ok(true)
    }

    /// Make sure a local branch named `branch` exists
    ///
    /// Remotes are fetched and searched `origin` first, then in listed order;
    /// the first remote with the branch becomes its upstream. Without a match
    /// a plain local branch is created.
    #[instrument(skip(self))]
    pub async fn ensure_branch(&self, branch: &str) -> Result<()> {
        if self.backend.branch_exists(branch)? {
            return Ok(());
        }

        let repo = self.repo_root();
        let remotes = run_git(repo, &["remote"]).await?;
        let remotes = remote_search_order(&remotes);

        if !remotes.is_empty() {
            run_git(repo, &["fetch", "--all", "--prune"]).await?;
        }

        for remote in remotes {
            let remote_ref = format!("refs/remotes/{remote}/{branch}");
            if git_succeeds(repo, &["show-ref", "--verify", "--quiet", &remote_ref]).await? {
                let upstream = format!("{remote}/{branch}");
                run_git(repo, &["branch", "--track", branch, &upstream]).await?;
                info!("Created branch {} tracking {}", branch, upstream);
                return Ok(());
            }
        }

        run_git(repo, &["branch", "--no-track", branch]).await?;
        info!("Created local branch {}", branch);
        Ok(())
    }

    /// Append the worktrees directory to `.gitignore` once
    async fn ensure_ignored(&self) -> Result<()> {
        let ignore_path = self.repo_root().join(".gitignore");
        let existing = match tokio::fs::read_to_string(&ignore_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };

        if let Some(updated) = with_ignore_entry(&existing, &self.dir_name) {
            tokio::fs::write(&ignore_path, updated).await?;
            debug!("Added {} to {:?}", self.dir_name, ignore_path);
        }
        Ok(())
    }
}

/// Remote names with `origin` moved to the front
fn remote_search_order(listing: &str) -> Vec<&str> {
    let mut remotes: Vec<&str> = listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if let Some(index) = remotes.iter().position(|r| *r == PREFERRED_REMOTE) {
        let origin = remotes.remove(index);
        remotes.insert(0, origin);
    }
    remotes
}

/// Ignore file content with `pattern` appended, or `None` if already listed
fn with_ignore_entry(existing: &str, pattern: &str) -> Option<String> {
    if existing.lines().any(|line| line.trim_end_matches('\r') == pattern) {
        return None;
    }

    let mut updated = existing.to_string();
    if !updated.is_empty() && !updated.ends_with('\n') {
        updated.push('\n');
    }
    updated.push_str(IGNORE_COMMENT);
    updated.push('\n');
    updated.push_str(pattern);
    updated.push('\n');
    Some(updated)
}
