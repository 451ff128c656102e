//! Git backend using gitoxide
//!
//! Read-only repository queries that do not need the git binary.

use std::path::{Path, PathBuf};

use gix::Repository;
use tracing::{debug, instrument};

use crate::error::{GitError, Result};

/// Git backend using gitoxide
pub struct GitBackend {
    /// The gitoxide repository handle
    repo: Repository,
    /// Root of the working tree
    path: PathBuf,
}

impl GitBackend {
    /// Discover the repository containing `path` (searches parent directories)
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn discover(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let repo = gix::discover(path).map_err(|_e| GitError::NotARepository(path.to_path_buf()))?;

        let repo_path = repo
            .work_dir()
            .map(Path::to_path_buf)
            .or_else(|| repo.path().parent().map(Path::to_path_buf))
            .ok_or_else(|| GitError::NotARepository(path.to_path_buf()))?;

        debug!("Discovered repository at {:?}", repo_path);

        Ok(Self {
            repo,
            path: repo_path,
        })
    }

    /// Root of the working tree
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if a local branch exists
    pub fn branch_exists(&self, branch_name: &str) -> Result<bool> {
        let full_name = format!("refs/heads/{branch_name}");
        let reference = self
            .repo
            .try_find_reference(full_name.as_str())
            .map_err(GitError::from)?;
        Ok(reference.is_some())
    }
}
