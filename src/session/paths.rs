//! Directory argument resolution

use std::path::{Component, Path, PathBuf};

use directories::BaseDirs;

use crate::error::{ConfigError, Result, TreeError};

/// Resolve a user-supplied directory to an absolute, lexically clean path
///
/// A leading `~` expands to the home directory and relative paths are
/// joined onto `cwd`.
pub fn normalize_path(raw: &str, cwd: &Path) -> Result<PathBuf> {
    if raw.is_empty() {
        return Err(TreeError::MissingPath.into());
    }

    let path = match raw.strip_prefix('~') {
        Some(rest) => home_dir()?.join(rest.trim_start_matches('/')),
        None => PathBuf::from(raw),
    };

    let path = if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    };

    Ok(clean(&path))
}

/// The process working directory
pub fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().map_err(|e| ConfigError::CurrentDirUnknown(e.to_string()).into())
}

fn home_dir() -> Result<PathBuf> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or_else(|| ConfigError::HomeDirUnknown.into())
}

/// Drop `.` segments and fold `..` into their parent without touching the
/// filesystem
pub fn clean(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match cleaned.components().next_back() {
                Some(Component::Normal(_)) => {
                    cleaned.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => cleaned.push(".."),
            },
            other => cleaned.push(other.as_os_str()),
        }
    }
    if cleaned.as_os_str().is_empty() {
        cleaned.push(".");
    }
    cleaned
}
