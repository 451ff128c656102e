//! Git CLI runner for repository mutations

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, instrument};

use crate::error::{diagnostic, GitError, Result};

/// Run `git` in `repo` and return stdout
///
/// A non-zero exit becomes `GitError::CommandFailed` carrying the trimmed
/// stderr, or the exit status when git printed nothing.
#[instrument(skip(repo), fields(repo = %repo.display()))]
pub async fn run_git(repo: &Path, args: &[&str]) -> Result<String> {
    let command = format!("git {}", args.join(" "));
    let output = Command::new("git")
        .current_dir(repo)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| GitError::CommandFailed {
            command: command.clone(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GitError::CommandFailed {
            stderr: diagnostic(&stderr, || output.status.to_string()),
            command,
        }
        .into());
    }

    debug!("{} succeeded", command);
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Run `git` in `repo` and report whether it exited successfully
pub async fn git_succeeds(repo: &Path, args: &[&str]) -> Result<bool> {
    let status = Command::new("git")
        .current_dir(repo)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map_err(|e| GitError::CommandFailed {
            command: format!("git {}", args.join(" ")),
            stderr: e.to_string(),
        })?;
    Ok(status.success())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_failure_carries_stderr() {
        let temp_dir = TempDir::new().unwrap();
        let err = run_git(temp_dir.path(), &["definitely-not-a-command"])
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("git definitely-not-a-command"), "{message}");
        assert!(!message.ends_with(": "), "{message}");
    }
}
