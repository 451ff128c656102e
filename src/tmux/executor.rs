//! Tmux command executor
//!
//! Runs the tmux binary one command at a time and maps the handful of
//! "nothing there" failures (no server, unknown session) to empty results.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, instrument};

use super::Multiplexer;
use crate::error::{diagnostic, Error, Result, TmuxError};

/// Captured result of one tmux invocation
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

/// Tmux command executor
#[derive(Debug, Clone, Default)]
pub struct TmuxExecutor {
    /// Socket name passed as `-L`, for isolated servers
    socket: Option<String>,
}

impl TmuxExecutor {
    /// Create a new executor talking to the default server
    pub fn new() -> Self {
        Self::default()
    }

    /// Talk to the server on a named socket instead of the default one
    pub fn with_socket(mut self, socket: impl Into<String>) -> Self {
        self.socket = Some(socket.into());
        self
    }

    /// Check if tmux is installed and accessible
    pub async fn check_installed(&self) -> Result<()> {
        let output = Command::new("tmux")
            .arg("-V")
            .output()
            .await
            .map_err(|_| TmuxError::NotInstalled)?;

        if output.status.success() {
            let version = String::from_utf8_lossy(&output.stdout);
            debug!("tmux version: {}", version.trim());
            Ok(())
        } else {
            Err(TmuxError::NotInstalled.into())
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("tmux");
        if let Some(socket) = &self.socket {
            cmd.arg("-L").arg(socket);
        }
        cmd.args(args);
        cmd
    }

    /// Run a tmux command and capture both streams
    #[instrument(skip(self), fields(args = ?args))]
    pub async fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        let output = self
            .command(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => TmuxError::NotInstalled,
                _ => TmuxError::Spawn(e.to_string()),
            })?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
        })
    }

    /// Execute a tmux command and return its stdout, failing on non-zero exit
    pub async fn execute(&self, args: &[&str]) -> Result<String> {
        let output = self.run(args).await?;
        if output.success {
            Ok(output.stdout)
        } else {
            Err(command_failed(args, &output.stderr))
        }
    }
}

fn command_failed(args: &[&str], stderr: &str) -> Error {
    TmuxError::CommandFailed {
        command: format!("tmux {}", args.join(" ")),
        stderr: diagnostic(stderr, || "exited with non-zero status".to_string()),
    }
    .into()
}

/// The server is not running, so there is nothing to find
pub(crate) fn is_no_server(stderr: &str) -> bool {
    stderr.contains("no server running") || stderr.contains("failed to connect to server")
}

pub(crate) fn is_missing_session(stderr: &str) -> bool {
    stderr.contains("can't find session")
}

#[async_trait]
impl Multiplexer for TmuxExecutor {
    async fn has_session(&self, name: &str) -> Result<bool> {
        let target = format!("={name}");
        let args = ["has-session", "-t", target.as_str()];
        let output = self.run(&args).await?;
        if output.success {
            return Ok(true);
        }
        if is_missing_session(&output.stderr) || is_no_server(&output.stderr) {
            return Ok(false);
        }
        Err(command_failed(&args, &output.stderr))
    }

    async fn list_sessions(&self) -> Result<Vec<String>> {
        let args = ["list-sessions", "-F", "#{session_name}"];
        let output = self.run(&args).await?;
        if !output.success {
            if is_no_server(&output.stderr) {
                return Ok(Vec::new());
            }
            return Err(command_failed(&args, &output.stderr));
        }

        Ok(output
            .stdout
            .lines()
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }

    async fn show_option(&self, session: &str, key: &str) -> Result<String> {
        let output = self.run(&["show-options", "-qv", "-t", session, key]).await?;
        if output.success {
            return Ok(output.stdout.trim().to_string());
        }
        if is_missing_session(&output.stderr) {
            return Err(TmuxError::SessionNotFound(session.to_string()).into());
        }
        if is_no_server(&output.stderr) {
            return Err(TmuxError::ServerNotRunning.into());
        }
        Err(command_failed(&["show-options", "-qv", "-t", session, key], &output.stderr))
    }

    async fn set_option(&self, session: &str, key: &str, value: &str) -> Result<()> {
        self.execute(&["set-option", "-q", "-t", session, key, value])
            .await?;
        Ok(())
    }

    async fn new_session(&self, name: &str, dir: &Path, command: &[String]) -> Result<()> {
        let dir = dir.to_string_lossy();
        let mut args = vec!["new-session", "-d", "-s", name, "-c", &*dir];
        if !command.is_empty() {
            args.push("--");
            args.extend(command.iter().map(String::as_str));
        }

        self.execute(&args).await?;
        debug!("Created tmux session {}", name);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn attach_or_switch(&self, name: &str) -> Result<()> {
        if self.is_inside() {
            self.execute(&["switch-client", "-t", name]).await?;
            return Ok(());
        }

        // attach-session takes over the terminal, so it inherits our stdio
        let args = ["attach-session", "-t", name];
        let status = self
            .command(&args)
            .status()
            .await
            .map_err(|e| TmuxError::Spawn(e.to_string()))?;

        if status.success() {
            Ok(())
        } else {
            Err(command_failed(&args, &status.to_string()))
        }
    }

    fn is_inside(&self) -> bool {
        std::env::var_os("TMUX").is_some_and(|value| !value.is_empty())
    }

    async fn current_session_name(&self) -> Result<String> {
        let name = self.execute(&["display-message", "-p", "#{session_name}"]).await?;
        Ok(name.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_executor_socket() {
        let executor = TmuxExecutor::new();
        assert!(executor.socket.is_none());

        let executor = TmuxExecutor::new().with_socket("treemux-test");
        assert_eq!(executor.socket.as_deref(), Some("treemux-test"));
    }

    #[test]
    fn test_empty_result_conditions() {
        assert!(is_no_server("no server running on /tmp/tmux-1000/default"));
        assert!(is_no_server("error connecting to /tmp/x (failed to connect to server)"));
        assert!(is_missing_session("can't find session: work"));
        assert!(!is_missing_session("unknown option: @tree_root_name"));
    }

    #[test]
    fn test_command_failed_carries_diagnostic() {
        let err = command_failed(&["kill-session", "-t", "x"], "  boom \n");
        assert_eq!(err.to_string(), "Tmux error: tmux kill-session -t x: boom");
    }
}
