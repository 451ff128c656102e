//! Session manager - ensures and attaches tree sessions
//!
//! Every attach is "create if absent, stamp, attach, record the time", so
//! running the same request twice only refreshes the last-attached time.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use super::naming::{child_session_name, root_name_from_dir, sanitize_session_name, shell_command};
use super::paths::{clean, current_dir, normalize_path};
use super::{AttachChildRequest, AttachRootRequest, SessionRegistry};
use crate::config::Config;
use crate::error::{Result, TreeError};
use crate::git::WorktreeManager;
use crate::tmux::{Multiplexer, SessionOptions, TmuxExecutor, ROOT_DIR_OPTION};

/// Coordinates the session tree on top of a multiplexer
pub struct SessionManager<M = TmuxExecutor> {
    /// Multiplexer holding sessions and their metadata
    mux: M,
    /// Application configuration
    config: Config,
    /// Directory used in place of the process working directory
    working_dir: Option<PathBuf>,
}

/// Treat empty flag values as absent
fn given(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl<M: Multiplexer> SessionManager<M> {
    /// Create a new session manager
    pub fn new(mux: M, config: Config) -> Self {
        Self {
            mux,
            config,
            working_dir: None,
        }
    }

    /// Resolve relative paths and repositories from `dir` instead of the
    /// process working directory
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn mux(&self) -> &M {
        &self.mux
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn separator(&self) -> &str {
        self.config.separator()
    }

    pub fn registry(&self) -> SessionRegistry<'_, M> {
        SessionRegistry::new(&self.mux, self.separator())
    }

    pub(crate) fn options(&self) -> SessionOptions<'_, M> {
        SessionOptions::new(&self.mux)
    }

    fn cwd(&self) -> Result<PathBuf> {
        match &self.working_dir {
            Some(dir) => Ok(dir.clone()),
            None => current_dir(),
        }
    }

    /// Ensure a root session exists and attach to it
    #[instrument(skip(self))]
    pub async fn attach_root(&self, req: &AttachRootRequest) -> Result<()> {
        let dir = given(&req.dir);
        let worktree = given(&req.worktree);
        if dir.is_some() && worktree.is_some() {
            return Err(TreeError::MutuallyExclusive("dir", "worktree").into());
        }
        let requested_name = match given(&req.name) {
            Some(name) => {
                let name = sanitize_session_name(name);
                if name.is_empty() {
                    return Err(TreeError::EmptyName("root").into());
                }
                Some(name)
            }
            None => None,
        };

        let cwd = self.cwd()?;
        let root_dir = match (dir, worktree) {
            (Some(dir), _) => normalize_path(dir, &cwd)?,
            (None, Some(branch)) => self.ensure_worktree(&cwd, branch).await?,
            (None, None) => normalize_path(&cwd.to_string_lossy(), &cwd)?,
        };
        if !root_dir.is_dir() {
            return Err(TreeError::DirectoryNotFound(root_dir).into());
        }

        let root_name = requested_name.unwrap_or_else(|| root_name_from_dir(&root_dir));
        if root_name.is_empty() {
            return Err(TreeError::EmptyName("root").into());
        }

        if !self.mux.has_session(&root_name).await? {
            let root_dir = root_dir.to_string_lossy();
            self.create_session(&root_name, &root_name, &root_dir, &[])
                .await?;
        }

        self.activate(&root_name, &root_name).await
    }

    /// Ensure a child session of a root exists and attach to it
    #[instrument(skip(self))]
    pub async fn attach_child(&self, req: &AttachChildRequest) -> Result<()> {
        let child_name = sanitize_session_name(&req.name);
        if child_name.is_empty() {
            return Err(TreeError::EmptyName("child").into());
        }

        let root_name = self.resolve_root(req.root.as_deref()).await?;
        if !self.mux.has_session(&root_name).await? {
            return Err(TreeError::RootNotFound(root_name).into());
        }
        let root_dir = self
            .options()
            .root_dir(&root_name)
            .await?
            .ok_or_else(|| TreeError::MissingMetadata {
                session: root_name.clone(),
                key: ROOT_DIR_OPTION,
            })?;

        let session = child_session_name(&root_name, self.separator(), &child_name);
        if !self.mux.has_session(&session).await? {
            let command = shell_command(req.command.as_deref());
            self.create_session(&session, &root_name, &root_dir, &command)
                .await?;
        }

        self.activate(&session, &root_name).await
    }

    /// Resolve the root a child operation targets
    ///
    /// An explicit root wins; otherwise the client must be inside tmux and
    /// the current session's root is used.
    pub async fn resolve_root(&self, root: Option<&str>) -> Result<String> {
        let root_name = sanitize_session_name(root.unwrap_or_default());
        if !root_name.is_empty() {
            return Ok(root_name);
        }
        if !self.mux.is_inside() {
            return Err(TreeError::RootRequiredOutsideTmux.into());
        }

        let current = self.mux.current_session_name().await?;
        let current = current.trim();
        if current.is_empty() {
            return Err(TreeError::CurrentSessionUnknown.into());
        }
        match self.options().root_name(current).await? {
            Some(root_name) => Ok(sanitize_session_name(&root_name)),
            None => Err(TreeError::NotATreeSession(current.to_string()).into()),
        }
    }

    /// Attach to `session` and record the attach on it and on its root
    pub async fn activate(&self, session: &str, root: &str) -> Result<()> {
        self.mux.attach_or_switch(session).await?;

        let options = self.options();
        options.touch(session).await?;
        if session != root {
            options.touch(root).await?;
        }
        Ok(())
    }

    async fn create_session(
        &self,
        session: &str,
        root_name: &str,
        root_dir: &str,
        command: &[String],
    ) -> Result<()> {
        self.mux
            .new_session(session, Path::new(root_dir), command)
            .await?;
        self.options().stamp(session, root_name, root_dir).await?;
        info!("Created session '{}' in {}", session, root_dir);
        Ok(())
    }

    /// Provision the worktree for `branch` and return its path
    async fn ensure_worktree(&self, cwd: &Path, branch: &str) -> Result<PathBuf> {
        let worktrees = WorktreeManager::discover(cwd, &self.config.worktrees_dir_name)?;
        let path = clean(&worktrees.default_path(branch)?);
        if worktrees.ensure_worktree(branch, &path).await? {
            debug!("Provisioned worktree {:?}", path);
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Component;

    use crate::git::run_git;
    use crate::testing::FakeMux;
    use crate::tmux::{LAST_ATTACHED_OPTION, ROOT_NAME_OPTION};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    /// A repository with one empty commit on `main`
    async fn git_repo(temp: &TempDir) -> PathBuf {
        let repo = temp.path().join("repo");
        std::fs::create_dir_all(repo.join("sub")).unwrap();
        let commit = [
            "-c",
            "user.name=Test User",
            "-c",
            "user.email=test@test.com",
            "-c",
            "commit.gpgsign=false",
            "commit",
            "-q",
            "--allow-empty",
            "-m",
            "init",
        ];
        run_git(&repo, &["init", "-q"]).await.unwrap();
        run_git(&repo, &["symbolic-ref", "HEAD", "refs/heads/main"])
            .await
            .unwrap();
        run_git(&repo, &commit).await.unwrap();
        repo
    }

    fn manager(mux: FakeMux, cwd: &Path) -> SessionManager<FakeMux> {
        SessionManager::new(mux, Config::default()).with_working_dir(cwd)
    }

    fn root_req(name: Option<&str>, dir: Option<&str>) -> AttachRootRequest {
        AttachRootRequest {
            name: name.map(String::from),
            dir: dir.map(String::from),
            worktree: None,
        }
    }

    #[tokio::test]
    async fn test_dir_and_worktree_are_exclusive() {
        let temp = TempDir::new().unwrap();
        let manager = manager(FakeMux::new(), temp.path());
        let req = AttachRootRequest {
            name: None,
            dir: Some("/tmp".into()),
            worktree: Some("feature".into()),
        };

        let err = manager.attach_root(&req).await.unwrap_err();
        assert_eq!(err.to_string(), "--dir and --worktree are mutually exclusive");
        assert_eq!(manager.mux().calls(), 0);
    }

    #[tokio::test]
    async fn test_attach_root_from_worktree() {
        let temp = TempDir::new().unwrap();
        let repo = git_repo(&temp).await;
        let manager = manager(FakeMux::new(), &repo.join("sub"));
        let req = AttachRootRequest {
            name: None,
            dir: None,
            worktree: Some("feat/x".into()),
        };

        manager.attach_root(&req).await.unwrap();

        let mux = manager.mux();
        assert_eq!(mux.created(), vec!["x"]);
        let dir = mux.dir_of("x").unwrap();
        assert!(dir.join(".git").exists());
        assert_eq!(
            dir.canonicalize().unwrap(),
            repo.join(".worktrees/feat/x").canonicalize().unwrap()
        );
        let stored = mux.option("x", ROOT_DIR_OPTION).unwrap();
        assert!(
            Path::new(&stored)
                .components()
                .all(|c| matches!(c, Component::RootDir | Component::Normal(_))),
            "{stored}"
        );

        manager.attach_root(&req).await.unwrap();
        assert_eq!(mux.created(), vec!["x"]);
        assert_eq!(mux.attached(), vec!["x", "x"]);
    }

    #[tokio::test]
    async fn test_attach_root_creates_and_stamps() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().to_string_lossy().to_string();
        let manager = manager(FakeMux::new(), temp.path());

        manager.attach_root(&root_req(Some("work"), Some(&dir))).await.unwrap();

        let mux = manager.mux();
        assert_eq!(mux.created(), vec!["work"]);
        assert_eq!(mux.attached(), vec!["work"]);
        assert_eq!(mux.option("work", ROOT_NAME_OPTION).as_deref(), Some("work"));
        assert_eq!(mux.option("work", ROOT_DIR_OPTION), Some(dir));
        assert!(mux.option("work", LAST_ATTACHED_OPTION).is_some());
    }

    #[tokio::test]
    async fn test_attach_root_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().to_string_lossy().to_string();
        let manager = manager(FakeMux::new(), temp.path());
        let req = root_req(Some("work"), Some(&dir));

        manager.attach_root(&req).await.unwrap();
        manager
            .mux()
            .set_raw_option("work", LAST_ATTACHED_OPTION, "1");
        manager.attach_root(&req).await.unwrap();

        let mux = manager.mux();
        assert_eq!(mux.created(), vec!["work"]);
        assert_eq!(mux.attached(), vec!["work", "work"]);
        assert_ne!(mux.option("work", LAST_ATTACHED_OPTION).as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_attach_root_derives_name_from_cwd() {
        let temp = TempDir::new().unwrap();
        let project = temp.path().join("my.project");
        std::fs::create_dir(&project).unwrap();
        let manager = manager(FakeMux::new(), &project);

        manager.attach_root(&AttachRootRequest::default()).await.unwrap();

        let mux = manager.mux();
        assert_eq!(mux.created(), vec!["my_project"]);
        assert_eq!(mux.dir_of("my_project"), Some(project.clone()));
        assert_eq!(
            mux.option("my_project", ROOT_DIR_OPTION),
            Some(project.to_string_lossy().to_string())
        );
    }

    #[tokio::test]
    async fn test_attach_root_resolves_relative_dir() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("app")).unwrap();
        let manager = manager(FakeMux::new(), temp.path());

        manager.attach_root(&root_req(None, Some("./app/../app"))).await.unwrap();

        assert_eq!(manager.mux().dir_of("app"), Some(temp.path().join("app")));
    }

    #[tokio::test]
    async fn test_attach_root_missing_dir() {
        let temp = TempDir::new().unwrap();
        let manager = manager(FakeMux::new(), temp.path());

        let err = manager
            .attach_root(&root_req(Some("work"), Some("does-not-exist")))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("root directory does not exist"));
        assert!(manager.mux().created().is_empty());
    }

    #[tokio::test]
    async fn test_attach_root_rejects_unusable_name() {
        let temp = TempDir::new().unwrap();
        let manager = manager(FakeMux::new(), temp.path());

        let err = manager
            .attach_root(&root_req(Some("..."), None))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "root session name is empty");
        assert_eq!(manager.mux().calls(), 0);
    }

    #[tokio::test]
    async fn test_attach_child_composes_name() {
        let temp = TempDir::new().unwrap();
        let mux = FakeMux::new().with_root("work", "/src/work");
        let manager = manager(mux, temp.path());

        let req = AttachChildRequest {
            root: Some("work".into()),
            name: "my shell".into(),
            command: Some("htop".into()),
        };
        manager.attach_child(&req).await.unwrap();

        let session = "work 🌿 my_shell";
        let mux = manager.mux();
        assert_eq!(mux.created(), vec![session]);
        assert_eq!(mux.dir_of(session), Some(PathBuf::from("/src/work")));
        assert_eq!(mux.command_of(session), vec!["sh", "-lc", "htop"]);
        assert_eq!(mux.option(session, ROOT_NAME_OPTION).as_deref(), Some("work"));
        assert_eq!(mux.option(session, ROOT_DIR_OPTION).as_deref(), Some("/src/work"));
        assert!(mux.option(session, LAST_ATTACHED_OPTION).is_some());
        assert!(mux.option("work", LAST_ATTACHED_OPTION).is_some());
    }

    #[tokio::test]
    async fn test_attach_child_uses_current_root() {
        let temp = TempDir::new().unwrap();
        let mux = FakeMux::new()
            .with_root("work", "/src/work")
            .with_child("work", "work 🌿 nvim", "/src/work")
            .inside("work 🌿 nvim");
        let manager = manager(mux, temp.path());

        let req = AttachChildRequest {
            name: "logs".into(),
            ..AttachChildRequest::default()
        };
        manager.attach_child(&req).await.unwrap();

        assert_eq!(manager.mux().attached(), vec!["work 🌿 logs"]);
        assert!(manager.mux().command_of("work 🌿 logs").is_empty());
    }

    #[tokio::test]
    async fn test_attach_child_requires_root_outside_tmux() {
        let temp = TempDir::new().unwrap();
        let manager = manager(FakeMux::new(), temp.path());

        let req = AttachChildRequest {
            name: "logs".into(),
            ..AttachChildRequest::default()
        };
        let err = manager.attach_child(&req).await.unwrap_err();
        assert_eq!(err.to_string(), "--root is required outside tmux");
    }

    #[tokio::test]
    async fn test_attach_child_errors() {
        let temp = TempDir::new().unwrap();
        let mux = FakeMux::new().with_session("foreign", "/tmp");
        let manager = manager(mux, temp.path());

        let missing = AttachChildRequest {
            root: Some("nope".into()),
            name: "x".into(),
            command: None,
        };
        let err = manager.attach_child(&missing).await.unwrap_err();
        assert_eq!(err.to_string(), "root session does not exist: nope");

        let foreign = AttachChildRequest {
            root: Some("foreign".into()),
            ..missing.clone()
        };
        let err = manager.attach_child(&foreign).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing root metadata (@tree_root_dir) for session: foreign"
        );

        let blank = AttachChildRequest {
            name: "   ".into(),
            ..missing
        };
        let err = manager.attach_child(&blank).await.unwrap_err();
        assert_eq!(err.to_string(), "child session name is empty");
        assert!(manager.mux().created().is_empty());
    }
}
