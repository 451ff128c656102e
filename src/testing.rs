//! In-memory multiplexer used by unit tests

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Result, TmuxError};
use crate::tmux::{Multiplexer, LAST_ATTACHED_OPTION, ROOT_DIR_OPTION, ROOT_NAME_OPTION};

#[derive(Debug, Default)]
struct FakeSession {
    dir: PathBuf,
    command: Vec<String>,
    options: HashMap<String, String>,
}

#[derive(Debug, Default)]
struct FakeState {
    sessions: BTreeMap<String, FakeSession>,
    current: Option<String>,
    created: Vec<String>,
    attached: Vec<String>,
    calls: usize,
}

/// Multiplexer double keeping sessions and options in memory
#[derive(Debug, Default)]
pub struct FakeMux {
    state: Mutex<FakeState>,
}

impl FakeMux {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session without any tree metadata
    pub fn with_session(self, name: &str, dir: &str) -> Self {
        self.state.lock().unwrap().sessions.insert(
            name.to_string(),
            FakeSession {
                dir: PathBuf::from(dir),
                ..FakeSession::default()
            },
        );
        self
    }

    pub fn with_root(self, name: &str, dir: &str) -> Self {
        self.with_child(name, name, dir)
    }

    /// A session tagged as belonging to `root`
    pub fn with_child(self, root: &str, name: &str, dir: &str) -> Self {
        let this = self.with_session(name, dir);
        this.set_raw_option(name, ROOT_NAME_OPTION, root);
        this.set_raw_option(name, ROOT_DIR_OPTION, dir);
        this
    }

    pub fn with_last_attached(self, name: &str, nanos: i64) -> Self {
        self.set_raw_option(name, LAST_ATTACHED_OPTION, &nanos.to_string());
        self
    }

    /// Pretend the client is attached to `session`
    pub fn inside(self, session: &str) -> Self {
        self.state.lock().unwrap().current = Some(session.to_string());
        self
    }

    pub fn set_raw_option(&self, session: &str, key: &str, value: &str) {
        let mut state = self.state.lock().unwrap();
        let session = state.sessions.get_mut(session).expect("unknown fake session");
        session.options.insert(key.to_string(), value.to_string());
    }

    pub fn option(&self, session: &str, key: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        state.sessions.get(session)?.options.get(key).cloned()
    }

    pub fn dir_of(&self, session: &str) -> Option<PathBuf> {
        let state = self.state.lock().unwrap();
        state.sessions.get(session).map(|s| s.dir.clone())
    }

    pub fn command_of(&self, session: &str) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state
            .sessions
            .get(session)
            .map(|s| s.command.clone())
            .unwrap_or_default()
    }

    /// Sessions created through `new_session`, in order
    pub fn created(&self) -> Vec<String> {
        self.state.lock().unwrap().created.clone()
    }

    /// Sessions attached or switched to, in order
    pub fn attached(&self) -> Vec<String> {
        self.state.lock().unwrap().attached.clone()
    }

    /// Number of multiplexer operations performed
    pub fn calls(&self) -> usize {
        self.state.lock().unwrap().calls
    }

    fn count(&self) -> std::sync::MutexGuard<'_, FakeState> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        state
    }
}

#[async_trait]
impl Multiplexer for FakeMux {
    async fn has_session(&self, name: &str) -> Result<bool> {
        Ok(self.count().sessions.contains_key(name))
    }

    async fn list_sessions(&self) -> Result<Vec<String>> {
        Ok(self.count().sessions.keys().cloned().collect())
    }

    async fn show_option(&self, session: &str, key: &str) -> Result<String> {
        let state = self.count();
        let session = state
            .sessions
            .get(session)
            .ok_or_else(|| TmuxError::SessionNotFound(session.to_string()))?;
        Ok(session.options.get(key).cloned().unwrap_or_default())
    }

    async fn set_option(&self, session: &str, key: &str, value: &str) -> Result<()> {
        let mut state = self.count();
        let session = state
            .sessions
            .get_mut(session)
            .ok_or_else(|| TmuxError::SessionNotFound(session.to_string()))?;
        session.options.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn new_session(&self, name: &str, dir: &Path, command: &[String]) -> Result<()> {
        let mut state = self.count();
        if state.sessions.contains_key(name) {
            return Err(TmuxError::CommandFailed {
                command: format!("tmux new-session -d -s {name}"),
                stderr: format!("duplicate session: {name}"),
            }
            .into());
        }
        state.sessions.insert(
            name.to_string(),
            FakeSession {
                dir: dir.to_path_buf(),
                command: command.to_vec(),
                options: HashMap::new(),
            },
        );
        state.created.push(name.to_string());
        Ok(())
    }

    async fn attach_or_switch(&self, name: &str) -> Result<()> {
        let mut state = self.count();
        if !state.sessions.contains_key(name) {
            return Err(TmuxError::SessionNotFound(name.to_string()).into());
        }
        state.attached.push(name.to_string());
        Ok(())
    }

    fn is_inside(&self) -> bool {
        self.state.lock().unwrap().current.is_some()
    }

    async fn current_session_name(&self) -> Result<String> {
        self.count()
            .current
            .clone()
            .ok_or_else(|| TmuxError::ServerNotRunning.into())
    }
}
