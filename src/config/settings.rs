//! User configuration settings
//!
//! Layered configuration: defaults → config file → environment

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Error, Result};

/// Separator placed between a root name and a child name
pub const DEFAULT_SEPARATOR: &str = " 🌿 ";

/// Environment variable that overrides the separator
pub const SEPARATOR_ENV: &str = "TMUX_TREE_SEPARATOR";

/// Prefix of the environment variables mapped onto config fields
const ENV_PREFIX: &str = "TREEMUX_";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Token joining root and child names (empty means the default)
    pub separator: String,

    /// Sort mode used when `--sort-by` is not given
    pub default_sort: String,

    /// Directory under the repository root that holds worktrees
    pub worktrees_dir_name: String,

    /// Run the picker on the alternate screen
    pub fullscreen: bool,

    /// Enable debug logging
    pub debug: bool,

    /// Log file used while the picker owns the terminal
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            default_sort: String::new(),
            worktrees_dir_name: ".worktrees".to_string(),
            fullscreen: false,
            debug: false,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from all sources
    ///
    /// `path` overrides the default config file location.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::config_file_path()?,
        };

        Self::figment(&config_path)
            .extract()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()).into())
    }

    fn figment(config_path: &Path) -> Figment {
        let mut figment = Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(Config::default()))
            // Layer config file if it exists
            .merge(Toml::file(config_path))
            // Layer environment variables (TREEMUX_DEFAULT_SORT, etc.)
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["separator"]));

        // Env trims values, but separators are spaced tokens, so they are
        // read verbatim. TMUX_TREE_SEPARATOR predates the config file and wins.
        let prefixed = format!("{ENV_PREFIX}SEPARATOR");
        for var in [prefixed.as_str(), SEPARATOR_ENV] {
            if let Some(value) = std::env::var(var).ok().filter(|v| !v.is_empty()) {
                figment = figment.merge(Serialized::default("separator", value));
            }
        }
        figment
    }

    /// Separator with the empty value mapped to the default
    pub fn separator(&self) -> &str {
        if self.separator.is_empty() {
            DEFAULT_SEPARATOR
        } else {
            &self.separator
        }
    }

    /// Log file path, defaulting to the system temp directory
    pub fn log_file(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("treemux.log"))
    }

    /// Get the configuration file path
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Save current configuration to file
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_file_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|_e| {
                Error::Config(ConfigError::DirectoryCreationFailed(parent.to_path_buf()))
            })?;
        }

        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        std::fs::write(&config_path, toml)
            .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        Ok(config_path)
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("com", "treemux", "treemux")
            .ok_or_else(|| Error::Config(ConfigError::HomeDirUnknown))
    }
}
