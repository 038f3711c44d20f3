// ABOUTME: Configuration types and parsing for promoter.yml.
// ABOUTME: Handles YAML parsing, file discovery, and per-tier server lookup.

mod deserialize;
mod notify;
mod remote;
mod server;

pub use notify::NotifyConfig;
pub use remote::RemoteConfig;
pub use server::ServersConfig;

use crate::error::{Error, Result};
use crate::types::AppName;
use deserialize::deserialize_repositories;
use nonempty::NonEmpty;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "promoter.yml";
pub const CONFIG_FILENAME_ALT: &str = "promoter.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".promoter/config.yml";

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "PROMOTER_CONFIG";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Candidate repository roots, probed in order.
    #[serde(deserialize_with = "deserialize_repositories")]
    pub repositories: NonEmpty<String>,

    pub servers: ServersConfig,

    #[serde(default)]
    pub workspace: WorkspaceConfig,

    #[serde(default)]
    pub vcs: VcsConfig,

    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub notify: Option<NotifyConfig>,

    /// Directory the configuration was loaded from. Relative paths resolve here.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceConfig {
    #[serde(default = "default_tmp_dir")]
    pub tmp_dir: PathBuf,

    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

fn default_tmp_dir() -> PathBuf {
    PathBuf::from("/tmp")
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("/var/log")
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        WorkspaceConfig {
            tmp_dir: default_tmp_dir(),
            log_dir: default_log_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VcsConfig {
    #[serde(default = "default_vcs_binary")]
    pub binary: String,

    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,
}

fn default_vcs_binary() -> String {
    "svn".to_string()
}

impl Default for VcsConfig {
    fn default() -> Self {
        VcsConfig {
            binary: default_vcs_binary(),
            timeout: None,
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that serde alone cannot express.
    fn validate(&self) -> Result<()> {
        if self.remote.script.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("remote.script cannot be empty".into()));
        }
        if self.remote.deploy_root.trim().is_empty() {
            return Err(Error::InvalidConfig("remote.deploy_root cannot be empty".into()));
        }
        if let Some(notify) = &self.notify {
            if notify.from.trim().is_empty() || notify.to.trim().is_empty() {
                return Err(Error::InvalidConfig(
                    "notify.from and notify.to are required".into(),
                ));
            }
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;
        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(config)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Load from an explicit path, then `$PROMOTER_CONFIG`, then discovery in `dir`.
    pub fn locate(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => Self::load(Path::new(&path)),
            _ => Self::discover(dir),
        }
    }

    /// Working directory owned by one application's deploys.
    pub fn working_dir(&self, app: &AppName) -> PathBuf {
        self.workspace
            .tmp_dir
            .join("deployment")
            .join(app.as_str())
    }

    /// Directory for per-revision release artifacts.
    pub fn log_dir(&self) -> PathBuf {
        self.workspace.log_dir.join("deployment")
    }

    /// Path of the remote-execution script, resolved against the config directory.
    pub fn remote_script(&self) -> PathBuf {
        let path = self.base_dir.join(&self.remote.script);
        std::path::absolute(&path).unwrap_or(path)
    }
}
