// ABOUTME: ScriptRunner backed by a local wrapper script around Capistrano.
// ABOUTME: Invokes `<script> <action> <working_dir>` from the script's directory.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;

use super::error::RemoteError;
use super::runner::{RemoteAction, ScriptRunner};
use crate::config::Config;
use crate::process::{self, CommandOutput, RunError};

#[derive(Debug, Clone)]
pub struct CapistranoRunner {
    script: PathBuf,
    timeout: Option<Duration>,
}

impl CapistranoRunner {
    pub fn new(script: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
            timeout: None,
        }
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.remote_script()).timeout(config.remote.timeout)
    }

    pub fn script(&self) -> &Path {
        &self.script
    }
}

#[async_trait]
impl ScriptRunner for CapistranoRunner {
    async fn run(
        &self,
        action: RemoteAction,
        working_dir: &Path,
    ) -> Result<CommandOutput, RemoteError> {
        tracing::debug!(
            "Running {} {} {}",
            self.script.display(),
            action,
            working_dir.display()
        );

        let args = [OsStr::new(action.as_str()), working_dir.as_os_str()];
        let cwd = self.script.parent().filter(|dir| !dir.as_os_str().is_empty());
        process::run(&self.script, args, cwd, self.timeout)
            .await
            .map_err(|e| match e {
                RunError::Spawn(source) => RemoteError::Spawn { action, source },
                RunError::TimedOut(timeout) => RemoteError::Timeout { action, timeout },
            })
    }
}
