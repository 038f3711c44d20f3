// ABOUTME: Subversion command-line implementation of VersionControl.
// ABOUTME: Shells out to the configured svn binary in non-interactive mode.

use super::client::{VcsError, VersionControl};
use crate::config::VcsConfig;
use crate::process::{self, CommandOutput, RunError};
use crate::types::Revision;
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SvnClient {
    binary: String,
    timeout: Option<Duration>,
}

impl SvnClient {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            timeout: None,
        }
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_config(config: &VcsConfig) -> Self {
        Self::new(&config.binary).timeout(config.timeout)
    }

    async fn svn(&self, args: Vec<String>) -> Result<CommandOutput, VcsError> {
        let command = format!("{} {}", self.binary, args.join(" "));
        tracing::debug!("Running: {}", command);

        let output = process::run(
            &self.binary,
            std::iter::once("--non-interactive".to_string()).chain(args),
            None,
            self.timeout,
        )
        .await
        .map_err(|e| match e {
            RunError::Spawn(source) => VcsError::Spawn {
                command: command.clone(),
                source,
            },
            RunError::TimedOut(timeout) => VcsError::Timeout {
                command: command.clone(),
                timeout,
            },
        })?;

        tracing::debug!("`{}` exited with {}", command, output.status);
        Ok(output)
    }
}

#[async_trait]
impl VersionControl for SvnClient {
    async fn list(&self, url: &str) -> Result<CommandOutput, VcsError> {
        self.svn(vec!["list".into(), url.into()]).await
    }

    async fn info(&self, url: &str) -> Result<CommandOutput, VcsError> {
        self.svn(vec!["info".into(), url.into()]).await
    }

    async fn log(
        &self,
        url: &str,
        from: Revision,
        to: Revision,
    ) -> Result<CommandOutput, VcsError> {
        self.svn(vec!["log".into(), format!("-r{from}:{to}"), url.into()])
            .await
    }

    async fn diff(
        &self,
        old: &str,
        new: &str,
        summarize: bool,
    ) -> Result<CommandOutput, VcsError> {
        let mut args = vec!["diff".to_string()];
        if summarize {
            args.push("--summarize".into());
        }
        args.push(old.into());
        args.push(new.into());
        self.svn(args).await
    }

    async fn copy(&self, src: &str, dst: &str, message: &str) -> Result<CommandOutput, VcsError> {
        self.svn(vec![
            "copy".into(),
            src.into(),
            dst.into(),
            "-m".into(),
            message.into(),
        ])
        .await
    }

    async fn remove(&self, url: &str, message: &str) -> Result<CommandOutput, VcsError> {
        self.svn(vec![
            "delete".into(),
            url.into(),
            "-m".into(),
            message.into(),
        ])
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_reports_spawn_error() {
        let client = SvnClient::new("promoter-test-no-such-svn");
        let err = client.list("file:///nowhere").await.unwrap_err();
        assert!(matches!(err, VcsError::Spawn { .. }));
        assert!(err.to_string().contains("promoter-test-no-such-svn list file:///nowhere"));
    }
}
