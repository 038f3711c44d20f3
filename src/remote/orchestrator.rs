// ABOUTME: Sequences remote actions for one application's working directory.
// ABOUTME: Applies the retry policy and turns non-zero exits into errors.

use std::path::{Path, PathBuf};
use std::time::Duration;

use snafu::ResultExt;

use super::error::{ActionFailedSnafu, RemoteError, WorkingAreaSnafu};
use super::runner::{RemoteAction, ScriptRunner};
use crate::config::RemoteConfig;
use crate::process::CommandOutput;
use crate::release::CONFIG_DIR;

/// How often a failed action is retried and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first failure.
    pub retries: u32,
    /// Delay before the first retry; doubled for each later one.
    pub backoff: Duration,
}

impl RetryPolicy {
    pub const NONE: RetryPolicy = RetryPolicy {
        retries: 0,
        backoff: Duration::ZERO,
    };

    pub fn from_config(config: &RemoteConfig) -> Self {
        RetryPolicy {
            retries: config.retries,
            backoff: config.retry_backoff,
        }
    }

    /// Delay before retry number `retry` (1-based).
    pub fn delay(&self, retry: u32) -> Duration {
        self.backoff
            .saturating_mul(2u32.saturating_pow(retry.saturating_sub(1)))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::NONE
    }
}

/// Remote lifecycle for one application.
///
/// The working directory is owned exclusively by this orchestrator and is
/// rebuilt from scratch by [`prepare_working_area`](Self::prepare_working_area).
pub struct RemoteOrchestrator<'a, R> {
    runner: &'a R,
    working_dir: PathBuf,
    retry: RetryPolicy,
}

impl<'a, R: ScriptRunner> RemoteOrchestrator<'a, R> {
    pub fn new(runner: &'a R, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            working_dir: working_dir.into(),
            retry: RetryPolicy::NONE,
        }
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Wipe and recreate the working directory, then run `init`.
    pub async fn prepare_working_area(&self) -> Result<(), RemoteError> {
        let dir = &self.working_dir;
        tracing::info!("Preparing working area {}", dir.display());

        if dir.exists() {
            tracing::info!("Removing previous working area");
            std::fs::remove_dir_all(dir).context(WorkingAreaSnafu { path: dir.clone() })?;
        }

        self.create_working_area()?;
        self.invoke(RemoteAction::Init).await?;
        Ok(())
    }

    /// Create the working directory and its config directory if missing.
    ///
    /// Existing contents are kept and no action is run.
    pub fn ensure_working_area(&self) -> Result<(), RemoteError> {
        if self.working_dir.join(CONFIG_DIR).is_dir() {
            return Ok(());
        }
        self.create_working_area()
    }

    fn create_working_area(&self) -> Result<(), RemoteError> {
        let config_dir = self.working_dir.join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir).context(WorkingAreaSnafu { path: config_dir })
    }

    pub async fn initialize_remote_hosts(&self) -> Result<(), RemoteError> {
        tracing::info!("Initializing remote folders");
        self.invoke(RemoteAction::Setup).await?;
        Ok(())
    }

    pub async fn cleanup_old_releases(&self) -> Result<(), RemoteError> {
        tracing::info!("Cleaning up old releases");
        self.invoke(RemoteAction::Cleanup).await?;
        Ok(())
    }

    pub async fn push_update(&self) -> Result<(), RemoteError> {
        tracing::info!("Updating remote code and symlinks");
        self.invoke(RemoteAction::Update).await?;
        Ok(())
    }

    /// Switch the servers back to their previous release.
    pub async fn rollback(&self) -> Result<(), RemoteError> {
        tracing::info!("Rolling back to previous release");
        self.invoke(RemoteAction::Rollback).await?;
        Ok(())
    }

    /// Run `action`, retrying non-zero exits per the retry policy.
    ///
    /// Launch failures and timeouts are not retried.
    async fn invoke(&self, action: RemoteAction) -> Result<CommandOutput, RemoteError> {
        let mut attempts = 0;

        loop {
            attempts += 1;
            let output = self.runner.run(action, &self.working_dir).await?;
            tracing::debug!("Results from {}:\n{}", action, output.combined());

            if output.success() {
                return Ok(output);
            }

            if attempts > self.retry.retries {
                tracing::error!(
                    "{} action failed with status {}:\n{}",
                    action,
                    output.status,
                    output.combined()
                );
                return ActionFailedSnafu {
                    action,
                    status: output.status,
                    attempts,
                    output: output.combined(),
                }
                .fail();
            }

            let delay = self.retry.delay(attempts);
            tracing::warn!(
                "{} action failed with status {} (attempt {}), retrying in {:?}",
                action,
                output.status,
                attempts,
                delay
            );
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_per_retry() {
        let policy = RetryPolicy {
            retries: 3,
            backoff: Duration::from_secs(2),
        };
        assert_eq!(policy.delay(1), Duration::from_secs(2));
        assert_eq!(policy.delay(2), Duration::from_secs(4));
        assert_eq!(policy.delay(3), Duration::from_secs(8));
    }

    #[test]
    fn no_retry_policy_by_default() {
        assert_eq!(RetryPolicy::default(), RetryPolicy::NONE);
    }
}
