// ABOUTME: Version-control operations needed by the deployment pipeline.
// ABOUTME: Query calls report status in CommandOutput; only launch failures are errors.

use crate::process::CommandOutput;
use crate::types::Revision;
use async_trait::async_trait;
use std::time::Duration;

/// Version-control queries and mutations, addressed by repository URL.
///
/// A non-zero status in the returned [`CommandOutput`] is not an error at this
/// layer; callers decide whether it is fatal.
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// List the entries directly under `url`.
    async fn list(&self, url: &str) -> Result<CommandOutput, VcsError>;

    /// Metadata for `url`, including a `Last Changed Rev:` line.
    async fn info(&self, url: &str) -> Result<CommandOutput, VcsError>;

    /// Commit messages for `url` between two revisions, inclusive.
    async fn log(&self, url: &str, from: Revision, to: Revision)
    -> Result<CommandOutput, VcsError>;

    /// Differences between two URLs, optionally as a per-path summary.
    async fn diff(&self, old: &str, new: &str, summarize: bool)
    -> Result<CommandOutput, VcsError>;

    /// Server-side copy committed with `message`.
    async fn copy(&self, src: &str, dst: &str, message: &str) -> Result<CommandOutput, VcsError>;

    /// Server-side delete committed with `message`.
    async fn remove(&self, url: &str, message: &str) -> Result<CommandOutput, VcsError>;
}

#[derive(Debug, thiserror::Error)]
pub enum VcsError {
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("`{command}` timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },
}
