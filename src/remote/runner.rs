// ABOUTME: Remote-execution collaborator trait.
// ABOUTME: Runs one named action against a working directory holding a deploy script.

use std::fmt;
use std::path::Path;

use async_trait::async_trait;

use super::error::RemoteError;
use crate::process::CommandOutput;

/// Actions understood by the remote-execution script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteAction {
    /// Initialize the local working area.
    Init,
    /// Create release directories on the remote hosts.
    Setup,
    /// Remove old releases from the remote hosts.
    Cleanup,
    /// Export the source and switch the current-release symlink.
    Update,
    /// Switch back to the previous release.
    Rollback,
}

impl RemoteAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteAction::Init => "init",
            RemoteAction::Setup => "setup",
            RemoteAction::Cleanup => "cleanup",
            RemoteAction::Update => "update",
            RemoteAction::Rollback => "rollback",
        }
    }
}

impl fmt::Display for RemoteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runs `action working_dir` and reports the exit status and output.
///
/// A non-zero status is returned as output, not as an error.
#[async_trait]
pub trait ScriptRunner: Send + Sync {
    async fn run(
        &self,
        action: RemoteAction,
        working_dir: &Path,
    ) -> Result<CommandOutput, RemoteError>;
}
