// ABOUTME: Remote error types with SNAFU pattern.
// ABOUTME: Distinguishes local working-area failures from failed remote actions.

use std::path::PathBuf;
use std::time::Duration;

use snafu::Snafu;

use super::runner::RemoteAction;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RemoteError {
    #[snafu(display("failed to prepare working area {}: {source}", path.display()))]
    WorkingArea {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to launch {action} action: {source}"))]
    Spawn {
        action: RemoteAction,
        source: std::io::Error,
    },

    #[snafu(display("{action} action timed out after {timeout:?}"))]
    Timeout {
        action: RemoteAction,
        timeout: Duration,
    },

    #[snafu(display("{action} action exited with status {status} after {attempts} attempt(s)"))]
    ActionFailed {
        action: RemoteAction,
        status: i32,
        attempts: u32,
        output: String,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// Local working directory could not be created or removed.
    WorkingArea,
    /// The script could not be started or did not finish in time.
    Launch,
    /// The script ran and reported failure.
    ActionFailed,
}

impl RemoteError {
    pub fn kind(&self) -> RemoteErrorKind {
        match self {
            RemoteError::WorkingArea { .. } => RemoteErrorKind::WorkingArea,
            RemoteError::Spawn { .. } | RemoteError::Timeout { .. } => RemoteErrorKind::Launch,
            RemoteError::ActionFailed { .. } => RemoteErrorKind::ActionFailed,
        }
    }

    /// Action the error belongs to, if any.
    pub fn action(&self) -> Option<RemoteAction> {
        match self {
            RemoteError::WorkingArea { .. } => None,
            RemoteError::Spawn { action, .. }
            | RemoteError::Timeout { action, .. }
            | RemoteError::ActionFailed { action, .. } => Some(*action),
        }
    }

    /// Captured script output for a failed action.
    pub fn output(&self) -> Option<&str> {
        match self {
            RemoteError::ActionFailed { output, .. } => Some(output),
            _ => None,
        }
    }
}
