// ABOUTME: Error types for deployment flows.
// ABOUTME: Classifies failures into kinds that decide abort-vs-continue and exit codes.

use std::path::PathBuf;

use crate::release::ReleaseError;
use crate::remote::{RemoteError, RemoteErrorKind};
use crate::tagger::TagError;
use crate::types::Tier;
use crate::vcs::ResolveError;

/// Errors that can occur while running a deployment.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// Repository or revision could not be resolved.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Tag creation or replacement failed.
    #[error(transparent)]
    Tag(#[from] TagError),

    /// Deploy descriptor could not be written.
    #[error(transparent)]
    Release(#[from] ReleaseError),

    /// A remote action failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// The rollback action failed.
    #[error("rollback failed: {0}")]
    Rollback(#[source] RemoteError),

    /// The selected tier has no servers.
    #[error("no servers configured for the {0} tier")]
    NoServers(Tier),

    /// Rollback was requested but no previous descriptor exists.
    #[error("no deployment descriptor at {}; nothing to roll back", .0.display())]
    MissingDescriptor(PathBuf),
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    Resolution,
    Tagging,
    Release,
    Remote,
    Configuration,
    Rollback,
}

impl DeployError {
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::Resolve(_) => DeployErrorKind::Resolution,
            DeployError::Tag(_) => DeployErrorKind::Tagging,
            DeployError::Release(_) => DeployErrorKind::Release,
            DeployError::Remote(_) => DeployErrorKind::Remote,
            DeployError::NoServers(_) => DeployErrorKind::Configuration,
            DeployError::Rollback(_) | DeployError::MissingDescriptor(_) => {
                DeployErrorKind::Rollback
            }
        }
    }

    /// Whether this failure stops the whole run rather than one flow or suite.
    pub fn aborts_run(&self) -> bool {
        match self {
            DeployError::Resolve(_) | DeployError::NoServers(_) => true,
            DeployError::Remote(e) => e.kind() == RemoteErrorKind::WorkingArea,
            _ => false,
        }
    }
}
