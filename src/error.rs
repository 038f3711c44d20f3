// ABOUTME: Application-wide error types for promoter.
// ABOUTME: Uses thiserror and maps every failure to a process exit code.

use std::path::PathBuf;
use thiserror::Error;

use crate::deploy::{DeployError, DeployErrorKind};
use crate::types::AppNameError;

/// Usage, configuration, or I/O error.
pub const EXIT_FAILURE: i32 = 1;
/// Repository not found or revision unparsable.
pub const EXIT_RESOLUTION: i32 = 2;
/// Tagging, production, or a test suite failed.
pub const EXIT_PARTIAL: i32 = 3;
/// Rollback did not complete.
pub const EXIT_ROLLBACK: i32 = 4;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid application name: {0}")]
    InvalidApp(#[from] AppNameError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Deploy(#[from] DeployError),
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Deploy(e) => match e.kind() {
                DeployErrorKind::Resolution => EXIT_RESOLUTION,
                DeployErrorKind::Configuration => EXIT_FAILURE,
                DeployErrorKind::Rollback => EXIT_ROLLBACK,
                DeployErrorKind::Tagging | DeployErrorKind::Release | DeployErrorKind::Remote => {
                    EXIT_PARTIAL
                }
            },
            _ => EXIT_FAILURE,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
