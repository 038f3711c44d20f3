// ABOUTME: Release state marker types and the controller's run state.
// ABOUTME: Zero-sized markers enforce the production step order at compile time.

use std::fmt;

/// Descriptor built, nothing touched yet.
/// Available actions: `prepare()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Planned;

/// Working area rebuilt, runner initialized, descriptor written.
/// Available actions: `initialize_hosts()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Prepared;

/// Remote folders exist on every target host.
/// Available actions: `cleanup()`
#[derive(Debug, Clone, Copy, Default)]
pub struct HostsInitialized;

/// Old releases removed from the hosts.
/// Available actions: `push_update()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Cleaned;

/// New code pushed and symlinks switched.
/// Available actions: `finish()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Released;

/// Where a [`DeploymentController`](super::DeploymentController) is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeployState {
    #[default]
    Idle,
    Tagging,
    TestPartitioning,
    Deploying,
    /// Terminal: rollback ran and nothing else may execute.
    RolledBack,
    Done,
}

impl DeployState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DeployState::RolledBack | DeployState::Done)
    }
}

impl fmt::Display for DeployState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeployState::Idle => "idle",
            DeployState::Tagging => "tagging",
            DeployState::TestPartitioning => "test-partitioning",
            DeployState::Deploying => "deploying",
            DeployState::RolledBack => "rolled-back",
            DeployState::Done => "done",
        };
        f.write_str(name)
    }
}
