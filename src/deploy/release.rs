// ABOUTME: Production release parameterized by its step state.
// ABOUTME: Each transition consumes self, so steps run once and only in order.

use crate::release::DeployDescriptor;
use crate::remote::{RemoteOrchestrator, ScriptRunner};

use super::error::DeployError;
use super::state::{Cleaned, HostsInitialized, Planned, Prepared, Released};

/// A production release in progress.
///
/// The working area is rebuilt by [`prepare`](Release::prepare), so the
/// descriptor is written only after the runner has been initialized.
#[derive(Debug)]
pub struct Release<S> {
    descriptor: DeployDescriptor,
    _state: S,
}

impl<S> Release<S> {
    fn transition<T>(self, state: T) -> Release<T> {
        Release {
            descriptor: self.descriptor,
            _state: state,
        }
    }
}

impl Release<Planned> {
    pub fn new(descriptor: DeployDescriptor) -> Self {
        Release {
            descriptor,
            _state: Planned,
        }
    }

    /// Rebuild the working area, run `init`, and write the descriptor.
    pub async fn prepare<R: ScriptRunner>(
        self,
        remote: &RemoteOrchestrator<'_, R>,
    ) -> Result<Release<Prepared>, DeployError> {
        remote.prepare_working_area().await?;
        self.descriptor.materialize(remote.working_dir())?;
        Ok(self.transition(Prepared))
    }
}

impl Release<Prepared> {
    pub async fn initialize_hosts<R: ScriptRunner>(
        self,
        remote: &RemoteOrchestrator<'_, R>,
    ) -> Result<Release<HostsInitialized>, DeployError> {
        tracing::info!("Initializing hosts {:?}", self.descriptor.servers);
        remote.initialize_remote_hosts().await?;
        Ok(self.transition(HostsInitialized))
    }
}

impl Release<HostsInitialized> {
    pub async fn cleanup<R: ScriptRunner>(
        self,
        remote: &RemoteOrchestrator<'_, R>,
    ) -> Result<Release<Cleaned>, DeployError> {
        remote.cleanup_old_releases().await?;
        Ok(self.transition(Cleaned))
    }
}

impl Release<Cleaned> {
    pub async fn push_update<R: ScriptRunner>(
        self,
        remote: &RemoteOrchestrator<'_, R>,
    ) -> Result<Release<Released>, DeployError> {
        remote.push_update().await?;
        Ok(self.transition(Released))
    }
}

impl Release<Released> {
    /// Consume the release, returning what was deployed.
    pub fn finish(self) -> DeployDescriptor {
        tracing::info!(
            "Released {} from {}",
            self.descriptor.app,
            self.descriptor.source
        );
        self.descriptor
    }
}
