// ABOUTME: Deployment orchestration: controller, options, and the release type state.
// ABOUTME: Exports the controller, its outcome types, and the step state markers.

mod controller;
mod error;
mod options;
mod release;
mod report;
mod state;

pub use controller::DeploymentController;
pub use error::{DeployError, DeployErrorKind};
pub use options::Options;
pub use release::Release;
pub use report::{Outcome, RunReport, StepResult, SuiteReport};
pub use state::{Cleaned, DeployState, HostsInitialized, Planned, Prepared, Released};
