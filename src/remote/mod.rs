// ABOUTME: Remote lifecycle: working area, host setup, cleanup, update, rollback.
// ABOUTME: Drives an external script runner through a fixed set of actions.

mod capistrano;
mod error;
mod orchestrator;
mod runner;

pub use capistrano::CapistranoRunner;
pub use error::{RemoteError, RemoteErrorKind};
pub use orchestrator::{RemoteOrchestrator, RetryPolicy};
pub use runner::{RemoteAction, ScriptRunner};
