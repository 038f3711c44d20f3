// ABOUTME: Validated domain types shared across the deployment pipeline.
// ABOUTME: Application names, repository revisions, and deployment tiers.

mod app_name;
mod revision;
mod tier;

pub use app_name::{AppName, AppNameError};
pub use revision::{ParseRevisionError, Revision};
pub use tier::Tier;
