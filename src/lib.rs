// ABOUTME: Library root for promoter - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod notify;
pub mod output;
pub mod partition;
pub mod process;
pub mod release;
pub mod remote;
pub mod tagger;
pub mod types;
pub mod vcs;
