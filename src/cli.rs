// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: One positional application name plus flags selecting the flows.

use std::path::PathBuf;

use clap::Parser;
use promoter::deploy::Options;

#[derive(Parser)]
#[command(name = "promoter")]
#[command(about = "Promote an application from trunk to its production and test servers")]
#[command(version)]
pub struct Cli {
    /// Application to deploy
    pub app: String,

    /// Enable verbose output (log every command)
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only report warnings and errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Re-create the tag if the current revision is already tagged
    #[arg(short, long)]
    pub force: bool,

    /// Deploy test suites only
    #[arg(short, long)]
    pub tests: bool,

    /// Deploy to the stage servers
    #[arg(short, long)]
    pub stage: bool,

    /// Roll back the previous release and exit
    #[arg(short, long)]
    pub rollback: bool,

    /// Configuration file (default: $PROMOTER_CONFIG or ./promoter.yml)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Emit JSON lines instead of text
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn options(&self) -> Options {
        Options {
            verbose: self.verbose,
            force: self.force,
            tests_only: self.tests,
            stage: self.stage,
            rollback: self.rollback,
        }
    }
}
