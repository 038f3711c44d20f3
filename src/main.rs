// ABOUTME: Entry point for the promoter CLI application.
// ABOUTME: Parses arguments, wires the collaborators, and maps the outcome to an exit code.

mod cli;

use std::env;

use clap::Parser;
use cli::Cli;
use promoter::config::Config;
use promoter::deploy::{DeploymentController, Outcome};
use promoter::diagnostics::Diagnostics;
use promoter::error::{EXIT_PARTIAL, Error, Result};
use promoter::notify::SmtpNotifier;
use promoter::output::{Output, OutputMode};
use promoter::remote::CapistranoRunner;
use promoter::types::AppName;
use promoter::vcs::SvnClient;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli.verbose)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let mut output = Output::new(mode);
    output.start_timer();

    let code = match run(&cli, &output).await {
        Ok(code) => code,
        Err(e) => {
            output.error(&e.to_string());
            e.exit_code()
        }
    };

    std::process::exit(code);
}

async fn run(cli: &Cli, output: &Output) -> Result<i32> {
    let app = AppName::new(&cli.app)?;
    let cwd = env::current_dir()?;
    let config = Config::locate(cli.config.as_deref(), &cwd)?;

    let vcs = SvnClient::from_config(&config.vcs);
    let runner = CapistranoRunner::from_config(&config);
    let notifier = config.notify.as_ref().map(SmtpNotifier::from_config);

    output.progress(&format!("Deploying {app} using {}", runner.script().display()));

    let mut diag = Diagnostics::default();
    let mut controller = DeploymentController::new(app.clone(), &config, cli.options(), &vcs, &runner)
        .notifier(notifier.as_ref());
    let result = controller.run(&mut diag).await;

    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    let outcome = result.map_err(Error::from)?;
    output.outcome(app.as_str(), &outcome);

    Ok(match outcome {
        Outcome::Finished(report) if !report.is_success() => EXIT_PARTIAL,
        _ => 0,
    })
}
