// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes.

use serde::Serialize;
use std::time::Instant;

use crate::deploy::{Outcome, StepResult};
use crate::tagger::TagOutcome;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn duration(&self) -> Option<f64> {
        self.start_time.map(|_| self.elapsed_secs())
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    println!("{message} ({:.1}s)", elapsed);
                } else {
                    println!("{message}");
                }
            }
            OutputMode::Quiet => println!("{message}"),
            OutputMode::Json => self.emit_stdout("success", message),
        }
    }

    /// Print a non-fatal warning.
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Warning: {message}"),
            OutputMode::Json => self.emit_stderr("warning", message),
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Error: {message}"),
            OutputMode::Json => self.emit_stderr("error", message),
        }
    }

    /// Print the result of a controller run.
    ///
    /// Failed steps go through [`error`](Self::error); the rest is progress
    /// plus one final success line when everything deployed.
    pub fn outcome(&self, app: &str, outcome: &Outcome) {
        let report = match outcome {
            Outcome::RolledBack => {
                self.success(&format!("Rolled back {app}"));
                return;
            }
            Outcome::Finished(report) => report,
        };

        match report.tag {
            Some(TagOutcome::AlreadyTagged(revision)) => {
                self.progress(&format!("Revision {revision} was already tagged"));
            }
            Some(TagOutcome::Created { revision, .. }) => {
                self.progress(&format!("Tagged revision {revision}"));
            }
            None => {}
        }

        match &report.production {
            Some(StepResult::Deployed) => self.progress("Production: deployed"),
            Some(StepResult::Failed(e)) => self.error(&format!("production: {e}")),
            None => {}
        }

        for suite in &report.suites {
            match &suite.result {
                StepResult::Deployed => self.progress(&format!(
                    "Test \"{}\": deployed to {}",
                    suite.suite,
                    suite.servers.join(", ")
                )),
                StepResult::Failed(e) => self.error(&format!("test \"{}\": {e}", suite.suite)),
            }
        }

        if report.is_success() {
            self.success(&format!("Deployment of {app} complete"));
        }
    }

    fn event(&self, event: &'static str, message: &str) -> Option<String> {
        let event = JsonEvent {
            event,
            message,
            duration_secs: self.duration(),
        };
        serde_json::to_string(&event).ok()
    }

    fn emit_stdout(&self, event: &'static str, message: &str) {
        if let Some(json) = self.event(event, message) {
            println!("{json}");
        }
    }

    fn emit_stderr(&self, event: &'static str, message: &str) {
        if let Some(json) = self.event(event, message) {
            eprintln!("{json}");
        }
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}
