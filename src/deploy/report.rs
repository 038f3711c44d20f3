// ABOUTME: Outcome of a controller run: rolled back, or a per-flow report.
// ABOUTME: Records the tag decision, the production result, and each suite's result.

use crate::tagger::TagOutcome;

/// Result of one deploy step group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    Deployed,
    Failed(String),
}

impl StepResult {
    pub fn is_deployed(&self) -> bool {
        matches!(self, StepResult::Deployed)
    }
}

/// What happened to one test suite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteReport {
    pub suite: String,
    pub servers: Vec<String>,
    pub result: StepResult,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Tag decision; `None` when the production flow did not run or tagging failed.
    pub tag: Option<TagOutcome>,
    /// Production result; `None` for tests-only runs.
    pub production: Option<StepResult>,
    pub suites: Vec<SuiteReport>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.production.as_ref().is_none_or(StepResult::is_deployed)
            && self.suites.iter().all(|s| s.result.is_deployed())
    }

    pub fn failed_suites(&self) -> impl Iterator<Item = &SuiteReport> {
        self.suites.iter().filter(|s| !s.result.is_deployed())
    }
}

/// How a controller run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    RolledBack,
    Finished(RunReport),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suite(name: &str, result: StepResult) -> SuiteReport {
        SuiteReport {
            suite: name.to_string(),
            servers: vec!["t1".to_string()],
            result,
        }
    }

    #[test]
    fn empty_report_is_success() {
        assert!(RunReport::default().is_success());
    }

    #[test]
    fn failed_production_fails_report() {
        let report = RunReport {
            production: Some(StepResult::Failed("update failed".into())),
            ..RunReport::default()
        };
        assert!(!report.is_success());
    }

    #[test]
    fn one_failed_suite_fails_report() {
        let report = RunReport {
            production: Some(StepResult::Deployed),
            suites: vec![
                suite("unit", StepResult::Deployed),
                suite("integration", StepResult::Failed("exit 1".into())),
            ],
            ..RunReport::default()
        };
        assert!(!report.is_success());
        let failed: Vec<_> = report.failed_suites().map(|s| s.suite.as_str()).collect();
        assert_eq!(failed, ["integration"]);
    }
}
