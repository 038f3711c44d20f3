// ABOUTME: Immutable run options chosen on the command line.
// ABOUTME: Decides which server tier each flow deploys to.

use crate::types::Tier;

/// Run configuration, fixed for the lifetime of one controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    pub verbose: bool,
    /// Re-create a tag that already exists.
    pub force: bool,
    /// Skip the production flow.
    pub tests_only: bool,
    /// Deploy to the stage tier instead of production/tests.
    pub stage: bool,
    /// Roll back the previous release and do nothing else.
    pub rollback: bool,
}

impl Options {
    pub fn production_tier(&self) -> Tier {
        if self.stage {
            Tier::Stage
        } else {
            Tier::Production
        }
    }

    pub fn test_tier(&self) -> Tier {
        if self.stage { Tier::Stage } else { Tier::Tests }
    }
}
