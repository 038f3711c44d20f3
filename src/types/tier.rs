// ABOUTME: Deployment tiers.
// ABOUTME: Each tier selects a server group from configuration.

use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Production,
    Stage,
    Tests,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Production => "production",
            Tier::Stage => "stage",
            Tier::Tests => "tests",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
