// ABOUTME: Server groups per deployment tier.
// ABOUTME: Production must list at least one host; stage and tests may be empty.

use super::deserialize::{deserialize_host_list, deserialize_hosts};
use crate::types::Tier;
use nonempty::NonEmpty;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServersConfig {
    #[serde(deserialize_with = "deserialize_hosts")]
    pub production: NonEmpty<String>,

    #[serde(default, deserialize_with = "deserialize_host_list")]
    pub stage: Vec<String>,

    #[serde(default, deserialize_with = "deserialize_host_list")]
    pub tests: Vec<String>,
}

impl ServersConfig {
    /// Ordered host list for a tier. May be empty for stage and tests.
    pub fn for_tier(&self, tier: Tier) -> Vec<String> {
        match tier {
            Tier::Production => self.production.iter().cloned().collect(),
            Tier::Stage => self.stage.clone(),
            Tier::Tests => self.tests.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hosts_are_returned_in_configured_order() {
        let servers: ServersConfig = serde_yaml::from_str(
            "production: [web1, web2]\ntests: [t3, t1, t2]\n",
        )
        .unwrap();

        assert_eq!(servers.for_tier(Tier::Production), vec!["web1", "web2"]);
        assert_eq!(servers.for_tier(Tier::Tests), vec!["t3", "t1", "t2"]);
        assert!(servers.for_tier(Tier::Stage).is_empty());
    }

    #[test]
    fn blank_host_is_rejected() {
        let err = serde_yaml::from_str::<ServersConfig>("production: [web1, '  ']\n").unwrap_err();
        assert!(err.to_string().contains("server address cannot be empty"));
    }
}
