// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Validates repository roots and host lists.

use nonempty::NonEmpty;
use serde::Deserialize;

pub fn deserialize_repositories<'de, D>(deserializer: D) -> Result<NonEmpty<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Vec<String> = Vec::deserialize(deserializer)?;
    let roots = values
        .into_iter()
        .map(|root| {
            let root = root.trim().trim_end_matches('/');
            if root.is_empty() {
                Err("repository root cannot be empty".to_string())
            } else {
                Ok(root.to_string())
            }
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(serde::de::Error::custom)?;

    NonEmpty::from_vec(roots)
        .ok_or_else(|| serde::de::Error::custom("at least one repository is required"))
}

pub fn deserialize_hosts<'de, D>(deserializer: D) -> Result<NonEmpty<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let hosts = deserialize_host_list(deserializer)?;
    NonEmpty::from_vec(hosts)
        .ok_or_else(|| serde::de::Error::custom("at least one server is required"))
}

pub fn deserialize_host_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Vec<String> = Vec::deserialize(deserializer)?;
    values
        .into_iter()
        .map(|host| {
            let host = host.trim();
            if host.is_empty() {
                Err(serde::de::Error::custom("server address cannot be empty"))
            } else {
                Ok(host.to_string())
            }
        })
        .collect()
}
