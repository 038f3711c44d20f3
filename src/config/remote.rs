// ABOUTME: Remote-execution configuration.
// ABOUTME: Script location, deploy target layout, timeouts, and retry policy.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_script")]
    pub script: PathBuf,

    #[serde(default = "default_deploy_root")]
    pub deploy_root: String,

    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default)]
    pub use_sudo: bool,

    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,

    /// Extra attempts after a failed action.
    #[serde(default)]
    pub retries: u32,

    #[serde(default = "default_retry_backoff", with = "humantime_serde")]
    pub retry_backoff: Duration,
}

fn default_script() -> PathBuf {
    PathBuf::from("capistrano.sh")
}

fn default_deploy_root() -> String {
    "/usr/local/apache/data/apps".to_string()
}

fn default_user() -> String {
    "devel".to_string()
}

fn default_retry_backoff() -> Duration {
    Duration::from_secs(5)
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            script: default_script(),
            deploy_root: default_deploy_root(),
            user: default_user(),
            use_sudo: false,
            timeout: None,
            retries: 0,
            retry_backoff: default_retry_backoff(),
        }
    }
}
