// ABOUTME: Release notification settings.
// ABOUTME: Sender, recipient, and SMTP relay for production release mail.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    pub from: String,

    pub to: String,

    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    25
}
