// ABOUTME: Deploy descriptors and their Capistrano rendering.
// ABOUTME: A descriptor names the app, its source URL, and the target servers.

use std::path::{Path, PathBuf};

use crate::config::RemoteConfig;
use crate::types::AppName;

/// Directory inside the working area holding the generated script.
pub const CONFIG_DIR: &str = "config";

/// File name of the generated script.
pub const SCRIPT_NAME: &str = "deploy.rb";

#[derive(Debug, thiserror::Error)]
pub enum ReleaseError {
    #[error("working directory {0} does not exist")]
    MissingDirectory(PathBuf),

    #[error("failed to write deploy script {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// What to deploy and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployDescriptor {
    pub app: AppName,
    /// Repository URL exported onto the servers.
    pub source: String,
    /// Target hosts; the first is the primary.
    pub servers: Vec<String>,
    pub deploy_root: String,
    pub user: String,
    pub use_sudo: bool,
}

impl DeployDescriptor {
    pub fn new(
        app: AppName,
        source: impl Into<String>,
        servers: Vec<String>,
        remote: &RemoteConfig,
    ) -> Self {
        Self {
            app,
            source: source.into(),
            servers,
            deploy_root: remote.deploy_root.trim_end_matches('/').to_string(),
            user: remote.user.clone(),
            use_sudo: remote.use_sudo,
        }
    }

    /// Path of the script inside `working_dir`.
    pub fn script_path(working_dir: &Path) -> PathBuf {
        working_dir.join(CONFIG_DIR).join(SCRIPT_NAME)
    }

    /// Render as a Capistrano `deploy.rb`.
    pub fn render(&self) -> String {
        let role = self
            .servers
            .iter()
            .map(|server| ruby_string(server))
            .chain(std::iter::once(":primary => true".to_string()))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            r#"set :application, {app}
set :repository,  {source}

set :deploy_to, "{root}/#{{application}}"
set :deploy_via, :export

role :web, {role}

set :user, {user}
set :use_sudo, {sudo}

deploy.task :finalize_update do
    # nothing
end

deploy.task :restart do
    # nothing
end
"#,
            app = ruby_string(self.app.as_str()),
            source = ruby_string(&self.source),
            root = escape_ruby(&self.deploy_root),
            role = role,
            user = ruby_string(&self.user),
            sudo = self.use_sudo,
        )
    }

    /// Write the rendered script into `<working_dir>/config/deploy.rb`.
    ///
    /// The config directory must already exist.
    pub fn materialize(&self, working_dir: &Path) -> Result<PathBuf, ReleaseError> {
        let config_dir = working_dir.join(CONFIG_DIR);
        if !config_dir.is_dir() {
            return Err(ReleaseError::MissingDirectory(config_dir));
        }

        let path = Self::script_path(working_dir);
        tracing::info!("Writing deployment script to {}", path.display());
        std::fs::write(&path, self.render()).map_err(|source| ReleaseError::Write {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }
}

fn ruby_string(value: &str) -> String {
    format!("\"{}\"", escape_ruby(value))
}

/// Escape for a double-quoted Ruby literal; `#` is escaped to block interpolation.
fn escape_ruby(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' | '\\' | '#' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(servers: &[&str]) -> DeployDescriptor {
        DeployDescriptor::new(
            AppName::new("shop").unwrap(),
            "https://svn.example.com/apps/shop/tags/43",
            servers.iter().map(|s| s.to_string()).collect(),
            &RemoteConfig::default(),
        )
    }

    #[test]
    fn renders_capistrano_settings() {
        let script = descriptor(&["web1", "web2"]).render();

        assert!(script.contains("set :application, \"shop\"\n"));
        assert!(script.contains(
            "set :repository,  \"https://svn.example.com/apps/shop/tags/43\"\n"
        ));
        assert!(script.contains(
            "set :deploy_to, \"/usr/local/apache/data/apps/#{application}\"\n"
        ));
        assert!(script.contains("set :deploy_via, :export\n"));
        assert!(script.contains("role :web, \"web1\", \"web2\", :primary => true\n"));
        assert!(script.contains("set :user, \"devel\"\n"));
        assert!(script.contains("set :use_sudo, false\n"));
    }

    #[test]
    fn empty_group_renders_role_without_hosts() {
        let script = descriptor(&[]).render();
        assert!(script.contains("role :web, :primary => true\n"));
    }

    #[test]
    fn quotes_are_escaped() {
        let script = descriptor(&["we\"b#{x}"]).render();
        assert!(script.contains(r#"role :web, "we\"b\#{x}", :primary => true"#));
    }

    #[test]
    fn materialize_requires_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = descriptor(&["web1"]).materialize(dir.path()).unwrap_err();
        assert!(matches!(err, ReleaseError::MissingDirectory(_)));
    }

    #[test]
    fn materialize_writes_script() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(CONFIG_DIR)).unwrap();

        let path = descriptor(&["web1"]).materialize(dir.path()).unwrap();

        assert_eq!(path, dir.path().join("config").join("deploy.rb"));
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.contains("role :web, \"web1\", :primary => true"));
    }
}
