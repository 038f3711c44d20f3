// ABOUTME: Test support utilities.
// ABOUTME: In-memory fakes of the version-control, script-runner, and mail collaborators.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Once;

use async_trait::async_trait;
use parking_lot::Mutex;
use promoter::config::Config;
use promoter::notify::{Email, Notifier, NotifyError};
use promoter::process::CommandOutput;
use promoter::release::DeployDescriptor;
use promoter::remote::{RemoteAction, RemoteError, ScriptRunner};
use promoter::types::Revision;
use promoter::vcs::{VcsError, VersionControl};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("promoter=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub const ROOT: &str = "https://svn.example.com/apps";

/// Repository URL of `app` under [`ROOT`].
#[allow(dead_code)]
pub fn repo(app: &str) -> String {
    format!("{ROOT}/{app}")
}

/// Config whose working and log directories live under `dir`.
#[allow(dead_code)]
pub fn config_in(dir: &Path, extra: &str) -> Config {
    let yaml = format!(
        r#"
repositories:
  - https://svn.old.example.com/apps
  - {ROOT}
servers:
  production: [web1, web2]
  stage: [stage1]
  tests: [t1, t2, t3, t4, t5]
workspace:
  tmp_dir: {tmp}
  log_dir: {log}
{extra}
"#,
        tmp = dir.join("tmp").display(),
        log = dir.join("log").display(),
    );
    Config::from_yaml(&yaml).unwrap()
}

fn ok(stdout: impl Into<String>) -> CommandOutput {
    CommandOutput::new(0, stdout)
}

fn not_found(url: &str) -> CommandOutput {
    CommandOutput {
        status: 1,
        stdout: String::new(),
        stderr: format!("svn: E170000: URL '{url}' doesn't exist"),
    }
}

/// A single application's repository, held in memory.
///
/// Tags are mutated by `copy` and `remove`, so repeated runs see earlier tags.
#[derive(Default)]
pub struct FakeVcs {
    repository: String,
    trunk: Mutex<u64>,
    tags: Mutex<BTreeSet<u64>>,
    suites: Option<Vec<String>>,
    info_override: Option<String>,
    fail_copy: bool,
    unreachable_tags: bool,
    calls: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl FakeVcs {
    pub fn new(app: &str, trunk: u64) -> Self {
        Self {
            repository: repo(app),
            trunk: Mutex::new(trunk),
            ..Self::default()
        }
    }

    pub fn with_tags(self, tags: &[u64]) -> Self {
        *self.tags.lock() = tags.iter().copied().collect();
        self
    }

    pub fn with_suites(mut self, suites: &[&str]) -> Self {
        self.suites = Some(suites.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Replace the `info` output, e.g. with text lacking `Last Changed Rev`.
    pub fn with_info(mut self, info: &str) -> Self {
        self.info_override = Some(info.to_string());
        self
    }

    pub fn failing_copy(mut self) -> Self {
        self.fail_copy = true;
        self
    }

    /// Fail the `tags/` listing the way an unreachable server does.
    pub fn unreachable_tags(mut self) -> Self {
        self.unreachable_tags = true;
        self
    }

    pub fn commit(&self, revision: u64) {
        *self.trunk.lock() = revision;
    }

    pub fn tags(&self) -> Vec<u64> {
        self.tags.lock().iter().copied().collect()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Calls that change the repository.
    pub fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with("copy") || c.starts_with("remove"))
            .collect()
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }

    fn tag_of(&self, url: &str) -> Option<u64> {
        url.strip_prefix(&format!("{}/tags/", self.repository))?
            .parse()
            .ok()
    }
}

#[async_trait]
impl VersionControl for FakeVcs {
    async fn list(&self, url: &str) -> Result<CommandOutput, VcsError> {
        self.record(format!("list {url}"));

        if url == self.repository {
            return Ok(ok("branches/\ntags/\ntests/\ntrunk/\n"));
        }
        if url == format!("{}/tags", self.repository) {
            if self.unreachable_tags {
                return Ok(CommandOutput {
                    status: 1,
                    stdout: String::new(),
                    stderr: format!("svn: E170013: Unable to connect to a repository at URL '{url}'"),
                });
            }
            let listing: String = self.tags().iter().map(|t| format!("{t}/\n")).collect();
            return Ok(ok(listing));
        }
        if url == format!("{}/tests", self.repository) {
            return Ok(match &self.suites {
                Some(suites) => ok(suites.iter().map(|s| format!("{s}/\n")).collect::<String>()),
                None => not_found(url),
            });
        }
        Ok(not_found(url))
    }

    async fn info(&self, url: &str) -> Result<CommandOutput, VcsError> {
        self.record(format!("info {url}"));
        if let Some(info) = &self.info_override {
            return Ok(ok(info.clone()));
        }
        let trunk = *self.trunk.lock();
        Ok(ok(format!(
            "Path: trunk\nURL: {url}\nRevision: {trunk}\nNode Kind: directory\n\
             Last Changed Author: dana\nLast Changed Rev: {trunk}\n"
        )))
    }

    async fn log(&self, url: &str, from: Revision, to: Revision) -> Result<CommandOutput, VcsError> {
        self.record(format!("log {url} {from}:{to}"));
        Ok(ok(format!("r{to} | dana | fix checkout\n")))
    }

    async fn diff(&self, old: &str, new: &str, summarize: bool) -> Result<CommandOutput, VcsError> {
        self.record(format!("diff {old} {new} summarize={summarize}"));
        Ok(ok(if summarize { "M  index.php\n" } else { "-old\n+new\n" }))
    }

    async fn copy(&self, src: &str, dst: &str, message: &str) -> Result<CommandOutput, VcsError> {
        self.record(format!("copy {src} {dst} -m {message}"));
        if self.fail_copy {
            return Ok(CommandOutput {
                status: 1,
                stdout: String::new(),
                stderr: "svn: E175013: Access to tags forbidden".into(),
            });
        }
        let Some(tag) = self.tag_of(dst) else {
            return Ok(not_found(dst));
        };
        if !self.tags.lock().insert(tag) {
            return Ok(CommandOutput {
                status: 1,
                stdout: String::new(),
                stderr: format!("svn: E160020: Path '{dst}' already exists"),
            });
        }
        Ok(ok(format!("Committed revision {}.\n", *self.trunk.lock() + 1)))
    }

    async fn remove(&self, url: &str, message: &str) -> Result<CommandOutput, VcsError> {
        self.record(format!("remove {url} -m {message}"));
        match self.tag_of(url) {
            Some(tag) if self.tags.lock().remove(&tag) => Ok(ok("Committed revision.\n")),
            _ => Ok(not_found(url)),
        }
    }
}

/// One runner invocation and the descriptor present at that moment.
#[derive(Debug, Clone)]
pub struct RunnerCall {
    pub action: RemoteAction,
    pub working_dir: PathBuf,
    pub descriptor: Option<String>,
}

/// Records actions and answers them from scripted statuses.
#[derive(Default)]
pub struct FakeRunner {
    statuses: Mutex<HashMap<RemoteAction, VecDeque<i32>>>,
    fail_updates_of: Mutex<Option<String>>,
    calls: Mutex<Vec<RunnerCall>>,
}

#[allow(dead_code)]
impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue exit statuses for `action`; once drained, it succeeds.
    pub fn script(self, action: RemoteAction, statuses: &[i32]) -> Self {
        self.statuses
            .lock()
            .entry(action)
            .or_default()
            .extend(statuses.iter().copied());
        self
    }

    /// Fail every `update` whose descriptor mentions `source`.
    pub fn fail_updates_of(self, source: &str) -> Self {
        *self.fail_updates_of.lock() = Some(source.to_string());
        self
    }

    pub fn calls(&self) -> Vec<RunnerCall> {
        self.calls.lock().clone()
    }

    pub fn actions(&self) -> Vec<RemoteAction> {
        self.calls().into_iter().map(|c| c.action).collect()
    }

    /// Descriptors seen by `update` calls, in order.
    pub fn updated_descriptors(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.action == RemoteAction::Update)
            .filter_map(|c| c.descriptor)
            .collect()
    }
}

#[async_trait]
impl ScriptRunner for FakeRunner {
    async fn run(
        &self,
        action: RemoteAction,
        working_dir: &Path,
    ) -> Result<CommandOutput, RemoteError> {
        let descriptor = std::fs::read_to_string(DeployDescriptor::script_path(working_dir)).ok();
        self.calls.lock().push(RunnerCall {
            action,
            working_dir: working_dir.to_path_buf(),
            descriptor: descriptor.clone(),
        });

        let failing_source = self.fail_updates_of.lock().clone();
        if let (RemoteAction::Update, Some(source), Some(descriptor)) =
            (action, failing_source, &descriptor)
        {
            if descriptor.contains(&source) {
                return Ok(CommandOutput::new(1, format!("update of {source} failed")));
            }
        }

        let status = self
            .statuses
            .lock()
            .get_mut(&action)
            .and_then(VecDeque::pop_front)
            .unwrap_or(0);
        Ok(CommandOutput::new(status, format!("{action} finished")))
    }
}

/// Collects sent mail; optionally refuses every message.
#[derive(Default)]
pub struct FakeNotifier {
    refuse: bool,
    sent: Mutex<Vec<Email>>,
}

#[allow(dead_code)]
impl FakeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<Email> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn send(&self, email: &Email) -> Result<(), NotifyError> {
        if self.refuse {
            return Err(NotifyError::Transport("connection refused".into()));
        }
        self.sent.lock().push(email.clone());
        Ok(())
    }
}
