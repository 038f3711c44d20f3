// ABOUTME: Top-level state machine for rollback, production, and test flows.
// ABOUTME: Reads repository state once, then runs mutating steps strictly in order.

use crate::config::Config;
use crate::diagnostics::{Diagnostics, Warning};
use crate::notify::{Notifier, ReleaseAnnouncer};
use crate::partition::TestPlan;
use crate::release::DeployDescriptor;
use crate::remote::{RemoteOrchestrator, RetryPolicy, ScriptRunner};
use crate::tagger::{TagOutcome, Tagger};
use crate::types::{AppName, Tier};
use crate::vcs::{RepositorySnapshot, RepositoryUrl, RevisionResolver, VersionControl};

use super::error::DeployError;
use super::options::Options;
use super::release::Release;
use super::report::{Outcome, RunReport, StepResult, SuiteReport};
use super::state::DeployState;

/// Everything read from the repository before the first mutating step.
struct Plan {
    snapshot: RepositorySnapshot,
    production: Option<Vec<String>>,
    tests: TestPlan,
}

/// Drives one application's deployment.
pub struct DeploymentController<'a, V, R, N> {
    app: AppName,
    config: &'a Config,
    options: Options,
    vcs: &'a V,
    runner: &'a R,
    notifier: Option<&'a N>,
    state: DeployState,
}

impl<'a, V, R, N> DeploymentController<'a, V, R, N>
where
    V: VersionControl,
    R: ScriptRunner,
    N: Notifier,
{
    pub fn new(
        app: AppName,
        config: &'a Config,
        options: Options,
        vcs: &'a V,
        runner: &'a R,
    ) -> Self {
        Self {
            app,
            config,
            options,
            vcs,
            runner,
            notifier: None,
            state: DeployState::Idle,
        }
    }

    /// Announce new production tags through `notifier`.
    ///
    /// Has no effect unless the configuration has a `notify` section.
    pub fn notifier(mut self, notifier: Option<&'a N>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn state(&self) -> DeployState {
        self.state
    }

    /// Run the flows selected by the options.
    ///
    /// Rollback runs alone and ends in [`Outcome::RolledBack`]. Otherwise the
    /// production flow (unless tests-only) is followed by the test flow.
    /// Errors returned here abort the run; per-flow and per-suite failures
    /// are recorded in the report instead.
    pub async fn run(&mut self, diag: &mut Diagnostics) -> Result<Outcome, DeployError> {
        if self.state.is_terminal() {
            tracing::warn!("Deployment of {} already ended ({})", self.app, self.state);
            return Ok(match self.state {
                DeployState::RolledBack => Outcome::RolledBack,
                _ => Outcome::Finished(RunReport::default()),
            });
        }

        let remote = self.orchestrator();

        if self.options.rollback {
            return self.rollback(&remote).await;
        }

        let plan = self.plan(diag).await?;
        let mut report = RunReport::default();

        if let Some(servers) = plan.production {
            let tier = self.options.production_tier();
            tracing::info!("Beginning {} deployment for {}", tier, self.app);

            match self.production(&remote, &plan.snapshot, servers, &mut report, diag).await {
                Ok(()) => report.production = Some(StepResult::Deployed),
                Err(e) if e.aborts_run() => return Err(e),
                Err(e) => {
                    tracing::error!("Production deployment of {} failed: {}", self.app, e);
                    report.production = Some(StepResult::Failed(e.to_string()));
                }
            }

            tracing::info!("Finished {} deployment for {}.", tier, self.app);
        }

        let tier = self.options.test_tier();
        tracing::info!("Beginning {} deployment for {}", tier, self.app);
        report.suites = self
            .tests(&remote, &plan.snapshot.repository, &plan.tests)
            .await?;
        tracing::info!("Finished {} deployment for {}.", tier, self.app);

        self.enter(DeployState::Done);
        Ok(Outcome::Finished(report))
    }

    fn orchestrator(&self) -> RemoteOrchestrator<'a, R> {
        RemoteOrchestrator::new(self.runner, self.config.working_dir(&self.app))
            .retry(RetryPolicy::from_config(&self.config.remote))
    }

    fn enter(&mut self, state: DeployState) {
        tracing::debug!("{}: {} -> {}", self.app, self.state, state);
        self.state = state;
    }

    fn servers(&self, tier: Tier) -> Vec<String> {
        self.config.servers.for_tier(tier)
    }

    /// Resolve and validate everything the flows need without mutating anything.
    async fn plan(&self, diag: &mut Diagnostics) -> Result<Plan, DeployError> {
        let resolver =
            RevisionResolver::new(self.vcs, self.config.repositories.iter().cloned());
        let snapshot = resolver.snapshot(&self.app).await?;

        let production = if self.options.tests_only {
            None
        } else {
            let tier = self.options.production_tier();
            let servers = self.servers(tier);
            if servers.is_empty() {
                return Err(DeployError::NoServers(tier));
            }
            Some(servers)
        };

        let suites = resolver.list_test_suites(&snapshot.repository).await?;
        let servers = self.servers(self.options.test_tier());

        // Suites without servers get empty groups; their updates are no-ops.
        let tests = TestPlan::new(suites, &servers);
        if tests.is_oversubscribed() {
            diag.warn(Warning::oversubscribed(format!(
                "There are more tests than there are servers! ({} > {})",
                tests.len(),
                tests.server_count()
            )));
        }

        Ok(Plan {
            snapshot,
            production,
            tests,
        })
    }

    /// Replay the last written `config/deploy.rb` with the `rollback` action.
    ///
    /// The script is whichever descriptor the previous run wrote last. After a
    /// full run with test suites that is the last suite's, so the rollback
    /// targets that suite's servers rather than production.
    async fn rollback(&mut self, remote: &RemoteOrchestrator<'a, R>) -> Result<Outcome, DeployError> {
        let script = DeployDescriptor::script_path(remote.working_dir());
        if !script.is_file() {
            return Err(DeployError::MissingDescriptor(script));
        }

        remote.rollback().await.map_err(DeployError::Rollback)?;
        self.enter(DeployState::RolledBack);
        Ok(Outcome::RolledBack)
    }

    async fn production(
        &mut self,
        remote: &RemoteOrchestrator<'a, R>,
        snapshot: &RepositorySnapshot,
        servers: Vec<String>,
        report: &mut RunReport,
        diag: &mut Diagnostics,
    ) -> Result<(), DeployError> {
        self.enter(DeployState::Tagging);
        let outcome = self.tag(snapshot, diag).await?;
        report.tag = Some(outcome);

        self.enter(DeployState::Deploying);
        let source = snapshot.repository.tag(outcome.revision());
        tracing::info!("Deploying {} to {:?}", source, servers);
        let descriptor =
            DeployDescriptor::new(self.app.clone(), source, servers, &self.config.remote);

        Release::new(descriptor)
            .prepare(remote)
            .await?
            .initialize_hosts(remote)
            .await?
            .cleanup(remote)
            .await?
            .push_update(remote)
            .await?
            .finish();

        Ok(())
    }

    async fn tag(
        &self,
        snapshot: &RepositorySnapshot,
        diag: &mut Diagnostics,
    ) -> Result<TagOutcome, DeployError> {
        let mut announcer = ReleaseAnnouncer::new(self.vcs, self.config.log_dir());
        if let (Some(notifier), Some(notify)) = (self.notifier, &self.config.notify) {
            announcer = announcer.notify_with(notifier, notify);
        }

        let outcome = Tagger::new(self.vcs, announcer)
            .verbose(self.options.verbose)
            .tag(&self.app, snapshot, self.options.force, diag)
            .await?;
        Ok(outcome)
    }

    /// Deploy each suite to its server group, in listing order.
    ///
    /// A failed suite is recorded and the next suite still runs.
    async fn tests(
        &mut self,
        remote: &RemoteOrchestrator<'a, R>,
        repository: &RepositoryUrl,
        plan: &TestPlan,
    ) -> Result<Vec<SuiteReport>, DeployError> {
        self.enter(DeployState::TestPartitioning);
        if plan.is_empty() {
            tracing::info!("No tests to deploy.");
            return Ok(Vec::new());
        }

        remote.ensure_working_area()?;
        self.enter(DeployState::Deploying);

        let total = plan.len();
        let mut reports = Vec::with_capacity(total);

        for (i, assignment) in plan.assignments().iter().enumerate() {
            tracing::info!(
                "Deploying test \"{}\" ({}/{}) to testing-tier #{} ({})",
                assignment.suite,
                i + 1,
                total,
                i + 1,
                assignment.servers.join(", ")
            );

            let descriptor = DeployDescriptor::new(
                self.app.clone(),
                repository.test_suite(&assignment.suite),
                assignment.servers.clone(),
                &self.config.remote,
            );

            let result = match self.deploy_suite(remote, &descriptor).await {
                Ok(()) => {
                    tracing::info!("Finished deploying test: {}", assignment.suite);
                    StepResult::Deployed
                }
                Err(e) => {
                    tracing::error!("Test \"{}\" failed: {}", assignment.suite, e);
                    StepResult::Failed(e.to_string())
                }
            };

            reports.push(SuiteReport {
                suite: assignment.suite.clone(),
                servers: assignment.servers.clone(),
                result,
            });
        }

        Ok(reports)
    }

    async fn deploy_suite(
        &self,
        remote: &RemoteOrchestrator<'a, R>,
        descriptor: &DeployDescriptor,
    ) -> Result<(), DeployError> {
        descriptor.materialize(remote.working_dir())?;
        remote.push_update().await?;
        Ok(())
    }
}
