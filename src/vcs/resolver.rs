// ABOUTME: Read-only repository queries: repository root, revisions, tags, and suites.
// ABOUTME: Parses version-control text output into typed values.

use std::sync::LazyLock;

use regex::Regex;

use super::client::{VcsError, VersionControl};
use crate::process::CommandOutput;
use super::repository::{RepositorySnapshot, RepositoryUrl};
use crate::types::{AppName, Revision};

static LAST_CHANGED_REV: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^Last Changed Rev: (\d+)\s*$").expect("last-changed pattern is valid")
});

static TAG_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^([\w.-]+)/\s*$").expect("tag pattern is valid"));

/// Error codes `svn` reports for a URL that does not exist.
const NOT_FOUND_CODES: [&str; 2] = ["E170000", "E200009"];

static SUITE_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^([\w-]+)/\s*$").expect("suite pattern is valid"));

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("application {app} was not found in any repository: {}", .candidates.join(", "))]
    RepositoryNotFound { app: String, candidates: Vec<String> },

    #[error("no \"Last Changed Rev\" in version-control info for {url}")]
    RevisionParse { url: String, output: String },

    #[error("failed to list {url}: {output}")]
    Listing { url: String, output: String },

    #[error(transparent)]
    Vcs(#[from] VcsError),
}

/// Whether a failed command failed only because its URL does not exist.
fn is_not_found(output: &CommandOutput) -> bool {
    let text = output.combined();
    NOT_FOUND_CODES.iter().any(|code| text.contains(code))
}

/// Extract the `Last Changed Rev:` value from `info` output.
pub fn parse_last_changed_revision(output: &str) -> Option<Revision> {
    LAST_CHANGED_REV
        .captures(output)
        .and_then(|caps| caps[1].parse().ok())
}

/// Numeric directory entries of a `tags/` listing, ascending and deduplicated.
///
/// Entries that are not revision numbers are skipped.
pub fn parse_tags(output: &str) -> Vec<Revision> {
    let mut tags: Vec<Revision> = TAG_ENTRY
        .captures_iter(output)
        .filter_map(|caps| match caps[1].parse::<Revision>() {
            Ok(revision) => Some(revision),
            Err(e) => {
                tracing::debug!("Skipping tag entry: {}", e);
                None
            }
        })
        .collect();
    tags.sort_unstable();
    tags.dedup();
    tags
}

/// Directory entries of a `tests/` listing, in listing order.
pub fn parse_test_suites(output: &str) -> Vec<String> {
    SUITE_ENTRY
        .captures_iter(output)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Query layer over a [`VersionControl`] collaborator.
pub struct RevisionResolver<'a, V> {
    vcs: &'a V,
    roots: Vec<String>,
}

impl<'a, V: VersionControl> RevisionResolver<'a, V> {
    /// `roots` are candidate repository roots in priority order.
    pub fn new(vcs: &'a V, roots: impl IntoIterator<Item = String>) -> Self {
        Self {
            vcs,
            roots: roots.into_iter().collect(),
        }
    }

    /// First root whose `<root>/<app>` listing succeeds.
    pub async fn resolve_repository(&self, app: &AppName) -> Result<RepositoryUrl, ResolveError> {
        for root in &self.roots {
            let url = format!("{}/{}", root.trim_end_matches('/'), app);
            let output = self.vcs.list(&url).await?;

            if output.success() {
                tracing::debug!("Resolved {} to {}", app, url);
                return Ok(RepositoryUrl::new(url));
            }

            tracing::debug!("{} not found under {}", app, root);
        }

        tracing::error!("App {} was not found in any of the repositories", app);
        Err(ResolveError::RepositoryNotFound {
            app: app.to_string(),
            candidates: self.roots.clone(),
        })
    }

    /// Last changed revision of `path` under the repository.
    pub async fn current_revision(
        &self,
        repository: &RepositoryUrl,
        path: &str,
    ) -> Result<Revision, ResolveError> {
        let url = repository.join(path);
        let output = self.vcs.info(&url).await?;

        let revision = parse_last_changed_revision(&output.stdout).ok_or_else(|| {
            tracing::error!("Unexpected info output for {}: {}", url, output.combined());
            ResolveError::RevisionParse {
                url: url.clone(),
                output: output.combined(),
            }
        })?;

        tracing::info!("Latest revision of {} is {}", url, revision);
        Ok(revision)
    }

    /// Existing tags, ascending. A missing `tags/` directory yields no tags.
    ///
    /// Any other listing failure is an error: treating it as "untagged" would
    /// copy trunk into an existing tag.
    pub async fn list_tags(&self, repository: &RepositoryUrl) -> Result<Vec<Revision>, ResolveError> {
        let url = repository.tags();
        let output = self.vcs.list(&url).await?;
        if !output.success() {
            if !is_not_found(&output) {
                return Err(listing_failed(url, &output));
            }
            tracing::info!("No tags directory in {}", repository);
            return Ok(Vec::new());
        }
        Ok(parse_tags(&output.stdout))
    }

    /// Test suite names in listing order. A missing `tests/` directory yields none.
    pub async fn list_test_suites(
        &self,
        repository: &RepositoryUrl,
    ) -> Result<Vec<String>, ResolveError> {
        let url = repository.tests();
        let output = self.vcs.list(&url).await?;
        if !output.success() {
            if !is_not_found(&output) {
                return Err(listing_failed(url, &output));
            }
            tracing::info!("No tests directory in {}", repository);
            return Ok(Vec::new());
        }
        Ok(parse_test_suites(&output.stdout))
    }

    /// Repository, trunk revision, and tags, read once.
    pub async fn snapshot(&self, app: &AppName) -> Result<RepositorySnapshot, ResolveError> {
        let repository = self.resolve_repository(app).await?;
        let trunk_revision = self.current_revision(&repository, "trunk").await?;
        let tags = self.list_tags(&repository).await?;

        Ok(RepositorySnapshot {
            repository,
            trunk_revision,
            tags,
        })
    }
}

fn listing_failed(url: String, output: &CommandOutput) -> ResolveError {
    tracing::error!("Could not list {}: {}", url, output.combined());
    ResolveError::Listing {
        url,
        output: output.combined(),
    }
}
