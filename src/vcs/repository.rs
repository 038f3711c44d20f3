// ABOUTME: Repository URL layout and the per-flow read-only snapshot.
// ABOUTME: Knows where trunk, tags, and test suites live under an application root.

use crate::types::Revision;
use std::fmt;

/// Root URL of one application inside a repository (`<root>/<app>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryUrl(String);

impl RepositoryUrl {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self(url.trim_end_matches('/').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// URL of `path` below the application root.
    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.0, path.trim_start_matches('/'))
    }

    pub fn trunk(&self) -> String {
        self.join("trunk")
    }

    pub fn tags(&self) -> String {
        self.join("tags")
    }

    pub fn tag(&self, revision: Revision) -> String {
        self.join(&format!("tags/{revision}"))
    }

    pub fn tests(&self) -> String {
        self.join("tests")
    }

    pub fn test_suite(&self, suite: &str) -> String {
        self.join(&format!("tests/{suite}"))
    }
}

impl fmt::Display for RepositoryUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Repository state read once at the start of a production flow.
///
/// Every decision in that flow is made against this snapshot, so the tag list
/// cannot change between the "already tagged?" check and the copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySnapshot {
    pub repository: RepositoryUrl,
    pub trunk_revision: Revision,
    /// Existing tags, ascending.
    pub tags: Vec<Revision>,
}

impl RepositorySnapshot {
    pub fn is_tagged(&self, revision: Revision) -> bool {
        self.tags.binary_search(&revision).is_ok()
    }

    /// Newest tag strictly older than `revision`.
    pub fn previous_tag(&self, revision: Revision) -> Option<Revision> {
        self.tags.iter().rev().copied().find(|tag| *tag < revision)
    }
}
