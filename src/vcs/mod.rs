// ABOUTME: Version-control collaborator and the read-only query layer over it.
// ABOUTME: Resolves repositories, trunk revisions, tags, and test suites.

mod client;
mod repository;
mod resolver;
mod svn;

pub use client::{VcsError, VersionControl};
pub use repository::{RepositorySnapshot, RepositoryUrl};
pub use resolver::{
    ResolveError, RevisionResolver, parse_last_changed_revision, parse_tags, parse_test_suites,
};
pub use svn::SvnClient;
