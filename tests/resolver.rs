// ABOUTME: Integration tests for repository and revision resolution.
// ABOUTME: Uses the in-memory version-control fake.

mod support;

use promoter::types::{AppName, Revision};
use promoter::vcs::{ResolveError, RepositoryUrl, RevisionResolver};
use support::{FakeVcs, ROOT, repo};

fn roots() -> Vec<String> {
    vec!["https://svn.old.example.com/apps".into(), ROOT.into()]
}

fn shop() -> AppName {
    AppName::new("shop").unwrap()
}

#[tokio::test]
async fn first_listable_root_wins() {
    let vcs = FakeVcs::new("shop", 57);
    let resolver = RevisionResolver::new(&vcs, roots());

    let repository = resolver.resolve_repository(&shop()).await.unwrap();

    assert_eq!(repository, RepositoryUrl::new(repo("shop")));
    assert_eq!(
        vcs.calls(),
        [
            "list https://svn.old.example.com/apps/shop".to_string(),
            format!("list {}", repo("shop")),
        ]
    );
}

#[tokio::test]
async fn unknown_app_is_not_found() {
    let vcs = FakeVcs::new("shop", 57);
    let resolver = RevisionResolver::new(&vcs, roots());

    let err = resolver
        .resolve_repository(&AppName::new("blog").unwrap())
        .await
        .unwrap_err();

    match err {
        ResolveError::RepositoryNotFound { app, candidates } => {
            assert_eq!(app, "blog");
            assert_eq!(candidates, roots());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn current_revision_reads_last_changed_rev() {
    let vcs = FakeVcs::new("shop", 57);
    let resolver = RevisionResolver::new(&vcs, roots());
    let repository = RepositoryUrl::new(repo("shop"));

    let revision = resolver.current_revision(&repository, "trunk").await.unwrap();
    assert_eq!(revision, Revision::new(57));
}

#[tokio::test]
async fn unparsable_info_is_an_error() {
    let vcs = FakeVcs::new("shop", 57).with_info("svn: warning: W170000: not a working copy\n");
    let resolver = RevisionResolver::new(&vcs, roots());
    let repository = RepositoryUrl::new(repo("shop"));

    let err = resolver.current_revision(&repository, "trunk").await.unwrap_err();
    assert!(matches!(err, ResolveError::RevisionParse { .. }));
}

#[tokio::test]
async fn snapshot_reads_everything_once() {
    let vcs = FakeVcs::new("shop", 43).with_tags(&[42, 7, 40]);
    let resolver = RevisionResolver::new(&vcs, roots());

    let snapshot = resolver.snapshot(&shop()).await.unwrap();

    assert_eq!(snapshot.trunk_revision, Revision::new(43));
    assert_eq!(
        snapshot.tags,
        [Revision::new(7), Revision::new(40), Revision::new(42)]
    );
    assert!(!snapshot.is_tagged(Revision::new(43)));
    assert_eq!(snapshot.previous_tag(Revision::new(43)), Some(Revision::new(42)));
    assert_eq!(vcs.mutations(), Vec::<String>::new());
}

#[tokio::test]
async fn missing_tests_directory_means_no_suites() {
    let vcs = FakeVcs::new("shop", 43);
    let resolver = RevisionResolver::new(&vcs, roots());
    let repository = RepositoryUrl::new(repo("shop"));

    assert!(resolver.list_test_suites(&repository).await.unwrap().is_empty());
}

#[tokio::test]
async fn suites_keep_listing_order() {
    let vcs = FakeVcs::new("shop", 43).with_suites(&["unit", "integration", "acceptance"]);
    let resolver = RevisionResolver::new(&vcs, roots());
    let repository = RepositoryUrl::new(repo("shop"));

    let suites = resolver.list_test_suites(&repository).await.unwrap();
    assert_eq!(suites, ["unit", "integration", "acceptance"]);
}

#[tokio::test]
async fn failed_tags_listing_is_an_error() {
    let vcs = FakeVcs::new("shop", 43).with_tags(&[43]).unreachable_tags();
    let resolver = RevisionResolver::new(&vcs, roots());

    let err = resolver.snapshot(&shop()).await.unwrap_err();

    match err {
        ResolveError::Listing { url, output } => {
            assert_eq!(url, format!("{}/tags", repo("shop")));
            assert!(output.contains("E170013"));
        }
        other => panic!("unexpected error: {other}"),
    }
}
