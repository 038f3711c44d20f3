// ABOUTME: Tag-or-reuse decision for production releases.
// ABOUTME: Copies trunk to tags/<rev> once per revision and announces new tags.

use crate::diagnostics::Diagnostics;
use crate::notify::{Notifier, ReleaseAnnouncer};
use crate::process::CommandOutput;
use crate::types::{AppName, Revision};
use crate::vcs::{RepositorySnapshot, VcsError, VersionControl};

#[derive(Debug, thiserror::Error)]
pub enum TagError {
    #[error("failed to remove existing tag {revision}: {output}")]
    RemoveFailed { revision: Revision, output: String },

    #[error("failed to create tag {revision}: {output}")]
    CopyFailed { revision: Revision, output: String },

    #[error(transparent)]
    Vcs(#[from] VcsError),
}

/// Result of [`Tagger::tag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagOutcome {
    /// A tag for this revision already existed and was kept.
    AlreadyTagged(Revision),
    /// A tag was created, replacing an existing one when `replaced`.
    Created {
        revision: Revision,
        previous: Option<Revision>,
        replaced: bool,
        notified: bool,
    },
}

impl TagOutcome {
    pub fn revision(&self) -> Revision {
        match self {
            TagOutcome::AlreadyTagged(revision) => *revision,
            TagOutcome::Created { revision, .. } => *revision,
        }
    }
}

/// Creates production tags.
pub struct Tagger<'a, V, N> {
    vcs: &'a V,
    announcer: ReleaseAnnouncer<'a, V, N>,
    verbose: bool,
}

impl<'a, V: VersionControl, N: Notifier> Tagger<'a, V, N> {
    pub fn new(vcs: &'a V, announcer: ReleaseAnnouncer<'a, V, N>) -> Self {
        Self {
            vcs,
            announcer,
            verbose: false,
        }
    }

    /// Log each mutating command before it runs.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Tag the snapshot's trunk revision unless it is already tagged.
    ///
    /// With `force`, an existing tag is removed and recreated. A new tag is
    /// announced; announcement failures are recorded in `diag` only.
    pub async fn tag(
        &self,
        app: &AppName,
        snapshot: &RepositorySnapshot,
        force: bool,
        diag: &mut Diagnostics,
    ) -> Result<TagOutcome, TagError> {
        let revision = snapshot.trunk_revision;
        let repository = &snapshot.repository;
        let tag_url = repository.tag(revision);
        let replaced = snapshot.is_tagged(revision);

        if replaced {
            if !force {
                tracing::info!("Revision {} has already been tagged", revision);
                return Ok(TagOutcome::AlreadyTagged(revision));
            }

            let message = format!("Forcing removal of tag {revision} for re-deployment.");
            tracing::info!("{}", message);
            self.log_command(&format!("remove {tag_url}"));

            let output = self.vcs.remove(&tag_url, &message).await?;
            check(output, |output| TagError::RemoveFailed { revision, output })?;
        }

        let message = format!("Tagging trunk at revision {revision}...");
        tracing::info!("{}", message);
        let trunk_url = repository.trunk();
        self.log_command(&format!("copy {trunk_url} {tag_url}"));

        let output = self.vcs.copy(&trunk_url, &tag_url, &message).await?;
        check(output, |output| TagError::CopyFailed { revision, output })?;

        let previous = snapshot.previous_tag(revision);
        let notified = self
            .announcer
            .announce(app, repository, revision, previous, diag)
            .await;

        tracing::info!("Tagged {} at revision {}", app, revision);
        Ok(TagOutcome::Created {
            revision,
            previous,
            replaced,
            notified,
        })
    }

    fn log_command(&self, command: &str) {
        if self.verbose {
            tracing::info!("Running command: {}", command);
        }
    }
}

fn check(
    output: CommandOutput,
    error: impl FnOnce(String) -> TagError,
) -> Result<CommandOutput, TagError> {
    if output.success() {
        Ok(output)
    } else {
        tracing::error!("Tag command failed: {}", output.combined());
        Err(error(output.combined()))
    }
}
