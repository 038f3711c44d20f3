// ABOUTME: Release notes for a newly created tag and their delivery.
// ABOUTME: Writes comments/summary/diff artifacts and mails the combined notes.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::mailer::{Email, Notifier};
use crate::config::NotifyConfig;
use crate::diagnostics::{Diagnostics, Warning};
use crate::process::CommandOutput;
use crate::types::{AppName, Revision};
use crate::vcs::{RepositoryUrl, VcsError, VersionControl};

const INITIAL_RELEASE: &str = "(initial release)";

/// What changed between the previous release and this one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseNotes {
    pub app: AppName,
    pub latest: Revision,
    /// Previous tag, `None` for the first release.
    pub previous: Option<Revision>,
    pub comments: String,
    pub summary: String,
    pub diff: String,
    pub released_at: DateTime<Utc>,
    pub host: String,
}

impl ReleaseNotes {
    pub fn subject(&self) -> String {
        format!("[{}] Revision {} Released", self.app, self.latest)
    }

    pub fn body(&self) -> String {
        let headline = match self.previous {
            Some(previous) => format!(
                "\"{}\" has been updated to r{} from r{}.",
                self.app, self.latest, previous
            ),
            None => format!("\"{}\" has been released at r{}.", self.app, self.latest),
        };

        format!(
            "{headline}\n\n\
             ==================\nCommit Comments\n==================\n{}\n\n\n\
             ==================\nSummary of Changes\n==================\n{}\n\n\n\
             ==================\nDiff\n==================\n{}\n\n\
             Released {} from {}.\n",
            self.comments.trim_end(),
            self.summary.trim_end(),
            self.diff.trim_end(),
            self.released_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.host,
        )
    }

    /// Path of one artifact: `<dir>/<app>.r<rev>.<extension>`.
    pub fn artifact_path(&self, dir: &Path, extension: &str) -> PathBuf {
        dir.join(format!("{}.r{}.{}", self.app, self.latest, extension))
    }

    /// Write `.comments`, `.summary`, and `.diff` files into `dir`.
    pub fn write_artifacts(&self, dir: &Path) -> std::io::Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;

        let mut written = Vec::with_capacity(3);
        for (extension, content) in [
            ("comments", &self.comments),
            ("summary", &self.summary),
            ("diff", &self.diff),
        ] {
            let path = self.artifact_path(dir, extension);
            tracing::info!("Saving {} of release to {}", extension, path.display());
            std::fs::write(&path, content)?;
            written.push(path);
        }
        Ok(written)
    }
}

/// Collects, saves, and delivers release notes after a tag is created.
pub struct ReleaseAnnouncer<'a, V, N> {
    vcs: &'a V,
    notification: Option<(&'a N, &'a NotifyConfig)>,
    log_dir: PathBuf,
}

impl<'a, V: VersionControl, N: Notifier> ReleaseAnnouncer<'a, V, N> {
    pub fn new(vcs: &'a V, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            vcs,
            notification: None,
            log_dir: log_dir.into(),
        }
    }

    /// Mail the notes with `notifier` using the addresses in `config`.
    pub fn notify_with(mut self, notifier: &'a N, config: &'a NotifyConfig) -> Self {
        self.notification = Some((notifier, config));
        self
    }

    /// Gather commit comments and diffs between `previous` and `latest` tags.
    pub async fn collect(
        &self,
        app: &AppName,
        repository: &RepositoryUrl,
        latest: Revision,
        previous: Option<Revision>,
    ) -> Result<ReleaseNotes, VcsError> {
        let (comments, summary, diff) = match previous {
            Some(previous) => {
                let old = repository.tag(previous);
                let new = repository.tag(latest);
                let comments = self.vcs.log(&repository.trunk(), previous, latest).await?;
                let summary = self.vcs.diff(&old, &new, true).await?;
                let diff = self.vcs.diff(&old, &new, false).await?;
                (section(comments), section(summary), section(diff))
            }
            None => {
                let comments = self.vcs.log(&repository.trunk(), latest, latest).await?;
                (
                    section(comments),
                    INITIAL_RELEASE.to_string(),
                    INITIAL_RELEASE.to_string(),
                )
            }
        };

        Ok(ReleaseNotes {
            app: app.clone(),
            latest,
            previous,
            comments,
            summary,
            diff,
            released_at: Utc::now(),
            host: gethostname::gethostname().to_string_lossy().into_owned(),
        })
    }

    /// Collect, save, and mail release notes. Failures become warnings.
    ///
    /// Returns true when a notification was delivered.
    pub async fn announce(
        &self,
        app: &AppName,
        repository: &RepositoryUrl,
        latest: Revision,
        previous: Option<Revision>,
        diag: &mut Diagnostics,
    ) -> bool {
        let notes = match self.collect(app, repository, latest, previous).await {
            Ok(notes) => notes,
            Err(e) => {
                diag.warn(Warning::notification(format!(
                    "could not collect release notes for r{latest}: {e}"
                )));
                return false;
            }
        };

        if let Err(e) = notes.write_artifacts(&self.log_dir) {
            diag.warn(Warning::artifacts(format!(
                "could not save release notes in {}: {e}",
                self.log_dir.display()
            )));
        }

        let Some((notifier, config)) = self.notification else {
            tracing::info!("Notifications disabled; not announcing r{}", latest);
            return false;
        };

        let email = Email {
            from: config.from.clone(),
            to: config.to.clone(),
            subject: notes.subject(),
            body: notes.body(),
        };

        match notifier.send(&email).await {
            Ok(()) => true,
            Err(e) => {
                diag.warn(Warning::notification(format!(
                    "release notification for r{latest} failed: {e}"
                )));
                false
            }
        }
    }
}

fn section(output: CommandOutput) -> String {
    if output.success() {
        output.stdout
    } else {
        tracing::warn!("Release note query failed: {}", output.combined());
        format!("(unavailable: {})", output.combined().trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notes(previous: Option<u64>) -> ReleaseNotes {
        ReleaseNotes {
            app: AppName::new("shop").unwrap(),
            latest: Revision::new(43),
            previous: previous.map(Revision::new),
            comments: "r43 | dana | fix checkout\n".into(),
            summary: "M  index.php\n".into(),
            diff: "-old\n+new\n".into(),
            released_at: DateTime::from_timestamp(0, 0).unwrap(),
            host: "buildbox".into(),
        }
    }

    #[test]
    fn subject_names_app_and_revision() {
        assert_eq!(notes(Some(42)).subject(), "[shop] Revision 43 Released");
    }

    #[test]
    fn body_has_all_sections() {
        let body = notes(Some(42)).body();
        assert!(body.starts_with("\"shop\" has been updated to r43 from r42.\n"));
        assert!(body.contains("Commit Comments\n==================\nr43 | dana | fix checkout\n"));
        assert!(body.contains("Summary of Changes\n==================\nM  index.php\n"));
        assert!(body.contains("Diff\n==================\n-old\n+new\n"));
        assert!(body.contains("Released 1970-01-01 00:00:00 UTC from buildbox."));
    }

    #[test]
    fn first_release_headline() {
        assert!(notes(None).body().starts_with("\"shop\" has been released at r43."));
    }

    #[test]
    fn artifacts_are_named_after_revision() {
        let dir = tempfile::tempdir().unwrap();
        let written = notes(Some(42)).write_artifacts(dir.path()).unwrap();

        let names: Vec<_> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["shop.r43.comments", "shop.r43.summary", "shop.r43.diff"]);
        assert_eq!(
            std::fs::read_to_string(&written[1]).unwrap(),
            "M  index.php\n"
        );
    }
}
