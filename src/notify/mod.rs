// ABOUTME: Production release notification.
// ABOUTME: Collects release notes from version control, saves them, and mails them.

mod announcer;
mod mailer;

pub use announcer::{ReleaseAnnouncer, ReleaseNotes};
pub use mailer::{Email, Notifier, NotifyError, SmtpNotifier};
