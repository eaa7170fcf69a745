//! Outbound alert delivery. The budget core hands a finished message to a
//! [`Notifier`] and only logs the outcome.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use chrono::Utc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("mail delivery unavailable: {0}")]
    Unavailable(String),
    #[error("no recipients configured")]
    NoRecipients,
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Delivers a plain-text message to a list of recipients, best effort.
pub trait Notifier: Send + Sync {
    fn notify(&self, recipients: &[String], subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// Notifier that only records the message in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, recipients: &[String], subject: &str, body: &str) -> Result<(), NotifyError> {
        info!(recipients = ?recipients, subject, body, "budget alert");
        Ok(())
    }
}

/// Writes each message as an `.eml` file into an outbox directory, where a
/// mail client or relay can pick it up.
#[derive(Debug, Clone)]
pub struct OutboxNotifier {
    dir: PathBuf,
}

impl OutboxNotifier {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Messages currently waiting in the outbox, oldest first.
    pub fn pending(&self) -> Result<Vec<PathBuf>, NotifyError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("eml") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

impl Notifier for OutboxNotifier {
    fn notify(&self, recipients: &[String], subject: &str, body: &str) -> Result<(), NotifyError> {
        if recipients.is_empty() {
            return Err(NotifyError::NoRecipients);
        }
        fs::create_dir_all(&self.dir).map_err(|err| {
            NotifyError::Unavailable(format!("outbox {}: {}", self.dir.display(), err))
        })?;
        let now = Utc::now();
        let simple = Uuid::new_v4().simple().to_string();
        let file_name = format!("alert_{}_{}.eml", now.format("%Y%m%dT%H%M%S"), &simple[..8]);
        let path = self.dir.join(file_name);
        let mut file = fs::File::create(&path)?;
        write!(
            file,
            "To: {}\r\nSubject: {}\r\nDate: {}\r\nContent-Type: text/plain; charset=utf-8\r\n\r\n{}\r\n",
            recipients.join(", "),
            subject,
            now.to_rfc2822(),
            body
        )?;
        file.flush()?;
        info!(path = %path.display(), recipients = recipients.len(), "alert queued in outbox");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn outbox_writes_message_file() {
        let temp = TempDir::new().unwrap();
        let notifier = OutboxNotifier::new(temp.path().join("outbox"));
        notifier
            .notify(
                &["me@example.com".into(), "you@example.com".into()],
                "Over budget",
                "Remaining: -10.0$",
            )
            .unwrap();
        let pending = notifier.pending().unwrap();
        assert_eq!(pending.len(), 1);
        let contents = fs::read_to_string(&pending[0]).unwrap();
        assert!(contents.starts_with("To: me@example.com, you@example.com\r\n"));
        assert!(contents.contains("Subject: Over budget"));
        assert!(contents.ends_with("Remaining: -10.0$\r\n"));
    }

    #[test]
    fn log_notifier_accepts_any_message() {
        assert!(LogNotifier
            .notify(&["me@example.com".into()], "Over budget", "body")
            .is_ok());
    }

    #[test]
    fn outbox_requires_recipients() {
        let temp = TempDir::new().unwrap();
        let notifier = OutboxNotifier::new(temp.path());
        assert!(matches!(
            notifier.notify(&[], "s", "b"),
            Err(NotifyError::NoRecipients)
        ));
        assert!(notifier.pending().unwrap().is_empty());
    }

    #[test]
    fn outbox_blocked_by_file_is_unavailable() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("outbox");
        fs::write(&blocker, "not a directory").unwrap();
        let notifier = OutboxNotifier::new(&blocker);
        let err = notifier
            .notify(&["me@example.com".into()], "s", "b")
            .unwrap_err();
        assert!(matches!(err, NotifyError::Unavailable(_)));
    }
}
