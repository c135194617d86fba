//! Append-only activity log.
//!
//! Each job records what it did as plain text lines of the form
//! `<YYYY-MM-DD HH:MM:SS> - <message>`, local time. The file is opened in
//! append mode once per write and never truncated, so earlier lines are
//! always preserved.

use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};

/// Timestamp layout used at the start of every line.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Error writing to the activity log.
#[derive(Debug, thiserror::Error)]
#[error("Failed to append to activity log {path}: {source}")]
pub struct ActivityLogError {
    path: PathBuf,
    #[source]
    source: std::io::Error,
}

/// An append-only activity log file.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    path: PathBuf,
}

impl ActivityLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a single line stamped with the current local time.
    pub fn append(&self, message: &str) -> Result<(), ActivityLogError> {
        self.append_all(Local::now(), [message]).map(|_| ())
    }

    /// Append one line per message, all stamped with `at`.
    ///
    /// The lines are written with a single write call. Returns the number of
    /// lines written. An empty iterator still creates the file.
    pub fn append_all<I, S>(&self, at: DateTime<Local>, messages: I) -> Result<usize, ActivityLogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stamp = at.format(TIMESTAMP_FORMAT).to_string();
        let mut buf = String::new();
        let mut count = 0;
        for message in messages {
            buf.push_str(&format_line(&stamp, message.as_ref()));
            buf.push('\n');
            count += 1;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.error(e))?;
        file.write_all(buf.as_bytes()).map_err(|e| self.error(e))?;
        file.flush().map_err(|e| self.error(e))?;

        Ok(count)
    }

    fn error(&self, source: std::io::Error) -> ActivityLogError {
        ActivityLogError {
            path: self.path.clone(),
            source,
        }
    }
}

fn format_line(stamp: &str, message: &str) -> String {
    format!("{stamp} - {message}")
}
