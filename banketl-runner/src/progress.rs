//! Append-only progress log.
//!
//! One human-readable line per pipeline step:
//! `YYYY/MM/DD, HH:MM:SS : <message>`. The file is never truncated or rotated.
//! Logging is best-effort: a failed write is reported through `tracing` and
//! does not stop the pipeline.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use tracing::warn;

/// Timestamp layout of each log line.
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d, %H:%M:%S";

/// Format a single log line (without the trailing newline).
pub fn format_line(at: NaiveDateTime, message: &str) -> String {
    format!("{} : {message}", at.format(TIMESTAMP_FORMAT))
}

/// Handle to the progress log file.
#[derive(Debug, Clone)]
pub struct ProgressLog {
    path: PathBuf,
}

impl ProgressLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `message` with the current local time.
    pub fn try_log(&self, message: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        writeln!(file, "{}", format_line(Local::now().naive_local(), message))?;
        file.flush()
    }

    /// Best-effort variant of [`try_log`](Self::try_log).
    pub fn log(&self, message: &str) {
        if let Err(e) = self.try_log(message) {
            warn!(path = %self.path.display(), error = %e, "progress log write failed");
        }
    }
}
