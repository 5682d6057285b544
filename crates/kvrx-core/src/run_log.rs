//! Run log: every line goes to the log file and to the operator's console.
//!
//! The log file is the artifact shipped to the FTP server at the end of a run
//! (or on the way out of a failed one), so it is closed exactly once and its
//! path outlives the open file handle.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunLogError {
    #[error("cannot create run log {path}: {source}")]
    Create { path: PathBuf, source: io::Error },
    #[error("run log write failed: {0}")]
    Write(#[source] io::Error),
    #[error("run log is closed")]
    Closed,
    #[error("run log was already closed")]
    AlreadyClosed,
}

/// Append-only log duplicated to a file sink and an interactive sink.
pub struct RunLog {
    path: PathBuf,
    /// `None` once closed.
    file: Option<BufWriter<File>>,
    console: Box<dyn Write + Send>,
}

impl RunLog {
    /// Create (truncate) the log file at `path`, echoing to stdout.
    pub fn create(path: &Path) -> Result<Self, RunLogError> {
        Self::with_console(path, Box::new(io::stdout()))
    }

    /// Create the log file at `path`, echoing to `console` instead of stdout.
    pub fn with_console(path: &Path, console: Box<dyn Write + Send>) -> Result<Self, RunLogError> {
        let file = File::create(path).map_err(|source| RunLogError::Create {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            file: Some(BufWriter::new(file)),
            console,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_closed(&self) -> bool {
        self.file.is_none()
    }

    /// Append `text` without a trailing newline.
    pub fn print(&mut self, text: &str) -> Result<(), RunLogError> {
        let file = self.file.as_mut().ok_or(RunLogError::Closed)?;
        file.write_all(text.as_bytes()).map_err(RunLogError::Write)?;
        // A console that went away must not abort the run; the file is the record.
        let _ = self.console.write_all(text.as_bytes());
        let _ = self.console.flush();
        tracing::info!(target: "run_log", partial = true, "{}", text);
        Ok(())
    }

    /// Append `text` followed by a newline.
    pub fn print_line(&mut self, text: &str) -> Result<(), RunLogError> {
        let file = self.file.as_mut().ok_or(RunLogError::Closed)?;
        file.write_all(text.as_bytes()).map_err(RunLogError::Write)?;
        file.write_all(b"\n").map_err(RunLogError::Write)?;
        let _ = writeln!(self.console, "{}", text);
        let _ = self.console.flush();
        tracing::info!(target: "run_log", "{}", text);
        Ok(())
    }

    /// Show `text` on the console only. Used for status lines produced after
    /// the file was closed (e.g. the upload of the log itself).
    pub fn echo_line(&mut self, text: &str) {
        let _ = writeln!(self.console, "{}", text);
        let _ = self.console.flush();
        tracing::info!(target: "run_log", "{}", text);
    }

    /// Flush and close the file, returning its path for delivery.
    /// Only one close per run is allowed.
    pub fn close(&mut self) -> Result<PathBuf, RunLogError> {
        let mut file = self.file.take().ok_or(RunLogError::AlreadyClosed)?;
        file.flush().map_err(RunLogError::Write)?;
        let file = file
            .into_inner()
            .map_err(|e| RunLogError::Write(e.into_error()))?;
        file.sync_all().map_err(RunLogError::Write)?;
        tracing::debug!("run log closed at {}", self.path.display());
        Ok(self.path.clone())
    }
}
