//! Push result files to the station's FTP server.
//!
//! The client connects once, uploads any number of files under their base
//! names (overwriting remote copies) and disconnects. Every reply code is
//! reported through the run log; once the run log is closed (the log file
//! itself is being shipped) status lines go to the console only.

mod curl_ftp;
mod reply;

pub use curl_ftp::CurlFtp;
pub use reply::{handshake_codes, is_positive_completion, reply_code, ControlLine};

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::run_log::{RunLog, RunLogError};

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("ftp: {0}")]
    Curl(#[from] curl::Error),
    /// Connecting or logging in failed; carries whatever reply codes were seen.
    #[error("ftp handshake failed: {source}")]
    Handshake {
        connect_code: Option<u32>,
        login_code: Option<u32>,
        #[source]
        source: curl::Error,
    },
    #[error("local file: {0}")]
    Io(#[from] io::Error),
    #[error("not connected to the FTP server")]
    NotConnected,
    #[error("{} has no file name", .0.display())]
    NoFileName(PathBuf),
    #[error(transparent)]
    Log(#[from] RunLogError),
}

/// Reply codes observed while opening a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handshake {
    pub connect_code: u32,
    pub login_code: u32,
}

/// The file-transfer capability the delivery client needs.
pub trait FtpTransport {
    /// Open the control connection and log in (passive mode for data).
    fn connect(&mut self) -> Result<Handshake, DeliveryError>;
    /// Upload `local` as `remote_name`, returning the server's final reply code.
    fn store(&mut self, remote_name: &str, local: &Path) -> Result<u32, DeliveryError>;
    /// Log out and close the control connection.
    fn quit(&mut self) -> Result<(), DeliveryError>;
}

/// `"<what> Status: <code> Is Positive: <bool>"`
pub fn status_line(what: &str, code: u32) -> String {
    format!(
        "{} Status: {} Is Positive: {}",
        what,
        code,
        is_positive_completion(code)
    )
}

fn report(log: &mut RunLog, line: &str) -> Result<(), RunLogError> {
    if log.is_closed() {
        log.echo_line(line);
        Ok(())
    } else {
        log.print_line(line)
    }
}

pub struct DeliveryClient<T> {
    transport: T,
    connected: bool,
}

impl<T: FtpTransport> DeliveryClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            connected: false,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn connect(&mut self, log: &mut RunLog) -> Result<(), DeliveryError> {
        report(log, "Connecting to FTP server")?;
        match self.transport.connect() {
            Ok(h) => {
                report(log, &status_line("CONNECTION", h.connect_code))?;
                report(log, &status_line("LOGIN", h.login_code))?;
                self.connected = true;
                Ok(())
            }
            Err(e) => {
                if let DeliveryError::Handshake {
                    connect_code,
                    login_code,
                    ..
                } = &e
                {
                    if let Some(code) = connect_code {
                        report(log, &status_line("CONNECTION", *code))?;
                    }
                    if let Some(code) = login_code {
                        report(log, &status_line("LOGIN", *code))?;
                    }
                }
                Err(e)
            }
        }
    }

    /// Upload `path` under its base name. Returns whether the server reported
    /// positive completion; a negative reply is logged, not raised.
    pub fn push(&mut self, path: &Path, log: &mut RunLog) -> Result<bool, DeliveryError> {
        if !self.connected {
            return Err(DeliveryError::NotConnected);
        }
        let name = path
            .file_name()
            .ok_or_else(|| DeliveryError::NoFileName(path.to_path_buf()))?
            .to_string_lossy()
            .into_owned();

        let code = self.transport.store(&name, path)?;
        report(log, &status_line(&format!("STORE FILE {}", name), code))?;
        Ok(is_positive_completion(code))
    }

    pub fn disconnect(&mut self) -> Result<(), DeliveryError> {
        if !self.connected {
            return Ok(());
        }
        self.connected = false;
        self.transport.quit()
    }
}
