//! FTP transport over libcurl.
//!
//! One easy handle is kept for the whole session: libcurl caches the control
//! connection on the handle, so every upload after `connect` reuses the same
//! logged-in session. Dropping the handle sends QUIT and closes it.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str;
use std::time::Duration;

use curl::easy::{Easy, InfoType, ReadError};

use super::reply::{handshake_codes, ControlLine};
use super::{DeliveryError, FtpTransport, Handshake};
use crate::config::FtpConfig;

pub struct CurlFtp {
    /// `ftp://host:port/`; remote names are appended to it.
    base_url: String,
    login: String,
    password: String,
    connect_timeout: Duration,
    easy: Option<Easy>,
}

impl CurlFtp {
    pub fn new(cfg: &FtpConfig) -> Self {
        Self {
            base_url: format!("ftp://{}:{}/", cfg.host, cfg.port),
            login: cfg.login.clone(),
            password: cfg.password.clone(),
            connect_timeout: Duration::from_secs(30),
            easy: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn open_handle(&self) -> Result<Easy, curl::Error> {
        let mut easy = Easy::new();
        easy.username(&self.login)?;
        easy.password(&self.password)?;
        easy.connect_timeout(self.connect_timeout)?;
        // No active-mode port is set, so libcurl opens data channels in
        // passive mode (EPSV, falling back to PASV).
        Ok(easy)
    }
}

impl FtpTransport for CurlFtp {
    fn connect(&mut self) -> Result<Handshake, DeliveryError> {
        let mut easy = self.open_handle()?;
        easy.url(&self.base_url)?;
        // Log in and stop: no listing, no transfer.
        easy.nobody(true)?;
        easy.verbose(true)?;

        let mut transcript: Vec<ControlLine> = Vec::new();
        let performed = {
            let mut transfer = easy.transfer();
            transfer.debug_function(|kind, data| {
                let Ok(text) = str::from_utf8(data) else {
                    return;
                };
                for line in text.lines().filter(|l| !l.trim().is_empty()) {
                    match kind {
                        InfoType::HeaderIn => transcript.push(ControlLine::Reply(line.to_string())),
                        InfoType::HeaderOut => {
                            transcript.push(ControlLine::Command(line.to_string()))
                        }
                        _ => {}
                    }
                }
            })?;
            transfer.perform()
        };

        let (greeting, login) = handshake_codes(&transcript);
        if let Err(source) = performed {
            return Err(DeliveryError::Handshake {
                connect_code: greeting,
                login_code: login,
                source,
            });
        }

        easy.verbose(false)?;
        easy.nobody(false)?;
        let last = easy.response_code()?;
        self.easy = Some(easy);
        tracing::debug!(url = %self.base_url, "ftp session established");

        Ok(Handshake {
            connect_code: greeting.unwrap_or(0),
            login_code: login.unwrap_or(last),
        })
    }

    fn store(&mut self, remote_name: &str, local: &Path) -> Result<u32, DeliveryError> {
        let easy = self.easy.as_mut().ok_or(DeliveryError::NotConnected)?;
        let mut file = File::open(local)?;
        let len = file.metadata()?.len();

        easy.url(&format!("{}{}", self.base_url, remote_name))?;
        easy.upload(true)?;
        easy.in_filesize(len)?;
        {
            let mut transfer = easy.transfer();
            transfer.read_function(|buf| file.read(buf).map_err(|_| ReadError::Abort))?;
            transfer.perform()?;
        }
        easy.upload(false)?;

        let code = easy.response_code()?;
        tracing::debug!(remote_name, bytes = len, code, "ftp store finished");
        Ok(code)
    }

    fn quit(&mut self) -> Result<(), DeliveryError> {
        if self.easy.take().is_some() {
            tracing::debug!(url = %self.base_url, "ftp session closed");
        }
        Ok(())
    }
}
