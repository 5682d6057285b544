//! Fakes shared by unit tests: a scripted page source, a recording FTP
//! transport and a console buffer.

use std::collections::{HashMap, VecDeque};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::delivery::{DeliveryError, FtpTransport, Handshake};
use crate::fetch::PageSource;
use crate::retry::FetchError;

const CURLE_COULDNT_CONNECT: u32 = 7;
const CURLE_OPERATION_TIMEDOUT: u32 = 28;

/// Console sink whose contents can be read after it was moved into a `RunLog`.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum Scripted {
    Page(String),
    Timeout,
    Refused,
    Status(u32),
}

/// Page source answering from per-URL queues. The last queued answer for a
/// URL repeats forever.
#[derive(Default)]
pub struct ScriptedSource {
    routes: HashMap<String, VecDeque<Scripted>>,
    pub requests: Vec<String>,
}

impl ScriptedSource {
    pub fn respond(&mut self, url: &str, answer: Scripted) -> &mut Self {
        self.routes
            .entry(url.to_string())
            .or_default()
            .push_back(answer);
        self
    }

    pub fn page(&mut self, url: &str, html: &str) -> &mut Self {
        self.respond(url, Scripted::Page(html.to_string()))
    }

    pub fn timeouts(&mut self, url: &str, n: usize) -> &mut Self {
        for _ in 0..n {
            self.respond(url, Scripted::Timeout);
        }
        self
    }

    pub fn requests_for(&self, url: &str) -> usize {
        self.requests.iter().filter(|u| *u == url).count()
    }
}

impl PageSource for ScriptedSource {
    fn get(&mut self, url: &str) -> Result<String, FetchError> {
        self.requests.push(url.to_string());
        let queue = self.routes.get_mut(url);
        let answer = match queue {
            Some(q) if q.len() > 1 => q.pop_front(),
            Some(q) => q.front().cloned(),
            None => None,
        };
        match answer {
            Some(Scripted::Page(html)) => Ok(html),
            Some(Scripted::Timeout) => Err(curl::Error::new(CURLE_OPERATION_TIMEDOUT).into()),
            Some(Scripted::Refused) => Err(curl::Error::new(CURLE_COULDNT_CONNECT).into()),
            Some(Scripted::Status(code)) => Err(FetchError::Http {
                url: url.to_string(),
                code,
            }),
            None => Err(FetchError::Http {
                url: url.to_string(),
                code: 404,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FtpCall {
    Connect,
    Store { name: String, contents: String },
    Quit,
}

/// FTP transport that records calls instead of talking to a server.
#[derive(Clone, Default)]
pub struct RecordingFtp {
    calls: Arc<Mutex<Vec<FtpCall>>>,
    fail_connect: bool,
    fail_store: Option<String>,
}

impl RecordingFtp {
    pub fn failing_connect() -> Self {
        Self {
            fail_connect: true,
            ..Self::default()
        }
    }

    pub fn failing_store(remote_name: &str) -> Self {
        Self {
            fail_store: Some(remote_name.to_string()),
            ..Self::default()
        }
    }

    /// Shared view of the call list that stays valid after the transport is moved.
    pub fn calls(&self) -> Vec<FtpCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn stored_names(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                FtpCall::Store { name, .. } => Some(name),
                _ => None,
            })
            .collect()
    }
}

impl FtpTransport for RecordingFtp {
    fn connect(&mut self) -> Result<Handshake, DeliveryError> {
        self.calls.lock().unwrap().push(FtpCall::Connect);
        if self.fail_connect {
            return Err(curl::Error::new(CURLE_COULDNT_CONNECT).into());
        }
        Ok(Handshake {
            connect_code: 220,
            login_code: 230,
        })
    }

    fn store(&mut self, remote_name: &str, local: &Path) -> Result<u32, DeliveryError> {
        let contents = fs::read_to_string(local)?;
        self.calls.lock().unwrap().push(FtpCall::Store {
            name: remote_name.to_string(),
            contents,
        });
        if self.fail_store.as_deref() == Some(remote_name) {
            return Err(curl::Error::new(CURLE_OPERATION_TIMEDOUT).into());
        }
        Ok(226)
    }

    fn quit(&mut self) -> Result<(), DeliveryError> {
        self.calls.lock().unwrap().push(FtpCall::Quit);
        Ok(())
    }
}

pub const INDEX_URL: &str = "http://www.kvrx.org/schedule";

/// Index page listing `(link, name)` pairs inside the default container.
pub fn index_page(shows: &[(&str, &str)]) -> String {
    let rows: String = shows
        .iter()
        .map(|(link, name)| {
            format!(
                r#"<div class="views-row"><span class="field-content"><a href="{link}">{name}</a></span></div>"#
            )
        })
        .collect();
    format!(r#"<html><body><div id="single-day-container">{rows}</div></body></html>"#)
}

/// Show detail page carrying `time` in the default time region.
pub fn detail_page(time: &str) -> String {
    format!(r#"<html><body><h1>Show</h1><div class="program-times">{time}</div></body></html>"#)
}
