//! Plain HTTP GET of schedule pages via libcurl.

use std::time::Duration;

use super::PageSource;
use crate::config::FetchConfig;
use crate::retry::FetchError;

const USER_AGENT: &str = concat!("kvrx-schedule/", env!("CARGO_PKG_VERSION"));

/// Page source backed by one reused curl easy handle, so consecutive pages
/// from the same site share a connection.
pub struct CurlSource {
    easy: curl::easy::Easy,
}

impl CurlSource {
    pub fn new(cfg: &FetchConfig) -> Result<Self, FetchError> {
        let mut easy = curl::easy::Easy::new();
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.useragent(USER_AGENT)?;
        easy.connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))?;
        easy.timeout(Duration::from_secs(cfg.timeout_secs))?;
        Ok(Self { easy })
    }
}

impl PageSource for CurlSource {
    fn get(&mut self, url: &str) -> Result<String, FetchError> {
        let mut body: Vec<u8> = Vec::new();

        self.easy.url(url)?;
        self.easy.get(true)?;
        {
            let mut transfer = self.easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = self.easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(FetchError::Http {
                url: url.to_string(),
                code,
            });
        }
        tracing::debug!(url, bytes = body.len(), "fetched page");
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
