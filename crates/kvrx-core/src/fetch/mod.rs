//! Retrying document fetcher.
//!
//! Wraps a [`PageSource`] (libcurl in production) with the timeout retry
//! loop from [`crate::retry`] and parses the body into an HTML document.

mod http;

pub use http::CurlSource;

use scraper::Html;

use crate::retry::{run_with_retry, FetchError, RetryPolicy};
use crate::run_log::RunLog;

/// Something that can return the raw body of a URL.
pub trait PageSource {
    fn get(&mut self, url: &str) -> Result<String, FetchError>;
}

/// Fetches and parses pages, retrying timeouts per the policy.
pub struct RetryingFetcher<S> {
    source: S,
    policy: RetryPolicy,
}

impl<S: PageSource> RetryingFetcher<S> {
    pub fn new(source: S, policy: RetryPolicy) -> Self {
        Self { source, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch `url` and parse it. Timeouts are retried and logged; any other
    /// failure, or too many timeouts, is returned to the caller.
    pub fn fetch(&mut self, url: &str, log: &mut RunLog) -> Result<Html, FetchError> {
        let source = &mut self.source;
        let body = run_with_retry(&self.policy, url, log, || source.get(url))?;
        Ok(Html::parse_document(&body))
    }
}
