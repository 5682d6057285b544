//! Page fetch error type for retry classification.

use thiserror::Error;

use crate::run_log::RunLogError;

/// Error returned by a page fetch (curl failure, HTTP error, or exhausted retries).
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("GET {url} returned HTTP {code}")]
    Http { url: String, code: u32 },
    /// A show link could not be resolved against the site root.
    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    /// A show on the index page carries no link to its own page.
    #[error("show {name:?} has no link")]
    MissingLink { name: String },
    /// Every attempt timed out until the retry bound was reached.
    #[error("max tries {attempts} exceeded on {url}")]
    RetriesExhausted { url: String, attempts: u32 },
    /// The run log rejected a progress line.
    #[error(transparent)]
    Log(#[from] RunLogError),
}
