//! Retry policy for page fetches.
//!
//! Timeouts are expected from the station site and are retried immediately
//! up to a fixed bound; anything else is treated as permanent. A successful
//! fetch is followed by a fixed pause so the site is not hammered.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error};
pub use error::FetchError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
