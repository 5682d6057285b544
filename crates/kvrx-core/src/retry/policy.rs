use std::time::Duration;

/// High-level classification of an error for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connect or transfer timed out; assumed transient.
    Timeout,
    /// Any other error; assumed permanent.
    Other,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Try the same URL again right away.
    Retry,
    /// Permanent error; give up without retrying.
    NoRetry,
    /// Too many consecutive timeouts.
    Exhausted,
}

/// Bounded immediate retry on timeout, plus a courtesy pause after success.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Consecutive timeouts allowed for one fetch; reaching it gives up.
    pub max_retries: u32,
    /// Pause applied after each successful fetch.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 20,
            delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Decide what to do after a failure.
    ///
    /// `timeouts` is the number of timeouts seen so far in this fetch,
    /// including the one being decided on.
    pub fn decide(&self, timeouts: u32, kind: ErrorKind) -> RetryDecision {
        match kind {
            ErrorKind::Other => RetryDecision::NoRetry,
            ErrorKind::Timeout if timeouts >= self.max_retries => RetryDecision::Exhausted,
            ErrorKind::Timeout => RetryDecision::Retry,
        }
    }
}
