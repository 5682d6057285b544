//! Retry loop: run a fetch until success, a permanent error, or the timeout bound.

use super::classify;
use super::error::FetchError;
use super::policy::{RetryDecision, RetryPolicy};
use crate::run_log::RunLog;

/// Runs `f` until it succeeds or the retry policy says to stop, logging each
/// timeout to the run log. On success, sleeps `policy.delay` before returning.
///
/// The timeout counter is local to this call, so every fetch starts fresh.
pub fn run_with_retry<T, F>(
    policy: &RetryPolicy,
    url: &str,
    log: &mut RunLog,
    mut f: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Result<T, FetchError>,
{
    let mut timeouts = 0u32;
    loop {
        match f() {
            Ok(value) => {
                if !policy.delay.is_zero() {
                    std::thread::sleep(policy.delay);
                }
                return Ok(value);
            }
            Err(e) => {
                let kind = classify::classify(&e);
                if kind == super::ErrorKind::Timeout {
                    timeouts += 1;
                }
                match policy.decide(timeouts, kind) {
                    RetryDecision::NoRetry => return Err(e),
                    RetryDecision::Exhausted => {
                        log.print_line(&format!("Max tries {} exceeded.", policy.max_retries))?;
                        tracing::warn!(url, timeouts, "giving up after repeated timeouts");
                        return Err(FetchError::RetriesExhausted {
                            url: url.to_string(),
                            attempts: timeouts,
                        });
                    }
                    RetryDecision::Retry => {
                        log.print_line(&format!(
                            "Connection timed out on \"{}\"!! :-( Try #{}.",
                            url, timeouts
                        ))?;
                    }
                }
            }
        }
    }
}
