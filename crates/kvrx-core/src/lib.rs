pub mod config;
pub mod logging;

pub mod delivery;
pub mod fetch;
pub mod pipeline;
pub mod record;
pub mod retry;
pub mod run_log;
pub mod scrape;
pub mod show;

#[cfg(test)]
pub(crate) mod test_support;

/// Version string written into the run log banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
