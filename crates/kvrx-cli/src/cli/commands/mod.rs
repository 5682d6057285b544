//! CLI command handlers, one file per command.

mod config;
mod run;
mod scrape;

pub use config::run_config;
pub use run::run_pipeline;
pub use scrape::run_scrape;
