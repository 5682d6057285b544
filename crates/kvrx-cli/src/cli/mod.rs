//! CLI for the KVRX schedule scraper.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use kvrx_core::config::{self, KvrxConfig};
use std::path::{Path, PathBuf};

use commands::{run_config, run_pipeline, run_scrape};

/// Top-level CLI for the KVRX schedule scraper.
#[derive(Debug, Parser)]
#[command(name = "kvrx")]
#[command(about = "KVRX: scrape the station schedule and ship it to the FTP server", long_about = None)]
pub struct Cli {
    /// Config file to use instead of the XDG default (created if missing).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Scrape the schedule, write it, and deliver it plus the run log over FTP.
    Run,

    /// Scrape and write the schedule file locally without delivering anything.
    Scrape {
        /// Write the schedule here instead of the configured file.
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },

    /// Print the config file path and the effective configuration.
    Config,
}

fn load_config(path: Option<&Path>) -> Result<(PathBuf, KvrxConfig)> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config::config_path()?,
    };
    let cfg = config::load_or_init_at(&path)?;
    tracing::debug!("loaded config from {}: {:?}", path.display(), cfg);
    Ok((path, cfg))
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let (cfg_path, cfg) = load_config(cli.config.as_deref())?;

        match cli.command {
            CliCommand::Run => run_pipeline(&cfg)?,
            CliCommand::Scrape { out } => run_scrape(cfg, out)?,
            CliCommand::Config => run_config(&cfg_path, &cfg)?,
        }

        Ok(())
    }
}
