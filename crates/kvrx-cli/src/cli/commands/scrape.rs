//! `kvrx scrape` – scrape and write the schedule file, no delivery.

use anyhow::{Context, Result};
use kvrx_core::config::KvrxConfig;
use kvrx_core::delivery::CurlFtp;
use kvrx_core::fetch::CurlSource;
use kvrx_core::pipeline::{self, Pipeline};
use kvrx_core::run_log::RunLog;
use std::path::PathBuf;

pub fn run_scrape(mut cfg: KvrxConfig, out: Option<PathBuf>) -> Result<()> {
    if let Some(out) = out {
        cfg.output.schedule_file = out;
    }
    // Problems found before the run log exists are reported on stderr only.
    pipeline::validate(&cfg.site)?;
    let source = CurlSource::new(&cfg.fetch).context("set up http client")?;
    let log = RunLog::create(&cfg.output.log_file).context("open run log")?;
    // Never connected by a local run.
    let ftp = CurlFtp::new(&cfg.ftp);

    let summary = Pipeline::new(&cfg, source, ftp, log).run_local()?;
    println!(
        "{} show(s) written to {}",
        summary.shows,
        summary.schedule_file.display()
    );
    Ok(())
}
