//! `kvrx run` – scrape, write and deliver.

use anyhow::{Context, Result};
use kvrx_core::config::KvrxConfig;
use kvrx_core::delivery::CurlFtp;
use kvrx_core::fetch::CurlSource;
use kvrx_core::pipeline::{self, Pipeline};
use kvrx_core::run_log::RunLog;

pub fn run_pipeline(cfg: &KvrxConfig) -> Result<()> {
    // Problems found before the run log exists are reported on stderr only.
    pipeline::validate(&cfg.site)?;
    let source = CurlSource::new(&cfg.fetch).context("set up http client")?;
    let log = RunLog::create(&cfg.output.log_file).context("open run log")?;
    let ftp = CurlFtp::new(&cfg.ftp);

    let summary = Pipeline::new(cfg, source, ftp, log).run()?;
    if !summary.delivered {
        tracing::warn!("ftp server reported a negative reply for at least one upload");
    }
    tracing::info!(
        "delivered {} show(s) to {}",
        summary.shows,
        cfg.ftp.host
    );
    Ok(())
}
