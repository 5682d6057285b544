//! Top-level run: log, connect, scrape, write, deliver, disconnect.
//!
//! Any failure after the run log is open goes through [`Pipeline::fail`]:
//! the error is written to the log, the log is closed and pushed to the
//! server once, and the original error is returned so the process can exit
//! non-zero.

mod error;

pub use error::{FailureKind, PipelineError};

use std::path::{Path, PathBuf};

use crate::config::{KvrxConfig, OutputConfig, SiteConfig};
use crate::delivery::{DeliveryClient, DeliveryError, FtpTransport};
use crate::fetch::{PageSource, RetryingFetcher};
use crate::record;
use crate::run_log::RunLog;
use crate::scrape::{site_root, ScheduleScraper, ScheduleSelectors};
use crate::show::ShowRecord;
use crate::VERSION;

/// Where a run currently is. `Fatal` can be entered from any stage after
/// `LogOpen`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    LogOpen,
    Connected,
    Scraping,
    Writing,
    Delivering,
    Disconnected,
    Done,
    Fatal,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub shows: usize,
    pub schedule_file: PathBuf,
    pub log_file: PathBuf,
    /// Both uploads got a positive completion reply. Always false for local runs.
    pub delivered: bool,
}

pub struct Pipeline<S, T> {
    site: SiteConfig,
    output: OutputConfig,
    fetcher: RetryingFetcher<S>,
    delivery: DeliveryClient<T>,
    log: RunLog,
    stage: Stage,
}

/// Check the site selectors and base URL. Callers can run this before
/// opening a run log; a pipeline runs it again as its first step.
pub fn validate(site: &SiteConfig) -> Result<ScheduleSelectors, PipelineError> {
    let selectors =
        ScheduleSelectors::from_site(site).map_err(|e| PipelineError::Config(e.to_string()))?;
    site_root(site).map_err(|e| PipelineError::Config(e.to_string()))?;
    Ok(selectors)
}

impl<S: PageSource, T: FtpTransport> Pipeline<S, T> {
    /// Build a pipeline around an already opened run log. Nothing is checked
    /// here: every problem surfaces from `run`/`run_local`, after the log is
    /// open, and goes through the fatal path.
    pub fn new(cfg: &KvrxConfig, source: S, transport: T, log: RunLog) -> Self {
        Self {
            site: cfg.site.clone(),
            output: cfg.output.clone(),
            fetcher: RetryingFetcher::new(source, cfg.fetch.retry_policy()),
            delivery: DeliveryClient::new(transport),
            log,
            stage: Stage::LogOpen,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Full run: scrape, write the schedule file and ship it plus the log.
    pub fn run(mut self) -> Result<RunSummary, PipelineError> {
        match self.run_stages(true) {
            Ok(summary) => Ok(summary),
            Err(e) => {
                self.fail(&e, true);
                Err(e)
            }
        }
    }

    /// Scrape and write the schedule file locally; nothing is delivered.
    pub fn run_local(mut self) -> Result<RunSummary, PipelineError> {
        match self.run_stages(false) {
            Ok(summary) => Ok(summary),
            Err(e) => {
                self.fail(&e, false);
                Err(e)
            }
        }
    }

    fn enter(&mut self, next: Stage) {
        tracing::debug!(from = ?self.stage, to = ?next, "pipeline stage");
        self.stage = next;
    }

    fn run_stages(&mut self, deliver: bool) -> Result<RunSummary, PipelineError> {
        self.log
            .print_line(&format!("KVRX Schedule Downloader v{}\n", VERSION))?;
        let selectors = validate(&self.site)?;

        if deliver {
            self.delivery.connect(&mut self.log)?;
            self.enter(Stage::Connected);
        }

        self.enter(Stage::Scraping);
        let shows = self.scrape(&selectors)?;

        self.enter(Stage::Writing);
        let schedule_file = self.write_schedule(&shows)?;

        let mut delivered = false;
        let log_file;
        if deliver {
            self.enter(Stage::Delivering);
            let schedule_ok = self.delivery.push(&schedule_file, &mut self.log)?;
            log_file = self.log.close()?;
            let log_ok = self.delivery.push(&log_file, &mut self.log)?;
            delivered = schedule_ok && log_ok;

            self.delivery.disconnect()?;
            self.enter(Stage::Disconnected);
        } else {
            log_file = self.log.close()?;
        }

        self.enter(Stage::Done);
        tracing::info!(shows = shows.len(), delivered, "run complete");
        Ok(RunSummary {
            shows: shows.len(),
            schedule_file,
            log_file,
            delivered,
        })
    }

    fn scrape(&mut self, selectors: &ScheduleSelectors) -> Result<Vec<ShowRecord>, PipelineError> {
        let mut scraper = ScheduleScraper::new(&mut self.fetcher, selectors, &self.site)?;
        Ok(scraper.scrape(&mut self.log)?)
    }

    fn write_schedule(&mut self, shows: &[ShowRecord]) -> Result<PathBuf, PipelineError> {
        let path = self.output.schedule_file.clone();
        record::write_records(&path, shows)
            .map_err(|source| PipelineError::Filesystem { path, source })
    }

    /// The fatal path. Best effort: problems here are reported on stderr and
    /// in the diagnostic log, never raised over the original error.
    fn fail(&mut self, err: &PipelineError, deliver: bool) {
        let failed_in = self.stage;
        self.enter(Stage::Fatal);
        tracing::error!(stage = ?failed_in, kind = ?err.kind(), "run failed: {}", err);

        if self.log.is_closed() {
            return;
        }
        if let Err(e) = self
            .log
            .print_line(&format!("Download aborting due to:\n{}", err))
        {
            tracing::error!("could not record failure in run log: {}", e);
        }
        let log_file = match self.log.close() {
            Ok(path) => path,
            Err(e) => {
                tracing::error!("could not close run log: {}", e);
                return;
            }
        };

        if !deliver {
            return;
        }
        // A session that just failed to open is not retried.
        if !self.delivery.is_connected() && err.kind() == FailureKind::Delivery {
            tracing::warn!("no ftp session; run log stays at {}", log_file.display());
            return;
        }
        if let Err(e) = self.deliver_log(&log_file) {
            tracing::error!("could not deliver run log after failure: {}", e);
            eprintln!("kvrx: could not deliver run log after failure: {}", e);
        }
    }

    fn deliver_log(&mut self, log_file: &Path) -> Result<(), DeliveryError> {
        if !self.delivery.is_connected() {
            self.delivery.connect(&mut self.log)?;
        }
        self.delivery.push(log_file, &mut self.log)?;
        self.delivery.disconnect()
    }
}
