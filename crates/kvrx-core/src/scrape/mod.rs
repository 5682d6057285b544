//! Two-level schedule scrape: the index page lists the shows, each show's
//! own page carries its air time.

mod parse;

pub use parse::{normalized_text, show_entries, time_slot, ScheduleSelectors, SelectorError, ShowEntry};

use url::Url;

use crate::config::SiteConfig;
use crate::fetch::{PageSource, RetryingFetcher};
use crate::retry::FetchError;
use crate::run_log::RunLog;
use crate::show::ShowRecord;

/// Resolve `link` against the site root. Links from the index page are
/// root-relative paths, but absolute links are accepted as-is.
pub fn resolve(base: &Url, link: &str) -> Result<Url, FetchError> {
    base.join(link).map_err(|source| FetchError::InvalidUrl {
        url: link.to_string(),
        source,
    })
}

/// Site root parsed from config.
pub fn site_root(site: &SiteConfig) -> Result<Url, FetchError> {
    Url::parse(&site.base_url).map_err(|source| FetchError::InvalidUrl {
        url: site.base_url.clone(),
        source,
    })
}

pub struct ScheduleScraper<'a, S> {
    fetcher: &'a mut RetryingFetcher<S>,
    selectors: &'a ScheduleSelectors,
    base: Url,
    index_path: String,
}

impl<'a, S: PageSource> ScheduleScraper<'a, S> {
    pub fn new(
        fetcher: &'a mut RetryingFetcher<S>,
        selectors: &'a ScheduleSelectors,
        site: &SiteConfig,
    ) -> Result<Self, FetchError> {
        Ok(Self {
            fetcher,
            selectors,
            base: site_root(site)?,
            index_path: site.index_path.clone(),
        })
    }

    /// Fetch the index, then every show page in listing order.
    ///
    /// The first failure aborts the scrape; records gathered so far are dropped.
    pub fn scrape(&mut self, log: &mut RunLog) -> Result<Vec<ShowRecord>, FetchError> {
        log.print_line("Connecting to schedule page.")?;
        let index_url = resolve(&self.base, &self.index_path)?;
        let index = self.fetcher.fetch(index_url.as_str(), log)?;

        log.print_line("Gathering show information.")?;
        let entries = show_entries(&index, self.selectors);
        drop(index);
        log.print_line(&format!("Found {} shows.", entries.len()))?;

        let mut shows = Vec::with_capacity(entries.len());
        for (i, entry) in entries.into_iter().enumerate() {
            if entry.link.is_empty() {
                return Err(FetchError::MissingLink { name: entry.name });
            }
            let page_url = resolve(&self.base, &entry.link)?;
            let page = self.fetcher.fetch(page_url.as_str(), log)?;
            let time = time_slot(&page, self.selectors);

            let show = ShowRecord::new(entry.link, entry.name, time);
            log.print_line(&format!("Got Show #{} \"{}\"", i + 1, show))?;
            shows.push(show);
        }

        log.print_line("Schedule Download Complete. :)")?;
        Ok(shows)
    }
}
