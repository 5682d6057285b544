//! Pull show entries and time slots out of parsed schedule pages.

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use crate::config::SiteConfig;

#[derive(Debug, Error)]
#[error("invalid CSS selector {selector:?} for {field}: {reason}")]
pub struct SelectorError {
    pub field: &'static str,
    pub selector: String,
    pub reason: String,
}

/// Compiled selectors for the index and detail pages.
#[derive(Debug, Clone)]
pub struct ScheduleSelectors {
    container: Selector,
    show: Selector,
    link: Selector,
    time: Selector,
}

fn compile(field: &'static str, selector: &str) -> Result<Selector, SelectorError> {
    Selector::parse(selector).map_err(|e| SelectorError {
        field,
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

impl ScheduleSelectors {
    pub fn from_site(site: &SiteConfig) -> Result<Self, SelectorError> {
        Ok(Self {
            container: compile("container_selector", &site.container_selector)?,
            show: compile("show_selector", &site.show_selector)?,
            link: compile("link", "a")?,
            time: compile("time_selector", &site.time_selector)?,
        })
    }
}

/// A show as listed on the index page, before its detail page is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowEntry {
    pub link: String,
    pub name: String,
}

/// Text content of an element with runs of whitespace collapsed to one space.
pub fn normalized_text(el: ElementRef<'_>) -> String {
    let raw: String = el.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Show elements inside the container region(s), in document order.
pub fn show_entries(page: &Html, sel: &ScheduleSelectors) -> Vec<ShowEntry> {
    page.select(&sel.container)
        .flat_map(|container| container.select(&sel.show))
        .map(|show| {
            let link = show
                .select(&sel.link)
                .find_map(|a| a.value().attr("href"))
                .unwrap_or_default()
                .trim()
                .to_string();
            ShowEntry {
                link,
                name: normalized_text(show),
            }
        })
        .collect()
}

/// Time-slot text of a detail page; multiple matches are joined with a space.
pub fn time_slot(page: &Html, sel: &ScheduleSelectors) -> String {
    page.select(&sel.time)
        .map(normalized_text)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
