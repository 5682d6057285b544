//! One scheduled program as scraped from the station site.

use std::fmt;

/// A show on the schedule. All three fields are filled in the same scrape
/// iteration; there is no partially built record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowRecord {
    /// Relative link path of the show page; stable key for the consumer.
    pub identifier: String,
    pub name: String,
    /// Free-text air time, as printed on the show page.
    pub time_slot: String,
}

impl ShowRecord {
    pub fn new(
        identifier: impl Into<String>,
        name: impl Into<String>,
        time_slot: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            time_slot: time_slot.into(),
        }
    }
}

/// Renders the display name; used in run-log progress lines.
impl fmt::Display for ShowRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
