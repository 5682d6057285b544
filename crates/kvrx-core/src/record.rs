//! Flat schedule file: three lines per show (`identifier`, `name`, `time_slot`).
//!
//! Fields are written verbatim. A field containing a line break makes the
//! file ambiguous on read-back; scraped text is whitespace-normalized, so
//! this does not happen for pages parsed by `scrape`.

use anyhow::{bail, Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::show::ShowRecord;

const LINES_PER_RECORD: usize = 3;

/// Write `records` to `path`, replacing any existing file. Missing parent
/// directories are created. Returns the path written.
pub fn write_records(path: &Path, records: &[ShowRecord]) -> std::io::Result<PathBuf> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?; // truncate/overwrite
    let mut out = BufWriter::new(file);
    for record in records {
        writeln!(out, "{}", record.identifier)?;
        writeln!(out, "{}", record.name)?;
        writeln!(out, "{}", record.time_slot)?;
    }
    out.flush()?;
    Ok(path.to_path_buf())
}

/// Read a schedule file back into records.
pub fn read_records(path: &Path) -> Result<Vec<ShowRecord>> {
    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_records(&data)
}

fn parse_records(data: &str) -> Result<Vec<ShowRecord>> {
    let lines: Vec<&str> = data.lines().collect();
    if lines.len() % LINES_PER_RECORD != 0 {
        bail!(
            "schedule file has {} lines, not a multiple of {}",
            lines.len(),
            LINES_PER_RECORD
        );
    }
    Ok(lines
        .chunks_exact(LINES_PER_RECORD)
        .map(|c| ShowRecord::new(c[0], c[1], c[2]))
        .collect())
}
