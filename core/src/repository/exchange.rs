//! `category,date,value` CSV exchange.

use std::io::{Read, Write};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::model::dataset::Entry;

const HEADER: [&str; 3] = ["category", "date", "value"];
const DEFAULT_FILE_STEM: &str = "dataset";

/// Number-like parsing for the value column: blank is 0, anything
/// unparseable is NaN.
fn parse_value(raw: Option<&str>) -> f64 {
    match raw.map(str::trim) {
        None => f64::NAN,
        Some("") => 0.0,
        Some(s) => s.parse().unwrap_or(f64::NAN),
    }
}

/// Rows of an imported file plus the category named on its first data row.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvImport {
    pub category: Option<String>,
    pub entries: Vec<Entry>,
}

fn lossy_field(record: &csv::ByteRecord, index: usize) -> Option<String> {
    record
        .get(index)
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
}

/// Reads a CSV file. The first line is a header and is skipped; rows without a
/// date are dropped. Fields are decoded lossily, so stray non-UTF-8 bytes
/// never fail the import.
pub fn read_csv<R: Read>(reader: R) -> Result<CsvImport> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut category = None;
    let mut entries = Vec::new();
    for (row, record) in rdr.byte_records().enumerate() {
        let record = record.with_context(|| format!("Malformed CSV row {}", row + 1))?;

        let date = lossy_field(&record, 1).unwrap_or_default();
        let date = date.trim();
        if date.is_empty() {
            debug!(row = row + 1, "dropping row without date");
            continue;
        }
        if category.is_none() {
            category = lossy_field(&record, 0)
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty());
        }
        entries.push(Entry::new(date, parse_value(lossy_field(&record, 2).as_deref())));
    }

    info!(count = entries.len(), "imported entries");
    Ok(CsvImport { category, entries })
}

/// Reads entries from CSV, ignoring the category column.
pub fn read_entries<R: Read>(reader: R) -> Result<Vec<Entry>> {
    Ok(read_csv(reader)?.entries)
}

/// Writes `entries` in stored order with `category` on every row.
pub fn write_entries<W: Write>(writer: W, category: &str, entries: &[Entry]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER)?;
    for entry in entries {
        wtr.write_record([category, entry.date.as_str(), entry.value.to_string().as_str()])?;
    }
    wtr.flush()?;

    info!(category, count = entries.len(), "exported entries");
    Ok(())
}

/// `<name>.csv` with characters that are unsafe in file names replaced.
pub fn export_file_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let stem = sanitized.trim_matches('.');
    if stem.is_empty() {
        format!("{}.csv", DEFAULT_FILE_STEM)
    } else {
        format!("{}.csv", stem)
    }
}
