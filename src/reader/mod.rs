//! CSV schema mapping: turns a courier export CSV into [`InvoiceRecord`]s.
//!
//! The first row is read as headers and resolved into a header→column map;
//! the best-matching [`schemes::HeaderScheme`] then drives per-field
//! extraction. Missing headers and short rows fill with empty strings
//! rather than failing, and every such fallback is counted in the returned
//! [`CsvImport`] so callers can notice a degraded conversion.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;
use thiserror::Error;

use crate::invoice::InvoiceRecord;

pub mod schemes;

use schemes::{Extract, FieldRule};

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("CSV has no header row")]
    MissingHeaderRow,
    #[error("CSV headers do not match any known export scheme")]
    UnknownScheme,
    #[error(
        "combined field '{header}' holds '{value}': expected at least \
         {expected} whitespace-separated token(s)"
    )]
    MalformedField {
        header: &'static str,
        value: String,
        expected: usize,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result of one CSV read pass.
#[derive(Debug)]
pub struct CsvImport {
    /// Extracted records, in source row order.
    pub records: Vec<InvoiceRecord>,
    /// Name of the header scheme that was detected.
    pub scheme: &'static str,
    /// Fields that resolved to an empty string because their header was
    /// absent or the row was shorter than the header row.
    pub defaulted_fields: usize,
}

pub fn read_csv(path: &Path) -> Result<CsvImport, SchemaError> {
    read_from(File::open(path)?)
}

/// Reads records from any CSV source. Blank rows are skipped; all other
/// rows produce exactly one record, in input order.
pub fn read_from<R: Read>(input: R) -> Result<CsvImport, SchemaError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(SchemaError::MissingHeaderRow);
    }

    // Header→column map; a duplicated header keeps its last occurrence.
    let mut columns: HashMap<String, usize> = HashMap::new();
    for (index, name) in headers.iter().enumerate() {
        columns.insert(name.to_string(), index);
    }

    let scheme = schemes::detect(&columns).ok_or(SchemaError::UnknownScheme)?;
    debug!("detected '{}' header scheme", scheme.name);

    let mut records = Vec::new();
    let mut defaulted_fields = 0usize;
    for row in reader.records() {
        let row = row?;
        if row.iter().all(str::is_empty) {
            continue;
        }

        let mut record = InvoiceRecord::default();
        for rule in scheme.rules {
            let raw = lookup(&row, &columns, rule, &mut defaulted_fields);
            record.set(rule.field, extract(rule, raw)?);
        }
        record.derive_itinerary();
        records.push(record);
    }

    Ok(CsvImport {
        records,
        scheme: scheme.name,
        defaulted_fields,
    })
}

/// Resolves a rule's source cell. A header that is absent from the map, or
/// an index past the end of a short row, yields an empty string.
fn lookup<'r>(
    row: &'r csv::StringRecord,
    columns: &HashMap<String, usize>,
    rule: &FieldRule,
    defaulted_fields: &mut usize,
) -> &'r str {
    for name in rule.headers {
        if let Some(&index) = columns.get(*name) {
            if let Some(cell) = row.get(index) {
                return cell;
            }
        }
    }
    debug!("no usable '{}' column, defaulting to empty", rule.headers[0]);
    *defaulted_fields += 1;
    ""
}

fn extract(rule: &FieldRule, raw: &str) -> Result<String, SchemaError> {
    match rule.extract {
        Extract::Cell => Ok(raw.to_string()),
        // An empty combined value means the column was absent or blank;
        // the lenient-fill policy wins over the split rule there.
        Extract::Token(_) | Extract::LastToken if raw.is_empty() => Ok(String::new()),
        Extract::Token(index) => token(rule, raw, index),
        Extract::LastToken => raw
            .split_whitespace()
            .last()
            .map(str::to_string)
            .ok_or_else(|| malformed(rule, raw, 1)),
    }
}

fn token(rule: &FieldRule, raw: &str, index: usize) -> Result<String, SchemaError> {
    raw.split_whitespace()
        .nth(index)
        .map(str::to_string)
        .ok_or_else(|| malformed(rule, raw, index + 1))
}

fn malformed(rule: &FieldRule, raw: &str, expected: usize) -> SchemaError {
    SchemaError::MalformedField {
        header: rule.headers[0],
        value: raw.to_string(),
        expected,
    }
}

#[cfg(test)]
mod reader_tests;
