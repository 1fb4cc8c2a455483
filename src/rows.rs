//! Delimited text row reading shared by both importers.
//!
//! Uploads are a header record followed by data records. Blank records are
//! ignored anywhere in the file, and the first non-blank record is always the
//! header. The delimiter is sniffed once per upload: `;` when the text
//! contains one, otherwise `,`. Regional numbers in comma-delimited exports
//! carry decimal commas, so those fields arrive quoted (`"224,50"`).

use crate::constants::{PRIMARY_DELIMITER, SECONDARY_DELIMITER};
use crate::error::Result;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;

/// A data record with trimmed fields
#[derive(Debug, Clone, PartialEq)]
pub struct DataRow {
    /// 1-based line number where the record starts
    pub line_number: usize,
    pub record: StringRecord,
}

impl DataRow {
    /// True when the row carries at least `count` fields
    pub fn has_fields(&self, count: usize) -> bool {
        self.record.len() >= count
    }

    /// Field at `index`, empty when missing
    pub fn field(&self, index: usize) -> &str {
        self.record.get(index).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.record.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record.is_empty()
    }
}

/// Delimiter used for the whole upload
pub fn sniff_delimiter(text: &str) -> u8 {
    if text.contains(PRIMARY_DELIMITER) {
        PRIMARY_DELIMITER as u8
    } else {
        SECONDARY_DELIMITER as u8
    }
}

/// Read the data rows of an upload, skipping blank records and the header
pub fn data_rows(text: &str) -> Result<Vec<DataRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .delimiter(sniff_delimiter(text))
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    let mut header_seen = false;

    while reader.read_record(&mut record)? {
        if record.iter().all(str::is_empty) {
            continue;
        }
        if !header_seen {
            header_seen = true;
            continue;
        }

        let line_number = record.position().map_or(0, |p| p.line() as usize);
        rows.push(DataRow {
            line_number,
            record: record.clone(),
        });
    }

    Ok(rows)
}

/// Read a whole upload into memory, rejecting non-UTF-8 content
pub fn read_upload<R: Read>(mut reader: R) -> Result<String> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(String::from_utf8(bytes)?)
}
