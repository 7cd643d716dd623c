//! CSV reading and writing on top of the `csv` crate
//!
//! Inventories are read with a header row, `#` comment lines, trimmed
//! fields and ragged rows allowed. A leading UTF-8 BOM is stripped by the
//! reader. Output is written with minimal quoting and `\n` terminators.

use csv::{ReaderBuilder, StringRecord, Terminator, Trim, WriterBuilder};

use crate::error::{MigsizeError, Result};

/// A parsed CSV document
#[derive(Debug, Clone)]
pub struct Table {
    /// Header names, trimmed and lower-cased
    pub header: Vec<String>,
    /// Data rows with their 1-based line numbers
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone)]
pub struct Row {
    pub line: usize,
    pub record: StringRecord,
}

impl Table {
    /// Column index by name
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    /// Column index by name, failing when the column is absent
    pub fn require(&self, name: &str) -> Result<usize> {
        self.column(name).ok_or_else(|| MigsizeError::MissingColumn {
            column: name.to_string(),
        })
    }
}

impl Row {
    /// Field at `index`, `None` when absent or empty
    pub fn get(&self, index: Option<usize>) -> Option<&str> {
        index
            .and_then(|i| self.record.get(i))
            .map(str::trim)
            .filter(|field| !field.is_empty())
    }

    fn is_blank(&self) -> bool {
        self.record.iter().all(|field| field.trim().is_empty())
    }
}

fn record_line(record: &StringRecord) -> usize {
    record
        .position()
        .map_or(0, |position| position.line() as usize)
}

/// Parse CSV text with a header row.
pub fn parse(text: &str) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .comment(Some(b'#'))
        .trim(Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let header = reader
        .headers()?
        .iter()
        .map(str::to_lowercase)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = Row {
            line: record_line(&record),
            record,
        };
        if !row.is_blank() {
            rows.push(row);
        }
    }

    Ok(Table { header, rows })
}

/// Write a header and rows as one CSV document.
pub fn write<I, R, S>(header: &[&str], rows: I) -> Result<String>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| MigsizeError::Other(e.to_string()))
}
