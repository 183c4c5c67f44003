//! Robust tabular reader.
//!
//! Uploaded sensor logs arrive with unreliable extensions, encodings, and
//! delimiters. The reader tries, in order:
//! 1. delimited text decoded as UTF-8 with a sniffed delimiter
//! 2. delimited text decoded as Latin-1
//! 3. a spreadsheet workbook (xlsx, xls, xlsb, ods), first sheet
//!
//! and reports [`sky_common::Error::UnreadableFile`] only when all fail.

use calamine::Reader as _;
use std::fmt;
use std::io::Cursor;
use thiserror::Error;
use tracing::{debug, info};

/// Delimiters considered when sniffing, in tie-break order.
pub const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// A decoded table: one header row plus data records of raw cell text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<Vec<String>>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// View a record as a column-name → value mapping.
    pub fn row(&self, idx: usize) -> Option<RawRow<'_>> {
        self.records.get(idx).map(|cells| RawRow {
            headers: &self.headers,
            cells,
        })
    }
}

/// Borrowed view of one record keyed by header name.
#[derive(Debug, Clone, Copy)]
pub struct RawRow<'a> {
    headers: &'a [String],
    cells: &'a [String],
}

impl<'a> RawRow<'a> {
    /// Value of the first column named `header`.
    pub fn get(&self, header: &str) -> Option<&'a str> {
        let idx = self.headers.iter().position(|h| h == header)?;
        self.cells.get(idx).map(String::as_str)
    }
}

/// The decoding strategy that produced a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStrategy {
    Utf8Delimited { delimiter: u8 },
    Latin1Delimited { delimiter: u8 },
    Spreadsheet,
}

impl fmt::Display for ReadStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadStrategy::Utf8Delimited { delimiter } => {
                write!(f, "utf-8 delimited ({:?})", *delimiter as char)
            }
            ReadStrategy::Latin1Delimited { delimiter } => {
                write!(f, "latin-1 delimited ({:?})", *delimiter as char)
            }
            ReadStrategy::Spreadsheet => write!(f, "spreadsheet"),
        }
    }
}

/// Why a single strategy failed.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("contains binary control characters")]
    NotText,

    #[error("no header row")]
    NoHeader,

    #[error("delimited parse failed: {0}")]
    Delimited(#[from] csv::Error),

    #[error("spreadsheet parse failed: {0}")]
    Spreadsheet(String),
}

/// Every strategy failed; carries each strategy's reason in order.
#[derive(Debug, Error)]
#[error("{}", summarize(.0))]
pub struct UnreadableFile(pub Vec<(&'static str, ReadError)>);

fn summarize(failures: &[(&'static str, ReadError)]) -> String {
    failures
        .iter()
        .map(|(name, err)| format!("{name}: {err}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Decode `bytes` into a table, trying each strategy in turn.
pub fn read_table(bytes: &[u8], filename: &str) -> Result<(RawTable, ReadStrategy), UnreadableFile> {
    let mut failures = Vec::with_capacity(3);

    match read_utf8(bytes) {
        Ok(found) => return Ok(finish(found, filename)),
        Err(err) => {
            debug!(filename, error = %err, "utf-8 strategy failed");
            failures.push(("utf-8", err));
        }
    }

    match read_latin1(bytes) {
        Ok(found) => return Ok(finish(found, filename)),
        Err(err) => {
            debug!(filename, error = %err, "latin-1 strategy failed");
            failures.push(("latin-1", err));
        }
    }

    match read_spreadsheet(bytes) {
        Ok(table) => return Ok(finish((table, ReadStrategy::Spreadsheet), filename)),
        Err(err) => {
            debug!(filename, error = %err, "spreadsheet strategy failed");
            failures.push(("spreadsheet", err));
        }
    }

    Err(UnreadableFile(failures))
}

fn finish(found: (RawTable, ReadStrategy), filename: &str) -> (RawTable, ReadStrategy) {
    info!(
        filename,
        strategy = %found.1,
        columns = found.0.headers.len(),
        rows = found.0.len(),
        "file decoded"
    );
    found
}

fn read_utf8(bytes: &[u8]) -> Result<(RawTable, ReadStrategy), ReadError> {
    let text = std::str::from_utf8(bytes)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let (table, delimiter) = read_delimited(text)?;
    Ok((table, ReadStrategy::Utf8Delimited { delimiter }))
}

fn read_latin1(bytes: &[u8]) -> Result<(RawTable, ReadStrategy), ReadError> {
    // ISO-8859-1 maps every byte to the code point of the same value.
    let text: String = bytes.iter().map(|&b| b as char).collect();
    let (table, delimiter) = read_delimited(&text)?;
    Ok((table, ReadStrategy::Latin1Delimited { delimiter }))
}

/// Parse delimited text with the best-scoring candidate delimiter.
pub fn read_delimited(text: &str) -> Result<(RawTable, u8), ReadError> {
    if text
        .chars()
        .any(|c| c.is_ascii_control() && !matches!(c, '\t' | '\r' | '\n'))
    {
        return Err(ReadError::NotText);
    }
    let delimiter = sniff_delimiter(text);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(ReadError::NoHeader);
    }

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        records.push(record.iter().map(str::to_string).collect());
    }

    Ok((RawTable { headers, records }, delimiter))
}

/// Pick the delimiter that splits the header line into the most fields.
pub fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    let mut best = CANDIDATE_DELIMITERS[0];
    let mut best_fields = 0usize;
    for &candidate in &CANDIDATE_DELIMITERS {
        let fields = csv::ReaderBuilder::new()
            .delimiter(candidate)
            .has_headers(false)
            .flexible(true)
            .from_reader(header.as_bytes())
            .records()
            .next()
            .and_then(Result::ok)
            .map_or(0, |r| r.len());
        if fields > best_fields {
            best = candidate;
            best_fields = fields;
        }
    }
    best
}

fn read_spreadsheet(bytes: &[u8]) -> Result<RawTable, ReadError> {
    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| ReadError::Spreadsheet(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ReadError::Spreadsheet("workbook has no sheets".to_string()))?
        .map_err(|e| ReadError::Spreadsheet(e.to_string()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or(ReadError::NoHeader)?
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(ReadError::NoHeader);
    }

    let records = rows
        .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<_>>())
        .filter(|cells| cells.iter().any(|c| !c.trim().is_empty()))
        .collect();

    Ok(RawTable { headers, records })
}
