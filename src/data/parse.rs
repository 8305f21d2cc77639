use thiserror::Error;

use super::codec::SymbolMap;
use super::ingest::FileError;

// ---------------------------------------------------------------------------
// Tolerant record parser
// ---------------------------------------------------------------------------

/// Why one record was skipped. Carries the decoded line so the warning the
/// operator sees matches what the parser actually looked at.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("skipping malformed row: {0}")]
    Malformed(String),
    #[error("skipping non-numeric row: {0}")]
    NonNumeric(String),
}

/// One or two finite numeric fields extracted from a record.
/// First field is the wavelength/range; the second, when present, the
/// percentage reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedRow {
    pub x: f64,
    pub y: Option<f64>,
}

/// The result of scanning one file: the surviving rows, the column count
/// (1 or 2) established by the first parsed row, and the rows that were
/// skipped. Rows and diagnostics travel together; there is no side channel.
#[derive(Debug)]
pub struct TableScan {
    pub rows: Vec<ParsedRow>,
    pub columns: usize,
    pub skipped: Vec<RowError>,
}

/// Parse a single record: decode glyphs, split on whitespace runs, and
/// strictly coerce each field to a finite `f64`.
///
/// Token counts outside {1, 2}, or disagreeing with `expected_columns` once
/// the file's layout is established, are malformed. `f64` parsing is
/// `str::parse` with non-finite values rejected, so `inf`/`nan` never reach
/// a table.
pub fn parse_record(
    line: &str,
    codec: &SymbolMap,
    expected_columns: Option<usize>,
) -> Result<ParsedRow, RowError> {
    let decoded = codec.decode(line);

    let count = decoded.split_whitespace().count();
    if count == 0 || count > 2 || expected_columns.is_some_and(|want| want != count) {
        return Err(RowError::Malformed(decoded));
    }

    let parsed: Result<Vec<f64>, _> = decoded
        .split_whitespace()
        .map(str::parse::<f64>)
        .collect();

    match parsed {
        Ok(values) if values.iter().all(|v| v.is_finite()) => Ok(ParsedRow {
            x: values[0],
            y: values.get(1).copied(),
        }),
        _ => Err(RowError::NonNumeric(decoded)),
    }
}

/// Parse every record of one file.
///
/// The first successfully parsed row fixes the file's column count; rows
/// disagreeing with it afterwards are malformed. Failed rows are skipped
/// with a warning and never abort the file. If no row at all parses, the
/// column layout was never established and the file as a whole fails.
pub fn parse_table(records: &[String], codec: &SymbolMap) -> Result<TableScan, FileError> {
    let mut rows = Vec::new();
    let mut skipped = Vec::new();
    let mut columns: Option<usize> = None;

    for record in records {
        match parse_record(record, codec, columns) {
            Ok(row) => {
                columns.get_or_insert(if row.y.is_some() { 2 } else { 1 });
                rows.push(row);
            }
            Err(err) => {
                log::warn!("{err}");
                skipped.push(err);
            }
        }
    }

    match columns {
        Some(columns) => Ok(TableScan {
            rows,
            columns,
            skipped,
        }),
        None => Err(FileError::UnsupportedColumnCount),
    }
}
