//! Numeric genotype table reader
//!
//! Reads a delimited table whose first five columns are SNP, CHR, POS, REF
//! and ALT, followed by one numeric genotype column per sample. The
//! delimiter is taken from the header line: tab if present, comma
//! otherwise.

use crate::core::io::SmartReader;
use crate::core::table::{GenotypeTable, MarkerRecord, METADATA_COLUMNS};
use crate::core::validator::check_schema;
use crate::core::{Num2HapError, SchemaError, TableParseError};
use csv::StringRecord;
use memchr::memchr;
use std::io::{BufRead, Cursor, Read};
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Pick the field delimiter from the header line
pub fn detect_delimiter(header: &[u8]) -> u8 {
    if memchr(b'\t', header).is_some() {
        b'\t'
    } else {
        b','
    }
}

/// Map a csv error to a table error; `skipped` blank lines preceded the header
fn parse_error(err: csv::Error, skipped: usize) -> TableParseError {
    let line = |pos: Option<csv::Position>| pos.map_or(0, |p| p.line() as usize + skipped);
    match err.into_kind() {
        csv::ErrorKind::Io(e) => TableParseError::Io(e),
        csv::ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => TableParseError::FieldCount {
            line: line(pos),
            expected: expected_len as usize,
            found: len as usize,
        },
        csv::ErrorKind::Utf8 { pos, .. } => TableParseError::InvalidUtf8 { line: line(pos) },
        other => TableParseError::Malformed {
            message: format!("{:?}", other),
        },
    }
}

/// Build a marker from a record already checked against the header width
fn marker_from_record(record: &StringRecord) -> Option<MarkerRecord> {
    let genotypes = record
        .iter()
        .skip(METADATA_COLUMNS)
        .map(|s| s.to_string())
        .collect();
    Some(MarkerRecord::new(
        record.get(0)?,
        record.get(1)?,
        record.get(2)?,
        record.get(3)?,
        record.get(4)?,
        genotypes,
    ))
}

/// Read a numeric genotype table from any buffered reader
///
/// The header is checked before any data row is read. Quoted fields follow
/// RFC 4180; surrounding whitespace is trimmed. Blank lines are skipped and
/// every other row must have as many fields as the header.
pub fn read_numeric_table<R: BufRead>(mut reader: R) -> Result<GenotypeTable, Num2HapError> {
    let mut header = Vec::new();
    let mut skipped = 0usize;
    loop {
        header.clear();
        if reader.read_until(b'\n', &mut header)? == 0 {
            return Err(SchemaError::MissingHeader.into());
        }
        if skipped == 0 && header.starts_with(UTF8_BOM) {
            header.drain(..UTF8_BOM.len());
        }
        if !header.iter().all(|b| b.is_ascii_whitespace()) {
            break;
        }
        skipped += 1;
    }

    let delimiter = detect_delimiter(&header);
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .trim(csv::Trim::All)
        .from_reader(Cursor::new(header).chain(reader));

    let columns: Vec<String> = rdr
        .headers()
        .map_err(|e| parse_error(e, skipped))?
        .iter()
        .map(|s| s.to_string())
        .collect();
    check_schema(&columns)?;
    let expected = columns.len();
    log::debug!(
        "Header has {} sample columns, delimiter {:?}",
        expected - METADATA_COLUMNS,
        delimiter as char
    );

    let mut markers = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| parse_error(e, skipped))?;
        // width equals the header, which passed the schema check
        if let Some(marker) = marker_from_record(&record) {
            markers.push(marker);
        }
    }

    log::info!(
        "Loaded {} markers x {} samples",
        markers.len(),
        expected - METADATA_COLUMNS
    );
    Ok(GenotypeTable::new(columns, markers))
}

/// Read a numeric genotype table from a plain, gzip or bzip2 file
pub fn read_numeric_file<P: AsRef<Path>>(path: P) -> Result<GenotypeTable, Num2HapError> {
    let path = path.as_ref();
    let reader = SmartReader::open_auto(path)?;
    if reader.is_mapped() {
        log::debug!("Memory-mapping {:?}", path);
    }
    read_numeric_table(reader)
}
