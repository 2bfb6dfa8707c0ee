//! Header and row assembly
//!
//! Every cell is wrapped in double quotes, verbatim: quotes or line breaks
//! inside values are not escaped. Cells are joined with `,` and every line,
//! including the last one, ends with the configured [`LineSeparator`]
//! (`\n` by default).

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::cache::columns;
use crate::encoding::{TextEncoding, DEFAULT_ENCODING};
use crate::entity::CsvText;
use crate::error::{CsvWriteError, FieldAccessError};
use crate::schema::CsvRecord;

/// Line terminator written after every line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineSeparator {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    CrLf,
}

impl LineSeparator {
    /// The terminator text
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// Options for CSV writing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvWriteOptions {
    /// Whether to emit a header line before the rows
    pub include_header: bool,
    /// Label of the target encoding (default: `UTF-8`)
    pub encoding: String,
    /// Line terminator (default: `\n`)
    pub line_separator: LineSeparator,
}

impl Default for CsvWriteOptions {
    fn default() -> Self {
        Self {
            include_header: true,
            encoding: DEFAULT_ENCODING.to_string(),
            line_separator: LineSeparator::default(),
        }
    }
}

impl CsvWriteOptions {
    /// Default options with the given header setting
    pub fn with_header(include_header: bool) -> Self {
        Self {
            include_header,
            ..Default::default()
        }
    }
}

/// A record that can render itself as CSV, usable as trait object
///
/// Implemented for every [`CsvRecord`]. Mixed sequences of record types can be
/// written with [`write_rows`]; each record is rendered with the columns of its
/// own type.
pub trait CsvRow {
    /// Name of the record type
    fn record_type_name(&self) -> &'static str;
    /// Header cells of this record's type
    fn header_cells(&self) -> Vec<String>;
    /// Cells of this record
    fn row_cells(&self) -> Result<Vec<String>, FieldAccessError>;
}

impl<T: CsvRecord> CsvRow for T {
    fn record_type_name(&self) -> &'static str {
        columns::<T>().type_name()
    }

    fn header_cells(&self) -> Vec<String> {
        columns::<T>().header_cells()
    }

    fn row_cells(&self) -> Result<Vec<String>, FieldAccessError> {
        columns::<T>().row_cells(self)
    }
}

fn push_line<S: AsRef<str>>(out: &mut String, cells: &[S], separator: LineSeparator) {
    out.push_str(
        &cells
            .iter()
            .map(|cell| format!("\"{}\"", cell.as_ref()))
            .join(","),
    );
    out.push_str(separator.as_str());
}

/// Header line of `T`, terminated by `\n`
pub fn write_header<T: CsvRecord>() -> String {
    let mut out = String::new();
    push_line(&mut out, &columns::<T>().header_cells(), LineSeparator::Lf);
    out
}

/// A single row line for `record`, without header, terminated by `\n`
pub fn write_record<T: CsvRecord>(record: &T) -> Result<String, CsvWriteError> {
    let mut out = String::new();
    push_line(&mut out, &columns::<T>().row_cells(record)?, LineSeparator::Lf);
    Ok(out)
}

/// Write `records` as CSV text
///
/// With `include_header`, the header line of `T` comes first, also when
/// `records` is empty.
pub fn write<T: CsvRecord>(records: &[T], include_header: bool) -> Result<String, CsvWriteError> {
    Ok(write_with_options(records, &CsvWriteOptions::with_header(include_header))?.into_text())
}

/// Write `records` as CSV text, as it reads after encoding with `encoding`
///
/// Characters `encoding` cannot represent appear as `?`.
pub fn write_with_encoding<T: CsvRecord>(
    records: &[T],
    encoding: &str,
    include_header: bool,
) -> Result<String, CsvWriteError> {
    let options = CsvWriteOptions {
        include_header,
        encoding: encoding.to_string(),
        ..Default::default()
    };
    Ok(write_with_options(records, &options)?.encoded_text())
}

/// Write `records` as CSV, encoded with `encoding`
pub fn write_bytes<T: CsvRecord>(
    records: &[T],
    encoding: &str,
    include_header: bool,
) -> Result<Vec<u8>, CsvWriteError> {
    let options = CsvWriteOptions {
        include_header,
        encoding: encoding.to_string(),
        ..Default::default()
    };
    Ok(write_with_options(records, &options)?.bytes())
}

/// Write `records` as CSV with custom options
///
/// The encoding label is validated before anything is assembled. The first
/// unreadable field aborts the call.
pub fn write_with_options<T: CsvRecord>(
    records: &[T],
    options: &CsvWriteOptions,
) -> Result<CsvText, CsvWriteError> {
    let encoding = TextEncoding::for_label(&options.encoding)?;
    let columns = columns::<T>();
    let mut out = String::new();
    if options.include_header {
        push_line(&mut out, &columns.header_cells(), options.line_separator);
    }
    for record in records {
        push_line(&mut out, &columns.row_cells(record)?, options.line_separator);
    }
    trace!(
        record_type = columns.type_name(),
        records = records.len(),
        "assembled CSV"
    );
    Ok(CsvText::new(out, encoding))
}

/// Write records of possibly different types as CSV text
///
/// The header (if requested) is derived from the first record's type.
/// An empty input yields an empty string.
pub fn write_rows(records: &[&dyn CsvRow], include_header: bool) -> Result<String, CsvWriteError> {
    Ok(write_rows_with_options(records, &CsvWriteOptions::with_header(include_header))?.into_text())
}

/// Write records of possibly different types as CSV with custom options
pub fn write_rows_with_options(
    records: &[&dyn CsvRow],
    options: &CsvWriteOptions,
) -> Result<CsvText, CsvWriteError> {
    let encoding = TextEncoding::for_label(&options.encoding)?;
    let mut out = String::new();
    if let (true, Some(first)) = (options.include_header, records.first()) {
        push_line(&mut out, &first.header_cells(), options.line_separator);
    }
    for record in records {
        push_line(&mut out, &record.row_cells()?, options.line_separator);
    }
    trace!(records = records.len(), "assembled mixed CSV");
    Ok(CsvText::new(out, encoding))
}
