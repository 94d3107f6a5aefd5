//! CSV history decoding.

use ::csv::{ErrorKind, ReaderBuilder, StringRecord, Trim};
use refreshcast_types::{HistoryEntry, RefreshStatus, parse_timestamp};
use std::io::Read;

use crate::FormatError;

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy)]
struct Columns {
    kind: Option<usize>,
    start_time: usize,
    end_time: usize,
    status: usize,
}

impl Columns {
    fn from_header(header: &StringRecord) -> Result<Self, FormatError> {
        let find = |names: &[&str]| {
            header
                .iter()
                .position(|column| names.contains(&normalize(column).as_str()))
        };
        let require = |names: &[&str], label: &str| {
            find(names).ok_or_else(|| FormatError::Csv {
                line: 1,
                message: format!("header is missing a `{label}` column"),
            })
        };

        Ok(Self {
            kind: find(&["kind", "refreshtype"]),
            start_time: require(&["starttime"], "startTime")?,
            end_time: require(&["endtime"], "endTime")?,
            status: require(&["status"], "status")?,
        })
    }

    fn entry(&self, record: &StringRecord) -> HistoryEntry {
        let cell = |position: usize| record.get(position).filter(|value| !value.is_empty());
        let timestamp = |position: usize| cell(position).and_then(|v| parse_timestamp(v).ok());

        HistoryEntry::new(
            self.kind.and_then(cell).map(str::to_string),
            timestamp(self.start_time),
            timestamp(self.end_time),
            cell(self.status).map_or(RefreshStatus::Unknown, RefreshStatus::parse),
        )
    }
}

/// Lowercases a header name and drops underscores, so `start_time` and `startTime` agree.
fn normalize(column: &str) -> String {
    column
        .chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

fn csv_error(err: ::csv::Error) -> FormatError {
    let line = err.position().map_or(0, ::csv::Position::line);
    let message = err.to_string();
    match err.into_kind() {
        ErrorKind::Io(source) => FormatError::Io(source),
        _ => FormatError::Csv { line, message },
    }
}

/// Decodes CSV with a header row naming `status`, `startTime`/`start_time`,
/// `endTime`/`end_time` and optionally `kind`/`refreshType`.
///
/// Columns may appear in any order and unrecognised columns are ignored.
/// Quoted fields may span lines. Empty cells are absent values, as are cells
/// past the end of a short row. Unparseable timestamps become absent and
/// unknown statuses become [`RefreshStatus::Unknown`], leaving the entry for
/// the estimator's history filter to drop.
///
/// # Errors
///
/// Returns an error if reading fails, the input is not valid UTF-8, or the
/// header is missing one of the required columns.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<HistoryEntry>, FormatError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let columns = Columns::from_header(reader.headers().map_err(csv_error)?)?;

    reader
        .records()
        .map(|record| record.map(|record| columns.entry(&record)).map_err(csv_error))
        .collect()
}
