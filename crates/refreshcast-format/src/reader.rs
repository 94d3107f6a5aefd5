//! Format dispatch for refresh history input.

use refreshcast_types::HistoryEntry;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

use crate::csv::read_csv;
use crate::json::{read_json, read_ndjson};
use crate::{FormatError, HistoryFormat};

/// Decodes refresh history from a reader.
///
/// # Errors
///
/// Returns an error if reading fails or the document is structurally invalid.
pub fn read_history<R: Read>(
    reader: R,
    format: HistoryFormat,
) -> Result<Vec<HistoryEntry>, FormatError> {
    let reader = BufReader::new(reader);
    let entries = match format {
        HistoryFormat::Json => read_json(reader)?,
        HistoryFormat::Ndjson => read_ndjson(reader)?,
        HistoryFormat::Csv => read_csv(reader)?,
    };
    let usable = entries.iter().filter(|entry| entry.is_usable()).count();
    debug!(%format, entries = entries.len(), usable, "decoded refresh history");
    Ok(entries)
}

/// Decodes refresh history from a file.
///
/// When `format` is `None` it is guessed from the file extension.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded.
pub fn read_history_file(
    path: &Path,
    format: Option<HistoryFormat>,
) -> Result<Vec<HistoryEntry>, FormatError> {
    let format = format.unwrap_or_else(|| HistoryFormat::from_path(path));
    read_history(File::open(path)?, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_extension_detection() {
        let csv = temp_file(
            ".csv",
            "startTime,endTime,status\n2024-06-12T03:00:00Z,2024-06-12T03:01:00Z,Completed\n",
        );
        let entries = read_history_file(csv.path(), None).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_usable());

        let ndjson = temp_file(
            ".jsonl",
            "{\"startTime\":\"2024-06-12T03:00:00Z\",\"endTime\":\"2024-06-12T03:01:00Z\",\"status\":\"Completed\"}\n",
        );
        assert_eq!(read_history_file(ndjson.path(), None).unwrap().len(), 1);

        let json = temp_file(".json", "{\"value\": []}");
        assert!(read_history_file(json.path(), None).unwrap().is_empty());
    }

    #[test]
    fn test_explicit_format_overrides_extension() {
        let file = temp_file(".txt", "status,startTime,endTime\n");
        let entries = read_history_file(file.path(), Some(HistoryFormat::Csv)).unwrap();
        assert!(entries.is_empty());

        assert!(matches!(
            read_history_file(file.path(), None),
            Err(FormatError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(
            read_history_file(&missing, None),
            Err(FormatError::Io(_))
        ));
    }
}
