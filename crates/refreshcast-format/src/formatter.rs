//! Input and output format abstraction.

use refreshcast_estimate::{BaselineTable, EstimateReport};
use refreshcast_types::RefreshEstimate;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Encoding of a refresh history document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HistoryFormat {
    /// JSON array, or an object with a `value` array.
    #[default]
    Json,
    /// Newline-delimited JSON, one entry per line.
    Ndjson,
    /// CSV with a header row.
    Csv,
}

impl HistoryFormat {
    /// Returns the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Ndjson => "ndjson",
            Self::Csv => "csv",
        }
    }

    /// Returns all available formats.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Json, Self::Ndjson, Self::Csv]
    }

    /// Guesses the format from a file extension, defaulting to JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .as_deref()
        {
            Some("csv") => Self::Csv,
            Some("ndjson" | "jsonl") => Self::Ndjson,
            _ => Self::Json,
        }
    }
}

impl std::fmt::Display for HistoryFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for HistoryFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "ndjson" | "jsonl" => Ok(Self::Ndjson),
            "csv" => Ok(Self::Csv),
            _ => Err(FormatError::UnknownFormat(s.to_string())),
        }
    }
}

/// Rendering of an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Returns the format name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(FormatError::UnknownFormat(s.to_string())),
        }
    }
}

/// Errors that can occur while decoding history or rendering output.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Unknown input or output format.
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding or encoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Structurally invalid CSV.
    #[error("CSV error on line {line}: {message}")]
    Csv {
        /// One-based line number.
        line: u64,
        /// What was wrong.
        message: String,
    },
}

/// Trait for estimate renderers.
pub trait Formatter: Send + Sync {
    /// Writes an estimate.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_estimate<W: Write>(
        &self,
        estimate: &RefreshEstimate,
        writer: W,
    ) -> Result<(), FormatError>;

    /// Writes a diagnostic report: every processed entry, the outcome and the estimate.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_report<W: Write>(&self, report: &EstimateReport, writer: W)
    -> Result<(), FormatError>;

    /// Writes the fallback baseline table with the ranges a fallback
    /// estimate would report under `latency_compensation`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_baselines<W: Write>(
        &self,
        baselines: &BaselineTable,
        latency_compensation: f64,
        writer: W,
    ) -> Result<(), FormatError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_format_from_path() {
        assert_eq!(HistoryFormat::from_path(Path::new("h.csv")), HistoryFormat::Csv);
        assert_eq!(HistoryFormat::from_path(Path::new("h.CSV")), HistoryFormat::Csv);
        assert_eq!(HistoryFormat::from_path(Path::new("h.jsonl")), HistoryFormat::Ndjson);
        assert_eq!(HistoryFormat::from_path(Path::new("h.ndjson")), HistoryFormat::Ndjson);
        assert_eq!(HistoryFormat::from_path(Path::new("h.json")), HistoryFormat::Json);
        assert_eq!(HistoryFormat::from_path(Path::new("history")), HistoryFormat::Json);
    }

    #[test]
    fn test_parse_formats() {
        assert_eq!("NDJSON".parse::<HistoryFormat>().unwrap(), HistoryFormat::Ndjson);
        assert_eq!("txt".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!(matches!(
            "xml".parse::<HistoryFormat>(),
            Err(FormatError::UnknownFormat(name)) if name == "xml"
        ));
        for format in HistoryFormat::all() {
            assert_eq!(format.to_string().parse::<HistoryFormat>().unwrap(), *format);
        }
    }
}
