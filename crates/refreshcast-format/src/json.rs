//! JSON history decoding and JSON output.

use refreshcast_estimate::{BaselineTable, EstimateReport, FallbackBaseline};
use refreshcast_types::{EstimateRange, HistoryEntry, RefreshEstimate};
use serde::Serialize;
use serde::de::Error as _;
use serde_json::Value;
use std::io::{BufRead, Read, Write};

use crate::{FormatError, Formatter};

/// Decodes a JSON document holding either a bare array of entries or an
/// object whose `value` field is that array.
///
/// # Errors
///
/// Returns an error if the document is not JSON or has neither shape.
pub fn read_json<R: Read>(reader: R) -> Result<Vec<HistoryEntry>, FormatError> {
    let document: Value = serde_json::from_reader(reader)?;
    let entries = match document {
        Value::Array(_) => document,
        Value::Object(mut map) => map.remove("value").ok_or_else(|| {
            serde_json::Error::custom("expected an object with a `value` array")
        })?,
        _ => {
            return Err(FormatError::Json(serde_json::Error::custom(
                "expected an array of refreshes or an object with a `value` array",
            )));
        }
    };
    Ok(serde_json::from_value(entries)?)
}

/// Decodes newline-delimited JSON, one entry per non-blank line.
///
/// # Errors
///
/// Returns an error if reading fails or a line is not a JSON object.
pub fn read_ndjson<R: BufRead>(reader: R) -> Result<Vec<HistoryEntry>, FormatError> {
    let mut entries = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        entries.push(serde_json::from_str(&line)?);
    }
    Ok(entries)
}

/// One row of the baseline listing.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BaselineRow<'a> {
    #[serde(flatten)]
    baseline: &'a FallbackBaseline,
    range_seconds: EstimateRange,
}

/// JSON formatter.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    /// Whether to pretty-print.
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new compact JSON formatter.
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: false }
    }

    /// Sets whether to pretty-print output.
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    fn write_value<T, W>(&self, value: &T, mut writer: W) -> Result<(), FormatError>
    where
        T: Serialize + ?Sized,
        W: Write,
    {
        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, value)?;
        } else {
            serde_json::to_writer(&mut writer, value)?;
        }
        writeln!(writer)?;
        Ok(())
    }
}

impl Formatter for JsonFormatter {
    fn write_estimate<W: Write>(
        &self,
        estimate: &RefreshEstimate,
        writer: W,
    ) -> Result<(), FormatError> {
        self.write_value(estimate, writer)
    }

    fn write_report<W: Write>(
        &self,
        report: &EstimateReport,
        writer: W,
    ) -> Result<(), FormatError> {
        self.write_value(report, writer)
    }

    fn write_baselines<W: Write>(
        &self,
        baselines: &BaselineTable,
        latency_compensation: f64,
        writer: W,
    ) -> Result<(), FormatError> {
        let rows: Vec<BaselineRow<'_>> = baselines
            .iter()
            .map(|baseline| BaselineRow {
                baseline,
                range_seconds: baseline.range(latency_compensation),
            })
            .collect();
        self.write_value(&rows, writer)
    }
}
