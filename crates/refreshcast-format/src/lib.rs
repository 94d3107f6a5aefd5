//! History decoding and estimate rendering for refreshcast.
//!
//! This crate reads refresh history documents and writes estimates:
//!
//! - [`read_history`] - Decodes JSON, NDJSON or CSV history
//! - [`HistoryFormat`] - Input encoding, guessed from file extensions
//! - [`JsonFormatter`] - JSON estimates, reports and baseline tables
//! - [`TextFormatter`] - Human-readable estimates, reports and baseline tables

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/refreshcast/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod csv;
mod formatter;
mod json;
mod reader;
mod text;

pub use crate::csv::read_csv;
pub use formatter::{FormatError, Formatter, HistoryFormat, OutputFormat};
pub use json::{JsonFormatter, read_json, read_ndjson};
pub use reader::{read_history, read_history_file};
pub use text::{TextFormatter, format_seconds};
