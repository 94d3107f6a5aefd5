//! History-based refresh duration estimation.
//!
//! This is a facade crate that re-exports functionality from the refreshcast
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```
//! use chrono::{TimeDelta, Utc};
//! use refreshcast_lib::prelude::*;
//!
//! let now = Utc::now();
//! let history: Vec<HistoryEntry> = (1..=5)
//!     .map(|days| {
//!         let start = now - TimeDelta::days(days);
//!         HistoryEntry::completed(start, start + TimeDelta::seconds(95))
//!     })
//!     .collect();
//!
//! let estimate = Estimator::global().estimate(
//!     &history,
//!     now,
//!     &ResourceMetadata::new(StorageMode::Import),
//!     RefreshKind::Manual,
//! );
//! assert_eq!(estimate.historical_data_points, 5);
//! assert_eq!(estimate.range_seconds.median, 95);
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/refreshcast/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use refreshcast_types::*;

// Re-export the estimation engine
pub use refreshcast_estimate::{
    AnalyzedEntry, BaselineTable, Classifier, ConfigError, Disposition, EstimateReport, Estimator,
    EstimatorConfig, FallbackBaseline, FallbackReason, Outcome, ProcessedEntry, WeightedStats,
};

// Re-export decoding and formatters
#[cfg(feature = "format")]
pub use refreshcast_format::{
    FormatError, Formatter, HistoryFormat, JsonFormatter, OutputFormat, TextFormatter,
    read_history, read_history_file,
};

/// Prelude module for convenient imports.
///
/// ```
/// use refreshcast_lib::prelude::*;
/// ```
pub mod prelude {
    pub use refreshcast_types::{
        Confidence, ContextualFactors, EstimateRange, HistoryEntry, ParseError, RefreshEstimate,
        RefreshKind, RefreshStatus, ResourceMetadata, StorageMode, parse_timestamp,
    };

    pub use refreshcast_estimate::{
        BaselineTable, EstimateReport, Estimator, EstimatorConfig, Outcome,
    };

    #[cfg(feature = "format")]
    pub use refreshcast_format::{
        Formatter, HistoryFormat, JsonFormatter, OutputFormat, TextFormatter, read_history,
        read_history_file,
    };
}
