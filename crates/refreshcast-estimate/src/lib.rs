//! Refresh duration estimation for the refreshcast estimator.
//!
//! This crate turns a resource's refresh history into a duration range with
//! a confidence level and a short human-readable message:
//!
//! - [`Estimator`] - Runs the full pipeline for one request
//! - [`EstimatorConfig`] - Tunable thresholds, loadable from TOML
//! - [`BaselineTable`] - Per-storage-mode fallback baselines
//! - [`Classifier`] - Infers manual or scheduled refreshes from tags and timing
//! - [`WeightedStats`] - Recency-weighted percentiles and dispersion
//! - [`EstimateReport`] - Diagnostic account of how an estimate was reached

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/refreshcast/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod classify;
mod config;
mod data;
mod estimator;
mod filter;
mod message;
mod outlier;
mod scoring;
mod stats;
mod weight;

pub use classify::{Classifier, classify_tag};
pub use config::{ConfigError, EstimatorConfig};
pub use data::{BaselineTable, FallbackBaseline};
pub use estimator::{
    AnalyzedEntry, Disposition, EstimateReport, Estimator, FallbackReason, Outcome,
};
pub use filter::{filter_history, most_recent_attempts};
pub use message::{MessageInputs, computed_message, fallback_message};
pub use outlier::{Dispersion, OutlierSplit, median, modified_z_score, reject_outliers};
pub use scoring::{has_recent_failures, is_large_dataset, is_peak_hour, score_confidence, score_stats};
pub use stats::{WeightedStats, effective_sample_size, weighted_percentile};
pub use weight::{KindSelection, ProcessedEntry, kind_breakdown, recency_weight, select_by_kind};
