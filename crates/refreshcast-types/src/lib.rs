//! Core types for the refreshcast refresh duration estimator.
//!
//! This crate provides the data model shared by the estimation engine,
//! the history decoders and the CLI:
//!
//! - [`HistoryEntry`] - One past refresh execution as reported by the source system
//! - [`RefreshStatus`] - Terminal or in-flight status of a refresh
//! - [`RefreshKind`] - Kind of refresh being estimated (manual or scheduled)
//! - [`ClassifiedKind`] - Kind inferred for a past refresh
//! - [`StorageMode`] - Storage mode of the refreshed resource
//! - [`RefreshEstimate`] - The estimate handed back to callers

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/refreshcast/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod entry;
mod error;
mod estimate;
mod kind;
mod storage_mode;

pub use entry::{HistoryEntry, RefreshStatus, parse_timestamp};
pub use error::ParseError;
pub use estimate::{Confidence, ContextualFactors, EstimateRange, RefreshEstimate};
pub use kind::{ClassifiedKind, RefreshKind};
pub use storage_mode::{ResourceMetadata, StorageMode};
