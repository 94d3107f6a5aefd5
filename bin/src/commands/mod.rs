//! CLI command implementations.

pub(crate) mod baselines;
pub(crate) mod estimate;
pub(crate) mod explain;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use refreshcast_lib::prelude::*;

use crate::HistoryArgs;
use crate::display::{load_estimator, load_history};

/// A fully resolved estimation request.
pub(crate) struct Request {
    pub(crate) estimator: Estimator,
    pub(crate) history: Vec<HistoryEntry>,
    pub(crate) now: DateTime<Utc>,
    pub(crate) metadata: ResourceMetadata,
    pub(crate) kind: RefreshKind,
}

impl Request {
    /// Resolves command-line inputs, loading configuration and history.
    pub(crate) fn from_args(args: &HistoryArgs) -> Result<Self> {
        let kind: RefreshKind = args.kind.parse().context("Invalid --kind")?;
        let now = match args.now.as_deref() {
            Some(text) => parse_timestamp(text).context("Invalid --now")?,
            None => Utc::now(),
        };
        let metadata = ResourceMetadata::new(StorageMode::parse(&args.storage_mode));
        if metadata.storage_mode == StorageMode::Unknown
            && !args.storage_mode.eq_ignore_ascii_case("unknown")
        {
            tracing::warn!(
                storage_mode = %args.storage_mode,
                "unrecognised storage mode, using Unknown"
            );
        }

        let estimator = load_estimator(args.config.as_deref())?;
        let history = load_history(&args.history, args.input_format)?;

        Ok(Self {
            estimator,
            history,
            now,
            metadata,
            kind,
        })
    }

    /// Runs the estimator with a full diagnostic report.
    pub(crate) fn analyze(&self) -> EstimateReport {
        self.estimator
            .analyze(&self.history, self.now, &self.metadata, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn args(history: PathBuf) -> HistoryArgs {
        HistoryArgs {
            history,
            storage_mode: "dq".to_string(),
            kind: "manual".to_string(),
            now: Some("2024-06-14T12:00:00Z".to_string()),
            input_format: None,
            config: None,
        }
    }

    fn history_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".ndjson").tempfile().unwrap();
        for day in 10..=13 {
            writeln!(
                file,
                r#"{{"refreshType":"OnDemand","startTime":"2024-06-{day}T10:07:00Z","endTime":"2024-06-{day}T10:08:30Z","status":"Completed"}}"#
            )
            .unwrap();
        }
        file
    }

    #[test]
    fn test_request_from_args() {
        let file = history_file();
        let request = Request::from_args(&args(file.path().to_path_buf())).unwrap();
        assert_eq!(request.history.len(), 4);
        assert_eq!(request.metadata.storage_mode, StorageMode::DirectQuery);
        assert_eq!(request.kind, RefreshKind::Manual);

        let report = request.analyze();
        assert!(!report.outcome.is_fallback());
        assert_eq!(report.estimate.range_seconds.median, 90);
    }

    #[test]
    fn test_invalid_flags() {
        let file = history_file();
        let mut bad_kind = args(file.path().to_path_buf());
        bad_kind.kind = "sometimes".to_string();
        assert!(Request::from_args(&bad_kind).is_err());

        let mut bad_now = args(file.path().to_path_buf());
        bad_now.now = Some("tomorrow".to_string());
        let err = Request::from_args(&bad_now).err().unwrap();
        assert!(err.to_string().contains("--now"));
    }
}
