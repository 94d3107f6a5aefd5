//! Estimator configuration: defaults, TOML loading and validation.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating an [`EstimatorConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema.
    #[error("invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// A field holds a value the estimator cannot work with.
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Tunable constants of the estimation pipeline.
///
/// Unset TOML keys take their default, so a config file only needs to name
/// the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EstimatorConfig {
    /// Only refreshes started within this many days are considered.
    pub lookback_days: u32,
    /// At most this many of the most recent refreshes are considered.
    pub max_entries: usize,
    /// Time constant of the exponential recency decay, in days.
    pub decay_tau_days: f64,
    /// Weight factor for refreshes whose kind differs from the requested one.
    pub mismatch_weight: f64,
    /// Same-kind refreshes needed before other kinds are dropped entirely.
    pub min_same_kind: usize,
    /// Modified z-score at or above which a duration is an outlier.
    pub outlier_threshold: f64,
    /// Outlier rejection only runs with at least this many refreshes.
    pub min_outlier_entries: usize,
    /// Effective sample size required for high confidence.
    pub high_min_effective_n: f64,
    /// Coefficient of variation must be below this for high confidence.
    pub high_max_cv: f64,
    /// Effective sample size required for medium confidence.
    pub medium_min_effective_n: f64,
    /// Coefficient of variation must be below this for medium confidence.
    pub medium_max_cv: f64,
    /// P80 duration in seconds above which a dataset counts as large.
    pub large_dataset_seconds: f64,
    /// First peak hour (inclusive).
    pub peak_start_hour: u32,
    /// Last peak hour (inclusive).
    pub peak_end_hour: u32,
    /// Lower bound factor applied to P50.
    pub range_min_factor: f64,
    /// Upper bound factor applied to P80 off-peak.
    pub range_max_factor: f64,
    /// Upper bound factor applied to P80 during peak hours.
    pub peak_range_max_factor: f64,
    /// Number of most recent raw attempts checked for failures.
    pub recent_window: usize,
    /// Offset from UTC used for hour, minute and weekday checks.
    pub utc_offset_minutes: i32,
    /// Multiplier applied to every reported duration, on all paths.
    pub latency_compensation: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            lookback_days: 60,
            max_entries: 50,
            decay_tau_days: 7.0,
            mismatch_weight: 0.6,
            min_same_kind: 3,
            outlier_threshold: 3.5,
            min_outlier_entries: 3,
            high_min_effective_n: 5.0,
            high_max_cv: 0.3,
            medium_min_effective_n: 3.0,
            medium_max_cv: 0.5,
            large_dataset_seconds: 300.0,
            peak_start_hour: 9,
            peak_end_hour: 17,
            range_min_factor: 0.7,
            range_max_factor: 1.1,
            peak_range_max_factor: 1.2,
            recent_window: 5,
            utc_offset_minutes: 0,
            latency_compensation: 1.0,
        }
    }
}

impl EstimatorConfig {
    /// Parses and validates a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or a value is out of range.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails validation.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Sets the lookback window in days.
    #[must_use]
    pub const fn with_lookback_days(mut self, days: u32) -> Self {
        self.lookback_days = days;
        self
    }

    /// Sets the cap on considered refreshes.
    #[must_use]
    pub const fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Sets the clock offset used for timing heuristics.
    #[must_use]
    pub const fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = minutes;
        self
    }

    /// Sets the latency compensation multiplier.
    #[must_use]
    pub const fn with_latency_compensation(mut self, multiplier: f64) -> Self {
        self.latency_compensation = multiplier;
        self
    }

    /// Returns the configured clock offset.
    ///
    /// # Errors
    ///
    /// Returns an error if the offset is a day or more away from UTC.
    pub fn offset(&self) -> Result<FixedOffset, ConfigError> {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).ok_or_else(|| {
            ConfigError::Invalid {
                field: "utc_offset_minutes",
                reason: format!("{} is not within +/-1439", self.utc_offset_minutes),
            }
        })
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("decay_tau_days", self.decay_tau_days)?;
        positive("outlier_threshold", self.outlier_threshold)?;
        positive("high_max_cv", self.high_max_cv)?;
        positive("medium_max_cv", self.medium_max_cv)?;
        positive("range_min_factor", self.range_min_factor)?;
        positive("range_max_factor", self.range_max_factor)?;
        positive("peak_range_max_factor", self.peak_range_max_factor)?;
        positive("latency_compensation", self.latency_compensation)?;
        non_negative("high_min_effective_n", self.high_min_effective_n)?;
        non_negative("medium_min_effective_n", self.medium_min_effective_n)?;
        non_negative("large_dataset_seconds", self.large_dataset_seconds)?;

        if !(0.0..=1.0).contains(&self.mismatch_weight) {
            return Err(invalid("mismatch_weight", "must be within 0.0..=1.0"));
        }
        if self.max_entries == 0 {
            return Err(invalid("max_entries", "must be at least 1"));
        }
        if self.lookback_days == 0 {
            return Err(invalid("lookback_days", "must be at least 1"));
        }
        if self.peak_end_hour > 23 || self.peak_start_hour > self.peak_end_hour {
            return Err(invalid(
                "peak_start_hour",
                "peak hours must satisfy start <= end <= 23",
            ));
        }
        self.offset()?;
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, &format!("{value} must be a positive number")))
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, &format!("{value} must not be negative")))
    }
}
