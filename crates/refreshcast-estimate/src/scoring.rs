//! Confidence scoring and contextual flags.

use chrono::{DateTime, FixedOffset, Timelike, Utc};
use refreshcast_types::{Confidence, HistoryEntry};

use crate::filter::most_recent_attempts;
use crate::{EstimatorConfig, WeightedStats};

/// Maps effective sample size and coefficient of variation to a confidence level.
///
/// Non-finite inputs (a zero mean gives an infinite CV) always score low.
#[must_use]
pub fn score_confidence(
    effective_n: f64,
    coefficient_of_variation: f64,
    config: &EstimatorConfig,
) -> Confidence {
    let cv = coefficient_of_variation;
    if !cv.is_finite() || !effective_n.is_finite() {
        return Confidence::Low;
    }
    if effective_n >= config.high_min_effective_n && cv < config.high_max_cv {
        Confidence::High
    } else if effective_n >= config.medium_min_effective_n && cv < config.medium_max_cv {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

/// Scores the confidence of computed statistics.
#[must_use]
pub fn score_stats(stats: &WeightedStats, config: &EstimatorConfig) -> Confidence {
    score_confidence(
        stats.effective_sample_size,
        stats.coefficient_of_variation(),
        config,
    )
}

/// Returns true if `now` falls within the configured peak hours.
#[must_use]
pub fn is_peak_hour(now: DateTime<Utc>, offset: FixedOffset, config: &EstimatorConfig) -> bool {
    let hour = now.with_timezone(&offset).hour();
    (config.peak_start_hour..=config.peak_end_hour).contains(&hour)
}

/// Returns true if any of the most recent raw attempts failed or was cancelled.
#[must_use]
pub fn has_recent_failures(history: &[HistoryEntry], config: &EstimatorConfig) -> bool {
    most_recent_attempts(history, config.recent_window)
        .iter()
        .any(|entry| entry.status.is_failure())
}

/// Returns true if the 80th percentile marks a large dataset.
#[must_use]
pub fn is_large_dataset(p80: f64, config: &EstimatorConfig) -> bool {
    p80 > config.large_dataset_seconds
}
