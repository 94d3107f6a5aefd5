//! Refresh duration estimate returned to callers.

use serde::{Deserialize, Serialize};

use crate::StorageMode;

/// Confidence level of an estimate.
///
/// Ordered from least to most confident, so `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Little or noisy history, or no history at all.
    Low,
    /// Some consistent history.
    Medium,
    /// Plenty of consistent history.
    High,
}

impl Confidence {
    /// Returns the confidence as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Returns the adverb used when phrasing a duration at this confidence.
    #[must_use]
    pub const fn qualifier(&self) -> &'static str {
        match self {
            Self::High => "typically",
            Self::Medium => "usually",
            Self::Low => "estimated",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Estimated duration range in whole seconds.
///
/// Always satisfies `1 <= min <= median <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateRange {
    /// Optimistic bound.
    pub min: u64,
    /// Pessimistic bound.
    pub max: u64,
    /// Central estimate.
    pub median: u64,
}

impl EstimateRange {
    /// Builds a range, clamping so that `1 <= min <= median <= max` and `max > min`.
    #[must_use]
    pub fn clamped(min: u64, median: u64, max: u64) -> Self {
        let min = min.max(1);
        let max = max.max(min + 1);
        let median = median.clamp(min, max);
        Self { min, max, median }
    }
}

/// Context that helps interpret an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextualFactors {
    /// Storage mode of the refreshed resource.
    pub storage_mode: StorageMode,
    /// True when the 80th percentile duration exceeds five minutes.
    pub is_large_dataset: bool,
    /// True when the estimate was produced during business hours.
    pub is_peak_hour: bool,
    /// True when one of the most recent attempts failed or was cancelled.
    pub recent_failures: bool,
}

/// Confidence-scored estimate for the next refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshEstimate {
    /// Expected duration range.
    pub range_seconds: EstimateRange,
    /// Confidence in the range.
    pub confidence: Confidence,
    /// Number of past refreshes the statistics were computed from.
    pub historical_data_points: usize,
    /// Central estimate in seconds (the weighted median).
    pub average_duration_seconds: u64,
    /// Context for interpreting the estimate.
    pub contextual_factors: ContextualFactors,
    /// Human-readable summary.
    pub message: String,
}

impl RefreshEstimate {
    /// Returns true if the estimate was derived from real history.
    #[must_use]
    pub const fn has_history(&self) -> bool {
        self.historical_data_points > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_ordering() {
        assert!(Confidence::Low < Confidence::Medium);
        assert!(Confidence::Medium < Confidence::High);
        assert_eq!(Confidence::High.qualifier(), "typically");
    }

    #[test]
    fn test_range_clamped() {
        let range = EstimateRange::clamped(0, 0, 0);
        assert_eq!(range, EstimateRange { min: 1, max: 2, median: 1 });

        let range = EstimateRange::clamped(28, 41, 47);
        assert_eq!(range, EstimateRange { min: 28, max: 47, median: 41 });

        let range = EstimateRange::clamped(50, 90, 60);
        assert_eq!(range.median, 60);
    }

    #[test]
    fn test_estimate_json_shape() {
        let estimate = RefreshEstimate {
            range_seconds: EstimateRange { min: 10, max: 40, median: 20 },
            confidence: Confidence::Medium,
            historical_data_points: 6,
            average_duration_seconds: 20,
            contextual_factors: ContextualFactors {
                storage_mode: StorageMode::Import,
                is_large_dataset: false,
                is_peak_hour: true,
                recent_failures: false,
            },
            message: "Manual refresh - usually takes 20 seconds (medium confidence)".into(),
        };

        let value = serde_json::to_value(&estimate).unwrap();
        assert_eq!(value["rangeSeconds"]["median"], 20);
        assert_eq!(value["confidence"], "medium");
        assert_eq!(value["historicalDataPoints"], 6);
        assert_eq!(value["averageDurationSeconds"], 20);
        assert_eq!(value["contextualFactors"]["storageMode"], "Import");
        assert_eq!(value["contextualFactors"]["isPeakHour"], true);
        assert!(estimate.has_history());
    }
}
