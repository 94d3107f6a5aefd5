//! Weighted summary statistics over refresh durations.

use serde::Serialize;

use crate::ProcessedEntry;

/// Weighted summary of the refreshes that survived outlier rejection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedStats {
    /// Number of refreshes summarised.
    pub count: usize,
    /// Sum of weights.
    pub total_weight: f64,
    /// `sum(d * w) / sum(w)`.
    pub weighted_mean: f64,
    /// Weighted median duration.
    pub p50: f64,
    /// Weighted 80th percentile duration.
    pub p80: f64,
    /// Weighted population standard deviation around the weighted mean.
    pub standard_deviation: f64,
    /// `sum(w)^2 / sum(w^2)`, capped at `count`.
    pub effective_sample_size: f64,
}

impl WeightedStats {
    /// Summarises weighted durations.
    ///
    /// Returns `None` when there is nothing to summarise: no entries, or a
    /// total weight that is zero or not finite.
    #[must_use]
    pub fn compute(entries: &[ProcessedEntry]) -> Option<Self> {
        let total_weight: f64 = entries.iter().map(|e| e.weight).sum();
        if entries.is_empty() || !total_weight.is_finite() || total_weight <= 0.0 {
            return None;
        }

        let weighted_mean =
            entries.iter().map(|e| e.duration() * e.weight).sum::<f64>() / total_weight;
        let variance = entries
            .iter()
            .map(|e| e.weight * (e.duration() - weighted_mean).powi(2))
            .sum::<f64>()
            / total_weight;

        let mut sorted: Vec<(f64, f64)> = entries.iter().map(|e| (e.duration(), e.weight)).collect();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

        Some(Self {
            count: entries.len(),
            total_weight,
            weighted_mean,
            p50: weighted_percentile(&sorted, total_weight, 0.5),
            p80: weighted_percentile(&sorted, total_weight, 0.8),
            standard_deviation: variance.sqrt(),
            effective_sample_size: effective_sample_size(entries),
        })
    }

    /// Returns `standard_deviation / weighted_mean`, or infinity for a zero mean.
    #[must_use]
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.weighted_mean > 0.0 {
            self.standard_deviation / self.weighted_mean
        } else {
            f64::INFINITY
        }
    }
}

/// Walks cumulative weight over `(value, weight)` pairs sorted by value.
///
/// Returns the first value at which the cumulative weight reaches
/// `quantile * total_weight`, or the largest value if rounding keeps the
/// walk short of the target.
#[must_use]
pub fn weighted_percentile(sorted: &[(f64, f64)], total_weight: f64, quantile: f64) -> f64 {
    let target = total_weight * quantile;
    let mut cumulative = 0.0;
    for &(value, weight) in sorted {
        cumulative += weight;
        if cumulative >= target {
            return value;
        }
    }
    sorted.last().map_or(0.0, |&(value, _)| value)
}

/// Kish effective sample size: `sum(w)^2 / sum(w^2)`, never above the entry count.
#[must_use]
pub fn effective_sample_size(entries: &[ProcessedEntry]) -> f64 {
    let total: f64 = entries.iter().map(|e| e.weight).sum();
    let squares: f64 = entries.iter().map(|e| e.weight * e.weight).sum();
    if squares <= 0.0 {
        return 0.0;
    }
    (total * total / squares).min(entries.len() as f64)
}
