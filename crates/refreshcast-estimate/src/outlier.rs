//! Robust outlier rejection using the median absolute deviation.

use crate::{EstimatorConfig, ProcessedEntry};

/// Scale factor of the modified z-score.
const MODIFIED_Z_FACTOR: f64 = 0.6745;

/// Consistency constant relating MAD to the standard deviation of a normal distribution.
const MAD_CONSISTENCY: f64 = 1.4826;

/// Consistency constant relating mean absolute deviation to the standard deviation.
const MEAN_AD_CONSISTENCY: f64 = 1.253_314;

/// Dispersion measure the z-scores were computed against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dispersion {
    /// Too few entries to judge; nothing was scored.
    Skipped,
    /// Median absolute deviation.
    Mad(f64),
    /// Mean absolute deviation, used when the MAD is zero.
    MeanAbsolute(f64),
    /// Every duration equals the median; nothing was rejected.
    Constant,
}

/// Entries split into inliers and rejected outliers.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlierSplit {
    /// Entries kept for statistics, in input order.
    pub kept: Vec<ProcessedEntry>,
    /// Entries rejected as outliers, in input order.
    pub rejected: Vec<ProcessedEntry>,
    /// Median duration the scores are centred on, if scoring ran.
    pub median: Option<f64>,
    /// Dispersion used for scoring.
    pub dispersion: Dispersion,
}

/// Rejects entries whose modified z-score reaches the configured threshold.
///
/// The score is `0.6745 * (d - median) / (MAD * 1.4826)`. When the MAD is
/// zero but durations still vary (a lone spike among identical values), the
/// score is `(d - median) / (1.253314 * meanAD)` instead. Identical durations
/// are never rejected, and inputs shorter than `min_outlier_entries` pass
/// through untouched.
#[must_use]
pub fn reject_outliers(entries: &[ProcessedEntry], config: &EstimatorConfig) -> OutlierSplit {
    if entries.len() < config.min_outlier_entries.max(1) {
        return OutlierSplit {
            kept: entries.to_vec(),
            rejected: Vec::new(),
            median: None,
            dispersion: Dispersion::Skipped,
        };
    }

    let durations: Vec<f64> = entries.iter().map(ProcessedEntry::duration).collect();
    let center = median(&durations).unwrap_or_default();
    let deviations: Vec<f64> = durations.iter().map(|d| (d - center).abs()).collect();
    let mad = median(&deviations).unwrap_or_default();
    let mean_ad = deviations.iter().sum::<f64>() / deviations.len() as f64;

    let dispersion = if mad > 0.0 {
        Dispersion::Mad(mad)
    } else if mean_ad > 0.0 {
        Dispersion::MeanAbsolute(mean_ad)
    } else {
        Dispersion::Constant
    };

    let (kept, rejected): (Vec<_>, Vec<_>) = entries.iter().copied().partition(|entry| {
        let score = modified_z_score(entry.duration(), center, dispersion);
        score.abs() < config.outlier_threshold
    });

    OutlierSplit {
        kept,
        rejected,
        median: Some(center),
        dispersion,
    }
}

/// Computes the modified z-score of a duration.
#[must_use]
pub fn modified_z_score(duration: f64, center: f64, dispersion: Dispersion) -> f64 {
    match dispersion {
        Dispersion::Mad(mad) => MODIFIED_Z_FACTOR * (duration - center) / (mad * MAD_CONSISTENCY),
        Dispersion::MeanAbsolute(mean_ad) => (duration - center) / (MEAN_AD_CONSISTENCY * mean_ad),
        Dispersion::Skipped | Dispersion::Constant => 0.0,
    }
}

/// Unweighted median taken as the element at index `len / 2` of the sorted
/// values, so even lengths use the upper of the two middle values.
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.get(sorted.len() / 2).copied()
}
