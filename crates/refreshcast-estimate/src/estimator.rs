//! Refresh duration estimation pipeline.

use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset, Offset, Utc};
use refreshcast_types::{
    Confidence, ContextualFactors, EstimateRange, HistoryEntry, RefreshEstimate, RefreshKind,
    ResourceMetadata,
};
use serde::Serialize;
use tracing::{debug, trace};

use crate::data::{BaselineTable, FallbackBaseline, floor_seconds};
use crate::filter::filter_history;
use crate::message::{MessageInputs, computed_message, fallback_message};
use crate::outlier::reject_outliers;
use crate::scoring::{has_recent_failures, is_large_dataset, is_peak_hour, score_stats};
use crate::weight::{kind_breakdown, select_by_kind};
use crate::{Classifier, ConfigError, EstimatorConfig, ProcessedEntry, WeightedStats};

/// Static estimator instance.
static ESTIMATOR: OnceLock<Estimator> = OnceLock::new();

/// Why the estimator fell back to a storage-mode baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FallbackReason {
    /// No completed refresh within the lookback window.
    NoHistory,
    /// Every candidate refresh was rejected as an outlier.
    AllOutliers,
    /// The remaining refreshes carried no usable weight.
    ZeroWeight,
}

impl FallbackReason {
    /// Returns the reason as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NoHistory => "no usable history",
            Self::AllOutliers => "all refreshes rejected as outliers",
            Self::ZeroWeight => "zero total weight",
        }
    }
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Terminal outcome of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "outcome")]
pub enum Outcome {
    /// Statistics were computed from history.
    Computed {
        /// Weighted summary of the surviving refreshes.
        stats: WeightedStats,
        /// True when too little same-kind history forced a mixed-kind sample.
        mixed_kinds: bool,
    },
    /// A storage-mode baseline was used instead.
    Fallback {
        /// Why history could not be used.
        reason: FallbackReason,
        /// Baseline the estimate was built from.
        baseline: FallbackBaseline,
    },
}

impl Outcome {
    /// Returns true for the fallback outcome.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// What happened to one processed refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Disposition {
    /// Contributed to the statistics.
    Used,
    /// Dropped because enough same-kind history exists.
    OtherKind,
    /// Rejected by the outlier test.
    Outlier,
}

impl Disposition {
    /// Returns the disposition as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Used => "used",
            Self::OtherKind => "other-kind",
            Self::Outlier => "outlier",
        }
    }
}

impl std::fmt::Display for Disposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A processed refresh together with its fate in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedEntry {
    /// The classified, weighted refresh.
    #[serde(flatten)]
    pub entry: ProcessedEntry,
    /// What the pipeline did with it.
    pub disposition: Disposition,
}

/// Full account of one estimation, for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateReport {
    /// The estimate handed to callers.
    pub estimate: RefreshEstimate,
    /// How the pipeline terminated.
    pub outcome: Outcome,
    /// Every refresh that passed the history filter, newest first.
    pub entries: Vec<AnalyzedEntry>,
}

/// History-based refresh duration estimator.
///
/// Holds only validated configuration; every call is a pure function of its
/// arguments, so one instance can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct Estimator {
    config: EstimatorConfig,
    offset: FixedOffset,
    classifier: Classifier,
    baselines: BaselineTable,
}

impl Estimator {
    /// Creates an estimator from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn new(config: EstimatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let offset = config.offset()?;
        Ok(Self {
            config,
            offset,
            classifier: Classifier::new(offset),
            baselines: BaselineTable::global().clone(),
        })
    }

    /// Returns the global estimator instance with default settings.
    #[must_use]
    pub fn global() -> &'static Self {
        ESTIMATOR.get_or_init(Self::default)
    }

    /// Replaces the fallback baseline table.
    #[must_use]
    pub fn with_baselines(mut self, baselines: BaselineTable) -> Self {
        self.baselines = baselines;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Returns the fallback baseline table.
    #[must_use]
    pub const fn baselines(&self) -> &BaselineTable {
        &self.baselines
    }

    /// Estimates the duration of the next refresh.
    #[must_use]
    pub fn estimate(
        &self,
        history: &[HistoryEntry],
        now: DateTime<Utc>,
        metadata: &ResourceMetadata,
        requested: RefreshKind,
    ) -> RefreshEstimate {
        self.analyze(history, now, metadata, requested).estimate
    }

    /// Estimates the duration of the next refresh and reports how it was reached.
    #[must_use]
    pub fn analyze(
        &self,
        history: &[HistoryEntry],
        now: DateTime<Utc>,
        metadata: &ResourceMetadata,
        requested: RefreshKind,
    ) -> EstimateReport {
        let config = &self.config;
        let peak = is_peak_hour(now, self.offset, config);
        let recent_failures = has_recent_failures(history, config);

        let filtered = filter_history(history, now, config);
        debug!(
            raw = history.len(),
            usable = filtered.len(),
            lookback_days = config.lookback_days,
            "filtered refresh history"
        );

        let processed: Vec<ProcessedEntry> = filtered
            .iter()
            .filter_map(|entry| {
                ProcessedEntry::from_entry(entry, now, &self.classifier, config.decay_tau_days)
            })
            .collect();
        for entry in &processed {
            trace!(
                start = %entry.start_time,
                duration = entry.duration_seconds,
                kind = %entry.classified_kind,
                weight = entry.weight,
                "processed refresh"
            );
        }

        if processed.is_empty() {
            return self.fallback(
                FallbackReason::NoHistory,
                Vec::new(),
                metadata,
                peak,
                recent_failures,
            );
        }

        let (manual, scheduled, unknown) = kind_breakdown(&processed);
        let selection = select_by_kind(&processed, requested, config);
        debug!(
            manual,
            scheduled,
            unknown,
            requested = %requested,
            selected = selection.selected.len(),
            mixed = selection.mixed,
            "classified refresh kinds"
        );

        let split = reject_outliers(&selection.selected, config);
        debug!(
            kept = split.kept.len(),
            rejected = split.rejected.len(),
            dispersion = ?split.dispersion,
            "outlier rejection"
        );

        let entries = annotate(&processed, &selection.excluded, &split.rejected);

        if split.kept.is_empty() {
            return self.fallback(
                FallbackReason::AllOutliers,
                entries,
                metadata,
                peak,
                recent_failures,
            );
        }

        let Some(stats) = WeightedStats::compute(&split.kept) else {
            return self.fallback(
                FallbackReason::ZeroWeight,
                entries,
                metadata,
                peak,
                recent_failures,
            );
        };

        let confidence = score_stats(&stats, config);
        let large = is_large_dataset(stats.p80, config);
        debug!(
            p50 = stats.p50,
            p80 = stats.p80,
            mean = stats.weighted_mean,
            std_dev = stats.standard_deviation,
            effective_n = stats.effective_sample_size,
            confidence = %confidence,
            "computed weighted statistics"
        );

        let compensation = config.latency_compensation;
        let max_factor = if peak {
            config.peak_range_max_factor
        } else {
            config.range_max_factor
        };
        let range = EstimateRange::clamped(
            floor_seconds(stats.p50 * config.range_min_factor * compensation),
            floor_seconds(stats.p50 * compensation),
            floor_seconds(stats.p80 * max_factor * compensation),
        );

        let message = computed_message(&MessageInputs {
            median_seconds: range.median,
            p80_seconds: stats.p80 * compensation,
            confidence,
            kind: requested,
            storage_mode: metadata.storage_mode,
            is_large_dataset: large,
            recent_failures,
        });

        let estimate = RefreshEstimate {
            range_seconds: range,
            confidence,
            historical_data_points: split.kept.len(),
            average_duration_seconds: range.median,
            contextual_factors: ContextualFactors {
                storage_mode: metadata.storage_mode,
                is_large_dataset: large,
                is_peak_hour: peak,
                recent_failures,
            },
            message,
        };

        EstimateReport {
            estimate,
            outcome: Outcome::Computed {
                stats,
                mixed_kinds: selection.mixed,
            },
            entries,
        }
    }

    /// Builds the storage-mode baseline estimate.
    fn fallback(
        &self,
        reason: FallbackReason,
        entries: Vec<AnalyzedEntry>,
        metadata: &ResourceMetadata,
        peak: bool,
        recent_failures: bool,
    ) -> EstimateReport {
        let baseline = self.baselines.get(metadata.storage_mode);
        debug!(
            reason = %reason,
            storage_mode = %metadata.storage_mode,
            baseline_seconds = baseline.seconds,
            "falling back to storage-mode baseline"
        );

        let range = baseline.range(self.config.latency_compensation);

        let estimate = RefreshEstimate {
            range_seconds: range,
            confidence: Confidence::Low,
            historical_data_points: 0,
            average_duration_seconds: range.median,
            contextual_factors: ContextualFactors {
                storage_mode: metadata.storage_mode,
                is_large_dataset: false,
                is_peak_hour: peak,
                recent_failures,
            },
            message: fallback_message(&baseline.message, recent_failures),
        };

        EstimateReport {
            estimate,
            outcome: Outcome::Fallback { reason, baseline },
            entries,
        }
    }
}

impl Default for Estimator {
    fn default() -> Self {
        Self {
            config: EstimatorConfig::default(),
            offset: Utc.fix(),
            classifier: Classifier::default(),
            baselines: BaselineTable::global().clone(),
        }
    }
}

/// Labels each processed refresh with its disposition.
fn annotate(
    processed: &[ProcessedEntry],
    excluded: &[ProcessedEntry],
    rejected: &[ProcessedEntry],
) -> Vec<AnalyzedEntry> {
    let mut excluded = excluded.to_vec();
    let mut rejected = rejected.to_vec();
    processed
        .iter()
        .map(|entry| {
            let disposition = if let Some(pos) = position_of(&excluded, entry) {
                excluded.swap_remove(pos);
                Disposition::OtherKind
            } else if let Some(pos) = position_of(&rejected, entry) {
                rejected.swap_remove(pos);
                Disposition::Outlier
            } else {
                Disposition::Used
            };
            AnalyzedEntry {
                entry: *entry,
                disposition,
            }
        })
        .collect()
}

/// Finds a refresh by start time and duration, ignoring any weight rescaling.
fn position_of(pool: &[ProcessedEntry], entry: &ProcessedEntry) -> Option<usize> {
    pool.iter().position(|candidate| {
        candidate.start_time == entry.start_time
            && candidate.duration_seconds == entry.duration_seconds
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};
    use refreshcast_types::{ClassifiedKind, RefreshStatus, StorageMode};

    /// Friday 2024-06-14 12:00 UTC, inside peak hours.
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 14, 12, 0, 0).unwrap()
    }

    /// Completed refresh started `days_ago` days before `now()` at 10:07.
    fn manual_run(days_ago: i64, seconds: i64) -> HistoryEntry {
        let start = Utc.with_ymd_and_hms(2024, 6, 14, 10, 7, 0).unwrap() - TimeDelta::days(days_ago);
        HistoryEntry::completed(start, start + TimeDelta::seconds(seconds))
    }

    fn import() -> ResourceMetadata {
        ResourceMetadata::new(StorageMode::Import)
    }

    fn assert_range_invariant(estimate: &RefreshEstimate) {
        let range = estimate.range_seconds;
        assert!(range.min >= 1, "{range:?}");
        assert!(range.min <= range.median, "{range:?}");
        assert!(range.median <= range.max, "{range:?}");
    }

    #[test]
    fn test_empty_history_falls_back() {
        let estimator = Estimator::default();
        let report = estimator.analyze(&[], now(), &import(), RefreshKind::Manual);

        assert_eq!(
            report.outcome,
            Outcome::Fallback {
                reason: FallbackReason::NoHistory,
                baseline: BaselineTable::global().get(StorageMode::Import),
            }
        );
        let estimate = report.estimate;
        assert_eq!(estimate.confidence, Confidence::Low);
        assert_eq!(estimate.historical_data_points, 0);
        assert_eq!(
            estimate.range_seconds,
            EstimateRange { min: 90, max: 360, median: 180 }
        );
        assert_eq!(estimate.average_duration_seconds, 180);
        assert_eq!(estimate.message, "Import datasets typically refresh in 1-5 minutes");
        assert_range_invariant(&estimate);
    }

    #[test]
    fn test_direct_query_fallback_is_fast() {
        let estimate = Estimator::default().estimate(
            &[],
            now(),
            &ResourceMetadata::new(StorageMode::DirectQuery),
            RefreshKind::Manual,
        );
        assert!(estimate.range_seconds.min < 30);
        assert_eq!(estimate.confidence, Confidence::Low);
        assert_eq!(estimate.contextual_factors.storage_mode, StorageMode::DirectQuery);
    }

    #[test]
    fn test_fallback_range_depends_only_on_storage_mode() {
        let estimator = Estimator::default();
        let mut seen = Vec::new();
        for mode in StorageMode::all() {
            let estimate =
                estimator.estimate(&[], now(), &ResourceMetadata::new(*mode), RefreshKind::Manual);
            assert_range_invariant(&estimate);
            seen.push(estimate.range_seconds.median);
        }
        assert_eq!(seen, vec![180, 30, 15, 300, 120]);
    }

    #[test]
    fn test_scenario_spike_rejected() {
        let durations = [40, 42, 41, 39, 43, 41, 40, 250];
        let history: Vec<HistoryEntry> = durations
            .iter()
            .enumerate()
            .map(|(i, &d)| manual_run(i as i64 + 1, d))
            .collect();

        let report = Estimator::default().analyze(&history, now(), &import(), RefreshKind::Manual);
        let estimate = &report.estimate;

        assert_eq!(estimate.historical_data_points, 7);
        assert!(
            (40..=42).contains(&estimate.range_seconds.median),
            "{:?}",
            estimate.range_seconds
        );
        assert!(matches!(
            estimate.confidence,
            Confidence::Medium | Confidence::High
        ));
        assert!(
            report
                .entries
                .iter()
                .all(|e| e.entry.classified_kind == ClassifiedKind::Manual)
        );
        let outliers: Vec<u64> = report
            .entries
            .iter()
            .filter(|e| e.disposition == Disposition::Outlier)
            .map(|e| e.entry.duration_seconds)
            .collect();
        assert_eq!(outliers, vec![250]);
        assert!(matches!(
            report.outcome,
            Outcome::Computed { mixed_kinds: false, .. }
        ));
        assert_range_invariant(estimate);
    }

    #[test]
    fn test_outlier_resistance() {
        let mut history: Vec<HistoryEntry> = (1..=10).map(|d| manual_run(d, 100)).collect();
        history.push(manual_run(3, 10_000));

        let estimate =
            Estimator::default().estimate(&history, now(), &import(), RefreshKind::Manual);
        assert_eq!(estimate.historical_data_points, 10);
        assert!(estimate.range_seconds.median.abs_diff(100) <= 3);
        assert_range_invariant(&estimate);
    }

    #[test]
    fn test_computed_range_and_peak_factor() {
        let history: Vec<HistoryEntry> = (1..=6).map(|d| manual_run(d, 100)).collect();
        let estimator = Estimator::default();

        let peak = estimator.estimate(&history, now(), &import(), RefreshKind::Manual);
        assert!(peak.contextual_factors.is_peak_hour);
        assert_eq!(peak.range_seconds, EstimateRange { min: 70, max: 120, median: 100 });
        assert_eq!(peak.average_duration_seconds, 100);
        assert_eq!(peak.confidence, Confidence::High);

        let evening = now() + TimeDelta::hours(8);
        let off_peak = estimator.estimate(&history, evening, &import(), RefreshKind::Manual);
        assert!(!off_peak.contextual_factors.is_peak_hour);
        assert_eq!(off_peak.range_seconds.max, 110);
    }

    #[test]
    fn test_single_entry_is_low_confidence() {
        let history = vec![manual_run(1, 45)];
        let estimate =
            Estimator::default().estimate(&history, now(), &import(), RefreshKind::Manual);
        assert_eq!(estimate.historical_data_points, 1);
        assert_eq!(estimate.confidence, Confidence::Low);
        assert_eq!(estimate.range_seconds.median, 45);
        assert_eq!(
            estimate.message,
            "Manual refresh - estimated takes 45 seconds (low confidence)"
        );
    }

    #[test]
    fn test_tiny_durations_respect_bounds() {
        let start = now() - TimeDelta::days(1);
        let history = vec![
            HistoryEntry::completed(start, start + TimeDelta::milliseconds(200)),
            HistoryEntry::completed(
                start - TimeDelta::hours(1),
                start - TimeDelta::hours(1) + TimeDelta::milliseconds(400),
            ),
        ];
        let estimate =
            Estimator::default().estimate(&history, now(), &import(), RefreshKind::Manual);
        assert_eq!(estimate.range_seconds, EstimateRange { min: 1, max: 2, median: 1 });
        assert_range_invariant(&estimate);
    }

    #[test]
    fn test_scheduled_history_for_manual_request_mixes() {
        // Quarter-hour weekday starts classify as scheduled.
        let history: Vec<HistoryEntry> = (1..=4)
            .map(|d| {
                let start = Utc.with_ymd_and_hms(2024, 6, 10, 3, 0, 0).unwrap()
                    + TimeDelta::days(d % 4);
                HistoryEntry::completed(start, start + TimeDelta::seconds(300))
            })
            .collect();

        let report = Estimator::default().analyze(&history, now(), &import(), RefreshKind::Manual);
        assert!(matches!(
            report.outcome,
            Outcome::Computed { mixed_kinds: true, .. }
        ));
        assert_eq!(report.estimate.historical_data_points, 4);

        let scheduled =
            Estimator::default().analyze(&history, now(), &import(), RefreshKind::Scheduled);
        assert!(matches!(
            scheduled.outcome,
            Outcome::Computed { mixed_kinds: false, .. }
        ));
    }

    #[test]
    fn test_other_kinds_excluded_when_enough_same_kind() {
        let mut history: Vec<HistoryEntry> = (1..=4).map(|d| manual_run(d, 60)).collect();
        history.push(manual_run(2, 900).with_kind("Scheduled"));

        let report = Estimator::default().analyze(&history, now(), &import(), RefreshKind::Manual);
        assert_eq!(report.estimate.historical_data_points, 4);
        let other: Vec<&AnalyzedEntry> = report
            .entries
            .iter()
            .filter(|e| e.disposition == Disposition::OtherKind)
            .collect();
        assert_eq!(other.len(), 1);
        assert_eq!(other[0].entry.duration_seconds, 900);
    }

    #[test]
    fn test_recent_failures_flagged() {
        let mut history: Vec<HistoryEntry> = (1..=5).map(|d| manual_run(d, 60)).collect();
        let failed_start = now() - TimeDelta::hours(1);
        history.push(HistoryEntry::new(
            Some("OnDemand".into()),
            Some(failed_start),
            Some(failed_start + TimeDelta::seconds(5)),
            RefreshStatus::Failed,
        ));

        let estimate =
            Estimator::default().estimate(&history, now(), &import(), RefreshKind::Manual);
        assert!(estimate.contextual_factors.recent_failures);
        assert!(estimate.message.ends_with("(recent failures detected)"));
        assert_eq!(estimate.historical_data_points, 5);
    }

    #[test]
    fn test_stale_history_falls_back() {
        let history = vec![manual_run(90, 60), manual_run(120, 60)];
        let report = Estimator::default().analyze(&history, now(), &import(), RefreshKind::Manual);
        assert!(report.outcome.is_fallback());
        assert!(report.entries.is_empty());
    }

    #[test]
    fn test_weighting_prefers_recent() {
        // Three recent fast refreshes outweigh three old slow ones at the median.
        let history = vec![
            manual_run(1, 60),
            manual_run(2, 62),
            manual_run(3, 61),
            manual_run(40, 75),
            manual_run(41, 76),
            manual_run(42, 77),
        ];
        let estimate =
            Estimator::default().estimate(&history, now(), &import(), RefreshKind::Manual);
        assert!(estimate.range_seconds.median <= 62);
    }

    #[test]
    fn test_latency_compensation_applies_uniformly() {
        let config = EstimatorConfig::default().with_latency_compensation(1.2);
        let estimator = Estimator::new(config).unwrap();
        let history: Vec<HistoryEntry> = (1..=6).map(|d| manual_run(d, 100)).collect();

        let computed = estimator.estimate(&history, now(), &import(), RefreshKind::Manual);
        assert_eq!(computed.range_seconds, EstimateRange { min: 84, max: 144, median: 120 });
        assert_eq!(computed.average_duration_seconds, 120);

        let fallback = estimator.estimate(&[], now(), &import(), RefreshKind::Manual);
        assert_eq!(fallback.range_seconds, EstimateRange { min: 108, max: 432, median: 216 });
    }

    #[test]
    fn test_deterministic_output() {
        let history: Vec<HistoryEntry> = (1..=12)
            .map(|d| manual_run(d, 50 + (d * 7) % 13))
            .collect();
        let estimator = Estimator::default();
        let a = estimator.estimate(&history, now(), &import(), RefreshKind::Manual);
        let b = estimator.estimate(&history, now(), &import(), RefreshKind::Manual);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_range_invariant_over_varied_inputs() {
        let estimator = Estimator::default();
        for seed in 0..50i64 {
            let history: Vec<HistoryEntry> = (0..(seed % 15))
                .map(|i| manual_run((i * 5 + seed) % 70, 1 + (i * seed * 37) % 4000))
                .collect();
            let estimate = estimator.estimate(&history, now(), &import(), RefreshKind::Manual);
            assert_range_invariant(&estimate);
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EstimatorConfig {
            decay_tau_days: -1.0,
            ..EstimatorConfig::default()
        };
        assert!(Estimator::new(config).is_err());
    }
}
