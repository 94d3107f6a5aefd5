//! Per-refresh weighting: recency decay and kind matching.

use chrono::{DateTime, Utc};
use refreshcast_types::{ClassifiedKind, HistoryEntry, RefreshKind};
use serde::Serialize;

use crate::{Classifier, EstimatorConfig};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// A usable refresh after classification and weighting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedEntry {
    /// When the refresh started.
    pub start_time: DateTime<Utc>,
    /// Elapsed whole seconds, at least 1.
    pub duration_seconds: u64,
    /// Age of the start time at estimation time, in days, never negative.
    pub age_days: f64,
    /// Inferred kind.
    pub classified_kind: ClassifiedKind,
    /// Statistical weight, never negative.
    pub weight: f64,
}

impl ProcessedEntry {
    /// Classifies and weights a history entry by recency alone.
    ///
    /// Returns `None` for entries without a usable duration.
    #[must_use]
    pub fn from_entry(
        entry: &HistoryEntry,
        now: DateTime<Utc>,
        classifier: &Classifier,
        decay_tau_days: f64,
    ) -> Option<Self> {
        let start_time = entry.start_time?;
        let duration = entry.duration()?;
        let duration_seconds = u64::try_from(duration.num_seconds()).unwrap_or(0).max(1);
        let age_days = ((now - start_time).num_milliseconds() as f64 / 1000.0 / SECONDS_PER_DAY)
            .max(0.0);

        Some(Self {
            start_time,
            duration_seconds,
            age_days,
            classified_kind: classifier.classify(entry.kind.as_deref(), start_time),
            weight: recency_weight(age_days, decay_tau_days),
        })
    }

    /// Returns a copy with the weight scaled by `factor`.
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            weight: self.weight * factor,
            ..self
        }
    }

    /// Returns the duration as a float.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.duration_seconds as f64
    }
}

/// Exponential recency decay: `exp(-age / tau)`.
#[must_use]
pub fn recency_weight(age_days: f64, decay_tau_days: f64) -> f64 {
    (-age_days.max(0.0) / decay_tau_days).exp()
}

/// Result of matching processed refreshes against the requested kind.
#[derive(Debug, Clone, PartialEq)]
pub struct KindSelection {
    /// Refreshes carried forward to outlier rejection.
    pub selected: Vec<ProcessedEntry>,
    /// Refreshes dropped because enough same-kind history exists.
    pub excluded: Vec<ProcessedEntry>,
    /// True when too little same-kind history forced a mixed-kind sample.
    pub mixed: bool,
}

/// Prefers history of the requested kind.
///
/// With at least `min_same_kind` matching refreshes only those are kept at
/// full weight. Otherwise every refresh is kept and non-matching ones are
/// down-weighted by `mismatch_weight`.
#[must_use]
pub fn select_by_kind(
    entries: &[ProcessedEntry],
    requested: RefreshKind,
    config: &EstimatorConfig,
) -> KindSelection {
    let (matching, others): (Vec<ProcessedEntry>, Vec<ProcessedEntry>) = entries
        .iter()
        .copied()
        .partition(|entry| entry.classified_kind.matches(requested));

    if matching.len() >= config.min_same_kind {
        return KindSelection {
            selected: matching,
            excluded: others,
            mixed: false,
        };
    }

    let selected = entries
        .iter()
        .map(|entry| {
            if entry.classified_kind.matches(requested) {
                *entry
            } else {
                entry.scaled(config.mismatch_weight)
            }
        })
        .collect();

    KindSelection {
        selected,
        excluded: Vec::new(),
        mixed: true,
    }
}

/// Counts entries per classified kind as `(manual, scheduled, unknown)`.
#[must_use]
pub fn kind_breakdown(entries: &[ProcessedEntry]) -> (usize, usize, usize) {
    entries
        .iter()
        .fold((0, 0, 0), |(m, s, u), entry| match entry.classified_kind {
            ClassifiedKind::Manual => (m + 1, s, u),
            ClassifiedKind::Scheduled => (m, s + 1, u),
            ClassifiedKind::Unknown => (m, s, u + 1),
        })
}
