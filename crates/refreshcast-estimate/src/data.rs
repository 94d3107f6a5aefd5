//! Fallback baselines used when a resource has no usable history.

use std::collections::HashMap;
use std::sync::OnceLock;

use refreshcast_types::{EstimateRange, StorageMode};
use serde::{Deserialize, Serialize};

/// Embedded JSON data with per-storage-mode baselines.
const FALLBACK_BASELINES_JSON: &str = include_str!("../data/fallback_baselines.json");

/// Fraction of the baseline used as the optimistic fallback bound.
const FALLBACK_MIN_FACTOR: f64 = 0.5;

/// Multiple of the baseline used as the pessimistic fallback bound.
const FALLBACK_MAX_FACTOR: f64 = 2.0;

/// Static baseline table instance.
static BASELINES: OnceLock<BaselineTable> = OnceLock::new();

/// Conservative duration assumption for one storage mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackBaseline {
    /// Storage mode this baseline applies to.
    pub storage_mode: StorageMode,
    /// Typical refresh duration in seconds.
    pub seconds: u64,
    /// Fixed message shown alongside the fallback estimate.
    pub message: String,
}

impl FallbackBaseline {
    /// Creates a new baseline.
    #[must_use]
    pub fn new(storage_mode: StorageMode, seconds: u64, message: impl Into<String>) -> Self {
        Self {
            storage_mode,
            seconds,
            message: message.into(),
        }
    }

    /// Returns the fallback range after scaling the baseline by `latency_compensation`.
    ///
    /// The median is the scaled baseline, the minimum half of it and the
    /// maximum twice it, each floored to whole seconds.
    #[must_use]
    pub fn range(&self, latency_compensation: f64) -> EstimateRange {
        let seconds = self.seconds as f64 * latency_compensation;
        EstimateRange::clamped(
            floor_seconds(seconds * FALLBACK_MIN_FACTOR),
            floor_seconds(seconds),
            floor_seconds(seconds * FALLBACK_MAX_FACTOR),
        )
    }
}

/// Floors a non-negative number of seconds into an integer.
pub(crate) fn floor_seconds(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    }
}

/// Raw JSON structure for deserialization.
#[derive(Debug, Deserialize)]
struct RawBaselineData {
    baselines: HashMap<String, RawBaseline>,
}

/// Raw baseline from JSON.
#[derive(Debug, Deserialize)]
struct RawBaseline {
    seconds: u64,
    message: String,
}

/// Fallback baselines keyed by storage mode.
#[derive(Debug, Clone)]
pub struct BaselineTable {
    baselines: HashMap<StorageMode, FallbackBaseline>,
}

impl BaselineTable {
    /// Returns the global baseline table.
    ///
    /// This lazily initializes the table from embedded JSON on first access.
    #[must_use]
    pub fn global() -> &'static Self {
        BASELINES.get_or_init(|| {
            Self::from_json(FALLBACK_BASELINES_JSON)
                .expect("embedded fallback_baselines.json should be valid")
        })
    }

    /// Creates a baseline table from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: RawBaselineData = serde_json::from_str(json)?;
        let baselines = raw
            .baselines
            .into_iter()
            .map(|(name, raw)| {
                let mode = StorageMode::parse(&name);
                (mode, FallbackBaseline::new(mode, raw.seconds, raw.message))
            })
            .collect();
        Ok(Self { baselines })
    }

    /// Returns the baseline for a storage mode.
    ///
    /// Modes missing from the table use the `Unknown` entry, then the
    /// built-in [`Self::default_baseline`].
    #[must_use]
    pub fn get(&self, mode: StorageMode) -> FallbackBaseline {
        self.baselines
            .get(&mode)
            .or_else(|| self.baselines.get(&StorageMode::Unknown))
            .cloned()
            .unwrap_or_else(Self::default_baseline)
    }

    /// Returns all baselines ordered as [`StorageMode::all`].
    pub fn iter(&self) -> impl Iterator<Item = &FallbackBaseline> {
        StorageMode::all()
            .iter()
            .filter_map(|mode| self.baselines.get(mode))
    }

    /// Returns the number of baselines in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.baselines.len()
    }

    /// Returns true if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.baselines.is_empty()
    }

    /// Returns the baseline used when nothing else is known.
    #[must_use]
    pub fn default_baseline() -> FallbackBaseline {
        FallbackBaseline::new(
            StorageMode::Unknown,
            120,
            "First refresh - time estimate will improve with history",
        )
    }
}

impl Default for BaselineTable {
    fn default() -> Self {
        Self::global().clone()
    }
}
