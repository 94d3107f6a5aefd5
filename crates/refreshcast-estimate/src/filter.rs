//! History filtering: recent, completed refreshes, newest first.

use chrono::{DateTime, TimeDelta, Utc};
use refreshcast_types::HistoryEntry;

use crate::EstimatorConfig;

/// Selects the refreshes usable for statistics.
///
/// Keeps completed entries with both timestamps, `end > start`, and a start
/// no older than the lookback window. The result is ordered by start time,
/// newest first, and truncated to the configured cap. An empty result is not
/// an error; it sends the estimator down the fallback path.
#[must_use]
pub fn filter_history<'a>(
    history: &'a [HistoryEntry],
    now: DateTime<Utc>,
    config: &EstimatorConfig,
) -> Vec<&'a HistoryEntry> {
    let cutoff = now - TimeDelta::days(i64::from(config.lookback_days));

    let mut usable: Vec<&HistoryEntry> = history
        .iter()
        .filter(|entry| entry.is_usable())
        .filter(|entry| entry.start_time.is_some_and(|start| start >= cutoff))
        .collect();

    usable.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    usable.truncate(config.max_entries);
    usable
}

/// Returns the most recent raw attempts regardless of status.
///
/// Entries without a start time sort after every timestamped entry.
#[must_use]
pub fn most_recent_attempts(history: &[HistoryEntry], window: usize) -> Vec<&HistoryEntry> {
    let mut attempts: Vec<&HistoryEntry> = history.iter().collect();
    // `None < Some(_)`, so a descending sort on the Option puts undated entries last.
    attempts.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    attempts.truncate(window);
    attempts
}
