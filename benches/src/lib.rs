//! Benchmark fixtures for refreshcast.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use refreshcast_lib::prelude::*;

/// Fixed estimation time so runs are comparable.
pub fn bench_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 14, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Builds `count` refreshes spread over the lookback window.
///
/// Every fourth refresh is a scheduled 03:00 run, every tenth a failure and
/// every seventeenth a slow outlier, so each pipeline stage has work to do.
pub fn synthetic_history(count: usize, now: DateTime<Utc>) -> Vec<HistoryEntry> {
    (0..count)
        .map(|i| {
            let days = i64::try_from(i).unwrap_or(i64::MAX) % 55 + 1;
            let scheduled = i % 4 == 0;
            let start = if scheduled {
                (now - TimeDelta::days(days))
                    .date_naive()
                    .and_hms_opt(3, 0, 0)
                    .map_or(now, |naive| naive.and_utc())
            } else {
                now - TimeDelta::days(days) - TimeDelta::minutes(113)
            };
            let seconds = if i % 17 == 0 { 2_400 } else { 90 + (i as i64 * 37) % 60 };
            let status = if i % 10 == 9 {
                RefreshStatus::Failed
            } else {
                RefreshStatus::Completed
            };
            let kind = if scheduled { "Scheduled" } else { "ViaApi" };
            HistoryEntry::new(
                Some(kind.to_string()),
                Some(start),
                Some(start + TimeDelta::seconds(seconds)),
                status,
            )
        })
        .collect()
}

/// Renders history as CSV for decoder benchmarks.
pub fn history_csv(history: &[HistoryEntry]) -> String {
    let mut csv = String::from("refreshType,startTime,endTime,status\n");
    for entry in history {
        let timestamp = |t: Option<DateTime<Utc>>| t.map(|t| t.to_rfc3339()).unwrap_or_default();
        csv.push_str(&format!(
            "{},{},{},{}\n",
            entry.kind.as_deref().unwrap_or_default(),
            timestamp(entry.start_time),
            timestamp(entry.end_time),
            entry.status
        ));
    }
    csv
}
