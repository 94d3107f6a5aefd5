//! Refresh kind classification from trigger tags and timing patterns.

use chrono::{DateTime, Datelike, FixedOffset, Offset, Timelike, Utc, Weekday};
use refreshcast_types::ClassifiedKind;

/// Score at or above which a refresh is treated as scheduled.
const SCHEDULED_MIN_SCORE: u32 = 4;

/// Score at or below which a business-hours refresh may be manual.
const MANUAL_MAX_SCORE: u32 = 1;

/// Classifies past refreshes as manual, scheduled or unknown.
///
/// An explicit trigger tag wins when it is unambiguous. Otherwise the start
/// time is scored: schedulers fire on quarter-hour boundaries, off-peak, on
/// weekdays, and often in the 02:00-05:59 batch window.
#[derive(Debug, Clone, Copy)]
pub struct Classifier {
    offset: FixedOffset,
}

impl Classifier {
    /// Creates a classifier that reads wall-clock time at the given offset.
    #[must_use]
    pub const fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Classifies a refresh from its optional tag and start time.
    #[must_use]
    pub fn classify(&self, tag: Option<&str>, start_time: DateTime<Utc>) -> ClassifiedKind {
        if let Some(kind) = tag.and_then(classify_tag) {
            return kind;
        }
        self.classify_timing(start_time)
    }

    /// Classifies a refresh from its start time alone.
    #[must_use]
    pub fn classify_timing(&self, start_time: DateTime<Utc>) -> ClassifiedKind {
        let local = start_time.with_timezone(&self.offset);
        let hour = local.hour();
        let on_quarter_hour = local.minute() % 15 == 0;
        let score = self.scheduled_score(start_time);

        if score >= SCHEDULED_MIN_SCORE {
            ClassifiedKind::Scheduled
        } else if score <= MANUAL_MAX_SCORE && (8..=18).contains(&hour) && !on_quarter_hour {
            ClassifiedKind::Manual
        } else {
            ClassifiedKind::Unknown
        }
    }

    /// Returns how strongly the start time looks like a scheduled trigger.
    #[must_use]
    pub fn scheduled_score(&self, start_time: DateTime<Utc>) -> u32 {
        let local = start_time.with_timezone(&self.offset);
        let hour = local.hour();
        let weekend = matches!(local.weekday(), Weekday::Sat | Weekday::Sun);

        let mut score = 0;
        if local.minute() % 15 == 0 {
            score += 3;
        }
        if !(6..=22).contains(&hour) {
            score += 2;
        }
        if !weekend {
            score += 1;
        }
        if (2..=5).contains(&hour) {
            score += 2;
        }
        score
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(Utc.fix())
    }
}

/// Maps an explicit trigger tag to a kind, if it is unambiguous.
#[must_use]
pub fn classify_tag(tag: &str) -> Option<ClassifiedKind> {
    let tag = tag.to_lowercase();
    if tag.contains("schedul") || tag.contains("automatic") {
        Some(ClassifiedKind::Scheduled)
    } else if tag.contains("manual") || tag.contains("demand") || tag.contains("user") {
        Some(ClassifiedKind::Manual)
    } else {
        None
    }
}
