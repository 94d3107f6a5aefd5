//! Refresh history entries.

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ParseError;

/// Status of a past refresh execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RefreshStatus {
    /// The refresh finished successfully.
    Completed,
    /// The refresh failed.
    Failed,
    /// The refresh was still running when the history was captured.
    InProgress,
    /// The refresh was cancelled.
    Cancelled,
    /// Status string not recognised by the decoder.
    #[default]
    Unknown,
}

impl RefreshStatus {
    /// Returns the status as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::Failed => "Failed",
            Self::InProgress => "InProgress",
            Self::Cancelled => "Cancelled",
            Self::Unknown => "Unknown",
        }
    }

    /// Returns true for statuses that count as a failed attempt.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed | Self::Cancelled)
    }

    /// Parses a status leniently, mapping anything unrecognised to [`Self::Unknown`].
    ///
    /// Case, spaces, dashes and underscores are ignored, so `"In Progress"`,
    /// `"in_progress"` and `"InProgress"` are equivalent.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "completed" | "succeeded" | "success" => Self::Completed,
            "failed" | "failure" | "error" => Self::Failed,
            "inprogress" | "running" | "notstarted" => Self::InProgress,
            "cancelled" | "canceled" => Self::Cancelled,
            _ => Self::Unknown,
        }
    }
}

impl<'de> Deserialize<'de> for RefreshStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawText::deserialize(deserializer)? {
            RawText::Text(text) => Self::parse(&text),
            RawText::Other(_) => Self::Unknown,
        })
    }
}

impl Serialize for RefreshStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl std::fmt::Display for RefreshStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One past refresh execution.
///
/// Both timestamps are optional because source systems routinely report
/// in-flight or aborted refreshes without an end time. Unusable entries are
/// carried through decoding and dropped by the estimator's history filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Free-form trigger tag from the source system (e.g. "Scheduled", "OnDemand").
    #[serde(
        default,
        alias = "refreshType",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    /// When the refresh started.
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_time: Option<DateTime<Utc>>,
    /// When the refresh ended.
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time: Option<DateTime<Utc>>,
    /// Reported status.
    #[serde(default)]
    pub status: RefreshStatus,
}

impl HistoryEntry {
    /// Creates a new history entry.
    #[must_use]
    pub const fn new(
        kind: Option<String>,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
        status: RefreshStatus,
    ) -> Self {
        Self {
            kind,
            start_time,
            end_time,
            status,
        }
    }

    /// Creates a completed entry without a kind tag.
    #[must_use]
    pub const fn completed(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self::new(
            None,
            Some(start_time),
            Some(end_time),
            RefreshStatus::Completed,
        )
    }

    /// Sets the trigger tag.
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Returns the elapsed time when both timestamps are present and ordered.
    #[must_use]
    pub fn duration(&self) -> Option<TimeDelta> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) if end > start => Some(end - start),
            _ => None,
        }
    }

    /// Returns true if this entry can contribute to duration statistics.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.status == RefreshStatus::Completed && self.duration().is_some()
    }
}

/// Parses a timestamp as RFC 3339, falling back to a naive date-time taken as UTC.
///
/// # Errors
///
/// Returns [`ParseError::InvalidTimestamp`] if neither form matches.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, ParseError> {
    let trimmed = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ParseError::InvalidTimestamp(s.to_string()))
}

/// Raw text field as it appears in source documents; anything but a string is `Other`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawText {
    Text(String),
    #[allow(dead_code)]
    Other(serde::de::IgnoredAny),
}

/// Deserializes a timestamp, turning unparseable values into `None`.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.and_then(|text| parse_timestamp(&text).ok()))
}

/// Deserializes an optional string, turning non-string values into `None`.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawText>::deserialize(deserializer)? {
        Some(RawText::Text(text)) => Some(text),
        Some(RawText::Other(_)) | None => None,
    })
}
