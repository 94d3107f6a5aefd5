//! Refresh kind definitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::ParseError;

/// Kind of refresh being estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RefreshKind {
    /// User-triggered, on-demand refresh.
    #[default]
    Manual,
    /// Refresh triggered by a schedule.
    Scheduled,
}

impl RefreshKind {
    /// Returns the kind as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "Manual",
            Self::Scheduled => "Scheduled",
        }
    }
}

impl std::fmt::Display for RefreshKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RefreshKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "manual" | "ondemand" | "on-demand" => Ok(Self::Manual),
            "scheduled" | "schedule" => Ok(Self::Scheduled),
            _ => Err(ParseError::InvalidKind(s.to_string())),
        }
    }
}

/// Kind inferred for a past refresh from its tag or timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassifiedKind {
    /// Looks user-triggered.
    Manual,
    /// Looks schedule-triggered.
    Scheduled,
    /// Not enough signal either way.
    Unknown,
}

impl ClassifiedKind {
    /// Returns the kind as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "Manual",
            Self::Scheduled => "Scheduled",
            Self::Unknown => "Unknown",
        }
    }

    /// Returns true if this classification equals the requested kind.
    #[must_use]
    pub const fn matches(&self, kind: RefreshKind) -> bool {
        matches!(
            (self, kind),
            (Self::Manual, RefreshKind::Manual) | (Self::Scheduled, RefreshKind::Scheduled)
        )
    }
}

impl std::fmt::Display for ClassifiedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
