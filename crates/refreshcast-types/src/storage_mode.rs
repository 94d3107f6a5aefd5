//! Resource storage modes.

use serde::{Deserialize, Serialize, Serializer};
use std::convert::Infallible;
use std::str::FromStr;

/// How the refreshed resource stores its data.
///
/// Only used to pick a fallback baseline and to phrase messages; statistics
/// never depend on it when real history exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(from = "String")]
pub enum StorageMode {
    /// Data is imported and fully reprocessed on refresh.
    Import,
    /// Queries go straight to the source; refresh only touches metadata.
    DirectQuery,
    /// Live connection to an external model.
    LiveConnection,
    /// Mix of imported and direct-query tables.
    Composite,
    /// Storage mode not known.
    #[default]
    Unknown,
}

impl StorageMode {
    /// Returns the storage mode as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Import => "Import",
            Self::DirectQuery => "DirectQuery",
            Self::LiveConnection => "LiveConnection",
            Self::Composite => "Composite",
            Self::Unknown => "Unknown",
        }
    }

    /// Returns all storage modes.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Import,
            Self::DirectQuery,
            Self::LiveConnection,
            Self::Composite,
            Self::Unknown,
        ]
    }

    /// Parses a storage mode leniently.
    ///
    /// Case, spaces, dashes and underscores are ignored; unrecognised input
    /// maps to [`Self::Unknown`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "import" => Self::Import,
            "directquery" | "dq" => Self::DirectQuery,
            "liveconnection" | "live" => Self::LiveConnection,
            "composite" | "mixed" | "dual" => Self::Composite,
            _ => Self::Unknown,
        }
    }
}

impl From<String> for StorageMode {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl FromStr for StorageMode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl Serialize for StorageMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl std::fmt::Display for StorageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Static metadata about the refreshed resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMetadata {
    /// Storage mode of the resource.
    #[serde(default)]
    pub storage_mode: StorageMode,
}

impl ResourceMetadata {
    /// Creates metadata for a resource with the given storage mode.
    #[must_use]
    pub const fn new(storage_mode: StorageMode) -> Self {
        Self { storage_mode }
    }
}
