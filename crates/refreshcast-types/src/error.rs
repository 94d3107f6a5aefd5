//! Error types for refreshcast.

use thiserror::Error;

/// Errors raised when parsing user-supplied values.
///
/// History decoding never produces these for individual entries: malformed
/// entries are kept with absent fields and filtered later. They surface only
/// for values a caller passes explicitly, such as the estimation instant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Unrecognised refresh kind.
    #[error("invalid refresh kind '{0}', expected one of: manual, scheduled")]
    InvalidKind(String),

    /// Timestamp that is neither RFC 3339 nor a naive UTC date-time.
    #[error("invalid timestamp '{0}', expected RFC 3339 (e.g. 2024-05-01T08:13:00Z)")]
    InvalidTimestamp(String),
}
