//! Fixed message templates for estimates.

use refreshcast_types::{Confidence, RefreshKind, StorageMode};

/// Suffix appended when recent attempts failed.
const RECENT_FAILURES_SUFFIX: &str = " (recent failures detected)";

/// Numeric inputs of a computed-estimate message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MessageInputs {
    /// Reported median in seconds.
    pub median_seconds: u64,
    /// Reported 80th percentile in seconds.
    pub p80_seconds: f64,
    /// Confidence of the estimate.
    pub confidence: Confidence,
    /// Kind of refresh being estimated.
    pub kind: RefreshKind,
    /// Storage mode of the resource.
    pub storage_mode: StorageMode,
    /// Whether the dataset counts as large.
    pub is_large_dataset: bool,
    /// Whether recent attempts failed.
    pub recent_failures: bool,
}

/// Renders the message for an estimate computed from history.
///
/// The template is picked by the magnitude of the median: seconds below one
/// minute, minutes below five, a size-aware phrase below thirty, and an
/// extended-refresh phrase beyond that.
#[must_use]
pub fn computed_message(inputs: &MessageInputs) -> String {
    let median = inputs.median_seconds;
    let qualifier = inputs.confidence.qualifier();
    let confidence = inputs.confidence;
    let minutes = median.div_ceil(60);

    let mut message = if median < 60 {
        format!(
            "{} refresh - {qualifier} takes {median} second{} ({confidence} confidence)",
            inputs.kind,
            plural(median),
        )
    } else if median < 300 {
        let max_minutes = (inputs.p80_seconds / 60.0).ceil() as u64;
        let range = if inputs.p80_seconds > median as f64 * 1.5 {
            format!(" (up to {max_minutes} min)")
        } else {
            String::new()
        };
        format!(
            "{} refresh - {qualifier} takes {minutes} minute{}{range} ({confidence} confidence)",
            inputs.kind,
            plural(minutes),
        )
    } else if median < 1800 {
        let context = if inputs.is_large_dataset {
            "Large dataset"
        } else if inputs.storage_mode == StorageMode::Import {
            "Import mode"
        } else {
            "Standard refresh"
        };
        format!("{context} - {qualifier} takes {minutes} minutes ({confidence} confidence)")
    } else {
        format!(
            "Extended refresh - {qualifier} takes {minutes} minutes (large {} dataset)",
            inputs.storage_mode
        )
    };

    if inputs.recent_failures {
        message.push_str(RECENT_FAILURES_SUFFIX);
    }
    message
}

/// Renders the message for a fallback estimate.
#[must_use]
pub fn fallback_message(baseline_message: &str, recent_failures: bool) -> String {
    let mut message = baseline_message.to_string();
    if recent_failures {
        message.push_str(RECENT_FAILURES_SUFFIX);
    }
    message
}

const fn plural(n: u64) -> &'static str {
    if n == 1 { "" } else { "s" }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(median_seconds: u64, p80_seconds: f64) -> MessageInputs {
        MessageInputs {
            median_seconds,
            p80_seconds,
            confidence: Confidence::High,
            kind: RefreshKind::Manual,
            storage_mode: StorageMode::Import,
            is_large_dataset: false,
            recent_failures: false,
        }
    }

    #[test]
    fn test_seconds_template() {
        assert_eq!(
            computed_message(&inputs(41, 43.0)),
            "Manual refresh - typically takes 41 seconds (high confidence)"
        );
        assert_eq!(
            computed_message(&inputs(1, 1.0)),
            "Manual refresh - typically takes 1 second (high confidence)"
        );
    }

    #[test]
    fn test_minutes_template() {
        assert_eq!(
            computed_message(&inputs(90, 100.0)),
            "Manual refresh - typically takes 2 minutes (high confidence)"
        );
        assert_eq!(
            computed_message(&MessageInputs {
                confidence: Confidence::Medium,
                kind: RefreshKind::Scheduled,
                ..inputs(60, 200.0)
            }),
            "Scheduled refresh - usually takes 1 minute (up to 4 min) (medium confidence)"
        );
    }

    #[test]
    fn test_size_aware_template() {
        assert_eq!(
            computed_message(&inputs(600, 700.0)),
            "Import mode - typically takes 10 minutes (high confidence)"
        );
        assert_eq!(
            computed_message(&MessageInputs {
                is_large_dataset: true,
                ..inputs(600, 700.0)
            }),
            "Large dataset - typically takes 10 minutes (high confidence)"
        );
        assert_eq!(
            computed_message(&MessageInputs {
                storage_mode: StorageMode::Composite,
                ..inputs(600, 700.0)
            }),
            "Standard refresh - typically takes 10 minutes (high confidence)"
        );
    }

    #[test]
    fn test_extended_template() {
        assert_eq!(
            computed_message(&MessageInputs {
                confidence: Confidence::Low,
                ..inputs(3600, 4000.0)
            }),
            "Extended refresh - estimated takes 60 minutes (large Import dataset)"
        );
    }

    #[test]
    fn test_recent_failures_suffix() {
        let message = computed_message(&MessageInputs {
            recent_failures: true,
            ..inputs(41, 43.0)
        });
        assert!(message.ends_with("(high confidence) (recent failures detected)"));
        assert_eq!(
            fallback_message("Live connections refresh very quickly", true),
            "Live connections refresh very quickly (recent failures detected)"
        );
    }
}
