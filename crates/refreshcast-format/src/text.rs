//! Human-readable text output.

use chrono::SecondsFormat;
use refreshcast_estimate::{BaselineTable, EstimateReport, Outcome};
use refreshcast_types::RefreshEstimate;
use std::io::Write;

use crate::{FormatError, Formatter};

/// Plain text formatter.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormatter;

impl TextFormatter {
    /// Creates a new text formatter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Renders seconds as `41s`, `2m 05s` or `1h 02m`.
#[must_use]
pub fn format_seconds(seconds: u64) -> String {
    match seconds {
        0..=59 => format!("{seconds}s"),
        60..=3599 => format!("{}m {:02}s", seconds / 60, seconds % 60),
        _ => format!("{}h {:02}m", seconds / 3600, (seconds % 3600) / 60),
    }
}

const fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

impl Formatter for TextFormatter {
    fn write_estimate<W: Write>(
        &self,
        estimate: &RefreshEstimate,
        mut writer: W,
    ) -> Result<(), FormatError> {
        let range = estimate.range_seconds;
        let factors = &estimate.contextual_factors;

        writeln!(writer, "{}", estimate.message)?;
        writeln!(writer)?;
        writeln!(
            writer,
            "  Range:          {} - {} (median {})",
            format_seconds(range.min),
            format_seconds(range.max),
            format_seconds(range.median)
        )?;
        writeln!(writer, "  Confidence:     {}", estimate.confidence)?;
        writeln!(
            writer,
            "  Data points:    {}",
            estimate.historical_data_points
        )?;
        writeln!(writer, "  Storage mode:   {}", factors.storage_mode)?;
        writeln!(writer, "  Large dataset:  {}", yes_no(factors.is_large_dataset))?;
        writeln!(writer, "  Peak hour:      {}", yes_no(factors.is_peak_hour))?;
        writeln!(writer, "  Recent failures: {}", yes_no(factors.recent_failures))?;
        Ok(())
    }

    fn write_report<W: Write>(
        &self,
        report: &EstimateReport,
        mut writer: W,
    ) -> Result<(), FormatError> {
        writeln!(
            writer,
            "{:<20} {:>9} {:<9} {:>7} {:>8}  STATUS",
            "START", "DURATION", "KIND", "AGE", "WEIGHT"
        )?;
        for analyzed in &report.entries {
            let entry = &analyzed.entry;
            writeln!(
                writer,
                "{:<20} {:>9} {:<9} {:>6.1}d {:>8.4}  {}",
                entry.start_time.to_rfc3339_opts(SecondsFormat::Secs, true),
                format_seconds(entry.duration_seconds),
                entry.classified_kind.as_str(),
                entry.age_days,
                entry.weight,
                analyzed.disposition
            )?;
        }
        if report.entries.is_empty() {
            writeln!(writer, "(no usable refreshes)")?;
        }
        writeln!(writer)?;

        match &report.outcome {
            Outcome::Computed { stats, mixed_kinds } => {
                writeln!(
                    writer,
                    "Computed from {} refreshes{}",
                    stats.count,
                    if *mixed_kinds { " (mixed kinds)" } else { "" }
                )?;
                writeln!(
                    writer,
                    "  p50 {:.1}s  p80 {:.1}s  mean {:.1}s  std dev {:.1}s  effective n {:.2}",
                    stats.p50,
                    stats.p80,
                    stats.weighted_mean,
                    stats.standard_deviation,
                    stats.effective_sample_size
                )?;
            }
            Outcome::Fallback { reason, baseline } => {
                writeln!(
                    writer,
                    "Fallback ({reason}): {} baseline of {}",
                    baseline.storage_mode,
                    format_seconds(baseline.seconds)
                )?;
            }
        }
        writeln!(writer)?;

        self.write_estimate(&report.estimate, writer)
    }

    fn write_baselines<W: Write>(
        &self,
        baselines: &BaselineTable,
        latency_compensation: f64,
        mut writer: W,
    ) -> Result<(), FormatError> {
        writeln!(
            writer,
            "{:<16} {:>8} {:>8} {:>8}  MESSAGE",
            "STORAGE MODE", "TYPICAL", "MIN", "MAX"
        )?;
        for baseline in baselines.iter() {
            let range = baseline.range(latency_compensation);
            writeln!(
                writer,
                "{:<16} {:>8} {:>8} {:>8}  {}",
                baseline.storage_mode.as_str(),
                format_seconds(range.median),
                format_seconds(range.min),
                format_seconds(range.max),
                baseline.message
            )?;
        }
        Ok(())
    }
}
