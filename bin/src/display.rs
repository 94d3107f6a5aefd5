//! Display utilities, input loading and logging setup for the refreshcast CLI.

use anyhow::{Context, Result};
use clap::ValueEnum;
use refreshcast_lib::prelude::*;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Encoding of the history input.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum InputFormat {
    Json,
    Ndjson,
    Csv,
}

impl From<InputFormat> for HistoryFormat {
    fn from(format: InputFormat) -> Self {
        match format {
            InputFormat::Json => Self::Json,
            InputFormat::Ndjson => Self::Ndjson,
            InputFormat::Csv => Self::Csv,
        }
    }
}

/// Rendering of command output.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum Output {
    Text,
    Json,
}

impl From<Output> for OutputFormat {
    fn from(output: Output) -> Self {
        match output {
            Output::Text => Self::Text,
            Output::Json => Self::Json,
        }
    }
}

/// Returns the log filter used when `RUST_LOG` is unset.
pub(crate) const fn default_log_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` takes precedence over `-v`, except that `--quiet` always limits
/// output to errors.
pub(crate) fn init_tracing(verbose: u8, quiet: bool) {
    let level = default_log_level(verbose, quiet);
    let filter = if quiet {
        EnvFilter::new(level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Reads refresh history from a file, or from stdin when the path is `-`.
pub(crate) fn load_history(
    path: &Path,
    format: Option<InputFormat>,
) -> Result<Vec<HistoryEntry>> {
    let format = format.map(HistoryFormat::from);
    if path == Path::new("-") {
        let format = format.unwrap_or_default();
        tracing::info!(%format, "reading refresh history from stdin");
        return read_history(io::stdin().lock(), format)
            .context("Failed to read refresh history from stdin");
    }

    tracing::info!(path = %path.display(), "reading refresh history");
    read_history_file(path, format)
        .with_context(|| format!("Failed to read refresh history from {}", path.display()))
}

/// Builds an estimator from an optional TOML configuration file.
pub(crate) fn load_estimator(config: Option<&Path>) -> Result<Estimator> {
    let config = match config {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading estimator configuration");
            EstimatorConfig::from_path(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => EstimatorConfig::default(),
    };
    Estimator::new(config).context("Invalid estimator configuration")
}

/// Writes to a buffered stdout, flushing before returning.
pub(crate) fn with_stdout<F>(write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<io::StdoutLock<'static>>) -> Result<()>,
{
    let mut stdout = BufWriter::new(io::stdout().lock());
    write(&mut stdout)?;
    stdout.flush()?;
    Ok(())
}

/// Print an estimate in the requested format.
pub(crate) fn print_estimate(estimate: &RefreshEstimate, output: Output) -> Result<()> {
    with_stdout(|out| {
        match OutputFormat::from(output) {
            OutputFormat::Text => TextFormatter::new().write_estimate(estimate, out)?,
            OutputFormat::Json => JsonFormatter::new()
                .with_pretty(true)
                .write_estimate(estimate, out)?,
        }
        Ok(())
    })
}

/// Print a diagnostic report in the requested format.
pub(crate) fn print_report(report: &EstimateReport, output: Output) -> Result<()> {
    with_stdout(|out| {
        match OutputFormat::from(output) {
            OutputFormat::Text => TextFormatter::new().write_report(report, out)?,
            OutputFormat::Json => JsonFormatter::new()
                .with_pretty(true)
                .write_report(report, out)?,
        }
        Ok(())
    })
}

/// Print the fallback baseline table in the requested format.
pub(crate) fn print_baselines(
    baselines: &BaselineTable,
    latency_compensation: f64,
    output: Output,
) -> Result<()> {
    with_stdout(|out| {
        match OutputFormat::from(output) {
            OutputFormat::Text => {
                TextFormatter::new().write_baselines(baselines, latency_compensation, out)?;
            }
            OutputFormat::Json => JsonFormatter::new()
                .with_pretty(true)
                .write_baselines(baselines, latency_compensation, out)?,
        }
        Ok(())
    })
}
