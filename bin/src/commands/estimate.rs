//! Estimate command implementation.

use anyhow::Result;

use super::Request;
use crate::HistoryArgs;
use crate::display::{Output, print_estimate};

/// Estimate the next refresh and print the result.
pub(crate) fn estimate(args: &HistoryArgs, output: Output) -> Result<()> {
    let request = Request::from_args(args)?;
    let estimate = request.estimator.estimate(
        &request.history,
        request.now,
        &request.metadata,
        request.kind,
    );
    if !estimate.has_history() {
        tracing::info!(
            storage_mode = %estimate.contextual_factors.storage_mode,
            "no usable history, estimate uses the storage-mode baseline"
        );
    }
    tracing::info!(
        median = estimate.range_seconds.median,
        confidence = %estimate.confidence,
        data_points = estimate.historical_data_points,
        "estimated refresh duration"
    );
    print_estimate(&estimate, output)
}
