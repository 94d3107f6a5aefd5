//! Explain command implementation.
//!
//! Prints every refresh that survived the history filter with its inferred
//! kind, age, weight and fate, followed by the outcome and the estimate.

use anyhow::Result;
use refreshcast_lib::prelude::*;

use super::Request;
use crate::HistoryArgs;
use crate::display::{Output, print_report};

/// Explain how the estimate for the next refresh was reached.
pub(crate) fn explain(args: &HistoryArgs, output: Output) -> Result<()> {
    let request = Request::from_args(args)?;
    let report = request.analyze();
    if let Outcome::Fallback { reason, .. } = &report.outcome {
        tracing::info!(%reason, "no usable history, fell back to baseline");
    }
    print_report(&report, output)
}
