//! Baselines command implementation.

use anyhow::Result;
use std::path::Path;

use crate::display::{Output, load_estimator, print_baselines};

/// List the fallback baseline and range for each storage mode.
pub(crate) fn list_baselines(config: Option<&Path>, output: Output) -> Result<()> {
    let estimator = load_estimator(config)?;
    print_baselines(
        estimator.baselines(),
        estimator.config().latency_compensation,
        output,
    )
}
