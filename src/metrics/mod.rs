//! Per-account metrics engine.

mod calculator;

pub use calculator::MetricsCalculator;

use rayon::prelude::*;
use rust_decimal::Decimal;

use crate::error::AnalysisError;
use crate::models::{Account, MetricsRecord};

/// Compute metrics for every account in parallel.
///
/// Each account's computation is independent, so accounts are fanned out
/// across the rayon thread pool. Output order follows input order.
pub fn compute_all(
    accounts: &[Account],
    initial_capital: Decimal,
) -> Result<Vec<MetricsRecord>, AnalysisError> {
    accounts
        .par_iter()
        .map(|account| MetricsCalculator::compute(account, initial_capital))
        .collect()
}
