//! Cross-account ranking: min-max normalization and weighted scoring.

use rust_decimal::prelude::ToPrimitive;

use crate::error::AnalysisError;
use crate::models::{MetricsRecord, RankedAccount, ScoreBreakdown};

use super::WeightConfig;

/// Ranking engine: a pure function over the full metrics population.
///
/// Normalization needs every account's value for each metric, so there is
/// no streaming or incremental variant; re-ranking recomputes everything.
pub struct RankingEngine;

impl RankingEngine {
    /// Rank the whole population by weighted composite score.
    ///
    /// Returns the full ranked list, best first, with distinct 1-based
    /// ranks. Top-N truncation is the caller's concern.
    pub fn rank(
        records: &[MetricsRecord],
        weights: &WeightConfig,
    ) -> Result<Vec<RankedAccount>, AnalysisError> {
        if records.is_empty() {
            return Err(AnalysisError::InsufficientData(
                "no accounts to rank".to_string(),
            ));
        }
        weights.validate()?;

        let roi_bounds = bounds(records.iter().map(|r| r.roi));
        let pnl_bounds = bounds(records.iter().map(|r| pnl_f64(r)));
        let win_bounds = bounds(records.iter().map(|r| r.win_rate));
        let mdd_bounds = bounds(records.iter().map(|r| r.max_drawdown));
        // Undefined Sharpe ratios stay out of the min/max computation
        let sharpe_bounds = bounds(records.iter().filter_map(|r| r.sharpe_ratio));

        let mut scored: Vec<(RankedAccount, &MetricsRecord)> = records
            .iter()
            .map(|record| {
                let scores = ScoreBreakdown {
                    roi: normalize(record.roi, roi_bounds),
                    total_pnl: normalize(pnl_f64(record), pnl_bounds),
                    // No measurable risk-adjusted return scores worst-case 0
                    sharpe_ratio: match record.sharpe_ratio {
                        Some(sharpe) => normalize(sharpe, sharpe_bounds),
                        None => 0.0,
                    },
                    win_rate: normalize(record.win_rate, win_bounds),
                    // Lower drawdown is better: invert after normalizing
                    max_drawdown: 1.0 - normalize(record.max_drawdown, mdd_bounds),
                };

                let composite_score = weights.roi * scores.roi
                    + weights.total_pnl * scores.total_pnl
                    + weights.sharpe_ratio * scores.sharpe_ratio
                    + weights.win_rate * scores.win_rate
                    + weights.max_drawdown * scores.max_drawdown;

                let ranked = RankedAccount {
                    account_id: record.account_id.clone(),
                    scores,
                    composite_score,
                    rank: 0,
                };
                (ranked, record)
            })
            .collect();

        // Strict total order: score desc, then total PnL desc, then id asc.
        // Composite scores are floats, so ties are expected.
        scored.sort_by(|(a, ra), (b, rb)| {
            b.composite_score
                .total_cmp(&a.composite_score)
                .then_with(|| rb.total_pnl.cmp(&ra.total_pnl))
                .then_with(|| a.account_id.cmp(&b.account_id))
        });

        Ok(scored
            .into_iter()
            .enumerate()
            .map(|(i, (mut ranked, _))| {
                ranked.rank = i as u32 + 1;
                ranked
            })
            .collect())
    }
}

fn pnl_f64(record: &MetricsRecord) -> f64 {
    record.total_pnl.to_f64().unwrap_or(0.0)
}

/// Min and max of a value series; `None` for an empty series.
fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((min, max)) => Some((min.min(v), max.max(v))),
    })
}

/// Min-max normalization to [0,1]. A population with no spread gets the
/// neutral 0.5 rather than an undefined 0/0.
fn normalize(value: f64, bounds: Option<(f64, f64)>) -> f64 {
    match bounds {
        Some((min, max)) if max > min => (value - min) / (max - min),
        Some(_) => 0.5,
        None => 0.0,
    }
}
