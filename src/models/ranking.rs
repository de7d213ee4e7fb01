//! Ranked account output: normalized sub-scores, composite score, rank.

use serde::{Deserialize, Serialize};

/// The five normalized sub-scores, each in [0,1]. Higher is better for
/// every field; `max_drawdown` is already inverted by the ranking engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub roi: f64,
    pub total_pnl: f64,
    pub sharpe_ratio: f64,
    pub win_rate: f64,
    pub max_drawdown: f64,
}

/// One account's position in the cross-account ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedAccount {
    /// Account identifier
    pub account_id: String,

    /// Normalized per-metric sub-scores
    pub scores: ScoreBreakdown,

    /// Weighted sum of the sub-scores, in [0,1]
    pub composite_score: f64,

    /// 1-based position in the ranking (distinct even on score ties)
    pub rank: u32,
}
