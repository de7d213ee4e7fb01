//! Per-account performance metrics: ROI, Sharpe ratio, MDD, win rate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fixed-shape metrics for one account, produced by the metrics engine.
/// Built once per computation and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsRecord {
    /// Account identifier
    pub account_id: String,

    /// Return on investment: total_pnl / initial_capital. May be negative,
    /// not bounded above.
    pub roi: f64,

    /// Total realized P&L, signed
    pub total_pnl: Decimal,

    /// Per-trade Sharpe ratio. `None` when undefined (fewer than two
    /// trades, or zero variance in returns) — distinct from a real 0.
    pub sharpe_ratio: Option<f64>,

    /// Maximum drawdown as a fraction of peak equity (0.0 to 1.0)
    pub max_drawdown: f64,

    /// Fraction of trades with positive P&L (0.0 to 1.0)
    pub win_rate: f64,

    /// Number of closed positions
    pub total_positions: u32,

    /// Number of positions closed with a profit
    pub win_positions: u32,
}

impl MetricsRecord {
    /// Empty metrics for an account with no trade history.
    pub fn empty(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            roi: 0.0,
            total_pnl: Decimal::ZERO,
            sharpe_ratio: None,
            max_drawdown: 0.0,
            win_rate: 0.0,
            total_positions: 0,
            win_positions: 0,
        }
    }
}
