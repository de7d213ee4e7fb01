//! Calculator for per-account performance metrics: ROI, Sharpe ratio,
//! maximum drawdown, win rate.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use statrs::statistics::Statistics;

use crate::error::AnalysisError;
use crate::models::{Account, MetricsRecord};

/// Calculator for computing account performance metrics.
///
/// Pure: reads one account, produces one record, touches nothing else.
pub struct MetricsCalculator;

impl MetricsCalculator {
    /// Compute the full metrics record for one account.
    ///
    /// `initial_capital` must be positive; it anchors ROI and the equity
    /// curve used for drawdown. The account itself is never mutated.
    pub fn compute(
        account: &Account,
        initial_capital: Decimal,
    ) -> Result<MetricsRecord, AnalysisError> {
        if initial_capital <= Decimal::ZERO {
            return Err(AnalysisError::InvalidInput(format!(
                "initial capital must be positive, got {}",
                initial_capital
            )));
        }

        let mut metrics = MetricsRecord::empty(account.id.clone());
        if account.trades.is_empty() {
            return Ok(metrics);
        }

        metrics.total_positions = account.trades.len() as u32;
        metrics.win_positions =
            account.trades.iter().filter(|t| t.is_win()).count() as u32;
        metrics.win_rate =
            metrics.win_positions as f64 / metrics.total_positions as f64;

        metrics.total_pnl = account.trades.iter().map(|t| t.realized_pnl).sum();
        metrics.roi = (metrics.total_pnl / initial_capital)
            .to_f64()
            .unwrap_or(0.0);

        // Return series in closed_at order; Sharpe and drawdown are
        // order-sensitive.
        let returns: Vec<f64> =
            account.trades.iter().map(|t| t.trade_return()).collect();

        metrics.sharpe_ratio = Self::sharpe_ratio(&returns);
        metrics.max_drawdown = Self::max_drawdown(account, initial_capital);

        Ok(metrics)
    }

    /// Per-trade Sharpe ratio: mean return over sample standard deviation.
    ///
    /// Undefined (`None`) with fewer than two trades or zero variance —
    /// a constant-return account has no measurable risk-adjusted return.
    /// No annualization: trades carry no fixed calendar cadence.
    fn sharpe_ratio(returns: &[f64]) -> Option<f64> {
        if returns.len() < 2 {
            return None;
        }

        let mean = returns.mean();
        let std_dev = returns.std_dev();

        if std_dev > 0.0 {
            Some(mean / std_dev)
        } else {
            None
        }
    }

    /// Maximum drawdown on the cumulative equity curve, as a fraction of
    /// the running peak, clamped to [0,1].
    fn max_drawdown(account: &Account, initial_capital: Decimal) -> f64 {
        let mut equity = initial_capital;
        let mut peak = initial_capital;
        let mut max_dd = 0.0f64;

        for trade in &account.trades {
            equity += trade.realized_pnl;

            if equity > peak {
                peak = equity;
            }

            // Non-positive peak: capital wiped out, skip the division
            if peak > Decimal::ZERO {
                let dd = ((peak - equity) / peak).to_f64().unwrap_or(0.0);
                if dd > max_dd {
                    max_dd = dd;
                }
            }
        }

        max_dd.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Trade, TradeSide};
    use chrono::{Duration, Utc};
    use rust_decimal_macros::dec;

    fn trade_at(i: i64, entry: Decimal, qty: Decimal, pnl: Decimal) -> Trade {
        let opened = Utc::now() + Duration::minutes(i * 10);
        Trade {
            symbol: "BTCUSDT".to_string(),
            side: TradeSide::Long,
            entry_price: entry,
            exit_price: entry,
            quantity: qty,
            realized_pnl: pnl,
            opened_at: opened,
            closed_at: opened + Duration::minutes(5),
        }
    }

    /// Three trades, each on $1000 committed, from $1000 starting capital.
    fn sample_account() -> Account {
        Account::with_trades(
            "acct-a",
            vec![
                trade_at(0, dec!(10), dec!(100), dec!(100)),
                trade_at(1, dec!(10), dec!(100), dec!(-40)),
                trade_at(2, dec!(10), dec!(100), dec!(60)),
            ],
        )
    }

    #[test]
    fn test_basic_metrics() {
        let metrics =
            MetricsCalculator::compute(&sample_account(), dec!(1000)).unwrap();

        assert_eq!(metrics.total_pnl, dec!(120));
        assert!((metrics.roi - 0.12).abs() < 1e-12);
        assert_eq!(metrics.total_positions, 3);
        assert_eq!(metrics.win_positions, 2);
        assert!((metrics.win_rate - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_sharpe_ratio() {
        let metrics =
            MetricsCalculator::compute(&sample_account(), dec!(1000)).unwrap();

        // returns [0.10, -0.04, 0.06], mean 0.04, sample stdev ~0.0721
        let sharpe = metrics.sharpe_ratio.unwrap();
        assert!((sharpe - 0.5547).abs() < 0.001);
    }

    #[test]
    fn test_max_drawdown() {
        let metrics =
            MetricsCalculator::compute(&sample_account(), dec!(1000)).unwrap();

        // equity 1100 -> 1060 -> 1120, peak 1100 at the dip
        assert!((metrics.max_drawdown - 40.0 / 1100.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_account() {
        let metrics =
            MetricsCalculator::compute(&Account::new("empty"), dec!(1000))
                .unwrap();

        assert_eq!(metrics.total_pnl, Decimal::ZERO);
        assert_eq!(metrics.roi, 0.0);
        assert_eq!(metrics.win_rate, 0.0);
        assert_eq!(metrics.max_drawdown, 0.0);
        assert_eq!(metrics.total_positions, 0);
        assert!(metrics.sharpe_ratio.is_none());
    }

    #[test]
    fn test_single_trade_has_no_sharpe() {
        let account = Account::with_trades(
            "one",
            vec![trade_at(0, dec!(10), dec!(100), dec!(50))],
        );
        let metrics = MetricsCalculator::compute(&account, dec!(1000)).unwrap();

        assert!(metrics.sharpe_ratio.is_none());
        assert_eq!(metrics.total_positions, 1);
    }

    #[test]
    fn test_constant_returns_have_no_sharpe() {
        let account = Account::with_trades(
            "flat",
            vec![
                trade_at(0, dec!(10), dec!(100), dec!(50)),
                trade_at(1, dec!(10), dec!(100), dec!(50)),
                trade_at(2, dec!(10), dec!(100), dec!(50)),
            ],
        );
        let metrics = MetricsCalculator::compute(&account, dec!(1000)).unwrap();

        // zero variance: undefined, not zero
        assert!(metrics.sharpe_ratio.is_none());
    }

    #[test]
    fn test_non_positive_capital_rejected() {
        let err =
            MetricsCalculator::compute(&sample_account(), dec!(0)).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));

        let err = MetricsCalculator::compute(&sample_account(), dec!(-100))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }

    #[test]
    fn test_drawdown_bounded_even_when_capital_wiped_out() {
        let account = Account::with_trades(
            "wipeout",
            vec![
                trade_at(0, dec!(10), dec!(100), dec!(-900)),
                trade_at(1, dec!(10), dec!(100), dec!(-500)),
                trade_at(2, dec!(10), dec!(100), dec!(200)),
            ],
        );
        let metrics = MetricsCalculator::compute(&account, dec!(1000)).unwrap();

        assert!(metrics.max_drawdown >= 0.0);
        assert!(metrics.max_drawdown <= 1.0);
    }

    #[test]
    fn test_bad_trade_economics_contribute_zero_return() {
        // One trade with zero committed capital among normal ones: its
        // return is 0, the account still gets metrics
        let account = Account::with_trades(
            "mixed",
            vec![
                trade_at(0, dec!(10), dec!(100), dec!(100)),
                trade_at(1, dec!(0), dec!(100), dec!(30)),
                trade_at(2, dec!(10), dec!(100), dec!(-50)),
            ],
        );
        let metrics = MetricsCalculator::compute(&account, dec!(1000)).unwrap();

        assert_eq!(metrics.total_pnl, dec!(80));
        assert_eq!(metrics.total_positions, 3);
        assert!(metrics.sharpe_ratio.is_some());
    }

    #[test]
    fn test_win_positions_never_exceed_total() {
        let metrics =
            MetricsCalculator::compute(&sample_account(), dec!(1000)).unwrap();
        assert!(metrics.win_positions <= metrics.total_positions);
        assert!(metrics.win_rate >= 0.0 && metrics.win_rate <= 1.0);
    }
}
