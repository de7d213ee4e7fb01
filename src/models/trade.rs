//! Trade model representing one closed position in an account's history.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Long,
    Short,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Long => "LONG",
            TradeSide::Short => "SHORT",
        }
    }
}

/// One closed position, as handed over by the loader. Read-only after
/// construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    /// Instrument symbol (e.g. "BTCUSDT")
    pub symbol: String,

    /// Position direction
    pub side: TradeSide,

    /// Entry price per unit
    pub entry_price: Decimal,

    /// Exit price per unit
    pub exit_price: Decimal,

    /// Position size in units
    pub quantity: Decimal,

    /// Realized profit or loss, signed
    pub realized_pnl: Decimal,

    /// When the position was opened
    pub opened_at: DateTime<Utc>,

    /// When the position was closed (>= opened_at)
    pub closed_at: DateTime<Utc>,
}

impl Trade {
    /// Capital committed to this trade at entry.
    pub fn committed_capital(&self) -> Decimal {
        self.entry_price * self.quantity
    }

    /// Return on committed capital for this trade.
    ///
    /// A trade with non-positive committed capital has no defined return;
    /// it contributes 0 instead of poisoning the whole account.
    pub fn trade_return(&self) -> f64 {
        use rust_decimal::prelude::ToPrimitive;

        let committed = self.committed_capital();
        if committed <= Decimal::ZERO {
            return 0.0;
        }
        (self.realized_pnl / committed).to_f64().unwrap_or(0.0)
    }

    /// Whether this trade closed with a profit.
    pub fn is_win(&self) -> bool {
        self.realized_pnl > Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn trade(entry: Decimal, qty: Decimal, pnl: Decimal) -> Trade {
        Trade {
            symbol: "BTCUSDT".to_string(),
            side: TradeSide::Long,
            entry_price: entry,
            exit_price: entry,
            quantity: qty,
            realized_pnl: pnl,
            opened_at: Utc::now(),
            closed_at: Utc::now(),
        }
    }

    #[test]
    fn test_trade_return() {
        let t = trade(dec!(10), dec!(100), dec!(100));
        assert!((t.trade_return() - 0.1).abs() < 1e-12);
        assert!(t.is_win());
    }

    #[test]
    fn test_trade_return_zero_committed_capital() {
        // entry_price * quantity == 0: return is defined as 0, not a fault
        let t = trade(dec!(0), dec!(100), dec!(50));
        assert_eq!(t.trade_return(), 0.0);
    }

    #[test]
    fn test_losing_trade() {
        let t = trade(dec!(10), dec!(100), dec!(-40));
        assert!((t.trade_return() + 0.04).abs() < 1e-12);
        assert!(!t.is_win());
    }
}
