//! Account model: an identifier plus its chronological trade history.

use serde::{Deserialize, Serialize};

use super::Trade;

/// One trading account. The trade sequence is in chronological
/// (`closed_at`) order; drawdown and Sharpe depend on that order.
/// An account with zero trades is valid input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Account identifier (portfolio ID, wallet address, ...)
    pub id: String,

    /// Closed trades, oldest first
    pub trades: Vec<Trade>,
}

impl Account {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            trades: Vec::new(),
        }
    }

    pub fn with_trades(id: impl Into<String>, mut trades: Vec<Trade>) -> Self {
        trades.sort_by_key(|t| t.closed_at);
        Self {
            id: id.into(),
            trades,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }
}
