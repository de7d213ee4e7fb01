//! Data models for trades, accounts, metrics, and rankings.

mod account;
mod metrics;
mod ranking;
mod trade;

pub use account::Account;
pub use metrics::MetricsRecord;
pub use ranking::{RankedAccount, ScoreBreakdown};
pub use trade::{Trade, TradeSide};
