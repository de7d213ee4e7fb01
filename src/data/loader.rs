//! Loading and cleaning of historical trade files.
//!
//! Two CSV layouts are accepted: one row per closed trade ("direct"), or
//! one row per account with a JSON array of trades in a `trade_history`
//! column (the export format of some exchange dashboards). Malformed rows
//! are skipped with a warning; a bad row never aborts the load.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};

use crate::models::{Account, Trade, TradeSide};

/// One trade in the direct CSV layout. Aliases cover the column spellings
/// seen in the wild (Binance portfolio exports, snake/camel case).
#[derive(Debug, Deserialize)]
struct TradeRow {
    #[serde(alias = "Port_IDs", alias = "port_id", alias = "account")]
    account_id: String,

    #[serde(alias = "asset", alias = "pair")]
    symbol: String,

    #[serde(alias = "positionSide", alias = "position_side")]
    side: TradeSide,

    #[serde(alias = "entryPrice", alias = "open_price")]
    entry_price: Decimal,

    #[serde(alias = "exitPrice", alias = "close_price")]
    exit_price: Decimal,

    #[serde(alias = "qty", alias = "size", alias = "amount")]
    quantity: Decimal,

    #[serde(alias = "realizedProfit", alias = "pnl", alias = "profit")]
    realized_pnl: Decimal,

    #[serde(
        alias = "open_time",
        alias = "openedAt",
        deserialize_with = "de_timestamp"
    )]
    opened_at: DateTime<Utc>,

    #[serde(
        alias = "close_time",
        alias = "closedAt",
        alias = "timestamp",
        deserialize_with = "de_timestamp"
    )]
    closed_at: DateTime<Utc>,
}

impl TradeRow {
    fn into_fields(self) -> (String, TradeFields) {
        (
            self.account_id,
            TradeFields {
                symbol: self.symbol,
                side: self.side,
                entry_price: self.entry_price,
                exit_price: self.exit_price,
                quantity: self.quantity,
                realized_pnl: self.realized_pnl,
                opened_at: self.opened_at,
                closed_at: self.closed_at,
            },
        )
    }
}

/// Trade fields as they appear inside a nested JSON history.
#[derive(Debug, Deserialize)]
struct TradeFields {
    #[serde(alias = "asset", alias = "pair")]
    symbol: String,

    #[serde(alias = "positionSide", alias = "position_side")]
    side: TradeSide,

    #[serde(alias = "entryPrice", alias = "open_price")]
    entry_price: Decimal,

    #[serde(alias = "exitPrice", alias = "close_price")]
    exit_price: Decimal,

    #[serde(alias = "qty", alias = "size", alias = "amount")]
    quantity: Decimal,

    #[serde(alias = "realizedProfit", alias = "pnl", alias = "profit")]
    realized_pnl: Decimal,

    #[serde(
        alias = "open_time",
        alias = "openedAt",
        deserialize_with = "de_timestamp"
    )]
    opened_at: DateTime<Utc>,

    #[serde(
        alias = "close_time",
        alias = "closedAt",
        alias = "timestamp",
        deserialize_with = "de_timestamp"
    )]
    closed_at: DateTime<Utc>,
}

/// One row in the nested layout: an account id plus its serialized history.
#[derive(Debug, Deserialize)]
struct HistoryRow {
    #[serde(alias = "Port_IDs", alias = "port_id", alias = "account")]
    account_id: String,

    #[serde(alias = "Trade_History")]
    trade_history: String,
}

impl TradeFields {
    /// Validate economics and chronology, then build the immutable Trade.
    fn into_trade(self) -> Result<Trade> {
        if self.entry_price <= Decimal::ZERO {
            bail!("non-positive entry price {}", self.entry_price);
        }
        if self.quantity <= Decimal::ZERO {
            bail!("non-positive quantity {}", self.quantity);
        }
        if self.closed_at < self.opened_at {
            bail!("closed_at precedes opened_at");
        }

        Ok(Trade {
            symbol: self.symbol,
            side: self.side,
            entry_price: self.entry_price,
            exit_price: self.exit_price,
            quantity: self.quantity,
            realized_pnl: self.realized_pnl,
            opened_at: self.opened_at,
            closed_at: self.closed_at,
        })
    }
}

/// Accepts RFC 3339 strings or epoch milliseconds.
fn de_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    struct TimestampVisitor;

    impl serde::de::Visitor<'_> for TimestampVisitor {
        type Value = DateTime<Utc>;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            f.write_str("an RFC 3339 timestamp or epoch milliseconds")
        }

        fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
            if let Ok(dt) = DateTime::parse_from_rfc3339(v) {
                return Ok(dt.with_timezone(&Utc));
            }
            let millis: i64 = v.parse().map_err(E::custom)?;
            self.visit_i64(millis)
        }

        fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Utc.timestamp_millis_opt(v)
                .single()
                .ok_or_else(|| E::custom(format!("out-of-range timestamp {}", v)))
        }

        fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
            self.visit_i64(v as i64)
        }

        fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Self::Value, E> {
            self.visit_i64(v as i64)
        }
    }

    deserializer.deserialize_any(TimestampVisitor)
}

/// Loader for historical trade files.
pub struct TradeLoader;

impl TradeLoader {
    /// Load accounts from a CSV file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Account>> {
        let file = File::open(&path)
            .with_context(|| format!("Failed to open file: {:?}", path.as_ref()))?;
        Self::from_reader(file)
    }

    /// Load accounts from any CSV source. The layout is detected from the
    /// header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Account>> {
        let mut csv_reader = csv::Reader::from_reader(reader);

        let headers = csv_reader.headers().context("Failed to read CSV header")?;
        let nested = headers
            .iter()
            .any(|h| h.eq_ignore_ascii_case("trade_history"));

        let grouped = if nested {
            Self::read_nested(&mut csv_reader)?
        } else {
            Self::read_direct(&mut csv_reader)?
        };

        // BTreeMap keeps the account list ordered by id for determinism
        Ok(grouped
            .into_iter()
            .map(|(id, trades)| Account::with_trades(id, trades))
            .collect())
    }

    fn read_direct<R: Read>(
        reader: &mut csv::Reader<R>,
    ) -> Result<BTreeMap<String, Vec<Trade>>> {
        let mut grouped: BTreeMap<String, Vec<Trade>> = BTreeMap::new();
        let mut skipped = 0usize;

        for (line, result) in reader.deserialize::<TradeRow>().enumerate() {
            let row = match result {
                Ok(row) => row,
                Err(e) => {
                    warn!(line = line + 2, error = %e, "Skipping unparseable row");
                    skipped += 1;
                    continue;
                }
            };

            let (account_id, fields) = row.into_fields();
            match fields.into_trade() {
                Ok(trade) => grouped.entry(account_id).or_default().push(trade),
                Err(e) => {
                    warn!(line = line + 2, error = %e, "Skipping invalid trade");
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            warn!(skipped, "Some rows were dropped during loading");
        }
        Ok(grouped)
    }

    fn read_nested<R: Read>(
        reader: &mut csv::Reader<R>,
    ) -> Result<BTreeMap<String, Vec<Trade>>> {
        let mut grouped: BTreeMap<String, Vec<Trade>> = BTreeMap::new();

        for (line, result) in reader.deserialize::<HistoryRow>().enumerate() {
            let row = match result {
                Ok(row) => row,
                Err(e) => {
                    warn!(line = line + 2, error = %e, "Skipping unparseable row");
                    continue;
                }
            };

            // An account with an unreadable history still exists; it just
            // has zero usable trades
            let fields: Vec<TradeFields> =
                match serde_json::from_str(&row.trade_history) {
                    Ok(fields) => fields,
                    Err(e) => {
                        warn!(
                            account = %row.account_id,
                            error = %e,
                            "Dropping malformed trade history"
                        );
                        Vec::new()
                    }
                };

            let trades = grouped.entry(row.account_id.clone()).or_default();
            for field in fields {
                match field.into_trade() {
                    Ok(trade) => trades.push(trade),
                    Err(e) => {
                        warn!(account = %row.account_id, error = %e, "Skipping invalid trade");
                    }
                }
            }
        }

        Ok(grouped)
    }
}

/// Basic shape of a loaded dataset, for the `inspect` command.
#[derive(Debug)]
pub struct DatasetSummary {
    pub total_trades: usize,
    pub total_accounts: usize,
    pub total_symbols: usize,
    pub first_trade: Option<DateTime<Utc>>,
    pub last_trade: Option<DateTime<Utc>>,
}

/// Summarize a loaded dataset.
pub fn summarize(accounts: &[Account]) -> DatasetSummary {
    let mut symbols = std::collections::BTreeSet::new();
    let mut first = None;
    let mut last = None;
    let mut total = 0usize;

    for account in accounts {
        total += account.trades.len();
        for trade in &account.trades {
            symbols.insert(trade.symbol.as_str());
            if first.map_or(true, |f| trade.closed_at < f) {
                first = Some(trade.closed_at);
            }
            if last.map_or(true, |l| trade.closed_at > l) {
                last = Some(trade.closed_at);
            }
        }
    }

    debug!(accounts = accounts.len(), trades = total, "Dataset summarized");

    DatasetSummary {
        total_trades: total,
        total_accounts: accounts.len(),
        total_symbols: symbols.len(),
        first_trade: first,
        last_trade: last,
    }
}
