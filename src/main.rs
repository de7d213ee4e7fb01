//! Trade Account Performance Ranker
//!
//! Loads per-account historical trade records and ranks accounts by a
//! weighted composite of ROI, P&L, Sharpe ratio, win rate, and drawdown.

mod data;
mod error;
mod metrics;
mod models;
mod ranking;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::data::TradeLoader;
use crate::metrics::{compute_all, MetricsCalculator};
use crate::models::MetricsRecord;
use crate::ranking::{RankingEngine, WeightConfig};

/// Trade account ranking CLI.
#[derive(Parser)]
#[command(name = "traderank")]
#[command(about = "Rank trading accounts by historical performance", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show basic information about a trade history file
    Inspect {
        /// Trade history CSV file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Show detailed metrics for a single account
    Metrics {
        /// Trade history CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Account identifier
        account: String,

        /// Initial capital per account in quote currency
        #[arg(short, long, default_value = "10000")]
        capital: f64,
    },

    /// Rank all accounts by weighted composite score
    Rank {
        /// Trade history CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Initial capital per account in quote currency
        #[arg(short, long, default_value = "10000")]
        capital: f64,

        /// Number of accounts to display
        #[arg(short, long, default_value = "20")]
        top: usize,

        /// JSON file overriding the default metric weights
        #[arg(short, long)]
        weights: Option<PathBuf>,

        /// Export the full ranked report to a CSV file
        #[arg(short, long)]
        export: Option<PathBuf>,
    },

    /// Show the default metric weights
    Weights,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Inspect { input } => {
            let accounts = TradeLoader::from_path(&input)?;
            let summary = data::summarize(&accounts);

            println!("\n=== Dataset: {} ===", input.display());
            println!("Accounts:      {}", summary.total_accounts);
            println!("Trades:        {}", summary.total_trades);
            println!("Symbols:       {}", summary.total_symbols);
            match (summary.first_trade, summary.last_trade) {
                (Some(first), Some(last)) => {
                    println!("Date range:    {} to {}", first, last);
                }
                _ => println!("Date range:    (no trades)"),
            }
        }

        Commands::Metrics {
            input,
            account,
            capital,
        } => {
            let capital = Decimal::try_from(capital)?;
            let accounts = TradeLoader::from_path(&input)?;
            let target = accounts
                .iter()
                .find(|a| a.id == account)
                .ok_or_else(|| anyhow::anyhow!("Account not found: {}", account))?;

            let m = MetricsCalculator::compute(target, capital)?;
            print_metrics(&m);
        }

        Commands::Rank {
            input,
            capital,
            top,
            weights,
            export,
        } => {
            let capital = Decimal::try_from(capital)?;
            let weights = match weights {
                Some(path) => WeightConfig::from_path(path)?,
                None => WeightConfig::default(),
            };

            let accounts = TradeLoader::from_path(&input)?;
            info!(accounts = accounts.len(), "Computing metrics");

            let records = compute_all(&accounts, capital)?;
            let ranked = RankingEngine::rank(&records, &weights)?;

            println!(
                "\n{:<6} {:<20} {:>8} {:>9} {:>12} {:>8} {:>8} {:>7}",
                "RANK", "ACCOUNT", "SCORE", "ROI", "PNL", "SHARPE", "MDD", "WIN%"
            );
            println!("{}", "-".repeat(84));

            let by_id: std::collections::HashMap<&str, &MetricsRecord> = records
                .iter()
                .map(|r| (r.account_id.as_str(), r))
                .collect();

            for acct in ranked.iter().take(top) {
                let m = by_id[acct.account_id.as_str()];
                println!(
                    "{:<6} {:<20} {:>8.3} {:>8.1}% {:>12.2} {:>8} {:>7.1}% {:>6.1}%",
                    acct.rank,
                    truncate(&acct.account_id, 20),
                    acct.composite_score,
                    m.roi * 100.0,
                    m.total_pnl,
                    m.sharpe_ratio
                        .map(|s| format!("{:.2}", s))
                        .unwrap_or_else(|| "n/a".to_string()),
                    m.max_drawdown * 100.0,
                    m.win_rate * 100.0,
                );
            }

            if ranked.len() > top {
                println!("... {} more accounts", ranked.len() - top);
            }

            if let Some(path) = export {
                let rows = data::build_report(&ranked, &records);
                data::write_csv_file(&rows, &path)?;
                info!(path = %path.display(), rows = rows.len(), "Report exported");
                println!("\nFull report written to {}", path.display());
            }
        }

        Commands::Weights => {
            let weights = WeightConfig::default();
            println!("\n=== Default Metric Weights ===");
            println!("ROI:           {:.2}", weights.roi);
            println!("Total PnL:     {:.2}", weights.total_pnl);
            println!("Sharpe Ratio:  {:.2}", weights.sharpe_ratio);
            println!("Win Rate:      {:.2}", weights.win_rate);
            println!("Max Drawdown:  {:.2}", weights.max_drawdown);
            println!("\nOverride with a JSON file via 'traderank rank --weights <file>'.");
        }
    }

    Ok(())
}

fn print_metrics(m: &MetricsRecord) {
    println!("\n=== Account: {} ===", m.account_id);

    println!("\n--- Performance ---");
    println!("Total Positions: {}", m.total_positions);
    println!("Total P&L:       {:.2}", m.total_pnl);
    println!("ROI:             {:.2}%", m.roi * 100.0);

    println!("\n--- Win/Loss ---");
    println!("Win Rate:        {:.1}%", m.win_rate * 100.0);
    println!("Winning Trades:  {}", m.win_positions);
    println!(
        "Losing Trades:   {}",
        m.total_positions - m.win_positions
    );

    println!("\n--- Risk ---");
    println!("Max Drawdown:    {:.1}%", m.max_drawdown * 100.0);
    match m.sharpe_ratio {
        Some(sharpe) => println!("Sharpe Ratio:    {:.2}", sharpe),
        None => println!("Sharpe Ratio:    n/a (needs >=2 trades with varying returns)"),
    }
}

/// Truncate a string with ellipsis if too long.
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len - 3])
    }
}
