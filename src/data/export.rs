//! Tabular export of the ranked report: one row per account with raw
//! metrics, normalized sub-scores, composite score, and rank.

use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{MetricsRecord, RankedAccount};

/// One export row. Undefined Sharpe serializes as an empty field.
#[derive(Debug, Serialize)]
pub struct ReportRow {
    pub rank: u32,
    pub account_id: String,
    pub composite_score: f64,
    pub roi: f64,
    pub total_pnl: Decimal,
    pub sharpe_ratio: Option<f64>,
    pub max_drawdown: f64,
    pub win_rate: f64,
    pub roi_score: f64,
    pub pnl_score: f64,
    pub sharpe_score: f64,
    pub win_rate_score: f64,
    pub drawdown_score: f64,
}

/// Join the ranked list with its underlying metrics, in rank order.
pub fn build_report(
    ranked: &[RankedAccount],
    records: &[MetricsRecord],
) -> Vec<ReportRow> {
    let by_id: HashMap<&str, &MetricsRecord> = records
        .iter()
        .map(|r| (r.account_id.as_str(), r))
        .collect();

    ranked
        .iter()
        .filter_map(|acct| {
            let record = by_id.get(acct.account_id.as_str())?;
            Some(ReportRow {
                rank: acct.rank,
                account_id: acct.account_id.clone(),
                composite_score: acct.composite_score,
                roi: record.roi,
                total_pnl: record.total_pnl,
                sharpe_ratio: record.sharpe_ratio,
                max_drawdown: record.max_drawdown,
                win_rate: record.win_rate,
                roi_score: acct.scores.roi,
                pnl_score: acct.scores.total_pnl,
                sharpe_score: acct.scores.sharpe_ratio,
                win_rate_score: acct.scores.win_rate,
                drawdown_score: acct.scores.max_drawdown,
            })
        })
        .collect()
}

/// Write the report as CSV to any writer.
pub fn write_csv<W: Write>(rows: &[ReportRow], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the report as CSV to a file.
pub fn write_csv_file<P: AsRef<Path>>(rows: &[ReportRow], path: P) -> Result<()> {
    let file = File::create(&path)
        .with_context(|| format!("Failed to create file: {:?}", path.as_ref()))?;
    write_csv(rows, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScoreBreakdown;
    use rust_decimal_macros::dec;

    fn fixtures() -> (Vec<RankedAccount>, Vec<MetricsRecord>) {
        let record = MetricsRecord {
            account_id: "acct-a".to_string(),
            roi: 0.12,
            total_pnl: dec!(120),
            sharpe_ratio: None,
            max_drawdown: 0.04,
            win_rate: 0.66,
            total_positions: 3,
            win_positions: 2,
        };
        let ranked = RankedAccount {
            account_id: "acct-a".to_string(),
            scores: ScoreBreakdown {
                roi: 0.5,
                total_pnl: 0.5,
                sharpe_ratio: 0.0,
                win_rate: 0.5,
                max_drawdown: 0.5,
            },
            composite_score: 0.4,
            rank: 1,
        };
        (vec![ranked], vec![record])
    }

    #[test]
    fn test_report_joins_metrics_with_scores() {
        let (ranked, records) = fixtures();
        let rows = build_report(&ranked, &records);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].total_pnl, dec!(120));
        assert!(rows[0].sharpe_ratio.is_none());
        assert_eq!(rows[0].sharpe_score, 0.0);
    }

    #[test]
    fn test_csv_export_shape() {
        let (ranked, records) = fixtures();
        let rows = build_report(&ranked, &records);

        let mut buf = Vec::new();
        write_csv(&rows, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();

        let mut lines = out.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("rank,account_id,composite_score,roi"));
        // undefined Sharpe is an empty field, not a zero
        let data = lines.next().unwrap();
        assert!(data.contains(",,"));
        assert!(data.starts_with("1,acct-a,"));
    }
}
