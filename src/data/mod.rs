//! Loading, cleaning, and export of trade data.

mod export;
mod loader;

pub use export::{build_report, write_csv, write_csv_file, ReportRow};
pub use loader::{summarize, DatasetSummary, TradeLoader};
