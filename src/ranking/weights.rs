//! Weight configuration for the composite score.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Tolerance on the weight sum; composite scores only stay in [0,1] when
/// the weights sum to 1.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Per-metric weights used for the composite score. Defaults reflect the
/// shipped product tuning; they are configuration, not algorithm.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
    pub roi: f64,
    pub total_pnl: f64,
    pub sharpe_ratio: f64,
    pub win_rate: f64,
    pub max_drawdown: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            roi: 0.30,
            total_pnl: 0.20,
            sharpe_ratio: 0.20,
            win_rate: 0.20,
            max_drawdown: 0.10,
        }
    }
}

impl WeightConfig {
    /// Load a weight configuration from a JSON file. Missing fields fall
    /// back to the defaults; the result is still validated by the ranking
    /// engine before use.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path).with_context(|| {
            format!("Failed to open weights file: {:?}", path.as_ref())
        })?;
        let config: Self = serde_json::from_reader(file)
            .context("Failed to parse weights file")?;
        Ok(config)
    }

    fn as_array(&self) -> [f64; 5] {
        [
            self.roi,
            self.total_pnl,
            self.sharpe_ratio,
            self.win_rate,
            self.max_drawdown,
        ]
    }

    /// Check that every weight is non-negative and the sum is 1.0 within
    /// tolerance.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.as_array().iter().any(|w| *w < 0.0) {
            return Err(AnalysisError::InvalidConfig(
                "weights must be non-negative".to_string(),
            ));
        }

        let sum: f64 = self.as_array().iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(AnalysisError::InvalidConfig(format!(
                "weights must sum to 1.0, got {:.4}",
                sum
            )));
        }

        Ok(())
    }
}
