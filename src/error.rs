//! Typed errors for the metrics and ranking engines.

use thiserror::Error;

/// Recoverable analysis errors the caller should surface to the user
/// rather than abort the whole batch on.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Malformed input to the metrics engine (e.g. non-positive capital).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The ranking engine was given nothing to rank.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// A weight configuration that cannot produce a meaningful score.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
