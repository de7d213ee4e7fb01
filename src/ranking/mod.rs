//! Cross-account ranking engine.

mod engine;
mod weights;

pub use engine::RankingEngine;
pub use weights::WeightConfig;
