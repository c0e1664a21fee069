pub mod calculator;
pub mod weighted;

pub use calculator::{engagement_rate, MetricCalculator};
pub use weighted::{ScoringMode, WeightConfig};
