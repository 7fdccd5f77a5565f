pub mod assessor;
pub mod window;

pub use assessor::{assess_liquidity, RiskAssessor, RiskError, RiskThresholds, RiskTier, Segment};
