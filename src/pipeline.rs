use anyhow::Result;
use rand::Rng;
use tracing::info;
use crate::config::{ForecastConfig, RiskConfig};
use crate::data::types::{LiquidityReport, MarketObservation};
use crate::forecast::ForecastGenerator;
use crate::risk::RiskAssessor;

/// History → forecast → risk assessment for one asset.
pub fn run_assessment<R: Rng>(
    history: &[MarketObservation],
    forecast: &ForecastConfig,
    risk: &RiskConfig,
    rng: R,
) -> Result<LiquidityReport> {
    let assessor = RiskAssessor::with_thresholds(risk.window_size, risk.thresholds)?;

    let mut generator = ForecastGenerator::new(rng);
    let predictions = generator.generate(history, forecast.horizon_count, forecast.interval_seconds)?;

    info!(
        "Generated {} predictions from {} historical observations (window={})",
        predictions.len(),
        history.len(),
        assessor.window_size()
    );

    Ok(assessor.assess(history, &predictions))
}
