use chrono::Duration;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;
use crate::data::types::MarketObservation;
use crate::forecast::stats;

/// Trailing points used for the spread moving average
pub const SPREAD_MA_WINDOW: usize = 30;
/// Upper bound on the seasonality vector length
pub const MAX_SEASON_LENGTH: usize = 10;
/// Leading points eligible to seed the seasonality vector
pub const SEASON_SAMPLE_CAP: usize = 20;

/// Chance that a forecast step carries a liquidity shock
pub const SPIKE_PROBABILITY: f64 = 0.05;
pub const SPIKE_FACTOR_MIN: f64 = 1.1;
pub const SPIKE_FACTOR_MAX: f64 = 2.7;

const SPREAD_JITTER: f64 = 0.0001;
const VOLUME_NOISE: f64 = 0.1;
const PRICE_NOISE: f64 = 0.1;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ForecastError {
    #[error("Horizon count must be positive")]
    InvalidHorizon,

    #[error("Interval must be at least one second")]
    InvalidInterval,

    #[error("Forecast timestamp overflow at step {0}")]
    TimestampOverflow(usize),
}

/// Volume model derived once per call from the full history.
#[derive(Debug, Clone)]
struct VolumeModel {
    trend: f64,
    seasonality: Vec<f64>,
    min: f64,
    max: f64,
}

/// Extrapolates a short synthetic horizon from historical observations.
///
/// Each generator owns its random source, so concurrent forecasts never share
/// draws. Use [`ForecastGenerator::seeded`] for reproducible output.
pub struct ForecastGenerator<R: Rng> {
    rng: R,
}

impl ForecastGenerator<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ForecastGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Generate `horizon_count` observations spaced `interval_seconds` apart,
    /// starting one interval after the last historical point.
    ///
    /// Empty history yields an empty forecast. Input is not validated for
    /// ordering or sign; the forecast is only as meaningful as the history.
    pub fn generate(
        &mut self,
        history: &[MarketObservation],
        horizon_count: usize,
        interval_seconds: u64,
    ) -> Result<Vec<MarketObservation>, ForecastError> {
        if horizon_count == 0 {
            return Err(ForecastError::InvalidHorizon);
        }
        if interval_seconds == 0 {
            return Err(ForecastError::InvalidInterval);
        }

        let last = match history.last() {
            Some(last) => last,
            None => return Ok(Vec::new()),
        };

        let spreads: Vec<f64> = history.iter().map(|o| o.spread).collect();
        let volumes: Vec<f64> = history.iter().map(|o| o.volume).collect();

        let spread_ma = stats::trailing_mean(&spreads, SPREAD_MA_WINDOW);
        let volume = self.volume_model(&volumes);

        debug!(
            "Forecast model for {}: spread_ma={:.6}, volume_trend={:.2}, season_len={}",
            last.asset_id,
            spread_ma,
            volume.trend,
            volume.seasonality.len()
        );

        let mut predictions = Vec::with_capacity(horizon_count);
        for step in 1..=horizon_count {
            let timestamp = step_timestamp(last, step, interval_seconds)?;

            predictions.push(MarketObservation {
                asset_id: last.asset_id.clone(),
                timestamp,
                spread: self.predict_spread(spread_ma),
                volume: self.predict_volume(last.volume, &volume, step),
                price: self.predict_price(last.price),
            });
        }

        Ok(predictions)
    }

    fn volume_model(&mut self, volumes: &[f64]) -> VolumeModel {
        let trend = stats::linear_trend(volumes);
        let max_len = MAX_SEASON_LENGTH.min(SEASON_SAMPLE_CAP.min(volumes.len())).max(1);
        let season_len = self.rng.gen_range(1..=max_len);
        let (min, max) = stats::range(volumes).unwrap_or((0.0, 0.0));

        VolumeModel {
            trend,
            seasonality: stats::seasonality(volumes, trend, season_len),
            min,
            max,
        }
    }

    fn predict_spread(&mut self, spread_ma: f64) -> f64 {
        let mut spread =
            spread_ma * self.rng.gen_range(1.0 - SPREAD_JITTER..=1.0 + SPREAD_JITTER);

        if self.rng.gen_bool(SPIKE_PROBABILITY) {
            spread *= self.rng.gen_range(SPIKE_FACTOR_MIN..=SPIKE_FACTOR_MAX);
        }
        spread
    }

    fn predict_volume(&mut self, last_volume: f64, model: &VolumeModel, step: usize) -> f64 {
        let season = model.seasonality[step % model.seasonality.len()];
        let base = last_volume + model.trend * step as f64 + season;
        let noise = self.rng.gen_range(-VOLUME_NOISE..=VOLUME_NOISE) * (model.max - model.min);

        // never below the lowest volume ever observed
        (base + noise).max(model.min)
    }

    fn predict_price(&mut self, last_price: f64) -> f64 {
        let noise = self.rng.gen_range(-PRICE_NOISE..=PRICE_NOISE) * last_price;
        (last_price + noise).max(0.0)
    }
}

fn step_timestamp(
    last: &MarketObservation,
    step: usize,
    interval_seconds: u64,
) -> Result<chrono::DateTime<chrono::Utc>, ForecastError> {
    let offset = i64::try_from(step)
        .ok()
        .zip(i64::try_from(interval_seconds).ok())
        .and_then(|(s, i)| s.checked_mul(i))
        .and_then(Duration::try_seconds)
        .ok_or(ForecastError::TimestampOverflow(step))?;

    last.timestamp
        .checked_add_signed(offset)
        .ok_or(ForecastError::TimestampOverflow(step))
}
