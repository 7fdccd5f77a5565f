use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use crate::data::types::{LiquidityReport, MarketObservation};
use crate::risk::window::SlidingWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskTier {
    None,
    Moderate,
    High,
}

/// Which input sequence an observation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Segment {
    Current,
    Predicted,
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Segment::Current => write!(f, "Current"),
            Segment::Predicted => write!(f, "Predicted"),
        }
    }
}

/// Multipliers applied to the moving averages when classifying.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    /// High risk when spread exceeds this multiple of its MA
    pub high_spread_multiple: f64,
    /// High risk when volume falls below this fraction of its MA
    pub high_volume_fraction: f64,
    pub moderate_spread_multiple: f64,
    pub moderate_volume_fraction: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            high_spread_multiple: 3.0,
            high_volume_fraction: 0.4,
            moderate_spread_multiple: 1.2,
            moderate_volume_fraction: 0.7,
        }
    }
}

impl RiskThresholds {
    /// High is checked first; moderate only applies when high does not.
    pub fn classify(&self, spread: f64, volume: f64, spread_ma: f64, volume_ma: f64) -> RiskTier {
        if spread > self.high_spread_multiple * spread_ma
            || volume < self.high_volume_fraction * volume_ma
        {
            RiskTier::High
        } else if spread > self.moderate_spread_multiple * spread_ma
            || volume < self.moderate_volume_fraction * volume_ma
        {
            RiskTier::Moderate
        } else {
            RiskTier::None
        }
    }
}

/// Classification of one observation in the concatenated sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationRisk {
    pub index: usize,
    pub segment: Segment,
    pub tier: RiskTier,
    pub spread_ma: f64,
    pub volume_ma: f64,
    /// Window length after admitting this observation
    pub window_len: usize,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RiskError {
    #[error("Window size must be at least 1, got {0}")]
    InvalidWindowSize(usize),
}

/// Sliding-window classifier over current followed by predicted observations.
#[derive(Debug, Clone)]
pub struct RiskAssessor {
    window_size: usize,
    thresholds: RiskThresholds,
}

impl RiskAssessor {
    pub fn new(window_size: usize) -> Result<Self, RiskError> {
        Self::with_thresholds(window_size, RiskThresholds::default())
    }

    pub fn with_thresholds(window_size: usize, thresholds: RiskThresholds) -> Result<Self, RiskError> {
        if window_size == 0 {
            return Err(RiskError::InvalidWindowSize(window_size));
        }
        Ok(Self { window_size, thresholds })
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Single forward pass over `current` then `predicted`.
    ///
    /// Each observation is admitted to the spread and volume windows before
    /// its moving averages are taken, so the MA includes the point itself.
    /// Observations at index `< current.len()` belong to the current segment.
    pub fn classify(
        &self,
        current: &[MarketObservation],
        predicted: &[MarketObservation],
    ) -> Vec<ObservationRisk> {
        let boundary = current.len();
        let mut spread_window = SlidingWindow::new(self.window_size);
        let mut volume_window = SlidingWindow::new(self.window_size);

        current
            .iter()
            .chain(predicted.iter())
            .enumerate()
            .map(|(index, obs)| {
                spread_window.push(obs.spread);
                volume_window.push(obs.volume);

                let spread_ma = spread_window.mean();
                let volume_ma = volume_window.mean();

                ObservationRisk {
                    index,
                    segment: if index < boundary { Segment::Current } else { Segment::Predicted },
                    tier: self.thresholds.classify(obs.spread, obs.volume, spread_ma, volume_ma),
                    spread_ma,
                    volume_ma,
                    window_len: spread_window.len(),
                }
            })
            .collect()
    }

    /// Classify and aggregate into a report. Pure: identical inputs give
    /// identical reports.
    pub fn assess(
        &self,
        current: &[MarketObservation],
        predicted: &[MarketObservation],
    ) -> LiquidityReport {
        let asset_id = current
            .first()
            .or_else(|| predicted.first())
            .map(|o| o.asset_id.clone());

        let mut report = LiquidityReport {
            asset_id,
            total_observations: current.len() + predicted.len(),
            historical_observations: current.len(),
            predicted_observations: predicted.len(),
            ..Default::default()
        };

        let observations = current.iter().chain(predicted.iter());
        for (risk, obs) in self.classify(current, predicted).into_iter().zip(observations) {
            match (risk.tier, risk.segment) {
                (RiskTier::High, segment) => {
                    let warning = format_warning(segment, obs, &risk);
                    debug!("{}", warning);

                    match segment {
                        Segment::Current => {
                            report.current_high_risk_count += 1;
                            report.current_warnings.push(warning);
                        }
                        Segment::Predicted => {
                            report.predicted_high_risk_count += 1;
                            report.predicted_warnings.push(warning);
                        }
                    }
                }
                (RiskTier::Moderate, Segment::Current) => report.current_moderate_risk_count += 1,
                (RiskTier::Moderate, Segment::Predicted) => report.predicted_moderate_risk_count += 1,
                (RiskTier::None, _) => {}
            }
        }

        report.high_risk_count = report.current_high_risk_count + report.predicted_high_risk_count;
        report.moderate_risk_count =
            report.current_moderate_risk_count + report.predicted_moderate_risk_count;

        info!(
            "Liquidity assessment for {}: {} observations, {} high risk, {} moderate risk",
            report.asset_id.as_deref().unwrap_or("<none>"),
            report.total_observations,
            report.high_risk_count,
            report.moderate_risk_count
        );

        report
    }
}

/// Assess with the default thresholds, rejecting a zero window size.
pub fn assess_liquidity(
    current: &[MarketObservation],
    predicted: &[MarketObservation],
    window_size: usize,
) -> Result<LiquidityReport, RiskError> {
    Ok(RiskAssessor::new(window_size)?.assess(current, predicted))
}

fn format_warning(segment: Segment, obs: &MarketObservation, risk: &ObservationRisk) -> String {
    format!(
        "{} high risk for {} at {}: Spread={:.2} (MA={:.2}), Volume={:.0} (MA={:.0})",
        segment,
        obs.asset_id,
        obs.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
        obs.spread,
        risk.spread_ma,
        obs.volume,
        risk.volume_ma
    )
}
