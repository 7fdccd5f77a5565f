use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// One spread/volume/price sample for an asset at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketObservation {
    #[serde(alias = "asset_type")]
    pub asset_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(alias = "bid_ask_spread")]
    pub spread: f64,
    pub volume: f64,
    #[serde(alias = "bid_price")]
    pub price: f64,
}

/// Aggregate result of one risk assessment run over current + predicted data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiquidityReport {
    pub asset_id: Option<String>,
    pub total_observations: usize,
    pub historical_observations: usize,
    pub predicted_observations: usize,
    pub high_risk_count: usize,
    pub moderate_risk_count: usize,
    pub current_high_risk_count: usize,
    pub current_moderate_risk_count: usize,
    pub predicted_high_risk_count: usize,
    pub predicted_moderate_risk_count: usize,
    pub current_warnings: Vec<String>,
    pub predicted_warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observation_accepts_legacy_field_names() {
        let json = r#"{
            "asset_type": "ETF",
            "timestamp": "2013-03-29T00:00:00Z",
            "bid_ask_spread": 0.0207,
            "volume": 620875,
            "bid_price": 117.46
        }"#;

        let obs: MarketObservation = serde_json::from_str(json).unwrap();
        assert_eq!(obs.asset_id, "ETF");
        assert!((obs.spread - 0.0207).abs() < 1e-12);
        assert!((obs.price - 117.46).abs() < 1e-12);
    }

    #[test]
    fn test_report_serializes_unset_asset_as_null() {
        let report = LiquidityReport::default();
        let value = serde_json::to_value(&report).unwrap();

        assert!(value["asset_id"].is_null());
        assert_eq!(value["total_observations"], 0);
        assert_eq!(value["current_warnings"], serde_json::json!([]));
    }
}
