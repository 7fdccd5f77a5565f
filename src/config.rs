use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fs;
use crate::risk::RiskThresholds;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    pub forecast: ForecastConfig,
    pub risk: RiskConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    pub input_path: String,
    /// Assets to assess; every asset in the input when empty
    #[serde(default)]
    pub assets: Vec<String>,
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastConfig {
    pub horizon_count: usize,
    pub interval_seconds: u64,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RiskConfig {
    pub window_size: usize,
    #[serde(default)]
    pub thresholds: RiskThresholds,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    #[serde(default)]
    pub csv_logging: bool,
    #[serde(default = "default_csv_log_path")]
    pub csv_log_path: String,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            csv_logging: false,
            csv_log_path: default_csv_log_path(),
        }
    }
}

fn default_csv_log_path() -> String { "liquidity_reports.csv".to_string() }

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("risk.window_size must be at least 1")]
    ZeroWindowSize,

    #[error("forecast.horizon_count must be at least 1")]
    ZeroHorizon,

    #[error("forecast.interval_seconds must be at least 1")]
    ZeroInterval,

    #[error("data.start ({0}) is after data.end ({1})")]
    InvertedRange(String, String),
}

#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub config_path: String,
    pub forecast_seed: Option<u64>,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the forecast and risk stages cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.risk.window_size == 0 {
            return Err(ConfigError::ZeroWindowSize);
        }
        if self.forecast.horizon_count == 0 {
            return Err(ConfigError::ZeroHorizon);
        }
        if self.forecast.interval_seconds == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if let (Some(start), Some(end)) = (self.data.start, self.data.end) {
            if start > end {
                return Err(ConfigError::InvertedRange(start.to_rfc3339(), end.to_rfc3339()));
            }
        }
        Ok(())
    }

    /// Environment overrides take precedence over the file.
    pub fn apply_env(&mut self, env: &EnvConfig) {
        if let Some(seed) = env.forecast_seed {
            self.forecast.seed = Some(seed);
        }
    }
}

impl EnvConfig {
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let forecast_seed = match std::env::var("FORECAST_SEED") {
            Ok(raw) => Some(raw.parse().context("FORECAST_SEED must be an unsigned integer")?),
            Err(_) => None,
        };

        Ok(Self {
            config_path: std::env::var("LIQUIDITY_CONFIG")
                .unwrap_or_else(|_| "config.toml".to_string()),
            forecast_seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [data]
        input_path = "observations.json"
        assets = ["ETF"]
        start = "2013-03-01T00:00:00Z"
        end = "2013-05-01T00:00:00Z"

        [forecast]
        horizon_count = 10
        interval_seconds = 86400
        seed = 42

        [risk]
        window_size = 8

        [risk.thresholds]
        high_spread_multiple = 2.5
    "#;

    #[test]
    fn test_parse_sample_config() {
        let config = Config::parse(SAMPLE).unwrap();

        assert_eq!(config.data.assets, vec!["ETF".to_string()]);
        assert!(config.data.start.is_some());
        assert_eq!(config.forecast.horizon_count, 10);
        assert_eq!(config.forecast.seed, Some(42));
        assert_eq!(config.risk.window_size, 8);
        assert_eq!(config.risk.thresholds.high_spread_multiple, 2.5);
        // unspecified thresholds keep their defaults
        assert_eq!(config.risk.thresholds.high_volume_fraction, 0.4);
        assert!(!config.monitoring.csv_logging);
        assert_eq!(config.monitoring.csv_log_path, "liquidity_reports.csv");
    }

    #[test]
    fn test_zero_window_fails_validation() {
        let raw = SAMPLE.replace("window_size = 8", "window_size = 0");
        let err = Config::parse(&raw).unwrap_err();
        assert_eq!(err.downcast_ref::<ConfigError>(), Some(&ConfigError::ZeroWindowSize));
    }

    #[test]
    fn test_zero_interval_fails_validation() {
        let raw = SAMPLE.replace("interval_seconds = 86400", "interval_seconds = 0");
        let err = Config::parse(&raw).unwrap_err();
        assert_eq!(err.downcast_ref::<ConfigError>(), Some(&ConfigError::ZeroInterval));
    }

    #[test]
    fn test_inverted_range_fails_validation() {
        let raw = SAMPLE.replace("2013-05-01T00:00:00Z", "2013-01-01T00:00:00Z");
        let err = Config::parse(&raw).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::InvertedRange(_, _))
        ));
    }

    #[test]
    fn test_env_seed_overrides_file() {
        let mut config = Config::parse(SAMPLE).unwrap();
        config.apply_env(&EnvConfig {
            config_path: "config.toml".to_string(),
            forecast_seed: Some(7),
        });
        assert_eq!(config.forecast.seed, Some(7));
    }
}
