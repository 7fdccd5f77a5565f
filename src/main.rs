mod config;
mod data;
mod forecast;
mod monitoring;
mod pipeline;
mod risk;

use anyhow::{Context, Result};
use config::{Config, EnvConfig};
use data::store::ObservationStore;
use monitoring::logger::ReportLogger;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    tracing::info!("Liquidity tracker starting...");

    // Load configuration
    let env_config = EnvConfig::load()?;
    tracing::info!("Loading configuration from {}", env_config.config_path);
    let mut config = Config::load(&env_config.config_path)?;
    config.apply_env(&env_config);

    tracing::info!("Window size: {}", config.risk.window_size);
    tracing::info!(
        "Forecast horizon: {} x {}s",
        config.forecast.horizon_count,
        config.forecast.interval_seconds
    );

    let store = ObservationStore::load(&config.data.input_path)?;
    if store.is_empty() {
        tracing::warn!("No observations in {}", config.data.input_path);
    }

    let assets = if config.data.assets.is_empty() {
        store.assets()
    } else {
        config.data.assets.clone()
    };
    tracing::info!("Assessing {} assets", assets.len());

    // One blocking task per asset, each with its own generator
    let tasks = assets.iter().enumerate().map(|(i, asset)| {
        let history = store.fetch(asset, config.data.start, config.data.end);
        let forecast = config.forecast.clone();
        let risk = config.risk.clone();
        let asset = asset.clone();

        tokio::task::spawn_blocking(move || {
            let rng = match forecast.seed {
                Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(i as u64)),
                None => StdRng::from_entropy(),
            };
            pipeline::run_assessment(&history, &forecast, &risk, rng)
                .with_context(|| format!("Assessment failed for {}", asset))
        })
    });

    let results = futures::future::join_all(tasks).await;

    let logger = if config.monitoring.csv_logging {
        Some(ReportLogger::new(config.monitoring.csv_log_path.clone())?)
    } else {
        None
    };

    for result in results {
        let report = result??;

        if report.high_risk_count > 0 {
            tracing::warn!(
                "{}: {} high risk events ({} predicted)",
                report.asset_id.as_deref().unwrap_or("<none>"),
                report.high_risk_count,
                report.predicted_high_risk_count
            );
        }

        if let Some(logger) = &logger {
            logger.log_report(&report)?;
        }

        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    tracing::info!("Done");
    Ok(())
}
