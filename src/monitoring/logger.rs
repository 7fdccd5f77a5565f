use anyhow::Result;
use chrono::Utc;
use std::fs::OpenOptions;
use std::io::Write;
use crate::data::types::LiquidityReport;

const HEADER: &str = "logged_at,asset_id,total,historical,predicted,high,moderate,current_high,predicted_high,current_moderate,predicted_moderate";

/// Appends liquidity reports to a CSV audit file.
pub struct ReportLogger {
    log_path: String,
}

impl ReportLogger {
    pub fn new(log_path: String) -> Result<Self> {
        // Create CSV file with headers if it doesn't exist
        if !std::path::Path::new(&log_path).exists() {
            let mut file = OpenOptions::new()
                .create(true)
                .write(true)
                .open(&log_path)?;

            writeln!(file, "{}", HEADER)?;
        }

        Ok(Self { log_path })
    }

    /// Log one summary row, then one WARNING row per high-risk event
    pub fn log_report(&self, report: &LiquidityReport) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.log_path)?;

        let logged_at = Utc::now().to_rfc3339();
        let asset = report.asset_id.as_deref().unwrap_or("");

        writeln!(
            file,
            "{},{},{},{},{},{},{},{},{},{},{}",
            logged_at,
            asset,
            report.total_observations,
            report.historical_observations,
            report.predicted_observations,
            report.high_risk_count,
            report.moderate_risk_count,
            report.current_high_risk_count,
            report.predicted_high_risk_count,
            report.current_moderate_risk_count,
            report.predicted_moderate_risk_count
        )?;

        for warning in report.current_warnings.iter().chain(&report.predicted_warnings) {
            writeln!(file, "{},WARNING,\"{}\",,,,,,,,", logged_at, warning.replace('"', "'"))?;
        }

        Ok(())
    }
}
