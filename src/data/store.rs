use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use crate::data::types::MarketObservation;

/// In-memory observation source loaded from a JSON array on disk.
///
/// Stands in for the record database: callers ask for one asset over a
/// time range and get an ordered, independently owned sequence back.
pub struct ObservationStore {
    observations: Vec<MarketObservation>,
}

impl ObservationStore {
    pub fn new(observations: Vec<MarketObservation>) -> Self {
        Self { observations }
    }

    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read observations file: {}", path))?;

        let observations: Vec<MarketObservation> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse observations file: {}", path))?;

        tracing::info!("Loaded {} observations from {}", observations.len(), path);
        Ok(Self::new(observations))
    }

    /// Observations for `asset_id` within `[start, end]`, sorted by timestamp.
    /// Missing bounds are open.
    pub fn fetch(
        &self,
        asset_id: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Vec<MarketObservation> {
        let mut records: Vec<MarketObservation> = self.observations
            .iter()
            .filter(|o| o.asset_id == asset_id)
            .filter(|o| start.map_or(true, |s| o.timestamp >= s))
            .filter(|o| end.map_or(true, |e| o.timestamp <= e))
            .cloned()
            .collect();

        // stable: equal timestamps keep file order
        records.sort_by_key(|o| o.timestamp);
        records
    }

    /// Distinct asset ids in first-seen order
    pub fn assets(&self) -> Vec<String> {
        let mut assets: Vec<String> = Vec::new();
        for obs in &self.observations {
            if !assets.contains(&obs.asset_id) {
                assets.push(obs.asset_id.clone());
            }
        }
        assets
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}
