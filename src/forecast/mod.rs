pub mod generator;
pub mod stats;

pub use generator::{ForecastError, ForecastGenerator};
