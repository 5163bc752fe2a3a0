//! Calculator configuration
//!
//! Resolution and sample counts trade fidelity against compute cost; the
//! defaults reproduce the dashboard's 50×50 grid and 100-sample estimate.

use serde::{Deserialize, Serialize};

use crate::{PhotometricsError, Result};

/// Grid divisions along each room axis
pub const DEFAULT_GRID_RESOLUTION: u32 = 50;

/// Monte Carlo samples used for facility metrics
pub const DEFAULT_SAMPLE_COUNT: u32 = 100;

/// Canopy plane as a fraction of room height
pub const DEFAULT_CANOPY_RATIO: f64 = 0.75;

/// Photoperiod used for DLI (hours/day)
pub const DEFAULT_PHOTOPERIOD_HOURS: f64 = 12.0;

/// Upper bound on grid divisions (≈1M heatmap points)
pub const MAX_GRID_RESOLUTION: u32 = 1_000;

/// Upper bound on Monte Carlo samples
pub const MAX_SAMPLE_COUNT: u32 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalculatorConfig {
    /// Grid divisions per axis; the heatmap holds (n+1)² points
    pub grid_resolution: u32,
    /// Random planar samples for the metrics estimate
    pub sample_count: u32,
    /// Canopy height as a fraction of room height
    pub canopy_ratio: f64,
    /// Light hours per day for DLI
    pub photoperiod_hours: f64,
    /// RNG seed for reproducible sampling (None = entropy)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            grid_resolution: DEFAULT_GRID_RESOLUTION,
            sample_count: DEFAULT_SAMPLE_COUNT,
            canopy_ratio: DEFAULT_CANOPY_RATIO,
            photoperiod_hours: DEFAULT_PHOTOPERIOD_HOURS,
            seed: None,
        }
    }
}

impl CalculatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grid_resolution(mut self, n: u32) -> Self {
        self.grid_resolution = n;
        self
    }

    pub fn sample_count(mut self, n: u32) -> Self {
        self.sample_count = n;
        self
    }

    pub fn canopy_ratio(mut self, ratio: f64) -> Self {
        self.canopy_ratio = ratio;
        self
    }

    pub fn photoperiod_hours(mut self, hours: f64) -> Self {
        self.photoperiod_hours = hours;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of heatmap points this config produces
    pub fn heatmap_len(&self) -> usize {
        let side = self.grid_resolution as usize + 1;
        side * side
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid_resolution == 0 || self.grid_resolution > MAX_GRID_RESOLUTION {
            return Err(PhotometricsError::InvalidInput(format!(
                "gridResolution must be within 1..={}, got {}",
                MAX_GRID_RESOLUTION, self.grid_resolution
            )));
        }
        if self.sample_count == 0 || self.sample_count > MAX_SAMPLE_COUNT {
            return Err(PhotometricsError::InvalidInput(format!(
                "sampleCount must be within 1..={}, got {}",
                MAX_SAMPLE_COUNT, self.sample_count
            )));
        }
        if !(0.0..=1.0).contains(&self.canopy_ratio) {
            return Err(PhotometricsError::InvalidInput(format!(
                "canopyRatio must be within 0..=1, got {}",
                self.canopy_ratio
            )));
        }
        if !(self.photoperiod_hours > 0.0 && self.photoperiod_hours <= 24.0) {
            return Err(PhotometricsError::InvalidInput(format!(
                "photoperiodHours must be within (0, 24], got {}",
                self.photoperiod_hours
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CalculatorConfig::default();
        assert_eq!(config.heatmap_len(), 2601);
        assert_eq!(config.sample_count, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: CalculatorConfig =
            serde_json::from_str(r#"{"gridResolution": 10, "seed": 7}"#).unwrap();
        assert_eq!(config.grid_resolution, 10);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.canopy_ratio, DEFAULT_CANOPY_RATIO);
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(CalculatorConfig::new().grid_resolution(0).validate().is_err());
        assert!(CalculatorConfig::new().sample_count(0).validate().is_err());
        assert!(CalculatorConfig::new().canopy_ratio(1.5).validate().is_err());
        assert!(CalculatorConfig::new().canopy_ratio(f64::NAN).validate().is_err());
        assert!(CalculatorConfig::new().photoperiod_hours(0.0).validate().is_err());
        assert!(CalculatorConfig::new().photoperiod_hours(18.0).validate().is_ok());
    }
}
