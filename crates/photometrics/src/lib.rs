//! Photometrics Library
//!
//! Point-source irradiance model for horticultural grow rooms:
//! - PPFD heatmap over a discretized room grid
//! - Facility power, uniformity, DLI and efficacy metrics (Monte Carlo)
//! - Fleet-averaged spectral power distribution
//! - Uniform fixture layout for a target PPFD
//!
//! Every calculation is a pure function of its inputs. Positions are carried
//! in meters internally; the room's native unit only shows up at the edges
//! (heatmap coordinates and layout positions).

use thiserror::Error;

pub mod config;
pub mod heatmap;
pub mod irradiance;
pub mod layout;
pub mod metrics;
pub mod model;
pub mod spectrum;
pub mod units;

#[cfg(test)]
mod properties;

pub use config::CalculatorConfig;
pub use heatmap::{compute_heatmap, HeatmapPoint};
pub use irradiance::{ppfd_at, sample_ppfd};
pub use layout::{optimize_layout, FixturePosition, LayoutFixtureModel, LayoutRequest};
pub use metrics::{compute_metrics, compute_metrics_with_rng, PowerMetrics};
pub use model::{
    light_sources, Dimensions, Fixture, FixtureId, FixtureModel, LightSource, Position, Room,
    Specifications,
};
pub use spectrum::{compute_spectrum, SpectrumPoint, WAVELENGTHS};
pub use units::{Feet, Length, LengthUnit, Meters};

/// Photon-to-PPFD conversion constant applied to every source contribution
pub const PPFD_CONVERSION: f64 = 4.6;

/// Closest a source may sit to a sample point before the result is rejected (m)
pub const MIN_SOURCE_DISTANCE_M: f64 = 1e-9;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhotometricsError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),
}

pub type Result<T> = std::result::Result<T, PhotometricsError>;

/// Reject NaN/infinite values with a field name in the message
pub(crate) fn ensure_finite(field: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PhotometricsError::InvalidInput(format!(
            "{} must be a finite number, got {}",
            field, value
        )))
    }
}

/// Reject negative or non-finite values
pub(crate) fn ensure_non_negative(field: &str, value: f64) -> Result<()> {
    ensure_finite(field, value)?;
    if value < 0.0 {
        return Err(PhotometricsError::InvalidInput(format!(
            "{} must not be negative, got {}",
            field, value
        )));
    }
    Ok(())
}

/// Reject zero, negative or non-finite values
pub(crate) fn ensure_positive(field: &str, value: f64) -> Result<()> {
    ensure_finite(field, value)?;
    if value <= 0.0 {
        return Err(PhotometricsError::InvalidInput(format!(
            "{} must be greater than zero, got {}",
            field, value
        )));
    }
    Ok(())
}
