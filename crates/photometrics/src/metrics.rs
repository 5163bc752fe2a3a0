//! Facility power and uniformity aggregator
//!
//! Whole-room scalar metrics from a Monte Carlo estimate: `sample_count`
//! uniformly drawn planar points evaluated on the canopy plane through the
//! shared irradiance kernel.
//!
//! | Metric | Definition |
//! |--------|------------|
//! | totalPower | Σ wattage (W) |
//! | powerDensity | totalPower / floor area (W/m²) |
//! | avg/min/maxPPFD | reductions over the samples, rounded |
//! | uniformity | min / avg |
//! | dli | avg · 0.0864 · photoperiod hours |
//! | efficacy | avg / powerDensity |

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::config::CalculatorConfig;
use crate::irradiance::sample_ppfd;
use crate::model::{LightSource, Room};
use crate::Result;

/// μmol/s·day → mol/day (86 400 s × 1e-6), scaled by photoperiod hours
pub const DLI_FACTOR: f64 = 0.0864;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerMetrics {
    /// W
    pub total_power: f64,
    /// W/m²
    pub power_density: f64,
    #[serde(rename = "avgPPFD")]
    pub avg_ppfd: f64,
    #[serde(rename = "minPPFD")]
    pub min_ppfd: f64,
    #[serde(rename = "maxPPFD")]
    pub max_ppfd: f64,
    /// min / avg
    pub uniformity: f64,
    /// mol/m²/day
    pub dli: f64,
    /// PPFD per W/m²
    pub efficacy: f64,
}

impl PowerMetrics {
    /// DLI as shown on the dashboard
    pub fn dli_display(&self) -> String {
        format!("{:.2}", self.dli)
    }

    /// Efficacy as shown on the dashboard
    pub fn efficacy_display(&self) -> String {
        format!("{:.1}", self.efficacy)
    }
}

impl fmt::Display for PowerMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total power:   {:.0} W", self.total_power)?;
        writeln!(f, "Power density: {:.2} W/m²", self.power_density)?;
        writeln!(
            f,
            "PPFD:          avg {} | min {} | max {} μmol/m²/s",
            self.avg_ppfd, self.min_ppfd, self.max_ppfd
        )?;
        writeln!(f, "Uniformity:    {:.2}", self.uniformity)?;
        writeln!(f, "DLI:           {} mol/m²/day", self.dli_display())?;
        write!(f, "Efficacy:      {} PPFD per W/m²", self.efficacy_display())
    }
}

/// Metrics with an RNG seeded from `config.seed` (entropy when unset)
pub fn compute_metrics(
    sources: &[LightSource],
    room: &Room,
    config: &CalculatorConfig,
) -> Result<PowerMetrics> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    compute_metrics_with_rng(sources, room, config, &mut rng)
}

/// Metrics drawing sample positions from the given RNG
pub fn compute_metrics_with_rng<R: Rng>(
    sources: &[LightSource],
    room: &Room,
    config: &CalculatorConfig,
    rng: &mut R,
) -> Result<PowerMetrics> {
    room.validate()?;
    config.validate()?;

    let total_power: f64 = sources.iter().map(|s| s.wattage).sum();
    let area_m2 = room.area_m2();
    let power_density = total_power / area_m2;

    let canopy = room.canopy_height_m(config.canopy_ratio);
    let length = room.dimensions.length;
    let width = room.dimensions.width;
    let points: Vec<_> = (0..config.sample_count)
        .map(|_| {
            let x = rng.gen_range(0.0..length);
            let y = rng.gen_range(0.0..width);
            room.canopy_point(x, y, canopy)
        })
        .collect();

    let samples = sample_ppfd(sources, &points)?;

    let avg = samples.iter().sum::<f64>() / samples.len() as f64;
    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let uniformity = if avg > 0.0 { min / avg } else { 0.0 };
    let dli = avg * DLI_FACTOR * config.photoperiod_hours;
    let efficacy = if power_density > 0.0 {
        avg / power_density
    } else {
        0.0
    };

    debug!(
        "Metrics: {} samples, avg {:.1} PPFD, {:.2} W/m² over {:.2} m²",
        samples.len(),
        avg,
        power_density,
        area_m2
    );

    Ok(PowerMetrics {
        total_power,
        power_density,
        avg_ppfd: avg.round(),
        min_ppfd: min.round(),
        max_ppfd: max.round(),
        uniformity,
        dli,
        efficacy,
    })
}
