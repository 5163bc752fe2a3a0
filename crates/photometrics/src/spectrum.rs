//! Spectral compositor
//!
//! Averages per-fixture relative spectra over 81 fixed buckets
//! (380–780 nm, 5 nm step). The result is a fleet mean, not a summed
//! facility power distribution, so a mixed fleet reads as its average
//! fixture. Keys must match a bucket exactly; nothing is interpolated.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::LightSource;

pub const WAVELENGTH_MIN_NM: u32 = 380;
pub const WAVELENGTH_MAX_NM: u32 = 780;
pub const WAVELENGTH_STEP_NM: u32 = 5;

/// Number of spectral buckets
pub const BUCKET_COUNT: usize =
    ((WAVELENGTH_MAX_NM - WAVELENGTH_MIN_NM) / WAVELENGTH_STEP_NM + 1) as usize;

/// Bucket wavelengths in ascending order
pub const WAVELENGTHS: [u32; BUCKET_COUNT] = {
    let mut out = [0u32; BUCKET_COUNT];
    let mut i = 0;
    while i < BUCKET_COUNT {
        out[i] = WAVELENGTH_MIN_NM + i as u32 * WAVELENGTH_STEP_NM;
        i += 1;
    }
    out
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectrumPoint {
    /// nm
    pub wavelength: u32,
    /// Mean relative intensity across sources
    pub intensity: f64,
}

/// Mean spectrum over all sources; all-zero when there are none
pub fn compute_spectrum(sources: &[LightSource]) -> Vec<SpectrumPoint> {
    let count = sources.len();

    let spectrum: Vec<SpectrumPoint> = WAVELENGTHS
        .iter()
        .map(|&wavelength| {
            let intensity = if count == 0 {
                0.0
            } else {
                sources.iter().map(|s| s.intensity_at(wavelength)).sum::<f64>() / count as f64
            };
            SpectrumPoint {
                wavelength,
                intensity,
            }
        })
        .collect();

    debug!("Spectrum: {} buckets from {} sources", spectrum.len(), count);
    spectrum
}

/// Bucket with the highest intensity
pub fn peak_wavelength(spectrum: &[SpectrumPoint]) -> Option<u32> {
    spectrum
        .iter()
        .filter(|p| p.intensity > 0.0)
        .max_by(|a, b| a.intensity.total_cmp(&b.intensity))
        .map(|p| p.wavelength)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FixtureId;
    use nalgebra::Point3;
    use std::collections::BTreeMap;

    fn source(spectrum: &[(u32, f64)]) -> LightSource {
        LightSource::new(FixtureId::Number(1), Point3::origin(), 1000.0, 300.0)
            .with_spectrum(spectrum.iter().copied().collect::<BTreeMap<_, _>>())
    }

    #[test]
    fn test_bucket_layout() {
        assert_eq!(BUCKET_COUNT, 81);
        assert_eq!(WAVELENGTHS[0], 380);
        assert_eq!(WAVELENGTHS[80], 780);
        assert!(WAVELENGTHS.windows(2).all(|w| w[1] - w[0] == 5));
    }

    #[test]
    fn test_mean_across_sources() {
        let sources = vec![source(&[(450, 1.0), (660, 0.5)]), source(&[(450, 0.0)])];
        let spectrum = compute_spectrum(&sources);
        assert_eq!(spectrum.len(), 81);

        let at = |nm: u32| spectrum.iter().find(|p| p.wavelength == nm).unwrap().intensity;
        assert_eq!(at(450), 0.5);
        assert_eq!(at(660), 0.25);
        assert_eq!(at(500), 0.0);
        assert_eq!(peak_wavelength(&spectrum), Some(450));
    }

    #[test]
    fn test_off_grid_keys_are_ignored() {
        let sources = vec![source(&[(452, 1.0), (800, 1.0)])];
        let spectrum = compute_spectrum(&sources);
        assert!(spectrum.iter().all(|p| p.intensity == 0.0));
        assert_eq!(peak_wavelength(&spectrum), None);
    }

    #[test]
    fn test_missing_spectrum_and_no_sources() {
        let bare = LightSource::new(FixtureId::Number(2), Point3::origin(), 1.0, 1.0);
        assert!(compute_spectrum(&[bare]).iter().all(|p| p.intensity == 0.0));

        let empty = compute_spectrum(&[]);
        assert_eq!(empty.len(), 81);
        assert!(empty.iter().all(|p| p.intensity == 0.0 && !p.intensity.is_nan()));
    }
}
