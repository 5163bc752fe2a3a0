//! Point-source irradiance kernel
//!
//! Free-space inverse square law, no occlusion, beam angle or reflectance:
//!
//! ```text
//! PPFD(p) = Σ (PPF_i / (4π·d_i²)) · 4.6
//! ```
//!
//! The heatmap grid and the Monte Carlo metrics both evaluate through
//! `sample_ppfd`, so the two paths cannot drift apart.

use nalgebra::{distance_squared, Point3};
use std::f64::consts::PI;

use crate::model::LightSource;
use crate::{PhotometricsError, Result, MIN_SOURCE_DISTANCE_M, PPFD_CONVERSION};

/// Contribution of one source at squared distance `d2` (m²)
#[inline]
fn contribution(ppf: f64, d2: f64) -> f64 {
    ppf / (4.0 * PI * d2) * PPFD_CONVERSION
}

/// Summed PPFD of all sources at one point (meters)
pub fn ppfd_at(sources: &[LightSource], point: &Point3<f64>) -> Result<f64> {
    let min_d2 = MIN_SOURCE_DISTANCE_M * MIN_SOURCE_DISTANCE_M;

    sources.iter().try_fold(0.0, |total, source| {
        let d2 = distance_squared(&source.position, point);
        if d2 < min_d2 {
            return Err(PhotometricsError::DegenerateInput(format!(
                "light source {} coincides with sample point ({:.3}, {:.3}, {:.3}) m",
                source.id, point.x, point.y, point.z
            )));
        }
        Ok(total + contribution(source.ppf, d2))
    })
}

/// PPFD at each point, in input order
pub fn sample_ppfd(sources: &[LightSource], points: &[Point3<f64>]) -> Result<Vec<f64>> {
    points.iter().map(|p| ppfd_at(sources, p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FixtureId;

    fn source_at(x: f64, y: f64, z: f64, ppf: f64) -> LightSource {
        LightSource::new(FixtureId::Number(1), Point3::new(x, y, z), ppf, 100.0)
    }

    #[test]
    fn test_inverse_square_at_one_meter() {
        let sources = vec![source_at(0.0, 0.0, 1.0, 1000.0)];
        let ppfd = ppfd_at(&sources, &Point3::origin()).unwrap();
        let expected = 1000.0 / (4.0 * PI) * 4.6;
        assert!((ppfd - expected).abs() < 1e-9);
    }

    #[test]
    fn test_doubling_distance_quarters_ppfd() {
        let sources = vec![source_at(0.0, 0.0, 0.0, 1000.0)];
        let near = ppfd_at(&sources, &Point3::new(1.0, 0.0, 0.0)).unwrap();
        let far = ppfd_at(&sources, &Point3::new(2.0, 0.0, 0.0)).unwrap();
        assert!((near / far - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_sources_sum() {
        let one = vec![source_at(0.0, 0.0, 2.0, 500.0)];
        let two = vec![source_at(0.0, 0.0, 2.0, 500.0), source_at(0.0, 0.0, 2.0, 500.0)];
        let p = Point3::origin();
        let single = ppfd_at(&one, &p).unwrap();
        let double = ppfd_at(&two, &p).unwrap();
        assert!((double - 2.0 * single).abs() < 1e-9);
    }

    #[test]
    fn test_no_sources_is_zero() {
        assert_eq!(ppfd_at(&[], &Point3::origin()).unwrap(), 0.0);
    }

    #[test]
    fn test_coincident_source_is_degenerate() {
        let sources = vec![source_at(1.0, 1.0, 1.0, 1000.0)];
        let err = ppfd_at(&sources, &Point3::new(1.0, 1.0, 1.0)).unwrap_err();
        assert!(matches!(err, PhotometricsError::DegenerateInput(_)));
    }

    #[test]
    fn test_sample_order_preserved() {
        let sources = vec![source_at(0.0, 0.0, 1.0, 1000.0)];
        let points = [Point3::new(3.0, 0.0, 0.0), Point3::new(0.0, 0.0, 0.0)];
        let values = sample_ppfd(&sources, &points).unwrap();
        assert_eq!(values.len(), 2);
        assert!(values[1] > values[0]);
    }
}
