//! Grid irradiance sampler
//!
//! Discretizes the room footprint into an n×n grid and evaluates PPFD at every
//! intersection on the canopy plane. Coordinates in the output stay in the
//! room's native unit so the host can overlay them on its floor plan.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CalculatorConfig;
use crate::irradiance::sample_ppfd;
use crate::model::{LightSource, Room};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatmapPoint {
    /// Along room length, room units
    pub x: f64,
    /// Along room width, room units
    pub y: f64,
    /// PPFD (μmol/m²/s)
    pub value: f64,
}

/// PPFD at every (i/n, j/n) intersection of the room footprint
pub fn compute_heatmap(
    sources: &[LightSource],
    room: &Room,
    config: &CalculatorConfig,
) -> Result<Vec<HeatmapPoint>> {
    room.validate()?;
    config.validate()?;

    let n = config.grid_resolution;
    let canopy = room.canopy_height_m(config.canopy_ratio);
    let length = room.dimensions.length;
    let width = room.dimensions.width;

    let mut planar = Vec::with_capacity(config.heatmap_len());
    let mut points: Vec<Point3<f64>> = Vec::with_capacity(config.heatmap_len());
    for i in 0..=n {
        let x = f64::from(i) / f64::from(n) * length;
        for j in 0..=n {
            let y = f64::from(j) / f64::from(n) * width;
            planar.push((x, y));
            points.push(room.canopy_point(x, y, canopy));
        }
    }

    let values = sample_ppfd(sources, &points)?;

    debug!(
        "Heatmap: {} points, {} sources, canopy {:.3} m",
        values.len(),
        sources.len(),
        canopy.value()
    );

    Ok(planar
        .into_iter()
        .zip(values)
        .map(|((x, y), value)| HeatmapPoint { x, y, value })
        .collect())
}

/// Highest-valued point of a heatmap
pub fn peak(heatmap: &[HeatmapPoint]) -> Option<&HeatmapPoint> {
    heatmap.iter().max_by(|a, b| a.value.total_cmp(&b.value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FixtureId;
    use crate::units::LengthUnit;

    fn centered_source(room: &Room, z: f64, ppf: f64) -> LightSource {
        let unit = room.unit;
        LightSource::new(
            FixtureId::Number(1),
            Point3::new(
                unit.to_meters(room.dimensions.length / 2.0).value(),
                unit.to_meters(room.dimensions.width / 2.0).value(),
                unit.to_meters(z).value(),
            ),
            ppf,
            600.0,
        )
    }

    #[test]
    fn test_grid_cardinality() {
        let room = Room::meters(10.0, 8.0, 3.0);
        let sources = vec![centered_source(&room, 3.0, 1800.0)];
        let heatmap = compute_heatmap(&sources, &room, &CalculatorConfig::default()).unwrap();
        assert_eq!(heatmap.len(), 2601);
    }

    #[test]
    fn test_no_sources_gives_zeros() {
        let room = Room::meters(5.0, 5.0, 3.0);
        let heatmap = compute_heatmap(&[], &room, &CalculatorConfig::default()).unwrap();
        assert_eq!(heatmap.len(), 2601);
        assert!(heatmap.iter().all(|p| p.value == 0.0));
    }

    #[test]
    fn test_grid_spans_room_in_native_units() {
        let room = Room::feet(40.0, 20.0, 10.0);
        let heatmap =
            compute_heatmap(&[], &room, &CalculatorConfig::new().grid_resolution(4)).unwrap();
        assert_eq!(heatmap.len(), 25);
        assert_eq!((heatmap[0].x, heatmap[0].y), (0.0, 0.0));
        assert_eq!((heatmap[24].x, heatmap[24].y), (40.0, 20.0));
        // Inner loop runs along width
        assert_eq!((heatmap[1].x, heatmap[1].y), (0.0, 5.0));
    }

    #[test]
    fn test_center_exceeds_corners() {
        let room = Room::meters(10.0, 10.0, 3.0);
        let sources = vec![centered_source(&room, 3.0, 1800.0)];
        let heatmap = compute_heatmap(&sources, &room, &CalculatorConfig::default()).unwrap();

        let center = heatmap
            .iter()
            .find(|p| p.x == 5.0 && p.y == 5.0)
            .unwrap();
        for corner in [&heatmap[0], &heatmap[50], &heatmap[2550], &heatmap[2600]] {
            assert!(center.value > corner.value);
        }
        assert_eq!(peak(&heatmap).unwrap(), center);
    }

    #[test]
    fn test_feet_room_matches_equivalent_meter_room() {
        let feet = Room::new(32.8084, 32.8084, 9.84252, LengthUnit::Feet);
        let meters = Room::meters(
            feet.length_m().value(),
            feet.width_m().value(),
            feet.height_m().value(),
        );
        let config = CalculatorConfig::new().grid_resolution(10);
        let a = compute_heatmap(&[centered_source(&feet, 9.84252, 1800.0)], &feet, &config).unwrap();
        let b = compute_heatmap(&[centered_source(&meters, meters.dimensions.height, 1800.0)], &meters, &config)
            .unwrap();
        for (p, q) in a.iter().zip(&b) {
            assert!((p.value - q.value).abs() < 1e-6 * q.value.max(1.0));
        }
    }
}
