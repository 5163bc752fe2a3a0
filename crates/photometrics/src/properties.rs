//! Property tests across the calculators

use nalgebra::Point3;
use proptest::prelude::*;

use crate::config::CalculatorConfig;
use crate::heatmap::compute_heatmap;
use crate::layout::{optimize_layout, LayoutRequest};
use crate::metrics::compute_metrics;
use crate::model::{FixtureId, LightSource, Room};
use crate::spectrum::{compute_spectrum, WAVELENGTHS};
use crate::units::LengthUnit;

/// Room sides in meters
fn room_meters() -> impl Strategy<Value = Room> {
    (1.0f64..40.0, 1.0f64..40.0, 2.0f64..8.0).prop_map(|(l, w, h)| Room::meters(l, w, h))
}

/// Ceiling-mounted sources inside `room`, possibly none
fn ceiling_sources(room: Room) -> impl Strategy<Value = Vec<LightSource>> {
    let dims = room.dimensions;
    prop::collection::vec(
        (0.0..=1.0f64, 0.0..=1.0f64, 100.0f64..2500.0, 50.0f64..1000.0),
        0..6,
    )
    .prop_map(move |specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (fx, fy, ppf, watts))| {
                LightSource::new(
                    FixtureId::Number(i as i64),
                    Point3::new(fx * dims.length, fy * dims.width, dims.height),
                    ppf,
                    watts,
                )
            })
            .collect()
    })
}

fn room_and_sources() -> impl Strategy<Value = (Room, Vec<LightSource>)> {
    room_meters().prop_flat_map(|room| (Just(room), ceiling_sources(room)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn heatmap_has_one_point_per_intersection(
        (room, sources) in room_and_sources(),
        n in 1u32..30,
    ) {
        let config = CalculatorConfig::new().grid_resolution(n);
        let heatmap = compute_heatmap(&sources, &room, &config).unwrap();
        prop_assert_eq!(heatmap.len(), ((n + 1) * (n + 1)) as usize);
        prop_assert!(heatmap.iter().all(|p| p.value.is_finite() && p.value >= 0.0));
        if sources.is_empty() {
            prop_assert!(heatmap.iter().all(|p| p.value == 0.0));
        }
    }

    #[test]
    fn uniformity_stays_in_unit_interval(
        (room, sources) in room_and_sources(),
        seed in any::<u64>(),
    ) {
        let metrics = compute_metrics(&sources, &room, &CalculatorConfig::new().seed(seed)).unwrap();
        prop_assert!(metrics.uniformity >= 0.0);
        prop_assert!(metrics.uniformity <= 1.0 + 1e-12);
        prop_assert!(metrics.min_ppfd <= metrics.max_ppfd);
    }

    #[test]
    fn power_density_ignores_room_unit(
        (room, sources) in room_and_sources(),
        seed in any::<u64>(),
    ) {
        let d = room.dimensions;
        let feet = Room::new(d.length / 0.3048, d.width / 0.3048, d.height / 0.3048, LengthUnit::Feet);
        let config = CalculatorConfig::new().seed(seed);

        let m = compute_metrics(&sources, &room, &config).unwrap();
        let f = compute_metrics(&sources, &feet, &config).unwrap();
        prop_assert_eq!(m.total_power, f.total_power);
        prop_assert!((m.power_density - f.power_density).abs() <= 1e-9 * m.power_density.max(1.0));
    }

    #[test]
    fn spectrum_always_has_every_bucket(
        spectra in prop::collection::vec(
            prop::collection::btree_map(300u32..900, 0.0f64..2.0, 0..20),
            0..5,
        ),
    ) {
        let sources: Vec<_> = spectra
            .into_iter()
            .map(|s| LightSource::new(FixtureId::Number(0), Point3::origin(), 1.0, 1.0).with_spectrum(s))
            .collect();
        let spectrum = compute_spectrum(&sources);
        prop_assert_eq!(spectrum.len(), 81);
        for (point, nm) in spectrum.iter().zip(WAVELENGTHS) {
            prop_assert_eq!(point.wavelength, nm);
            prop_assert!(point.intensity.is_finite());
        }
    }

    #[test]
    fn layout_positions_stay_inside_room(
        room in room_meters(),
        target in 10.0f64..2000.0,
        ppf in 100.0f64..3000.0,
    ) {
        let request = LayoutRequest::new(room, target, ppf);
        let positions = optimize_layout(&request).unwrap();
        let d = room.dimensions;
        if request.footprint() > d.length || request.footprint() > d.width {
            prop_assert!(positions.is_empty());
        }
        for p in positions {
            prop_assert!(p.x > 0.0 && p.x < d.length);
            prop_assert!(p.y > 0.0 && p.y < d.width);
        }
    }
}
