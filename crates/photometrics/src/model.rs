//! Room and fixture model
//!
//! `Fixture` and `Room` mirror the host's JSON payloads. `LightSource` is the
//! read-only projection used by the calculators, with its position already
//! converted to meters.

use nalgebra::Point3;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::units::{Length, LengthUnit, Meters};
use crate::{ensure_finite, ensure_non_negative, ensure_positive, Result};

/// Opaque fixture identifier, passed through for correlation only.
/// Any JSON shape is accepted; `Other` keeps whatever the host sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FixtureId {
    Number(i64),
    Float(f64),
    Text(String),
    Other(Value),
}

impl Default for FixtureId {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for FixtureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Float(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
            Self::Other(v) => write!(f, "{}", v),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Electrical and photometric datasheet values of a fixture model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specifications {
    /// Photosynthetic photon flux (μmol/s)
    pub ppf: f64,
    /// Electrical power draw (W)
    pub power: f64,
    /// Relative intensity keyed by wavelength in nm
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_spectrum"
    )]
    pub spectrum: Option<BTreeMap<u32, f64>>,
}

/// Spectrum keys that are not plain integer nanometers can never match a
/// bucket, so they are dropped instead of failing the whole payload
fn deserialize_spectrum<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<BTreeMap<u32, f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, f64>>::deserialize(deserializer)?;
    Ok(raw.map(|entries| {
        entries
            .into_iter()
            .filter_map(|(key, intensity)| {
                let nm = key.parse::<u32>().ok()?;
                (nm.to_string() == key).then_some((nm, intensity))
            })
            .collect()
    }))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureModel {
    pub specifications: Specifications,
}

/// A placed fixture as the host sends it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub id: FixtureId,
    pub position: Position,
    pub model: FixtureModel,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

/// Rectangular room, dimensions in `unit`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub dimensions: Dimensions,
    #[serde(default)]
    pub unit: LengthUnit,
}

impl Room {
    pub fn new(length: f64, width: f64, height: f64, unit: LengthUnit) -> Self {
        Self {
            dimensions: Dimensions {
                length,
                width,
                height,
            },
            unit,
        }
    }

    pub fn meters(length: f64, width: f64, height: f64) -> Self {
        Self::new(length, width, height, LengthUnit::Meters)
    }

    pub fn feet(length: f64, width: f64, height: f64) -> Self {
        Self::new(length, width, height, LengthUnit::Feet)
    }

    /// All three dimensions must be finite and positive
    pub fn validate(&self) -> Result<()> {
        ensure_positive("room.dimensions.length", self.dimensions.length)?;
        ensure_positive("room.dimensions.width", self.dimensions.width)?;
        ensure_positive("room.dimensions.height", self.dimensions.height)?;
        Ok(())
    }

    pub fn length_m(&self) -> Length<Meters> {
        self.unit.to_meters(self.dimensions.length)
    }

    pub fn width_m(&self) -> Length<Meters> {
        self.unit.to_meters(self.dimensions.width)
    }

    pub fn height_m(&self) -> Length<Meters> {
        self.unit.to_meters(self.dimensions.height)
    }

    /// Floor area in m²
    pub fn area_m2(&self) -> f64 {
        self.length_m() * self.width_m()
    }

    /// Height of the canopy plane for a given fraction of room height
    pub fn canopy_height_m(&self, canopy_ratio: f64) -> Length<Meters> {
        self.height_m() * canopy_ratio
    }

    /// Planar point in room units lifted onto the canopy plane, in meters
    pub fn canopy_point(&self, x: f64, y: f64, canopy: Length<Meters>) -> Point3<f64> {
        Point3::new(
            self.unit.to_meters(x).value(),
            self.unit.to_meters(y).value(),
            canopy.value(),
        )
    }
}

/// Calculation-side view of a fixture
#[derive(Debug, Clone, PartialEq)]
pub struct LightSource {
    pub id: FixtureId,
    /// Position in meters
    pub position: Point3<f64>,
    /// μmol/s
    pub ppf: f64,
    /// W
    pub wattage: f64,
    pub spectrum: Option<BTreeMap<u32, f64>>,
}

impl LightSource {
    pub fn new(id: FixtureId, position: Point3<f64>, ppf: f64, wattage: f64) -> Self {
        Self {
            id,
            position,
            ppf,
            wattage,
            spectrum: None,
        }
    }

    pub fn with_spectrum(mut self, spectrum: BTreeMap<u32, f64>) -> Self {
        self.spectrum = Some(spectrum);
        self
    }

    /// Project a host fixture, converting its position from `unit` to meters
    pub fn from_fixture(fixture: &Fixture, unit: LengthUnit) -> Result<Self> {
        let specs = &fixture.model.specifications;
        let id = &fixture.id;

        ensure_finite(&format!("fixture {} position.x", id), fixture.position.x)?;
        ensure_finite(&format!("fixture {} position.y", id), fixture.position.y)?;
        ensure_finite(&format!("fixture {} position.z", id), fixture.position.z)?;
        ensure_non_negative(&format!("fixture {} ppf", id), specs.ppf)?;
        ensure_non_negative(&format!("fixture {} power", id), specs.power)?;
        if let Some(spectrum) = &specs.spectrum {
            for (wavelength, intensity) in spectrum {
                ensure_non_negative(
                    &format!("fixture {} spectrum[{}]", id, wavelength),
                    *intensity,
                )?;
            }
        }

        Ok(Self {
            id: id.clone(),
            position: Point3::new(
                unit.to_meters(fixture.position.x).value(),
                unit.to_meters(fixture.position.y).value(),
                unit.to_meters(fixture.position.z).value(),
            ),
            ppf: specs.ppf,
            wattage: specs.power,
            spectrum: specs.spectrum.clone(),
        })
    }

    /// Relative intensity at an exact wavelength key, 0 when absent
    pub fn intensity_at(&self, wavelength: u32) -> f64 {
        self.spectrum
            .as_ref()
            .and_then(|s| s.get(&wavelength))
            .copied()
            .unwrap_or(0.0)
    }
}

/// Map every fixture of a room into light sources
pub fn light_sources(fixtures: &[Fixture], room: &Room) -> Result<Vec<LightSource>> {
    fixtures
        .iter()
        .map(|f| LightSource::from_fixture(f, room.unit))
        .collect()
}
