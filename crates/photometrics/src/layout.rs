//! Layout optimizer
//!
//! Uniform rectangular grid of one fixture model for a target PPFD. The
//! footprint is a coverage heuristic, independent of the irradiance kernel:
//!
//! ```text
//! footprint = sqrt(ppf / targetPPFD) · 2
//! rows = floor(length / footprint), cols = floor(width / footprint)
//! ```
//!
//! Fixtures sit at `length/(rows+1)·r`, `width/(cols+1)·c` for r, c ≥ 1, so
//! none lands on a wall.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::Room;
use crate::{ensure_finite, ensure_positive, PhotometricsError, Result};

/// Mounting distance below the ceiling, room units
pub const DEFAULT_CEILING_OFFSET: f64 = 2.0;

/// Largest layout the optimizer will materialize
pub const MAX_LAYOUT_FIXTURES: f64 = 100_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutFixtureModel {
    /// μmol/s
    pub ppf: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRequest {
    pub room: Room,
    #[serde(rename = "targetPPFD")]
    pub target_ppfd: f64,
    pub fixture_model: LayoutFixtureModel,
    #[serde(default = "default_ceiling_offset")]
    pub ceiling_offset: f64,
}

fn default_ceiling_offset() -> f64 {
    DEFAULT_CEILING_OFFSET
}

impl LayoutRequest {
    pub fn new(room: Room, target_ppfd: f64, ppf: f64) -> Self {
        Self {
            room,
            target_ppfd,
            fixture_model: LayoutFixtureModel { ppf },
            ceiling_offset: DEFAULT_CEILING_OFFSET,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.room.validate()?;
        ensure_positive("targetPPFD", self.target_ppfd)?;
        ensure_positive("fixtureModel.ppf", self.fixture_model.ppf)?;
        ensure_finite("ceilingOffset", self.ceiling_offset)?;
        Ok(())
    }

    /// Coverage side length of one fixture, room units
    pub fn footprint(&self) -> f64 {
        (self.fixture_model.ppf / self.target_ppfd).sqrt() * 2.0
    }
}

/// A placed fixture, room units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixturePosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Grid positions for the request; empty when one fixture already covers a
/// full room side
pub fn optimize_layout(request: &LayoutRequest) -> Result<Vec<FixturePosition>> {
    request.validate()?;

    let dims = request.room.dimensions;
    let footprint = request.footprint();
    let rows = (dims.length / footprint).floor();
    let cols = (dims.width / footprint).floor();
    if rows == 0.0 || cols == 0.0 {
        debug!("Layout: footprint {:.3} exceeds a room side, no fixtures", footprint);
        return Ok(Vec::new());
    }
    if rows * cols > MAX_LAYOUT_FIXTURES {
        return Err(PhotometricsError::InvalidInput(format!(
            "layout of {}x{} fixtures exceeds the {} fixture limit",
            rows, cols, MAX_LAYOUT_FIXTURES
        )));
    }
    let (rows, cols) = (rows as u32, cols as u32);

    let spacing_x = dims.length / f64::from(rows + 1);
    let spacing_y = dims.width / f64::from(cols + 1);
    let z = dims.height - request.ceiling_offset;

    let positions: Vec<FixturePosition> = (1..=rows)
        .flat_map(|r| {
            (1..=cols).map(move |c| FixturePosition {
                x: spacing_x * f64::from(r),
                y: spacing_y * f64::from(c),
                z,
            })
        })
        .collect();

    debug!(
        "Layout: footprint {:.3}, {}x{} grid, {} fixtures",
        footprint,
        rows,
        cols,
        positions.len()
    );

    Ok(positions)
}
