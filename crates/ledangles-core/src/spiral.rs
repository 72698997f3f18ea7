//! Grouping of sequence-ordered LEDs into the board's spiral chains.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::record::{PlacementRecord, Placements};

/// Shape of the LED arrangement and the radius bands used for polar plots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpiralLayout {
    /// Number of spirals on the board.
    pub count: usize,
    /// LEDs per spiral.
    pub lamps: usize,
    /// Radius of the first lamp of the outermost spiral.
    pub r_max: f64,
    /// Radius step between spirals.
    pub r_sep: f64,
}

impl Default for SpiralLayout {
    fn default() -> Self {
        Self {
            count: 8,
            lamps: 7,
            r_max: 600.0,
            r_sep: 50.0,
        }
    }
}

impl SpiralLayout {
    /// Polar-plot radius for `lamp` of spiral `spiral`. Each spiral gets its
    /// own band and lamps step inward by one unit so overlapping points stay
    /// visible.
    pub fn radius(&self, spiral: usize, lamp: usize) -> f64 {
        self.r_max - self.r_sep * spiral as f64 - lamp as f64
    }

    /// Innermost radius used by any spiral, for sizing plot spokes.
    pub fn r_min(&self) -> f64 {
        self.r_max - self.r_sep * self.count as f64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lamp<'a> {
    pub record: &'a PlacementRecord,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spiral<'a> {
    /// Zero-based spiral number.
    pub index: usize,
    pub lamps: Vec<Lamp<'a>>,
}

impl Spiral<'_> {
    pub fn first_sequence(&self) -> Option<u32> {
        self.lamps.first().map(|l| l.record.sequence())
    }
}

/// Slice `placements` into consecutive runs of `layout.lamps`. The last run
/// may be short; records past `layout.count` spirals are left out.
pub fn group_spirals<'a>(placements: &'a Placements, layout: &SpiralLayout) -> Vec<Spiral<'a>> {
    if layout.lamps == 0 {
        return Vec::new();
    }

    let spirals: Vec<_> = placements
        .as_slice()
        .chunks(layout.lamps)
        .take(layout.count)
        .enumerate()
        .map(|(index, chunk)| Spiral {
            index,
            lamps: chunk
                .iter()
                .enumerate()
                .map(|(lamp, record)| Lamp {
                    record,
                    radius: layout.radius(index, lamp),
                })
                .collect(),
        })
        .collect();

    let grouped: usize = spirals.iter().map(|s| s.lamps.len()).sum();
    if grouped < placements.len() {
        warn!(
            "{} of {} LEDs do not fit in {} spirals of {}",
            placements.len() - grouped,
            placements.len(),
            layout.count,
            layout.lamps
        );
    }

    spirals
}
