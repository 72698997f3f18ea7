//! # ledangles-plot
//!
//! Renders grouped LED placements as SVG:
//!
//! - [`scatter`]: rotation angle against LED number, one trace per spiral
//! - [`polar`]: each LED at its angle on a radius band per spiral
//! - [`positions`]: where the LEDs sit on the board

use anyhow::{Context, Result};
use ledangles_core::{Spiral, SpiralLayout};
use log::debug;
use std::fmt;
use std::path::Path;
use svg::Document;

mod frame;
pub mod palette;
pub mod polar;
pub mod positions;
pub mod scatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlotKind {
    #[default]
    Scatter,
    Polar,
    Positions,
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlotKind::Scatter => "scatter",
            PlotKind::Polar => "polar",
            PlotKind::Positions => "positions",
        };
        f.write_str(name)
    }
}

pub fn render(kind: PlotKind, spirals: &[Spiral], layout: &SpiralLayout) -> Document {
    let lamps: usize = spirals.iter().map(|s| s.lamps.len()).sum();
    debug!(
        "Rendering {kind} plot of {lamps} LEDs in {} spirals",
        spirals.len()
    );

    match kind {
        PlotKind::Scatter => scatter::render(spirals),
        PlotKind::Polar => polar::render(spirals, layout),
        PlotKind::Positions => positions::render(spirals),
    }
}

pub fn save(document: &Document, output_path: &Path) -> Result<()> {
    svg::save(output_path, document)
        .with_context(|| format!("Failed to save SVG to {}", output_path.display()))
}
