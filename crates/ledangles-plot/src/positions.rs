//! LED positions on the board, colored by spiral.

use ledangles_core::Spiral;
use svg::node::element::Circle;
use svg::Document;

use crate::frame::{Frame, Range};
use crate::palette::spiral_color;

pub const SIZE: f64 = 500.0;
const MARGIN: f64 = 40.0;

/// Grid pitch in board units (mm).
pub const GRID_STEP: f64 = 5.0;

pub fn render(spirals: &[Spiral]) -> Document {
    let positions: Vec<_> = spirals
        .iter()
        .flat_map(|s| s.lamps.iter().map(move |l| (s.index, l.record.position())))
        .collect();

    let x = Range::of(positions.iter().map(|(_, p)| p.x), GRID_STEP / 2.0);
    let y = Range::of(positions.iter().map(|(_, p)| p.y), GRID_STEP / 2.0);
    let (x, y) = match (x, y) {
        (Some(x), Some(y)) => square(x, y),
        _ => (Range::new(0.0, GRID_STEP), Range::new(0.0, GRID_STEP)),
    };

    let frame = Frame {
        width: SIZE,
        height: SIZE,
        margin: MARGIN,
        x,
        y,
        y_down: true,
    };

    let mut document = frame.document();
    for gx in x.ticks(GRID_STEP) {
        document = document.add(frame.vgrid(gx));
    }
    for gy in y.ticks(GRID_STEP) {
        document = document.add(frame.hgrid(gy));
    }

    for (index, position) in positions {
        let (cx, cy) = frame.point(position.x, position.y);
        document = document.add(
            Circle::new()
                .set("cx", cx)
                .set("cy", cy)
                .set("r", 5.0)
                .set("fill", spiral_color(index)),
        );
    }

    for caption in frame.captions("LED Position, X", "LED Position, Y") {
        document = document.add(caption);
    }

    document.add(frame.border())
}

/// Grow the shorter range so both axes share one scale.
fn square(x: Range, y: Range) -> (Range, Range) {
    let span = x.span().max(y.span());
    let grow = |r: Range| {
        let extra = (span - r.span()) / 2.0;
        Range::new(r.min - extra, r.max + extra)
    };
    (grow(x), grow(y))
}
