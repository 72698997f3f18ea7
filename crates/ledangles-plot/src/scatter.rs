//! Rotation angle against LED number.

use ledangles_core::Spiral;
use svg::node::element::{Polygon, Polyline};
use svg::Document;

use crate::frame::{label, points, Frame, Range};
use crate::palette::{spiral_color, TRACE_OPACITY};

pub const WIDTH: f64 = 800.0;
pub const HEIGHT: f64 = 500.0;
const MARGIN: f64 = 60.0;

/// Reference angles drawn as horizontal grid lines.
pub const ANGLE_TICKS: [f64; 5] = [-90.0, 0.0, 90.0, 180.0, 270.0];

/// Half-height of the diamond marker, in pixels.
const MARKER: f64 = 7.0;

pub fn render(spirals: &[Spiral]) -> Document {
    let lamps = || spirals.iter().flat_map(|s| s.lamps.iter());

    let x = Range::of(lamps().map(|l| l.record.sequence() as f64), 1.0)
        .unwrap_or(Range::new(0.0, 1.0));
    let y = Range::of(
        lamps()
            .map(|l| l.record.rotation())
            .chain([ANGLE_TICKS[0], ANGLE_TICKS[ANGLE_TICKS.len() - 1]]),
        30.0,
    )
    .unwrap_or(Range::new(-120.0, 300.0));

    let frame = Frame {
        width: WIDTH,
        height: HEIGHT,
        margin: MARGIN,
        x,
        y,
        y_down: false,
    };

    let mut document = frame.document();

    for angle in ANGLE_TICKS {
        document = document
            .add(frame.hgrid(angle))
            .add(label(
                MARGIN - 6.0,
                frame.py(angle) + 4.0,
                &format!("{angle}"),
                "end",
            ));
    }

    for spiral in spirals {
        let Some(first) = spiral.first_sequence() else {
            continue;
        };
        let first = first as f64;
        let tick = label(
            frame.px(first) + 3.0,
            HEIGHT - MARGIN + 16.0,
            &format!("#{}", spiral.index + 1),
            "start",
        )
        .set("font-style", "italic");
        document = document.add(frame.vgrid(first)).add(tick);
    }

    for spiral in spirals {
        let color = spiral_color(spiral.index);
        let trace: Vec<_> = spiral
            .lamps
            .iter()
            .map(|l| frame.point(l.record.sequence() as f64, l.record.rotation()))
            .collect();

        document = document.add(
            Polyline::new()
                .set("points", points(trace.iter().copied()))
                .set("fill", "none")
                .set("stroke", color)
                .set("stroke-width", 2.0)
                .set("stroke-opacity", TRACE_OPACITY),
        );

        for (lamp, (cx, cy)) in spiral.lamps.iter().zip(trace) {
            document = document.add(diamond(cx, cy, lamp.record.rotation(), color));
        }
    }

    for caption in frame.captions("LED Spiral", "LED Rotation Angle (degs)") {
        document = document.add(caption);
    }

    document.add(frame.border())
}

/// Thin diamond turned to the LED's rotation, so the marker itself shows
/// which way the part points.
fn diamond(cx: f64, cy: f64, rotation: f64, color: &str) -> Polygon {
    let w = MARKER * 0.6;
    Polygon::new()
        .set(
            "points",
            points([
                (cx, cy - MARKER),
                (cx + w, cy),
                (cx, cy + MARKER),
                (cx - w, cy),
            ]),
        )
        .set("fill", color)
        // SVG rotates clockwise, angles are counter-clockwise
        .set("transform", format!("rotate({:.2} {cx:.2} {cy:.2})", -rotation))
}
