//! Each LED at its rotation angle, one radius band per spiral.

use std::f64::consts::PI;

use ledangles_core::{Spiral, SpiralLayout};
use svg::node::element::{Circle, Line, Polyline};
use svg::Document;

use crate::frame::{canvas, points};
use crate::palette::{spiral_color, FOREGROUND, TRACE_OPACITY};

pub const SIZE: f64 = 500.0;
const MARGIN: f64 = 20.0;

/// Interpolation steps between neighbouring lamps. A straight SVG segment
/// would cut across the circle, so the trace is sampled in (theta, r).
pub const SEGMENT_STEPS: usize = 50;

/// Spokes at the angles a conventionally placed part would sit at.
pub const SPOKES_DEG: [f64; 4] = [0.0, 90.0, 180.0, 270.0];

struct Polar {
    center: f64,
    scale: f64,
}

impl Polar {
    fn new(layout: &SpiralLayout) -> Self {
        let outer = (layout.r_max + layout.r_sep).max(1.0);
        Self {
            center: SIZE / 2.0,
            scale: (SIZE / 2.0 - MARGIN) / outer,
        }
    }

    fn point(&self, theta: f64, r: f64) -> (f64, f64) {
        (
            self.center + r * self.scale * theta.cos(),
            self.center - r * self.scale * theta.sin(),
        )
    }
}

pub fn render(spirals: &[Spiral], layout: &SpiralLayout) -> Document {
    let polar = Polar::new(layout);
    let mut document = canvas(SIZE, SIZE);

    let inner = layout.r_min().max(0.0);
    let outer = layout.r_max + layout.r_sep;
    for deg in SPOKES_DEG {
        let theta = deg * PI / 180.0;
        let (x1, y1) = polar.point(theta, inner);
        let (x2, y2) = polar.point(theta, outer);
        document = document.add(
            Line::new()
                .set("x1", x1)
                .set("y1", y1)
                .set("x2", x2)
                .set("y2", y2)
                .set("stroke", FOREGROUND)
                .set("stroke-width", 1.5),
        );
    }

    for spiral in spirals {
        let color = spiral_color(spiral.index);

        if spiral.lamps.len() > 1 {
            let trace = spiral.lamps.windows(2).flat_map(|pair| {
                let (t0, r0) = (pair[0].record.theta(), pair[0].radius);
                let (t1, r1) = (pair[1].record.theta(), pair[1].radius);
                (0..SEGMENT_STEPS).map(move |i| {
                    let f = i as f64 / (SEGMENT_STEPS - 1) as f64;
                    (t0 + (t1 - t0) * f, r0 + (r1 - r0) * f)
                })
            });
            document = document.add(
                Polyline::new()
                    .set("points", points(trace.map(|(t, r)| polar.point(t, r))))
                    .set("fill", "none")
                    .set("stroke", color)
                    .set("stroke-width", 2.0)
                    .set("stroke-opacity", TRACE_OPACITY),
            );
        }

        for lamp in &spiral.lamps {
            let (cx, cy) = polar.point(lamp.record.theta(), lamp.radius);
            document = document.add(
                Circle::new()
                    .set("cx", cx)
                    .set("cy", cy)
                    .set("r", 4.0)
                    .set("fill", color),
            );
        }
    }

    document
}
