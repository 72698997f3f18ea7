//! Data-to-canvas mapping shared by the cartesian plots.

use svg::node::element::{Line, Rectangle, Text};
use svg::Document;

use crate::palette::{BACKGROUND, FOREGROUND, GRID_OPACITY};

/// A closed interval of data values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    /// Bounds of `values` widened by `pad` on each side. Empty or
    /// single-valued input still yields a usable span.
    pub fn of(values: impl IntoIterator<Item = f64>, pad: f64) -> Option<Self> {
        let (min, max) = values
            .into_iter()
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })?;
        Some(Self::new(min - pad, max + pad))
    }

    pub fn new(min: f64, max: f64) -> Self {
        if max - min < f64::EPSILON {
            Self {
                min: min - 1.0,
                max: max + 1.0,
            }
        } else {
            Self { min, max }
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Multiples of `step` that fall inside the range.
    pub fn ticks(&self, step: f64) -> Vec<f64> {
        if step <= 0.0 {
            return Vec::new();
        }
        let first = (self.min / step).ceil() as i64;
        let last = (self.max / step).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    }
}

/// Plot area inside a fixed canvas.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    pub x: Range,
    pub y: Range,
    /// Board coordinates grow downward like SVG; charts grow upward.
    pub y_down: bool,
}

impl Frame {
    pub fn px(&self, x: f64) -> f64 {
        self.margin + (x - self.x.min) / self.x.span() * (self.width - 2.0 * self.margin)
    }

    pub fn py(&self, y: f64) -> f64 {
        let t = (y - self.y.min) / self.y.span();
        let h = self.height - 2.0 * self.margin;
        if self.y_down {
            self.margin + t * h
        } else {
            self.height - self.margin - t * h
        }
    }

    pub fn point(&self, x: f64, y: f64) -> (f64, f64) {
        (self.px(x), self.py(y))
    }

    /// Blank canvas with the dark background.
    pub fn document(&self) -> Document {
        canvas(self.width, self.height)
    }

    pub fn border(&self) -> Rectangle {
        Rectangle::new()
            .set("x", self.margin)
            .set("y", self.margin)
            .set("width", self.width - 2.0 * self.margin)
            .set("height", self.height - 2.0 * self.margin)
            .set("fill", "none")
            .set("stroke", FOREGROUND)
            .set("stroke-width", 1.0)
    }

    pub fn hgrid(&self, y: f64) -> Line {
        grid_line(
            (self.margin, self.py(y)),
            (self.width - self.margin, self.py(y)),
        )
    }

    pub fn vgrid(&self, x: f64) -> Line {
        grid_line(
            (self.px(x), self.margin),
            (self.px(x), self.height - self.margin),
        )
    }

    /// Axis captions centered below and left of the plot area.
    pub fn captions(&self, x_caption: &str, y_caption: &str) -> [Text; 2] {
        let cx = self.width / 2.0;
        let cy = self.height / 2.0;
        [
            label(cx, self.height - self.margin / 4.0, x_caption, "middle"),
            label(self.margin / 3.0, cy, y_caption, "middle")
                .set("transform", format!("rotate(-90 {:.2} {cy:.2})", self.margin / 3.0)),
        ]
    }
}

pub fn canvas(width: f64, height: f64) -> Document {
    Document::new()
        .set("width", width)
        .set("height", height)
        .set("viewBox", (0, 0, width as u32, height as u32))
        .add(
            Rectangle::new()
                .set("width", "100%")
                .set("height", "100%")
                .set("fill", BACKGROUND),
        )
}

fn grid_line(from: (f64, f64), to: (f64, f64)) -> Line {
    Line::new()
        .set("x1", from.0)
        .set("y1", from.1)
        .set("x2", to.0)
        .set("y2", to.1)
        .set("stroke", FOREGROUND)
        .set("stroke-width", 1.0)
        .set("stroke-opacity", GRID_OPACITY)
}

pub fn label(x: f64, y: f64, text: &str, anchor: &str) -> Text {
    Text::new()
        .set("x", x)
        .set("y", y)
        .set("fill", FOREGROUND)
        .set("font-size", "12px")
        .set("font-family", "sans-serif")
        .set("text-anchor", anchor)
        .add(svg::node::Text::new(text))
}

/// `x,y x,y ...` for `points` attributes.
pub fn points(pts: impl IntoIterator<Item = (f64, f64)>) -> String {
    pts.into_iter()
        .map(|(x, y)| format!("{x:.2},{y:.2}"))
        .collect::<Vec<_>>()
        .join(" ")
}
