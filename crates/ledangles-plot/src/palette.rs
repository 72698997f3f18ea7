//! Colors used by every plot.

/// Canvas background.
pub const BACKGROUND: &str = "#1a1a1a";
/// Axes, grid and text.
pub const FOREGROUND: &str = "#f3bf10";
pub const GRID_OPACITY: f64 = 0.35;
/// Opacity of the lines joining lamps of one spiral.
pub const TRACE_OPACITY: f64 = 0.35;

/// Tableau colors, one per spiral.
pub const SPIRAL_COLORS: [&str; 10] = [
    "#7f7f7f", // gray
    "#8c564b", // brown
    "#ff7f0e", // orange
    "#bcbd22", // olive
    "#2ca02c", // green
    "#17becf", // cyan
    "#1f77b4", // blue
    "#9467bd", // purple
    "#e377c2", // pink
    "#d62728", // red
];

pub fn spiral_color(index: usize) -> &'static str {
    SPIRAL_COLORS[index % SPIRAL_COLORS.len()]
}
