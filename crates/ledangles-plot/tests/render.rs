use anyhow::Result;
use ledangles_core::{
    group_spirals, Designator, PlacementRecord, Placements, Position, SpiralLayout,
};
use ledangles_plot::{polar, render, save, PlotKind};

fn board(count: u32) -> Placements {
    Placements::from_unsorted(
        (0..count)
            .map(|i| {
                let angle = f64::from(i) * 35.0 - 90.0;
                PlacementRecord::new(
                    Designator::parse(&format!("LED{i}")).unwrap(),
                    Position::new(120.0 + f64::from(i % 7) * 5.0, 60.0 + f64::from(i / 7) * 5.0),
                    angle,
                )
            })
            .collect(),
    )
}

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

#[test]
fn scatter_has_marker_per_led_and_trace_per_spiral() {
    let placements = board(14);
    let layout = SpiralLayout::default();
    let spirals = group_spirals(&placements, &layout);

    let svg = render(PlotKind::Scatter, &spirals, &layout).to_string();
    assert_eq!(count(&svg, "<polygon"), 14);
    assert_eq!(count(&svg, "<polyline"), 2);
    assert_eq!(count(&svg, "font-style=\"italic\""), 2);
    assert!(svg.contains("LED Rotation Angle (degs)"));
    assert!(svg.contains("#1a1a1a"));
}

#[test]
fn polar_has_spokes_markers_and_curved_traces() {
    let placements = board(9);
    let layout = SpiralLayout::default();
    let spirals = group_spirals(&placements, &layout);

    let svg = render(PlotKind::Polar, &spirals, &layout).to_string();
    assert_eq!(count(&svg, "<line"), polar::SPOKES_DEG.len());
    assert_eq!(count(&svg, "<circle"), 9);
    // the second spiral has two lamps, so both spirals get a trace
    assert_eq!(count(&svg, "<polyline"), 2);
}

#[test]
fn polar_skips_trace_for_single_lamp() {
    let placements = board(8);
    let layout = SpiralLayout::default();
    let spirals = group_spirals(&placements, &layout);

    let svg = render(PlotKind::Polar, &spirals, &layout).to_string();
    assert_eq!(count(&svg, "<polyline"), 1);
}

#[test]
fn positions_has_one_dot_per_led() {
    let placements = board(21);
    let layout = SpiralLayout::default();
    let spirals = group_spirals(&placements, &layout);

    let svg = render(PlotKind::Positions, &spirals, &layout).to_string();
    assert_eq!(count(&svg, "<circle"), 21);
    assert!(svg.contains("LED Position, X"));
}

#[test]
fn empty_input_still_renders() {
    let layout = SpiralLayout::default();
    for kind in [PlotKind::Scatter, PlotKind::Polar, PlotKind::Positions] {
        let svg = render(kind, &[], &layout).to_string();
        assert!(svg.contains("<svg"), "{kind} plot should render");
    }
}

#[test]
fn save_writes_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("angles.svg");
    let placements = board(7);
    let layout = SpiralLayout::default();
    let spirals = group_spirals(&placements, &layout);

    save(&render(PlotKind::Scatter, &spirals, &layout), &path)?;
    let contents = std::fs::read_to_string(&path)?;
    assert!(contents.contains("<svg"));
    assert_eq!(count(&contents, "<polygon"), 7);
    Ok(())
}

#[test]
fn save_to_missing_dir_fails_with_context() {
    let document = render(PlotKind::Scatter, &[], &SpiralLayout::default());
    let err = save(&document, std::path::Path::new("/nonexistent/dir/out.svg")).unwrap_err();
    assert!(err.to_string().starts_with("Failed to save SVG to /nonexistent/dir/out.svg"));
}
