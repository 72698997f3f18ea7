//! Placement records read straight from a `.kicad_pcb` board file.

use std::path::Path;

use ledangles_sexpr::{find_all_child_lists, find_child_list, Sexpr, Span};
use log::{debug, info};
use thiserror::Error;

use crate::record::{Designator, DesignatorError, PlacementRecord, Placements, Position};

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: ledangles_sexpr::ParseError,
    },

    #[error("expected a (kicad_pcb ...) board, found {0}")]
    NotABoard(String),

    #[error("line {line}: malformed designator '{designator}': {source}")]
    Format {
        designator: String,
        line: usize,
        #[source]
        source: DesignatorError,
    },
}

/// Which footprints to keep.
#[derive(Debug, Clone, PartialEq)]
pub struct PartFilter {
    pub prefix: String,
    pub exclude: Vec<String>,
}

impl Default for PartFilter {
    fn default() -> Self {
        Self {
            prefix: "LED".to_string(),
            // LED57 is a status LED outside the spirals
            exclude: vec!["LED57".to_string()],
        }
    }
}

impl PartFilter {
    pub fn accepts(&self, designator: &str) -> bool {
        designator.starts_with(&self.prefix) && !self.exclude.iter().any(|e| e == designator)
    }

    /// Drop records from another source (such as a grep dump) that the
    /// filter would not have loaded.
    pub fn apply(&self, placements: &Placements) -> Placements {
        placements.retain(|r| self.accepts(r.designator().as_str()))
    }
}

/// The bits of a footprint needed to place it.
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    pub reference: Option<String>,
    pub position: Option<Position>,
    pub rotation: f64,
    pub span: Span,
}

/// Collect every top-level footprint of a parsed board.
///
/// KiCad 6+ boards use `(footprint ...)`, older ones `(module ...)`. The
/// reference designator lives in `(property "Reference" ...)` from KiCad 8 on
/// and in `(fp_text reference ...)` before that.
pub fn footprints(root: &Sexpr) -> Result<Vec<Footprint>, BoardError> {
    let items = match (root.tag(), root.as_list()) {
        (Some("kicad_pcb"), Some(items)) => items,
        _ => {
            let found = root
                .tag()
                .or_else(|| root.as_atom())
                .unwrap_or("an untagged list");
            return Err(BoardError::NotABoard(found.to_string()));
        }
    };

    Ok(items
        .iter()
        .skip(1)
        .filter(|node| matches!(node.tag(), Some("footprint" | "module")))
        .filter_map(|node| node.as_list().map(|list| (node.span, list)))
        .map(|(span, list)| footprint(span, list))
        .collect())
}

fn footprint(span: Span, items: &[Sexpr]) -> Footprint {
    let (position, rotation) = match find_child_list(items, "at") {
        Some(at) => parse_at(at),
        None => (None, 0.0),
    };

    Footprint {
        reference: reference(items),
        position,
        rotation,
        span,
    }
}

fn parse_at(at: &[Sexpr]) -> (Option<Position>, f64) {
    let x = at.get(1).and_then(Sexpr::as_f64);
    let y = at.get(2).and_then(Sexpr::as_f64);
    let rotation = at.get(3).and_then(Sexpr::as_f64).unwrap_or(0.0);
    match (x, y) {
        (Some(x), Some(y)) => (Some(Position::new(x, y)), rotation),
        _ => (None, rotation),
    }
}

fn reference(items: &[Sexpr]) -> Option<String> {
    let from_property = find_all_child_lists(items, "property")
        .into_iter()
        .find(|list| list.get(1).and_then(Sexpr::as_atom) == Some("Reference"))
        .and_then(|list| list.get(2)?.as_atom());

    let from_fp_text = || {
        find_all_child_lists(items, "fp_text")
            .into_iter()
            .find(|list| list.get(1).and_then(Sexpr::as_sym) == Some("reference"))
            .and_then(|list| list.get(2)?.as_atom())
    };

    from_property.or_else(from_fp_text).map(str::to_string)
}

/// Parse board source text and return the filtered placements.
pub fn load_str(source: &str, filter: &PartFilter) -> Result<Placements, BoardError> {
    let root = ledangles_sexpr::parse(source).map_err(|source_err| BoardError::Parse {
        line: ledangles_sexpr::line_number(source, source_err.offset()),
        source: source_err,
    })?;

    let mut records = Vec::new();
    for fp in footprints(&root)? {
        let line = fp.span.line(source);
        let (Some(reference), Some(position)) = (fp.reference, fp.position) else {
            debug!("line {line}: skipping footprint without reference or position");
            continue;
        };
        if !filter.accepts(&reference) {
            continue;
        }

        let designator =
            Designator::parse(&reference).map_err(|source| BoardError::Format {
                designator: reference.clone(),
                line,
                source,
            })?;
        records.push(PlacementRecord::new(designator, position, fp.rotation));
    }

    Ok(Placements::from_unsorted(records))
}

pub fn load_file(path: &Path, filter: &PartFilter) -> Result<Placements, BoardError> {
    debug!("Loading board {}", path.display());
    let source = std::fs::read_to_string(path)?;
    let placements = load_str(&source, filter)?;
    info!(
        "Loaded {} {}* footprints from {}",
        placements.len(),
        filter.prefix,
        path.display()
    );
    Ok(placements)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOARD: &str = r#"(kicad_pcb
  (version 20240108)
  (generator "pcbnew")
  (footprint "LED_SMD:LED_0603_1608Metric"
    (layer "F.Cu")
    (at 131.5 82.25 -45)
    (property "Reference" "LED2" (at 0 -1.43 0) (layer "F.SilkS"))
    (property "Value" "LED" (at 0 1.43 0))
  )
  (footprint "Resistor_SMD:R_0402"
    (layer "F.Cu")
    (at 120 90)
    (property "Reference" "R1" (at 0 0 0))
  )
  (footprint "LED_SMD:LED_0603_1608Metric"
    (layer "F.Cu")
    (at 140.25 70.5 90)
    (property "Reference" "LED1" (at 0 0 0))
  )
  (footprint "LED_SMD:LED_0603_1608Metric"
    (at 100 100 0)
    (property "Reference" "LED57" (at 0 0 0))
  )
)"#;

    #[test]
    fn test_footprints_read_reference_and_at() {
        let root = ledangles_sexpr::parse(BOARD).unwrap();
        let fps = footprints(&root).unwrap();
        assert_eq!(fps.len(), 4);
        assert_eq!(fps[0].reference.as_deref(), Some("LED2"));
        assert_eq!(fps[0].position, Some(Position::new(131.5, 82.25)));
        assert_eq!(fps[0].rotation, -45.0);
        // the property's own (at ...) must not be mistaken for the footprint's
        assert_eq!(fps[1].position, Some(Position::new(120.0, 90.0)));
        assert_eq!(fps[1].rotation, 0.0);
        assert_eq!(fps[0].span.line(BOARD), 4);
    }

    #[test]
    fn test_load_filters_and_sorts() {
        let placements = load_str(BOARD, &PartFilter::default()).unwrap();
        let refs: Vec<_> = placements.designators().collect();
        assert_eq!(refs, vec!["LED1", "LED2"]);
        assert_eq!(placements[1].rotation(), -45.0);
    }

    #[test]
    fn test_custom_filter() {
        let filter = PartFilter {
            prefix: "R".to_string(),
            exclude: vec![],
        };
        let placements = load_str(BOARD, &filter).unwrap();
        assert_eq!(placements.designators().collect::<Vec<_>>(), vec!["R1"]);
    }

    #[test]
    fn test_legacy_fp_text_reference() {
        let board = r#"(kicad_pcb (version 20211014)
  (module "LED_SMD:LED_0603" (layer F.Cu)
    (at 10 20 180)
    (fp_text reference LED7 (at 0 -1.43) (layer F.SilkS))
    (fp_text value LED (at 0 1.43))))"#;
        let placements = load_str(board, &PartFilter::default()).unwrap();
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].designator().as_str(), "LED7");
        assert_eq!(placements[0].rotation(), 180.0);
    }

    #[test]
    fn test_reference_lookup_order() {
        let items = ledangles_sexpr::parse(
            r#"(footprint "X"
  (fp_text reference LED9)
  (property "Value" "LED5")
  (property "Reference" "LED4"))"#,
        )
        .unwrap();
        assert_eq!(reference(items.as_list().unwrap()).as_deref(), Some("LED4"));

        let items = ledangles_sexpr::parse(
            r#"(module "X" (fp_text value LED1) (fp_text reference LED9))"#,
        )
        .unwrap();
        assert_eq!(reference(items.as_list().unwrap()).as_deref(), Some("LED9"));

        let items = ledangles_sexpr::parse(r#"(footprint "X" (property "Value" "LED5"))"#).unwrap();
        assert_eq!(reference(items.as_list().unwrap()), None);
    }

    #[test]
    fn test_skips_footprints_missing_data() {
        let board = r#"(kicad_pcb
  (footprint "A" (property "Reference" "LED1"))
  (footprint "B" (at 1 2 3))
  (footprint "C" (at 1 x) (property "Reference" "LED2")))"#;
        let placements = load_str(board, &PartFilter::default()).unwrap();
        assert!(placements.is_empty());
    }

    #[test]
    fn test_bad_designator_reports_line() {
        let board = "(kicad_pcb\n  (version 1)\n  (footprint \"X\" (at 0 0 0) (property \"Reference\" \"LEDX\")))";
        match load_str(board, &PartFilter::default()) {
            Err(BoardError::Format {
                designator, line, ..
            }) => {
                assert_eq!(designator, "LEDX");
                assert_eq!(line, 3);
            }
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_non_board() {
        let err = load_str("(kicad_sch (version 1))", &PartFilter::default()).unwrap_err();
        assert!(matches!(err, BoardError::NotABoard(ref tag) if tag == "kicad_sch"));

        let err = load_str("(kicad_pcb", &PartFilter::default()).unwrap_err();
        assert!(matches!(err, BoardError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_filter_accepts() {
        let filter = PartFilter::default();
        assert!(filter.accepts("LED1"));
        assert!(!filter.accepts("LED57"));
        assert!(!filter.accepts("R1"));
    }

    #[test]
    fn test_filter_apply() {
        let placements = Placements::from_unsorted(
            ["LED57", "R3", "LED2"]
                .into_iter()
                .map(|d| {
                    PlacementRecord::new(
                        Designator::parse(d).unwrap(),
                        Position::new(0.0, 0.0),
                        0.0,
                    )
                })
                .collect(),
        );
        let kept = PartFilter::default().apply(&placements);
        assert_eq!(kept.designators().collect::<Vec<_>>(), vec!["LED2"]);
    }
}
