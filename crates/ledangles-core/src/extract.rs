//! Record extraction from `grep`-style dumps of board fragments.
//!
//! The input is a loose sequence of lines grouped into blocks by `--`
//! separators, as produced by `grep -A` over a `.kicad_pcb` file:
//!
//! ```text
//!         (at 1.605281 -1.193121 79)
//!         (property "Reference" "LED26"
//! --
//! ```
//!
//! A three-state scanner walks the lines. It looks for a position line, then
//! a reference line directly after it, then the block terminator. Only blocks
//! that complete all three steps produce a [`PlacementRecord`].

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info, trace, warn};
use thiserror::Error;

use crate::record::{Designator, DesignatorError, PlacementRecord, Placements, Position};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("line {line}: malformed designator '{designator}': {source}")]
    Format {
        designator: String,
        line: usize,
        #[source]
        source: DesignatorError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where the scanner is within the current block, along with whatever it
/// has collected so far.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ScanState {
    #[default]
    SeekPosition,
    SeekReference {
        position: Position,
        rotation: f64,
    },
    SeekTerminator {
        position: Position,
        rotation: f64,
        designator: Designator,
    },
}

/// Split a line into tokens, trimming parentheses and quotes from each one.
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace()
        .map(|token| token.trim_matches(|c: char| matches!(c, ' ' | '(' | ')' | '"')))
        .collect()
}

/// Advance the scanner by one tokenized line.
///
/// Returns the next state and, when the line terminated a complete block,
/// the finished record. `line` is the 1-based source line number, used only
/// for error reporting.
pub fn step(
    state: ScanState,
    tokens: &[&str],
    line: usize,
) -> Result<(ScanState, Option<PlacementRecord>), ExtractError> {
    let next = match state {
        ScanState::SeekPosition => match parse_at(tokens) {
            Some((position, rotation)) => ScanState::SeekReference { position, rotation },
            None => ScanState::SeekPosition,
        },

        ScanState::SeekReference { position, rotation } => match tokens {
            ["property", "Reference", text, ..] => {
                let designator =
                    Designator::parse(text).map_err(|source| ExtractError::Format {
                        designator: text.to_string(),
                        line,
                        source,
                    })?;
                ScanState::SeekTerminator {
                    position,
                    rotation,
                    designator,
                }
            }
            _ => {
                debug!("line {line}: no reference after position, discarding partial block");
                ScanState::SeekPosition
            }
        },

        ScanState::SeekTerminator {
            position,
            rotation,
            designator,
        } => match tokens {
            ["--", ..] => {
                let record = PlacementRecord::new(designator, position, rotation);
                return Ok((ScanState::SeekPosition, Some(record)));
            }
            _ => ScanState::SeekTerminator {
                position,
                rotation,
                designator,
            },
        },
    };

    Ok((next, None))
}

/// Match `at X Y ANGLE`. Lines that are too short or carry non-numeric
/// values simply don't match.
fn parse_at(tokens: &[&str]) -> Option<(Position, f64)> {
    let ["at", x, y, angle, ..] = tokens else {
        return None;
    };
    match (x.parse::<f64>(), y.parse::<f64>(), angle.parse::<f64>()) {
        (Ok(x), Ok(y), Ok(angle)) => Some((Position::new(x, y), angle)),
        _ => {
            debug!("ignoring position line with non-numeric fields: {tokens:?}");
            None
        }
    }
}

/// Incremental front end over [`step`] for callers that feed lines one at a
/// time.
#[derive(Debug, Default)]
pub struct Extractor {
    state: ScanState,
    line: usize,
    records: Vec<PlacementRecord>,
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// Number of lines consumed so far.
    pub fn lines_read(&self) -> usize {
        self.line
    }

    pub fn push_line(&mut self, text: &str) -> Result<(), ExtractError> {
        self.line += 1;
        let tokens = tokenize(text);
        let state = std::mem::take(&mut self.state);
        let (next, record) = step(state, &tokens, self.line)?;

        trace!("line {}: {:?} -> {:?}", self.line, tokens, next);
        if let Some(record) = record {
            self.records.push(record);
        }
        self.state = next;
        Ok(())
    }

    /// Finish scanning and return the records in sequence order. A block cut
    /// off by end of input is dropped.
    pub fn finish(self) -> Placements {
        if self.state != ScanState::SeekPosition {
            warn!(
                "input ended mid-block after line {}, dropping incomplete record",
                self.line
            );
        }
        Placements::from_unsorted(self.records)
    }
}

pub fn extract_lines<I, S>(lines: I) -> Result<Placements, ExtractError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut extractor = Extractor::new();
    for line in lines {
        extractor.push_line(line.as_ref())?;
    }
    Ok(extractor.finish())
}

pub fn extract_str(input: &str) -> Result<Placements, ExtractError> {
    extract_lines(input.lines())
}

pub fn extract_reader<R: BufRead>(reader: R) -> Result<Placements, ExtractError> {
    let mut extractor = Extractor::new();
    for line in reader.lines() {
        extractor.push_line(&line?)?;
    }
    Ok(extractor.finish())
}

pub fn extract_file(path: &Path) -> Result<Placements, ExtractError> {
    debug!("Extracting placements from {}", path.display());
    let file = File::open(path)?;
    let placements = extract_reader(BufReader::new(file))?;
    info!(
        "Extracted {} placements from {}",
        placements.len(),
        path.display()
    );
    Ok(placements)
}
