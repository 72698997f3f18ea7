//! Placement records and the ordered collection handed to reporting code.

use std::fmt;
use std::ops::Index;

use thiserror::Error;

/// Why a designator string could not be split into prefix and sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DesignatorError {
    #[error("no trailing sequence number")]
    MissingSequence,

    #[error("sequence number out of range")]
    SequenceOutOfRange,
}

/// A reference designator such as `LED26`, split into its class prefix (`LED`)
/// and numeric sequence (`26`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Designator {
    text: String,
    prefix_len: usize,
    sequence: u32,
}

impl Designator {
    pub fn parse(text: &str) -> Result<Self, DesignatorError> {
        let prefix = text.trim_end_matches(|c: char| c.is_ascii_digit());
        let digits = &text[prefix.len()..];
        if digits.is_empty() {
            return Err(DesignatorError::MissingSequence);
        }
        let sequence = digits
            .parse::<u32>()
            .map_err(|_| DesignatorError::SequenceOutOfRange)?;

        Ok(Self {
            text: text.to_string(),
            prefix_len: prefix.len(),
            sequence,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn prefix(&self) -> &str {
        &self.text[..self.prefix_len]
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }
}

impl fmt::Display for Designator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Board coordinates of a footprint origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One placed component: where it sits and how far it is rotated.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementRecord {
    designator: Designator,
    position: Position,
    rotation: f64,
    valid: bool,
}

impl PlacementRecord {
    /// Build a finalized record. Only called once position, rotation and
    /// designator have all been matched.
    pub fn new(designator: Designator, position: Position, rotation: f64) -> Self {
        Self {
            designator,
            position,
            rotation,
            valid: true,
        }
    }

    pub fn designator(&self) -> &Designator {
        &self.designator
    }

    pub fn prefix(&self) -> &str {
        self.designator.prefix()
    }

    pub fn sequence(&self) -> u32 {
        self.designator.sequence()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Rotation in degrees, as read from the source.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Rotation in radians.
    pub fn theta(&self) -> f64 {
        self.rotation.to_radians()
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// A copy of this record with a different rotation.
    pub fn with_rotation(&self, rotation: f64) -> Self {
        Self {
            rotation,
            ..self.clone()
        }
    }
}

impl fmt::Display for PlacementRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:02} [ {:8.3}, {:8.3} ] {:>8.1}",
            self.prefix(),
            self.sequence(),
            self.position.x,
            self.position.y,
            self.rotation
        )
    }
}

/// Records ordered by ascending sequence number.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Placements {
    records: Vec<PlacementRecord>,
}

impl Placements {
    /// Sort `records` by sequence. The sort is stable, so duplicates keep
    /// their input order, but callers should not depend on that.
    pub fn from_unsorted(mut records: Vec<PlacementRecord>) -> Self {
        records.sort_by_key(PlacementRecord::sequence);
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PlacementRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlacementRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[PlacementRecord] {
        &self.records
    }

    pub fn designators(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.designator().as_str())
    }

    /// Records for which `keep` holds, order unchanged.
    pub fn retain(&self, mut keep: impl FnMut(&PlacementRecord) -> bool) -> Self {
        Self {
            records: self.records.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// Apply `f` to every record, keeping sequence order.
    pub fn map(&self, f: impl FnMut(&PlacementRecord) -> PlacementRecord) -> Self {
        Self::from_unsorted(self.records.iter().map(f).collect())
    }
}

impl Index<usize> for Placements {
    type Output = PlacementRecord;

    fn index(&self, index: usize) -> &Self::Output {
        &self.records[index]
    }
}

impl<'a> IntoIterator for &'a Placements {
    type Item = &'a PlacementRecord;
    type IntoIter = std::slice::Iter<'a, PlacementRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl fmt::Display for Placements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, record) in self.records.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{record}")?;
        }
        Ok(())
    }
}
