//! # ledangles-core
//!
//! Placement records for LED footprints and the ways of getting them: the
//! line scanner for `grep` dumps of board files, and a direct board loader.
//! Also holds the post-processing shared by the reporting tools (angle
//! normalization and grouping into spiral chains).

pub mod board;
pub mod config;
pub mod extract;
pub mod normalize;
pub mod record;
pub mod spiral;

pub use board::{BoardError, PartFilter};
pub use config::{Config, ConfigError, NormalizeKind};
pub use extract::{
    extract_file, extract_lines, extract_reader, extract_str, ExtractError, Extractor, ScanState,
};
pub use normalize::Normalization;
pub use record::{Designator, DesignatorError, PlacementRecord, Placements, Position};
pub use spiral::{group_spirals, Lamp, Spiral, SpiralLayout};
