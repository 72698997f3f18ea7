//! Rotation angle normalization.
//!
//! KiCad stores whatever angle the footprint was rotated to, so two LEDs
//! pointing the same way can read `-90` and `270`. These policies fold the raw
//! values into a range that plots as a smooth curve.

use serde::{Deserialize, Serialize};

use crate::record::Placements;

/// How to fold raw rotation angles.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Normalization {
    /// Keep the angle as read.
    #[default]
    Raw,
    /// Fold once into (-180, 180].
    Wrap,
    /// Add a full turn to angles below `threshold` on LEDs numbered below
    /// `below_sequence`. Matches how the first spirals were laid out.
    Split { below_sequence: u32, threshold: f64 },
}

/// Parameters for [`Normalization::Split`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SplitParams {
    pub below_sequence: u32,
    pub threshold: f64,
}

impl Default for SplitParams {
    fn default() -> Self {
        Self {
            below_sequence: 30,
            threshold: -50.0,
        }
    }
}

impl From<SplitParams> for Normalization {
    fn from(params: SplitParams) -> Self {
        Normalization::Split {
            below_sequence: params.below_sequence,
            threshold: params.threshold,
        }
    }
}

impl Normalization {
    pub fn normalize(&self, sequence: u32, angle: f64) -> f64 {
        match *self {
            Normalization::Raw => angle,
            Normalization::Wrap => {
                if angle < -180.0 {
                    angle + 360.0
                } else if angle > 180.0 {
                    angle - 360.0
                } else {
                    angle
                }
            }
            Normalization::Split {
                below_sequence,
                threshold,
            } => {
                if sequence < below_sequence && angle < threshold {
                    angle + 360.0
                } else {
                    angle
                }
            }
        }
    }

    /// A new collection with every rotation normalized.
    pub fn apply(&self, placements: &Placements) -> Placements {
        if *self == Normalization::Raw {
            return placements.clone();
        }
        placements.map(|r| r.with_rotation(self.normalize(r.sequence(), r.rotation())))
    }
}
