use thiserror::Error;

use crate::normalize::Axis;
use crate::types::LandmarkLabel;

/// Which argument of a pairwise comparison an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Landmark count mismatch: {left} vs {right} labels")]
    LabelCountMismatch { left: usize, right: usize },

    #[error("No landmark labels shared by both sets")]
    NoOverlappingLabels,

    #[error("Key landmark {label} missing from {side} set")]
    MissingKeyLandmark { label: LandmarkLabel, side: Side },

    #[error("All landmarks share the same {axis} coordinate")]
    DegenerateAxisRange { axis: Axis },

    #[error("Non-finite coordinate for landmark {label}")]
    NonFiniteCoordinate { label: LandmarkLabel },

    #[error("Unknown landmark label: {0}")]
    UnknownLabel(String),

    #[error("Invalid scoring config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
