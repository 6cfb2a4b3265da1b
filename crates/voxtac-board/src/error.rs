use std::fmt;

use voxtac_core::{GridCoord, WorldPos};

/// Errors that can occur while building or querying a [`Board`](crate::Board).
#[derive(Debug)]
pub enum BoardError {
    /// A voxel sample fell outside the prefetched box `[min, max)`.
    OutOfBounds {
        pos: WorldPos,
        min: WorldPos,
        max: WorldPos,
    },
    /// A grid coordinate fell outside the board.
    GridOutOfBounds(GridCoord),
    /// No solid voxel within `max_delta_y` below the origin.
    UnresolvableSeed { origin: WorldPos, max_delta_y: i32 },
    /// The voxel buffer length does not match its declared dimensions.
    DataSizeMismatch { expected: usize, actual: usize },
    /// Radius and vertical tolerance must both be at least 1.
    InvalidConfig { radius: i32, max_delta_y: i32 },
    /// The voxel source failed to deliver data.
    Source(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { pos, min, max } => {
                write!(f, "voxel {pos} is outside the fetched box [{min}-{max})")
            }
            Self::GridOutOfBounds(p) => write!(f, "board square {p} is out of bounds"),
            Self::UnresolvableSeed {
                origin,
                max_delta_y,
            } => write!(
                f,
                "no floor within {max_delta_y} voxels below origin {origin}"
            ),
            Self::DataSizeMismatch { expected, actual } => {
                write!(f, "voxel buffer holds {actual} codes, box needs {expected}")
            }
            Self::InvalidConfig {
                radius,
                max_delta_y,
            } => write!(
                f,
                "invalid board config: radius {radius}, max_delta_y {max_delta_y}"
            ),
            Self::Source(e) => write!(f, "voxel source failed: {e}"),
        }
    }
}

impl std::error::Error for BoardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Source(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}
