use std::fmt;

use voxtac_core::GridCoord;

/// Errors reported by [`GridPathfinder`](crate::GridPathfinder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The walkability mask does not match the grid footprint.
    MaskSizeMismatch { expected: usize, actual: usize },
    /// A coordinate outside the grid was queried.
    OutOfBounds(GridCoord),
    /// The distance field did not settle within the configured step cap.
    DistanceBudgetExceeded { max_distance: i32 },
    /// A query that needs an origin was made before one was set.
    NoOrigin,
    /// Path reconstruction found no predecessor one step closer to the
    /// origin. The distance field is corrupt.
    InconsistentState { at: GridCoord },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaskSizeMismatch { expected, actual } => write!(
                f,
                "walkability mask has {actual} entries, grid needs {expected}"
            ),
            Self::OutOfBounds(p) => write!(f, "grid coordinate {p} is out of bounds"),
            Self::DistanceBudgetExceeded { max_distance } => write!(
                f,
                "distance field still growing at the {max_distance}-step cap"
            ),
            Self::NoOrigin => write!(f, "no origin has been set"),
            Self::InconsistentState { at } => {
                write!(f, "no predecessor found while walking back from {at}")
            }
        }
    }
}

impl std::error::Error for PathError {}
