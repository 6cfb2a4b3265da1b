use voxtac_core::{GridCoord, Range};

use crate::error::PathError;

/// Sentinel distance for cells the last distance field did not reach.
pub const UNREACHED: i32 = -1;

/// A walkability cell with its distance from the current origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCell {
    pub coord: GridCoord,
    pub walkable: bool,
    /// Shortest 4-connected step count from the origin, or [`UNREACHED`].
    pub distance: i32,
}

impl GridCell {
    /// Whether the last distance field reached this cell.
    #[inline]
    pub fn is_reached(&self) -> bool {
        self.distance >= 0
    }
}

/// Tuning for [`GridPathfinder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathConfig {
    /// Step cap for the distance field. A field still growing at
    /// `max_distance - 1` steps is rejected.
    pub max_distance: i32,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self { max_distance: 150 }
    }
}

/// Outcome of [`GridPathfinder::set_origin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginStatus {
    /// The origin moved and the distance field was rebuilt.
    Set,
    /// The coordinate already was the origin; nothing was recomputed.
    Unchanged,
    /// The coordinate is not walkable. The previous origin and distance
    /// field are kept.
    Rejected,
}

/// Breadth-first distance field over a fixed walkability mask.
///
/// The mask is immutable for the lifetime of the pathfinder. Moving the
/// origin rebuilds every distance; queries never mutate state.
#[derive(Debug, Clone)]
pub struct GridPathfinder {
    pub(crate) rng: Range,
    pub(crate) cells: Vec<GridCell>,
    pub(crate) origin: Option<GridCoord>,
    pub(crate) config: PathConfig,
    // reused distance buffer for rebuilding the field
    pub(crate) scratch: Vec<i32>,
}

impl GridPathfinder {
    /// Create a pathfinder over `rng` from a row-major walkability mask.
    ///
    /// `mask.len()` must equal `rng.len()`.
    pub fn new(rng: Range, mask: Vec<bool>) -> Result<Self, PathError> {
        if mask.len() != rng.len() {
            return Err(PathError::MaskSizeMismatch {
                expected: rng.len(),
                actual: mask.len(),
            });
        }
        let cells = mask
            .into_iter()
            .enumerate()
            .map(|(i, walkable)| GridCell {
                coord: rng.coord_at(i),
                walkable,
                distance: UNREACHED,
            })
            .collect();
        Ok(Self::with_cells(rng, cells))
    }

    /// Create a pathfinder by evaluating `walkable` on every cell of `rng`.
    pub fn from_fn(rng: Range, mut walkable: impl FnMut(GridCoord) -> bool) -> Self {
        let cells = rng
            .iter()
            .map(|coord| GridCell {
                coord,
                walkable: walkable(coord),
                distance: UNREACHED,
            })
            .collect();
        Self::with_cells(rng, cells)
    }

    fn with_cells(rng: Range, cells: Vec<GridCell>) -> Self {
        Self {
            rng,
            cells,
            origin: None,
            config: PathConfig::default(),
            scratch: Vec::new(),
        }
    }

    /// Replace the configuration. Takes effect on the next origin change.
    pub fn with_config(mut self, config: PathConfig) -> Self {
        self.config = config;
        self
    }

    /// The grid rectangle being used.
    #[inline]
    pub fn range(&self) -> Range {
        self.rng
    }

    /// The active configuration.
    #[inline]
    pub fn config(&self) -> PathConfig {
        self.config
    }

    /// The current origin, if one has been set.
    #[inline]
    pub fn origin(&self) -> Option<GridCoord> {
        self.origin
    }

    /// The cell at `p`, or `None` outside the grid.
    pub fn cell(&self, p: GridCoord) -> Option<&GridCell> {
        self.rng.index_of(p).map(|i| &self.cells[i])
    }

    /// Whether `p` is inside the grid and walkable.
    pub fn is_walkable(&self, p: GridCoord) -> bool {
        self.cell(p).is_some_and(|c| c.walkable)
    }

    /// Distance of `p` from the origin ([`UNREACHED`] if not reached), or
    /// `None` outside the grid.
    pub fn distance_at(&self, p: GridCoord) -> Option<i32> {
        self.cell(p).map(|c| c.distance)
    }

    /// Every cell with `0 <= distance <= max_distance`, in row-major order.
    ///
    /// `None` means no upper bound. The returned cells are copies.
    pub fn reachable_cells(&self, max_distance: Option<i32>) -> Result<Vec<GridCell>, PathError> {
        if self.origin.is_none() {
            return Err(PathError::NoOrigin);
        }
        let limit = max_distance.unwrap_or(i32::MAX);
        Ok(self
            .cells
            .iter()
            .filter(|c| c.distance >= 0 && c.distance <= limit)
            .copied()
            .collect())
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn reached_cells_round_trip() {
        let mut pf = GridPathfinder::from_fn(Range::with_size(3, 1), |p| p.x != 2);
        pf.set_origin(GridCoord::new(0, 0)).unwrap();
        let cells = pf.reachable_cells(None).unwrap();
        let json = serde_json::to_string(&cells).unwrap();
        let back: Vec<GridCell> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cells);
        assert_eq!(back[1].distance, 1);
    }

    #[test]
    fn config_round_trip() {
        let config = PathConfig { max_distance: 40 };
        let json = serde_json::to_string(&config).unwrap();
        let back: PathConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
