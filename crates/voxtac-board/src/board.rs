use voxtac_core::{GridCoord, Range, WorldPos};

use crate::error::BoardError;

/// Classification of a board square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SquareType {
    /// A standable floor within tolerance.
    Flat,
    /// No floor found within tolerance, or never computed.
    #[default]
    Hole,
    /// Solid material with no headroom within tolerance.
    Obstacle,
}

/// One classified column of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoardSquare {
    pub kind: SquareType,
    /// Material of the floor (or blocking) voxel. `None` for holes.
    pub material: Option<u16>,
    /// World Y of the walking surface voxel. `None` for holes.
    pub floor_y: Option<i32>,
    /// Flood-fill wave that finalized this square. The seed is wave 0.
    pub generation: u32,
}

impl BoardSquare {
    pub const HOLE: Self = Self {
        kind: SquareType::Hole,
        material: None,
        floor_y: None,
        generation: 0,
    };

    pub(crate) const fn flat(material: u16, floor_y: i32, generation: u32) -> Self {
        Self {
            kind: SquareType::Flat,
            material: Some(material),
            floor_y: Some(floor_y),
            generation,
        }
    }

    pub(crate) const fn obstacle(material: u16, y: i32, generation: u32) -> Self {
        Self {
            kind: SquareType::Obstacle,
            material: Some(material),
            floor_y: Some(y),
            generation,
        }
    }

    #[inline]
    pub fn is_walkable(&self) -> bool {
        self.kind == SquareType::Flat
    }
}

/// Board construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoardConfig {
    /// Half-extent of the board; the grid is `(2·radius+1)²`.
    pub radius: i32,
    /// Vertical search range for floors, and the exclusive bound on how far
    /// a floor may sit above or below the seed floor.
    pub max_delta_y: i32,
    /// Extra horizontal margin fetched around the board.
    pub margin: i32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            radius: 31,
            max_delta_y: 4,
            margin: 5,
        }
    }
}

impl BoardConfig {
    pub fn with_radius(mut self, radius: i32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_max_delta_y(mut self, max_delta_y: i32) -> Self {
        self.max_delta_y = max_delta_y;
        self
    }

    /// Grid side length, always odd.
    #[inline]
    pub fn side(&self) -> i32 {
        2 * self.radius + 1
    }

    /// Horizontal half-extent of the voxel box to fetch.
    #[inline]
    pub fn padding(&self) -> i32 {
        self.radius + self.margin + self.max_delta_y
    }

    /// Vertical half-extent of the voxel box to fetch.
    ///
    /// Floors stay within `max_delta_y` of a seed that is itself at most
    /// `max_delta_y` below the origin, and each probe scans `max_delta_y`
    /// further.
    #[inline]
    pub fn vertical_extent(&self) -> i32 {
        self.padding().max(4 * self.max_delta_y)
    }

    pub(crate) fn validate(&self) -> Result<(), BoardError> {
        if self.radius < 1 || self.max_delta_y < 1 || self.margin < 0 {
            return Err(BoardError::InvalidConfig {
                radius: self.radius,
                max_delta_y: self.max_delta_y,
            });
        }
        Ok(())
    }
}

/// A classified square grid of terrain columns centred on a world point.
///
/// Built once by [`compute_board`](crate::compute_board) and immutable
/// afterwards.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    pub(crate) size: Range,
    pub(crate) squares: Vec<BoardSquare>,
    pub(crate) origin: WorldPos,
    pub(crate) radius: i32,
    pub(crate) generations: u32,
}

impl Board {
    /// The grid rectangle, `(0,0)` to `(2·radius+1, 2·radius+1)`.
    #[inline]
    pub fn size(&self) -> Range {
        self.size
    }

    #[inline]
    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// World position of grid cell (0, 0). `y` is the lowest classified
    /// floor, so a bounding volume anchored here sits tight on the board.
    #[inline]
    pub fn origin(&self) -> WorldPos {
        self.origin
    }

    /// Grid coordinate of the seed column.
    #[inline]
    pub fn center(&self) -> GridCoord {
        GridCoord::new(self.radius, self.radius)
    }

    /// Number of flood-fill waves that changed the board.
    #[inline]
    pub fn generations(&self) -> u32 {
        self.generations
    }

    /// Row-major squares.
    #[inline]
    pub fn squares(&self) -> &[BoardSquare] {
        &self.squares
    }

    /// The square at `p`, or `None` outside the board.
    pub fn square(&self, p: GridCoord) -> Option<&BoardSquare> {
        self.size.index_of(p).and_then(|i| self.squares.get(i))
    }

    /// The square at `p`, or [`BoardError::GridOutOfBounds`].
    pub fn get(&self, p: GridCoord) -> Result<&BoardSquare, BoardError> {
        self.square(p).ok_or(BoardError::GridOutOfBounds(p))
    }

    pub fn is_walkable(&self, p: GridCoord) -> bool {
        self.square(p).is_some_and(BoardSquare::is_walkable)
    }

    /// Row-major walkability, `true` where the square is flat.
    pub fn walkable_mask(&self) -> Vec<bool> {
        self.squares.iter().map(BoardSquare::is_walkable).collect()
    }

    /// How many squares have the given classification.
    pub fn count(&self, kind: SquareType) -> usize {
        self.squares.iter().filter(|s| s.kind == kind).count()
    }

    /// Lowest and highest floor Y over all non-hole squares.
    pub fn vertical_bounds(&self) -> Option<(i32, i32)> {
        self.squares
            .iter()
            .filter_map(|s| s.floor_y)
            .fold(None, |acc, y| match acc {
                None => Some((y, y)),
                Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
            })
    }

    /// World position of the floor voxel under `p`, if the square has one.
    pub fn world_position(&self, p: GridCoord) -> Option<WorldPos> {
        let y = self.square(p)?.floor_y?;
        Some(WorldPos::new(self.origin.x + p.x, y, self.origin.z + p.z))
    }

    /// Grid coordinate of the column containing `pos`, if it lies on the board.
    pub fn grid_coord(&self, pos: WorldPos) -> Option<GridCoord> {
        let p = GridCoord::new(pos.x - self.origin.x, pos.z - self.origin.z);
        self.size.contains(p).then_some(p)
    }
}
