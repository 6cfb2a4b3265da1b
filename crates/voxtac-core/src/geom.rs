//! Geometry primitives: [`GridCoord`], [`Range`] and [`WorldPos`].
//!
//! Grid coordinates live on the horizontal plane, so the second axis is `z`
//! rather than `y`. World positions keep all three axes with `y` pointing up.

use std::fmt;
use std::ops::{Add, Mul, Sub};

// ---------------------------------------------------------------------------
// GridCoord
// ---------------------------------------------------------------------------

/// A grid-local integer coordinate on the (x, z) plane.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCoord {
    pub x: i32,
    pub z: i32,
}

impl GridCoord {
    /// Grid origin (0, 0).
    pub const ZERO: Self = Self { x: 0, z: 0 };

    /// Create a new coordinate.
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Return a coordinate shifted by (dx, dz).
    #[inline]
    pub const fn shift(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            z: self.z + dz,
        }
    }

    /// The four axis-aligned neighbours in the order −x, +x, −z, +z.
    ///
    /// Both the board flood fill and path reconstruction break ties by this
    /// order, so it must not change.
    #[inline]
    pub const fn neighbors_4(self) -> [GridCoord; 4] {
        [
            Self::new(self.x - 1, self.z),
            Self::new(self.x + 1, self.z),
            Self::new(self.x, self.z - 1),
            Self::new(self.x, self.z + 1),
        ]
    }

    /// Squared Euclidean distance to `other`.
    #[inline]
    pub const fn distance_sq(self, other: GridCoord) -> i32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        dx * dx + dz * dz
    }

    /// Manhattan (L1) distance to `other`.
    #[inline]
    pub const fn manhattan(self, other: GridCoord) -> i32 {
        (self.x - other.x).abs() + (self.z - other.z).abs()
    }
}

impl PartialOrd for GridCoord {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GridCoord {
    /// Row-major: rows of constant `z`, then `x` within a row.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.z.cmp(&other.z).then(self.x.cmp(&other.x))
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

impl Add for GridCoord {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.z + rhs.z)
    }
}

impl Sub for GridCoord {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.z - rhs.z)
    }
}

impl Mul<i32> for GridCoord {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: i32) -> Self {
        Self::new(self.x * rhs, self.z * rhs)
    }
}

// ---------------------------------------------------------------------------
// Range
// ---------------------------------------------------------------------------

/// A half-open grid rectangle \[min, max). `min` is inclusive, `max` is exclusive.
///
/// Dense grids backed by a `Vec` use [`Range::index_of`] for row-major
/// addressing (`x + z * width`, relative to `min`).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    pub min: GridCoord,
    pub max: GridCoord,
}

impl Range {
    /// Create a new range from two corners, canonicalized so that
    /// `min` ≤ `max` on each axis.
    #[inline]
    pub fn new(x0: i32, z0: i32, x1: i32, z1: i32) -> Self {
        Self {
            min: GridCoord::new(x0.min(x1), z0.min(z1)),
            max: GridCoord::new(x0.max(x1), z0.max(z1)),
        }
    }

    /// A range anchored at (0, 0) with the given extent.
    #[inline]
    pub fn with_size(width: i32, depth: i32) -> Self {
        Self::new(0, 0, width, depth)
    }

    /// Size as a `GridCoord` (x = width, z = depth).
    #[inline]
    pub fn size(self) -> GridCoord {
        GridCoord::new(self.width(), self.depth())
    }

    /// Extent along x.
    #[inline]
    pub fn width(self) -> i32 {
        self.max.x - self.min.x
    }

    /// Extent along z.
    #[inline]
    pub fn depth(self) -> i32 {
        self.max.z - self.min.z
    }

    /// Total number of cells in the range.
    #[inline]
    pub fn len(self) -> usize {
        if self.is_empty() {
            return 0;
        }
        (self.width() as usize) * (self.depth() as usize)
    }

    /// Whether the range has zero or negative area.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.min.x >= self.max.x || self.min.z >= self.max.z
    }

    /// Whether `p` is inside the half-open range.
    #[inline]
    pub fn contains(self, p: GridCoord) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.z >= self.min.z && p.z < self.max.z
    }

    /// Intersection of two ranges.
    ///
    /// If the two ranges do not overlap, the zero (empty) range is returned.
    #[inline]
    pub fn intersect(self, other: Range) -> Self {
        let r = Self {
            min: GridCoord::new(self.min.x.max(other.min.x), self.min.z.max(other.min.z)),
            max: GridCoord::new(self.max.x.min(other.max.x), self.max.z.min(other.max.z)),
        };
        if r.is_empty() { Self::default() } else { r }
    }

    /// Row-major flat index of `p`, or `None` if `p` is outside the range.
    #[inline]
    pub fn index_of(self, p: GridCoord) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        let x = (p.x - self.min.x) as usize;
        let z = (p.z - self.min.z) as usize;
        Some(z * self.width() as usize + x)
    }

    /// Inverse of [`index_of`](Self::index_of). The index is not checked.
    #[inline]
    pub fn coord_at(self, idx: usize) -> GridCoord {
        let w = self.width().max(1) as usize;
        GridCoord::new(
            (idx % w) as i32 + self.min.x,
            (idx / w) as i32 + self.min.z,
        )
    }

    /// Row-major iterator over every coordinate in the range.
    #[inline]
    pub fn iter(self) -> RangeIter {
        RangeIter {
            range: self,
            cur: self.min,
        }
    }
}

impl IntoIterator for Range {
    type Item = GridCoord;
    type IntoIter = RangeIter;
    #[inline]
    fn into_iter(self) -> RangeIter {
        self.iter()
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}-{})", self.min, self.max)
    }
}

// ---------------------------------------------------------------------------
// RangeIter
// ---------------------------------------------------------------------------

/// Row-major iterator over the coordinates in a [`Range`].
#[derive(Clone, Debug)]
pub struct RangeIter {
    range: Range,
    cur: GridCoord,
}

impl Iterator for RangeIter {
    type Item = GridCoord;

    #[inline]
    fn next(&mut self) -> Option<GridCoord> {
        if self.cur.z >= self.range.max.z || self.range.is_empty() {
            return None;
        }
        let p = self.cur;
        self.cur.x += 1;
        if self.cur.x >= self.range.max.x {
            self.cur.x = self.range.min.x;
            self.cur.z += 1;
        }
        Some(p)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.range.is_empty() || self.cur.z >= self.range.max.z {
            return (0, Some(0));
        }
        let w = self.range.width() as usize;
        let remaining_in_row = (self.range.max.x - self.cur.x) as usize;
        let remaining_rows = (self.range.max.z - self.cur.z - 1) as usize;
        let total = remaining_in_row + remaining_rows * w;
        (total, Some(total))
    }
}

impl ExactSizeIterator for RangeIter {}

// ---------------------------------------------------------------------------
// WorldPos
// ---------------------------------------------------------------------------

/// An integer voxel position in world space. `y` grows upward.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl WorldPos {
    /// Create a new world position.
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Floor a continuous world-space point onto the voxel lattice.
    #[inline]
    pub fn floor(x: f64, y: f64, z: f64) -> Self {
        Self::new(x.floor() as i32, y.floor() as i32, z.floor() as i32)
    }

    /// Return a position shifted by (dx, dy, dz).
    #[inline]
    pub const fn shift(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    /// Same position with `y` replaced.
    #[inline]
    pub const fn with_y(self, y: i32) -> Self {
        Self { x: self.x, y, z: self.z }
    }

    /// The horizontal projection.
    #[inline]
    pub const fn horizontal(self) -> GridCoord {
        GridCoord::new(self.x, self.z)
    }
}

impl fmt::Display for WorldPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl Add for WorldPos {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for WorldPos {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}
