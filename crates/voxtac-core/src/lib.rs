//! **voxtac-core**: geometry shared by the tactical grid crates.
//!
//! Boards and pathfinders work in grid-local [`GridCoord`]s on the horizontal
//! (x, z) plane, bounded by a half-open [`Range`]. Voxel sampling works in
//! integer world space via [`WorldPos`].

pub mod geom;

pub use geom::{GridCoord, Range, RangeIter, WorldPos};
