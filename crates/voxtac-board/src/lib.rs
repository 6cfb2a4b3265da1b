//! Tactical board construction from voxel terrain.
//!
//! [`compute_board`] fetches a padded box of voxels around a world point
//! from a [`VoxelSource`] (the only suspension point) and classifies the
//! surrounding `(2·radius+1)²` columns into a [`Board`] of
//! [`SquareType::Flat`], [`SquareType::Hole`] and [`SquareType::Obstacle`]
//! squares.
//!
//! Classification is a generation-stamped flood fill: every wave may only
//! extend from squares finalized in the wave before it, following ramps and
//! ledges up or down by less than [`BoardConfig::max_delta_y`] relative to
//! the seed floor. Squares outside the inscribed circle of radius
//! `radius - 1` are never computed.
//!
//! [`Board::walkable_mask`] converts a board into the boolean grid consumed
//! by a pathfinder; [`RequestTracker`] lets a caller discard boards that were
//! superseded while their voxel fetch was in flight.

mod board;
mod builder;
mod error;
mod request;
mod voxel;

pub use board::{Board, BoardConfig, BoardSquare, SquareType};
pub use builder::{compute_board, compute_plateau, fetch_box};
pub use error::BoardError;
pub use request::{RequestId, RequestTracker};
pub use voxel::{FnVoxelSource, LocalMapData, Voxel, VoxelSource, VoxelVolume};
