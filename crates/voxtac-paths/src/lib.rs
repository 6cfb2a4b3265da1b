//! Distance fields and path reconstruction over boolean walkability grids.
//!
//! [`GridPathfinder`] takes any rectangular walkability mask (typically
//! derived from a classified board) and answers two questions once an origin
//! has been chosen:
//!
//! - which cells are reachable within `k` steps ([`GridPathfinder::reachable_cells`])
//! - what is a shortest 4-connected route to a target ([`GridPathfinder::find_path_to`])
//!
//! Setting an origin ([`GridPathfinder::set_origin`]) rebuilds the full
//! breadth-first distance field; all queries are synchronous reads of it.

mod bfs;
mod error;
mod path;
mod pathfinder;

pub use error::PathError;
pub use pathfinder::{GridCell, GridPathfinder, OriginStatus, PathConfig, UNREACHED};
