use std::collections::VecDeque;

use voxtac_core::GridCoord;

use crate::GridPathfinder;
use crate::error::PathError;
use crate::pathfinder::{OriginStatus, UNREACHED};

impl GridPathfinder {
    /// Move the origin to `p` and rebuild the distance field from it.
    ///
    /// Setting the current origin again, or a non-walkable cell, leaves the
    /// field untouched and reports [`OriginStatus::Unchanged`] or
    /// [`OriginStatus::Rejected`] respectively. On error the previous origin
    /// and distances are kept as they were.
    pub fn set_origin(&mut self, p: GridCoord) -> Result<OriginStatus, PathError> {
        let Some(oi) = self.rng.index_of(p) else {
            return Err(PathError::OutOfBounds(p));
        };
        if self.origin == Some(p) {
            return Ok(OriginStatus::Unchanged);
        }
        if !self.cells[oi].walkable {
            log::debug!("origin {p} is not walkable, keeping {:?}", self.origin);
            return Ok(OriginStatus::Rejected);
        }

        let mut dist = std::mem::take(&mut self.scratch);
        let result = self.flood(oi, &mut dist);
        if let Ok(deepest) = result {
            for (cell, &d) in self.cells.iter_mut().zip(dist.iter()) {
                cell.distance = d;
            }
            self.origin = Some(p);
            log::debug!("distance field from {p} settled at depth {deepest}");
        }
        self.scratch = dist;
        result.map(|_| OriginStatus::Set)
    }

    /// Unweighted single-source BFS into `dist`. Returns the deepest
    /// distance assigned.
    fn flood(&self, source: usize, dist: &mut Vec<i32>) -> Result<i32, PathError> {
        dist.clear();
        dist.resize(self.cells.len(), UNREACHED);
        dist[source] = 0;

        // A cell at this depth means the frontier has not settled by the cap.
        let cap = self.config.max_distance - 1;
        let mut deepest = 0;
        let mut queue: VecDeque<usize> = VecDeque::new();
        queue.push_back(source);

        while let Some(ci) = queue.pop_front() {
            let nd = dist[ci] + 1;
            for np in self.rng.coord_at(ci).neighbors_4() {
                let Some(ni) = self.rng.index_of(np) else {
                    continue;
                };
                if !self.cells[ni].walkable || dist[ni] != UNREACHED {
                    continue;
                }
                if nd >= cap {
                    return Err(PathError::DistanceBudgetExceeded {
                        max_distance: self.config.max_distance,
                    });
                }
                dist[ni] = nd;
                deepest = nd;
                queue.push_back(ni);
            }
        }
        Ok(deepest)
    }
}
