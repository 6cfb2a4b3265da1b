use voxtac_core::GridCoord;

use crate::GridPathfinder;
use crate::error::PathError;

/// Unit vector along `v`, or the zero vector when `v` is zero.
fn normalize(v: GridCoord) -> (f64, f64) {
    let (x, z) = (v.x as f64, v.z as f64);
    let len = (x * x + z * z).sqrt();
    if len == 0.0 { (0.0, 0.0) } else { (x / len, z / len) }
}

impl GridPathfinder {
    /// Reconstruct a shortest path from the origin to `target`.
    ///
    /// Returns `Ok(None)` if `target` was not reached. Otherwise the path
    /// starts at the origin, ends at `target` and has `distance + 1` cells.
    ///
    /// Among equally short predecessors, each backward step takes the one
    /// whose direction from the origin best matches the origin→target
    /// heading, so paths hug the straight line between the endpoints. Exact
    /// ties go to the first candidate in −x, +x, −z, +z order.
    pub fn find_path_to(&self, target: GridCoord) -> Result<Option<Vec<GridCoord>>, PathError> {
        let origin = self.origin.ok_or(PathError::NoOrigin)?;
        let target_distance = self
            .distance_at(target)
            .ok_or(PathError::OutOfBounds(target))?;
        if target_distance < 0 {
            return Ok(None);
        }

        let (hx, hz) = normalize(target - origin);
        let mut path = Vec::with_capacity(target_distance as usize + 1);
        let mut current = target;
        let mut distance = target_distance;
        path.push(current);

        while distance > 0 {
            let mut best: Option<(GridCoord, f64)> = None;
            for np in current.neighbors_4() {
                if self.distance_at(np) != Some(distance - 1) {
                    continue;
                }
                let (cx, cz) = normalize(np - origin);
                let alignment = hx * cx + hz * cz;
                match best {
                    Some((_, a)) if a >= alignment => {}
                    _ => best = Some((np, alignment)),
                }
            }
            let Some((next, _)) = best else {
                return Err(PathError::InconsistentState { at: current });
            };
            path.push(next);
            current = next;
            distance -= 1;
        }

        path.reverse();
        Ok(Some(path))
    }
}
