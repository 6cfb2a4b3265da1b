//! The generation-stamped flood fill that turns voxels into a [`Board`].

use voxtac_core::{GridCoord, Range, WorldPos};

use crate::board::{Board, BoardConfig, BoardSquare, SquareType};
use crate::error::BoardError;
use crate::voxel::{LocalMapData, Voxel, VoxelSource};

/// The voxel box `[min, max)` a board around `origin` needs.
pub fn fetch_box(origin: WorldPos, config: &BoardConfig) -> (WorldPos, WorldPos) {
    let h = config.padding();
    let v = config.vertical_extent();
    (origin.shift(-h, -v, -h), origin.shift(h + 1, v + 1, h + 1))
}

/// Fetch voxels around `origin` from `source` and classify them.
///
/// The voxel fetch is the only await; the flood fill runs to completion
/// afterwards.
pub async fn compute_board<S: VoxelSource>(
    source: &S,
    origin: WorldPos,
    config: &BoardConfig,
) -> Result<Board, BoardError> {
    config.validate()?;
    let (min, max) = fetch_box(origin, config);
    let data = source
        .local_map_data(min, max)
        .await
        .map_err(|e| BoardError::Source(Box::new(e)))?;
    compute_plateau(&data, origin, config)
}

/// Classify the board around `origin` from prefetched voxel data.
///
/// `data` must cover [`fetch_box`]; any sample outside it fails with
/// [`BoardError::OutOfBounds`].
pub fn compute_plateau(
    data: &LocalMapData,
    origin: WorldPos,
    config: &BoardConfig,
) -> Result<Board, BoardError> {
    config.validate()?;
    let radius = config.radius;
    let tolerance = config.max_delta_y;
    let size = Range::with_size(config.side(), config.side());
    let center = GridCoord::new(radius, radius);
    // world column of grid cell (0, 0)
    let corner = origin.shift(-radius, 0, -radius);
    let column = |p: GridCoord, y: i32| WorldPos::new(corner.x + p.x, y, corner.z + p.z);

    let mut squares = vec![BoardSquare::HOLE; size.len()];

    let (seed, seed_y) = seed_square(data, origin, tolerance)?;
    if let Some(ci) = size.index_of(center) {
        squares[ci] = seed;
    }

    // Corners of the square grid stay holes.
    let footprint = (radius - 1) * (radius - 1);
    let mut generation: u32 = 1;

    loop {
        let mut changed = false;
        for (i, p) in size.iter().enumerate() {
            if squares[i].kind != SquareType::Hole || p.distance_sq(center) >= footprint {
                continue;
            }
            // First neighbor, in −x, +x, −z, +z order, finalized last wave.
            let from = p
                .neighbors_4()
                .into_iter()
                .filter_map(|n| size.index_of(n))
                .map(|ni| squares[ni])
                .find(|s| s.kind == SquareType::Flat && s.generation + 1 == generation);
            let Some(from_y) = from.and_then(|s| s.floor_y) else {
                continue;
            };

            let candidate = probe(data, column(p, from_y), tolerance, generation)?;
            match candidate.floor_y {
                Some(y) if (y - seed_y).abs() < tolerance => {
                    squares[i] = candidate;
                    changed = true;
                }
                _ => {}
            }
        }
        if !changed {
            break;
        }
        log::trace!("board generation {generation} extended the fill");
        generation += 1;
    }

    let min_y = squares
        .iter()
        .filter_map(|s| s.floor_y)
        .min()
        .unwrap_or(seed_y);
    let board = Board {
        size,
        squares,
        origin: corner.with_y(min_y),
        radius,
        generations: generation - 1,
    };
    log::debug!(
        "board around {origin}: {} flat, {} obstacle after {} generations",
        board.count(SquareType::Flat),
        board.count(SquareType::Obstacle),
        board.generations
    );
    Ok(board)
}

/// Find the floor under the origin: the first solid voxel at or below it,
/// searching at most `tolerance` voxels down. Returns the seed square and
/// its floor Y.
fn seed_square(
    data: &LocalMapData,
    origin: WorldPos,
    tolerance: i32,
) -> Result<(BoardSquare, i32), BoardError> {
    for dy in 0..=tolerance {
        let at = origin.shift(0, -dy, 0);
        if let Voxel::Solid(material) = data.sample(at)? {
            return Ok((BoardSquare::flat(material, at.y, 0), at.y));
        }
    }
    Err(BoardError::UnresolvableSeed {
        origin,
        max_delta_y: tolerance,
    })
}

/// Classify the column through `at`, starting from a neighbor's floor height.
///
/// Inside solid, climb to the first air layer; in air, drop to the first
/// solid layer. Either search gives up after `tolerance` voxels.
fn probe(
    data: &LocalMapData,
    at: WorldPos,
    tolerance: i32,
    generation: u32,
) -> Result<BoardSquare, BoardError> {
    match data.sample(at)? {
        Voxel::Solid(base) => {
            let mut material = base;
            for dy in 1..=tolerance {
                match data.sample(at.shift(0, dy, 0))? {
                    Voxel::Air => {
                        return Ok(BoardSquare::flat(material, at.y + dy - 1, generation));
                    }
                    Voxel::Solid(m) => material = m,
                }
            }
            Ok(BoardSquare::obstacle(base, at.y, generation))
        }
        Voxel::Air => {
            for dy in 1..=tolerance {
                if let Voxel::Solid(m) = data.sample(at.shift(0, -dy, 0))? {
                    return Ok(BoardSquare::flat(m, at.y - dy, generation));
                }
            }
            Ok(BoardSquare::HOLE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxel::{FnVoxelSource, VoxelVolume};

    const STONE: u16 = 1;

    /// Solid up to and including `top` everywhere.
    fn flat_world(top: i32) -> FnVoxelSource<impl Fn(WorldPos) -> Voxel> {
        FnVoxelSource(move |p: WorldPos| {
            if p.y <= top {
                Voxel::Solid(STONE)
            } else {
                Voxel::Air
            }
        })
    }

    fn build<S: VoxelSource>(source: &S, origin: WorldPos, radius: i32) -> Result<Board, BoardError> {
        let config = BoardConfig::default().with_radius(radius);
        pollster::block_on(compute_board(source, origin, &config))
    }

    /// A 40x40 heightmap volume around the origin with ground top at `y = 10`.
    fn terrain() -> VoxelVolume {
        let mut vol = VoxelVolume::new(WorldPos::new(-20, -10, -20), [40, 40, 40]);
        for z in -20..20 {
            for x in -20..20 {
                vol.set_column(x, z, 10, STONE);
            }
        }
        vol
    }

    fn in_footprint(board: &Board, p: GridCoord) -> bool {
        let r = board.radius() - 1;
        p.distance_sq(board.center()) < r * r
    }

    #[test]
    fn flat_terrain_is_flat_inside_circle() {
        let board = build(&flat_world(10), WorldPos::new(0, 11, 0), 10).unwrap();
        assert_eq!(board.size(), Range::with_size(21, 21));
        assert_eq!(board.squares().len(), 21 * 21);
        for p in board.size().iter() {
            let s = board.square(p).unwrap();
            if in_footprint(&board, p) {
                assert_eq!(s.kind, SquareType::Flat, "at {p}");
                assert_eq!(s.floor_y, Some(10));
                assert_eq!(s.material, Some(STONE));
            } else {
                assert_eq!(*s, BoardSquare::HOLE, "at {p}");
            }
        }
        assert_eq!(board.origin(), WorldPos::new(-10, 10, -10));
    }

    #[test]
    fn generations_follow_manhattan_waves() {
        let board = build(&flat_world(10), WorldPos::new(3, 12, -4), 8).unwrap();
        let c = board.center();
        for p in board.size().iter() {
            if in_footprint(&board, p) {
                let s = board.square(p).unwrap();
                assert_eq!(s.generation as i32, p.manhattan(c), "at {p}");
            }
        }
        // (5, 4) off the center is the footprint cell furthest by Manhattan
        // distance.
        assert_eq!(board.generations(), 9);
    }

    #[test]
    fn corners_stay_holes_on_any_terrain() {
        // Rolling terrain that is walkable everywhere.
        let hills = FnVoxelSource(|p: WorldPos| {
            let top = 10 + ((p.x + p.z).rem_euclid(4) == 0) as i32;
            if p.y <= top {
                Voxel::Solid(0)
            } else {
                Voxel::Air
            }
        });
        for radius in [3, 6, 11] {
            let board = build(&hills, WorldPos::new(0, 12, 0), radius).unwrap();
            for p in board.size().iter() {
                if !in_footprint(&board, p) {
                    assert_eq!(board.square(p).unwrap().kind, SquareType::Hole);
                }
            }
        }
    }

    #[test]
    fn seed_searches_down_from_origin() {
        let board = build(&flat_world(10), WorldPos::new(0, 14, 0), 3).unwrap();
        let s = board.square(board.center()).unwrap();
        assert_eq!(s.floor_y, Some(10));
        assert_eq!(s.generation, 0);

        // Origin inside solid ground stands on itself.
        let board = build(&flat_world(10), WorldPos::new(0, 8, 0), 3).unwrap();
        assert_eq!(board.square(board.center()).unwrap().floor_y, Some(8));
    }

    #[test]
    fn seed_fails_over_deep_cavern() {
        let err = build(&flat_world(10), WorldPos::new(0, 15, 0), 3).unwrap_err();
        assert!(matches!(
            err,
            BoardError::UnresolvableSeed {
                max_delta_y: 4,
                ..
            }
        ));
    }

    fn east_of_seed(vol: &VoxelVolume) -> SquareType {
        let board = build(vol, WorldPos::new(0, 11, 0), 6).unwrap();
        board
            .square(board.center().shift(1, 0))
            .unwrap()
            .kind
    }

    #[test]
    fn rises_below_tolerance_are_flat() {
        let mut vol = terrain();
        vol.set_column(1, 0, 13, STONE);
        assert_eq!(east_of_seed(&vol), SquareType::Flat);
    }

    #[test]
    fn rise_of_tolerance_is_obstacle() {
        for top in [14, 15, 20] {
            let mut vol = terrain();
            vol.set_column(1, 0, top, STONE);
            assert_eq!(east_of_seed(&vol), SquareType::Obstacle, "top {top}");
        }
    }

    #[test]
    fn drops_of_tolerance_stay_holes() {
        let mut vol = terrain();
        vol.set_column(1, 0, 7, STONE);
        assert_eq!(east_of_seed(&vol), SquareType::Flat);

        for top in [6, 5, 0] {
            let mut vol = terrain();
            vol.set_column(1, 0, top, STONE);
            assert_eq!(east_of_seed(&vol), SquareType::Hole, "top {top}");
        }
    }

    #[test]
    fn obstacle_keeps_sampled_height_and_blocks_the_fill() {
        let mut vol = terrain();
        // A wall three columns east, spanning every z.
        for z in -20..20 {
            vol.set_column(3, z, 30, 7);
        }
        let board = build(&vol, WorldPos::new(0, 11, 0), 8).unwrap();
        let wall = board.square(board.center().shift(3, 0)).unwrap();
        assert_eq!(wall.kind, SquareType::Obstacle);
        assert_eq!(wall.floor_y, Some(10));
        assert_eq!(wall.material, Some(7));
        // Nothing beyond the wall is reached.
        let beyond = board.square(board.center().shift(4, 0)).unwrap();
        assert_eq!(beyond.kind, SquareType::Hole);
    }

    #[test]
    fn ramps_climb_one_step_per_column() {
        // Ground rises by one voxel per column eastward, 3 columns east at most.
        let ramp = FnVoxelSource(|p: WorldPos| {
            let top = 10 + p.x.clamp(0, 3);
            if p.y <= top {
                Voxel::Solid(0)
            } else {
                Voxel::Air
            }
        });
        let board = build(&ramp, WorldPos::new(0, 11, 0), 8).unwrap();
        let c = board.center();
        for dx in 0..=3 {
            let s = board.square(c.shift(dx, 0)).unwrap();
            assert_eq!(s.kind, SquareType::Flat);
            assert_eq!(s.floor_y, Some(10 + dx));
        }
        assert_eq!(board.vertical_bounds(), Some((10, 13)));
        assert_eq!(board.origin().y, 10);
    }

    #[test]
    fn tolerance_is_measured_from_seed_not_neighbor() {
        // A staircase of one-voxel steps: each step is climbable from its
        // neighbor but the fourth is too far above the seed.
        let stairs = FnVoxelSource(|p: WorldPos| {
            let top = 10 + p.x.clamp(0, 6);
            if p.y <= top {
                Voxel::Solid(0)
            } else {
                Voxel::Air
            }
        });
        let board = build(&stairs, WorldPos::new(0, 11, 0), 10).unwrap();
        let c = board.center();
        assert_eq!(board.square(c.shift(3, 0)).unwrap().floor_y, Some(13));
        assert_eq!(board.square(c.shift(4, 0)).unwrap().kind, SquareType::Hole);
        assert_eq!(board.square(c.shift(5, 0)).unwrap().kind, SquareType::Hole);
    }

    #[test]
    fn overhang_uses_floor_under_the_roof() {
        let mut vol = terrain();
        // Roof slab at y 13..=14 east of the seed leaves a 2-high gap.
        vol.fill_box(
            WorldPos::new(1, 13, -20),
            WorldPos::new(4, 15, 20),
            Voxel::Solid(9),
        );
        let board = build(&vol, WorldPos::new(0, 11, 0), 6).unwrap();
        let s = board.square(board.center().shift(2, 0)).unwrap();
        assert_eq!(s.kind, SquareType::Flat);
        assert_eq!(s.floor_y, Some(10));
    }

    #[test]
    fn first_matching_neighbor_decides_height() {
        // Seed column (0,0) top 10. Two paths reach (1,1) in generation 2:
        // via (0,1) at floor 10 (scanned first, −x) and via (1,0) at floor 12.
        let mut vol = terrain();
        vol.set_column(1, 0, 12, STONE);
        // (1,1) has a floor at 10 and another at 12 with a gap between.
        vol.set_column(1, 1, 10, STONE);
        vol.set(WorldPos::new(1, 12, 1), Voxel::Solid(4));
        let board = build(&vol, WorldPos::new(0, 11, 0), 6).unwrap();
        let s = board.square(board.center().shift(1, 1)).unwrap();
        assert_eq!(s.generation, 2);
        assert_eq!(s.floor_y, Some(10));
        assert_eq!(s.material, Some(STONE));
    }

    #[test]
    fn rejected_square_is_accepted_by_a_later_wave() {
        let mut vol = terrain();
        // (1,0) is a raised step, (0,1) a wall.
        vol.set_column(1, 0, 13, STONE);
        vol.set_column(0, 1, 30, STONE);
        // (1,1) has ground at 10 and a slab at 13..=14. From the step it
        // resolves to 14, too far above the seed; from the low ground to
        // the east it resolves to 10.
        vol.fill_box(
            WorldPos::new(1, 13, 1),
            WorldPos::new(2, 15, 2),
            Voxel::Solid(9),
        );
        let board = build(&vol, WorldPos::new(0, 11, 0), 6).unwrap();
        let c = board.center();

        let wall = board.square(c.shift(0, 1)).unwrap();
        assert_eq!(wall.kind, SquareType::Obstacle);
        assert_eq!(wall.generation, 1);
        assert_eq!(board.square(c.shift(1, 0)).unwrap().floor_y, Some(13));
        assert_eq!(board.square(c.shift(2, 1)).unwrap().generation, 3);

        let s = board.square(c.shift(1, 1)).unwrap();
        assert_eq!(s.kind, SquareType::Flat);
        assert_eq!(s.floor_y, Some(10));
        assert_eq!(s.material, Some(STONE));
        assert_eq!(s.generation, 4);
    }

    #[test]
    fn narrow_fetch_is_out_of_bounds() {
        let source = flat_world(10);
        let origin = WorldPos::new(0, 11, 0);
        let config = BoardConfig::default().with_radius(6);
        let data = pollster::block_on(source.local_map_data(
            WorldPos::new(-2, 0, -2),
            WorldPos::new(3, 20, 3),
        ))
        .unwrap();
        assert!(matches!(
            compute_plateau(&data, origin, &config),
            Err(BoardError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let source = flat_world(10);
        let config = BoardConfig::default().with_radius(0);
        let res = pollster::block_on(compute_board(&source, WorldPos::new(0, 11, 0), &config));
        assert!(matches!(res, Err(BoardError::InvalidConfig { radius: 0, .. })));
    }

    #[test]
    fn fetch_box_is_padded() {
        let config = BoardConfig::default();
        let (min, max) = fetch_box(WorldPos::new(5, 0, -5), &config);
        assert_eq!(min, WorldPos::new(-35, -40, -45));
        assert_eq!(max, WorldPos::new(46, 41, 36));
    }

    #[derive(Debug)]
    struct Offline;

    impl std::fmt::Display for Offline {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("map service offline")
        }
    }

    impl std::error::Error for Offline {}

    struct OfflineSource;

    impl VoxelSource for OfflineSource {
        type Error = Offline;

        async fn local_map_data(&self, _: WorldPos, _: WorldPos) -> Result<LocalMapData, Offline> {
            Err(Offline)
        }
    }

    #[test]
    fn source_errors_are_wrapped() {
        let err = build(&OfflineSource, WorldPos::new(0, 0, 0), 4).unwrap_err();
        assert!(matches!(err, BoardError::Source(_)));
        assert_eq!(err.to_string(), "voxel source failed: map service offline");
        assert!(std::error::Error::source(&err).is_some());
    }
}
