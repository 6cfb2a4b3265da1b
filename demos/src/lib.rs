//! Shared pieces of the tactical board demo: option parsing, procedural
//! terrain and terminal rendering.

use crossterm::style::Stylize;
use rand::{Rng, SeedableRng};
use voxtac_board::{Board, SquareType, Voxel, VoxelVolume};
use voxtac_core::{GridCoord, WorldPos};
use voxtac_paths::GridPathfinder;

pub const GROUND: i32 = 10;
pub const WORLD_HEIGHT: usize = 48;

const GRASS: u16 = 0;
const STONE: u16 = 1;
const TIMBER: u16 = 2;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Command-line options for the demo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoOptions {
    pub radius: i32,
    pub seed: u64,
    /// Grid-local path target. Defaults to the furthest reachable square.
    pub target: Option<GridCoord>,
    /// Movement range highlighted around the origin.
    pub steps: i32,
}

impl Default for DemoOptions {
    fn default() -> Self {
        Self {
            radius: 15,
            seed: 42,
            target: None,
            steps: 6,
        }
    }
}

impl DemoOptions {
    /// Parse `--radius N`, `--seed N`, `--target X,Z` and `--steps K`.
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, String> {
        let mut opts = Self::default();
        let mut args = args.into_iter();
        while let Some(flag) = args.next() {
            let mut value = || args.next().ok_or_else(|| format!("{flag} needs a value"));
            match flag.as_str() {
                "--radius" => opts.radius = parse_num(&value()?)?,
                "--seed" => opts.seed = parse_num(&value()?)?,
                "--steps" => opts.steps = parse_num(&value()?)?,
                "--target" => {
                    let v = value()?;
                    let (x, z) = v
                        .split_once(',')
                        .ok_or_else(|| format!("target must be X,Z, got {v:?}"))?;
                    opts.target = Some(GridCoord::new(parse_num(x)?, parse_num(z)?));
                }
                other => return Err(format!("unknown option {other:?}")),
            }
        }
        if opts.radius < 2 {
            return Err(format!("radius must be at least 2, got {}", opts.radius));
        }
        Ok(opts)
    }
}

fn parse_num<T: std::str::FromStr>(s: &str) -> Result<T, String> {
    s.trim().parse().map_err(|_| format!("not a number: {s:?}"))
}

// ---------------------------------------------------------------------------
// Terrain
// ---------------------------------------------------------------------------

/// Rolling ground with raised plateaus, sunken pits, stone pillars and a
/// timber bridge, spanning `[-half, half)` horizontally.
pub fn generate_terrain(seed: u64, half: i32) -> VoxelVolume {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let side = (2 * half) as usize;
    let mut heights = vec![GROUND; side * side];
    let idx = |x: i32, z: i32| ((z + half) * 2 * half + (x + half)) as usize;

    // Plateaus and pits.
    for _ in 0..side / 2 {
        let w = rng.random_range(2..7);
        let d = rng.random_range(2..7);
        let x0 = rng.random_range(-half..half - w);
        let z0 = rng.random_range(-half..half - d);
        let dh = match rng.random_range(0..6) {
            0 => -6,
            1 => -2,
            2 | 3 => 1,
            _ => 2,
        };
        for z in z0..z0 + d {
            for x in x0..x0 + w {
                heights[idx(x, z)] += dh;
            }
        }
    }

    for h in heights.iter_mut() {
        *h = (*h).clamp(1, WORLD_HEIGHT as i32 / 2);
    }

    let mut vol = VoxelVolume::new(WorldPos::new(-half, 0, -half), [side, WORLD_HEIGHT, side]);
    for z in -half..half {
        for x in -half..half {
            let top = heights[idx(x, z)];
            let material = if top > GROUND { STONE } else { GRASS };
            vol.set_column(x, z, top, material);
        }
    }

    // Pillars too tall to climb.
    for _ in 0..side / 4 {
        let x = rng.random_range(-half..half);
        let z = rng.random_range(-half..half);
        if (x, z) == (0, 0) {
            continue;
        }
        vol.set_column(x, z, heights[idx(x, z)] + 8, STONE);
    }

    // A bridge over the ground east of the center.
    let bx = half / 3;
    vol.fill_box(
        WorldPos::new(bx, GROUND + 3, -2),
        WorldPos::new(bx + 4, GROUND + 4, 3),
        Voxel::Solid(TIMBER),
    );
    vol
}

/// Y of the highest solid voxel in column (x, z).
pub fn surface_height(vol: &VoxelVolume, x: i32, z: i32) -> Option<i32> {
    (vol.min().y..vol.max().y)
        .rev()
        .find(|&y| vol.get(WorldPos::new(x, y, z)).is_solid())
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Draw the board as coloured characters, one row per grid `z`.
///
/// `@` is the pathfinder origin, `*` the path, `#` obstacles. Flat squares
/// show their height relative to the board origin and are highlighted when
/// within `steps` of the origin.
pub fn render(board: &Board, pf: &GridPathfinder, path: &[GridCoord], steps: i32) -> String {
    let base = board.origin().y;
    let mut out = String::new();
    let size = board.size();
    for z in size.min.z..size.max.z {
        for x in size.min.x..size.max.x {
            let p = GridCoord::new(x, z);
            let Some(sq) = board.square(p) else {
                continue;
            };
            let glyph = match sq.kind {
                SquareType::Hole => ' '.stylize(),
                SquareType::Obstacle => '#'.dark_grey(),
                SquareType::Flat => {
                    let h = sq.floor_y.map_or(0, |y| y - base).clamp(0, 9) as u32;
                    let c = char::from_digit(h, 10).unwrap_or('?');
                    let reach = pf.distance_at(p).unwrap_or(-1);
                    if pf.origin() == Some(p) {
                        '@'.yellow().bold()
                    } else if path.contains(&p) {
                        '*'.cyan().bold()
                    } else if (0..=steps).contains(&reach) {
                        c.green()
                    } else {
                        c.white()
                    }
                }
            };
            out.push_str(&glyph.to_string());
        }
        out.push('\n');
    }
    out
}

/// The walkable cell furthest from the origin, preferring the lowest
/// coordinate on ties.
pub fn furthest_reachable(pf: &GridPathfinder) -> Option<GridCoord> {
    pf.reachable_cells(None)
        .ok()?
        .into_iter()
        .max_by(|a, b| a.distance.cmp(&b.distance).then(b.coord.cmp(&a.coord)))
        .map(|c| c.coord)
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxtac_core::Range;

    fn args(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn parse_defaults() {
        assert_eq!(DemoOptions::parse(Vec::new()), Ok(DemoOptions::default()));
    }

    #[test]
    fn parse_all_flags() {
        let opts = DemoOptions::parse(args("--radius 9 --seed 7 --target 3,4 --steps 2")).unwrap();
        assert_eq!(opts.radius, 9);
        assert_eq!(opts.seed, 7);
        assert_eq!(opts.target, Some(GridCoord::new(3, 4)));
        assert_eq!(opts.steps, 2);
    }

    #[test]
    fn parse_errors() {
        assert!(DemoOptions::parse(args("--radius")).is_err());
        assert!(DemoOptions::parse(args("--radius x")).is_err());
        assert!(DemoOptions::parse(args("--target 3")).is_err());
        assert!(DemoOptions::parse(args("--radius 1")).is_err());
        assert!(DemoOptions::parse(args("--bogus 1")).is_err());
    }

    #[test]
    fn terrain_is_deterministic_and_grounded_at_center() {
        let a = generate_terrain(5, 12);
        let b = generate_terrain(5, 12);
        for z in -12..12 {
            for x in -12..12 {
                for y in 0..WORLD_HEIGHT as i32 {
                    let p = WorldPos::new(x, y, z);
                    assert_eq!(a.get(p), b.get(p));
                }
            }
        }
        assert!(a.get(WorldPos::new(0, 0, 0)).is_solid());
        assert!(surface_height(&a, 0, 0).is_some_and(|y| y >= 1));
    }

    #[test]
    fn furthest_reachable_on_a_strip() {
        let mut pf = GridPathfinder::from_fn(Range::with_size(5, 1), |_| true);
        assert_eq!(furthest_reachable(&pf), None);
        pf.set_origin(GridCoord::new(1, 0)).unwrap();
        assert_eq!(furthest_reachable(&pf), Some(GridCoord::new(4, 0)));
    }
}
