//! Terminal tactical board demo: builds a board from procedural terrain,
//! floods the movement field from its center and draws a path.
//!
//! Run: cargo run --bin tactical_board -- --radius 12 --seed 7 --target 3,20

use std::error::Error;

use voxtac_board::{BoardConfig, SquareType, compute_board};
use voxtac_core::WorldPos;
use voxtac_demos::{DemoOptions, furthest_reachable, generate_terrain, render, surface_height};
use voxtac_paths::GridPathfinder;

fn run(opts: &DemoOptions) -> Result<(), Box<dyn Error>> {
    let terrain = generate_terrain(opts.seed, opts.radius + 4);
    let ground = surface_height(&terrain, 0, 0).ok_or("no ground under the origin")?;
    let origin = WorldPos::new(0, ground + 1, 0);

    let config = BoardConfig::default().with_radius(opts.radius);
    let board = pollster::block_on(compute_board(&terrain, origin, &config))?;
    log::info!(
        "board {}x{} at {}: {} flat, {} obstacle, {} generations",
        board.size().width(),
        board.size().depth(),
        board.origin(),
        board.count(SquareType::Flat),
        board.count(SquareType::Obstacle),
        board.generations()
    );

    let mut pf = GridPathfinder::new(board.size(), board.walkable_mask())?;
    pf.set_origin(board.center())?;

    let target = opts.target.or_else(|| furthest_reachable(&pf));
    let path = match target {
        Some(t) => pf.find_path_to(t)?.unwrap_or_default(),
        None => Vec::new(),
    };
    let in_range = pf.reachable_cells(Some(opts.steps))?.len();

    print!("{}", render(&board, &pf, &path, opts.steps));
    println!("{in_range} squares within {} steps", opts.steps);
    match (target, path.len()) {
        (Some(t), 0) => println!("{t} is unreachable"),
        (Some(t), n) => println!("path to {t}: {} steps", n - 1),
        (None, _) => println!("nothing reachable"),
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = match DemoOptions::parse(std::env::args().skip(1)) {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("usage: tactical_board [--radius N] [--seed N] [--steps K] [--target X,Z]");
            std::process::exit(2);
        }
    };

    if let Err(e) = run(&opts) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
