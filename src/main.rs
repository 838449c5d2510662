use clap::{Parser, ValueEnum};
use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use worldgen::ascii;
use worldgen::diamond_square::{diamond_square, DiamondSquareParams};
use worldgen::error::Result;
use worldgen::fbm::{run_fbm, FbmParams};
use worldgen::grid::Grid;
use worldgen::lattice::RandomLattice;
use worldgen::perlin::perlin_heightmap;
use worldgen::plates::PlateMap;
use worldgen::seeds::WorldSeeds;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    /// Midpoint displacement
    DiamondSquare,
    /// Fractal value noise
    Fbm,
    /// Single-octave gradient noise
    Perlin,
    /// Raw value-noise lattice
    Lattice,
    /// Plate partition
    Plates,
}

#[derive(Parser, Debug)]
#[command(name = "worldgen")]
#[command(about = "Generate square terrain heightmaps and preview them as ASCII")]
struct Args {
    /// Generator to run
    #[arg(value_enum)]
    algorithm: Algorithm,

    /// Generate a map of size 2^N + 1
    #[arg(
        short = 'n',
        long,
        default_value_t = 6,
        value_parser = clap::value_parser!(u32).range(0..=14)
    )]
    size: u32,

    /// Master seed (uses the clock if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Diamond-square displacement amplitude
    #[arg(long, default_value_t = 5.0)]
    roughness: f64,

    /// fBm octave count
    #[arg(long, default_value_t = 4)]
    octaves: u32,

    /// fBm frequency multiplier per octave
    #[arg(long, default_value_t = 2.0)]
    coefficient: f64,

    /// fBm amplitude divisor per octave
    #[arg(long, default_value_t = 2.0)]
    lacunarity: f64,

    /// Number of plates for the plates generator
    #[arg(short = 'p', long, default_value_t = 8)]
    num_plates: usize,

    /// Also render the plate heightmap with this continent/ocean gap (0-1)
    #[arg(long)]
    sea_gap: Option<f64>,

    /// Maximum preview width in characters
    #[arg(short, long, default_value_t = 64)]
    columns: usize,

    /// Print a height histogram after the preview
    #[arg(long)]
    histogram: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let args = Args::parse();

    let default_level = if args.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(e) = run(&args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let size = (1usize << args.size) + 1;
    let seeds = args.seed.map(WorldSeeds::from_master).unwrap_or_default();

    info!("Map size: {}x{}", size, size);
    info!("{}", seeds);

    match args.algorithm {
        Algorithm::DiamondSquare => {
            info!("Generating heightmap with diamond square...");
            let mut grid = Grid::new(size)?;
            let mut rng = ChaCha8Rng::seed_from_u64(seeds.diamond_square);
            let params = DiamondSquareParams { roughness: args.roughness };
            diamond_square(&mut grid, &params, &mut rng)?;
            show_grid(&grid, args)?;
        }
        Algorithm::Fbm => {
            info!("Generating heightmap with fBm...");
            let params = FbmParams {
                octaves: args.octaves,
                coefficient: args.coefficient,
                lacunarity: args.lacunarity,
                seed: Some(seeds.lattice),
                ..FbmParams::default()
            };
            let mut grid = Grid::new(size)?;
            run_fbm(&mut grid, &params)?;
            show_grid(&grid, args)?;
        }
        Algorithm::Perlin => {
            info!("Generating heightmap with Perlin noise...");
            let grid = perlin_heightmap(size, seeds.perlin)?;
            show_grid(&grid, args)?;
        }
        Algorithm::Lattice => {
            info!("Sampling random lattice...");
            let lattice = RandomLattice::new(size, size, Some(seeds.lattice))?;
            let grid = sample_lattice(&lattice, args.columns)?;
            show_grid(&grid, args)?;
        }
        Algorithm::Plates => {
            info!("Generating plate map...");
            let mut map = PlateMap::new(size)?;
            let mut rng = ChaCha8Rng::seed_from_u64(seeds.plates);
            map.generate_plates(args.num_plates, &mut rng)?;

            let areas = map.plate_areas();
            let largest = areas.iter().copied().max().unwrap_or(0);
            info!("Created {} plates, largest covers {} cells", areas.len(), largest);
            print!("{}", ascii::render_plates(&map, args.columns)?);

            if let Some(sea_gap) = args.sea_gap {
                info!("Converting to height map...");
                let grid = map.to_height_map(sea_gap)?;
                println!();
                show_grid(&grid, args)?;
            }
        }
    }

    info!("Done.");
    Ok(())
}

/// Sample the whole lattice on a square of at most `columns` points per side.
fn sample_lattice(lattice: &RandomLattice, columns: usize) -> Result<Grid> {
    let extent = lattice.width() as f64;
    let step = extent / columns.max(1) as f64;
    let points: Vec<(f64, f64, f64)> =
        lattice.each_point(0.0, 0.0, extent, extent, step, step)?.collect();

    // Points come x-major, so the first run of equal x is one column
    let first_x = points.first().map(|p| p.0).unwrap_or(0.0);
    let per_column = points.iter().take_while(|p| p.0 == first_x).count().max(1);
    let side = (points.len() / per_column).min(per_column).max(1);

    let mut grid = Grid::new(side)?;
    for (i, &(_, _, value)) in points.iter().enumerate() {
        let (x, y) = (i / per_column, i % per_column);
        if x < side && y < side {
            grid.set(x, y, value)?;
        }
    }
    grid.normalize_unit()?;
    Ok(grid)
}

fn show_grid(grid: &Grid, args: &Args) -> Result<()> {
    print!("{}", ascii::render_grid(grid, args.columns)?);
    if args.histogram {
        println!();
        print!("{}", ascii::height_legend());
        ascii::print_height_histogram(grid, 10);
    } else {
        let (min_h, max_h) = grid.min_max();
        info!("Height range: {:.3} to {:.3}", min_h, max_h);
    }
    Ok(())
}
