//! Gradient-noise heightmaps.

use noise::{NoiseFn, Perlin};

use crate::error::Result;
use crate::grid::Grid;

/// Sampling scale applied to grid coordinates
const PERLIN_SCALE: f64 = 0.33;

/// Heights are rescaled into this range so the lowest ground is not flat zero
const PERLIN_RANGE: (f64, f64) = (0.3, 1.0);

/// Generate a heightmap from single-octave Perlin noise.
pub fn perlin_heightmap(size: usize, seed: u64) -> Result<Grid> {
    let mut grid = Grid::new(size)?;
    let noise = Perlin::new(seed as u32);

    for x in 0..size {
        for y in 0..size {
            let value = noise.get([x as f64 * PERLIN_SCALE, y as f64 * PERLIN_SCALE]);
            grid.set(x, y, value)?;
        }
    }

    grid.normalize(PERLIN_RANGE.0, PERLIN_RANGE.1)?;
    Ok(grid)
}
