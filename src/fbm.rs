//! Fractal sum of value noise.

use log::debug;

use crate::error::{Result, WorldgenError};
use crate::grid::Grid;
use crate::lattice::RandomLattice;
use crate::normalize::normalize;

/// Parameters for fBm generation.
///
/// Naming note: `coefficient` multiplies the frequency between octaves and
/// `lacunarity` divides the amplitude. Most fBm literature uses "lacunarity"
/// for the frequency multiplier; the names here are kept as-is so existing
/// parameter sets produce the same terrain.
#[derive(Clone, Debug, PartialEq)]
pub struct FbmParams {
    /// Number of noise layers summed per cell
    pub octaves: u32,
    /// Frequency multiplier per octave
    pub coefficient: f64,
    /// Amplitude divisor per octave
    pub lacunarity: f64,
    /// Grid-to-lattice coordinate scale
    pub lattice_scale: f64,
    /// Lattice seed; a clock-derived seed is used when `None`
    pub seed: Option<u64>,
}

impl Default for FbmParams {
    fn default() -> Self {
        Self {
            octaves: 4,
            coefficient: 2.0,
            lacunarity: 2.0,
            lattice_scale: 0.5,
            seed: None,
        }
    }
}

impl FbmParams {
    fn validate(&self) -> Result<()> {
        if self.octaves < 1 {
            return Err(WorldgenError::InvalidParameter {
                name: "octaves",
                reason: "at least one octave is required".to_string(),
            });
        }
        if self.lacunarity == 0.0 || !self.lacunarity.is_finite() {
            return Err(WorldgenError::InvalidParameter {
                name: "lacunarity",
                reason: format!("must be finite and non-zero, got {}", self.lacunarity),
            });
        }
        if !self.coefficient.is_finite() {
            return Err(WorldgenError::InvalidParameter {
                name: "coefficient",
                reason: format!("must be finite, got {}", self.coefficient),
            });
        }
        if !(self.lattice_scale.is_finite() && self.lattice_scale > 0.0) {
            return Err(WorldgenError::InvalidParameter {
                name: "lattice_scale",
                reason: format!("must be finite and positive, got {}", self.lattice_scale),
            });
        }
        Ok(())
    }

    /// Side length of the lattice built for a grid of `grid_size`.
    pub fn lattice_size(&self, grid_size: usize) -> usize {
        ((grid_size as f64 * self.lattice_scale) as usize).max(1)
    }
}

/// Sum `octaves` samples of `lattice` at `(x, y)`.
pub fn fbm_value(lattice: &RandomLattice, x: f64, y: f64, params: &FbmParams) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;

    for _ in 0..params.octaves {
        total += lattice.value_at(x * frequency, y * frequency) * amplitude;
        frequency *= params.coefficient;
        amplitude /= params.lacunarity;
    }

    total
}

/// Fill `grid` with fBm of `lattice`, normalized to `[0, 1]`.
///
/// `params.seed` is ignored here; the lattice already carries its seed.
pub fn fbm(grid: &mut Grid, lattice: &RandomLattice, params: &FbmParams) -> Result<()> {
    params.validate()?;

    let size = grid.size();
    debug!(
        "fbm: size {} octaves {} coefficient {} lacunarity {} seed {}",
        size,
        params.octaves,
        params.coefficient,
        params.lacunarity,
        lattice.seed()
    );

    let scale = params.lattice_scale;
    let heights = grid.heights_mut();
    for x in 0..size {
        for y in 0..size {
            let fx = x as f64 * scale;
            let fy = y as f64 * scale;
            heights[x * size + y] = fbm_value(lattice, fx, fy, params);
        }
    }

    normalize(heights)
}

/// Build a lattice sized from the grid and fill the grid with fBm.
pub fn run_fbm(grid: &mut Grid, params: &FbmParams) -> Result<()> {
    params.validate()?;
    let lattice_size = params.lattice_size(grid.size());
    let lattice = RandomLattice::new(lattice_size, lattice_size, params.seed)?;
    fbm(grid, &lattice, params)
}
