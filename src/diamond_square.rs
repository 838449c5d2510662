//! Diamond-square midpoint displacement.
//!
//! The grid is subdivided repeatedly: each pass sets the centre of every
//! square to the average of its corners plus a random shift (square step),
//! then the centre of every diamond to the average of its axis neighbours
//! plus a random shift (diamond step). Edges wrap, so the result tiles.

use log::debug;
use rand::Rng;

use crate::error::{Result, WorldgenError};
use crate::grid::{num_points, Grid};
use crate::normalize::normalize;

/// Parameters for diamond-square generation
#[derive(Clone, Debug, PartialEq)]
pub struct DiamondSquareParams {
    /// Amplitude of every random shift.
    ///
    /// The same roughness is used on every pass. Textbook diamond-square
    /// halves it per pass; this generator keeps it constant, which gives
    /// noisier fine detail.
    pub roughness: f64,
}

impl Default for DiamondSquareParams {
    fn default() -> Self {
        Self { roughness: 5.0 }
    }
}

/// Random displacement in `[-roughness, roughness)`.
pub fn diamond_shift<R: Rng + ?Sized>(roughness: f64, rng: &mut R) -> f64 {
    let r: f64 = rng.gen();
    (r * 2.0 - 1.0) * roughness
}

/// Check that `size - 1` is a power of two.
pub fn validate_size(size: usize) -> Result<()> {
    if size < 2 || !(size - 1).is_power_of_two() {
        return Err(WorldgenError::InvalidGeometry { size });
    }
    Ok(())
}

/// Fill `grid` with diamond-square terrain normalized to `[0, 1]`.
///
/// The grid's previous contents are discarded. On error the grid is left
/// untouched.
pub fn diamond_square<R: Rng + ?Sized>(
    grid: &mut Grid,
    params: &DiamondSquareParams,
    rng: &mut R,
) -> Result<()> {
    let size = grid.size();
    validate_size(size)?;
    if !params.roughness.is_finite() {
        return Err(WorldgenError::InvalidParameter {
            name: "roughness",
            reason: format!("must be finite, got {}", params.roughness),
        });
    }

    debug!("diamond-square: size {} roughness {}", size, params.roughness);

    let mut heights = displace(size, params.roughness, rng);
    normalize(&mut heights)?;
    grid.heights_mut().copy_from_slice(&heights);

    debug!("diamond-square: done");
    Ok(())
}

/// Raw square/diamond passes over a fresh `size * size` buffer, before
/// normalization. `size` must already be validated.
fn displace<R: Rng + ?Sized>(size: usize, roughness: f64, rng: &mut R) -> Vec<f64> {
    let edge = size - 1;
    let idx = |x: usize, y: usize| x * size + y;
    let mut heights = vec![0.0f64; num_points(size)];

    let corner = diamond_shift(roughness, rng);
    heights[idx(0, 0)] = corner;
    heights[idx(0, edge)] = corner;
    heights[idx(edge, 0)] = corner;
    heights[idx(edge, edge)] = corner;

    let mut side = edge;
    while side >= 2 {
        let half = side / 2;

        // Square step
        for x in (0..edge).step_by(side) {
            for y in (0..edge).step_by(side) {
                let avg = (heights[idx(x, y)]
                    + heights[idx(x + side, y)]
                    + heights[idx(x, y + side)]
                    + heights[idx(x + side, y + side)])
                    / 4.0;
                heights[idx(x + half, y + half)] = avg + diamond_shift(roughness, rng);
            }
        }

        // Diamond step
        for x in (0..edge).step_by(half) {
            let mut y = (x + half) % side;
            while y < edge {
                let avg = (heights[idx((x + edge - half) % edge, y)]
                    + heights[idx((x + half) % edge, y)]
                    + heights[idx(x, (y + half) % edge)]
                    + heights[idx(x, (y + edge - half) % edge)])
                    / 4.0;
                let value = avg + diamond_shift(roughness, rng);

                heights[idx(x, y)] = value;

                // Opposite border mirrors the wrapped edge
                if x == 0 {
                    heights[idx(edge, y)] = value;
                }
                if y == 0 {
                    heights[idx(x, edge)] = value;
                }

                y += side;
            }
        }

        side /= 2;
    }

    heights
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_validate_size() {
        for size in [2, 3, 5, 9, 17, 33, 65, 129] {
            assert!(validate_size(size).is_ok(), "size {} should be valid", size);
        }
        for size in [0, 1, 4, 6, 10, 16, 100] {
            assert_eq!(validate_size(size), Err(WorldgenError::InvalidGeometry { size }));
        }
    }

    #[test]
    fn test_invalid_size_leaves_grid_untouched() {
        let mut grid = Grid::new(6).unwrap();
        grid.fill(3.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let result = diamond_square(&mut grid, &DiamondSquareParams::default(), &mut rng);

        assert_eq!(result, Err(WorldgenError::InvalidGeometry { size: 6 }));
        assert!(grid.heights().iter().all(|&h| h == 3.0));
    }

    #[test]
    fn test_size_five_normalized() {
        let mut grid = Grid::new(5).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        diamond_square(&mut grid, &DiamondSquareParams { roughness: 5.0 }, &mut rng).unwrap();

        assert_eq!(grid.iter().count(), 25);
        assert!(grid.heights().iter().all(|h| h.is_finite() && (0.0..=1.0).contains(h)));

        let (min, max) = grid.min_max();
        assert!(min.abs() < 1e-12);
        assert!((max - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let params = DiamondSquareParams::default();

        let mut a = Grid::new(17).unwrap();
        diamond_square(&mut a, &params, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        let mut b = Grid::new(17).unwrap();
        diamond_square(&mut b, &params, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        let mut c = Grid::new(17).unwrap();
        diamond_square(&mut c, &params, &mut ChaCha8Rng::seed_from_u64(10)).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_edges_wrap() {
        let size = 33;
        let mut grid = Grid::new(size).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        diamond_square(&mut grid, &DiamondSquareParams::default(), &mut rng).unwrap();

        for i in 0..size {
            assert_eq!(grid.get(0, i).unwrap(), grid.get(size - 1, i).unwrap());
            assert_eq!(grid.get(i, 0).unwrap(), grid.get(i, size - 1).unwrap());
        }
    }

    #[test]
    fn test_overwrites_previous_contents() {
        let mut grid = Grid::new(9).unwrap();
        grid.fill(100.0);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        diamond_square(&mut grid, &DiamondSquareParams::default(), &mut rng).unwrap();
        assert!(grid.heights().iter().all(|&h| h <= 1.0));
    }

    #[test]
    fn test_three_by_three_passes() {
        // Draws 0, 0.125, 0.25, 0.375 give shifts -1, -0.75, -0.5, -0.25
        let mut rng = StepRng::new(0, 1 << 61);
        let raw = displace(3, 1.0, &mut rng);

        // Corners share one shift; centre is their average plus the next;
        // (0, 1) averages centre, wrapped centre and two corners, then
        // mirrors to (2, 1); (1, 0) likewise mirrors to (1, 2)
        #[rustfmt::skip]
        let expected = vec![
            -1.0,   -1.875, -1.0,
            -1.625, -1.75,  -1.625,
            -1.0,   -1.875, -1.0,
        ];
        assert_eq!(raw, expected);

        let mut grid = Grid::new(3).unwrap();
        let mut rng = StepRng::new(0, 1 << 61);
        diamond_square(&mut grid, &DiamondSquareParams { roughness: 1.0 }, &mut rng).unwrap();

        let normalized = [1.0, 0.0, 1.0, 2.0 / 7.0, 1.0 / 7.0, 2.0 / 7.0, 1.0, 0.0, 1.0];
        for (got, want) in grid.heights().iter().zip(normalized) {
            assert!((got - want).abs() < 1e-12, "got {} want {}", got, want);
        }
    }

    #[test]
    fn test_shift_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..1000 {
            let s = diamond_shift(2.5, &mut rng);
            assert!((-2.5..2.5).contains(&s));
        }
    }

    #[test]
    fn test_rejects_non_finite_roughness() {
        let mut grid = Grid::new(5).unwrap();
        let params = DiamondSquareParams { roughness: f64::NAN };
        let result = diamond_square(&mut grid, &params, &mut ChaCha8Rng::seed_from_u64(1));
        assert!(matches!(result, Err(WorldgenError::InvalidParameter { name: "roughness", .. })));
    }
}
