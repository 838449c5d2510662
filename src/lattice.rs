//! Seeded value-noise lattice.
//!
//! Every integer lattice point carries a pseudo-random value in `[0, 1)`
//! derived purely from its (wrapped) coordinates and the lattice seed.
//! Continuous samples are produced by smoothing those values over a 3x3
//! neighbourhood and interpolating between the four surrounding lattice
//! points.

use crate::error::{Result, WorldgenError};
use crate::seeds::time_seed;

// Rotating hash constants
const HASH_INIT: u32 = 80_238_287;
const HASH_MULTIPLIER: u64 = 5_449;
const HASH_INPUT_MODULUS: u64 = 130_651;
const HASH_MODULUS: u32 = 75_327_403;

/// Curve used to blend between two lattice values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// Smoothstep weight `3t^2 - 2t^3`
    #[default]
    Cubic,
    /// Straight-line blend
    Linear,
}

impl Interpolation {
    /// Blend `a` towards `b` by `t` in `[0, 1]`.
    pub fn interpolate(self, a: f64, b: f64, t: f64) -> f64 {
        let f = match self {
            Interpolation::Cubic => 3.0 * t * t - 2.0 * t * t * t,
            Interpolation::Linear => t,
        };
        a * (1.0 - f) + b * f
    }
}

/// A 2D field of hashed pseudo-random values that wraps at `width` x `height`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RandomLattice {
    width: usize,
    height: usize,
    seed: u64,
    interpolation: Interpolation,
}

impl RandomLattice {
    /// Create a lattice. Without a seed, one is derived from the clock.
    pub fn new(width: usize, height: usize, seed: Option<u64>) -> Result<Self> {
        if width < 1 {
            return Err(WorldgenError::InvalidSize { size: width });
        }
        if height < 1 {
            return Err(WorldgenError::InvalidSize { size: height });
        }
        Ok(Self {
            width,
            height,
            seed: seed.unwrap_or_else(time_seed),
            interpolation: Interpolation::default(),
        })
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// Raw value in `[0, 1)` at an integer lattice point.
    /// Coordinates wrap, so `(-1, 0)` is the same point as `(width - 1, 0)`.
    pub fn hashed_value(&self, x: i64, y: i64) -> f64 {
        let wx = x.rem_euclid(self.width as i64) as u64;
        let wy = y.rem_euclid(self.height as i64) as u64;
        unit_from_hash(rotating_hash(&[wx, wy, self.seed]))
    }

    /// Weighted 3x3 average around an integer lattice point.
    /// Diagonals weigh 1/16, orthogonal neighbours 1/8 and the centre 1/4.
    pub fn smooth(&self, x: i64, y: i64) -> f64 {
        // Wrap first so the +-1 neighbours cannot overflow
        let x = x.rem_euclid(self.width as i64);
        let y = y.rem_euclid(self.height as i64);

        let corners = (self.hashed_value(x - 1, y - 1)
            + self.hashed_value(x - 1, y + 1)
            + self.hashed_value(x + 1, y - 1)
            + self.hashed_value(x + 1, y + 1))
            / 16.0;
        let sides = (self.hashed_value(x - 1, y)
            + self.hashed_value(x + 1, y)
            + self.hashed_value(x, y - 1)
            + self.hashed_value(x, y + 1))
            / 8.0;
        let centre = self.hashed_value(x, y) / 4.0;

        corners + sides + centre
    }

    /// Continuous sample at `(x, y)`.
    pub fn value_at(&self, x: f64, y: f64) -> f64 {
        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;
        // The lattice is periodic, so wrapping before the integer cast picks
        // the same cells and keeps huge coordinates in range
        let x0 = x0.rem_euclid(self.width as f64) as i64;
        let y0 = y0.rem_euclid(self.height as f64) as i64;

        let tl = self.smooth(x0, y0);
        let tr = self.smooth(x0 + 1, y0);
        let bl = self.smooth(x0, y0 + 1);
        let br = self.smooth(x0 + 1, y0 + 1);

        // Along y first for each column, then across x
        let left = self.interpolation.interpolate(tl, bl, fy);
        let right = self.interpolation.interpolate(tr, br, fy);
        self.interpolation.interpolate(left, right, fx)
    }

    /// Sample a rectangular region on a regular step.
    ///
    /// Yields `(x, y, value)` with `x` running over `min_x, min_x + step_x, ...`
    /// while below `max_x` (outer) and `y` likewise (inner).
    pub fn each_point(
        &self,
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
        step_x: f64,
        step_y: f64,
    ) -> Result<LatticePoints<'_>> {
        let valid = |s: f64| s.is_finite() && s > 0.0;
        if !valid(step_x) || !valid(step_y) {
            return Err(WorldgenError::InvalidStep { step_x, step_y });
        }

        let too_many = || WorldgenError::InvalidParameter {
            name: "range",
            reason: format!(
                "[{}, {}) x [{}, {}) with steps ({}, {}) has too many points",
                min_x, max_x, min_y, max_y, step_x, step_y
            ),
        };
        let count_x = steps_in(min_x, max_x, step_x).ok_or_else(too_many)?;
        let count_y = steps_in(min_y, max_y, step_y).ok_or_else(too_many)?;
        count_x.checked_mul(count_y).ok_or_else(too_many)?;

        Ok(LatticePoints {
            lattice: self,
            min_x,
            min_y,
            step_x,
            step_y,
            count_x,
            count_y,
            i: 0,
            j: 0,
        })
    }

    /// Visitor form of [`RandomLattice::each_point`].
    #[allow(clippy::too_many_arguments)]
    pub fn for_each_point<F: FnMut(f64, f64, f64)>(
        &self,
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
        step_x: f64,
        step_y: f64,
        mut visit: F,
    ) -> Result<()> {
        for (x, y, v) in self.each_point(min_x, min_y, max_x, max_y, step_x, step_y)? {
            visit(x, y, v);
        }
        Ok(())
    }
}

/// Iterator returned by [`RandomLattice::each_point`].
#[derive(Clone, Debug)]
pub struct LatticePoints<'a> {
    lattice: &'a RandomLattice,
    min_x: f64,
    min_y: f64,
    step_x: f64,
    step_y: f64,
    count_x: usize,
    count_y: usize,
    i: usize,
    j: usize,
}

impl Iterator for LatticePoints<'_> {
    type Item = (f64, f64, f64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.count_y == 0 || self.i >= self.count_x {
            return None;
        }

        let x = self.min_x + self.i as f64 * self.step_x;
        let y = self.min_y + self.j as f64 * self.step_y;

        self.j += 1;
        if self.j == self.count_y {
            self.j = 0;
            self.i += 1;
        }

        Some((x, y, self.lattice.value_at(x, y)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.count_y == 0 || self.i >= self.count_x {
            0
        } else {
            (self.count_x - self.i) * self.count_y - self.j
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for LatticePoints<'_> {}

/// Number of samples `min, min + step, ...` strictly below `max`, or `None`
/// when that count does not fit in a `usize`.
fn steps_in(min: f64, max: f64, step: f64) -> Option<usize> {
    if !(max > min) {
        return Some(0);
    }
    let count = ((max - min) / step).ceil();
    if !count.is_finite() || count >= usize::MAX as f64 {
        return None;
    }
    Some(count as usize)
}

/// Rotating hash over a handful of integers, folded into `[0, HASH_MODULUS)`.
fn rotating_hash(values: &[u64]) -> u32 {
    let mut hash = HASH_INIT;
    for &v in values {
        let term = (v.wrapping_mul(HASH_MULTIPLIER) % HASH_INPUT_MODULUS) as u32;
        hash = hash.rotate_left(4) ^ term;
    }
    hash % HASH_MODULUS
}

/// Map a hash onto `[0, 1)` with a SplitMix64 finalizer.
fn unit_from_hash(hash: u32) -> f64 {
    let mut z = (hash as u64).wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;
    (z >> 11) as f64 / (1u64 << 53) as f64
}
