//! Terrain heightmap generation library
//!
//! A square [`grid::Grid`] holds the heights. It can be filled by
//! [`diamond_square::diamond_square`] or by fractal value noise
//! ([`fbm::run_fbm`], built on [`lattice::RandomLattice`]), and both finish by
//! rescaling into `[0, 1]` with [`normalize`].

pub mod ascii;
pub mod diamond_square;
pub mod error;
pub mod fbm;
pub mod grid;
pub mod lattice;
pub mod normalize;
pub mod perlin;
pub mod plates;
pub mod seeds;

pub use error::{Result, WorldgenError};
pub use grid::Grid;
pub use lattice::{Interpolation, RandomLattice};
