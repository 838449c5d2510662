//! Seed management for terrain generation
//!
//! Provides separate seeds for each generator, allowing fine-grained control
//! over which parts of a run to vary or keep constant.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::{SystemTime, UNIX_EPOCH};

/// Seeds for all generators.
///
/// Each generator gets its own seed, derived from a master seed by default.
/// Individual seeds can be overridden for experimentation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldSeeds {
    /// Master seed (used for display/reference)
    pub master: u64,
    /// Random stream for diamond-square displacement
    pub diamond_square: u64,
    /// Value-noise lattice used by fBm
    pub lattice: u64,
    /// Gradient noise heightmap
    pub perlin: u64,
    /// Plate placement and growth
    pub plates: u64,
}

impl WorldSeeds {
    /// Create seeds from a master seed, deriving all sub-seeds deterministically.
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            diamond_square: derive_seed(master, "diamond_square"),
            lattice: derive_seed(master, "lattice"),
            perlin: derive_seed(master, "perlin"),
            plates: derive_seed(master, "plates"),
        }
    }

    /// Create a builder for customizing individual seeds
    pub fn builder(master: u64) -> WorldSeedsBuilder {
        WorldSeedsBuilder::new(master)
    }
}

impl Default for WorldSeeds {
    fn default() -> Self {
        Self::from_master(time_seed())
    }
}

/// Builder for customizing individual seeds while deriving others from master
pub struct WorldSeedsBuilder {
    seeds: WorldSeeds,
}

impl WorldSeedsBuilder {
    pub fn new(master: u64) -> Self {
        Self {
            seeds: WorldSeeds::from_master(master),
        }
    }

    pub fn diamond_square(mut self, seed: u64) -> Self {
        self.seeds.diamond_square = seed;
        self
    }

    pub fn lattice(mut self, seed: u64) -> Self {
        self.seeds.lattice = seed;
        self
    }

    pub fn perlin(mut self, seed: u64) -> Self {
        self.seeds.perlin = seed;
        self
    }

    pub fn plates(mut self, seed: u64) -> Self {
        self.seeds.plates = seed;
        self
    }

    pub fn build(self) -> WorldSeeds {
        self.seeds
    }
}

/// Seed taken from the wall clock, in whole seconds since the Unix epoch.
pub fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Derive a sub-seed from a master seed and a generator name.
fn derive_seed(master: u64, system: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    master.hash(&mut hasher);
    system.hash(&mut hasher);
    hasher.finish()
}

impl std::fmt::Display for WorldSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "WorldSeeds {{ master: {}, diamond_square: {}, lattice: {}, perlin: {}, plates: {} }}",
            self.master, self.diamond_square, self.lattice, self.perlin, self.plates,
        )
    }
}
