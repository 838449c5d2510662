/// Unique identifier for a plate, its index in the plate list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct PlateId(pub usize);

/// Type of plate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlateType {
    /// Oceanic plates sit below the midline.
    Oceanic,
    /// Continental plates sit above it.
    Continental,
}

impl PlateType {
    /// Height of this plate type in a plate heightmap with the given sea gap.
    pub fn height(&self, sea_gap: f64) -> f64 {
        match self {
            PlateType::Continental => 0.5 + sea_gap / 2.0,
            PlateType::Oceanic => 0.5 - sea_gap / 2.0,
        }
    }
}

/// A plate grown from a single seed cell.
#[derive(Clone, Debug)]
pub struct Plate {
    pub id: PlateId,
    pub plate_type: PlateType,
    /// Cell the plate started from
    pub seed: (usize, usize),
    /// Candidate cells the plate may absorb next. May hold cells that another
    /// plate has since claimed; those are skipped when popped.
    pub(crate) frontier: Vec<(usize, usize)>,
}

impl Plate {
    pub fn new(id: PlateId, plate_type: PlateType, seed: (usize, usize)) -> Self {
        Self {
            id,
            plate_type,
            seed,
            frontier: Vec::new(),
        }
    }

    pub fn has_frontier(&self) -> bool {
        !self.frontier.is_empty()
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }
}
