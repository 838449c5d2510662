use log::debug;
use rand::seq::index;
use rand::Rng;

use crate::error::{Result, WorldgenError};
use crate::grid::{num_points, Grid};

use super::types::{Plate, PlateId, PlateType};

/// A square map partitioned into plates.
///
/// Plates start from random seed cells and grow one cell at a time into
/// unclaimed neighbours until the whole map is covered. Adjacency is
/// 4-connected and wraps at the map edges.
#[derive(Clone, Debug)]
pub struct PlateMap {
    size: usize,
    plate_ids: Vec<PlateId>,
    plates: Vec<Plate>,
}

impl PlateMap {
    pub fn new(size: usize) -> Result<Self> {
        if size < 1 {
            return Err(WorldgenError::InvalidSize { size });
        }
        Ok(Self {
            size,
            plate_ids: Vec::new(),
            plates: Vec::new(),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn num_points(&self) -> usize {
        num_points(self.size)
    }

    pub fn is_generated(&self) -> bool {
        !self.plate_ids.is_empty()
    }

    pub fn plates(&self) -> &[Plate] {
        &self.plates
    }

    /// Plate owning `(x, y)`.
    pub fn plate_at(&self, x: usize, y: usize) -> Result<PlateId> {
        if !self.is_generated() {
            return Err(WorldgenError::NotGenerated);
        }
        if x >= self.size || y >= self.size {
            return Err(WorldgenError::OutOfBounds { x, y, size: self.size });
        }
        Ok(self.plate_ids[x * self.size + y])
    }

    /// Iterate over `(x, y, plate)` with `x` outer and `y` inner.
    pub fn each_plate_point(&self) -> Result<impl Iterator<Item = (usize, usize, PlateId)> + '_> {
        if !self.is_generated() {
            return Err(WorldgenError::NotGenerated);
        }
        let size = self.size;
        Ok(self
            .plate_ids
            .iter()
            .enumerate()
            .map(move |(idx, &id)| (idx / size, idx % size, id)))
    }

    /// Number of cells owned by each plate, indexed by plate id.
    pub fn plate_areas(&self) -> Vec<usize> {
        let mut areas = vec![0; self.plates.len()];
        for id in &self.plate_ids {
            areas[id.0] += 1;
        }
        areas
    }

    /// Partition the map into `num_plates` plates.
    ///
    /// Any previous partition is replaced. Each plate is continental or
    /// oceanic with equal probability.
    pub fn generate_plates<R: Rng + ?Sized>(
        &mut self,
        num_plates: usize,
        rng: &mut R,
    ) -> Result<()> {
        let total = self.num_points();
        if num_plates < 1 || num_plates > total {
            return Err(WorldgenError::InvalidParameter {
                name: "num_plates",
                reason: format!("must be between 1 and {}, got {}", total, num_plates),
            });
        }

        let size = self.size;
        let mut cells: Vec<Option<PlateId>> = vec![None; total];

        // Distinct random seed cells
        let mut plates: Vec<Plate> = index::sample(rng, total, num_plates)
            .into_iter()
            .enumerate()
            .map(|(i, cell)| {
                let id = PlateId(i);
                cells[cell] = Some(id);
                let plate_type = if rng.gen_bool(0.5) {
                    PlateType::Continental
                } else {
                    PlateType::Oceanic
                };
                Plate::new(id, plate_type, (cell / size, cell % size))
            })
            .collect();

        for plate in plates.iter_mut() {
            plate.frontier = empty_neighbours(&cells, size, plate.seed);
        }

        let mut active: Vec<usize> =
            (0..num_plates).filter(|&i| plates[i].has_frontier()).collect();
        let remaining = total - num_plates;
        let report_every = (remaining / 10).max(1);
        let mut absorbed = 0;

        while !active.is_empty() {
            let pick = choose_plate(&plates, &active, rng);
            let plate = &mut plates[active[pick]];

            match absorb_frontier(plate, &mut cells, size, rng) {
                Some(_) => {
                    absorbed += 1;
                    if absorbed % report_every == 0 {
                        debug!("plates: {}/{} cells absorbed", absorbed, remaining);
                    }
                    if !plate.has_frontier() {
                        active.swap_remove(pick);
                    }
                }
                None => {
                    active.swap_remove(pick);
                }
            }
        }

        // Every cell is reachable from some plate, so the fill is complete
        self.plate_ids = cells.into_iter().map(|c| c.unwrap_or_default()).collect();
        self.plates = plates;

        debug!("plates: generated {} plates on a {}x{} map", num_plates, size, size);
        Ok(())
    }

    /// Two-level heightmap: continental plates at `0.5 + sea_gap / 2`,
    /// oceanic plates at `0.5 - sea_gap / 2`.
    pub fn to_height_map(&self, sea_gap: f64) -> Result<Grid> {
        if !(0.0..=1.0).contains(&sea_gap) {
            return Err(WorldgenError::InvalidParameter {
                name: "sea_gap",
                reason: format!("must be between 0 and 1, got {}", sea_gap),
            });
        }

        let heights: Vec<f64> = self.plates.iter().map(|p| p.plate_type.height(sea_gap)).collect();
        let mut grid = Grid::new(self.size)?;
        for (x, y, id) in self.each_plate_point()? {
            grid.set(x, y, heights[id.0])?;
        }
        Ok(grid)
    }
}

/// 4-connected neighbours of `point`, wrapping at the edges.
fn neighbours(size: usize, (x, y): (usize, usize)) -> [(usize, usize); 4] {
    [
        ((x + size - 1) % size, y),
        ((x + 1) % size, y),
        (x, (y + 1) % size),
        (x, (y + size - 1) % size),
    ]
}

fn empty_neighbours(
    cells: &[Option<PlateId>],
    size: usize,
    point: (usize, usize),
) -> Vec<(usize, usize)> {
    neighbours(size, point)
        .into_iter()
        .filter(|&(x, y)| cells[x * size + y].is_none())
        .collect()
}

/// Pick an index into `active`, weighted by frontier length. Uniform choice
/// lets small plates squeeze into leftover gaps and produces snaky shapes.
fn choose_plate<R: Rng + ?Sized>(plates: &[Plate], active: &[usize], rng: &mut R) -> usize {
    let total: usize = active.iter().map(|&i| plates[i].frontier_len()).sum();
    let mut point = rng.gen_range(0..total);

    for (idx, &i) in active.iter().enumerate() {
        let len = plates[i].frontier_len();
        if point < len {
            return idx;
        }
        point -= len;
    }

    active.len() - 1
}

/// Claim one random unclaimed cell from the plate's frontier.
/// Returns `None` when the frontier holds no unclaimed cell.
fn absorb_frontier<R: Rng + ?Sized>(
    plate: &mut Plate,
    cells: &mut [Option<PlateId>],
    size: usize,
    rng: &mut R,
) -> Option<(usize, usize)> {
    while plate.has_frontier() {
        let i = rng.gen_range(0..plate.frontier.len());
        let (x, y) = plate.frontier.swap_remove(i);

        if cells[x * size + y].is_some() {
            continue;
        }

        cells[x * size + y] = Some(plate.id);
        let new_frontier = empty_neighbours(cells, size, (x, y));
        plate.frontier.extend(new_frontier);
        return Some((x, y));
    }

    None
}
