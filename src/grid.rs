use crate::error::{Result, WorldgenError};
use crate::normalize::{normalize_range, value_range};

/// A square heightmap of `size * size` elevation values.
///
/// Cells are addressed by `(x, y)` with `0 <= x, y < size` and stored in
/// row-major order with `x` as the outer index, so iteration visits
/// `(0, 0), (0, 1), ..., (0, size - 1), (1, 0), ...`.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    size: usize,
    heights: Vec<f64>,
}

impl Grid {
    /// Create a zero-filled grid.
    pub fn new(size: usize) -> Result<Self> {
        if size < 1 {
            return Err(WorldgenError::InvalidSize { size });
        }
        Ok(Self {
            size,
            heights: vec![0.0; num_points(size)],
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of cells in the grid.
    pub fn num_points(&self) -> usize {
        num_points(self.size)
    }

    fn index(&self, x: usize, y: usize) -> Result<usize> {
        if x >= self.size || y >= self.size {
            return Err(WorldgenError::OutOfBounds { x, y, size: self.size });
        }
        Ok(x * self.size + y)
    }

    pub fn get(&self, x: usize, y: usize) -> Result<f64> {
        let idx = self.index(x, y)?;
        Ok(self.heights[idx])
    }

    pub fn set(&mut self, x: usize, y: usize, value: f64) -> Result<()> {
        let idx = self.index(x, y)?;
        self.heights[idx] = value;
        Ok(())
    }

    /// Fill the entire grid with a value.
    pub fn fill(&mut self, value: f64) {
        self.heights.fill(value);
    }

    /// Raw heights in storage order.
    pub fn heights(&self) -> &[f64] {
        &self.heights
    }

    pub(crate) fn heights_mut(&mut self) -> &mut [f64] {
        &mut self.heights
    }

    /// Lowest and highest value currently stored.
    pub fn min_max(&self) -> (f64, f64) {
        // A grid always has at least one cell
        value_range(&self.heights).unwrap_or((0.0, 0.0))
    }

    /// Linearly rescale all heights into `[min, max]`.
    ///
    /// A flat grid is set to `min` everywhere.
    pub fn normalize(&mut self, min: f64, max: f64) -> Result<()> {
        normalize_range(&mut self.heights, min, max)
    }

    /// Rescale into `[0, 1]`.
    pub fn normalize_unit(&mut self) -> Result<()> {
        self.normalize(0.0, 1.0)
    }

    /// Iterate over all cells with their coordinates, `x` outer and `y` inner.
    ///
    /// Each call starts a fresh pass over the grid.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + Clone + '_ {
        let size = self.size;
        self.heights.iter().enumerate().map(move |(idx, &val)| {
            let x = idx / size;
            let y = idx % size;
            (x, y, val)
        })
    }

    /// Visitor form of [`Grid::iter`].
    pub fn for_each_height<F: FnMut(usize, usize, f64)>(&self, mut visit: F) {
        for (x, y, h) in self.iter() {
            visit(x, y, h);
        }
    }
}

/// Number of points for a square heightmap of the given side length.
/// Kept as its own function so non-square geometries only need to touch it.
pub fn num_points(size: usize) -> usize {
    size * size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zero_filled() {
        let grid = Grid::new(4).unwrap();
        assert_eq!(grid.size(), 4);
        assert_eq!(grid.heights().len(), 16);
        assert!(grid.heights().iter().all(|&h| h == 0.0));
    }

    #[test]
    fn test_zero_size_rejected() {
        assert_eq!(Grid::new(0), Err(WorldgenError::InvalidSize { size: 0 }));
    }

    #[test]
    fn test_num_points() {
        for size in [1, 2, 5, 17, 33] {
            let grid = Grid::new(size).unwrap();
            assert_eq!(grid.num_points(), size * size);
        }
    }

    #[test]
    fn test_get_set_row_major() {
        let mut grid = Grid::new(3).unwrap();
        grid.set(1, 2, 7.5).unwrap();
        assert_eq!(grid.get(1, 2).unwrap(), 7.5);
        // x is the outer index
        assert_eq!(grid.heights()[1 * 3 + 2], 7.5);
        assert_eq!(grid.get(2, 1).unwrap(), 0.0);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut grid = Grid::new(3).unwrap();
        assert_eq!(
            grid.get(3, 0),
            Err(WorldgenError::OutOfBounds { x: 3, y: 0, size: 3 })
        );
        assert_eq!(
            grid.set(0, 5, 1.0),
            Err(WorldgenError::OutOfBounds { x: 0, y: 5, size: 3 })
        );
    }

    #[test]
    fn test_iter_row_major_and_restartable() {
        let mut grid = Grid::new(3).unwrap();
        for x in 0..3 {
            for y in 0..3 {
                grid.set(x, y, (x * 10 + y) as f64).unwrap();
            }
        }

        let coords: Vec<(usize, usize)> = grid.iter().map(|(x, y, _)| (x, y)).collect();
        let expected: Vec<(usize, usize)> =
            (0..3).flat_map(|x| (0..3).map(move |y| (x, y))).collect();
        assert_eq!(coords, expected);

        for (x, y, h) in grid.iter() {
            assert_eq!(h, (x * 10 + y) as f64);
        }

        // Second pass sees the same sequence
        assert_eq!(grid.iter().count(), 9);
        let mut visited = 0;
        grid.for_each_height(|_, _, _| visited += 1);
        assert_eq!(visited, 9);
    }

    #[test]
    fn test_normalize_bounds() {
        let mut grid = Grid::new(4).unwrap();
        for (i, h) in grid.heights_mut().iter_mut().enumerate() {
            *h = ((i * 37) % 11) as f64 - 4.0;
        }
        grid.normalize(-2.0, 3.0).unwrap();
        let (min, max) = grid.min_max();
        assert!((min + 2.0).abs() < 1e-12);
        assert!((max - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_flat_grid() {
        let mut grid = Grid::new(2).unwrap();
        grid.fill(4.0);
        grid.normalize_unit().unwrap();
        assert_eq!(grid.heights(), &[0.0, 0.0, 0.0, 0.0]);
    }
}
