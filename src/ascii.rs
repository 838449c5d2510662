//! ASCII rendering and elevation statistics for heightmaps
//!
//! Everything here renders to strings or stdout; nothing touches the
//! filesystem.

use crate::error::Result;
use crate::grid::Grid;
use crate::plates::{Plate, PlateId, PlateMap, PlateType};

/// Low to high elevation ramp
const HEIGHT_CHARS: &[char] = &['~', '.', '-', '=', '+', '*', '#', '%', '^', 'A', 'M'];

/// Get ASCII character for a height in `[0, 1]`. Values outside are clamped.
pub fn height_char(height: f64) -> char {
    let normalized = if height.is_nan() { 0.0 } else { height.clamp(0.0, 1.0) };
    let idx = (normalized * (HEIGHT_CHARS.len() - 1) as f64) as usize;
    HEIGHT_CHARS[idx.min(HEIGHT_CHARS.len() - 1)]
}

/// Get ASCII character for a plate: upper case for continental plates,
/// lower case for oceanic, cycling through the alphabet.
pub fn plate_char(plate_id: PlateId, plates: &[Plate]) -> char {
    let base = match plates.get(plate_id.0).map(|p| p.plate_type) {
        Some(PlateType::Continental) => b'A',
        Some(PlateType::Oceanic) => b'a',
        None => return ' ',
    };
    (base + (plate_id.0 % 26) as u8) as char
}

/// Generate height legend
pub fn height_legend() -> String {
    let ramp: Vec<String> = HEIGHT_CHARS.iter().map(|c| c.to_string()).collect();
    format!("=== HEIGHT LEGEND ===\nLow → High:\n{}\n(0.0)            (1.0)\n", ramp.join(" "))
}

/// Coordinates sampled along one axis so at most `max_cols` are kept.
fn sample_axis(size: usize, max_cols: usize) -> impl Iterator<Item = usize> {
    let step = size.div_ceil(max_cols.max(1)).max(1);
    (0..size).step_by(step)
}

/// Render a heightmap, one row per `y` and one column per `x`, downsampled
/// to at most `max_cols` columns.
pub fn render_grid(grid: &Grid, max_cols: usize) -> Result<String> {
    let size = grid.size();
    let mut result = String::with_capacity((max_cols.min(size) + 1) * max_cols.min(size));

    for y in sample_axis(size, max_cols) {
        for x in sample_axis(size, max_cols) {
            result.push(height_char(grid.get(x, y)?));
        }
        result.push('\n');
    }

    Ok(result)
}

/// Render a plate map in the same layout as [`render_grid`].
pub fn render_plates(map: &PlateMap, max_cols: usize) -> Result<String> {
    let size = map.size();
    let mut result = String::new();

    for y in sample_axis(size, max_cols) {
        for x in sample_axis(size, max_cols) {
            result.push(plate_char(map.plate_at(x, y)?, map.plates()));
        }
        result.push('\n');
    }

    Ok(result)
}

/// Summary statistics over every cell of a heightmap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
}

pub fn height_stats(grid: &Grid) -> HeightStats {
    let mut heights = grid.heights().to_vec();
    heights.sort_by(|a, b| a.total_cmp(b));

    let count = heights.len() as f64;
    let (min, max) = grid.min_max();
    let mean = heights.iter().sum::<f64>() / count;
    let mid = heights.len() / 2;
    let median = if heights.len() % 2 == 0 {
        (heights[mid - 1] + heights[mid]) / 2.0
    } else {
        heights[mid]
    };
    let variance = heights.iter().map(|h| (h - mean).powi(2)).sum::<f64>() / count;

    HeightStats {
        min,
        max,
        mean,
        median,
        std_dev: variance.sqrt(),
    }
}

/// Count heights into `num_bins` equal-width bins spanning the data range.
pub fn histogram(grid: &Grid, num_bins: usize) -> Vec<usize> {
    let num_bins = num_bins.max(1);
    let mut bins = vec![0usize; num_bins];
    let (min, max) = grid.min_max();
    let range = max - min;

    for &h in grid.heights() {
        let idx = if range > 0.0 {
            (((h - min) / range) * num_bins as f64) as usize
        } else {
            0
        };
        bins[idx.min(num_bins - 1)] += 1;
    }

    bins
}

/// Print a histogram of height values with key statistics.
pub fn print_height_histogram(grid: &Grid, num_bins: usize) {
    let num_bins = num_bins.clamp(5, 50);
    let stats = height_stats(grid);
    let bins = histogram(grid, num_bins);
    let count = grid.num_points();
    let max_bin = bins.iter().copied().max().unwrap_or(1).max(1);
    let bin_width = (stats.max - stats.min) / num_bins as f64;
    let bar_max_width = 40;

    println!("Heights: {} cells", count);
    println!(
        "  min {:.4}  max {:.4}  mean {:.4}  median {:.4}  std dev {:.4}",
        stats.min, stats.max, stats.mean, stats.median, stats.std_dev
    );

    for (i, &bin_count) in bins.iter().enumerate() {
        let bin_start = stats.min + i as f64 * bin_width;
        let bin_end = bin_start + bin_width;
        let bar_len = bin_count * bar_max_width / max_bin;
        let pct = 100.0 * bin_count as f64 / count as f64;
        println!(
            "  {:>6.3} - {:>6.3} │{:<width$}│{:>5.1}%",
            bin_start,
            bin_end,
            "█".repeat(bar_len),
            pct,
            width = bar_max_width
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_height_char_ramp() {
        assert_eq!(height_char(0.0), '~');
        assert_eq!(height_char(1.0), 'M');
        assert_eq!(height_char(-3.0), '~');
        assert_eq!(height_char(7.0), 'M');
        assert_eq!(height_char(f64::NAN), '~');
    }

    #[test]
    fn test_render_grid_shape() {
        let grid = Grid::new(9).unwrap();
        let text = render_grid(&grid, 80).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert!(lines.iter().all(|l| l.chars().count() == 9));
        assert!(text.chars().filter(|&c| c != '\n').all(|c| c == '~'));
    }

    #[test]
    fn test_render_grid_downsamples() {
        let grid = Grid::new(65).unwrap();
        let text = render_grid(&grid, 20).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        // step = ceil(65 / 20) = 4 -> 0, 4, ..., 64
        assert_eq!(lines.len(), 17);
        assert!(lines.iter().all(|l| l.chars().count() <= 20));
    }

    #[test]
    fn test_render_grid_orientation() {
        let mut grid = Grid::new(3).unwrap();
        grid.set(2, 0, 1.0).unwrap();
        let text = render_grid(&grid, 10).unwrap();
        // x is the column, y is the row
        assert_eq!(text.lines().next().unwrap(), "~~M");
    }

    #[test]
    fn test_render_plates() {
        let mut map = PlateMap::new(8).unwrap();
        map.generate_plates(3, &mut ChaCha8Rng::seed_from_u64(5)).unwrap();
        let text = render_plates(&map, 80).unwrap();
        assert_eq!(text.lines().count(), 8);
        assert!(text.chars().filter(|&c| c != '\n').all(|c| c.is_ascii_alphabetic()));
    }

    #[test]
    fn test_plate_char_case() {
        let plates = vec![
            Plate::new(PlateId(0), PlateType::Continental, (0, 0)),
            Plate::new(PlateId(1), PlateType::Oceanic, (1, 1)),
        ];
        assert_eq!(plate_char(PlateId(0), &plates), 'A');
        assert_eq!(plate_char(PlateId(1), &plates), 'b');
        assert_eq!(plate_char(PlateId(5), &plates), ' ');
    }

    #[test]
    fn test_stats_and_histogram() {
        let mut grid = Grid::new(2).unwrap();
        grid.set(0, 0, 0.0).unwrap();
        grid.set(0, 1, 1.0).unwrap();
        grid.set(1, 0, 1.0).unwrap();
        grid.set(1, 1, 2.0).unwrap();

        let stats = height_stats(&grid);
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 2.0);
        assert_eq!(stats.mean, 1.0);
        assert_eq!(stats.median, 1.0);
        assert!((stats.std_dev - 0.5f64.sqrt()).abs() < 1e-12);

        assert_eq!(histogram(&grid, 2), vec![1, 3]);
        assert_eq!(histogram(&grid, 4).iter().sum::<usize>(), 4);
    }

    #[test]
    fn test_median_of_even_count_averages_middle_pair() {
        let mut grid = Grid::new(2).unwrap();
        grid.set(0, 0, 0.0).unwrap();
        grid.set(0, 1, 1.0).unwrap();
        grid.set(1, 0, 2.0).unwrap();
        grid.set(1, 1, 3.0).unwrap();
        assert_eq!(height_stats(&grid).median, 1.5);

        // Odd count takes the middle value
        let mut grid = Grid::new(3).unwrap();
        for (i, h) in [4.0, 0.0, 8.0, 1.0, 7.0, 2.0, 6.0, 3.0, 5.0].into_iter().enumerate() {
            grid.set(i / 3, i % 3, h).unwrap();
        }
        assert_eq!(height_stats(&grid).median, 4.0);
    }

    #[test]
    fn test_histogram_flat() {
        let grid = Grid::new(3).unwrap();
        assert_eq!(histogram(&grid, 5), vec![9, 0, 0, 0, 0]);
    }

    #[test]
    fn test_legend_lists_ramp() {
        assert!(height_legend().contains("~ . - = + * # % ^ A M"));
    }
}
