//! Linear rescaling of height buffers.

use log::debug;

use crate::error::{Result, WorldgenError};

/// Minimum and maximum of a buffer, or `None` when it is empty.
pub fn value_range(values: &[f64]) -> Option<(f64, f64)> {
    let (&first, rest) = values.split_first()?;
    let mut min = first;
    let mut max = first;
    for &v in rest {
        if v < min {
            min = v;
        }
        if v > max {
            max = v;
        }
    }
    Some((min, max))
}

/// Rescale `values` in place so that their minimum becomes `range_min` and
/// their maximum becomes `range_max`.
///
/// The map is affine, so the relative order of values is preserved. A flat
/// buffer (every value equal) has no range to stretch and is set to
/// `range_min`.
pub fn normalize_range(values: &mut [f64], range_min: f64, range_max: f64) -> Result<()> {
    if !range_min.is_finite() || !range_max.is_finite() || range_min > range_max {
        return Err(WorldgenError::InvalidRange { min: range_min, max: range_max });
    }

    let Some((data_min, data_max)) = value_range(values) else {
        return Ok(());
    };

    let span = data_max - data_min;
    if span == 0.0 {
        debug!("normalize: flat buffer of {} values, mapping to {}", values.len(), range_min);
        values.fill(range_min);
        return Ok(());
    }

    let scale = range_max - range_min;
    for v in values.iter_mut() {
        *v = (*v - data_min) / span * scale + range_min;
    }

    Ok(())
}

/// Rescale to `[0, 1]`.
pub fn normalize(values: &mut [f64]) -> Result<()> {
    normalize_range(values, 0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hits_requested_bounds() {
        let mut values = vec![3.0, -2.0, 7.5, 0.0, 1.25];
        normalize_range(&mut values, -1.0, 4.0).unwrap();

        let (min, max) = value_range(&values).unwrap();
        assert!((min + 1.0).abs() < 1e-12);
        assert!((max - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_preserves_order() {
        let original = vec![0.4, -3.0, 12.0, 5.5, 5.4, 0.0];
        let mut values = original.clone();
        normalize(&mut values).unwrap();

        for i in 0..original.len() {
            for j in 0..original.len() {
                if original[i] < original[j] {
                    assert!(values[i] < values[j], "order broken between {} and {}", i, j);
                }
            }
        }
    }

    #[test]
    fn test_flat_buffer_maps_to_min() {
        let mut values = vec![2.5; 9];
        normalize_range(&mut values, 0.3, 1.0).unwrap();
        assert!(values.iter().all(|&v| v == 0.3));
        assert!(values.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_empty_buffer_is_noop() {
        let mut values: Vec<f64> = Vec::new();
        assert!(normalize(&mut values).is_ok());
        assert_eq!(value_range(&values), None);
    }

    #[test]
    fn test_rejects_bad_range() {
        let mut values = vec![1.0, 2.0];
        assert_eq!(
            normalize_range(&mut values, 1.0, 0.0),
            Err(WorldgenError::InvalidRange { min: 1.0, max: 0.0 })
        );
        assert!(normalize_range(&mut values, 0.0, f64::INFINITY).is_err());
        // Untouched on error
        assert_eq!(values, vec![1.0, 2.0]);
    }
}
