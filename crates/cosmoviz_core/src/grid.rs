//! Axis construction for parameter sweeps
//!
//! Pure functions with no failure modes: scale axes are geometric sequences
//! and parameter axes are either bare indices (full grid) or physical values
//! spread across a parameter's declared range (one-at-a-time).

use crate::model::{
    FiducialDefinition, ParameterAxis, ParameterDefinition, ParameterInfo, ScaleAxis, ScaleKind,
};

/// `points` samples spaced evenly in log10 from `10^start_exp` to `10^stop_exp`.
pub fn log_space(kind: ScaleKind, start_exp: f64, stop_exp: f64, points: usize) -> ScaleAxis {
    let values = match points {
        0 => Vec::new(),
        1 => vec![10f64.powf(start_exp)],
        _ => {
            let step = (stop_exp - start_exp) / (points - 1) as f64;
            (0..points)
                .map(|i| {
                    if i == points - 1 {
                        10f64.powf(stop_exp)
                    } else {
                        10f64.powf(start_exp + step * i as f64)
                    }
                })
                .collect()
        }
    };
    ScaleAxis::new(kind, values)
}

/// `0, 1, ..., count - 1`
pub fn index_samples(count: usize) -> Vec<f64> {
    (0..count).map(|i| i as f64).collect()
}

/// Normalized position of a sample index in [0, 1].
#[inline]
pub fn normalized_position(index: usize, count: usize) -> f64 {
    if count <= 1 {
        0.0
    } else {
        index as f64 / (count - 1) as f64
    }
}

/// `count` values spanning `[min, max]` inclusive.
pub fn physical_samples((min, max): (f64, f64), count: usize) -> Vec<f64> {
    if count == 1 {
        return vec![(min + max) / 2.0];
    }
    (0..count)
        .map(|i| {
            if i + 1 == count {
                max
            } else {
                min + (max - min) * normalized_position(i, count)
            }
        })
        .collect()
}

/// Axis for a swept parameter of a one-at-a-time sweep.
pub fn parameter_axis(
    index: usize,
    definition: &ParameterDefinition,
    count: usize,
) -> ParameterAxis {
    let (range_min, range_max) = definition.range;
    let info = ParameterInfo {
        name: definition.name.to_string(),
        description: definition.description.to_string(),
        range_min,
        range_max,
    };
    ParameterAxis::new(index, physical_samples(definition.range, count)).with_info(info)
}

/// Reference axis: every sample sits at the fiducial midpoint of a degenerate range.
pub fn fiducial_axis(index: usize, fiducial: &FiducialDefinition, count: usize) -> ParameterAxis {
    let value = fiducial.value;
    ParameterAxis::new(index, vec![value; count]).with_info(ParameterInfo {
        name: fiducial.name.to_string(),
        description: fiducial.description.to_string(),
        range_min: value,
        range_max: value,
    })
}

/// Row-major walk over every index tuple of a leading shape.
///
/// The last index varies fastest, matching the memory order of the
/// observable arrays.
#[derive(Debug, Clone)]
pub struct GridIndices {
    shape: Vec<usize>,
    current: Option<Vec<usize>>,
}

impl GridIndices {
    pub fn new(shape: &[usize]) -> Self {
        let current = if shape.contains(&0) {
            None
        } else {
            Some(vec![0; shape.len()])
        };
        Self {
            shape: shape.to_vec(),
            current,
        }
    }
}

impl Iterator for GridIndices {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current.take()?;
        let mut next = current.clone();

        // Increment like an odometer, last digit first
        let mut carry = true;
        for (index, extent) in next.iter_mut().zip(&self.shape).rev() {
            if !carry {
                break;
            }
            *index += 1;
            if *index >= *extent {
                *index = 0;
            } else {
                carry = false;
            }
        }

        if !carry {
            self.current = Some(next);
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CosmoParameter, FIDUCIAL};

    #[test]
    fn test_log_space_endpoints() {
        let r = log_space(ScaleKind::Separation, -1.0, 2.0, 40);
        assert_eq!(r.len(), 40);
        let (first, last) = r.bounds().unwrap();
        assert!((first - 0.1).abs() < 1e-15);
        assert_eq!(last, 100.0);
        assert!(r.is_strictly_increasing());
    }

    #[test]
    fn test_log_space_degenerate_lengths() {
        assert!(log_space(ScaleKind::Mass, 10.0, 16.0, 0).is_empty());
        assert_eq!(log_space(ScaleKind::Mass, 10.0, 16.0, 1).values(), &[1e10]);
    }

    #[test]
    fn test_physical_samples_span_range() {
        let def = CosmoParameter::OmegaM.definition();
        let axis = parameter_axis(1, def, 10);
        let info = axis.info.as_ref().unwrap();
        assert_eq!(axis.values[0], 0.1);
        assert!((axis.values[9] - 0.5).abs() < 1e-12);
        assert!(axis.values.iter().all(|v| info.contains(*v)));
    }

    #[test]
    fn test_fiducial_axis_is_degenerate() {
        let axis = fiducial_axis(0, &FIDUCIAL, 10);
        assert_eq!(axis.values, vec![0.3; 10]);
        assert!(axis.info.unwrap().is_degenerate());
    }

    #[test]
    fn test_grid_indices_row_major() {
        let all: Vec<_> = GridIndices::new(&[2, 3]).collect();
        assert_eq!(
            all,
            vec![
                vec![0, 0],
                vec![0, 1],
                vec![0, 2],
                vec![1, 0],
                vec![1, 1],
                vec![1, 2]
            ]
        );
        assert_eq!(GridIndices::new(&[10, 10, 10, 10]).count(), 10_000);
        assert_eq!(GridIndices::new(&[3, 0]).count(), 0);
        assert_eq!(GridIndices::new(&[]).count(), 1);
    }
}
