//! Potential-energy grid validation and point-cloud building.
//!
//! The `/modal` endpoint may attach a 3D scalar grid sampling the
//! structure's potential-energy surface. Server output is messy: the grid
//! can be absent, ragged, or carry each sample wrapped in a one-element
//! sequence. Everything is validated here before the volumetric scatter
//! adapter is allowed to see it.

use serde::Deserialize;

use crate::error::SpbError;

/// One grid sample as found on the wire: a bare number or a one-element
/// sequence that needs unwrapping.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EnergyCell {
    /// Plain scalar sample.
    Scalar(f64),
    /// Sample wrapped in a sequence by the serializer.
    Wrapped(Vec<f64>),
}

/// Raw grid exactly as deserialized from the `/modal` response.
pub type RawEnergyGrid = Vec<Vec<Vec<EnergyCell>>>;

/// A validated cubic energy grid.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyGrid {
    /// Samples per axis.
    dim: usize,
    values: Vec<Vec<Vec<f64>>>,
}

/// Sparse plot points plus the color-scale bounds for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    /// `[x, y, z, value]` rows for every sample above the cutoff.
    pub points: Vec<[f64; 4]>,
    /// Smallest sample in the full grid (not just plotted points).
    pub min: f64,
    /// Largest sample in the full grid.
    pub max: f64,
}

impl EnergyGrid {
    /// Validate a raw grid: unwrap sequence-wrapped samples, require a
    /// non-empty cubic shape.
    ///
    /// # Errors
    ///
    /// Returns [`SpbError::MalformedGrid`] when any axis is empty, the
    /// shape is ragged or non-cubic, or a wrapped sample does not hold
    /// exactly one value.
    pub fn validate(raw: RawEnergyGrid) -> Result<Self, SpbError> {
        let dim = raw.len();
        if dim == 0 {
            return Err(SpbError::MalformedGrid("empty grid".to_owned()));
        }

        let mut values = Vec::with_capacity(dim);
        for (i, plane) in raw.into_iter().enumerate() {
            if plane.len() != dim {
                return Err(SpbError::MalformedGrid(format!(
                    "plane {i} has {} rows, expected {dim}",
                    plane.len()
                )));
            }
            let mut plane_values = Vec::with_capacity(dim);
            for (j, row) in plane.into_iter().enumerate() {
                if row.len() != dim {
                    return Err(SpbError::MalformedGrid(format!(
                        "row {i},{j} has {} samples, expected {dim}",
                        row.len()
                    )));
                }
                let mut row_values = Vec::with_capacity(dim);
                for cell in row {
                    row_values.push(match cell {
                        EnergyCell::Scalar(v) => v,
                        EnergyCell::Wrapped(seq) => {
                            if seq.len() == 1 {
                                seq[0]
                            } else {
                                return Err(SpbError::MalformedGrid(
                                    format!(
                                        "wrapped sample holds {} values",
                                        seq.len()
                                    ),
                                ));
                            }
                        }
                    });
                }
                plane_values.push(row_values);
            }
            values.push(plane_values);
        }

        Ok(Self { dim, values })
    }

    /// Samples per axis.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Grid shape as `(nx, ny, nz)`; always cubic after validation.
    #[must_use]
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.dim, self.dim, self.dim)
    }

    /// Build the sparse point cloud: only samples with magnitude above
    /// `epsilon` are plotted, so near-zero filler does not overwhelm the
    /// renderer. Min/max cover the full grid so the color scale stays
    /// stable against the cutoff.
    #[must_use]
    pub fn point_cloud(&self, epsilon: f64) -> PointCloud {
        let mut points = Vec::new();
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for (i, plane) in self.values.iter().enumerate() {
            for (j, row) in plane.iter().enumerate() {
                for (k, &value) in row.iter().enumerate() {
                    if value < min {
                        min = value;
                    }
                    if value > max {
                        max = value;
                    }
                    if value.abs() > epsilon {
                        points.push([i as f64, j as f64, k as f64, value]);
                    }
                }
            }
        }

        PointCloud { points, min, max }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(dim: usize, value: f64) -> RawEnergyGrid {
        vec![vec![vec![EnergyCell::Scalar(value); dim]; dim]; dim]
    }

    #[test]
    fn accepts_well_formed_cube() {
        let grid = EnergyGrid::validate(cube(30, 1.5)).unwrap();
        assert_eq!(grid.shape(), (30, 30, 30));
    }

    #[test]
    fn rejects_non_cubic_shape() {
        // 2x3x4
        let raw: RawEnergyGrid =
            vec![vec![vec![EnergyCell::Scalar(0.0); 4]; 3]; 2];
        assert!(matches!(
            EnergyGrid::validate(raw),
            Err(SpbError::MalformedGrid(_))
        ));
    }

    #[test]
    fn rejects_empty_grid_and_empty_first_row() {
        assert!(EnergyGrid::validate(Vec::new()).is_err());

        let mut raw = cube(2, 0.0);
        raw[0][0] = Vec::new();
        assert!(EnergyGrid::validate(raw).is_err());
    }

    #[test]
    fn unwraps_single_element_samples() {
        let mut raw = cube(2, 1.0);
        raw[0][0][0] = EnergyCell::Wrapped(vec![7.0]);
        let grid = EnergyGrid::validate(raw).unwrap();
        let cloud = grid.point_cloud(0.0);
        assert_eq!(cloud.max, 7.0);
    }

    #[test]
    fn rejects_multi_element_samples() {
        let mut raw = cube(2, 1.0);
        raw[0][0][0] = EnergyCell::Wrapped(vec![1.0, 2.0]);
        assert!(EnergyGrid::validate(raw).is_err());
    }

    #[test]
    fn point_cloud_drops_near_zero_samples_but_keeps_bounds() {
        let mut raw = cube(2, 0.0);
        raw[1][1][1] = EnergyCell::Scalar(-3.0);
        raw[0][1][0] = EnergyCell::Scalar(5.0);
        let grid = EnergyGrid::validate(raw).unwrap();

        let cloud = grid.point_cloud(1e-8);
        assert_eq!(cloud.points.len(), 2);
        assert_eq!(cloud.min, -3.0);
        assert_eq!(cloud.max, 5.0);
    }

    #[test]
    fn grid_deserializes_from_mixed_json() {
        let json = r"[
            [[1.0, [2.0]], [3.0, 4.0]],
            [[5.0, 6.0], [7.0, [8.0]]]
        ]";
        let raw: RawEnergyGrid = serde_json::from_str(json).unwrap();
        let grid = EnergyGrid::validate(raw).unwrap();
        assert_eq!(grid.dim(), 2);
        assert_eq!(grid.point_cloud(0.0).max, 8.0);
    }
}
