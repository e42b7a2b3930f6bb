// Potential grid: measurements in volts over an (x, y) survey mesh

use serde::{Deserialize, Serialize};

use crate::error::{Axis, CoreError};

/// One measured cell, yielded in row-major order by [`GridModel::cells`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub x: f64,
    pub y: f64,
    /// Potential in volts.
    pub value: f64,
}

/// Rectangular grid of half-cell potential readings.
///
/// `matrix[r][c]` is the potential (volts) measured at `(x_vals[c], y_vals[r])`.
/// x coordinates ascend, y coordinates descend (row 0 is the top of the
/// surveyed element). The shape is checked on construction, so every
/// accessor can index without bounds surprises.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridData")]
pub struct GridModel {
    x_vals: Vec<f64>,
    y_vals: Vec<f64>,
    matrix: Vec<Vec<f64>>,
}

/// Unvalidated wire form of a grid.
#[derive(Debug, Clone, Deserialize)]
struct GridData {
    x_vals: Vec<f64>,
    y_vals: Vec<f64>,
    matrix: Vec<Vec<f64>>,
}

impl TryFrom<GridData> for GridModel {
    type Error = CoreError;

    fn try_from(data: GridData) -> Result<Self, Self::Error> {
        GridModel::new(data.x_vals, data.y_vals, data.matrix)
    }
}

impl GridModel {
    pub fn new(
        x_vals: Vec<f64>,
        y_vals: Vec<f64>,
        matrix: Vec<Vec<f64>>,
    ) -> Result<Self, CoreError> {
        if matrix.len() != y_vals.len() {
            return Err(CoreError::RowCount {
                expected: y_vals.len(),
                found: matrix.len(),
            });
        }
        for (r, row) in matrix.iter().enumerate() {
            if row.len() != x_vals.len() {
                return Err(CoreError::Shape {
                    row: r,
                    expected: x_vals.len(),
                    found: row.len(),
                });
            }
        }

        check_axis(&x_vals, Axis::X)?;
        check_axis(&y_vals, Axis::Y)?;

        for (r, row) in matrix.iter().enumerate() {
            if let Some(c) = row.iter().position(|v| !v.is_finite()) {
                return Err(CoreError::NonFinite {
                    location: format!("cell ({r}, {c})"),
                });
            }
        }

        Ok(Self { x_vals, y_vals, matrix })
    }

    /// Regenerate a zero-filled grid from raw coordinate lists.
    ///
    /// x is sorted ascending and y descending; duplicate coordinates collapse.
    pub fn blank(mut x_vals: Vec<f64>, mut y_vals: Vec<f64>) -> Result<Self, CoreError> {
        if let Some(i) = x_vals.iter().position(|v| !v.is_finite()) {
            return Err(CoreError::NonFinite { location: format!("x[{i}]") });
        }
        if let Some(i) = y_vals.iter().position(|v| !v.is_finite()) {
            return Err(CoreError::NonFinite { location: format!("y[{i}]") });
        }

        x_vals.sort_by(|a, b| a.total_cmp(b));
        x_vals.dedup();
        y_vals.sort_by(|a, b| b.total_cmp(a));
        y_vals.dedup();

        let matrix = vec![vec![0.0; x_vals.len()]; y_vals.len()];
        Self::new(x_vals, y_vals, matrix)
    }

    pub fn x_vals(&self) -> &[f64] {
        &self.x_vals
    }

    pub fn y_vals(&self) -> &[f64] {
        &self.y_vals
    }

    pub fn matrix(&self) -> &[Vec<f64>] {
        &self.matrix
    }

    pub fn rows(&self) -> usize {
        self.y_vals.len()
    }

    pub fn cols(&self) -> usize {
        self.x_vals.len()
    }

    /// Number of measured cells.
    pub fn len(&self) -> usize {
        self.rows() * self.cols()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when either axis has fewer than two coordinates. Gradients are
    /// undefined on such a grid and come back empty.
    pub fn has_degenerate_axis(&self) -> bool {
        self.rows() < 2 || self.cols() < 2
    }

    pub fn value(&self, row: usize, col: usize) -> Option<f64> {
        self.matrix.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Replace a single reading (volts).
    pub fn set_cell(&mut self, row: usize, col: usize, value: f64) -> Result<(), CoreError> {
        if !value.is_finite() {
            return Err(CoreError::NonFinite {
                location: format!("cell ({row}, {col})"),
            });
        }
        let slot = self
            .matrix
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or(CoreError::CellOutOfBounds { row, col })?;
        *slot = value;
        Ok(())
    }

    /// Iterate all cells row-major with their coordinates.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.matrix.iter().enumerate().flat_map(move |(r, row)| {
            let y = self.y_vals[r];
            row.iter().enumerate().map(move |(c, &value)| Cell {
                row: r,
                col: c,
                x: self.x_vals[c],
                y,
                value,
            })
        })
    }

    /// All readings flattened row-major.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.matrix.iter().flat_map(|row| row.iter().copied())
    }
}

fn check_axis(vals: &[f64], axis: Axis) -> Result<(), CoreError> {
    if let Some(i) = vals.iter().position(|v| !v.is_finite()) {
        return Err(CoreError::NonFinite {
            location: format!("{axis}[{i}]"),
        });
    }
    for (i, pair) in vals.windows(2).enumerate() {
        let ordered = match axis {
            Axis::X => pair[0] < pair[1],
            Axis::Y => pair[0] > pair[1],
        };
        if !ordered {
            return Err(CoreError::AxisOrder { axis, index: i + 1 });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> GridModel {
        GridModel::new(
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![vec![-0.40, -0.10], vec![-0.05, -0.02]],
        )
        .unwrap()
    }

    #[test]
    fn rejects_row_count_mismatch() {
        let err = GridModel::new(vec![0.0], vec![1.0, 0.0], vec![vec![-0.1]]).unwrap_err();
        assert_eq!(err, CoreError::RowCount { expected: 2, found: 1 });
    }

    #[test]
    fn rejects_ragged_row() {
        let err = GridModel::new(
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![vec![-0.1, -0.2], vec![-0.3]],
        )
        .unwrap_err();
        assert_eq!(err, CoreError::Shape { row: 1, expected: 2, found: 1 });
    }

    #[test]
    fn rejects_unordered_axes() {
        let err = GridModel::new(vec![1.0, 0.0], vec![0.0], vec![vec![0.0, 0.0]]).unwrap_err();
        assert_eq!(err, CoreError::AxisOrder { axis: Axis::X, index: 1 });

        let err = GridModel::new(vec![0.0], vec![0.0, 1.0], vec![vec![0.0], vec![0.0]]).unwrap_err();
        assert_eq!(err, CoreError::AxisOrder { axis: Axis::Y, index: 1 });
    }

    #[test]
    fn rejects_nan_reading() {
        let err = GridModel::new(vec![0.0], vec![0.0], vec![vec![f64::NAN]]).unwrap_err();
        assert!(matches!(err, CoreError::NonFinite { .. }));
    }

    #[test]
    fn empty_grid_is_valid() {
        let grid = GridModel::new(vec![], vec![], vec![]).unwrap();
        assert!(grid.is_empty());
        assert!(grid.has_degenerate_axis());
    }

    #[test]
    fn blank_sorts_and_zero_fills() {
        let grid = GridModel::blank(vec![0.3, 0.0, 0.15, 0.0], vec![0.54, 1.94, 1.24]).unwrap();
        assert_eq!(grid.x_vals(), &[0.0, 0.15, 0.3]);
        assert_eq!(grid.y_vals(), &[1.94, 1.24, 0.54]);
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 3);
        assert!(grid.values().all(|v| v == 0.0));
    }

    #[test]
    fn set_cell_in_place() {
        let mut grid = two_by_two();
        grid.set_cell(1, 0, -0.33).unwrap();
        assert_eq!(grid.value(1, 0), Some(-0.33));

        let err = grid.set_cell(2, 0, -0.1).unwrap_err();
        assert_eq!(err, CoreError::CellOutOfBounds { row: 2, col: 0 });
    }

    #[test]
    fn cells_are_row_major_with_coordinates() {
        let grid = two_by_two();
        let cells: Vec<Cell> = grid.cells().collect();
        assert_eq!(cells.len(), 4);
        assert_eq!((cells[0].x, cells[0].y, cells[0].value), (0.0, 1.0, -0.40));
        assert_eq!((cells[1].x, cells[1].y, cells[1].value), (1.0, 1.0, -0.10));
        assert_eq!((cells[2].x, cells[2].y, cells[2].value), (0.0, 0.0, -0.05));
    }

    #[test]
    fn deserialize_validates_shape() {
        let ok: GridModel =
            serde_json::from_str(r#"{"x_vals":[0],"y_vals":[0],"matrix":[[-0.3]]}"#).unwrap();
        assert_eq!(ok.value(0, 0), Some(-0.3));

        let bad = serde_json::from_str::<GridModel>(r#"{"x_vals":[0,1],"y_vals":[0],"matrix":[[-0.3]]}"#);
        assert!(bad.is_err());
    }
}
