use serde::{Deserialize, Serialize};

use super::bezier::MIN_CONTROL_POINTS;
use super::point::Point3d;
use crate::error::{KernelError, Result};

/// Rectangular grid of control points for a tensor-product Bézier patch.
///
/// Rows run along `u`: row `r` is a curve of degree `cols - 1`. The rows are
/// then blended along `v` with degree `rows - 1`. Points are stored row-major.
/// A grid is immutable once built and always has at least 2x2 points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Point3d>>", into = "Vec<Vec<Point3d>>")]
pub struct ControlGrid {
    rows: usize,
    cols: usize,
    points: Vec<Point3d>,
}

impl ControlGrid {
    /// Build a grid from a flat row-major point list.
    pub fn new(rows: usize, cols: usize, points: Vec<Point3d>) -> Result<Self> {
        check_shape(rows, cols)?;
        let expected = rows * cols;
        if points.len() != expected {
            return Err(KernelError::GridSizeMismatch {
                rows,
                cols,
                expected,
                found: points.len(),
            });
        }
        Ok(Self { rows, cols, points })
    }

    /// Build a grid from nested rows, rejecting ragged input.
    pub fn from_rows(rows: Vec<Vec<Point3d>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        check_shape(rows.len(), cols)?;
        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != cols)
        {
            return Err(KernelError::RaggedGrid {
                row,
                expected: cols,
                found,
            });
        }
        let num_rows = rows.len();
        Ok(Self {
            rows: num_rows,
            cols,
            points: rows.into_iter().flatten().collect(),
        })
    }

    /// Build a grid by calling `f(row, col)` for every position.
    pub fn from_fn(
        rows: usize,
        cols: usize,
        mut f: impl FnMut(usize, usize) -> Point3d,
    ) -> Result<Self> {
        check_shape(rows, cols)?;
        let points = (0..rows)
            .flat_map(|r| (0..cols).map(move |c| (r, c)))
            .map(|(r, c)| f(r, c))
            .collect();
        Ok(Self { rows, cols, points })
    }

    /// Number of rows (control points along `v`).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of points per row (control points along `u`).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Degrees along `(u, v)`.
    pub fn degrees(&self) -> (usize, usize) {
        (self.cols - 1, self.rows - 1)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Point3d> {
        if row < self.rows && col < self.cols {
            Some(self.points[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn row(&self, r: usize) -> &[Point3d] {
        let start = r * self.cols;
        &self.points[start..start + self.cols]
    }

    pub fn column(&self, c: usize) -> Vec<Point3d> {
        self.points.iter().skip(c).step_by(self.cols).copied().collect()
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[Point3d]> + '_ {
        self.points.chunks_exact(self.cols)
    }

    pub fn points(&self) -> &[Point3d] {
        &self.points
    }

    /// Corner points in the order `(u, v)` = (0,0), (1,0), (0,1), (1,1).
    pub fn corners(&self) -> [Point3d; 4] {
        let last_row = self.rows - 1;
        let last_col = self.cols - 1;
        [
            self.points[0],
            self.points[last_col],
            self.points[last_row * self.cols],
            self.points[last_row * self.cols + last_col],
        ]
    }
}

fn check_shape(rows: usize, cols: usize) -> Result<()> {
    if rows < MIN_CONTROL_POINTS || cols < MIN_CONTROL_POINTS {
        return Err(KernelError::GridTooSmall { rows, cols });
    }
    Ok(())
}

impl TryFrom<Vec<Vec<Point3d>>> for ControlGrid {
    type Error = KernelError;

    fn try_from(rows: Vec<Vec<Point3d>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl From<ControlGrid> for Vec<Vec<Point3d>> {
    fn from(grid: ControlGrid) -> Self {
        grid.iter_rows().map(<[Point3d]>::to_vec).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lattice(rows: usize, cols: usize) -> ControlGrid {
        ControlGrid::from_fn(rows, cols, |r, c| Point3d::new(c as f64, r as f64, 0.0)).unwrap()
    }

    #[test]
    fn test_rows_and_columns() {
        let grid = lattice(3, 4);
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 4);
        assert_eq!(grid.degrees(), (3, 2));
        assert_eq!(grid.row(1)[2], Point3d::new(2.0, 1.0, 0.0));
        let col = grid.column(3);
        assert_eq!(col.len(), 3);
        assert_eq!(col[2], Point3d::new(3.0, 2.0, 0.0));
        assert_eq!(grid.iter_rows().count(), 3);
    }

    #[test]
    fn test_corners() {
        let grid = lattice(4, 4);
        let [c00, c10, c01, c11] = grid.corners();
        assert_eq!(c00, Point3d::new(0.0, 0.0, 0.0));
        assert_eq!(c10, Point3d::new(3.0, 0.0, 0.0));
        assert_eq!(c01, Point3d::new(0.0, 3.0, 0.0));
        assert_eq!(c11, Point3d::new(3.0, 3.0, 0.0));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let rows = vec![
            vec![Point3d::ORIGIN, Point3d::ORIGIN],
            vec![Point3d::ORIGIN, Point3d::ORIGIN],
            vec![Point3d::ORIGIN],
        ];
        let err = ControlGrid::from_rows(rows).unwrap_err();
        assert_eq!(
            err,
            KernelError::RaggedGrid {
                row: 2,
                expected: 2,
                found: 1
            }
        );
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_too_small_rejected() {
        assert!(matches!(
            ControlGrid::from_rows(vec![vec![Point3d::ORIGIN, Point3d::ORIGIN]]),
            Err(KernelError::GridTooSmall { rows: 1, cols: 2 })
        ));
        assert!(ControlGrid::from_rows(vec![]).is_err());
        assert!(ControlGrid::from_fn(2, 1, |_, _| Point3d::ORIGIN).is_err());
    }

    #[test]
    fn test_flat_length_checked() {
        let err = ControlGrid::new(2, 3, vec![Point3d::ORIGIN; 5]).unwrap_err();
        assert!(matches!(err, KernelError::GridSizeMismatch { expected: 6, found: 5, .. }));
    }

    #[test]
    fn test_get_out_of_bounds() {
        let grid = lattice(2, 2);
        assert!(grid.get(1, 1).is_some());
        assert!(grid.get(2, 0).is_none());
        assert!(grid.get(0, 2).is_none());
    }

    #[test]
    fn test_nested_roundtrip_preserves_layout() {
        let grid = lattice(2, 3);
        let nested: Vec<Vec<Point3d>> = grid.clone().into();
        assert_eq!(nested.len(), 2);
        assert_eq!(nested[1].len(), 3);
        assert_eq!(ControlGrid::try_from(nested).unwrap(), grid);
    }
}
