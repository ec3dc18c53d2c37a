//! Bernstein (matrix) formulation of Bézier evaluation.
//!
//! An independent route to the same values De Casteljau produces. Surface
//! evaluation becomes `Bv(v)ᵀ · P · Bu(u)` per coordinate, which makes it a
//! convenient cross-check for the recursive evaluator.

use nalgebra::{DMatrix, DVector};

use super::bezier::MIN_CONTROL_POINTS;
use super::grid::ControlGrid;
use super::point::Point3d;
use crate::error::{KernelError, Result};

/// Values of the `degree + 1` Bernstein polynomials of the given degree at `t`.
///
/// Built by the triangular recurrence `B(j, k) = (1-t) B(j-1, k) + t B(j-1, k-1)`
/// rather than from binomial coefficients and powers.
pub fn bernstein_basis(degree: usize, t: f64) -> DVector<f64> {
    let s = 1.0 - t;
    let mut basis = vec![0.0; degree + 1];
    basis[0] = 1.0;
    for j in 1..=degree {
        let mut prev = 0.0;
        for k in 0..j {
            let b = basis[k];
            basis[k] = s * b + prev;
            prev = t * b;
        }
        basis[j] = prev;
    }
    DVector::from_vec(basis)
}

/// Evaluate a Bézier curve as a Bernstein-weighted sum of its control points.
pub fn evaluate_curve_bernstein(points: &[Point3d], t: f64) -> Result<Point3d> {
    if points.len() < MIN_CONTROL_POINTS {
        return Err(KernelError::TooFewControlPoints {
            required: MIN_CONTROL_POINTS,
            provided: points.len(),
        });
    }
    let basis = bernstein_basis(points.len() - 1, t);
    let coord = |axis: usize| {
        DVector::from_iterator(points.len(), points.iter().map(|p| p.to_array()[axis]))
            .dot(&basis)
    };
    Ok(Point3d::new(coord(0), coord(1), coord(2)))
}

/// Evaluate the tensor-product surface at `(u, v)` in matrix form.
///
/// No parameter policy is applied; callers pass the parameters they want.
pub fn evaluate_surface_bernstein(grid: &ControlGrid, u: f64, v: f64) -> Point3d {
    let (degree_u, degree_v) = grid.degrees();
    let bu = bernstein_basis(degree_u, u);
    let bv = bernstein_basis(degree_v, v);
    let coord = |axis: usize| {
        let m = DMatrix::from_fn(grid.rows(), grid.cols(), |r, c| {
            grid.row(r)[c].to_array()[axis]
        });
        bv.dot(&(m * &bu))
    };
    Point3d::new(coord(0), coord(1), coord(2))
}
