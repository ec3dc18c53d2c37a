use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::bezier::{de_casteljau, hodograph};
use super::grid::ControlGrid;
use super::point::Point3d;
use super::vector::Vec3;
use crate::batch::map_each;
use crate::config::EvalConfig;
use crate::error::Result;

/// A request to evaluate a surface at parameters `(u, v)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceQuery {
    pub u: f64,
    pub v: f64,
}

impl SurfaceQuery {
    pub fn new(u: f64, v: f64) -> Self {
        Self { u, v }
    }
}

impl From<(f64, f64)> for SurfaceQuery {
    fn from((u, v): (f64, f64)) -> Self {
        Self { u, v }
    }
}

/// A point on a surface together with the parameters that produced it.
///
/// `u` and `v` are the parameters actually used, i.e. after clamping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfacePoint {
    pub point: Point3d,
    pub u: f64,
    pub v: f64,
}

impl SurfacePoint {
    pub fn new(point: Point3d, u: f64, v: f64) -> Self {
        Self { point, u, v }
    }

    pub fn query(&self) -> SurfaceQuery {
        SurfaceQuery::new(self.u, self.v)
    }
}

/// Evaluate `grid` at `query` under the default (clamping) configuration.
pub fn evaluate_surface(grid: &ControlGrid, query: SurfaceQuery) -> Result<SurfacePoint> {
    let (u, v) = EvalConfig::default().resolve(query)?;
    Ok(SurfacePoint::new(reduce_rows_first(grid, u, v), u, v))
}

/// Rows at `u`, then the resulting column at `v`.
fn reduce_rows_first(grid: &ControlGrid, u: f64, v: f64) -> Point3d {
    let row_points: Vec<Point3d> = grid
        .iter_rows()
        .map(|row| de_casteljau(row.to_vec(), u))
        .collect();
    de_casteljau(row_points, v)
}

/// Columns at `v`, then the resulting row at `u`.
fn reduce_columns_first(grid: &ControlGrid, u: f64, v: f64) -> Point3d {
    let column_points: Vec<Point3d> = (0..grid.cols())
        .map(|c| de_casteljau(grid.column(c), v))
        .collect();
    de_casteljau(column_points, u)
}

/// A tensor-product Bézier patch bound to an evaluation configuration.
///
/// The grid and configuration are fixed for the lifetime of the surface, so
/// one value can be shared across threads and queried concurrently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BezierSurface {
    grid: ControlGrid,
    config: EvalConfig,
}

impl BezierSurface {
    pub fn new(grid: ControlGrid) -> Self {
        Self::with_config(grid, EvalConfig::default())
    }

    pub fn with_config(grid: ControlGrid, config: EvalConfig) -> Self {
        Self { grid, config }
    }

    pub fn grid(&self) -> &ControlGrid {
        &self.grid
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Evaluate the surface point at `query`.
    ///
    /// Each row is reduced at `u`, then the column of row points at `v`.
    pub fn evaluate(&self, query: SurfaceQuery) -> Result<SurfacePoint> {
        let (u, v) = self.config.resolve(query)?;
        Ok(SurfacePoint::new(reduce_rows_first(&self.grid, u, v), u, v))
    }

    /// Evaluate with the opposite reduction order (columns at `v` first).
    ///
    /// Mathematically identical to [`evaluate`](Self::evaluate); rounding may
    /// differ in the last bits.
    pub fn evaluate_columns_first(&self, query: SurfaceQuery) -> Result<SurfacePoint> {
        let (u, v) = self.config.resolve(query)?;
        Ok(SurfacePoint::new(reduce_columns_first(&self.grid, u, v), u, v))
    }

    /// Partial derivative `∂S/∂u`.
    pub fn derivative_u(&self, query: SurfaceQuery) -> Result<Vec3> {
        let (u, v) = self.config.resolve(query)?;
        let row_tangents: Vec<Vec3> = self
            .grid
            .iter_rows()
            .map(|row| de_casteljau(hodograph(row), u))
            .collect();
        Ok(de_casteljau(row_tangents, v))
    }

    /// Partial derivative `∂S/∂v`.
    pub fn derivative_v(&self, query: SurfaceQuery) -> Result<Vec3> {
        let (u, v) = self.config.resolve(query)?;
        let row_points: Vec<Point3d> = self
            .grid
            .iter_rows()
            .map(|row| de_casteljau(row.to_vec(), u))
            .collect();
        Ok(de_casteljau(hodograph(&row_points), v))
    }

    /// Unit normal `∂S/∂u × ∂S/∂v`, or `None` where the patch is degenerate
    /// (collapsed edge, parallel tangents).
    pub fn normal_at(&self, query: SurfaceQuery) -> Result<Option<Vec3>> {
        let du = self.derivative_u(query)?;
        let dv = self.derivative_v(query)?;
        Ok(du.cross(&dv).normalized())
    }

    /// Evaluate many queries independently; failures stay per query.
    #[instrument(skip_all, fields(count = queries.len()))]
    pub fn evaluate_batch(&self, queries: &[SurfaceQuery]) -> Vec<Result<SurfacePoint>> {
        let results = map_each(queries, |q| self.evaluate(*q));
        let failed = results.iter().filter(|r| r.is_err()).count();
        debug!(failed, policy = ?self.config.policy, "batch evaluation complete");
        results
    }
}
