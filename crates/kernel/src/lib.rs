pub mod config;
pub mod error;
pub mod geometry;
pub mod operations;

mod batch;

// Re-export the working set at crate root for convenience.
pub use config::{EvalConfig, ParameterPolicy};
pub use error::{ErrorKind, KernelError, Result};
pub use geometry::{Surface, SurfaceEval};
pub use geometry::bezier::{BezierCurve, evaluate_curve};
pub use geometry::grid::ControlGrid;
pub use geometry::point::Point3d;
pub use geometry::surface::{BezierSurface, SurfacePoint, SurfaceQuery, evaluate_surface};
pub use geometry::vector::Vec3;
pub use operations::extrude::{
    ExtrudedPair, ExtrusionBatch, ExtrusionOutput, ExtrusionSpec, extrude, extrude_grid,
    extrude_surface, extrude_with_mesh, try_extrude_surface,
};
pub use operations::sampling::{Lattice, SampleGrid};
pub use operations::shell::{ExtrudedShell, FaceKind, MeshOptions, QuadFace};

/// Tolerances for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Points closer than this are considered coincident.
    pub coincidence: f64,
    /// Parameter values closer than this are considered equal.
    pub parametric: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            coincidence: 1e-9,
            parametric: 1e-12,
        }
    }
}

impl Tolerance {
    pub fn points_coincident(&self, a: &Point3d, b: &Point3d) -> bool {
        a.distance_to(b) < self.coincidence
    }

    pub fn params_equal(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.parametric
    }
}
