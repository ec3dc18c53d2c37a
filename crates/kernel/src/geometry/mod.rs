pub mod point;
pub mod vector;
pub mod bezier;
pub mod bernstein;
pub mod grid;
pub mod surface;
pub mod extruded_curve;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use extruded_curve::ExtrudedCurve;
use surface::{BezierSurface, SurfacePoint, SurfaceQuery};
use vector::Vec3;

/// Parametric surface evaluation over the unit square.
///
/// Implementors apply their own parameter policy, so the `u`/`v` carried by
/// the returned point may differ from the query.
pub trait SurfaceEval {
    fn evaluate(&self, query: SurfaceQuery) -> Result<SurfacePoint>;

    /// Unit normal at `query`, `None` where the surface is degenerate.
    fn normal_at(&self, query: SurfaceQuery) -> Result<Option<Vec3>>;
}

impl SurfaceEval for BezierSurface {
    fn evaluate(&self, query: SurfaceQuery) -> Result<SurfacePoint> {
        BezierSurface::evaluate(self, query)
    }

    fn normal_at(&self, query: SurfaceQuery) -> Result<Option<Vec3>> {
        BezierSurface::normal_at(self, query)
    }
}

impl SurfaceEval for ExtrudedCurve {
    fn evaluate(&self, query: SurfaceQuery) -> Result<SurfacePoint> {
        ExtrudedCurve::evaluate(self, query)
    }

    fn normal_at(&self, query: SurfaceQuery) -> Result<Option<Vec3>> {
        ExtrudedCurve::normal_at(self, query)
    }
}

/// The closed set of surface kinds the kernel evaluates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Surface {
    Bezier(BezierSurface),
    ExtrudedCurve(ExtrudedCurve),
}

impl Surface {
    pub fn surface_type_name(&self) -> &'static str {
        match self {
            Surface::Bezier(_) => "BezierSurface",
            Surface::ExtrudedCurve(_) => "ExtrudedCurve",
        }
    }
}

impl SurfaceEval for Surface {
    fn evaluate(&self, query: SurfaceQuery) -> Result<SurfacePoint> {
        match self {
            Surface::Bezier(s) => s.evaluate(query),
            Surface::ExtrudedCurve(s) => s.evaluate(query),
        }
    }

    fn normal_at(&self, query: SurfaceQuery) -> Result<Option<Vec3>> {
        match self {
            Surface::Bezier(s) => s.normal_at(query),
            Surface::ExtrudedCurve(s) => s.normal_at(query),
        }
    }
}

impl From<BezierSurface> for Surface {
    fn from(surface: BezierSurface) -> Self {
        Surface::Bezier(surface)
    }
}

impl From<ExtrudedCurve> for Surface {
    fn from(surface: ExtrudedCurve) -> Self {
        Surface::ExtrudedCurve(surface)
    }
}
