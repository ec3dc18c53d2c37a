use serde::{Deserialize, Serialize};

use super::bezier::BezierCurve;
use super::surface::{SurfacePoint, SurfaceQuery};
use super::vector::Vec3;
use crate::config::EvalConfig;
use crate::error::{KernelError, Result};

/// A Bézier profile swept along a straight direction.
///
/// `r(u, v) = C(u) + v * depth * d`, where `d` is the unit extrusion
/// direction. `u` runs along the profile, `v` from the profile (0) to its
/// translated copy (1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ExtrudedCurveDef")]
pub struct ExtrudedCurve {
    profile: BezierCurve,
    direction: Vec3,
    depth: f64,
    config: EvalConfig,
}

/// Unvalidated wire form; the direction is normalized on conversion.
#[derive(Deserialize)]
struct ExtrudedCurveDef {
    profile: BezierCurve,
    direction: Vec3,
    depth: f64,
    #[serde(default)]
    config: EvalConfig,
}

impl TryFrom<ExtrudedCurveDef> for ExtrudedCurve {
    type Error = KernelError;

    fn try_from(def: ExtrudedCurveDef) -> Result<Self> {
        Self::with_config(def.profile, def.direction, def.depth, def.config)
    }
}

impl ExtrudedCurve {
    pub fn new(profile: BezierCurve, direction: Vec3, depth: f64) -> Result<Self> {
        Self::with_config(profile, direction, depth, EvalConfig::default())
    }

    pub fn with_config(
        profile: BezierCurve,
        direction: Vec3,
        depth: f64,
        config: EvalConfig,
    ) -> Result<Self> {
        let direction = direction.normalized().ok_or(KernelError::ZeroDirection)?;
        Ok(Self {
            profile,
            direction,
            depth,
            config,
        })
    }

    pub fn profile(&self) -> &BezierCurve {
        &self.profile
    }

    /// Unit extrusion direction.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn depth(&self) -> f64 {
        self.depth
    }

    pub fn evaluate(&self, query: SurfaceQuery) -> Result<SurfacePoint> {
        let (u, v) = self.config.resolve(query)?;
        let point = self.profile.evaluate(u) + self.direction * (v * self.depth);
        Ok(SurfacePoint::new(point, u, v))
    }

    /// Unit normal `C'(u) × d`; `None` where the profile tangent is parallel
    /// to the direction or vanishes.
    pub fn normal_at(&self, query: SurfaceQuery) -> Result<Option<Vec3>> {
        let (u, _) = self.config.resolve(query)?;
        Ok(self.profile.derivative(u).cross(&self.direction).normalized())
    }
}
