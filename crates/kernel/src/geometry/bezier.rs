use serde::{Deserialize, Serialize};

use super::point::Point3d;
use super::vector::Vec3;
use crate::error::{KernelError, Result};

/// Minimum number of control points for a Bézier curve (a degree-1 segment).
pub const MIN_CONTROL_POINTS: usize = 2;

/// Values that can be blended by one De Casteljau step.
pub(crate) trait Blend: Copy {
    fn blend(self, other: Self, t: f64) -> Self;
}

impl Blend for Point3d {
    fn blend(self, other: Self, t: f64) -> Self {
        self.lerp(&other, t)
    }
}

impl Blend for Vec3 {
    fn blend(self, other: Self, t: f64) -> Self {
        self * (1.0 - t) + other * t
    }
}

/// Collapse `work` to a single value by repeated linear interpolation.
///
/// Each pass overwrites `work[i]` with the blend of `work[i]` and
/// `work[i + 1]`; after `len - 1` passes `work[0]` holds the result.
/// Callers guarantee `work` is non-empty.
pub(crate) fn de_casteljau<T: Blend>(mut work: Vec<T>, t: f64) -> T {
    let n = work.len();
    for k in 1..n {
        for i in 0..n - k {
            work[i] = work[i].blend(work[i + 1], t);
        }
    }
    work[0]
}

fn check_count(provided: usize) -> Result<()> {
    if provided < MIN_CONTROL_POINTS {
        return Err(KernelError::TooFewControlPoints {
            required: MIN_CONTROL_POINTS,
            provided,
        });
    }
    Ok(())
}

/// Evaluate the Bézier curve defined by `points` at parameter `t`.
///
/// Uses De Casteljau's algorithm. Any real `t` is accepted: values outside
/// [0, 1] extrapolate the polynomial and move quickly away from the control
/// polygon.
pub fn evaluate_curve(points: &[Point3d], t: f64) -> Result<Point3d> {
    check_count(points.len())?;
    Ok(de_casteljau(points.to_vec(), t))
}

/// Control vectors of the derivative curve: `n * (P[i+1] - P[i])`.
pub(crate) fn hodograph(points: &[Point3d]) -> Vec<Vec3> {
    let degree = (points.len() - 1) as f64;
    points
        .windows(2)
        .map(|w| (w[1] - w[0]) * degree)
        .collect()
}

/// First derivative of the curve defined by `points` at `t`.
pub fn curve_derivative(points: &[Point3d], t: f64) -> Result<Vec3> {
    check_count(points.len())?;
    Ok(de_casteljau(hodograph(points), t))
}

/// A Bézier curve of arbitrary degree (at least linear).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point3d>", into = "Vec<Point3d>")]
pub struct BezierCurve {
    control_points: Vec<Point3d>,
}

impl BezierCurve {
    pub fn new(control_points: Vec<Point3d>) -> Result<Self> {
        check_count(control_points.len())?;
        Ok(Self { control_points })
    }

    /// The canonical four-point cubic.
    pub fn cubic(p0: Point3d, p1: Point3d, p2: Point3d, p3: Point3d) -> Self {
        Self {
            control_points: vec![p0, p1, p2, p3],
        }
    }

    pub fn degree(&self) -> usize {
        self.control_points.len() - 1
    }

    pub fn control_points(&self) -> &[Point3d] {
        &self.control_points
    }

    pub fn start(&self) -> Point3d {
        self.control_points[0]
    }

    pub fn end(&self) -> Point3d {
        self.control_points[self.control_points.len() - 1]
    }

    pub fn evaluate(&self, t: f64) -> Point3d {
        de_casteljau(self.control_points.clone(), t)
    }

    pub fn derivative(&self, t: f64) -> Vec3 {
        de_casteljau(hodograph(&self.control_points), t)
    }
}

impl TryFrom<Vec<Point3d>> for BezierCurve {
    type Error = KernelError;

    fn try_from(points: Vec<Point3d>) -> Result<Self> {
        Self::new(points)
    }
}

impl From<BezierCurve> for Vec<Point3d> {
    fn from(curve: BezierCurve) -> Self {
        curve.control_points
    }
}
