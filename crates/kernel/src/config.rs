//! Evaluation configuration.
//!
//! The parameter policy is fixed when a surface is built and applies to every
//! query made against it.

use serde::{Deserialize, Serialize};

use crate::error::{KernelError, Result};
use crate::geometry::surface::SurfaceQuery;

/// How surface parameters outside [0, 1] are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParameterPolicy {
    /// Pull the parameter back into [0, 1] and evaluate.
    #[default]
    Clamp,
    /// Fail with `ParameterOutOfRange`.
    Reject,
}

impl ParameterPolicy {
    /// Resolve a raw parameter under this policy.
    ///
    /// NaN and infinities are rejected under both policies: clamping NaN
    /// yields NaN, and there is no meaningful surface point for it.
    pub fn resolve(self, name: &'static str, value: f64) -> Result<f64> {
        if !value.is_finite() {
            return Err(KernelError::ParameterOutOfRange { name, value });
        }
        match self {
            Self::Clamp => Ok(value.clamp(0.0, 1.0)),
            Self::Reject if (0.0..=1.0).contains(&value) => Ok(value),
            Self::Reject => Err(KernelError::ParameterOutOfRange { name, value }),
        }
    }
}

/// Configuration for surface evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Out-of-range parameter handling.
    pub policy: ParameterPolicy,
}

impl EvalConfig {
    /// Clamp out-of-range parameters (the default).
    pub fn clamping() -> Self {
        Self {
            policy: ParameterPolicy::Clamp,
        }
    }

    /// Reject out-of-range parameters.
    pub fn strict() -> Self {
        Self {
            policy: ParameterPolicy::Reject,
        }
    }

    /// Apply the parameter policy to both coordinates of `query`.
    pub fn resolve(&self, query: SurfaceQuery) -> Result<(f64, f64)> {
        Ok((
            self.policy.resolve("u", query.u)?,
            self.policy.resolve("v", query.v)?,
        ))
    }
}
