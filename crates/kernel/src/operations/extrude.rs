use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::sampling::{SampleGrid, detect_lattice};
use super::shell::{ExtrudedShell, MeshOptions, assemble_shell};
use crate::Tolerance;
use crate::batch::map_each;
use crate::error::{KernelError, Result};
use crate::geometry::SurfaceEval;
use crate::geometry::surface::{SurfacePoint, SurfaceQuery};
use crate::geometry::vector::Vec3;

/// Direction and signed distance of an extrusion.
///
/// The direction need not be unit length; it is normalized on use. A negative
/// distance extrudes against the direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtrusionSpec {
    pub direction: Vec3,
    pub distance: f64,
}

impl ExtrusionSpec {
    pub fn new(direction: Vec3, distance: f64) -> Self {
        Self {
            direction,
            distance,
        }
    }

    /// The translation applied to every extruded point.
    pub fn offset_vector(&self) -> Result<Vec3> {
        let unit = self.direction.normalized().ok_or(KernelError::ZeroDirection)?;
        Ok(unit * self.distance)
    }
}

/// A surface point and its extruded counterpart: one rib of the solid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtrudedPair {
    pub base: SurfacePoint,
    pub offset: SurfacePoint,
}

impl ExtrudedPair {
    /// `offset - base`.
    pub fn rib(&self) -> Vec3 {
        self.offset.point - self.base.point
    }
}

/// Translate `point` along `spec`.
pub fn extrude(point: SurfacePoint, spec: &ExtrusionSpec) -> Result<ExtrudedPair> {
    let shift = spec.offset_vector()?;
    Ok(offset_by(point, shift))
}

fn offset_by(base: SurfacePoint, shift: Vec3) -> ExtrudedPair {
    ExtrudedPair {
        base,
        offset: SurfacePoint::new(base.point + shift, base.u, base.v),
    }
}

/// Per-query outcomes of a batch extrusion, in query order.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtrusionBatch {
    pub outcomes: Vec<Result<ExtrudedPair>>,
}

impl ExtrusionBatch {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// True when every query succeeded.
    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(Result::is_ok)
    }

    pub fn pairs(&self) -> impl Iterator<Item = &ExtrudedPair> + '_ {
        self.outcomes.iter().filter_map(|r| r.as_ref().ok())
    }

    /// Failed queries with their index in the original query slice.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &KernelError)> + '_ {
        self.outcomes
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.as_ref().err().map(|e| (i, e)))
    }

    /// All pairs, or the first failure.
    pub fn into_pairs(self) -> Result<Vec<ExtrudedPair>> {
        self.outcomes.into_iter().collect()
    }
}

/// Evaluate and extrude every query independently.
///
/// A bad query only fails its own slot. An invalid `spec` (zero direction)
/// would fail every slot identically, so it is reported once as the outer
/// error instead.
#[instrument(skip(surface, queries), fields(count = queries.len()))]
pub fn extrude_surface<S>(
    surface: &S,
    queries: &[SurfaceQuery],
    spec: &ExtrusionSpec,
) -> Result<ExtrusionBatch>
where
    S: SurfaceEval + Sync,
{
    let shift = spec.offset_vector()?;
    let outcomes = map_each(queries, |q| surface.evaluate(*q).map(|p| offset_by(p, shift)));
    let batch = ExtrusionBatch { outcomes };
    let failed = batch.failures().count();
    if failed > 0 {
        debug!(failed, "some queries failed during extrusion");
    }
    Ok(batch)
}

/// Evaluate and extrude every query, stopping at the first failure.
pub fn try_extrude_surface<S>(
    surface: &S,
    queries: &[SurfaceQuery],
    spec: &ExtrusionSpec,
) -> Result<Vec<ExtrudedPair>>
where
    S: SurfaceEval,
{
    let shift = spec.offset_vector()?;
    queries
        .iter()
        .map(|q| surface.evaluate(*q).map(|p| offset_by(p, shift)))
        .collect()
}

/// Pairs for every query plus, when possible, the connecting faces.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtrusionOutput {
    pub batch: ExtrusionBatch,
    /// Present only when the queries form a regular lattice and all of them
    /// succeeded. Otherwise triangulation is left to the caller.
    pub shell: Option<ExtrudedShell>,
}

/// Extrude `queries` and, if the evaluated samples form a regular `(u, v)`
/// lattice, assemble base, offset and side faces between neighbouring ribs.
///
/// The lattice is recognized on the parameters actually used, so queries that
/// clamp onto the same row or column never produce a face list.
#[instrument(skip(surface, queries), fields(count = queries.len()))]
pub fn extrude_with_mesh<S>(
    surface: &S,
    queries: &[SurfaceQuery],
    spec: &ExtrusionSpec,
    options: MeshOptions,
) -> Result<ExtrusionOutput>
where
    S: SurfaceEval + Sync,
{
    let shift = spec.offset_vector()?;
    let batch = extrude_surface(surface, queries, spec)?;

    if !batch.is_complete() {
        warn!(
            failed = batch.failures().count(),
            "some samples failed, skipping face assembly"
        );
        return Ok(ExtrusionOutput { batch, shell: None });
    }

    let pairs: Vec<ExtrudedPair> = batch.pairs().copied().collect();
    let resolved: Vec<SurfaceQuery> = pairs.iter().map(|p| p.base.query()).collect();
    let Some(lattice) = detect_lattice(&resolved, &Tolerance::default()) else {
        debug!("samples are not a regular lattice, returning points only");
        return Ok(ExtrusionOutput { batch, shell: None });
    };

    let shell = assemble_shell(&pairs, lattice, shift, options);
    Ok(ExtrusionOutput {
        batch,
        shell: Some(shell),
    })
}

/// Sample `surface` on `grid`, extrude every sample and assemble the shell.
#[instrument(skip(surface))]
pub fn extrude_grid<S>(
    surface: &S,
    grid: SampleGrid,
    spec: &ExtrusionSpec,
    options: MeshOptions,
) -> Result<ExtrudedShell>
where
    S: SurfaceEval + Sync,
{
    let shift = spec.offset_vector()?;
    let pairs = extrude_surface(surface, &grid.queries(), spec)?.into_pairs()?;
    let shell = assemble_shell(&pairs, grid.lattice(), shift, options);
    info!(
        vertices = shell.vertex_count(),
        faces = shell.face_count(),
        "extruded sampled surface"
    );
    Ok(shell)
}
