use serde::{Deserialize, Serialize};

use crate::Tolerance;
use crate::error::{KernelError, Result};
use crate::geometry::surface::SurfaceQuery;

/// An evenly spaced `nu x nv` lattice of queries over the unit square.
///
/// Queries are ordered `u` outer, `v` inner: index `i * nv + j` holds
/// `(i / (nu - 1), j / (nv - 1))`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleGrid {
    nu: usize,
    nv: usize,
}

impl SampleGrid {
    pub fn new(nu: usize, nv: usize) -> Result<Self> {
        if nu < 2 || nv < 2 {
            return Err(KernelError::InsufficientSamples { nu, nv });
        }
        Ok(Self { nu, nv })
    }

    pub fn nu(&self) -> usize {
        self.nu
    }

    pub fn nv(&self) -> usize {
        self.nv
    }

    pub fn len(&self) -> usize {
        self.nu * self.nv
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn lattice(&self) -> Lattice {
        Lattice::new(self.nu, self.nv)
    }

    pub fn queries(&self) -> Vec<SurfaceQuery> {
        let last_u = (self.nu - 1) as f64;
        let last_v = (self.nv - 1) as f64;
        (0..self.nu)
            .flat_map(|i| {
                (0..self.nv).map(move |j| SurfaceQuery::new(i as f64 / last_u, j as f64 / last_v))
            })
            .collect()
    }
}

/// Shape of a tensor lattice of queries (`u` outer, `v` inner).
///
/// Spacing need not be uniform; only the row/column structure matters for
/// deciding which samples are adjacent. Obtained from [`SampleGrid::lattice`]
/// or [`detect_lattice`], so both sides are always at least 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LatticeDef")]
pub struct Lattice {
    nu: usize,
    nv: usize,
}

#[derive(Deserialize)]
struct LatticeDef {
    nu: usize,
    nv: usize,
}

impl TryFrom<LatticeDef> for Lattice {
    type Error = KernelError;

    fn try_from(def: LatticeDef) -> Result<Self> {
        SampleGrid::new(def.nu, def.nv).map(|grid| grid.lattice())
    }
}

impl Lattice {
    pub(crate) fn new(nu: usize, nv: usize) -> Self {
        debug_assert!(nu >= 2 && nv >= 2);
        Self { nu, nv }
    }

    pub fn nu(&self) -> usize {
        self.nu
    }

    pub fn nv(&self) -> usize {
        self.nv
    }

    /// Flat index of sample `(i, j)`.
    pub fn index(&self, i: usize, j: usize) -> usize {
        i * self.nv + j
    }

    pub fn len(&self) -> usize {
        self.nu * self.nv
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Boundary sample indices `(i, j)` walked counter-clockwise in parameter
    /// space, starting at `(0, 0)`. The walk is closed implicitly.
    pub fn boundary(&self) -> Vec<(usize, usize)> {
        let (last_i, last_j) = (self.nu - 1, self.nv - 1);
        let mut walk = Vec::with_capacity(2 * (last_i + last_j));
        walk.extend((0..last_i).map(|i| (i, 0)));
        walk.extend((0..last_j).map(|j| (last_i, j)));
        walk.extend((1..=last_i).rev().map(|i| (i, last_j)));
        walk.extend((1..=last_j).rev().map(|j| (0, j)));
        walk
    }
}

/// Recognize a tensor lattice in an arbitrary query sequence.
///
/// Returns `None` unless the queries form at least a 2x2 lattice laid out
/// `u` outer / `v` inner with strictly increasing parameters along both axes.
pub fn detect_lattice(queries: &[SurfaceQuery], tolerance: &Tolerance) -> Option<Lattice> {
    let tol = tolerance.parametric;
    let first = queries.first()?;
    let nv = queries
        .iter()
        .take_while(|q| tolerance.params_equal(q.u, first.u))
        .count();
    if nv < 2 || queries.len() % nv != 0 {
        return None;
    }
    let nu = queries.len() / nv;
    if nu < 2 {
        return None;
    }

    let vs = &queries[..nv];
    if vs.windows(2).any(|w| w[1].v <= w[0].v + tol) {
        return None;
    }
    for (i, row) in queries.chunks_exact(nv).enumerate() {
        let u = row[0].u;
        if i > 0 && u <= queries[(i - 1) * nv].u + tol {
            return None;
        }
        let aligned = row
            .iter()
            .zip(vs)
            .all(|(q, col)| tolerance.params_equal(q.u, u) && tolerance.params_equal(q.v, col.v));
        if !aligned {
            return None;
        }
    }
    Some(Lattice::new(nu, nv))
}
