use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::extrude::ExtrudedPair;
use super::sampling::Lattice;
use crate::geometry::point::Point3d;
use crate::geometry::vector::Vec3;

/// Which part of the extruded solid a face belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceKind {
    /// The sheet made of the evaluated surface points.
    Base,
    /// The translated copy of the base sheet.
    Offset,
    /// A wall joining a boundary edge of the base sheet to its offset.
    Side,
}

/// A quadrilateral face referencing four shell vertices.
///
/// Vertices are ordered so that `(v1 - v0) x (v3 - v0)` points out of the
/// solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuadFace {
    pub vertices: [usize; 4],
    pub kind: FaceKind,
}

/// Options for assembling faces from extruded samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshOptions {
    /// Emit side walls along the lattice boundary, closing the solid.
    /// Without them the result is two parallel open sheets.
    pub side_walls: bool,
}

impl Default for MeshOptions {
    fn default() -> Self {
        Self { side_walls: true }
    }
}

impl MeshOptions {
    pub fn closed() -> Self {
        Self { side_walls: true }
    }

    pub fn open() -> Self {
        Self { side_walls: false }
    }
}

/// Quad-faced shell built from a lattice of extruded samples.
///
/// Vertices `0 .. n` are the base points in lattice order, `n .. 2n` their
/// offsets, where `n = nu * nv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtrudedShell {
    pub vertices: Vec<Point3d>,
    pub faces: Vec<QuadFace>,
    pub lattice: Lattice,
    pub closed: bool,
}

impl ExtrudedShell {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn base_vertex(&self, i: usize, j: usize) -> usize {
        self.lattice.index(i, j)
    }

    pub fn offset_vertex(&self, i: usize, j: usize) -> usize {
        self.lattice.len() + self.lattice.index(i, j)
    }

    pub fn faces_of_kind(&self, kind: FaceKind) -> impl Iterator<Item = &QuadFace> + '_ {
        self.faces.iter().filter(move |f| f.kind == kind)
    }

    /// Area-weighted normal of a face (cross product of its diagonals, halved).
    pub fn face_area_vector(&self, face: &QuadFace) -> Vec3 {
        let [a, b, c, d] = face.vertices.map(|i| self.vertices[i]);
        (c - a).cross(&(d - b)) * 0.5
    }

    /// Unit outward normal of a face, `None` for a collapsed face.
    pub fn face_normal(&self, face: &QuadFace) -> Option<Vec3> {
        self.face_area_vector(face).normalized()
    }

    /// Enclosed volume by the divergence theorem, each quad split into two
    /// triangles. Positive for a correctly oriented closed shell; only
    /// meaningful when `closed` is true.
    pub fn signed_volume(&self) -> f64 {
        let tet = |a: Point3d, b: Point3d, c: Point3d| a.to_vec3().triple(&b.to_vec3(), &c.to_vec3());
        self.faces
            .iter()
            .map(|f| {
                let [a, b, c, d] = f.vertices.map(|i| self.vertices[i]);
                tet(a, b, c) + tet(a, c, d)
            })
            .sum::<f64>()
            / 6.0
    }
}

/// Assemble faces over `pairs` laid out as `lattice` (`u` outer, `v` inner).
///
/// `extrusion` is the offset applied to every sample; it decides which side
/// of the base sheet is "inside", so winding stays outward for either sign of
/// the distance and either orientation of the surface.
#[instrument(skip(pairs), fields(nu = lattice.nu(), nv = lattice.nv()))]
pub(crate) fn assemble_shell(
    pairs: &[ExtrudedPair],
    lattice: Lattice,
    extrusion: Vec3,
    options: MeshOptions,
) -> ExtrudedShell {
    debug_assert_eq!(pairs.len(), lattice.len());
    let n = lattice.len();
    let vertices: Vec<Point3d> = pairs
        .iter()
        .map(|p| p.base.point)
        .chain(pairs.iter().map(|p| p.offset.point))
        .collect();

    let base = |i: usize, j: usize| lattice.index(i, j);
    let offset = |i: usize, j: usize| n + lattice.index(i, j);

    // Orientation of the sampled surface relative to the extrusion.
    let mut area = Vec3::ZERO;
    for i in 0..lattice.nu() - 1 {
        for j in 0..lattice.nv() - 1 {
            let p00 = vertices[base(i, j)];
            let p10 = vertices[base(i + 1, j)];
            let p11 = vertices[base(i + 1, j + 1)];
            let p01 = vertices[base(i, j + 1)];
            area += (p11 - p00).cross(&(p01 - p10));
        }
    }
    let flip = area.dot(&extrusion) < 0.0;

    let mut faces = Vec::new();
    for i in 0..lattice.nu() - 1 {
        for j in 0..lattice.nv() - 1 {
            let top = [offset(i, j), offset(i + 1, j), offset(i + 1, j + 1), offset(i, j + 1)];
            let bottom = [base(i, j), base(i, j + 1), base(i + 1, j + 1), base(i + 1, j)];
            let (top, bottom) = if flip {
                (reversed(top), reversed(bottom))
            } else {
                (top, bottom)
            };
            faces.push(QuadFace {
                vertices: bottom,
                kind: FaceKind::Base,
            });
            faces.push(QuadFace {
                vertices: top,
                kind: FaceKind::Offset,
            });
        }
    }

    if options.side_walls {
        let walk = lattice.boundary();
        for (k, &(ai, aj)) in walk.iter().enumerate() {
            let (bi, bj) = walk[(k + 1) % walk.len()];
            let wall = [base(ai, aj), base(bi, bj), offset(bi, bj), offset(ai, aj)];
            faces.push(QuadFace {
                vertices: if flip { reversed(wall) } else { wall },
                kind: FaceKind::Side,
            });
        }
    }

    debug!(faces = faces.len(), flip, closed = options.side_walls, "assembled extruded shell");

    ExtrudedShell {
        vertices,
        faces,
        lattice,
        closed: options.side_walls,
    }
}

fn reversed([a, b, c, d]: [usize; 4]) -> [usize; 4] {
    [a, d, c, b]
}
