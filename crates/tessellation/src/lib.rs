use bezier_kernel::geometry::point::Point3d;
use bezier_kernel::geometry::vector::Vec3;
use bezier_kernel::{ExtrudedShell, Result, SampleGrid, SurfaceEval};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// A triangle mesh for rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriangleMesh {
    /// Vertex positions [x, y, z, x, y, z, ...]
    pub positions: Vec<f32>,
    /// Vertex normals [nx, ny, nz, ...]
    pub normals: Vec<f32>,
    /// Triangle indices [i0, i1, i2, ...]
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn add_vertex(&mut self, pos: Point3d, normal: Vec3) -> u32 {
        let idx = self.vertex_count() as u32;
        self.positions.extend(pos.to_array().map(|c| c as f32));
        self.normals.extend(normal.to_array().map(|c| c as f32));
        idx
    }

    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.extend([i0, i1, i2]);
    }

    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.vertex_count() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.indices.extend(other.indices.iter().map(|&idx| idx + offset));
    }
}

/// Flat-shaded triangulation of an extruded shell.
///
/// Every quad gets its own four vertices carrying the face normal and is
/// split along its `v0 - v2` diagonal. Collapsed quads are dropped.
#[instrument(skip(shell), fields(faces = shell.face_count()))]
pub fn tessellate_shell(shell: &ExtrudedShell) -> TriangleMesh {
    let mut mesh = TriangleMesh::new();
    let mut skipped = 0usize;

    for face in &shell.faces {
        let Some(normal) = shell.face_normal(face) else {
            skipped += 1;
            continue;
        };
        let [a, b, c, d] = face.vertices.map(|i| mesh.add_vertex(shell.vertices[i], normal));
        mesh.add_triangle(a, b, c);
        mesh.add_triangle(a, c, d);
    }

    if skipped > 0 {
        debug!(skipped, "dropped collapsed faces");
    }
    mesh
}

/// Tessellate a parametric surface by sampling an `nu x nv` grid over the
/// unit square.
///
/// Vertex normals come from the surface. Where it has none (a collapsed edge
/// or a cusp) the normal is estimated from the neighbouring samples.
#[instrument(skip(surface))]
pub fn tessellate_surface<S: SurfaceEval>(
    surface: &S,
    nu: usize,
    nv: usize,
) -> Result<TriangleMesh> {
    let samples = SampleGrid::new(nu, nv)?;
    let lattice = samples.lattice();
    let queries = samples.queries();

    let positions = queries
        .iter()
        .map(|q| surface.evaluate(*q).map(|p| p.point))
        .collect::<Result<Vec<_>>>()?;

    let mut mesh = TriangleMesh::new();
    let mut estimated = 0usize;
    for i in 0..nu {
        for j in 0..nv {
            let k = lattice.index(i, j);
            let normal = match surface.normal_at(queries[k])? {
                Some(n) => n,
                None => {
                    estimated += 1;
                    neighbour_normal(&positions, nu, nv, i, j)
                }
            };
            mesh.add_vertex(positions[k], normal);
        }
    }

    for i in 0..nu - 1 {
        for j in 0..nv - 1 {
            let i00 = lattice.index(i, j) as u32;
            let i10 = lattice.index(i + 1, j) as u32;
            let i01 = lattice.index(i, j + 1) as u32;
            let i11 = lattice.index(i + 1, j + 1) as u32;

            mesh.add_triangle(i00, i10, i11);
            mesh.add_triangle(i00, i11, i01);
        }
    }

    if estimated > 0 {
        debug!(estimated, "estimated normals at degenerate samples");
    }
    Ok(mesh)
}

/// Area-weighted normal of the quads around sample `(i, j)`, +Z if they are
/// all collapsed.
fn neighbour_normal(positions: &[Point3d], nu: usize, nv: usize, i: usize, j: usize) -> Vec3 {
    let at = |i: usize, j: usize| positions[i * nv + j];
    let mut sum = Vec3::ZERO;
    for qi in i.saturating_sub(1)..=i.min(nu - 2) {
        for qj in j.saturating_sub(1)..=j.min(nv - 2) {
            let diagonal = at(qi + 1, qj + 1) - at(qi, qj);
            let cross_diagonal = at(qi, qj + 1) - at(qi + 1, qj);
            sum += diagonal.cross(&cross_diagonal);
        }
    }
    sum.normalized().unwrap_or(Vec3::Z)
}
