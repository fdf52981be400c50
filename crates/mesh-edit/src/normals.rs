//! Face and vertex normal computation.

use nalgebra::{Point3, Vector3};
use tracing::debug;

use crate::types::EditMesh;

/// Unnormalized polygon normal by Newell's method.
///
/// The length equals twice the polygon area for planar loops, so summing
/// these vectors weights each face by its area. Works for non-planar and
/// concave loops where a single cross product would not.
pub fn newell_normal(loop_positions: impl IntoIterator<Item = Point3<f64>>) -> Vector3<f64> {
    let points: Vec<Point3<f64>> = loop_positions.into_iter().collect();
    let n = points.len();
    let mut normal = Vector3::zeros();

    for i in 0..n {
        let cur = &points[i];
        let next = &points[(i + 1) % n];
        normal.x += (cur.y - next.y) * (cur.z + next.z);
        normal.y += (cur.z - next.z) * (cur.x + next.x);
        normal.z += (cur.x - next.x) * (cur.y + next.y);
    }

    normal
}

/// Recompute all face normals, then vertex normals.
///
/// Vertex normals are the area-weighted average of incident face normals.
/// A vertex without incident faces keeps a non-zero prior normal; otherwise
/// it points away from the origin, and stays zero at the origin itself.
pub fn compute_normals(mesh: &mut EditMesh) {
    let mut accum: Vec<Vector3<f64>> = vec![Vector3::zeros(); mesh.vertices.len()];
    let mut has_face = vec![false; mesh.vertices.len()];

    for face in &mut mesh.faces {
        let weighted = newell_normal(
            face.vertices
                .iter()
                .map(|&v| mesh.vertices[v as usize].position),
        );
        face.normal = weighted
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::zeros);

        for &v in &face.vertices {
            accum[v as usize] += weighted;
            has_face[v as usize] = true;
        }
    }

    let mut loose = 0usize;
    for (idx, vertex) in mesh.vertices.iter_mut().enumerate() {
        if has_face[idx] {
            vertex.normal = accum[idx]
                .try_normalize(f64::EPSILON)
                .unwrap_or_else(Vector3::zeros);
        } else {
            loose += 1;
            vertex.normal = vertex
                .normal
                .try_normalize(f64::EPSILON)
                .or_else(|| vertex.position.coords.try_normalize(f64::EPSILON))
                .unwrap_or_else(Vector3::zeros);
        }
    }

    debug!(
        "Computed normals for {} faces and {} vertices ({} without faces)",
        mesh.faces.len(),
        mesh.vertices.len(),
        loose
    );
}
