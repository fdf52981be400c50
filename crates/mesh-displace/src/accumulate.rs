//! Per-vertex normal accumulation.
//!
//! Every (selected element, incident vertex, normal) triple yields one
//! contribution: the normal scaled by the signed distance. Contributions are
//! never merged or deduplicated here; a vertex shared by two selected faces
//! receives two contributions even if the faces are coplanar.

use hashbrown::HashMap;
use mesh_edit::VertexId;
use nalgebra::Vector3;
use tracing::debug;

use crate::access::MeshView;
use crate::classify::Classification;

/// Contributions per vertex, in emission order.
///
/// Vertices iterate in the order they were first touched, and each vertex's
/// contributions keep the order they were pushed. The first contribution of
/// a vertex is the reference direction of the offset resolver.
#[derive(Debug, Clone, Default)]
pub struct ContributionMap {
    slots: HashMap<VertexId, usize>,
    entries: Vec<(VertexId, Vec<Vector3<f64>>)>,
    total: usize,
}

impl ContributionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a contribution for a vertex.
    pub fn push(&mut self, vertex: VertexId, contribution: Vector3<f64>) {
        let slot = *self.slots.entry(vertex).or_insert_with(|| {
            self.entries.push((vertex, Vec::with_capacity(1)));
            self.entries.len() - 1
        });
        self.entries[slot].1.push(contribution);
        self.total += 1;
    }

    /// Contributions recorded for one vertex.
    pub fn get(&self, vertex: VertexId) -> Option<&[Vector3<f64>]> {
        self.slots
            .get(&vertex)
            .map(|&slot| self.entries[slot].1.as_slice())
    }

    /// Iterate `(vertex, contributions)` in first-touch order.
    pub fn iter(&self) -> impl Iterator<Item = (VertexId, &[Vector3<f64>])> + '_ {
        self.entries.iter().map(|(v, c)| (*v, c.as_slice()))
    }

    /// Number of distinct vertices.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of contributions over all vertices.
    pub fn contribution_count(&self) -> usize {
        self.total
    }
}

/// Collect scaled normal contributions for a classified selection.
///
/// Faces are visited first, then edges, then vertices, each in ascending id
/// order. An edge contributes the normal of each of its faces to both
/// endpoints; an edge without faces contributes nothing.
pub fn accumulate_contributions<M: MeshView + ?Sized>(
    mesh: &M,
    classification: &Classification,
    distance: f64,
) -> ContributionMap {
    let mut map = ContributionMap::new();

    for &face in &classification.faces {
        let scaled = mesh.face_normal(face) * distance;
        for &vertex in mesh.face_vertices(face) {
            map.push(vertex, scaled);
        }
    }

    let mut wire_edges = 0usize;
    for &edge in &classification.edges {
        let link_faces = mesh.edge_faces(edge);
        if link_faces.is_empty() {
            wire_edges += 1;
            continue;
        }
        for vertex in mesh.edge_vertices(edge) {
            for &face in link_faces {
                map.push(vertex, mesh.face_normal(face) * distance);
            }
        }
    }

    for &vertex in &classification.vertices {
        map.push(vertex, mesh.vertex_normal(vertex) * distance);
    }

    if wire_edges > 0 {
        debug!("{} selected edges have no faces and contribute no offset", wire_edges);
    }
    debug!(
        vertices = map.len(),
        contributions = map.contribution_count(),
        "Accumulated normal contributions"
    );

    map
}
