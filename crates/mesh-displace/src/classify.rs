//! Selection classification.
//!
//! A selected element implies its lower-order parts are selected too, so
//! those parts must not be displaced a second time on their own: a vertex
//! is skipped when any of its edges is selected, and an edge is skipped when
//! any of its faces is selected. Faces are always processed.

use mesh_edit::{EdgeId, FaceId, VertexId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::access::MeshView;

/// Counts of classified and suppressed elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationStats {
    /// Selected vertices processed on their own.
    pub vertices: usize,
    /// Selected edges processed on their own.
    pub edges: usize,
    /// Selected faces.
    pub faces: usize,
    /// Selected vertices suppressed by a selected edge.
    pub skipped_vertices: usize,
    /// Selected edges suppressed by a selected face.
    pub skipped_edges: usize,
}

/// The selection partitioned into per-kind work lists, each ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub faces: Vec<FaceId>,
    pub edges: Vec<EdgeId>,
    pub vertices: Vec<VertexId>,
    pub stats: ClassificationStats,
}

impl Classification {
    /// True if there is nothing to displace.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty() && self.edges.is_empty() && self.vertices.is_empty()
    }
}

/// Partition the mesh's selection into face, edge and vertex work.
pub fn classify_selection<M: MeshView + ?Sized>(mesh: &M) -> Classification {
    let mut result = Classification::default();

    for face in 0..mesh.face_count() as FaceId {
        if mesh.face_selected(face) {
            result.faces.push(face);
        }
    }

    for edge in 0..mesh.edge_count() as EdgeId {
        if !mesh.edge_selected(edge) {
            continue;
        }
        if mesh.edge_faces(edge).iter().any(|&f| mesh.face_selected(f)) {
            result.stats.skipped_edges += 1;
        } else {
            result.edges.push(edge);
        }
    }

    for vertex in 0..mesh.vertex_count() as VertexId {
        if !mesh.vertex_selected(vertex) {
            continue;
        }
        if mesh.vertex_edges(vertex).iter().any(|&e| mesh.edge_selected(e)) {
            result.stats.skipped_vertices += 1;
        } else {
            result.vertices.push(vertex);
        }
    }

    result.stats.faces = result.faces.len();
    result.stats.edges = result.edges.len();
    result.stats.vertices = result.vertices.len();

    debug!(
        faces = result.stats.faces,
        edges = result.stats.edges,
        vertices = result.stats.vertices,
        skipped_edges = result.stats.skipped_edges,
        skipped_vertices = result.stats.skipped_vertices,
        "Classified selection"
    );

    result
}
