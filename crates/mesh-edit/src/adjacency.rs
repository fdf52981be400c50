//! Incidence maintenance and topology queries.
//!
//! The edit mesh stores its incidence on the elements themselves
//! (`Vertex::link_edges`, `Edge::link_faces`), so queries here are direct
//! lookups rather than a separately built table.

use tracing::debug;

use crate::types::{EdgeId, EditMesh, VertexId, edge_key};

impl EditMesh {
    /// Rebuild vertex→edge and edge→face incidence from the element vectors.
    ///
    /// Existing edges keep their indices and selection flags. Edges missing
    /// from a face loop are appended. Duplicate edges between the same pair
    /// of vertices are kept but only the first is used for face incidence.
    pub fn rebuild_links(&mut self) {
        self.edge_lookup.clear();
        for vertex in &mut self.vertices {
            vertex.link_edges.clear();
        }

        for (idx, edge) in self.edges.iter_mut().enumerate() {
            edge.link_faces.clear();
            let [a, b] = edge.vertices;
            self.vertices[a as usize].link_edges.push(idx as EdgeId);
            self.vertices[b as usize].link_edges.push(idx as EdgeId);
            self.edge_lookup.entry(edge_key(a, b)).or_insert(idx as EdgeId);
        }

        let before = self.edges.len();
        for face_idx in 0..self.faces.len() {
            let n = self.faces[face_idx].vertices.len();
            for i in 0..n {
                let a = self.faces[face_idx].vertices[i];
                let b = self.faces[face_idx].vertices[(i + 1) % n];
                let edge = self.ensure_edge(a, b);
                self.edges[edge as usize].link_faces.push(face_idx as u32);
            }
        }

        debug!(
            "Rebuilt incidence: {} edges ({} added), {} faces",
            self.edges.len(),
            self.edges.len() - before,
            self.faces.len()
        );
    }

    /// Edges used by exactly one face.
    pub fn boundary_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_boundary())
            .map(|(i, _)| i as EdgeId)
    }

    /// Edges used by no face.
    pub fn wire_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_wire())
            .map(|(i, _)| i as EdgeId)
    }

    /// Edges used by more than two faces.
    pub fn non_manifold_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.link_faces.len() > 2)
            .map(|(i, _)| i as EdgeId)
    }

    /// Vertices used by no edge.
    pub fn loose_vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_loose())
            .map(|(i, _)| i as VertexId)
    }

    /// Check if every edge has at most two faces.
    pub fn is_manifold(&self) -> bool {
        self.edges.iter().all(|e| e.link_faces.len() <= 2)
    }

    /// Check if the surface is closed (every edge has at least two faces).
    pub fn is_watertight(&self) -> bool {
        !self.edges.is_empty() && self.edges.iter().all(|e| e.link_faces.len() >= 2)
    }

    /// Faces using a vertex, gathered through its edges, ascending and unique.
    pub fn vertex_faces(&self, vertex: VertexId) -> Vec<u32> {
        let mut faces: Vec<u32> = self.vertices[vertex as usize]
            .link_edges
            .iter()
            .flat_map(|&e| self.edges[e as usize].link_faces.iter().copied())
            .collect();
        faces.sort_unstable();
        faces.dedup();
        faces
    }
}
