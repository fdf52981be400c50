//! Element selection state.
//!
//! Selection flags live on the elements. Selecting an element never touches
//! its neighbours unless [`EditMesh::flush_selection`] is called, so callers
//! can express "this edge, but not its faces" precisely.

use tracing::debug;

use crate::error::{ElementKind, MeshError, MeshResult};
use crate::types::{EdgeId, EditMesh, FaceId, VertexId};

/// Number of selected elements of each kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionCounts {
    pub vertices: usize,
    pub edges: usize,
    pub faces: usize,
}

impl SelectionCounts {
    /// True if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.vertices == 0 && self.edges == 0 && self.faces == 0
    }
}

impl EditMesh {
    /// Set the selection flag of a vertex.
    pub fn set_vertex_selected(&mut self, vertex: VertexId, select: bool) -> MeshResult<()> {
        let count = self.vertices.len();
        let v = self
            .vertices
            .get_mut(vertex as usize)
            .ok_or_else(|| MeshError::element_out_of_range(ElementKind::Vertex, vertex as usize, count))?;
        v.select = select;
        Ok(())
    }

    /// Set the selection flag of an edge.
    pub fn set_edge_selected(&mut self, edge: EdgeId, select: bool) -> MeshResult<()> {
        let count = self.edges.len();
        let e = self
            .edges
            .get_mut(edge as usize)
            .ok_or_else(|| MeshError::element_out_of_range(ElementKind::Edge, edge as usize, count))?;
        e.select = select;
        Ok(())
    }

    /// Set the selection flag of a face.
    pub fn set_face_selected(&mut self, face: FaceId, select: bool) -> MeshResult<()> {
        let count = self.faces.len();
        let f = self
            .faces
            .get_mut(face as usize)
            .ok_or_else(|| MeshError::element_out_of_range(ElementKind::Face, face as usize, count))?;
        f.select = select;
        Ok(())
    }

    /// Select the edge between two vertices.
    pub fn select_edge_between(&mut self, a: VertexId, b: VertexId) -> MeshResult<EdgeId> {
        let edge = self.find_edge(a, b).ok_or_else(|| {
            MeshError::invalid_topology(format!("no edge between vertices {} and {}", a, b))
        })?;
        self.edges[edge as usize].select = true;
        Ok(edge)
    }

    /// Select every vertex, edge and face.
    pub fn select_all(&mut self) {
        self.vertices.iter_mut().for_each(|v| v.select = true);
        self.edges.iter_mut().for_each(|e| e.select = true);
        self.faces.iter_mut().for_each(|f| f.select = true);
    }

    /// Clear every selection flag.
    pub fn deselect_all(&mut self) {
        self.vertices.iter_mut().for_each(|v| v.select = false);
        self.edges.iter_mut().for_each(|e| e.select = false);
        self.faces.iter_mut().for_each(|f| f.select = false);
    }

    /// Propagate selection downwards: a selected face selects its edges and
    /// vertices, a selected edge selects its vertices.
    pub fn flush_selection(&mut self) {
        let mut edges_to_select = Vec::new();
        for face in self.faces.iter().filter(|f| f.select) {
            for (a, b) in face.edge_pairs() {
                if let Some(edge) = self.find_edge(a, b) {
                    edges_to_select.push(edge);
                }
            }
        }
        for edge in edges_to_select {
            self.edges[edge as usize].select = true;
        }

        for idx in 0..self.edges.len() {
            if self.edges[idx].select {
                let [a, b] = self.edges[idx].vertices;
                self.vertices[a as usize].select = true;
                self.vertices[b as usize].select = true;
            }
        }

        debug!("Flushed selection: {:?}", self.selection_counts());
    }

    /// Indices of selected vertices, ascending.
    pub fn selected_vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.select)
            .map(|(i, _)| i as VertexId)
    }

    /// Indices of selected edges, ascending.
    pub fn selected_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.select)
            .map(|(i, _)| i as EdgeId)
    }

    /// Indices of selected faces, ascending.
    pub fn selected_faces(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.faces
            .iter()
            .enumerate()
            .filter(|(_, f)| f.select)
            .map(|(i, _)| i as FaceId)
    }

    /// Count selected elements of each kind.
    pub fn selection_counts(&self) -> SelectionCounts {
        SelectionCounts {
            vertices: self.vertices.iter().filter(|v| v.select).count(),
            edges: self.edges.iter().filter(|e| e.select).count(),
            faces: self.faces.iter().filter(|f| f.select).count(),
        }
    }
}
