//! Capability traits between the displacement calculator and its host mesh.
//!
//! The calculator only needs read access to selection, normals and
//! incidence, write access to vertex positions, and two notifications back
//! to the host. Any mesh representation can be displaced by implementing
//! these traits; [`EditMesh`] implements all three.
//!
//! Element ids passed to these methods come from the mesh itself. An id out
//! of range is a host bug and implementations may panic on it.

use mesh_edit::{EdgeId, EditMesh, FaceId, VertexId};
use nalgebra::{Point3, Vector3};

/// Read-only view of a polygon mesh.
pub trait MeshView {
    /// Number of vertices.
    fn vertex_count(&self) -> usize;
    /// Number of edges.
    fn edge_count(&self) -> usize;
    /// Number of faces.
    fn face_count(&self) -> usize;

    fn vertex_selected(&self, vertex: VertexId) -> bool;
    fn edge_selected(&self, edge: EdgeId) -> bool;
    fn face_selected(&self, face: FaceId) -> bool;

    /// Unit vertex normal.
    fn vertex_normal(&self, vertex: VertexId) -> Vector3<f64>;
    /// Unit face normal.
    fn face_normal(&self, face: FaceId) -> Vector3<f64>;

    /// Edges using a vertex.
    fn vertex_edges(&self, vertex: VertexId) -> &[EdgeId];
    /// Endpoints of an edge, in stored order.
    fn edge_vertices(&self, edge: EdgeId) -> [VertexId; 2];
    /// Faces using an edge, ascending.
    fn edge_faces(&self, edge: EdgeId) -> &[FaceId];
    /// Vertex loop of a face.
    fn face_vertices(&self, face: FaceId) -> &[VertexId];
}

/// Position access for the apply step.
pub trait MeshWrite {
    fn vertex_position(&self, vertex: VertexId) -> Point3<f64>;
    /// Move a vertex by `offset`.
    fn translate_vertex(&mut self, vertex: VertexId, offset: Vector3<f64>);
}

/// A mesh the displacement operator can run against.
pub trait DisplaceHost: MeshView + MeshWrite {
    /// Recompute face and vertex normals after positions changed.
    fn update_normals(&mut self);

    /// Notify the host that the mesh should be redrawn.
    ///
    /// Called once after every completed displacement. Hosts without a view
    /// keep the default no-op.
    fn tag_redraw(&mut self) {}
}

impl MeshView for EditMesh {
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn vertex_selected(&self, vertex: VertexId) -> bool {
        self.vertices[vertex as usize].select
    }

    fn edge_selected(&self, edge: EdgeId) -> bool {
        self.edges[edge as usize].select
    }

    fn face_selected(&self, face: FaceId) -> bool {
        self.faces[face as usize].select
    }

    fn vertex_normal(&self, vertex: VertexId) -> Vector3<f64> {
        self.vertices[vertex as usize].normal
    }

    fn face_normal(&self, face: FaceId) -> Vector3<f64> {
        self.faces[face as usize].normal
    }

    fn vertex_edges(&self, vertex: VertexId) -> &[EdgeId] {
        &self.vertices[vertex as usize].link_edges
    }

    fn edge_vertices(&self, edge: EdgeId) -> [VertexId; 2] {
        self.edges[edge as usize].vertices
    }

    fn edge_faces(&self, edge: EdgeId) -> &[FaceId] {
        &self.edges[edge as usize].link_faces
    }

    fn face_vertices(&self, face: FaceId) -> &[VertexId] {
        &self.faces[face as usize].vertices
    }
}

impl MeshWrite for EditMesh {
    fn vertex_position(&self, vertex: VertexId) -> Point3<f64> {
        self.vertices[vertex as usize].position
    }

    fn translate_vertex(&mut self, vertex: VertexId, offset: Vector3<f64>) {
        self.vertices[vertex as usize].position += offset;
    }
}

impl DisplaceHost for EditMesh {
    fn update_normals(&mut self) {
        self.compute_normals();
    }
}
