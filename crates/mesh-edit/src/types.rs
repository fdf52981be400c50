//! Core edit mesh data types.

use hashbrown::{HashMap, HashSet};
use nalgebra::{Point3, Vector3};

use crate::error::{ElementKind, MeshError, MeshResult};
use crate::normals::newell_normal;

/// Stable index of a vertex in [`EditMesh::vertices`].
pub type VertexId = u32;

/// Stable index of an edge in [`EditMesh::edges`].
pub type EdgeId = u32;

/// Stable index of a face in [`EditMesh::faces`].
pub type FaceId = u32;

/// A vertex of the edit mesh.
///
/// Coordinates are unit-agnostic.
#[derive(Debug, Clone)]
pub struct Vertex {
    /// 3D position.
    pub position: Point3<f64>,

    /// Unit normal. Zero until normals are computed or assigned.
    pub normal: Vector3<f64>,

    /// Selection flag.
    pub select: bool,

    /// Edges using this vertex, in creation order.
    pub link_edges: Vec<EdgeId>,
}

impl Vertex {
    /// Create a new unselected vertex with only position set.
    #[inline]
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            normal: Vector3::zeros(),
            select: false,
            link_edges: Vec::new(),
        }
    }

    /// Create a vertex from raw coordinates.
    #[inline]
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }

    /// True if no edge uses this vertex.
    #[inline]
    pub fn is_loose(&self) -> bool {
        self.link_edges.is_empty()
    }
}

/// An edge between two vertices.
#[derive(Debug, Clone)]
pub struct Edge {
    /// Endpoints in the order the edge was created.
    pub vertices: [VertexId; 2],

    /// Selection flag.
    pub select: bool,

    /// Faces using this edge, in ascending face order.
    pub link_faces: Vec<FaceId>,
}

impl Edge {
    /// Create a new unselected edge with no incident faces.
    #[inline]
    pub fn new(a: VertexId, b: VertexId) -> Self {
        Self {
            vertices: [a, b],
            select: false,
            link_faces: Vec::new(),
        }
    }

    /// True if no face uses this edge.
    #[inline]
    pub fn is_wire(&self) -> bool {
        self.link_faces.is_empty()
    }

    /// True if exactly one face uses this edge.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.link_faces.len() == 1
    }

    /// The endpoint opposite `v`, if `v` is an endpoint.
    pub fn other_vertex(&self, v: VertexId) -> Option<VertexId> {
        match self.vertices {
            [a, b] if a == v => Some(b),
            [a, b] if b == v => Some(a),
            _ => None,
        }
    }
}

/// A polygon face.
#[derive(Debug, Clone)]
pub struct Face {
    /// Vertex loop with counter-clockwise winding seen from the front.
    pub vertices: Vec<VertexId>,

    /// Unit normal following the right-hand rule over the loop.
    pub normal: Vector3<f64>,

    /// Selection flag.
    pub select: bool,
}

impl Face {
    /// Iterate the loop's edges as `(from, to)` vertex pairs, closing the loop.
    pub fn edge_pairs(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Number of vertices in the loop.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// True if the loop has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Canonical key for the edge between `a` and `b`.
#[inline]
pub(crate) fn edge_key(a: VertexId, b: VertexId) -> (VertexId, VertexId) {
    if a < b { (a, b) } else { (b, a) }
}

/// An indexed polygon mesh carrying per-element selection state.
///
/// Vertices, edges and faces are addressed by stable indices. Vertex→edge and
/// edge→face incidence is kept on the elements themselves and maintained by
/// [`EditMesh::add_face`] and [`EditMesh::add_edge`]; after editing the
/// element vectors directly, call [`EditMesh::rebuild_links`].
#[derive(Debug, Clone, Default)]
pub struct EditMesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,

    /// Edge data.
    pub edges: Vec<Edge>,

    /// Face data.
    pub faces: Vec<Face>,

    pub(crate) edge_lookup: HashMap<(VertexId, VertexId), EdgeId>,
}

impl EditMesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            // Euler estimate for mostly-quad surfaces.
            edges: Vec::with_capacity(vertex_count + face_count),
            faces: Vec::with_capacity(face_count),
            edge_lookup: HashMap::with_capacity(vertex_count + face_count),
        }
    }

    /// Build a mesh from positions and polygon vertex loops, then compute normals.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_edit::EditMesh;
    ///
    /// let quad = EditMesh::from_polygons(
    ///     &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
    ///     &[vec![0, 1, 2, 3]],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(quad.edge_count(), 4);
    /// assert!((quad.faces[0].normal.z - 1.0).abs() < 1e-12);
    /// ```
    pub fn from_polygons(positions: &[[f64; 3]], polygons: &[Vec<VertexId>]) -> MeshResult<Self> {
        let mut mesh = Self::with_capacity(positions.len(), polygons.len());
        for &[x, y, z] in positions {
            mesh.add_vertex(Point3::new(x, y, z));
        }
        for polygon in polygons {
            mesh.add_face(polygon)?;
        }
        mesh.compute_normals();
        Ok(mesh)
    }

    /// Number of vertices in the mesh.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges in the mesh.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of faces in the mesh.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if mesh has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Append a vertex and return its index.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId {
        let id = self.vertices.len() as VertexId;
        self.vertices.push(Vertex::new(position));
        id
    }

    /// Add an edge between two vertices, or return the existing one.
    pub fn add_edge(&mut self, a: VertexId, b: VertexId) -> MeshResult<EdgeId> {
        let vertex_count = self.vertices.len();
        for v in [a, b] {
            if v as usize >= vertex_count {
                return Err(MeshError::invalid_vertex_index(
                    ElementKind::Edge,
                    self.edges.len(),
                    v,
                    vertex_count,
                ));
            }
        }
        if a == b {
            return Err(MeshError::invalid_topology(format!(
                "edge would connect vertex {} to itself",
                a
            )));
        }
        Ok(self.ensure_edge(a, b))
    }

    /// Append a polygon face and return its index.
    ///
    /// Missing edges are created; the face is registered as a link face of
    /// every edge of its loop. The face normal is computed from the current
    /// vertex positions.
    pub fn add_face(&mut self, vertices: &[VertexId]) -> MeshResult<FaceId> {
        let face_index = self.faces.len();
        let vertex_count = self.vertices.len();

        if vertices.len() < 3 {
            return Err(MeshError::invalid_topology(format!(
                "face {} has {} vertices, at least 3 are required",
                face_index,
                vertices.len()
            )));
        }

        for &v in vertices {
            if v as usize >= vertex_count {
                return Err(MeshError::invalid_vertex_index(
                    ElementKind::Face,
                    face_index,
                    v,
                    vertex_count,
                ));
            }
        }

        let mut seen = HashSet::with_capacity(vertices.len());
        if !vertices.iter().all(|v| seen.insert(*v)) {
            return Err(MeshError::invalid_topology(format!(
                "face {} uses a vertex more than once",
                face_index
            )));
        }

        let face_id = face_index as FaceId;
        let n = vertices.len();
        for i in 0..n {
            let edge = self.ensure_edge(vertices[i], vertices[(i + 1) % n]);
            self.edges[edge as usize].link_faces.push(face_id);
        }

        let normal = newell_normal(vertices.iter().map(|&v| self.vertices[v as usize].position))
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::zeros);

        self.faces.push(Face {
            vertices: vertices.to_vec(),
            normal,
            select: false,
        });

        Ok(face_id)
    }

    /// Look up the edge between two vertices.
    pub fn find_edge(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.edge_lookup.get(&edge_key(a, b)).copied()
    }

    pub(crate) fn ensure_edge(&mut self, a: VertexId, b: VertexId) -> EdgeId {
        let key = edge_key(a, b);
        if let Some(&edge) = self.edge_lookup.get(&key) {
            return edge;
        }

        let edge = self.edges.len() as EdgeId;
        self.edges.push(Edge::new(a, b));
        self.vertices[a as usize].link_edges.push(edge);
        self.vertices[b as usize].link_edges.push(edge);
        self.edge_lookup.insert(key, edge);
        edge
    }

    /// Compute the axis-aligned bounding box.
    /// Returns (min_corner, max_corner) or None if mesh is empty.
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.vertices.first()?.position;
        let mut min = first;
        let mut max = first;

        for vertex in &self.vertices[1..] {
            let p = &vertex.position;
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }

        Some((min, max))
    }

    /// Translate mesh by the given vector.
    pub fn translate(&mut self, offset: Vector3<f64>) {
        for vertex in &mut self.vertices {
            vertex.position += offset;
        }
    }
}
