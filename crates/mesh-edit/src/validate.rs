//! Mesh validation and reporting.

use nalgebra::Point3;
use tracing::{debug, warn};

use crate::error::{ElementKind, MeshError, MeshResult};
use crate::selection::SelectionCounts;
use crate::types::EditMesh;

/// Options for mesh data validation.
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    /// Whether to reject the mesh on finding invalid data (default: true).
    /// If false, issues are counted but validation continues.
    pub reject_on_invalid: bool,
    /// Whether to reject faces whose normal could not be computed (default: false).
    pub reject_degenerate_faces: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            reject_on_invalid: true,
            reject_degenerate_faces: false,
        }
    }
}

impl ValidationOptions {
    /// Create options that count all issues without rejecting.
    pub fn collect_all() -> Self {
        Self {
            reject_on_invalid: false,
            reject_degenerate_faces: false,
        }
    }
}

/// Result of mesh data validation.
#[derive(Debug, Clone, Default)]
pub struct DataValidationResult {
    /// Number of out-of-range vertex references in faces and edges.
    pub invalid_index_count: usize,
    /// Number of NaN coordinates found.
    pub nan_count: usize,
    /// Number of infinite coordinates found.
    pub infinity_count: usize,
    /// Number of faces with a zero-length normal.
    pub degenerate_face_count: usize,
}

impl DataValidationResult {
    /// True if no invalid data was found.
    pub fn is_valid(&self) -> bool {
        self.invalid_index_count == 0 && self.nan_count == 0 && self.infinity_count == 0
    }
}

/// Check coordinates and element references before the mesh is operated on.
///
/// Element references that point outside the mesh are programming errors
/// for the editing operators; this is the place to reject them as data.
pub fn validate_mesh_data(
    mesh: &EditMesh,
    options: &ValidationOptions,
) -> MeshResult<DataValidationResult> {
    let mut result = DataValidationResult::default();
    let vertex_count = mesh.vertices.len();

    for (vertex_idx, vertex) in mesh.vertices.iter().enumerate() {
        let coords = [
            ("x", vertex.position.x),
            ("y", vertex.position.y),
            ("z", vertex.position.z),
        ];

        for (coord_name, value) in coords {
            if value.is_finite() {
                continue;
            }
            if value.is_nan() {
                result.nan_count += 1;
            } else {
                result.infinity_count += 1;
            }
            if options.reject_on_invalid {
                return Err(MeshError::invalid_coordinate(vertex_idx, coord_name, value));
            }
        }
    }

    for (edge_idx, edge) in mesh.edges.iter().enumerate() {
        for &v in &edge.vertices {
            if v as usize >= vertex_count {
                result.invalid_index_count += 1;
                if options.reject_on_invalid {
                    return Err(MeshError::invalid_vertex_index(
                        ElementKind::Edge,
                        edge_idx,
                        v,
                        vertex_count,
                    ));
                }
            }
        }
    }

    for (face_idx, face) in mesh.faces.iter().enumerate() {
        if face.vertices.len() < 3 {
            return Err(MeshError::invalid_topology(format!(
                "face {} has {} vertices, at least 3 are required",
                face_idx,
                face.vertices.len()
            )));
        }
        for &v in &face.vertices {
            if v as usize >= vertex_count {
                result.invalid_index_count += 1;
                if options.reject_on_invalid {
                    return Err(MeshError::invalid_vertex_index(
                        ElementKind::Face,
                        face_idx,
                        v,
                        vertex_count,
                    ));
                }
            }
        }
        if face.normal.norm_squared() <= f64::EPSILON {
            result.degenerate_face_count += 1;
            if options.reject_degenerate_faces {
                return Err(MeshError::invalid_topology(format!(
                    "face {} is degenerate (zero-length normal)",
                    face_idx
                )));
            }
        }
    }

    if result.degenerate_face_count > 0 {
        warn!(
            "Mesh has {} degenerate faces; offsets along their normals will be zero",
            result.degenerate_face_count
        );
    }

    Ok(result)
}

/// Summary report for an edit mesh.
#[derive(Debug, Clone)]
pub struct MeshReport {
    /// Total vertex count.
    pub vertex_count: usize,
    /// Total edge count.
    pub edge_count: usize,
    /// Total face count.
    pub face_count: usize,
    /// Edges with exactly one face.
    pub boundary_edge_count: usize,
    /// Edges with no face.
    pub wire_edge_count: usize,
    /// Edges with more than two faces.
    pub non_manifold_edge_count: usize,
    /// Vertices with no edge.
    pub loose_vertex_count: usize,
    /// Selected elements.
    pub selection: SelectionCounts,
    /// Bounding box as (min_corner, max_corner).
    pub bounds: Option<(Point3<f64>, Point3<f64>)>,
}

impl MeshReport {
    /// Check if every edge has at most two faces.
    pub fn is_manifold(&self) -> bool {
        self.non_manifold_edge_count == 0
    }
}

impl std::fmt::Display for MeshReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Mesh Report:")?;
        writeln!(f, "  Vertices: {} ({} loose)", self.vertex_count, self.loose_vertex_count)?;
        writeln!(f, "  Edges: {} ({} wire, {} boundary)", self.edge_count, self.wire_edge_count, self.boundary_edge_count)?;
        writeln!(f, "  Faces: {}", self.face_count)?;

        if let Some((min, max)) = &self.bounds {
            writeln!(
                f,
                "  Bounds: [{:.3}, {:.3}, {:.3}] to [{:.3}, {:.3}, {:.3}]",
                min.x, min.y, min.z, max.x, max.y, max.z
            )?;
        }

        writeln!(
            f,
            "  Manifold: {} (non-manifold edges: {})",
            if self.is_manifold() { "yes" } else { "NO" },
            self.non_manifold_edge_count
        )?;

        writeln!(
            f,
            "  Selected: {} vertices, {} edges, {} faces",
            self.selection.vertices, self.selection.edges, self.selection.faces
        )?;

        Ok(())
    }
}

/// Build a summary report for a mesh.
pub fn mesh_report(mesh: &EditMesh) -> MeshReport {
    let report = MeshReport {
        vertex_count: mesh.vertex_count(),
        edge_count: mesh.edge_count(),
        face_count: mesh.face_count(),
        boundary_edge_count: mesh.boundary_edges().count(),
        wire_edge_count: mesh.wire_edges().count(),
        non_manifold_edge_count: mesh.non_manifold_edges().count(),
        loose_vertex_count: mesh.loose_vertices().count(),
        selection: mesh.selection_counts(),
        bounds: mesh.bounds(),
    };

    debug!("{}", report);
    report
}
