//! Indexed polygon edit mesh with per-element selection.
//!
//! This crate provides the mesh model that editing operators work on:
//! vertices, edges and polygon faces addressed by stable indices, with
//! vertex→edge and edge→face incidence, selection flags on every element,
//! and face and vertex normals.
//!
//! # Features
//!
//! - **Model**: [`EditMesh`] with polygon faces and wire edges
//! - **Normals**: Newell face normals, area-weighted vertex normals
//! - **Selection**: per-element flags, flushing, counts
//! - **Validation**: coordinate and index checks, a summary [`MeshReport`]
//! - **File I/O**: OBJ, with vertex, face and wire-edge order preserved
//!
//! # Coordinate System
//!
//! The library uses a **right-handed coordinate system** and is
//! unit-agnostic. Face winding is **counter-clockwise (CCW) seen from the
//! front**; normals follow the right-hand rule over the vertex loop.
//!
//! # Quick Start
//!
//! ```no_run
//! use mesh_edit::EditMesh;
//!
//! let mut mesh = EditMesh::load("panel.obj").unwrap();
//! mesh.set_face_selected(0, true).unwrap();
//! mesh.flush_selection();
//!
//! println!("{}", mesh.report());
//! mesh.save("panel_selected.obj").unwrap();
//! ```
//!
//! # Error Handling
//!
//! Fallible operations return [`MeshResult`]. Every [`MeshError`] carries an
//! [`ErrorCode`] (`MESH-XXXX`), a [`RecoverySuggestion`] and, where it
//! applies, a [`MeshLocation`]. Errors implement `miette::Diagnostic`.

mod error;
mod types;

pub mod adjacency;
pub mod io;
pub mod normals;
pub mod selection;
pub mod tracing_ext;
pub mod validate;

pub use error::{
    ElementKind, ErrorCode, MeshError, MeshLocation, MeshResult, RecoverySuggestion,
};
pub use types::{Edge, EdgeId, EditMesh, Face, FaceId, Vertex, VertexId};

pub use io::{MeshFormat, load_mesh, save_mesh, save_obj};
pub use normals::{compute_normals, newell_normal};
pub use selection::SelectionCounts;
pub use validate::{
    DataValidationResult, MeshReport, ValidationOptions, mesh_report, validate_mesh_data,
};

impl EditMesh {
    /// Load a mesh from a file, auto-detecting format from extension.
    pub fn load(path: impl AsRef<std::path::Path>) -> MeshResult<Self> {
        io::load_mesh(path.as_ref())
    }

    /// Save the mesh to a file, auto-detecting format from extension.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> MeshResult<()> {
        io::save_mesh(self, path.as_ref())
    }

    /// Summarize counts, topology and selection.
    pub fn report(&self) -> MeshReport {
        validate::mesh_report(self)
    }

    /// Check coordinates and element references with default options.
    pub fn validate(&self) -> MeshResult<DataValidationResult> {
        validate::validate_mesh_data(self, &ValidationOptions::default())
    }

    /// Recompute face normals, then area-weighted vertex normals.
    pub fn compute_normals(&mut self) {
        normals::compute_normals(self)
    }
}
