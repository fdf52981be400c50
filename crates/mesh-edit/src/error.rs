// Allow unused_assignments lint for error struct fields that are used in thiserror Display macros
// but appear as "never read" to the compiler.
#![allow(unused_assignments)]

//! Error types for edit mesh operations with rich diagnostics.
//!
//! Each error carries:
//! - A machine-readable code (`MESH-XXXX`)
//! - Location information where one exists (vertex, edge, face, file)
//! - A recovery suggestion
//!
//! # Error Codes
//!
//! - `MESH-1xxx`: I/O errors (file reading, writing, parsing)
//! - `MESH-2xxx`: Validation errors (topology, coordinates, element references)
//! - `MESH-4xxx`: Format errors

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;

/// Machine-readable error codes for mesh operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// MESH-1001: Failed to read file
    IoRead = 1001,
    /// MESH-1002: Failed to write file
    IoWrite = 1002,
    /// MESH-1003: Failed to parse file format
    ParseError = 1003,

    /// MESH-2001: Face or edge references invalid vertex index
    InvalidVertexIndex = 2001,
    /// MESH-2002: Vertex has NaN or Infinity coordinate
    InvalidCoordinate = 2002,
    /// MESH-2003: Mesh has no vertices
    EmptyMesh = 2003,
    /// MESH-2004: Invalid mesh topology
    InvalidTopology = 2004,
    /// MESH-2005: Element index outside the mesh
    ElementOutOfRange = 2005,

    /// MESH-4001: Unsupported file format
    UnsupportedFormat = 4001,
}

impl ErrorCode {
    /// Returns the error code as a string in the format `MESH-XXXX`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::IoRead => "MESH-1001",
            ErrorCode::IoWrite => "MESH-1002",
            ErrorCode::ParseError => "MESH-1003",
            ErrorCode::InvalidVertexIndex => "MESH-2001",
            ErrorCode::InvalidCoordinate => "MESH-2002",
            ErrorCode::EmptyMesh => "MESH-2003",
            ErrorCode::InvalidTopology => "MESH-2004",
            ErrorCode::ElementOutOfRange => "MESH-2005",
            ErrorCode::UnsupportedFormat => "MESH-4001",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of mesh element, used in element-related errors and locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Vertex,
    Edge,
    Face,
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementKind::Vertex => write!(f, "vertex"),
            ElementKind::Edge => write!(f, "edge"),
            ElementKind::Face => write!(f, "face"),
        }
    }
}

/// Recovery suggestions for mesh errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoverySuggestion {
    /// Re-export the file from the original software.
    ReexportFile { format: Option<String> },
    /// Use a different file format.
    UseDifferentFormat { suggested: Vec<String> },
    /// Check the original mesh or file for issues.
    CheckSourceMesh { checks: Vec<String> },
    /// Check the element selection passed to the operation.
    CheckSelection { kind: ElementKind, count: usize },
    /// No automatic recovery available.
    None,
}

impl std::fmt::Display for RecoverySuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecoverySuggestion::ReexportFile { format } => {
                if let Some(fmt) = format {
                    write!(
                        f,
                        "Try re-exporting the mesh as {} from the original software",
                        fmt
                    )
                } else {
                    write!(f, "Try re-exporting the mesh from the original software")
                }
            }
            RecoverySuggestion::UseDifferentFormat { suggested } => {
                write!(f, "Try using a different format: {}", suggested.join(", "))
            }
            RecoverySuggestion::CheckSourceMesh { checks } => {
                write!(f, "Check the source mesh for: {}", checks.join(", "))
            }
            RecoverySuggestion::CheckSelection { kind, count } => {
                if *count == 0 {
                    write!(f, "The mesh has no {} elements to select", kind)
                } else {
                    write!(
                        f,
                        "Select {} indices in the range 0..{} (run `mesh info` to list counts)",
                        kind, count
                    )
                }
            }
            RecoverySuggestion::None => {
                write!(f, "No automatic recovery available")
            }
        }
    }
}

/// Location information for mesh errors.
#[derive(Debug, Clone)]
pub enum MeshLocation {
    /// Error at a specific vertex.
    Vertex {
        index: usize,
        position: Option<[f64; 3]>,
    },
    /// Error at a specific edge.
    Edge { index: usize },
    /// Error at a specific face.
    Face { index: usize },
    /// Error in a file at a specific location.
    File { path: PathBuf, line: Option<usize> },
}

impl std::fmt::Display for MeshLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshLocation::Vertex { index, position } => {
                if let Some([x, y, z]) = position {
                    write!(f, "vertex {} at ({:.3}, {:.3}, {:.3})", index, x, y, z)
                } else {
                    write!(f, "vertex {}", index)
                }
            }
            MeshLocation::Edge { index } => write!(f, "edge {}", index),
            MeshLocation::Face { index } => write!(f, "face {}", index),
            MeshLocation::File { path, line } => {
                if let Some(l) = line {
                    write!(f, "{}:{}", path.display(), l)
                } else {
                    write!(f, "{}", path.display())
                }
            }
        }
    }
}

/// Errors that can occur during mesh operations.
#[derive(Debug, Error, Diagnostic)]
pub enum MeshError {
    /// Error reading from a file.
    #[error("failed to read mesh from {path}")]
    #[diagnostic(
        code(mesh::io::read),
        help("Check that the file exists and is readable. Try: ls -la {}", path.display())
    )]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing to a file.
    #[error("failed to write mesh to {path}")]
    #[diagnostic(
        code(mesh::io::write),
        help("Check that the directory exists and is writable")
    )]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error parsing mesh file format.
    #[error("failed to parse mesh from {path}: {details}")]
    #[diagnostic(
        code(mesh::parse::error),
        help("The file may be corrupted. Try re-exporting from the original software.")
    )]
    ParseError { path: PathBuf, details: String },

    /// Unsupported file format.
    #[error("unsupported mesh format: {extension:?}")]
    #[diagnostic(
        code(mesh::format::unsupported),
        help("Supported formats: OBJ (polygon faces and line elements are preserved)")
    )]
    UnsupportedFormat { extension: Option<String> },

    /// Empty mesh (no vertices).
    #[error("mesh is empty: {details}")]
    #[diagnostic(
        code(mesh::validation::empty),
        help("The mesh must have at least one vertex. Check that the file was exported correctly.")
    )]
    EmptyMesh { details: String },

    /// Invalid mesh topology.
    #[error("invalid mesh topology: {details}")]
    #[diagnostic(
        code(mesh::validation::topology),
        help("Faces need at least three distinct vertices and edges need two.")
    )]
    InvalidTopology { details: String },

    /// Invalid vertex index in face or edge data.
    #[error(
        "invalid vertex index: {kind} {element_index} references vertex {vertex_index}, but mesh only has {vertex_count} vertices"
    )]
    #[diagnostic(
        code(mesh::validation::vertex_index),
        help("Check the mesh export settings; every index must refer to an existing vertex.")
    )]
    InvalidVertexIndex {
        kind: ElementKind,
        element_index: usize,
        vertex_index: u32,
        vertex_count: usize,
    },

    /// Invalid coordinate value (NaN or Infinity).
    #[error("invalid coordinate at vertex {vertex_index}: {coordinate} is {value}")]
    #[diagnostic(
        code(mesh::validation::coordinate),
        help("Check for numerical issues in the source data.")
    )]
    InvalidCoordinate {
        vertex_index: usize,
        coordinate: &'static str,
        value: f64,
    },

    /// Element index outside the mesh.
    #[error("{kind} {index} does not exist (mesh has {count} {kind} elements)")]
    #[diagnostic(
        code(mesh::selection::out_of_range),
        help("Element indices are zero-based. Run `mesh info` to list element counts.")
    )]
    ElementOutOfRange {
        kind: ElementKind,
        index: usize,
        count: usize,
    },
}

impl MeshError {
    /// Returns the machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            MeshError::IoRead { .. } => ErrorCode::IoRead,
            MeshError::IoWrite { .. } => ErrorCode::IoWrite,
            MeshError::ParseError { .. } => ErrorCode::ParseError,
            MeshError::UnsupportedFormat { .. } => ErrorCode::UnsupportedFormat,
            MeshError::EmptyMesh { .. } => ErrorCode::EmptyMesh,
            MeshError::InvalidTopology { .. } => ErrorCode::InvalidTopology,
            MeshError::InvalidVertexIndex { .. } => ErrorCode::InvalidVertexIndex,
            MeshError::InvalidCoordinate { .. } => ErrorCode::InvalidCoordinate,
            MeshError::ElementOutOfRange { .. } => ErrorCode::ElementOutOfRange,
        }
    }

    /// Returns a recovery suggestion for this error.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self {
            MeshError::IoRead { .. } => RecoverySuggestion::CheckSourceMesh {
                checks: vec!["file exists".into(), "file permissions".into()],
            },
            MeshError::IoWrite { .. } => RecoverySuggestion::CheckSourceMesh {
                checks: vec!["directory exists".into(), "write permissions".into()],
            },
            MeshError::ParseError { .. } => RecoverySuggestion::ReexportFile {
                format: Some("OBJ".into()),
            },
            MeshError::UnsupportedFormat { .. } => RecoverySuggestion::UseDifferentFormat {
                suggested: vec!["OBJ".into()],
            },
            MeshError::EmptyMesh { .. } => RecoverySuggestion::CheckSourceMesh {
                checks: vec!["mesh has geometry".into(), "correct export settings".into()],
            },
            MeshError::InvalidTopology { .. } | MeshError::InvalidVertexIndex { .. } => {
                RecoverySuggestion::CheckSourceMesh {
                    checks: vec!["face vertex loops".into(), "index base (OBJ is 1-based)".into()],
                }
            }
            MeshError::InvalidCoordinate { .. } => RecoverySuggestion::CheckSourceMesh {
                checks: vec!["coordinate values".into(), "export precision".into()],
            },
            MeshError::ElementOutOfRange { kind, count, .. } => {
                RecoverySuggestion::CheckSelection {
                    kind: *kind,
                    count: *count,
                }
            }
        }
    }

    /// Returns location information if available.
    pub fn location(&self) -> Option<MeshLocation> {
        match self {
            MeshError::InvalidVertexIndex {
                kind: ElementKind::Face,
                element_index,
                ..
            } => Some(MeshLocation::Face {
                index: *element_index,
            }),
            MeshError::InvalidVertexIndex {
                kind: ElementKind::Edge,
                element_index,
                ..
            } => Some(MeshLocation::Edge {
                index: *element_index,
            }),
            MeshError::InvalidCoordinate { vertex_index, .. } => Some(MeshLocation::Vertex {
                index: *vertex_index,
                position: None,
            }),
            MeshError::ElementOutOfRange { kind, index, .. } => Some(match kind {
                ElementKind::Vertex => MeshLocation::Vertex {
                    index: *index,
                    position: None,
                },
                ElementKind::Edge => MeshLocation::Edge { index: *index },
                ElementKind::Face => MeshLocation::Face { index: *index },
            }),
            MeshError::ParseError { path, .. }
            | MeshError::IoRead { path, .. }
            | MeshError::IoWrite { path, .. } => Some(MeshLocation::File {
                path: path.clone(),
                line: None,
            }),
            _ => None,
        }
    }

    // Constructor helpers

    /// Create an InvalidVertexIndex error.
    pub fn invalid_vertex_index(
        kind: ElementKind,
        element_index: usize,
        vertex_index: u32,
        vertex_count: usize,
    ) -> Self {
        MeshError::InvalidVertexIndex {
            kind,
            element_index,
            vertex_index,
            vertex_count,
        }
    }

    /// Create an InvalidCoordinate error.
    pub fn invalid_coordinate(vertex_index: usize, coordinate: &'static str, value: f64) -> Self {
        MeshError::InvalidCoordinate {
            vertex_index,
            coordinate,
            value,
        }
    }

    /// Create an EmptyMesh error.
    pub fn empty_mesh(details: impl Into<String>) -> Self {
        MeshError::EmptyMesh {
            details: details.into(),
        }
    }

    /// Create an InvalidTopology error.
    pub fn invalid_topology(details: impl Into<String>) -> Self {
        MeshError::InvalidTopology {
            details: details.into(),
        }
    }

    /// Create an ElementOutOfRange error.
    pub fn element_out_of_range(kind: ElementKind, index: usize, count: usize) -> Self {
        MeshError::ElementOutOfRange { kind, index, count }
    }

    /// Create an UnsupportedFormat error.
    pub fn unsupported_format(extension: Option<String>) -> Self {
        MeshError::UnsupportedFormat { extension }
    }
}
