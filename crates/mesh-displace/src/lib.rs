//! Displace selected mesh elements along their normals.
//!
//! Given a selection of vertices, edges and faces and a signed distance,
//! this crate computes one offset per affected vertex and moves it, even
//! when the vertex is shared by several selected elements with different
//! normals. Shared vertices move along the summed normal by a corrected
//! length, so displaced faces stay parallel to where they started.
//!
//! # Stages
//!
//! 1. [`classify_selection`]: a selected face covers its edges, a selected
//!    edge covers its vertices; covered elements are not processed twice.
//! 2. [`accumulate_contributions`]: one scaled normal per (element, vertex).
//! 3. [`resolve_offsets`]: sum, angle-correct, rescale.
//!
//! [`displace`] runs all three, then writes positions and notifies the
//! host. The host is anything implementing [`DisplaceHost`];
//! [`mesh_edit::EditMesh`] does.
//!
//! # Quick Start
//!
//! ```
//! use mesh_displace::DisplaceBuilder;
//! use mesh_edit::EditMesh;
//!
//! // Two faces meeting at a right angle.
//! let mut mesh = EditMesh::from_polygons(
//!     &[
//!         [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0],
//!         [0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 1.0],
//!     ],
//!     &[vec![0, 1, 2, 3], vec![0, 4, 5, 1]],
//! )
//! .unwrap();
//! mesh.select_edge_between(0, 1).unwrap();
//!
//! let report = DisplaceBuilder::new(&mut mesh).distance(1.0).apply().unwrap();
//! assert_eq!(report.moved_vertices, 2);
//!
//! // The fold vertex moves diagonally by sqrt(2).
//! let p = mesh.vertices[0].position;
//! assert!((p.y - 1.0).abs() < 1e-12 && (p.z - 1.0).abs() < 1e-12);
//! ```
//!
//! # Configuration
//!
//! [`DisplaceParams`] loads from TOML or JSON:
//!
//! ```
//! use mesh_displace::DisplaceParams;
//!
//! let params = DisplaceParams::from_toml("distance = 0.25").unwrap();
//! assert!(params.update_normals);
//! ```

mod builder;
mod displace;
mod error;
mod params;

pub mod access;
pub mod accumulate;
pub mod classify;
pub mod resolve;

pub use error::{DisplaceError, DisplaceErrorCode, DisplaceRecoverySuggestion, DisplaceResult};

// Builder API (recommended)
pub use builder::DisplaceBuilder;

pub use access::{DisplaceHost, MeshView, MeshWrite};
pub use accumulate::{ContributionMap, accumulate_contributions};
pub use classify::{Classification, ClassificationStats, classify_selection};
pub use displace::{DisplaceReport, displace};
pub use params::DisplaceParams;
pub use resolve::{ResolvedOffset, resolve_offset, resolve_offsets};
