//! Fluent builder API for displacement.
//!
//! # Example
//!
//! ```no_run
//! use mesh_displace::DisplaceBuilder;
//! use mesh_edit::EditMesh;
//!
//! let mut mesh = EditMesh::load("panel.obj").unwrap();
//! mesh.set_face_selected(0, true).unwrap();
//!
//! let report = DisplaceBuilder::new(&mut mesh)
//!     .distance(0.5)
//!     .divergence_warn_cos(0.05)
//!     .apply()
//!     .unwrap();
//!
//! println!("{}", report);
//! mesh.save("panel_displaced.obj").unwrap();
//! ```

use crate::access::DisplaceHost;
use crate::displace::{DisplaceReport, displace};
use crate::error::DisplaceResult;
use crate::params::DisplaceParams;

/// Fluent builder for displacing a host's selection.
///
/// Starts from [`DisplaceParams::default`]; nothing runs until
/// [`apply`](Self::apply).
pub struct DisplaceBuilder<'a, H: DisplaceHost + ?Sized> {
    host: &'a mut H,
    params: DisplaceParams,
}

impl<'a, H: DisplaceHost + ?Sized> DisplaceBuilder<'a, H> {
    /// Create a builder for the given host mesh.
    pub fn new(host: &'a mut H) -> Self {
        Self {
            host,
            params: DisplaceParams::default(),
        }
    }

    /// Set the signed displacement distance.
    pub fn distance(mut self, distance: f64) -> Self {
        self.params.distance = distance;
        self
    }

    /// Enable or disable the normal update after moving vertices.
    pub fn update_normals(mut self, enable: bool) -> Self {
        self.params.update_normals = enable;
        self
    }

    /// Set the cosine below which a vertex offset is reported as unstable.
    pub fn divergence_warn_cos(mut self, cos: f64) -> Self {
        self.params.divergence_warn_cos = cos;
        self
    }

    /// Replace all parameters, e.g. with ones loaded from a config file.
    pub fn params(mut self, params: DisplaceParams) -> Self {
        self.params = params;
        self
    }

    /// Run the displacement.
    pub fn apply(self) -> DisplaceResult<DisplaceReport> {
        displace(self.host, &self.params)
    }
}
