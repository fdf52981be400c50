//! Tracing helpers shared by mesh editing operators.
//!
//! Nothing here installs a subscriber; applications choose their own. With
//! `tracing_subscriber` and an env filter, `RUST_LOG=mesh_edit=debug` shows
//! mesh state and `RUST_LOG=mesh_edit::timing=info` shows only timings.
//!
//! Log levels follow one convention across the workspace:
//!
//! - **WARN**: numerically unstable results, ignored input
//! - **INFO**: operation summaries and timings
//! - **DEBUG**: intermediate state, per-stage counts
//! - **TRACE**: per-element values

use std::time::Instant;
use tracing::{Span, debug, info, trace};

use crate::types::EditMesh;
use crate::validate::MeshReport;

/// A performance timer that logs duration on drop.
///
/// ```rust,ignore
/// use mesh_edit::tracing_ext::OperationTimer;
///
/// fn displace_selection() {
///     let _timer = OperationTimer::new("displace");
///     // ... do work ...
/// } // duration logged here
/// ```
pub struct OperationTimer {
    name: &'static str,
    start: Instant,
    span: Span,
}

impl OperationTimer {
    /// Create a new operation timer.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!("mesh_operation", operation = name);
        debug!(target: "mesh_edit::timing", operation = name, "Starting operation");
        Self {
            name,
            start: Instant::now(),
            span,
        }
    }

    /// Create a timer with mesh size fields attached to its span.
    pub fn with_context(name: &'static str, mesh: &EditMesh) -> Self {
        let span = tracing::info_span!(
            "mesh_operation",
            operation = name,
            vertices = mesh.vertex_count(),
            edges = mesh.edge_count(),
            faces = mesh.face_count()
        );
        debug!(
            target: "mesh_edit::timing",
            operation = name,
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            "Starting operation"
        );
        Self {
            name,
            start: Instant::now(),
            span,
        }
    }

    /// Milliseconds since the timer was created.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Get the span for this timer.
    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();
        info!(
            target: "mesh_edit::timing",
            operation = self.name,
            elapsed_ms = format!("{:.2}", elapsed_ms),
            "Operation completed"
        );
    }
}

/// Log mesh size and selection at debug level.
pub fn log_mesh_stats(mesh: &EditMesh, context: &str) {
    let selection = mesh.selection_counts();

    debug!(
        target: "mesh_edit::mesh_state",
        context = context,
        vertices = mesh.vertex_count(),
        edges = mesh.edge_count(),
        faces = mesh.face_count(),
        selected_vertices = selection.vertices,
        selected_edges = selection.edges,
        selected_faces = selection.faces,
        "Mesh state"
    );

    if let Some((min, max)) = mesh.bounds() {
        let dims = max - min;
        trace!(
            target: "mesh_edit::mesh_state",
            context = context,
            dimensions = format!("{:.4} x {:.4} x {:.4}", dims.x, dims.y, dims.z),
            "Mesh extent"
        );
    }
}

/// Log a mesh report at info level.
pub fn log_mesh_report(report: &MeshReport) {
    info!(
        target: "mesh_edit::report",
        vertices = report.vertex_count,
        edges = report.edge_count,
        faces = report.face_count,
        boundary_edges = report.boundary_edge_count,
        wire_edges = report.wire_edge_count,
        non_manifold_edges = report.non_manifold_edge_count,
        loose_vertices = report.loose_vertex_count,
        "Mesh report"
    );
}
