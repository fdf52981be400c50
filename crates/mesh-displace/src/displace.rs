//! The displacement operator: classify, accumulate, resolve, apply.

use mesh_edit::tracing_ext::OperationTimer;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::access::DisplaceHost;
use crate::accumulate::accumulate_contributions;
use crate::classify::{ClassificationStats, classify_selection};
use crate::error::{DisplaceError, DisplaceResult};
use crate::params::DisplaceParams;
use crate::resolve::resolve_offsets;

/// Outcome of one displacement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplaceReport {
    /// Distance that was applied.
    pub distance: f64,
    /// True if the distance was zero and nothing was read or written.
    pub skipped: bool,
    /// How the selection was partitioned.
    pub classification: ClassificationStats,
    /// Contributions over all vertices.
    pub contribution_count: usize,
    /// Vertices whose position was written.
    pub moved_vertices: usize,
    /// Largest finite distance a vertex actually moved.
    pub max_offset: f64,
    /// Vertices with a non-finite offset or a near-perpendicular correction.
    pub unstable_vertices: usize,
    /// True if the host was asked to recompute normals.
    pub normals_updated: bool,
}

impl DisplaceReport {
    fn skipped() -> Self {
        Self {
            skipped: true,
            ..Default::default()
        }
    }
}

impl std::fmt::Display for DisplaceReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.skipped {
            return writeln!(f, "Displacement skipped (distance is zero)");
        }
        writeln!(f, "Displacement by {}:", self.distance)?;
        writeln!(
            f,
            "  Selection: {} faces, {} edges, {} vertices ({} edges, {} vertices covered by higher elements)",
            self.classification.faces,
            self.classification.edges,
            self.classification.vertices,
            self.classification.skipped_edges,
            self.classification.skipped_vertices
        )?;
        writeln!(
            f,
            "  Moved: {} vertices from {} contributions (max offset {:.6})",
            self.moved_vertices, self.contribution_count, self.max_offset
        )?;
        if self.unstable_vertices > 0 {
            writeln!(f, "  Unstable: {} vertices", self.unstable_vertices)?;
        }
        Ok(())
    }
}

/// Displace the host's selection along its normals.
///
/// All normals are read and every offset is resolved before the first
/// position is written. After writing, the host is asked to update normals
/// (if any vertex moved and `params.update_normals` is set) and to redraw.
/// A zero distance returns immediately without touching the host, before
/// the remaining parameters are checked.
///
/// # Errors
///
/// Returns [`DisplaceError::InvalidDistance`](crate::DisplaceError::InvalidDistance)
/// for a NaN or infinite distance and
/// [`DisplaceError::InvalidParams`](crate::DisplaceError::InvalidParams) for an
/// out-of-range warning threshold.
///
/// # Example
///
/// ```
/// use mesh_displace::{DisplaceParams, displace};
/// use mesh_edit::EditMesh;
///
/// let mut quad = EditMesh::from_polygons(
///     &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
///     &[vec![0, 1, 2, 3]],
/// )
/// .unwrap();
/// quad.set_face_selected(0, true).unwrap();
///
/// let report = displace(&mut quad, &DisplaceParams::with_distance(2.0)).unwrap();
/// assert_eq!(report.moved_vertices, 4);
/// assert!((quad.vertices[2].position.z - 2.0).abs() < 1e-12);
/// ```
pub fn displace<H: DisplaceHost + ?Sized>(
    host: &mut H,
    params: &DisplaceParams,
) -> DisplaceResult<DisplaceReport> {
    if !params.distance.is_finite() {
        return Err(DisplaceError::invalid_distance(params.distance));
    }
    if params.distance == 0.0 {
        debug!("Distance is zero, skipping displacement");
        return Ok(DisplaceReport::skipped());
    }
    params.validate()?;

    let timer = OperationTimer::new("displace");
    let _span = timer.span().enter();
    let distance = params.distance;

    let classification = classify_selection(&*host);
    let contributions = accumulate_contributions(&*host, &classification, distance);
    let offsets = resolve_offsets(&contributions, distance);

    let mut report = DisplaceReport {
        distance,
        classification: classification.stats,
        contribution_count: contributions.contribution_count(),
        ..Default::default()
    };

    for resolved in &offsets {
        trace!(
            vertex = resolved.vertex,
            contributions = resolved.contributions,
            cos_angle = resolved.cos_angle,
            "offset ({:.6}, {:.6}, {:.6})",
            resolved.offset.x,
            resolved.offset.y,
            resolved.offset.z
        );

        if resolved.is_unstable(params.divergence_warn_cos) {
            report.unstable_vertices += 1;
            warn!(
                vertex = resolved.vertex,
                cos_angle = resolved.cos_angle,
                "Unstable offset: summed normal is nearly perpendicular to the first contribution"
            );
        }
    }

    for resolved in &offsets {
        let before = host.vertex_position(resolved.vertex);
        host.translate_vertex(resolved.vertex, resolved.offset);
        let moved = (host.vertex_position(resolved.vertex) - before).norm();
        if moved.is_finite() {
            report.max_offset = report.max_offset.max(moved);
        }
    }
    report.moved_vertices = offsets.len();

    if report.moved_vertices > 0 && params.update_normals {
        host.update_normals();
        report.normals_updated = true;
    }
    host.tag_redraw();

    info!(
        distance = distance,
        moved = report.moved_vertices,
        contributions = report.contribution_count,
        unstable = report.unstable_vertices,
        "Displaced selection along normals"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{MeshView, MeshWrite};
    use crate::error::DisplaceError;
    use approx::assert_relative_eq;
    use mesh_edit::{EdgeId, EditMesh, FaceId, VertexId};
    use nalgebra::{Point3, Vector3};
    use std::f64::consts::SQRT_2;

    /// Wraps an edit mesh and records host notifications.
    #[derive(Default)]
    struct RecordingHost {
        mesh: EditMesh,
        normal_updates: usize,
        redraws: usize,
        writes: usize,
        /// Vertices whose writes are ignored.
        locked: Vec<VertexId>,
        /// Span active when normals were updated.
        normals_span: Option<&'static str>,
    }

    impl MeshView for RecordingHost {
        fn vertex_count(&self) -> usize {
            self.mesh.vertex_count()
        }
        fn edge_count(&self) -> usize {
            self.mesh.edge_count()
        }
        fn face_count(&self) -> usize {
            self.mesh.face_count()
        }
        fn vertex_selected(&self, v: VertexId) -> bool {
            MeshView::vertex_selected(&self.mesh, v)
        }
        fn edge_selected(&self, e: EdgeId) -> bool {
            MeshView::edge_selected(&self.mesh, e)
        }
        fn face_selected(&self, f: FaceId) -> bool {
            MeshView::face_selected(&self.mesh, f)
        }
        fn vertex_normal(&self, v: VertexId) -> Vector3<f64> {
            self.mesh.vertex_normal(v)
        }
        fn face_normal(&self, f: FaceId) -> Vector3<f64> {
            self.mesh.face_normal(f)
        }
        fn vertex_edges(&self, v: VertexId) -> &[EdgeId] {
            self.mesh.vertex_edges(v)
        }
        fn edge_vertices(&self, e: EdgeId) -> [VertexId; 2] {
            self.mesh.edge_vertices(e)
        }
        fn edge_faces(&self, e: EdgeId) -> &[FaceId] {
            self.mesh.edge_faces(e)
        }
        fn face_vertices(&self, f: FaceId) -> &[VertexId] {
            self.mesh.face_vertices(f)
        }
    }

    impl MeshWrite for RecordingHost {
        fn vertex_position(&self, v: VertexId) -> Point3<f64> {
            self.mesh.vertex_position(v)
        }
        fn translate_vertex(&mut self, v: VertexId, offset: Vector3<f64>) {
            self.writes += 1;
            if !self.locked.contains(&v) {
                self.mesh.translate_vertex(v, offset);
            }
        }
    }

    impl DisplaceHost for RecordingHost {
        fn update_normals(&mut self) {
            self.normal_updates += 1;
            self.normals_span = tracing::Span::current().metadata().map(|m| m.name());
            self.mesh.compute_normals();
        }
        fn tag_redraw(&mut self) {
            self.redraws += 1;
        }
    }

    fn unit_quad() -> EditMesh {
        EditMesh::from_polygons(
            &[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            &[vec![0, 1, 2, 3]],
        )
        .unwrap()
    }

    fn folded_quads() -> EditMesh {
        // Floor quad (normal +Z) and wall quad (normal +Y) sharing edge (0, 1).
        EditMesh::from_polygons(
            &[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0],
                [1.0, 0.0, 1.0],
            ],
            &[vec![0, 1, 2, 3], vec![0, 4, 5, 1]],
        )
        .unwrap()
    }

    fn positions(mesh: &EditMesh) -> Vec<Point3<f64>> {
        mesh.vertices.iter().map(|v| v.position).collect()
    }

    #[test]
    fn test_planar_quad_moves_by_distance() {
        let mut mesh = unit_quad();
        mesh.set_face_selected(0, true).unwrap();
        let before = positions(&mesh);

        let report = displace(&mut mesh, &DisplaceParams::with_distance(2.0)).unwrap();

        assert_eq!(report.moved_vertices, 4);
        assert_eq!(report.contribution_count, 4);
        assert_eq!(report.unstable_vertices, 0);
        assert_relative_eq!(report.max_offset, 2.0, epsilon = 1e-12);
        for (b, v) in before.iter().zip(&mesh.vertices) {
            assert_relative_eq!(v.position, b + Vector3::new(0.0, 0.0, 2.0), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_zero_distance_is_bit_identical() {
        let mut host = RecordingHost {
            mesh: folded_quads(),
            ..Default::default()
        };
        host.mesh.select_all();
        let before = positions(&host.mesh);

        let report = displace(&mut host, &DisplaceParams::with_distance(0.0)).unwrap();

        assert!(report.skipped);
        assert_eq!(report.moved_vertices, 0);
        assert_eq!(host.writes, 0);
        assert_eq!(host.normal_updates, 0);
        assert_eq!(host.redraws, 0);
        for (b, v) in before.iter().zip(&host.mesh.vertices) {
            assert_eq!(b.coords.as_slice(), v.position.coords.as_slice());
        }
    }

    #[test]
    fn test_right_angle_fold_bisects() {
        let mut mesh = folded_quads();
        mesh.set_face_selected(0, true).unwrap();
        mesh.set_face_selected(1, true).unwrap();

        displace(&mut mesh, &DisplaceParams::with_distance(1.0)).unwrap();

        // Shared vertices move along the bisector by sqrt(2).
        assert_relative_eq!(mesh.vertices[0].position, Point3::new(0.0, 1.0, 1.0), epsilon = 1e-12);
        assert_relative_eq!(mesh.vertices[1].position, Point3::new(1.0, 1.0, 1.0), epsilon = 1e-12);
        let moved = mesh.vertices[0].position.coords.norm();
        assert!(moved > 1.0);
        assert_relative_eq!(moved, SQRT_2, epsilon = 1e-12);

        // Displaced floor stays at z = 1, displaced wall at y = 1.
        for v in [0, 1, 2, 3] {
            assert_relative_eq!(mesh.vertices[v].position.z, 1.0, epsilon = 1e-12);
        }
        for v in [0, 4, 5, 1] {
            assert_relative_eq!(mesh.vertices[v].position.y, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_selected_fold_edge_matches_face_pair() {
        let mut mesh = folded_quads();
        mesh.select_edge_between(0, 1).unwrap();

        let report = displace(&mut mesh, &DisplaceParams::with_distance(1.0)).unwrap();

        assert_eq!(report.moved_vertices, 2);
        assert_eq!(report.contribution_count, 4);
        assert_relative_eq!(mesh.vertices[0].position, Point3::new(0.0, 1.0, 1.0), epsilon = 1e-12);
        assert_relative_eq!(mesh.vertices[1].position, Point3::new(1.0, 1.0, 1.0), epsilon = 1e-12);
        assert_relative_eq!(mesh.vertices[2].position, Point3::new(1.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_edge_takes_priority_over_vertex() {
        let mut mesh = folded_quads();
        mesh.select_edge_between(0, 1).unwrap();
        mesh.set_vertex_selected(0, true).unwrap();

        let report = displace(&mut mesh, &DisplaceParams::with_distance(1.0)).unwrap();

        assert_eq!(report.classification.skipped_vertices, 1);
        assert_eq!(report.classification.vertices, 0);
        // No extra vertex-normal contribution on vertex 0.
        assert_relative_eq!(mesh.vertices[0].position, Point3::new(0.0, 1.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_face_takes_priority_over_edge() {
        let mut mesh = folded_quads();
        mesh.set_face_selected(0, true).unwrap();
        mesh.select_edge_between(0, 1).unwrap();

        let report = displace(&mut mesh, &DisplaceParams::with_distance(1.0)).unwrap();

        assert_eq!(report.classification.skipped_edges, 1);
        assert_eq!(report.contribution_count, 4);
        // The wall's normal is not pulled in through the edge.
        assert_relative_eq!(mesh.vertices[0].position, Point3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
        assert_relative_eq!(mesh.vertices[4].position, Point3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_loose_vertex_moves_along_vertex_normal() {
        let mut mesh = unit_quad();
        let loose = mesh.add_vertex(Point3::new(3.0, 0.0, 4.0));
        mesh.compute_normals();
        mesh.set_vertex_selected(loose, true).unwrap();

        displace(&mut mesh, &DisplaceParams::with_distance(5.0)).unwrap();

        assert_relative_eq!(mesh.vertices[loose as usize].position, Point3::new(6.0, 0.0, 8.0), epsilon = 1e-12);
        assert_relative_eq!(mesh.vertices[0].position, Point3::origin());
    }

    #[test]
    fn test_empty_selection_is_noop() {
        let mut host = RecordingHost {
            mesh: unit_quad(),
            ..Default::default()
        };

        let report = displace(&mut host, &DisplaceParams::with_distance(1.0)).unwrap();

        assert!(!report.skipped);
        assert_eq!(report.moved_vertices, 0);
        assert!(!report.normals_updated);
        assert_eq!(host.normal_updates, 0);
        assert_eq!(host.redraws, 1);
    }

    #[test]
    fn test_host_notified_once() {
        let mut host = RecordingHost {
            mesh: folded_quads(),
            ..Default::default()
        };
        host.mesh.set_face_selected(1, true).unwrap();

        let report = displace(&mut host, &DisplaceParams::with_distance(0.5)).unwrap();

        assert!(report.normals_updated);
        assert_eq!(host.writes, 4);
        assert_eq!(host.normal_updates, 1);
        assert_eq!(host.redraws, 1);

        let params = DisplaceParams {
            update_normals: false,
            ..DisplaceParams::with_distance(0.5)
        };
        let report = displace(&mut host, &params).unwrap();
        assert!(!report.normals_updated);
        assert_eq!(host.normal_updates, 1);
        assert_eq!(host.redraws, 2);
    }

    #[test]
    fn test_two_applications_differ_from_one_double() {
        let triangle = || {
            let mut mesh = EditMesh::from_polygons(
                &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
                &[vec![0, 1, 2]],
            )
            .unwrap();
            mesh.set_vertex_selected(0, true).unwrap();
            mesh
        };

        let mut once = triangle();
        displace(&mut once, &DisplaceParams::with_distance(2.0)).unwrap();

        let mut twice = triangle();
        displace(&mut twice, &DisplaceParams::with_distance(1.0)).unwrap();
        // After the first step the triangle tilts and its normal changes.
        let n = Vector3::new(1.0, 1.0, 1.0).normalize();
        assert_relative_eq!(twice.faces[0].normal, n, epsilon = 1e-12);
        displace(&mut twice, &DisplaceParams::with_distance(1.0)).unwrap();

        assert_relative_eq!(once.vertices[0].position, Point3::new(0.0, 0.0, 2.0), epsilon = 1e-12);
        assert_relative_eq!(
            twice.vertices[0].position,
            Point3::new(0.0, 0.0, 1.0) + n,
            epsilon = 1e-12
        );
        assert!((once.vertices[0].position - twice.vertices[0].position).norm() > 0.1);
    }

    #[test]
    fn test_opposing_faces_are_reported_unstable() {
        // Two coincident quads with opposite winding share all four vertices.
        let mut mesh = EditMesh::from_polygons(
            &[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            &[vec![0, 1, 2, 3]],
        )
        .unwrap();
        mesh.faces.push(mesh_edit::Face {
            vertices: vec![3, 2, 1, 0],
            normal: Vector3::new(0.0, 0.0, -1.0),
            select: false,
        });
        mesh.rebuild_links();
        mesh.set_face_selected(0, true).unwrap();
        mesh.set_face_selected(1, true).unwrap();

        let params = DisplaceParams {
            update_normals: false,
            ..DisplaceParams::with_distance(1.0)
        };
        let report = displace(&mut mesh, &params).unwrap();

        assert_eq!(report.unstable_vertices, 4);
        assert_eq!(report.moved_vertices, 4);
        assert_eq!(report.max_offset, 0.0);
        assert!(mesh.vertices[0].position.x.is_nan());
    }

    #[test]
    fn test_invalid_distance_rejected_before_traversal() {
        let mut host = RecordingHost {
            mesh: unit_quad(),
            ..Default::default()
        };
        host.mesh.select_all();

        let err = displace(&mut host, &DisplaceParams::with_distance(f64::NAN)).unwrap_err();
        assert!(matches!(err, DisplaceError::InvalidDistance { .. }));
        assert_eq!(host.writes, 0);
        assert_eq!(host.redraws, 0);
    }

    #[test]
    fn test_zero_distance_skips_before_threshold_check() {
        let mut host = RecordingHost {
            mesh: unit_quad(),
            ..Default::default()
        };
        host.mesh.select_all();
        let params = DisplaceParams {
            divergence_warn_cos: 2.0,
            ..DisplaceParams::with_distance(0.0)
        };

        let report = displace(&mut host, &params).unwrap();
        assert!(report.skipped);
        assert_eq!(host.redraws, 0);

        let params = DisplaceParams {
            divergence_warn_cos: 2.0,
            ..DisplaceParams::with_distance(1.0)
        };
        assert!(matches!(
            displace(&mut host, &params),
            Err(DisplaceError::InvalidParams { .. })
        ));
        assert_eq!(host.writes, 0);
    }

    #[test]
    fn test_max_offset_reflects_actual_movement() {
        let mut host = RecordingHost {
            mesh: folded_quads(),
            locked: vec![0, 1],
            ..Default::default()
        };
        host.mesh.set_face_selected(0, true).unwrap();
        host.mesh.set_face_selected(1, true).unwrap();

        let report = displace(&mut host, &DisplaceParams::with_distance(1.0)).unwrap();

        // The fold vertices would move sqrt(2) but the host keeps them in place.
        assert_eq!(host.writes, 6);
        assert_relative_eq!(report.max_offset, 1.0, epsilon = 1e-12);
        assert_eq!(host.mesh.vertices[0].position, Point3::origin());
    }

    #[test]
    fn test_host_callbacks_run_inside_operation_span() {
        let mut host = RecordingHost {
            mesh: unit_quad(),
            ..Default::default()
        };
        host.mesh.set_face_selected(0, true).unwrap();

        tracing::subscriber::with_default(tracing_subscriber::registry(), || {
            displace(&mut host, &DisplaceParams::with_distance(1.0)).unwrap();
        });

        assert_eq!(host.normals_span, Some("mesh_operation"));
    }

    #[test]
    fn test_report_display() {
        let mut mesh = unit_quad();
        mesh.set_face_selected(0, true).unwrap();
        let report = displace(&mut mesh, &DisplaceParams::with_distance(1.0)).unwrap();
        let text = report.to_string();
        assert!(text.contains("Moved: 4 vertices"));
        assert!(!text.contains("Unstable"));

        let skipped = DisplaceReport::skipped();
        assert!(skipped.to_string().contains("skipped"));
    }
}
