//! Property-based tests for the edit mesh.
//!
//! Run with: cargo test -p mesh-edit -- proptest

use mesh_edit::{EditMesh, newell_normal};
use nalgebra::Point3;
use proptest::prelude::*;

/// Generate a regular grid of quads with jittered heights.
fn arb_grid() -> impl Strategy<Value = EditMesh> {
    (2usize..6, 2usize..6).prop_flat_map(|(nx, ny)| {
        prop::collection::vec(-0.25..0.25f64, (nx + 1) * (ny + 1)).prop_map(move |heights| {
            let mut positions = Vec::with_capacity(heights.len());
            for j in 0..=ny {
                for i in 0..=nx {
                    positions.push([i as f64, j as f64, heights[j * (nx + 1) + i]]);
                }
            }
            let row = (nx + 1) as u32;
            let mut polygons = Vec::with_capacity(nx * ny);
            for j in 0..ny as u32 {
                for i in 0..nx as u32 {
                    let a = j * row + i;
                    polygons.push(vec![a, a + 1, a + 1 + row, a + row]);
                }
            }
            EditMesh::from_polygons(&positions, &polygons).expect("valid grid")
        })
    })
}

proptest! {
    #[test]
    fn proptest_grid_euler_characteristic(mesh in arb_grid()) {
        // An open disc: V - E + F = 1.
        let chi = mesh.vertex_count() as i64 - mesh.edge_count() as i64 + mesh.face_count() as i64;
        prop_assert_eq!(chi, 1);
        prop_assert!(mesh.is_manifold());
    }

    #[test]
    fn proptest_face_normals_are_unit(mesh in arb_grid()) {
        for face in &mesh.faces {
            prop_assert!((face.normal.norm() - 1.0).abs() < 1e-9);
            // Small height jitter keeps every quad facing up.
            prop_assert!(face.normal.z > 0.0);
        }
        for vertex in &mesh.vertices {
            prop_assert!((vertex.normal.norm() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn proptest_newell_translation_invariant(
        offset in prop::array::uniform3(-50.0..50.0f64),
        pts in prop::collection::vec(prop::array::uniform3(-10.0..10.0f64), 3..8),
    ) {
        let base = newell_normal(pts.iter().map(|p| Point3::new(p[0], p[1], p[2])));
        let moved = newell_normal(
            pts.iter().map(|p| Point3::new(p[0] + offset[0], p[1] + offset[1], p[2] + offset[2])),
        );
        prop_assert!((base - moved).norm() < 1e-6 * (1.0 + base.norm()));
    }

    #[test]
    fn proptest_flush_selects_face_vertices(mesh in arb_grid(), pick in any::<prop::sample::Index>()) {
        let mut mesh = mesh;
        let face = pick.index(mesh.face_count()) as u32;
        mesh.set_face_selected(face, true).unwrap();
        mesh.flush_selection();

        let counts = mesh.selection_counts();
        prop_assert_eq!(counts.faces, 1);
        prop_assert_eq!(counts.edges, 4);
        prop_assert_eq!(counts.vertices, 4);
    }
}
