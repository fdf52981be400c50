//! Property-based tests for displacement.
//!
//! Run with: cargo test -p mesh-displace -- proptest

use mesh_displace::{DisplaceParams, displace};
use mesh_edit::EditMesh;
use proptest::prelude::*;

/// A single random, non-degenerate triangle.
fn arb_triangle() -> impl Strategy<Value = EditMesh> {
    prop::array::uniform3(prop::array::uniform3(-10.0..10.0f64))
        .prop_filter_map("degenerate triangle", |pts| {
            let mesh = EditMesh::from_polygons(&pts, &[vec![0, 1, 2]]).ok()?;
            (mesh.faces[0].normal.norm() > 0.5).then_some(mesh)
        })
}

/// A jittered quad grid with a random face selection.
fn arb_selected_grid() -> impl Strategy<Value = EditMesh> {
    (2usize..5, prop::collection::vec(-0.2..0.2f64, 36), prop::collection::vec(any::<bool>(), 25))
        .prop_map(|(n, heights, picks)| {
            let mut positions = Vec::new();
            for j in 0..=n {
                for i in 0..=n {
                    positions.push([i as f64, j as f64, heights[j * (n + 1) + i]]);
                }
            }
            let row = (n + 1) as u32;
            let mut polygons = Vec::new();
            for j in 0..n as u32 {
                for i in 0..n as u32 {
                    let a = j * row + i;
                    polygons.push(vec![a, a + 1, a + 1 + row, a + row]);
                }
            }
            let mut mesh = EditMesh::from_polygons(&positions, &polygons).expect("valid grid");
            for (f, &pick) in picks.iter().take(mesh.face_count()).enumerate() {
                mesh.set_face_selected(f as u32, pick).unwrap();
            }
            mesh
        })
}

proptest! {
    #[test]
    fn proptest_single_face_moves_exactly_distance(
        mesh in arb_triangle(),
        distance in -5.0..5.0f64,
    ) {
        let mut mesh = mesh;
        mesh.set_face_selected(0, true).unwrap();
        let normal = mesh.faces[0].normal;
        let before: Vec<_> = mesh.vertices.iter().map(|v| v.position).collect();

        displace(&mut mesh, &DisplaceParams::with_distance(distance)).unwrap();

        for (b, v) in before.iter().zip(&mesh.vertices) {
            let moved = v.position - b;
            prop_assert!((moved - normal * distance).norm() < 1e-12);
        }
    }

    #[test]
    fn proptest_zero_distance_is_noop(mesh in arb_selected_grid()) {
        let mut mesh = mesh;
        mesh.select_all();
        let before: Vec<_> = mesh.vertices.iter().map(|v| v.position).collect();

        let report = displace(&mut mesh, &DisplaceParams::with_distance(0.0)).unwrap();

        prop_assert!(report.skipped);
        for (b, v) in before.iter().zip(&mesh.vertices) {
            prop_assert_eq!(b.coords.x.to_bits(), v.position.coords.x.to_bits());
            prop_assert_eq!(b.coords.y.to_bits(), v.position.coords.y.to_bits());
            prop_assert_eq!(b.coords.z.to_bits(), v.position.coords.z.to_bits());
        }
    }

    #[test]
    fn proptest_moved_vertices_match_selected_faces(
        mesh in arb_selected_grid(),
        distance in 0.01..1.0f64,
    ) {
        let mut mesh = mesh;
        let mut expected: Vec<u32> = mesh
            .selected_faces()
            .flat_map(|f| mesh.faces[f as usize].vertices.clone())
            .collect();
        expected.sort_unstable();
        expected.dedup();

        let report = displace(&mut mesh, &DisplaceParams::with_distance(distance)).unwrap();

        prop_assert_eq!(report.moved_vertices, expected.len());
        prop_assert_eq!(report.unstable_vertices, 0);
        // Gentle grids never need more than a modest hypotenuse correction.
        prop_assert!(report.max_offset < distance * 2.0);
        prop_assert!(report.max_offset >= distance - 1e-12 || expected.is_empty());
    }
}
