//! mesh info command - display mesh statistics.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use mesh_edit::EditMesh;
use mesh_edit::tracing_ext::log_mesh_report;
use serde::Serialize;

use crate::{Cli, OutputFormat, output};

#[derive(Serialize)]
struct MeshInfo {
    path: String,
    vertices: usize,
    edges: usize,
    faces: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    bounds: Option<BoundsInfo>,
    boundary_edges: usize,
    wire_edges: usize,
    non_manifold_edges: usize,
    loose_vertices: usize,
    max_face_size: usize,
}

#[derive(Serialize)]
struct BoundsInfo {
    min: [f64; 3],
    max: [f64; 3],
    dimensions: [f64; 3],
}

pub fn run(input: &Path, cli: &Cli) -> Result<()> {
    let mesh =
        EditMesh::load(input).with_context(|| format!("Failed to load mesh from {:?}", input))?;

    let report = mesh.report();
    log_mesh_report(&report);

    let bounds = report.bounds.map(|(min, max)| {
        let dims = max - min;
        BoundsInfo {
            min: [min.x, min.y, min.z],
            max: [max.x, max.y, max.z],
            dimensions: [dims.x, dims.y, dims.z],
        }
    });

    let info = MeshInfo {
        path: input.display().to_string(),
        vertices: report.vertex_count,
        edges: report.edge_count,
        faces: report.face_count,
        bounds,
        boundary_edges: report.boundary_edge_count,
        wire_edges: report.wire_edge_count,
        non_manifold_edges: report.non_manifold_edge_count,
        loose_vertices: report.loose_vertex_count,
        max_face_size: mesh.faces.iter().map(|f| f.len()).max().unwrap_or(0),
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&info, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Mesh Information".bold().underline());
                println!("  {}: {}", "File".cyan(), input.display());
                println!(
                    "  {}: {} ({} loose)",
                    "Vertices".cyan(),
                    info.vertices,
                    info.loose_vertices
                );
                println!(
                    "  {}: {} ({} boundary, {} wire, {} non-manifold)",
                    "Edges".cyan(),
                    info.edges,
                    info.boundary_edges,
                    info.wire_edges,
                    info.non_manifold_edges
                );
                println!(
                    "  {}: {} (up to {} sides)",
                    "Faces".cyan(),
                    info.faces,
                    info.max_face_size
                );

                if let Some(ref b) = info.bounds {
                    println!(
                        "  {}: {:.3} x {:.3} x {:.3}",
                        "Dimensions".cyan(),
                        b.dimensions[0],
                        b.dimensions[1],
                        b.dimensions[2]
                    );
                    println!(
                        "  {}: ({:.3}, {:.3}, {:.3})",
                        "Min bounds".cyan(),
                        b.min[0],
                        b.min[1],
                        b.min[2]
                    );
                    println!(
                        "  {}: ({:.3}, {:.3}, {:.3})",
                        "Max bounds".cyan(),
                        b.max[0],
                        b.max[1],
                        b.max[2]
                    );
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_info_on_saved_mesh() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quad.obj");
        let mut mesh = EditMesh::from_polygons(
            &[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
                [4.0, 4.0, 4.0],
            ],
            &[vec![0, 1, 2, 3]],
        )
        .unwrap();
        mesh.compute_normals();
        mesh.save(&path).unwrap();

        for format in ["text", "json"] {
            let cli = Cli::try_parse_from(["mesh", "--quiet", "--format", format, "info", "x.obj"])
                .unwrap();
            run(&path, &cli).unwrap();
        }

        let cli = Cli::try_parse_from(["mesh", "--quiet", "info", "x.obj"]).unwrap();
        let err = run(&dir.path().join("missing.obj"), &cli).unwrap_err();
        assert!(err.to_string().contains("Failed to load mesh"));
    }
}
