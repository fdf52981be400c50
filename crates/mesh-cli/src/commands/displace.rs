//! mesh displace command - move a selection along its normals.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use mesh_displace::{DisplaceBuilder, DisplaceParams, DisplaceReport};
use mesh_edit::tracing_ext::{OperationTimer, log_mesh_stats};
use mesh_edit::{EditMesh, SelectionCounts, VertexId};
use serde::Serialize;

use crate::{Cli, OutputFormat, output};

/// Elements to select before displacing.
#[derive(Debug, Default)]
pub struct SelectionArgs {
    pub faces: Vec<u32>,
    pub edges: Vec<(VertexId, VertexId)>,
    pub vertices: Vec<VertexId>,
    pub all: bool,
}

#[derive(Serialize)]
struct DisplaceOutput {
    input: String,
    output: String,
    success: bool,
    selected_faces: usize,
    selected_edges: usize,
    selected_vertices: usize,
    #[serde(flatten)]
    report: DisplaceReport,
}

/// Parse an edge given as two vertex indices, `a:b`.
pub fn parse_vertex_pair(s: &str) -> Result<(VertexId, VertexId), String> {
    let (a, b) = s
        .split_once(':')
        .ok_or_else(|| format!("expected an edge as 'a:b', got '{}'", s))?;
    let a = a
        .trim()
        .parse()
        .map_err(|_| format!("invalid vertex index '{}' in edge '{}'", a, s))?;
    let b = b
        .trim()
        .parse()
        .map_err(|_| format!("invalid vertex index '{}' in edge '{}'", b, s))?;
    Ok((a, b))
}

/// Apply the requested selection, then flush it down to edges and vertices.
fn apply_selection(mesh: &mut EditMesh, selection: &SelectionArgs) -> Result<SelectionCounts> {
    if selection.all {
        mesh.select_all();
    }
    for &face in &selection.faces {
        mesh.set_face_selected(face, true)
            .with_context(|| format!("Cannot select face {}", face))?;
    }
    for &(a, b) in &selection.edges {
        mesh.select_edge_between(a, b)
            .with_context(|| format!("Cannot select edge {}:{}", a, b))?;
    }
    for &vertex in &selection.vertices {
        mesh.set_vertex_selected(vertex, true)
            .with_context(|| format!("Cannot select vertex {}", vertex))?;
    }

    let requested = mesh.selection_counts();
    mesh.flush_selection();
    Ok(requested)
}

/// Resolve parameters: config file first, then the command-line distance.
fn resolve_params(distance: Option<f64>, config: Option<&Path>) -> Result<DisplaceParams> {
    let mut params = match config {
        Some(path) => DisplaceParams::from_toml_file(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => DisplaceParams::default(),
    };
    if let Some(d) = distance {
        params.distance = d;
    }
    Ok(params)
}

pub fn run(
    input: &Path,
    output_path: &Path,
    distance: Option<f64>,
    selection: &SelectionArgs,
    config: Option<&Path>,
    cli: &Cli,
) -> Result<()> {
    let params = resolve_params(distance, config)?;

    let mut mesh =
        EditMesh::load(input).with_context(|| format!("Failed to load mesh from {:?}", input))?;
    let timer = OperationTimer::with_context("displace_command", &mesh);
    let _span = timer.span().enter();

    let requested = apply_selection(&mut mesh, selection)?;
    log_mesh_stats(&mesh, "before displace");

    if requested.is_empty() {
        output::warning(
            "Nothing selected; use --faces, --edges, --vertices or --all",
            cli.format,
            cli.quiet,
        );
    }

    output::info(
        &format!("Displacing selection by {}...", params.distance),
        cli.format,
        cli.quiet,
    );

    let report = DisplaceBuilder::new(&mut mesh)
        .params(params)
        .apply()
        .context("Displacement failed")?;

    mesh.save(output_path)
        .with_context(|| format!("Failed to save mesh to {:?}", output_path))?;

    let result = DisplaceOutput {
        input: input.display().to_string(),
        output: output_path.display().to_string(),
        success: true,
        selected_faces: requested.faces,
        selected_edges: requested.edges,
        selected_vertices: requested.vertices,
        report,
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&result, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                output::success(
                    &format!("Displaced mesh saved to {}", output_path.display()),
                    cli.format,
                    cli.quiet,
                );
                print!("{}", result.report);
                if result.report.unstable_vertices > 0 {
                    println!(
                        "  {}: {} vertices have near-opposing normals; their offsets may be extreme",
                        "Warning".yellow(),
                        result.report.unstable_vertices
                    );
                }
            }
        }
    }

    Ok(())
}
