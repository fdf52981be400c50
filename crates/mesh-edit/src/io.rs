//! Mesh file I/O for the OBJ format.
//!
//! OBJ is the only supported format: it stores polygon faces and line
//! elements as written, and keeps vertex order, so element indices used for
//! selection survive a save and reload.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::{Point3, Vector3};
use tracing::{debug, info, warn};

use crate::error::{MeshError, MeshResult};
use crate::types::{EditMesh, VertexId};
use crate::validate::{ValidationOptions, validate_mesh_data};

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Obj,
}

impl MeshFormat {
    /// Detect format from file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .and_then(|ext| match ext.as_str() {
                "obj" => Some(MeshFormat::Obj),
                _ => None,
            })
    }
}

/// Load a mesh from file, auto-detecting format from extension.
///
/// Face and vertex normals are recomputed after loading. Normals stored in
/// the file are kept only for vertices that no face uses.
pub fn load_mesh(path: &Path) -> MeshResult<EditMesh> {
    let format = MeshFormat::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path.extension().and_then(|e| e.to_str()).map(String::from),
    })?;

    info!("Loading mesh from {:?} (format: {:?})", path, format);

    let mesh = match format {
        MeshFormat::Obj => load_obj(path)?,
    };

    if mesh.vertices.is_empty() {
        return Err(MeshError::EmptyMesh {
            details: "file contains no vertices".to_string(),
        });
    }

    validate_mesh_data(&mesh, &ValidationOptions::default())?;

    info!(
        "Loaded mesh: {} vertices, {} edges, {} faces",
        mesh.vertex_count(),
        mesh.edge_count(),
        mesh.face_count()
    );
    if let Some((min, max)) = mesh.bounds() {
        debug!(
            "Bounding box: [{:.3}, {:.3}, {:.3}] to [{:.3}, {:.3}, {:.3}]",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
    }

    Ok(mesh)
}

/// Save a mesh to file, auto-detecting format from extension.
pub fn save_mesh(mesh: &EditMesh, path: &Path) -> MeshResult<()> {
    let format = MeshFormat::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path.extension().and_then(|e| e.to_str()).map(String::from),
    })?;

    match format {
        MeshFormat::Obj => save_obj(mesh, path),
    }
}

/// Resolve a 1-based (or negative, relative) OBJ index into a vertex index.
fn resolve_index(token: &str, count: usize) -> Option<VertexId> {
    let raw: i64 = token.split('/').next()?.parse().ok()?;
    let resolved = match raw {
        0 => return None,
        r if r > 0 => r - 1,
        r => count as i64 + r,
    };
    if resolved < 0 || resolved >= count as i64 {
        return None;
    }
    Some(resolved as VertexId)
}

fn parse_coords<'a>(mut fields: impl Iterator<Item = &'a str>) -> Option<[f64; 3]> {
    let x = fields.next()?.parse().ok()?;
    let y = fields.next()?.parse().ok()?;
    let z = fields.next()?.parse().ok()?;
    Some([x, y, z])
}

/// Load mesh from OBJ file.
///
/// Reads `v`, `vn`, `f` and `l` records. Texture coordinates, groups and
/// material statements are ignored. Faces keep their polygon loops; each
/// `l` record adds wire edges between consecutive vertices.
fn load_obj(path: &Path) -> MeshResult<EditMesh> {
    let file = File::open(path).map_err(|e| MeshError::IoRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let reader = BufReader::new(file);

    let parse_error = |line_no: usize, details: String| MeshError::ParseError {
        path: path.to_path_buf(),
        details: format!("line {}: {}", line_no, details),
    };

    let mut positions: Vec<[f64; 3]> = Vec::new();
    let mut normals: Vec<[f64; 3]> = Vec::new();
    let mut polygons: Vec<Vec<VertexId>> = Vec::new();
    let mut lines: Vec<Vec<VertexId>> = Vec::new();
    let mut ignored = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| MeshError::IoRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split_whitespace();
        let Some(keyword) = fields.next() else {
            continue;
        };

        match keyword {
            "v" => {
                let coords = parse_coords(fields)
                    .ok_or_else(|| parse_error(line_no, "vertex needs three numeric coordinates".into()))?;
                positions.push(coords);
            }
            "vn" => {
                let coords = parse_coords(fields)
                    .ok_or_else(|| parse_error(line_no, "normal needs three numeric components".into()))?;
                normals.push(coords);
            }
            "f" | "l" => {
                let indices = fields
                    .map(|token| {
                        resolve_index(token, positions.len()).ok_or_else(|| {
                            parse_error(
                                line_no,
                                format!(
                                    "invalid vertex reference '{}' ({} vertices defined so far)",
                                    token,
                                    positions.len()
                                ),
                            )
                        })
                    })
                    .collect::<MeshResult<Vec<_>>>()?;

                if keyword == "f" {
                    polygons.push(indices);
                } else if indices.len() < 2 {
                    return Err(parse_error(line_no, "line element needs at least two vertices".into()));
                } else {
                    lines.push(indices);
                }
            }
            _ => ignored += 1,
        }
    }

    if ignored > 0 {
        debug!("Ignored {} unsupported OBJ records", ignored);
    }

    let mut mesh = EditMesh::with_capacity(positions.len(), polygons.len());
    for &[x, y, z] in &positions {
        mesh.add_vertex(Point3::new(x, y, z));
    }
    if normals.len() == positions.len() {
        for (vertex, &[x, y, z]) in mesh.vertices.iter_mut().zip(&normals) {
            vertex.normal = Vector3::new(x, y, z)
                .try_normalize(f64::EPSILON)
                .unwrap_or_else(Vector3::zeros);
        }
    } else if !normals.is_empty() {
        warn!(
            "OBJ has {} normals for {} vertices; stored normals ignored",
            normals.len(),
            positions.len()
        );
    }

    for polygon in &polygons {
        mesh.add_face(polygon)?;
    }
    for polyline in &lines {
        for pair in polyline.windows(2) {
            mesh.add_edge(pair[0], pair[1])?;
        }
    }

    mesh.compute_normals();
    Ok(mesh)
}

/// Save mesh to OBJ file.
///
/// Vertices are written in index order with their normals. Faces are written
/// as polygons and edges without faces as `l` records, so a reload
/// reproduces the same vertex, face and wire-edge indices.
pub fn save_obj(mesh: &EditMesh, path: &Path) -> MeshResult<()> {
    info!("Saving mesh to {:?} (OBJ format)", path);

    let file = File::create(path).map_err(|e| MeshError::IoWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);

    write_obj(mesh, &mut writer)
        .and_then(|()| writer.flush())
        .map_err(|e| MeshError::IoWrite {
            path: path.to_path_buf(),
            source: e,
        })?;

    info!(
        "Saved {} vertices and {} faces to {:?}",
        mesh.vertices.len(),
        mesh.faces.len(),
        path
    );

    Ok(())
}

fn write_obj(mesh: &EditMesh, writer: &mut impl Write) -> std::io::Result<()> {
    let wire_count = mesh.wire_edges().count();

    writeln!(writer, "# OBJ file exported by mesh-edit")?;
    writeln!(writer, "# Vertices: {}", mesh.vertices.len())?;
    writeln!(writer, "# Faces: {}", mesh.faces.len())?;
    if wire_count > 0 {
        writeln!(writer, "# Wire edges: {}", wire_count)?;
    }
    writeln!(writer)?;

    for v in &mesh.vertices {
        writeln!(writer, "v {:.9} {:.9} {:.9}", v.position.x, v.position.y, v.position.z)?;
    }

    writeln!(writer)?;
    writeln!(writer, "# Vertex normals")?;
    for v in &mesh.vertices {
        writeln!(writer, "vn {:.6} {:.6} {:.6}", v.normal.x, v.normal.y, v.normal.z)?;
    }

    if !mesh.faces.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "# Faces")?;
        for face in &mesh.faces {
            // OBJ uses 1-based indexing
            write!(writer, "f")?;
            for &v in &face.vertices {
                write!(writer, " {}//{}", v + 1, v + 1)?;
            }
            writeln!(writer)?;
        }
    }

    if wire_count > 0 {
        writeln!(writer)?;
        writeln!(writer, "# Wire edges")?;
        for edge in mesh.edges.iter().filter(|e| e.is_wire()) {
            writeln!(writer, "l {} {}", edge.vertices[0] + 1, edge.vertices[1] + 1)?;
        }
    }

    Ok(())
}
