//! Wavefront OBJ scene import

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::types::{SceneNode, SourceMesh};

/// Load an OBJ file as a single-node scene
///
/// `o` and `g` statements start a new mesh. Vertices are expanded per face
/// corner, so every mesh's faces are sequential triangles.
pub fn load_obj_scene(input: &Path) -> Result<SceneNode> {
    let file = File::open(input).with_context(|| format!("Failed to open OBJ: {:?}", input))?;
    let name = input
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string);

    let mut scene = parse_obj(BufReader::new(file))?;
    scene.name = name;
    Ok(scene)
}

/// Parse OBJ text into a root node holding one mesh per object/group
pub fn parse_obj<R: BufRead>(reader: R) -> Result<SceneNode> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut vertex_colors: Vec<Option<[f32; 4]>> = Vec::new();
    let mut tex_coords: Vec<[f32; 2]> = Vec::new();
    let mut normals_raw: Vec<[f32; 3]> = Vec::new();

    let mut root = SceneNode::new(None);
    let mut current = ObjMesh::new(None);

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();

        match parts[0] {
            "v" if parts.len() >= 4 => {
                positions.push(parse_floats(&parts[1..4]));
                // Optional per-vertex color extension: v x y z r g b
                vertex_colors.push(if parts.len() >= 7 {
                    let [r, g, b] = parse_floats(&parts[4..7]);
                    Some([r, g, b, 1.0])
                } else {
                    None
                });
            }
            "vt" if parts.len() >= 3 => {
                tex_coords.push(parse_floats(&parts[1..3]));
            }
            "vn" if parts.len() >= 4 => {
                normals_raw.push(parse_floats(&parts[1..4]));
            }
            "o" | "g" => {
                let name = parts.get(1..).map(|p| p.join(" ")).filter(|n| !n.is_empty());
                let finished = std::mem::replace(&mut current, ObjMesh::new(name));
                if let Some(mesh) = finished.finish() {
                    root.meshes.push(mesh);
                }
            }
            "f" if parts.len() >= 4 => {
                let face_verts: Vec<(usize, Option<usize>, Option<usize>)> = parts[1..]
                    .iter()
                    .filter_map(|v| parse_obj_vertex(v))
                    .collect();

                if face_verts.len() < 3 {
                    continue;
                }

                // Fan triangulation for convex polygons
                for i in 1..face_verts.len() - 1 {
                    let base = current.positions.len() as u32;
                    for &idx in &[0, i, i + 1] {
                        let (vi, vti, vni) = face_verts[idx];
                        let position = positions.get(vi).copied().with_context(|| {
                            format!("Line {}: vertex {} out of range", line_no + 1, vi + 1)
                        })?;
                        current.positions.push(position);
                        current
                            .colors
                            .push(vertex_colors.get(vi).copied().flatten());
                        current
                            .uvs
                            .push(vti.and_then(|ti| tex_coords.get(ti).copied()));
                        current
                            .normals
                            .push(vni.and_then(|ni| normals_raw.get(ni).copied()));
                    }
                    current.faces.push([base, base + 1, base + 2]);
                }
            }
            _ => {}
        }
    }

    if let Some(mesh) = current.finish() {
        root.meshes.push(mesh);
    }

    if root.meshes.is_empty() {
        bail!("No vertices found in OBJ file");
    }

    Ok(root)
}

/// Per-corner attribute accumulator for one object/group
struct ObjMesh {
    name: Option<String>,
    positions: Vec<[f32; 3]>,
    uvs: Vec<Option<[f32; 2]>>,
    normals: Vec<Option<[f32; 3]>>,
    colors: Vec<Option<[f32; 4]>>,
    faces: Vec<[u32; 3]>,
}

impl ObjMesh {
    fn new(name: Option<String>) -> Self {
        Self {
            name,
            positions: Vec::new(),
            uvs: Vec::new(),
            normals: Vec::new(),
            colors: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Attributes survive only when every corner supplied them
    fn finish(self) -> Option<SourceMesh> {
        if self.positions.is_empty() {
            return None;
        }

        Some(SourceMesh {
            name: self.name,
            positions: self.positions,
            normals: self.normals.into_iter().collect(),
            tangents: None,
            bitangents: None,
            uvs: self.uvs.into_iter().collect(),
            colors: self.colors.into_iter().collect(),
            faces: self.faces,
        })
    }
}

fn parse_floats<const N: usize>(parts: &[&str]) -> [f32; N] {
    let mut out = [0.0; N];
    for (value, part) in out.iter_mut().zip(parts) {
        *value = part.parse().unwrap_or(0.0);
    }
    out
}

/// Parse OBJ vertex reference: "v", "v/vt", "v/vt/vn", or "v//vn"
fn parse_obj_vertex(s: &str) -> Option<(usize, Option<usize>, Option<usize>)> {
    let parts: Vec<&str> = s.split('/').collect();

    let vi = parts.first()?.parse::<usize>().ok()?.checked_sub(1)?; // OBJ indices are 1-based

    let vti = parts
        .get(1)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<usize>().ok())
        .and_then(|i| i.checked_sub(1));

    let vni = parts
        .get(2)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<usize>().ok())
        .and_then(|i| i.checked_sub(1));

    Some((vi, vti, vni))
}
