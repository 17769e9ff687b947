//! glTF/GLB scene import

use anyhow::{bail, Context, Result};
use glam::Vec3;
use std::path::Path;

use super::types::{SceneNode, SourceMesh};

/// Load the default scene of a glTF/GLB file (or its first scene) as a node tree
///
/// Each triangle primitive becomes one [`SourceMesh`]. Node transforms are
/// not applied; vertices keep their mesh-space coordinates.
pub fn load_gltf_scene(input: &Path) -> Result<SceneNode> {
    let (document, buffers, _images) =
        gltf::import(input).with_context(|| format!("Failed to load glTF: {:?}", input))?;

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .context("No scenes found in glTF")?;

    let mut root = SceneNode::new(scene.name().map(str::to_string));
    for node in scene.nodes() {
        root.children.push(convert_node(&node, &buffers)?);
    }
    Ok(root)
}

fn convert_node(node: &gltf::Node, buffers: &[gltf::buffer::Data]) -> Result<SceneNode> {
    let mut out = SceneNode::new(node.name().map(str::to_string));

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            out.meshes.push(convert_primitive(&mesh, &primitive, buffers)?);
        }
    }

    for child in node.children() {
        out.children.push(convert_node(&child, buffers)?);
    }

    Ok(out)
}

fn convert_primitive(
    mesh: &gltf::Mesh,
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
) -> Result<SourceMesh> {
    let name = match mesh.name() {
        Some(name) => format!("{}.{}", name, primitive.index()),
        None => format!("mesh{}.{}", mesh.index(), primitive.index()),
    };

    if primitive.mode() != gltf::mesh::Mode::Triangles {
        bail!(
            "Primitive '{}' uses {:?}; only triangle lists are supported",
            name,
            primitive.mode()
        );
    }

    let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

    // Positions (required)
    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .with_context(|| format!("No positions in primitive '{}'", name))?
        .collect();

    let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(|iter| iter.collect());

    let uvs: Option<Vec<[f32; 2]>> = reader
        .read_tex_coords(0)
        .map(|iter| iter.into_f32().collect());

    // COLOR_0 as RGBA (alpha 1.0 for RGB sources)
    let colors: Option<Vec<[f32; 4]>> = reader
        .read_colors(0)
        .map(|iter| iter.into_rgba_f32().collect());

    // Tangents are vec4: xyz=direction, w=handedness sign (+1 or -1)
    let tangents4: Option<Vec<[f32; 4]>> = reader.read_tangents().map(|iter| iter.collect());

    let (tangents, bitangents): (Option<Vec<[f32; 3]>>, Option<Vec<[f32; 3]>>) =
        match (&tangents4, &normals) {
            (Some(t), _) if t.len() != positions.len() => {
                tracing::warn!(
                    "Primitive '{}' has mismatched tangent count ({} vs {} vertices), ignoring tangents",
                    name,
                    t.len(),
                    positions.len()
                );
                (None, None)
            }
            (Some(t), Some(n)) => {
                let tangents = t.iter().map(|t| [t[0], t[1], t[2]]).collect();
                let bitangents = n.iter().zip(t).map(|(n, t)| bitangent(*n, *t)).collect();
                (Some(tangents), Some(bitangents))
            }
            (Some(t), None) => {
                tracing::warn!(
                    "Primitive '{}' has tangents but no normals, bitangents unavailable",
                    name
                );
                (Some(t.iter().map(|t| [t[0], t[1], t[2]]).collect()), None)
            }
            (None, _) => (None, None),
        };

    // Non-indexed primitives draw their vertices in order
    let indices: Vec<u32> = match reader.read_indices() {
        Some(iter) => iter.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };
    if !indices.len().is_multiple_of(3) {
        bail!(
            "Primitive '{}' has {} indices, not a whole number of triangles",
            name,
            indices.len()
        );
    }
    let faces = indices.chunks_exact(3).map(|f| [f[0], f[1], f[2]]).collect();

    Ok(SourceMesh {
        name: Some(name),
        positions,
        normals,
        tangents,
        bitangents,
        uvs,
        colors,
        faces,
    })
}

/// Bitangent from normal and handed tangent: `cross(n, t.xyz) * t.w`
fn bitangent(normal: [f32; 3], tangent: [f32; 4]) -> [f32; 3] {
    let n = Vec3::from(normal);
    let t = Vec3::new(tangent[0], tangent[1], tangent[2]);
    (n.cross(t) * tangent[3]).to_array()
}
