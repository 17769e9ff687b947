//! Scene flattening
//!
//! Walks an imported scene pre-order (a node's meshes before its children,
//! siblings in importer order) and turns each mesh into a [`Mesh`] holding
//! only the arrays the layout asks for. The walk order fixes the mesh order
//! in the output and therefore the flat index renumbering.

use model_common::{AttributeKind, VertexLayout};

use super::types::{Mesh, SceneNode, SourceMesh};
use crate::ExportError;

/// Flatten every mesh of `root` against `layout`, in traversal order
pub fn flatten_scene(root: &SceneNode, layout: &VertexLayout) -> Result<Vec<Mesh>, ExportError> {
    root.meshes_pre_order()
        .into_iter()
        .enumerate()
        .map(|(index, source)| flatten_mesh(source, layout, index))
        .collect()
}

/// Flatten one source mesh; `index` is its traversal position, used to name
/// unnamed meshes in errors and logs.
pub fn flatten_mesh(
    source: &SourceMesh,
    layout: &VertexLayout,
    index: usize,
) -> Result<Mesh, ExportError> {
    let name = source
        .name
        .clone()
        .unwrap_or_else(|| format!("mesh {index}"));
    let vertex_count = source.vertex_count();

    let normals = take_attribute(
        layout,
        AttributeKind::Normal,
        source.normals.as_ref(),
        vertex_count,
        &name,
    )?;
    let tangents = take_attribute(
        layout,
        AttributeKind::Tangent,
        source.tangents.as_ref(),
        vertex_count,
        &name,
    )?;
    let bitangents = take_attribute(
        layout,
        AttributeKind::Bitangent,
        source.bitangents.as_ref(),
        vertex_count,
        &name,
    )?;
    let uvs = take_attribute(
        layout,
        AttributeKind::Uv,
        source.uvs.as_ref(),
        vertex_count,
        &name,
    )?;

    // Both color kinds read the same RGBA array
    let colors = match [AttributeKind::ColorRgba, AttributeKind::ColorRgb]
        .into_iter()
        .find(|&kind| layout.contains(kind))
    {
        Some(kind) => take_attribute(layout, kind, source.colors.as_ref(), vertex_count, &name)?,
        None => None,
    };

    let mut indices = Vec::with_capacity(source.faces.len() * 3);
    for &vertex in source.faces.iter().flatten() {
        if vertex as usize >= vertex_count {
            return Err(ExportError::IndexOutOfRange {
                mesh: name,
                index: vertex,
                vertex_count,
            });
        }
        indices.push(vertex);
    }

    tracing::debug!(
        "Flattened mesh '{}': {} vertices, {} triangles",
        name,
        vertex_count,
        source.faces.len()
    );

    Ok(Mesh {
        name,
        positions: source.positions.clone(),
        normals,
        tangents,
        bitangents,
        uvs,
        colors,
        indices,
    })
}

/// Copy an optional source array when `layout` requests `kind`
fn take_attribute<T: Copy>(
    layout: &VertexLayout,
    kind: AttributeKind,
    source: Option<&Vec<T>>,
    vertex_count: usize,
    mesh: &str,
) -> Result<Option<Vec<T>>, ExportError> {
    if !layout.has_all(kind.tag()) {
        return Ok(None);
    }

    let data = source.ok_or_else(|| ExportError::MissingAttributeData {
        mesh: mesh.to_string(),
        attribute: kind,
    })?;

    if data.len() != vertex_count {
        return Err(ExportError::AttributeLengthMismatch {
            mesh: mesh.to_string(),
            attribute: kind,
            expected: vertex_count,
            actual: data.len(),
        });
    }

    Ok(Some(data.clone()))
}

/// Canonical layout of the attributes every mesh in the scene supplies.
/// A scene without meshes gets a position-only layout.
pub fn detect_layout(root: &SceneNode) -> VertexLayout {
    let mask = root
        .meshes_pre_order()
        .into_iter()
        .map(SourceMesh::attribute_mask)
        .reduce(|common, mask| common & mask)
        .unwrap_or(AttributeKind::Position.tag());
    VertexLayout::canonical(mask)
}
