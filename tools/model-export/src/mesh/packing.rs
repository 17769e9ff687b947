//! Vertex packing and model assembly
//!
//! Vertices are interleaved: all attributes of vertex 0 in layout order,
//! then vertex 1, and so on. Every scalar is an `f32` in native byte order.
//!
//! Indices are mesh-local in the source. When meshes are concatenated each
//! mesh's indices are offset by the number of vertices already emitted, so
//! the flat index buffer addresses the flat vertex buffer.

use model_common::{AttributeKind, FormatError, ModelFile, ModelHeader, VertexLayout};
use rayon::prelude::*;

use super::types::{AttributeSource, Mesh};
use crate::ExportError;

/// Pack the vertices of `mesh` according to `layout`
///
/// Output is exactly `vertex_count × stride` bytes. Every attribute source is
/// resolved before the first byte is written, so a missing attribute yields
/// an error and no partial buffer.
pub fn pack_vertices(mesh: &Mesh, layout: &VertexLayout) -> Result<Vec<u8>, ExportError> {
    let vertex_count = mesh.vertex_count();

    let sources: Vec<(AttributeKind, usize, AttributeSource<'_>)> = layout
        .kinds()
        .iter()
        .map(|&kind| {
            let source = mesh
                .attribute(kind)
                .ok_or_else(|| ExportError::MissingAttributeData {
                    mesh: mesh.name.clone(),
                    attribute: kind,
                })?;
            if source.len() != vertex_count {
                return Err(ExportError::AttributeLengthMismatch {
                    mesh: mesh.name.clone(),
                    attribute: kind,
                    expected: vertex_count,
                    actual: source.len(),
                });
            }
            Ok((kind, kind.components(), source))
        })
        .collect::<Result<_, _>>()?;

    let stride = layout.stride() as usize;
    let mut data = Vec::with_capacity(vertex_count * stride);

    for v in 0..vertex_count {
        for &(kind, components, source) in &sources {
            let values = source
                .get(v, components)
                .filter(|values| values.len() == components)
                .ok_or_else(|| ExportError::AttributeLengthMismatch {
                    mesh: mesh.name.clone(),
                    attribute: kind,
                    expected: vertex_count,
                    actual: source.len(),
                })?;
            data.extend_from_slice(bytemuck::cast_slice(values));
        }
    }

    Ok(data)
}

/// Offset mesh-local `indices` by `base`, the number of vertices emitted
/// before this mesh
pub fn renumber_indices(indices: &[u32], base: u32) -> Result<Vec<u32>, ExportError> {
    indices
        .iter()
        .map(|&i| base.checked_add(i).ok_or(ExportError::TooManyVertices))
        .collect()
}

/// Native-endian bytes of a u32 index buffer
pub fn pack_indices(indices: &[u32]) -> Vec<u8> {
    bytemuck::cast_slice(indices).to_vec()
}

/// Pack several meshes in parallel; results keep the order of `meshes`
pub fn pack_meshes(meshes: &[Mesh], layout: &VertexLayout) -> Result<Vec<Vec<u8>>, ExportError> {
    meshes
        .par_iter()
        .map(|mesh| pack_vertices(mesh, layout))
        .collect()
}

/// Check `mesh`'s indices against its vertex count and offset them by `base`.
/// Returns the renumbered indices and the vertex total after this mesh.
fn stage_indices(mesh: &Mesh, base: u32) -> Result<(Vec<u32>, u32), ExportError> {
    let vertex_count = mesh.vertex_count();
    if let Some(&index) = mesh.indices.iter().find(|&&i| i as usize >= vertex_count) {
        return Err(ExportError::IndexOutOfRange {
            mesh: mesh.name.clone(),
            index,
            vertex_count,
        });
    }

    let total = u32::try_from(vertex_count)
        .ok()
        .and_then(|n| base.checked_add(n))
        .ok_or(ExportError::TooManyVertices)?;
    let indices = renumber_indices(&mesh.indices, base)?;
    Ok((indices, total))
}

/// Accumulates packed meshes for one export
///
/// The builder owns the layout, so the layout cannot change once the first
/// mesh has been packed. [`finish`](Self::finish) consumes the builder and
/// produces the header from the accumulated totals.
#[derive(Debug)]
pub struct ModelBuilder {
    layout: VertexLayout,
    vertex_data: Vec<u8>,
    indices: Vec<u32>,
    vertex_count: u32,
    mesh_count: usize,
}

impl ModelBuilder {
    pub fn new(layout: VertexLayout) -> Result<Self, ExportError> {
        if layout.is_empty() {
            return Err(FormatError::EmptyLayout.into());
        }
        Ok(Self {
            layout,
            vertex_data: Vec::new(),
            indices: Vec::new(),
            vertex_count: 0,
            mesh_count: 0,
        })
    }

    #[inline]
    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    #[inline]
    pub fn mesh_count(&self) -> usize {
        self.mesh_count
    }

    /// Pack and append one mesh
    pub fn add_mesh(&mut self, mesh: &Mesh) -> Result<(), ExportError> {
        self.add_meshes(std::slice::from_ref(mesh))
    }

    /// Pack meshes in parallel, then append them in order
    ///
    /// All-or-nothing: if any mesh fails, the builder is left as it was.
    pub fn add_meshes(&mut self, meshes: &[Mesh]) -> Result<(), ExportError> {
        let packed = pack_meshes(meshes, &self.layout)?;

        let mut base = self.vertex_count;
        let mut staged = Vec::with_capacity(meshes.len());
        for mesh in meshes {
            let (indices, next) = stage_indices(mesh, base)?;
            staged.push(indices);
            base = next;
        }

        for (vertex_data, indices) in packed.into_iter().zip(staged) {
            self.vertex_data.extend_from_slice(&vertex_data);
            self.indices.extend_from_slice(&indices);
        }
        self.vertex_count = base;
        self.mesh_count += meshes.len();
        Ok(())
    }

    /// Build the header and hand over the finished model
    pub fn finish(self) -> Result<ModelFile, ExportError> {
        let index_count =
            u32::try_from(self.indices.len()).map_err(|_| ExportError::TooManyIndices)?;
        let header = ModelHeader::build(&self.layout, self.vertex_count, index_count);

        tracing::debug!(
            "Assembled {} meshes: {} vertices, {} indices, stride={}",
            self.mesh_count,
            header.vertex_count,
            header.index_count,
            header.vertex_stride
        );

        Ok(ModelFile {
            header,
            layout: self.layout,
            vertex_data: self.vertex_data,
            index_data: self.indices,
        })
    }
}
