//! Binary data packing for glTF buffers.

use super::mesh_data::PrimitiveData;

/// One buffer view / accessor pair
#[derive(Debug, Clone, Copy)]
pub(crate) struct PackedAccessor {
    pub offset: usize,
    pub length: usize,
    pub count: usize,
}

/// Accessors of one primitive, by attribute
#[derive(Debug, Clone, Default)]
pub(crate) struct PackedPrimitive {
    pub position: Option<PackedAccessor>,
    pub normal: Option<PackedAccessor>,
    pub uv: Option<PackedAccessor>,
    pub tangent: Option<PackedAccessor>,
    pub color: Option<PackedAccessor>,
    pub indices: Option<PackedAccessor>,
}

#[derive(Debug, Default)]
pub(crate) struct PackedBuffer {
    pub buffer: Vec<u8>,
    pub primitives: Vec<PackedPrimitive>,
}

/// Pack every primitive's arrays into a single buffer
pub(crate) fn pack_primitives(primitives: &[PrimitiveData]) -> PackedBuffer {
    let mut packed = PackedBuffer::default();

    for primitive in primitives {
        let buffer = &mut packed.buffer;
        let entry = PackedPrimitive {
            position: Some(push_slice(buffer, &primitive.positions)),
            normal: primitive.normals.as_deref().map(|n| push_slice(buffer, n)),
            uv: primitive.uvs.as_deref().map(|uv| push_slice(buffer, uv)),
            tangent: primitive.tangents.as_deref().map(|t| push_slice(buffer, t)),
            color: primitive.colors.as_deref().map(|c| push_slice(buffer, c)),
            indices: primitive.indices.as_deref().map(|i| push_slice(buffer, i)),
        };
        packed.primitives.push(entry);
    }

    packed
}

fn push_slice<T: bytemuck::Pod>(buffer: &mut Vec<u8>, items: &[T]) -> PackedAccessor {
    // glTF requires accessor offsets aligned to the component size
    while !buffer.len().is_multiple_of(4) {
        buffer.push(0);
    }

    let offset = buffer.len();
    buffer.extend_from_slice(bytemuck::cast_slice(items));
    PackedAccessor {
        offset,
        length: buffer.len() - offset,
        count: items.len(),
    }
}
