//! NetherModel binary format (.nmodel)
//!
//! Self-describing model with a configurable vertex layout.
//! POD format - no magic bytes. All fields use native byte order; reader and
//! writer are expected to share endianness.
//!
//! # Layout
//! ```text
//! 0x00: vertex_count u32
//! 0x04: vertex_stride u32
//! 0x08: index_count u32
//! 0x0C: index_stride u32 (always 4)
//! 0x10: attribute_mask u32
//! 0x14: layout records (popcount(attribute_mask) × 8 bytes, layout order)
//! var:  vertex_data (vertex_count × vertex_stride, interleaved)
//! var:  index_data (index_count × 4 bytes)
//! ```
//!
//! The attribute mask says which kinds are present; the layout records say
//! in which order, so a reader can rebuild every field offset.

use std::io::Write;

use crate::{AttributeKind, FormatError, LAYOUT_RECORD_SIZE, VertexLayout};

/// Bytes per index (u32)
pub const INDEX_STRIDE: u32 = 4;

/// NetherModel header (20 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct ModelHeader {
    pub vertex_count: u32,
    pub vertex_stride: u32,
    pub index_count: u32,
    pub index_stride: u32,
    pub attribute_mask: u32,
}

impl ModelHeader {
    pub const SIZE: usize = 20;

    /// Header for `layout` and the accumulated totals of one export
    pub fn build(layout: &VertexLayout, vertex_count: u32, index_count: u32) -> Self {
        Self {
            vertex_count,
            vertex_stride: layout.stride(),
            index_count,
            index_stride: INDEX_STRIDE,
            attribute_mask: layout.bitmask(),
        }
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.vertex_count.to_ne_bytes());
        bytes[4..8].copy_from_slice(&self.vertex_stride.to_ne_bytes());
        bytes[8..12].copy_from_slice(&self.index_count.to_ne_bytes());
        bytes[12..16].copy_from_slice(&self.index_stride.to_ne_bytes());
        bytes[16..20].copy_from_slice(&self.attribute_mask.to_ne_bytes());
        bytes
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        if bytes.len() < Self::SIZE {
            return Err(FormatError::TruncatedHeader {
                expected: Self::SIZE,
                actual: bytes.len(),
            });
        }
        let word = |at: usize| {
            u32::from_ne_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
        };
        Ok(Self {
            vertex_count: word(0),
            vertex_stride: word(4),
            index_count: word(8),
            index_stride: word(12),
            attribute_mask: word(16),
        })
    }

    /// Number of layout records following the header
    #[inline]
    pub fn attribute_count(&self) -> usize {
        self.attribute_mask.count_ones() as usize
    }

    /// Size of the layout record block
    #[inline]
    pub fn layout_size(&self) -> usize {
        self.attribute_count() * LAYOUT_RECORD_SIZE
    }

    /// Size of the vertex buffer in bytes
    #[inline]
    pub fn vertex_data_size(&self) -> usize {
        (self.vertex_count as usize).saturating_mul(self.vertex_stride as usize)
    }

    /// Size of the index buffer in bytes
    #[inline]
    pub fn index_data_size(&self) -> usize {
        (self.index_count as usize).saturating_mul(self.index_stride as usize)
    }

    /// Total file size described by this header
    pub fn file_size(&self) -> usize {
        Self::SIZE
            .saturating_add(self.layout_size())
            .saturating_add(self.vertex_data_size())
            .saturating_add(self.index_data_size())
    }
}

/// A complete model: header, layout, vertex buffer and flat index buffer
#[derive(Debug, Clone, PartialEq)]
pub struct ModelFile {
    pub header: ModelHeader,
    pub layout: VertexLayout,
    /// Interleaved vertices, `vertex_count × vertex_stride` bytes
    pub vertex_data: Vec<u8>,
    /// Indices into the flat vertex buffer
    pub index_data: Vec<u32>,
}

impl ModelFile {
    /// Encode the whole file in memory
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.header.file_size());
        bytes.extend_from_slice(&self.header.to_bytes());
        bytes.extend_from_slice(&self.layout.serialize());
        bytes.extend_from_slice(&self.vertex_data);
        bytes.extend_from_slice(bytemuck::cast_slice(&self.index_data));
        bytes
    }

    /// Write header block, vertex buffer and index buffer in order
    pub fn write_to<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        w.write_all(&self.header.to_bytes())?;
        w.write_all(&self.layout.serialize())?;
        w.write_all(&self.vertex_data)?;
        w.write_all(bytemuck::cast_slice(&self.index_data))?;
        Ok(())
    }

    /// Decode a file produced by [`to_bytes`](Self::to_bytes).
    ///
    /// Trailing bytes past the index buffer are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        let header = ModelHeader::from_bytes(bytes)?;
        if header.index_stride != INDEX_STRIDE {
            return Err(FormatError::UnsupportedIndexStride(header.index_stride));
        }

        let layout_start = ModelHeader::SIZE;
        let layout_end = layout_start + header.layout_size();
        let layout_bytes = section(bytes, "layout records", layout_start, layout_end)?;
        let layout = VertexLayout::deserialize(layout_bytes)?;

        if layout.stride() != header.vertex_stride || layout.bitmask() != header.attribute_mask {
            return Err(FormatError::LayoutMismatch {
                header_stride: header.vertex_stride,
                header_mask: header.attribute_mask,
                layout_stride: layout.stride(),
                layout_mask: layout.bitmask(),
            });
        }

        let vertex_end = layout_end.saturating_add(header.vertex_data_size());
        let vertex_data = section(bytes, "vertex buffer", layout_end, vertex_end)?.to_vec();

        let index_end = vertex_end.saturating_add(header.index_data_size());
        let index_data = section(bytes, "index buffer", vertex_end, index_end)?
            .chunks_exact(INDEX_STRIDE as usize)
            .map(|chunk| u32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();

        Ok(Self {
            header,
            layout,
            vertex_data,
            index_data,
        })
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.header.vertex_count as usize
    }

    /// Packed bytes of vertex `v`
    pub fn vertex(&self, v: usize) -> Option<&[u8]> {
        let stride = self.layout.stride() as usize;
        let start = v.checked_mul(stride)?;
        self.vertex_data.get(start..start.checked_add(stride)?)
    }

    /// Raw bytes of attribute `kind` at vertex `v`
    pub fn attribute(&self, v: usize, kind: AttributeKind) -> Option<&[u8]> {
        let offset = self.layout.offset_of(kind)? as usize;
        self.vertex(v)?.get(offset..offset + kind.size() as usize)
    }

    /// Attribute `kind` at vertex `v`, decoded to floats
    pub fn read_attribute(&self, v: usize, kind: AttributeKind) -> Option<Vec<f32>> {
        let raw = self.attribute(v, kind)?;
        Some(
            raw.chunks_exact(4)
                .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        )
    }
}

fn section<'a>(
    bytes: &'a [u8],
    name: &'static str,
    start: usize,
    end: usize,
) -> Result<&'a [u8], FormatError> {
    bytes.get(start..end).ok_or(FormatError::TruncatedData {
        section: name,
        expected: end - start,
        actual: bytes.len().saturating_sub(start),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ATTRIBUTE_POSITION, ATTRIBUTE_UV};
    use AttributeKind::*;

    fn triangle_model() -> ModelFile {
        let layout = VertexLayout::from_kinds([Position, Uv]).unwrap();
        let floats: [f32; 15] = [
            0.0, 0.0, 0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, 1.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, 1.0,
        ];
        ModelFile {
            header: ModelHeader::build(&layout, 3, 3),
            layout,
            vertex_data: bytemuck::cast_slice(&floats).to_vec(),
            index_data: vec![0, 1, 2],
        }
    }

    #[test]
    fn test_header_size() {
        assert_eq!(ModelHeader::SIZE, 20);
        assert_eq!(std::mem::size_of::<ModelHeader>(), ModelHeader::SIZE);
    }

    #[test]
    fn test_header_roundtrip() {
        let layout = VertexLayout::from_kinds([Position]).unwrap();
        let header = ModelHeader::build(&layout, 3, 3);
        assert_eq!(header.vertex_stride, 12);
        assert_eq!(header.index_stride, 4);
        assert_eq!(header.attribute_mask, ATTRIBUTE_POSITION);

        let bytes = header.to_bytes();
        assert_eq!(&bytes[0..4], &3u32.to_ne_bytes());
        assert_eq!(&bytes[16..20], &ATTRIBUTE_POSITION.to_ne_bytes());
        assert_eq!(ModelHeader::from_bytes(&bytes), Ok(header));
    }

    #[test]
    fn test_header_from_short_bytes() {
        assert_eq!(
            ModelHeader::from_bytes(&[0u8; 19]),
            Err(FormatError::TruncatedHeader {
                expected: 20,
                actual: 19,
            })
        );
    }

    #[test]
    fn test_file_roundtrip() {
        let model = triangle_model();
        let bytes = model.to_bytes();
        assert_eq!(bytes.len(), model.header.file_size());
        assert_eq!(bytes.len(), 20 + 16 + 60 + 12);

        let mut written = Vec::new();
        model.write_to(&mut written).unwrap();
        assert_eq!(written, bytes);

        assert_eq!(ModelFile::from_bytes(&bytes), Ok(model));
    }

    #[test]
    fn test_attribute_access() {
        let model = triangle_model();
        assert_eq!(model.read_attribute(1, Position), Some(vec![1.0, 0.0, 0.0]));
        assert_eq!(model.read_attribute(2, Uv), Some(vec![0.0, 1.0]));
        assert_eq!(model.read_attribute(2, Normal), None);
        assert_eq!(model.read_attribute(3, Position), None);
        assert_eq!(model.vertex(0).map(<[u8]>::len), Some(20));
    }

    #[test]
    fn test_truncated_sections() {
        let bytes = triangle_model().to_bytes();

        assert!(matches!(
            ModelFile::from_bytes(&bytes[..24]),
            Err(FormatError::TruncatedData {
                section: "layout records",
                ..
            })
        ));
        assert!(matches!(
            ModelFile::from_bytes(&bytes[..50]),
            Err(FormatError::TruncatedData {
                section: "vertex buffer",
                ..
            })
        ));
        assert_eq!(
            ModelFile::from_bytes(&bytes[..bytes.len() - 1]),
            Err(FormatError::TruncatedData {
                section: "index buffer",
                expected: 12,
                actual: 11,
            })
        );
    }

    #[test]
    fn test_layout_mismatch() {
        let mut model = triangle_model();
        model.header.vertex_stride = 24;
        let bytes = model.to_bytes();
        assert_eq!(
            ModelFile::from_bytes(&bytes),
            Err(FormatError::LayoutMismatch {
                header_stride: 24,
                header_mask: ATTRIBUTE_POSITION | ATTRIBUTE_UV,
                layout_stride: 20,
                layout_mask: ATTRIBUTE_POSITION | ATTRIBUTE_UV,
            })
        );
    }

    #[test]
    fn test_unsupported_index_stride() {
        let mut model = triangle_model();
        model.header.index_stride = 2;
        assert_eq!(
            ModelFile::from_bytes(&model.to_bytes()),
            Err(FormatError::UnsupportedIndexStride(2))
        );
    }
}
