//! Ordered vertex layouts
//!
//! A [`VertexLayout`] is the ordered set of attributes written for every
//! vertex of one export. Its order is the on-disk field order: the offset of
//! the k-th attribute is the sum of the sizes of attributes `0..k`.
//!
//! # Layout records
//! ```text
//! per attribute, in layout order:
//!   0x00: size u32 (bytes per vertex)
//!   0x04: tag  u32 (single-bit attribute tag)
//! ```
//!
//! Records use native byte order, like the rest of the model format.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{AttributeKind, FormatError};

/// Size of one serialized layout record (size u32 + tag u32)
pub const LAYOUT_RECORD_SIZE: usize = 8;

/// Ordered list of distinct attribute kinds with running stride and mask
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<AttributeKind>", into = "Vec<AttributeKind>")]
pub struct VertexLayout {
    kinds: Vec<AttributeKind>,
    stride: u32,
    mask: u32,
}

impl VertexLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a layout from kinds in the given order
    pub fn from_kinds<I>(kinds: I) -> Result<Self, FormatError>
    where
        I: IntoIterator<Item = AttributeKind>,
    {
        let mut layout = Self::new();
        for kind in kinds {
            layout.add_attribute(kind)?;
        }
        Ok(layout)
    }

    /// Layout holding every registered kind set in `mask`, in canonical order.
    /// Unknown bits are ignored.
    pub fn canonical(mask: u32) -> Self {
        let mut layout = Self::new();
        for kind in AttributeKind::in_mask(mask) {
            layout.push_unchecked(kind);
        }
        layout
    }

    /// Append `kind` to the layout
    pub fn add_attribute(&mut self, kind: AttributeKind) -> Result<(), FormatError> {
        if self.contains(kind) {
            return Err(FormatError::DuplicateAttribute(kind));
        }
        self.push_unchecked(kind);
        Ok(())
    }

    /// Builder form of [`add_attribute`](Self::add_attribute)
    pub fn with(mut self, kind: AttributeKind) -> Result<Self, FormatError> {
        self.add_attribute(kind)?;
        Ok(self)
    }

    fn push_unchecked(&mut self, kind: AttributeKind) {
        self.kinds.push(kind);
        self.stride += kind.size();
        self.mask |= kind.tag();
    }

    /// Bytes per packed vertex
    #[inline]
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// OR of every member's tag
    #[inline]
    pub fn bitmask(&self) -> u32 {
        self.mask
    }

    #[inline]
    pub fn kinds(&self) -> &[AttributeKind] {
        &self.kinds
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    #[inline]
    pub fn contains(&self, kind: AttributeKind) -> bool {
        self.mask & kind.tag() != 0
    }

    /// True when every bit of `mask` is present in the layout
    #[inline]
    pub fn has_all(&self, mask: u32) -> bool {
        self.mask & mask == mask
    }

    /// Byte offset of `kind` within a packed vertex
    pub fn offset_of(&self, kind: AttributeKind) -> Option<u32> {
        self.fields()
            .find(|&(member, _)| member == kind)
            .map(|(_, offset)| offset)
    }

    /// `(kind, offset)` pairs in layout order
    pub fn fields(&self) -> impl Iterator<Item = (AttributeKind, u32)> + '_ {
        self.kinds.iter().scan(0u32, |offset, &kind| {
            let field = (kind, *offset);
            *offset += kind.size();
            Some(field)
        })
    }

    /// Size of the serialized layout records
    #[inline]
    pub fn record_size(&self) -> usize {
        self.kinds.len() * LAYOUT_RECORD_SIZE
    }

    /// Encode as `(size, tag)` records in layout order
    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.record_size());
        for kind in &self.kinds {
            bytes.extend_from_slice(&kind.size().to_ne_bytes());
            bytes.extend_from_slice(&kind.tag().to_ne_bytes());
        }
        bytes
    }

    /// Decode records produced by [`serialize`](Self::serialize)
    pub fn deserialize(bytes: &[u8]) -> Result<Self, FormatError> {
        if !bytes.len().is_multiple_of(LAYOUT_RECORD_SIZE) {
            return Err(FormatError::TruncatedLayout {
                len: bytes.len(),
                record: LAYOUT_RECORD_SIZE,
            });
        }

        let mut layout = Self::new();
        for record in bytes.chunks_exact(LAYOUT_RECORD_SIZE) {
            let size = u32::from_ne_bytes([record[0], record[1], record[2], record[3]]);
            let tag = u32::from_ne_bytes([record[4], record[5], record[6], record[7]]);

            let kind = AttributeKind::from_tag(tag).ok_or(FormatError::UnknownAttributeTag(tag))?;
            if size != kind.size() {
                return Err(FormatError::AttributeSizeMismatch {
                    kind,
                    recorded: size,
                    expected: kind.size(),
                });
            }
            layout.add_attribute(kind)?;
        }
        Ok(layout)
    }
}

impl TryFrom<Vec<AttributeKind>> for VertexLayout {
    type Error = FormatError;

    fn try_from(kinds: Vec<AttributeKind>) -> Result<Self, Self::Error> {
        Self::from_kinds(kinds)
    }
}

impl From<VertexLayout> for Vec<AttributeKind> {
    fn from(layout: VertexLayout) -> Self {
        layout.kinds
    }
}

impl fmt::Display for VertexLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, kind) in self.kinds.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{kind}")?;
        }
        Ok(())
    }
}

/// Parse a layout string such as `position,normal,uv` or `pos+uv`.
/// Order is preserved; an empty list is rejected.
impl FromStr for VertexLayout {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kinds = s
            .split(|c: char| c == ',' || c == '+' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(AttributeKind::from_str)
            .collect::<Result<Vec<_>, _>>()?;

        if kinds.is_empty() {
            return Err(FormatError::EmptyLayout);
        }
        Self::from_kinds(kinds)
    }
}
