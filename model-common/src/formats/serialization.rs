//! Binary serialization trait for format headers.
//!
//! Fixed-size headers implement `BinarySerializable` so generic code can
//! read and write them without knowing the concrete type. Each header keeps
//! its own `to_bytes()` returning a fixed-size array.

/// Trait for binary-serializable format headers.
///
/// The trait returns `Vec<u8>` because associated const generics in return
/// types (`[u8; Self::SIZE]`) are not stable yet. Use the type-specific
/// `to_bytes()` where the array form matters.
///
/// # Example
///
/// ```
/// use model_common::formats::{BinarySerializable, ModelHeader};
/// use model_common::{AttributeKind, VertexLayout};
///
/// let layout = VertexLayout::from_kinds([AttributeKind::Position]).unwrap();
/// let header = ModelHeader::build(&layout, 3, 3);
///
/// let bytes = header.serialize();
/// let parsed = ModelHeader::deserialize(&bytes).unwrap();
/// assert_eq!(parsed, header);
/// ```
pub trait BinarySerializable: Sized {
    /// Size of the serialized header in bytes.
    const SIZE: usize;

    /// Serialize to bytes.
    fn serialize(&self) -> Vec<u8>;

    /// Deserialize from bytes.
    ///
    /// Returns `None` if the byte slice is too short or contains invalid data.
    fn deserialize(bytes: &[u8]) -> Option<Self>;
}

impl BinarySerializable for super::ModelHeader {
    const SIZE: usize = Self::SIZE;

    fn serialize(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }

    fn deserialize(bytes: &[u8]) -> Option<Self> {
        Self::from_bytes(bytes).ok()
    }
}
