//! Shared types for the model export pipeline
//!
//! This crate holds everything a writer and a reader of `.nmodel` files must
//! agree on:
//!
//! - [`attribute`] - attribute registry (sizes and single-bit tags)
//! - [`layout`] - ordered vertex layouts, stride/offset arithmetic and layout records
//! - [`formats`] - model header and whole-file codec

pub mod attribute;
mod error;
pub mod formats;
pub mod layout;

pub use attribute::{
    ATTRIBUTE_BITANGENT, ATTRIBUTE_COLOR_RGB, ATTRIBUTE_COLOR_RGBA, ATTRIBUTE_NORMAL,
    ATTRIBUTE_POSITION, ATTRIBUTE_TANGENT, ATTRIBUTE_UV, AttributeInfo, AttributeKind,
    COMPONENT_SIZE, REGISTRY, known_attribute_mask,
};
pub use error::FormatError;
pub use formats::{BinarySerializable, INDEX_STRIDE, MODEL_EXT, ModelFile, ModelHeader};
pub use layout::{LAYOUT_RECORD_SIZE, VertexLayout};
