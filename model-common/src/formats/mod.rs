//! Binary model format
//!
//! POD format for interleaved vertex data with a self-describing layout.
//! No magic bytes - the format is determined by context (the `.nmodel`
//! extension or the caller).
//!
//! Headers implement the [`BinarySerializable`] trait for consistent
//! serialization/deserialization.

pub mod model;
mod serialization;

pub use model::*;
pub use serialization::BinarySerializable;

/// File extension for exported models
pub const MODEL_EXT: &str = "nmodel";
