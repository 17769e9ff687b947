//! model-export library
//!
//! Scene import, vertex packing and .nmodel writing, for use by other tools
//! that bundle models further.

mod error;
pub mod formats;
pub mod manifest;
pub mod mesh;

pub use error::ExportError;

// Re-export the attribute registry and layout types from model-common
pub use model_common::{
    AttributeKind, ModelFile, ModelHeader, VertexLayout, INDEX_STRIDE, MODEL_EXT,
};

// Re-export key types for model conversion
pub use formats::{read_model_file, write_model, write_model_file};
pub use mesh::{convert, convert_to_memory, export_scene, load_scene, ModelBuilder, SceneNode};
