//! Export errors

use std::io;
use std::path::PathBuf;

use model_common::{AttributeKind, FormatError};
use thiserror::Error;

/// Errors that abort one export run
///
/// Raised before the destination is opened wherever possible, so a failed
/// export leaves no output behind.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("mesh '{mesh}' has no {attribute} data but the vertex layout requires it")]
    MissingAttributeData {
        mesh: String,
        attribute: AttributeKind,
    },

    #[error("mesh '{mesh}' has {actual} {attribute} values for {expected} vertices")]
    AttributeLengthMismatch {
        mesh: String,
        attribute: AttributeKind,
        expected: usize,
        actual: usize,
    },

    #[error("mesh '{mesh}' references vertex {index} but has only {vertex_count} vertices")]
    IndexOutOfRange {
        mesh: String,
        index: u32,
        vertex_count: usize,
    },

    #[error("model has more than {} vertices", u32::MAX)]
    TooManyVertices,

    #[error("model has more than {} indices", u32::MAX)]
    TooManyIndices,

    #[error("cannot open {} for writing", path.display())]
    DestinationUnwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write model data")]
    Write(#[source] io::Error),

    #[error(transparent)]
    Format(#[from] FormatError),
}
