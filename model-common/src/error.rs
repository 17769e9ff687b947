//! Errors raised while building or decoding vertex layouts and model files.

use thiserror::Error;

use crate::AttributeKind;

/// Layout and format errors
///
/// Every variant is fatal for the layout or file being processed: layout
/// order drives every offset that follows, so nothing is skipped or guessed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("attribute '{0}' appears more than once in the vertex layout")]
    DuplicateAttribute(AttributeKind),

    #[error("unknown attribute tag {0:#x}")]
    UnknownAttributeTag(u32),

    #[error("unknown attribute name '{0}'")]
    UnknownAttributeName(String),

    #[error("vertex layout has no attributes")]
    EmptyLayout,

    #[error("layout records are {len} bytes, not a multiple of the {record}-byte record size")]
    TruncatedLayout { len: usize, record: usize },

    #[error("attribute '{kind}' is recorded as {recorded} bytes, expected {expected}")]
    AttributeSizeMismatch {
        kind: AttributeKind,
        recorded: u32,
        expected: u32,
    },

    #[error("model header needs {expected} bytes, only {actual} available")]
    TruncatedHeader { expected: usize, actual: usize },

    #[error("{section} needs {expected} bytes, only {actual} available")]
    TruncatedData {
        section: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error(
        "header declares stride {header_stride} with mask {header_mask:#x}, \
         layout records give stride {layout_stride} with mask {layout_mask:#x}"
    )]
    LayoutMismatch {
        header_stride: u32,
        header_mask: u32,
        layout_stride: u32,
        layout_mask: u32,
    },

    #[error("unsupported index stride {0} (only 4-byte indices are written)")]
    UnsupportedIndexStride(u32),
}
