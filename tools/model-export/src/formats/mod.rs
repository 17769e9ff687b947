//! Binary format definitions for .nmodel files
//!
//! Re-exports from model-common for writing and reading model files.

pub use model_common::formats::*;

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::ExportError;

/// Write a complete model: header block, vertex buffer, index buffer
pub fn write_model<W: Write>(w: &mut W, model: &ModelFile) -> Result<(), ExportError> {
    model.write_to(w).map_err(ExportError::Write)
}

/// Create (or truncate) `path` and write `model` to it
///
/// The file handle is closed on every path; a failure after the file was
/// opened can leave a partial file behind.
pub fn write_model_file(path: &Path, model: &ModelFile) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|source| ExportError::DestinationUnwritable {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);

    write_model(&mut writer, model)?;
    writer.flush().map_err(ExportError::Write)?;

    Ok(())
}

/// Read and validate a model file
pub fn read_model_file(path: &Path) -> Result<ModelFile> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read model: {:?}", path))?;
    let model = ModelFile::from_bytes(&bytes)
        .with_context(|| format!("Failed to decode model: {:?}", path))?;
    Ok(model)
}

/// Log the header, layout and field offsets of a model file
pub fn inspect_model(path: &Path) -> Result<()> {
    let model = read_model_file(path)?;
    let header = &model.header;

    tracing::info!("Model {:?}:", path);
    tracing::info!(
        "  vertices: {} × {} bytes",
        header.vertex_count,
        header.vertex_stride
    );
    tracing::info!(
        "  indices: {} × {} bytes ({} triangles)",
        header.index_count,
        header.index_stride,
        header.index_count / 3
    );
    tracing::info!("  attribute mask: {:#09b}", header.attribute_mask);
    for (kind, offset) in model.layout.fields() {
        tracing::info!(
            "  [{:>2}] {} ({} bytes, tag {:#x})",
            offset,
            kind,
            kind.size(),
            kind.tag()
        );
    }

    Ok(())
}
