//! Model converter (glTF/OBJ -> .nmodel)

mod flatten;
mod gltf;
mod obj;
mod packing;
mod types;

use anyhow::{bail, Context, Result};
use model_common::{ModelFile, VertexLayout};
use std::path::Path;

use crate::formats::write_model_file;
use crate::ExportError;

// Re-export public API
pub use flatten::{detect_layout, flatten_mesh, flatten_scene};
pub use self::gltf::load_gltf_scene;
pub use obj::{load_obj_scene, parse_obj};
pub use packing::{pack_indices, pack_meshes, pack_vertices, renumber_indices, ModelBuilder};
pub use types::{AttributeSource, Mesh, SceneNode, SourceMesh};

/// Scene file extensions the importers understand
pub const SCENE_EXTENSIONS: &[&str] = &["obj", "gltf", "glb"];

/// Import a scene, picking the importer by file extension
pub fn load_scene(input: &Path) -> Result<SceneNode> {
    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "obj" => load_obj_scene(input),
        "gltf" | "glb" => load_gltf_scene(input),
        _ => bail!(
            "Unsupported scene format: {:?} (use .obj, .gltf, or .glb)",
            input
        ),
    }
}

/// Flatten and pack a whole scene into an in-memory model
///
/// Without an explicit layout, the canonical layout of the attributes every
/// mesh supplies is used.
pub fn export_scene(
    scene: &SceneNode,
    layout: Option<&VertexLayout>,
) -> Result<ModelFile, ExportError> {
    let layout = match layout {
        Some(layout) => layout.clone(),
        None => {
            let detected = detect_layout(scene);
            tracing::info!("Auto-detected vertex layout [{}]", detected);
            detected
        }
    };

    let meshes = flatten_scene(scene, &layout)?;

    let mut builder = ModelBuilder::new(layout)?;
    builder.add_meshes(&meshes)?;
    let mesh_count = builder.mesh_count();
    let model = builder.finish()?;

    tracing::debug!(
        "Packed {} meshes: {} vertices, {} indices",
        mesh_count,
        model.header.vertex_count,
        model.header.index_count
    );

    Ok(model)
}

/// Convert a scene file to an in-memory model (for pipelines that pack further)
pub fn convert_to_memory(input: &Path, layout: Option<&VertexLayout>) -> Result<ModelFile> {
    let scene = load_scene(input)?;
    let model =
        export_scene(&scene, layout).with_context(|| format!("Failed to export {:?}", input))?;
    Ok(model)
}

/// Convert a scene file and write the model to `output`
///
/// Every check runs before `output` is opened; a failed conversion leaves
/// no file behind.
pub fn convert(input: &Path, output: &Path, layout: Option<&VertexLayout>) -> Result<()> {
    let model = convert_to_memory(input, layout)?;
    write_model_file(output, &model)?;

    tracing::info!(
        "Converted model: {} vertices, {} indices, layout=[{}], stride={} -> {:?}",
        model.header.vertex_count,
        model.header.index_count,
        model.layout,
        model.header.vertex_stride,
        output
    );

    Ok(())
}
