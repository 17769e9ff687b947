//! Programmatic glTF scene generation for integration tests.
//!
//! Writes a `.gltf` JSON document plus its `.bin` buffer with:
//! - one triangle mesh per node (positions, normals, UVs, tangents, indices)
//! - a small node tree to exercise traversal order

mod binary_packing;
mod gltf_json;
mod mesh_data;

pub use mesh_data::{offset_triangle, NodeData, PrimitiveData, LINES};

use std::path::{Path, PathBuf};

/// Node tree used by the traversal tests:
///
/// ```text
/// root (A) -> [left (B) -> [leaf (C)], right (D)]
/// ```
///
/// Mesh `k` in traversal order is a triangle shifted by `k` on X.
pub fn generate_tree_scene(dir: &Path) -> PathBuf {
    let primitives = vec![
        offset_triangle("A", 0.0),
        offset_triangle("B", 1.0),
        offset_triangle("C", 2.0),
        offset_triangle("D", 3.0),
    ];
    let nodes = vec![
        NodeData::new("root", Some(0), vec![1, 3]),
        NodeData::new("left", Some(1), vec![2]),
        NodeData::new("leaf", Some(2), vec![]),
        NodeData::new("right", Some(3), vec![]),
    ];
    write_gltf(dir, "tree", &primitives, &nodes, &[0])
}

/// Single triangle without normals or tangents
pub fn generate_bare_triangle(dir: &Path) -> PathBuf {
    let mut triangle = offset_triangle("bare", 0.0);
    triangle.normals = None;
    triangle.tangents = None;
    let nodes = vec![NodeData::new("bare", Some(0), vec![])];
    write_gltf(dir, "bare", &[triangle], &nodes, &[0])
}

/// Single primitive under one node, for importer edge cases
pub fn generate_single(dir: &Path, stem: &str, primitive: PrimitiveData) -> PathBuf {
    let nodes = vec![NodeData::new(stem, Some(0), vec![])];
    write_gltf(dir, stem, &[primitive], &nodes, &[0])
}

/// Write `<stem>.gltf` and `<stem>.bin` into `dir`, returning the .gltf path
pub fn write_gltf(
    dir: &Path,
    stem: &str,
    primitives: &[PrimitiveData],
    nodes: &[NodeData],
    scene_roots: &[usize],
) -> PathBuf {
    let bin_name = format!("{}.bin", stem);
    let packed = binary_packing::pack_primitives(primitives);
    let document = gltf_json::build_gltf_json(&bin_name, &packed, primitives, nodes, scene_roots);

    std::fs::write(dir.join(&bin_name), &packed.buffer).expect("Failed to write glTF buffer");

    let gltf_path = dir.join(format!("{}.gltf", stem));
    let text = serde_json::to_string_pretty(&document).expect("Failed to encode glTF JSON");
    std::fs::write(&gltf_path, text).expect("Failed to write glTF");
    gltf_path
}
