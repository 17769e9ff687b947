//! glTF JSON structure building.

use serde_json::{json, Value};

use super::binary_packing::{PackedAccessor, PackedBuffer};
use super::mesh_data::{compute_bounds, NodeData, PrimitiveData};

const FLOAT: u32 = 5126;
const UNSIGNED_INT: u32 = 5125;
const ARRAY_BUFFER: u32 = 34962;
const ELEMENT_ARRAY_BUFFER: u32 = 34963;

/// Buffer views and accessors, appended in lockstep
#[derive(Default)]
struct Accessors {
    buffer_views: Vec<Value>,
    accessors: Vec<Value>,
}

impl Accessors {
    fn push(&mut self, packed: &PackedAccessor, kind: &str, component: u32, target: u32) -> usize {
        self.buffer_views.push(json!({
            "buffer": 0,
            "byteOffset": packed.offset,
            "byteLength": packed.length,
            "target": target,
        }));
        self.accessors.push(json!({
            "bufferView": self.buffer_views.len() - 1,
            "componentType": component,
            "count": packed.count,
            "type": kind,
        }));
        self.accessors.len() - 1
    }
}

/// Build the glTF JSON document for packed primitives and a node tree
pub(crate) fn build_gltf_json(
    bin_uri: &str,
    packed: &PackedBuffer,
    primitives: &[PrimitiveData],
    nodes: &[NodeData],
    scene_roots: &[usize],
) -> Value {
    let mut table = Accessors::default();
    let mut meshes = Vec::new();

    for (data, packed) in primitives.iter().zip(&packed.primitives) {
        let mut attributes = serde_json::Map::new();

        if let Some(position) = &packed.position {
            let index = table.push(position, "VEC3", FLOAT, ARRAY_BUFFER);
            // POSITION accessors must carry bounds
            let (min, max) = compute_bounds(&data.positions);
            table.accessors[index]["min"] = json!(min);
            table.accessors[index]["max"] = json!(max);
            attributes.insert("POSITION".into(), json!(index));
        }
        if let Some(normal) = &packed.normal {
            let index = table.push(normal, "VEC3", FLOAT, ARRAY_BUFFER);
            attributes.insert("NORMAL".into(), json!(index));
        }
        if let Some(uv) = &packed.uv {
            let index = table.push(uv, "VEC2", FLOAT, ARRAY_BUFFER);
            attributes.insert("TEXCOORD_0".into(), json!(index));
        }
        if let Some(tangent) = &packed.tangent {
            let index = table.push(tangent, "VEC4", FLOAT, ARRAY_BUFFER);
            attributes.insert("TANGENT".into(), json!(index));
        }
        if let Some(color) = &packed.color {
            let index = table.push(color, "VEC3", FLOAT, ARRAY_BUFFER);
            attributes.insert("COLOR_0".into(), json!(index));
        }

        let mut primitive = json!({
            "attributes": attributes,
            "mode": data.mode,
        });
        if let Some(indices) = &packed.indices {
            let index = table.push(indices, "SCALAR", UNSIGNED_INT, ELEMENT_ARRAY_BUFFER);
            primitive["indices"] = json!(index);
        }

        meshes.push(json!({
            "name": data.name,
            "primitives": [primitive],
        }));
    }

    let nodes: Vec<Value> = nodes
        .iter()
        .map(|node| {
            let mut value = json!({ "name": node.name });
            if let Some(mesh) = node.mesh {
                value["mesh"] = json!(mesh);
            }
            if !node.children.is_empty() {
                value["children"] = json!(node.children);
            }
            value
        })
        .collect();

    json!({
        "asset": { "version": "2.0", "generator": "model-export tests" },
        "scene": 0,
        "scenes": [{ "nodes": scene_roots }],
        "nodes": nodes,
        "meshes": meshes,
        "accessors": table.accessors,
        "bufferViews": table.buffer_views,
        "buffers": [{ "uri": bin_uri, "byteLength": packed.buffer.len() }],
    })
}
