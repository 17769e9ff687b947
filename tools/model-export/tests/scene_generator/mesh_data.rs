//! Mesh and node definitions for generated scenes.

/// glTF primitive modes used by the tests
pub const LINES: u32 = 1;
pub const TRIANGLES: u32 = 4;

/// One primitive's attribute arrays
#[derive(Debug, Clone)]
pub struct PrimitiveData {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub uvs: Option<Vec<[f32; 2]>>,
    /// xyz direction, w handedness
    pub tangents: Option<Vec<[f32; 4]>>,
    /// COLOR_0 as RGB
    pub colors: Option<Vec<[f32; 3]>>,
    pub indices: Option<Vec<u32>>,
    /// glTF primitive mode (4 = TRIANGLES)
    pub mode: u32,
}

/// One scene node referencing a primitive by index
#[derive(Debug, Clone)]
pub struct NodeData {
    pub name: String,
    pub mesh: Option<usize>,
    pub children: Vec<usize>,
}

impl NodeData {
    pub fn new(name: &str, mesh: Option<usize>, children: Vec<usize>) -> Self {
        Self {
            name: name.to_string(),
            mesh,
            children,
        }
    }
}

/// Indexed triangle in the XY plane, shifted by `offset` on X
///
/// Normals face +Z and tangents point along +X with positive handedness,
/// so reconstructed bitangents are +Y.
pub fn offset_triangle(name: &str, offset: f32) -> PrimitiveData {
    PrimitiveData {
        name: name.to_string(),
        positions: vec![
            [offset, 0.0, 0.0],
            [offset + 1.0, 0.0, 0.0],
            [offset, 1.0, 0.0],
        ],
        normals: Some(vec![[0.0, 0.0, 1.0]; 3]),
        uvs: Some(vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]),
        tangents: Some(vec![[1.0, 0.0, 0.0, 1.0]; 3]),
        colors: None,
        indices: Some(vec![0, 1, 2]),
        mode: TRIANGLES,
    }
}

/// Compute min/max bounds of positions
pub(crate) fn compute_bounds(positions: &[[f32; 3]]) -> ([f32; 3], [f32; 3]) {
    let mut min = [f32::MAX; 3];
    let mut max = [f32::MIN; 3];
    for p in positions {
        for i in 0..3 {
            min[i] = min[i].min(p[i]);
            max[i] = max[i].max(p[i]);
        }
    }
    (min, max)
}
