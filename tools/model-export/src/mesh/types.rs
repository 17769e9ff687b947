//! Scene and mesh types shared by importers, flattening and packing

use model_common::AttributeKind;

/// One mesh as reported by an importer
///
/// Every optional array, when present, has one entry per position.
/// Faces are triangulated upstream and index into this mesh only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceMesh {
    pub name: Option<String>,
    pub positions: Vec<[f32; 3]>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub tangents: Option<Vec<[f32; 3]>>,
    pub bitangents: Option<Vec<[f32; 3]>>,
    pub uvs: Option<Vec<[f32; 2]>>,
    /// RGBA; importers fill alpha with 1.0 when the source only has RGB
    pub colors: Option<Vec<[f32; 4]>>,
    pub faces: Vec<[u32; 3]>,
}

impl SourceMesh {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Tags of every attribute this mesh can supply
    pub fn attribute_mask(&self) -> u32 {
        let mut mask = AttributeKind::Position.tag();
        if self.normals.is_some() {
            mask |= AttributeKind::Normal.tag();
        }
        if self.tangents.is_some() {
            mask |= AttributeKind::Tangent.tag();
        }
        if self.bitangents.is_some() {
            mask |= AttributeKind::Bitangent.tag();
        }
        if self.uvs.is_some() {
            mask |= AttributeKind::Uv.tag();
        }
        if self.colors.is_some() {
            mask |= AttributeKind::ColorRgba.tag();
        }
        mask
    }
}

/// Node of an imported scene tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneNode {
    pub name: Option<String>,
    pub meshes: Vec<SourceMesh>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    pub fn with_mesh(mut self, mesh: SourceMesh) -> Self {
        self.meshes.push(mesh);
        self
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    /// Meshes in export order: a node's own meshes, then its children's, depth first
    pub fn meshes_pre_order(&self) -> Vec<&SourceMesh> {
        let mut out = Vec::new();
        self.collect_meshes(&mut out);
        out
    }

    fn collect_meshes<'a>(&'a self, out: &mut Vec<&'a SourceMesh>) {
        out.extend(self.meshes.iter());
        for child in &self.children {
            child.collect_meshes(out);
        }
    }
}

/// A flattened mesh holding only the arrays the export layout asked for
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub tangents: Option<Vec<[f32; 3]>>,
    pub bitangents: Option<Vec<[f32; 3]>>,
    pub uvs: Option<Vec<[f32; 2]>>,
    pub colors: Option<Vec<[f32; 4]>>,
    /// Triangle list, local to this mesh
    pub indices: Vec<u32>,
}

impl Mesh {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Float data backing attribute `kind`, if this mesh carries it
    pub fn attribute(&self, kind: AttributeKind) -> Option<AttributeSource<'_>> {
        use bytemuck::cast_slice;

        match kind {
            AttributeKind::Position => Some(AttributeSource::new(cast_slice(&self.positions), 3)),
            AttributeKind::Normal => self
                .normals
                .as_deref()
                .map(|n| AttributeSource::new(cast_slice(n), 3)),
            AttributeKind::Tangent => self
                .tangents
                .as_deref()
                .map(|t| AttributeSource::new(cast_slice(t), 3)),
            AttributeKind::Bitangent => self
                .bitangents
                .as_deref()
                .map(|b| AttributeSource::new(cast_slice(b), 3)),
            AttributeKind::Uv => self
                .uvs
                .as_deref()
                .map(|uv| AttributeSource::new(cast_slice(uv), 2)),
            // RGB reads the first three channels of the stored RGBA
            AttributeKind::ColorRgb | AttributeKind::ColorRgba => self
                .colors
                .as_deref()
                .map(|c| AttributeSource::new(cast_slice(c), 4)),
        }
    }
}

/// Flat f32 view of one attribute array, `width` scalars per vertex
#[derive(Debug, Clone, Copy)]
pub struct AttributeSource<'a> {
    data: &'a [f32],
    width: usize,
}

impl<'a> AttributeSource<'a> {
    pub fn new(data: &'a [f32], width: usize) -> Self {
        Self { data, width }
    }

    /// Number of vertices covered
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() / self.width
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// First `components` scalars of vertex `v`
    pub fn get(&self, v: usize, components: usize) -> Option<&'a [f32]> {
        let start = v.checked_mul(self.width)?;
        self.data
            .get(start..start.checked_add(components.min(self.width))?)
    }
}
