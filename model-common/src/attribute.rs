//! Vertex attribute registry
//!
//! Every per-vertex attribute is a fixed-width run of `f32` scalars with a
//! single-bit tag. The tags are bit-disjoint so an attribute mask can say
//! "has attribute X" independent of where X sits in a layout.
//!
//! New kinds are appended to [`REGISTRY`] with an unused tag bit; existing
//! files stay readable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::FormatError;

// ============================================================================
// Attribute Tag Constants
// ============================================================================

/// Attribute tag: position (3 floats)
pub const ATTRIBUTE_POSITION: u32 = 1 << 0;
/// Attribute tag: normal (3 floats)
pub const ATTRIBUTE_NORMAL: u32 = 1 << 1;
/// Attribute tag: tangent direction (3 floats)
pub const ATTRIBUTE_TANGENT: u32 = 1 << 2;
/// Attribute tag: bitangent direction (3 floats)
pub const ATTRIBUTE_BITANGENT: u32 = 1 << 3;
/// Attribute tag: texture coordinates (2 floats)
pub const ATTRIBUTE_UV: u32 = 1 << 4;
/// Attribute tag: RGB color (3 floats)
pub const ATTRIBUTE_COLOR_RGB: u32 = 1 << 5;
/// Attribute tag: RGBA color (4 floats)
pub const ATTRIBUTE_COLOR_RGBA: u32 = 1 << 6;

/// Size of one scalar component in bytes (f32)
pub const COMPONENT_SIZE: u32 = 4;

/// A category of per-vertex data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    Position,
    Normal,
    Tangent,
    Bitangent,
    Uv,
    ColorRgb,
    ColorRgba,
}

/// Registry entry for one attribute kind
#[derive(Debug, Clone, Copy)]
pub struct AttributeInfo {
    pub kind: AttributeKind,
    /// Canonical name, also used by serde and `Display`
    pub name: &'static str,
    /// Extra spellings accepted when parsing
    pub aliases: &'static [&'static str],
    /// Number of f32 scalars per vertex
    pub components: u32,
    /// Single-bit tag used in attribute masks and layout records
    pub tag: u32,
}

/// Attribute registry, indexed by `AttributeKind as usize`
pub static REGISTRY: [AttributeInfo; 7] = [
    AttributeInfo {
        kind: AttributeKind::Position,
        name: "position",
        aliases: &["pos"],
        components: 3,
        tag: ATTRIBUTE_POSITION,
    },
    AttributeInfo {
        kind: AttributeKind::Normal,
        name: "normal",
        aliases: &["norm", "normals"],
        components: 3,
        tag: ATTRIBUTE_NORMAL,
    },
    AttributeInfo {
        kind: AttributeKind::Tangent,
        name: "tangent",
        aliases: &["tan", "tangents"],
        components: 3,
        tag: ATTRIBUTE_TANGENT,
    },
    AttributeInfo {
        kind: AttributeKind::Bitangent,
        name: "bitangent",
        aliases: &["bitan", "binormal", "bitangents"],
        components: 3,
        tag: ATTRIBUTE_BITANGENT,
    },
    AttributeInfo {
        kind: AttributeKind::Uv,
        name: "uv",
        aliases: &["texcoord", "tex_coord", "uvs"],
        components: 2,
        tag: ATTRIBUTE_UV,
    },
    AttributeInfo {
        kind: AttributeKind::ColorRgb,
        name: "color_rgb",
        aliases: &["rgb", "color"],
        components: 3,
        tag: ATTRIBUTE_COLOR_RGB,
    },
    AttributeInfo {
        kind: AttributeKind::ColorRgba,
        name: "color_rgba",
        aliases: &["rgba"],
        components: 4,
        tag: ATTRIBUTE_COLOR_RGBA,
    },
];

impl AttributeKind {
    /// All kinds in registry (canonical) order
    pub const ALL: [AttributeKind; 7] = [
        AttributeKind::Position,
        AttributeKind::Normal,
        AttributeKind::Tangent,
        AttributeKind::Bitangent,
        AttributeKind::Uv,
        AttributeKind::ColorRgb,
        AttributeKind::ColorRgba,
    ];

    /// Registry entry for this kind
    #[inline]
    pub fn info(self) -> &'static AttributeInfo {
        &REGISTRY[self as usize]
    }

    /// Packed size in bytes
    #[inline]
    pub fn size(self) -> u32 {
        self.info().components * COMPONENT_SIZE
    }

    /// Single-bit tag
    #[inline]
    pub fn tag(self) -> u32 {
        self.info().tag
    }

    /// Number of f32 scalars
    #[inline]
    pub fn components(self) -> usize {
        self.info().components as usize
    }

    #[inline]
    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Look up a kind by its tag bit
    pub fn from_tag(tag: u32) -> Option<Self> {
        REGISTRY.iter().find(|info| info.tag == tag).map(|info| info.kind)
    }

    /// Kinds whose tag is set in `mask`, in canonical order
    pub fn in_mask(mask: u32) -> impl Iterator<Item = AttributeKind> {
        Self::ALL.into_iter().filter(move |kind| mask & kind.tag() != 0)
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AttributeKind {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase().replace('-', "_");
        REGISTRY
            .iter()
            .find(|info| info.name == needle || info.aliases.iter().any(|alias| *alias == needle))
            .map(|info| info.kind)
            .ok_or_else(|| FormatError::UnknownAttributeName(s.trim().to_string()))
    }
}

/// Mask with every registered tag set
pub fn known_attribute_mask() -> u32 {
    REGISTRY.iter().fold(0, |mask, info| mask | info.tag)
}
