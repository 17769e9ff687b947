//! Manifest parsing and build orchestration
//!
//! Parses models.toml and converts every listed scene.

use anyhow::{bail, Context, Result};
use model_common::{VertexLayout, MODEL_EXT};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::mesh::SCENE_EXTENSIONS;

/// Root manifest structure
#[derive(Debug, Deserialize)]
pub struct ModelManifest {
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub models: Vec<ModelEntry>,
    /// Directory relative paths are resolved against (the manifest's own)
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Deserialize, Default)]
pub struct OutputSection {
    /// Output directory (defaults to the manifest directory)
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// Default layout for models without their own
    #[serde(default)]
    pub layout: Option<VertexLayout>,
}

#[derive(Debug, Deserialize)]
pub struct ModelEntry {
    pub source: PathBuf,
    /// Output file name, defaults to `<source stem>.nmodel`
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub layout: Option<VertexLayout>,
}

impl ModelManifest {
    /// Parse manifest text; relative paths resolve against `base_dir`
    pub fn parse(content: &str, base_dir: &Path) -> Result<Self> {
        let mut manifest: ModelManifest = toml::from_str(content)?;
        manifest.base_dir = base_dir.to_path_buf();
        Ok(manifest)
    }

    /// Layout for `entry`: its own, then the manifest default, then auto-detect
    pub fn layout_for<'a>(&'a self, entry: &'a ModelEntry) -> Option<&'a VertexLayout> {
        entry.layout.as_ref().or(self.output.layout.as_ref())
    }

    pub fn source_path(&self, entry: &ModelEntry) -> PathBuf {
        self.base_dir.join(&entry.source)
    }

    pub fn output_dir(&self) -> PathBuf {
        match &self.output.dir {
            Some(dir) => self.base_dir.join(dir),
            None => self.base_dir.clone(),
        }
    }

    /// Output file for `entry` inside `output_dir`
    pub fn output_path(&self, entry: &ModelEntry, output_dir: &Path) -> PathBuf {
        match &entry.output {
            Some(output) => output_dir.join(output),
            None => {
                let stem = entry
                    .source
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("model");
                output_dir.join(format!("{}.{}", stem, MODEL_EXT))
            }
        }
    }
}

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<ModelManifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    ModelManifest::parse(&content, base_dir)
        .with_context(|| format!("Failed to parse manifest: {:?}", path))
}

/// Validate a manifest without building
pub fn validate(manifest: &ModelManifest) -> Result<()> {
    let output_dir = manifest.output_dir();
    let mut outputs = HashSet::new();

    for entry in &manifest.models {
        let source = manifest.source_path(entry);
        if !source.exists() {
            bail!("Model source not found: {:?}", source);
        }

        let ext = source
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();
        if !SCENE_EXTENSIONS.contains(&ext.as_str()) {
            bail!(
                "Unsupported scene format: {:?} (use .obj, .gltf, or .glb)",
                source
            );
        }

        let output = manifest.output_path(entry, &output_dir);
        if !outputs.insert(output.clone()) {
            bail!("Output {:?} is produced by more than one model", output);
        }
    }

    Ok(())
}

/// Build all models from a manifest, returning how many were written
pub fn build_all(manifest: &ModelManifest, output_override: Option<&Path>) -> Result<usize> {
    validate(manifest)?;

    let output_dir = match output_override {
        Some(dir) => dir.to_path_buf(),
        None => manifest.output_dir(),
    };
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    for entry in &manifest.models {
        let source = manifest.source_path(entry);
        let output = manifest.output_path(entry, &output_dir);
        tracing::info!("Converting model: {:?} -> {:?}", source, output);
        crate::mesh::convert(&source, &output, manifest.layout_for(entry))?;
    }

    Ok(manifest.models.len())
}
