use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::DemoError;
use crate::module::ModuleId;

const DEFAULT_MANIFEST: &str = include_str!("../assets/manifest.ron");

/// Top-level manifest listing all demo modules.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleManifest {
    pub suite_title: String,
    pub suite_description: String,
    pub modules: Vec<ModuleEntry>,
}

/// Presentation metadata for one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleEntry {
    pub id: ModuleId,
    pub title: String,
    pub summary: String,
    /// Opaque theme token handed to the renderer.
    pub theme_accent: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// The manifest compiled into the crate.
pub fn default_manifest() -> Result<ModuleManifest, DemoError> {
    parse_manifest(DEFAULT_MANIFEST, Path::new("assets/manifest.ron"))
}

/// Load the module manifest from a `manifest.ron` file in `dir`.
pub fn load_manifest(dir: &Path) -> Result<ModuleManifest, DemoError> {
    let path = dir.join("manifest.ron");
    let content = std::fs::read_to_string(&path)?;
    parse_manifest(&content, &path)
}

fn parse_manifest(content: &str, origin: &Path) -> Result<ModuleManifest, DemoError> {
    ron::from_str(content).map_err(|e| DemoError::Parse {
        file: origin.to_path_buf(),
        detail: e.to_string(),
    })
}
