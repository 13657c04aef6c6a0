use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::discovery::formats::FormatRegistry;
use crate::discovery::manifest::ModuleManifest;
use crate::discovery::reflector::LoadedModule;
use crate::error::LoadError;

pub trait ModuleLoader: Send + Sync {
    fn load(&self, binary_path: &Path) -> Result<LoadedModule, LoadError>;

    fn is_supported(&self, binary_path: &Path) -> bool;
}

/// Loads build-time module manifests through the format registry.
pub struct ManifestLoader {
    registry: FormatRegistry,
}

impl ManifestLoader {
    pub fn new(registry: FormatRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }
}

impl Default for ManifestLoader {
    fn default() -> Self {
        Self::new(FormatRegistry::new())
    }
}

impl ModuleLoader for ManifestLoader {
    fn load(&self, binary_path: &Path) -> Result<LoadedModule, LoadError> {
        if !binary_path.is_file() {
            return Err(LoadError::not_found(binary_path));
        }

        let format = self
            .registry
            .format_for(binary_path)
            .ok_or_else(|| LoadError::unknown_format(binary_path))?;

        debug!(
            "Reading {} module from {}",
            format.name(),
            binary_path.display()
        );

        let content =
            fs::read_to_string(binary_path).map_err(|e| LoadError::read(binary_path, e))?;
        let manifest = format
            .parse(&content)
            .map_err(|message| LoadError::malformed(binary_path, message))?;

        validate_manifest(&manifest).map_err(|message| LoadError::malformed(binary_path, message))?;

        Ok(LoadedModule::new(binary_path, manifest))
    }

    fn is_supported(&self, binary_path: &Path) -> bool {
        self.registry.is_supported(binary_path)
    }
}

fn validate_manifest(manifest: &ModuleManifest) -> Result<(), String> {
    if manifest.module.trim().is_empty() {
        return Err("module name is empty".to_string());
    }

    let mut seen = HashSet::new();
    for info in &manifest.types {
        if info.full_name.is_empty() {
            return Err("type with empty full_name".to_string());
        }
        if !seen.insert(info.full_name.as_str()) {
            return Err(format!("type '{}' is declared twice", info.full_name));
        }
    }

    Ok(())
}
