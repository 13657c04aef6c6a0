use std::path::{Path, PathBuf};
use tracing::debug;

use crate::discovery::manifest::{Attribute, MethodInfo, ModuleManifest, SymbolInfo, TypeInfo};

/// Capability query over a loaded module.
///
/// This is the only view the spec finder and context builder have of a
/// module: the declared types, the methods of a type and the metadata
/// attached to a type.
pub trait Reflector {
    fn module_name(&self) -> &str;

    fn declared_types(&self) -> &[TypeInfo];

    fn find_type(&self, full_name: &str) -> Option<&TypeInfo> {
        self.declared_types()
            .iter()
            .find(|t| t.full_name == full_name)
    }

    fn methods_of(&self, full_name: &str) -> &[MethodInfo] {
        self.find_type(full_name)
            .map(|t| t.methods.as_slice())
            .unwrap_or_default()
    }

    fn attributes_of(&self, full_name: &str) -> &[Attribute] {
        self.find_type(full_name)
            .map(|t| t.attributes.as_slice())
            .unwrap_or_default()
    }
}

/// A module loaded for the duration of one discovery job.
///
/// Dropping it releases the module; nothing borrows from it once the context
/// collection and symbol session built on top of it are gone.
#[derive(Debug)]
pub struct LoadedModule {
    path: PathBuf,
    manifest: ModuleManifest,
}

impl LoadedModule {
    pub fn new(path: impl Into<PathBuf>, manifest: ModuleManifest) -> Self {
        let path = path.into();
        debug!("Loaded module '{}' from {}", manifest.module, path.display());
        Self { path, manifest }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn manifest(&self) -> &ModuleManifest {
        &self.manifest
    }

    pub fn symbols(&self) -> &[SymbolInfo] {
        &self.manifest.symbols
    }

    /// Directory that relative source and symbol paths are resolved against
    pub fn base_dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("."))
    }

    pub fn resolve_path(&self, relative: &Path) -> PathBuf {
        if relative.is_absolute() {
            relative.to_path_buf()
        } else {
            self.base_dir().join(relative)
        }
    }

    pub fn source_files(&self) -> Vec<PathBuf> {
        self.manifest
            .sources
            .iter()
            .map(|p| self.resolve_path(p))
            .collect()
    }
}

impl Reflector for LoadedModule {
    fn module_name(&self) -> &str {
        &self.manifest.module
    }

    fn declared_types(&self) -> &[TypeInfo] {
        &self.manifest.types
    }
}

impl Drop for LoadedModule {
    fn drop(&mut self) {
        debug!("Released module '{}'", self.manifest.module);
    }
}
