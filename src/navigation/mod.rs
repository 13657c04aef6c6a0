//! Source navigation for discovered examples.
//!
//! A [`SymbolSession`] is opened per module and answers "where is
//! `Type::method` declared" from the module's symbol table, falling back to
//! parsing the module's sources. A miss is never an error: the example is
//! still reported, just without a location.

pub mod source;
pub mod symbols;

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::discovery::reflector::LoadedModule;
pub use source::SourceIndex;
pub use symbols::SymbolTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: PathBuf,
    pub line: u32,
}

/// File and first line of an example body; both empty when unresolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavigationRecord {
    pub file_name: Option<PathBuf>,
    pub min_line_number: Option<u32>,
}

impl NavigationRecord {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.file_name.is_none() && self.min_line_number.is_none()
    }
}

impl From<SourceLocation> for NavigationRecord {
    fn from(location: SourceLocation) -> Self {
        Self {
            file_name: Some(location.file),
            min_line_number: Some(location.line),
        }
    }
}

/// Resolves (declaring type full name, method name) to a source location.
/// Keys match exactly and case-sensitively.
pub trait SymbolResolver: Send + Sync {
    fn resolve(&self, type_name: &str, method_name: &str) -> Option<SourceLocation>;
}

/// Symbol lookups for one module, open for the duration of its discovery job.
pub struct SymbolSession {
    module_path: PathBuf,
    resolvers: Vec<Box<dyn SymbolResolver>>,
}

impl SymbolSession {
    /// Opens a session over the module's symbol table, plus its sources when
    /// `source_fallback` is set.
    pub fn open(module: &LoadedModule, source_fallback: bool) -> Self {
        let mut resolvers: Vec<Box<dyn SymbolResolver>> =
            vec![Box::new(SymbolTable::from_module(module))];
        if source_fallback && !module.source_files().is_empty() {
            resolvers.push(Box::new(SourceIndex::from_files(&module.source_files())));
        }

        debug!(
            "Opened symbol session for {} ({} resolvers)",
            module.path().display(),
            resolvers.len()
        );
        Self::with_resolvers(module.path(), resolvers)
    }

    pub fn with_resolvers(
        module_path: impl Into<PathBuf>,
        resolvers: Vec<Box<dyn SymbolResolver>>,
    ) -> Self {
        Self {
            module_path: module_path.into(),
            resolvers,
        }
    }

    pub fn module_path(&self) -> &Path {
        &self.module_path
    }

    pub fn navigation_data(&self, type_name: &str, method_name: &str) -> NavigationRecord {
        match self
            .resolvers
            .iter()
            .find_map(|r| r.resolve(type_name, method_name))
        {
            Some(location) => location.into(),
            None => {
                debug!("No navigation data for {type_name}::{method_name}");
                NavigationRecord::empty()
            }
        }
    }
}

impl Drop for SymbolSession {
    fn drop(&mut self) {
        debug!("Closed symbol session for {}", self.module_path.display());
    }
}
