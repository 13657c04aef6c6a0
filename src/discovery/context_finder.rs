use regex::Regex;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::discovery::builder::ContextBuilder;
use crate::discovery::conventions::Conventions;
use crate::discovery::loader::{ManifestLoader, ModuleLoader};
use crate::discovery::reflector::Reflector;
use crate::discovery::spec_finder::SpecFinder;
use crate::domain::ContextCollection;
use crate::error::Result;

pub trait ContextFinder: Send + Sync {
    /// Loads the binary and returns its finalized context collection.
    fn build_context_collection(&self, binary_path: &Path) -> Result<ContextCollection>;
}

/// Reflector -> spec finder -> default conventions -> context builder ->
/// finalized collection.
#[derive(Clone)]
pub struct DefaultContextFinder {
    loader: Arc<dyn ModuleLoader>,
    class_filter: Option<Regex>,
}

impl DefaultContextFinder {
    pub fn new(loader: Arc<dyn ModuleLoader>) -> Self {
        Self {
            loader,
            class_filter: None,
        }
    }

    pub fn with_class_filter(mut self, filter: Option<Regex>) -> Self {
        self.class_filter = filter;
        self
    }

    pub fn loader(&self) -> &dyn ModuleLoader {
        self.loader.as_ref()
    }

    /// Builds from a module the caller keeps loaded, for callers that still
    /// need it afterwards (symbol resolution).
    pub fn build_from_module<R: Reflector + ?Sized>(&self, module: &R) -> Result<ContextCollection> {
        let conventions = Conventions::default();
        let finder = SpecFinder::new(module, conventions.root_type())
            .with_class_filter(self.class_filter.clone());
        let builder = ContextBuilder::new(finder, conventions);

        let collection = builder.contexts().build()?;

        debug!(
            "Module '{}': {} contexts, {} examples",
            module.module_name(),
            collection.context_count(),
            collection.example_count()
        );
        Ok(collection)
    }
}

impl Default for DefaultContextFinder {
    fn default() -> Self {
        Self::new(Arc::new(ManifestLoader::default()))
    }
}

impl ContextFinder for DefaultContextFinder {
    fn build_context_collection(&self, binary_path: &Path) -> Result<ContextCollection> {
        let module = self.loader.load(binary_path)?;
        self.build_from_module(&module)
    }
}
