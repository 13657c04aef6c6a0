use std::path::Path;

use crate::discovery::context_finder::{ContextFinder, DefaultContextFinder};
use crate::discovery::reflector::Reflector;
use crate::domain::IntoExamples;
use crate::error::Result;

/// Flattens a binary's context tree into its examples.
///
/// `find` loads and releases the binary itself. Discovery, which still needs
/// the loaded module for symbol lookups afterwards, loads it once and calls
/// `find_in_module`.
pub struct ExampleFinder<F: ContextFinder = DefaultContextFinder> {
    context_finder: F,
}

impl<F: ContextFinder> ExampleFinder<F> {
    pub fn new(context_finder: F) -> Self {
        Self { context_finder }
    }

    /// Examples in declaration order, depth first. Every call reloads the
    /// binary and rebuilds its contexts.
    pub fn find(&self, binary_path: &Path) -> Result<IntoExamples> {
        let contexts = self.context_finder.build_context_collection(binary_path)?;
        Ok(contexts.into_examples())
    }

    pub fn context_finder(&self) -> &F {
        &self.context_finder
    }
}

impl ExampleFinder<DefaultContextFinder> {
    /// Examples of a module the caller keeps loaded.
    pub fn find_in_module<R: Reflector + ?Sized>(&self, module: &R) -> Result<IntoExamples> {
        let contexts = self.context_finder.build_from_module(module)?;
        Ok(contexts.into_examples())
    }
}

impl Default for ExampleFinder<DefaultContextFinder> {
    fn default() -> Self {
        Self::new(DefaultContextFinder::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Context, ContextCollection, ContextKind, Example, MethodRef, RawContextCollection};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubContextFinder {
        calls: AtomicUsize,
    }

    impl ContextFinder for StubContextFinder {
        fn build_context_collection(&self, _binary_path: &Path) -> Result<ContextCollection> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut raw = RawContextCollection::new("nspec");
            let outer = raw.add_context(None, Context::new("outer", ContextKind::Class));
            let inner = raw.add_context(Some(outer), Context::new("inner", ContextKind::Method));
            raw.add_example(inner, Example::new("deep", MethodRef::new("t", "deep")));
            raw.add_example(outer, Example::new("shallow", MethodRef::new("t", "shallow")));
            Ok(raw.build()?)
        }
    }

    #[test]
    fn test_find_flattens_and_rebuilds_per_call() {
        let finder = ExampleFinder::new(StubContextFinder {
            calls: AtomicUsize::new(0),
        });

        let first: Vec<String> = finder
            .find(Path::new("any"))
            .unwrap()
            .map(|e| e.full_name().to_string())
            .collect();
        let second: Vec<String> = finder
            .find(Path::new("any"))
            .unwrap()
            .map(|e| e.full_name().to_string())
            .collect();

        assert_eq!(first, vec!["nspec. outer. shallow", "nspec. outer. inner. deep"]);
        assert_eq!(first, second);
        assert_eq!(finder.context_finder().calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_find_in_loaded_module() {
        let manifest: crate::discovery::manifest::ModuleManifest = serde_json::from_str(
            r#"{ "module": "m", "types": [
                { "full_name": "m::describe_x", "base": "nspec",
                  "methods": [ { "name": "it_a" }, { "name": "it_b" } ] } ] }"#,
        )
        .unwrap();
        let module = crate::discovery::reflector::LoadedModule::new("/tmp/m.specs.json", manifest);

        let names: Vec<String> = ExampleFinder::default()
            .find_in_module(&module)
            .unwrap()
            .map(|e| e.full_name().to_string())
            .collect();

        assert_eq!(names, vec!["nspec. describe x. it a", "nspec. describe x. it b"]);
    }
}
