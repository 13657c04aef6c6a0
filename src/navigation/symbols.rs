use std::collections::HashMap;

use crate::discovery::reflector::LoadedModule;
use crate::navigation::{SourceLocation, SymbolResolver};

/// Symbol table shipped in the module manifest.
#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: HashMap<(String, String), SourceLocation>,
}

impl SymbolTable {
    pub fn from_module(module: &LoadedModule) -> Self {
        let mut table = Self::default();
        for symbol in module.symbols() {
            table.insert(
                &symbol.type_name,
                &symbol.method,
                SourceLocation {
                    file: module.resolve_path(&symbol.file),
                    line: symbol.line,
                },
            );
        }
        table
    }

    /// Keeps the lowest line when a method has several entries.
    pub fn insert(&mut self, type_name: &str, method_name: &str, location: SourceLocation) {
        self.entries
            .entry((type_name.to_string(), method_name.to_string()))
            .and_modify(|existing| {
                if location.line < existing.line {
                    *existing = location.clone();
                }
            })
            .or_insert(location);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SymbolResolver for SymbolTable {
    fn resolve(&self, type_name: &str, method_name: &str) -> Option<SourceLocation> {
        self.entries
            .get(&(type_name.to_string(), method_name.to_string()))
            .cloned()
    }
}
