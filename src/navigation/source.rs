use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};
use tree_sitter::{Node, Parser};

use crate::navigation::{SourceLocation, SymbolResolver};

const IMPL_ITEM: &str = "impl_item";
const MOD_ITEM: &str = "mod_item";
const FUNCTION_ITEM: &str = "function_item";

#[derive(Debug, Clone)]
struct ImplMethod {
    /// Type path relative to the file: enclosing `mod` blocks plus the path
    /// written after `impl`
    type_path: Vec<String>,
    location: SourceLocation,
}

/// Method locations found by parsing a module's Rust sources.
///
/// Used when the manifest carries no symbol for an example. A lookup for
/// `bank_specs::accounts::describe_account` accepts an `impl` whose qualified
/// path is a suffix of that name, such as `impl describe_account` inside
/// `mod accounts`. The longest matching path wins; a tie resolves to nothing.
#[derive(Debug, Default)]
pub struct SourceIndex {
    methods: HashMap<String, Vec<ImplMethod>>,
}

impl SourceIndex {
    pub fn from_files(files: &[PathBuf]) -> Self {
        let mut index = Self::default();

        let mut parser = Parser::new();
        if let Err(e) = parser.set_language(&tree_sitter_rust::LANGUAGE.into()) {
            warn!("Failed to set up Rust parser: {e}");
            return index;
        }

        for file in files {
            index.index_file(&mut parser, file);
        }
        index
    }

    fn index_file(&mut self, parser: &mut Parser, file: &Path) {
        let source = match fs::read(file) {
            Ok(source) => source,
            Err(e) => {
                warn!("Skipping source {}: {e}", file.display());
                return;
            }
        };

        let Some(tree) = parser.parse(&source, None) else {
            warn!("Failed to parse {}", file.display());
            return;
        };

        let before = self.len();
        let mut modules = Vec::new();
        self.index_node(tree.root_node(), &source, file, &mut modules);
        trace!("Indexed {} methods in {}", self.len() - before, file.display());
    }

    fn index_node(&mut self, node: Node, source: &[u8], file: &Path, modules: &mut Vec<String>) {
        match node.kind() {
            IMPL_ITEM => self.index_impl(node, source, file, modules),
            MOD_ITEM => {
                let (Some(name), Some(body)) = (
                    node.child_by_field_name("name")
                        .and_then(|n| n.utf8_text(source).ok()),
                    node.child_by_field_name("body"),
                ) else {
                    return;
                };
                modules.push(name.to_string());
                self.index_node(body, source, file, modules);
                modules.pop();
                return;
            }
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.index_node(child, source, file, modules);
        }
    }

    fn index_impl(&mut self, node: Node, source: &[u8], file: &Path, modules: &[String]) {
        let (Some(type_node), Some(body)) = (
            node.child_by_field_name("type"),
            node.child_by_field_name("body"),
        ) else {
            return;
        };
        let Ok(type_text) = type_node.utf8_text(source) else {
            return;
        };
        let Some(type_path) = qualify(modules, type_text) else {
            return;
        };

        let mut cursor = body.walk();
        for item in body.named_children(&mut cursor) {
            if item.kind() != FUNCTION_ITEM {
                continue;
            }
            let Some(name) = item
                .child_by_field_name("name")
                .and_then(|n| n.utf8_text(source).ok())
            else {
                continue;
            };

            self.methods
                .entry(name.to_string())
                .or_default()
                .push(ImplMethod {
                    type_path: type_path.clone(),
                    location: SourceLocation {
                        file: file.to_path_buf(),
                        line: item.start_position().row as u32 + 1,
                    },
                });
        }
    }

    pub fn len(&self) -> usize {
        self.methods.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl SymbolResolver for SourceIndex {
    fn resolve(&self, type_name: &str, method_name: &str) -> Option<SourceLocation> {
        let requested = path_segments(type_name);
        let candidates = self.methods.get(method_name)?;

        let mut best: Option<&ImplMethod> = None;
        let mut tied = false;
        for candidate in candidates.iter().filter(|c| requested.ends_with(&c.type_path)) {
            match best {
                Some(current) if current.type_path.len() > candidate.type_path.len() => {}
                Some(current) if current.type_path.len() == candidate.type_path.len() => {
                    tied = true;
                }
                _ => {
                    best = Some(candidate);
                    tied = false;
                }
            }
        }

        if tied {
            debug!("Ambiguous source location for {type_name}::{method_name}");
            return None;
        }
        best.map(|m| m.location.clone())
    }
}

/// Path segments of a type name, without generic arguments or arity markers.
fn path_segments(type_name: &str) -> Vec<String> {
    let without_generics = type_name.split('<').next().unwrap_or_default();
    without_generics
        .split("::")
        .map(|segment| segment.split('`').next().unwrap_or_default().trim())
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolves the path written after `impl` against the enclosing modules.
/// Paths leaving the file (`crate::`, or `super::` past the top) keep only
/// what is written.
fn qualify(modules: &[String], written: &str) -> Option<Vec<String>> {
    let mut path = modules.to_vec();
    for segment in path_segments(written) {
        match segment.as_str() {
            "self" => {}
            "crate" => path.clear(),
            "super" => {
                path.pop();
            }
            _ => path.push(segment),
        }
    }
    (!path.is_empty()).then_some(path)
}
