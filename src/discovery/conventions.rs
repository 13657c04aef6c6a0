use crate::discovery::manifest::{Attribute, MethodInfo};
use crate::domain::HookKind;
use crate::utils::string::{clean_type_name, humanize};

pub const ROOT_TYPE: &str = "nspec";

pub const EXAMPLE_PREFIXES: &[&str] = &["it_", "specify_"];
pub const PENDING_EXAMPLE_PREFIXES: &[&str] = &["xit_", "xspecify_"];
pub const PENDING_CONTEXT_PREFIXES: &[&str] = &["xdescribe_", "xcontext_", "xwhen_"];

pub const PENDING_ATTRIBUTE: &str = "pending";
pub const SKIP_ATTRIBUTE: &str = "skip";
pub const TAG_ATTRIBUTE: &str = "tag";

/// What a method on a spec class turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodRole {
    Hook(HookKind),
    Example { pending: bool },
    Context { pending: bool },
    /// Does not match the naming convention; excluded from discovery
    Mismatch,
}

/// Naming policy deciding which types and methods are contexts, examples or
/// hooks, and how their names read.
#[derive(Debug, Clone)]
pub struct Conventions {
    root_type: String,
}

impl Conventions {
    pub fn new(root_type: impl Into<String>) -> Self {
        Self {
            root_type: root_type.into(),
        }
    }

    /// Base type every spec class derives from; also the root of every full
    /// name.
    pub fn root_type(&self) -> &str {
        &self.root_type
    }

    pub fn classify(&self, method: &MethodInfo) -> MethodRole {
        if !method.is_public || method.parameters > 0 {
            return MethodRole::Mismatch;
        }

        let name = method.name.as_str();
        if let Some(kind) = HookKind::from_method_name(name) {
            return MethodRole::Hook(kind);
        }

        if has_prefix(name, PENDING_EXAMPLE_PREFIXES) {
            return MethodRole::Example { pending: true };
        }
        if has_prefix(name, EXAMPLE_PREFIXES) {
            return MethodRole::Example {
                pending: method.has_attribute(PENDING_ATTRIBUTE),
            };
        }

        if name.is_empty() || name.starts_with('_') || name.starts_with('<') {
            return MethodRole::Mismatch;
        }

        MethodRole::Context {
            pending: has_prefix(name, PENDING_CONTEXT_PREFIXES)
                || method.has_attribute(PENDING_ATTRIBUTE),
        }
    }

    pub fn class_context_name(&self, type_full_name: &str) -> String {
        humanize(&clean_type_name(type_full_name))
    }

    /// Context or example name for a method; the pending `x` marker is not
    /// part of the name.
    pub fn method_name(&self, method_name: &str) -> String {
        let is_pending_marker = has_prefix(method_name, PENDING_EXAMPLE_PREFIXES)
            || has_prefix(method_name, PENDING_CONTEXT_PREFIXES);
        let name = if is_pending_marker {
            &method_name[1..]
        } else {
            method_name
        };
        humanize(name)
    }

    pub fn is_pending(&self, attributes: &[Attribute]) -> bool {
        attributes.iter().any(|a| a.name == PENDING_ATTRIBUTE)
    }

    pub fn is_skipped(&self, attributes: &[Attribute]) -> bool {
        attributes.iter().any(|a| a.name == SKIP_ATTRIBUTE)
    }

    pub fn tags(&self, attributes: &[Attribute]) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        for attribute in attributes.iter().filter(|a| a.name == TAG_ATTRIBUTE) {
            for tag in attribute.value.as_deref().unwrap_or_default().split_whitespace() {
                if !tags.iter().any(|t| t == tag) {
                    tags.push(tag.to_string());
                }
            }
        }
        tags
    }
}

impl Default for Conventions {
    fn default() -> Self {
        Self::new(ROOT_TYPE)
    }
}

fn has_prefix(name: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|p| name.starts_with(p))
}
