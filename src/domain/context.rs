use serde::Serialize;

use crate::domain::{ExampleId, Hook};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(pub(crate) usize);

impl ContextId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Which construct a context was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextKind {
    /// A spec class
    Class,
    /// A context method on a spec class
    Method,
    /// A context declared inside a method body
    Declared,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub(crate) name: String,
    pub(crate) kind: ContextKind,
    pub(crate) parent: Option<ContextId>,
    pub(crate) children: Vec<ContextId>,
    pub(crate) examples: Vec<ExampleId>,
    pub(crate) hooks: Vec<Hook>,
    pub(crate) pending: bool,
    pub(crate) tags: Vec<String>,
}

impl Context {
    pub fn new(name: impl Into<String>, kind: ContextKind) -> Self {
        Self {
            name: name.into(),
            kind,
            parent: None,
            children: Vec::new(),
            examples: Vec::new(),
            hooks: Vec::new(),
            pending: false,
            tags: Vec::new(),
        }
    }

    pub fn pending(mut self, pending: bool) -> Self {
        self.pending = pending;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn add_hook(&mut self, hook: Hook) {
        self.hooks.push(hook);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ContextKind {
        self.kind
    }

    pub fn parent(&self) -> Option<ContextId> {
        self.parent
    }

    pub fn children(&self) -> &[ContextId] {
        &self.children
    }

    pub fn examples(&self) -> &[ExampleId] {
        &self.examples
    }

    pub fn hooks(&self) -> &[Hook] {
        &self.hooks
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}
