use serde::Serialize;
use std::fmt;

use crate::domain::ContextId;

/// Identity of a method in the loaded module: declaring type full name plus
/// method name. This is also the symbol lookup key for navigation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MethodRef {
    pub declaring_type: String,
    pub method: String,
}

impl MethodRef {
    pub fn new(declaring_type: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            method: method.into(),
        }
    }
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.declaring_type, self.method)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExampleId(pub(crate) usize);

impl ExampleId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    pub(crate) name: String,
    pub(crate) context: ContextId,
    pub(crate) body: MethodRef,
    pub(crate) pending: bool,
    pub(crate) skip: bool,
    pub(crate) tags: Vec<String>,
    pub(crate) full_name: String,
}

impl Example {
    pub fn new(name: impl Into<String>, body: MethodRef) -> Self {
        Self {
            name: name.into(),
            context: ContextId(0),
            body,
            pending: false,
            skip: false,
            tags: Vec::new(),
            full_name: String::new(),
        }
    }

    pub fn pending(mut self, pending: bool) -> Self {
        self.pending = pending;
        self
    }

    pub fn skip(mut self, skip: bool) -> Self {
        self.skip = skip;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning context full name, `". "`, then the example name.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn context(&self) -> ContextId {
        self.context
    }

    pub fn body(&self) -> &MethodRef {
        &self.body
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn is_skipped(&self) -> bool {
        self.skip
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
