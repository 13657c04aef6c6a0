use regex::Regex;
use std::collections::HashSet;
use tracing::{trace, warn};

use crate::discovery::manifest::TypeInfo;
use crate::discovery::reflector::Reflector;

/// A type that takes part in the context tree.
#[derive(Debug, Clone, Copy)]
pub struct SpecClass<'a> {
    pub info: &'a TypeInfo,
    /// False for ancestors pulled in only to connect a selected class to the
    /// root; those contribute a context level and hooks, but no examples.
    pub selected: bool,
}

impl<'a> SpecClass<'a> {
    pub fn full_name(&self) -> &'a str {
        &self.info.full_name
    }

    pub fn base(&self) -> Option<&'a str> {
        self.info.base.as_deref()
    }

    /// Whether the class declares its own contexts and examples
    pub fn contributes_examples(&self) -> bool {
        self.selected && !self.info.is_abstract
    }
}

/// Locates spec classes: types whose base chain reaches the root spec type.
pub struct SpecFinder<'a, R: Reflector + ?Sized> {
    reflector: &'a R,
    root_type: String,
    class_filter: Option<Regex>,
}

impl<'a, R: Reflector + ?Sized> SpecFinder<'a, R> {
    pub fn new(reflector: &'a R, root_type: impl Into<String>) -> Self {
        Self {
            reflector,
            root_type: root_type.into(),
            class_filter: None,
        }
    }

    /// Only classes whose full name matches the filter are selected.
    pub fn with_class_filter(mut self, filter: Option<Regex>) -> Self {
        self.class_filter = filter;
        self
    }

    pub fn root_type(&self) -> &str {
        &self.root_type
    }

    /// Spec classes in declaration order.
    pub fn spec_classes(&self) -> Vec<SpecClass<'a>> {
        let reflector: &'a R = self.reflector;
        let types = reflector.declared_types();
        let mut selected: HashSet<&str> = HashSet::new();
        let mut included: HashSet<&str> = HashSet::new();

        for info in types {
            if info.is_abstract {
                continue;
            }

            let Some(chain) = self.base_chain(info) else {
                trace!("'{}' is not a spec class", info.full_name);
                continue;
            };

            if let Some(filter) = &self.class_filter {
                if !filter.is_match(&info.full_name) {
                    trace!("'{}' excluded by class filter", info.full_name);
                    continue;
                }
            }

            selected.insert(info.full_name.as_str());
            included.extend(chain);
        }

        types
            .iter()
            .filter(|t| included.contains(t.full_name.as_str()))
            .map(|info| SpecClass {
                info,
                selected: selected.contains(info.full_name.as_str()),
            })
            .collect()
    }

    /// The type and its ancestors below the root, or `None` when the chain
    /// never reaches the root type.
    fn base_chain(&self, info: &'a TypeInfo) -> Option<Vec<&'a str>> {
        let reflector: &'a R = self.reflector;
        let mut chain = vec![info.full_name.as_str()];
        let mut current = info;

        loop {
            let base = current.base.as_deref()?;
            if base == self.root_type {
                return Some(chain);
            }

            let next = reflector.find_type(base)?;
            if chain.contains(&next.full_name.as_str()) {
                warn!("Inheritance cycle through '{}'", next.full_name);
                return None;
            }

            chain.push(next.full_name.as_str());
            current = next;
        }
    }
}
