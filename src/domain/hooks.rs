use serde::Serialize;
use std::fmt;

use crate::domain::MethodRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HookKind {
    BeforeAll,
    BeforeEach,
    ActEach,
    AfterEach,
    AfterAll,
}

impl HookKind {
    pub const ALL: [HookKind; 5] = [
        HookKind::BeforeAll,
        HookKind::BeforeEach,
        HookKind::ActEach,
        HookKind::AfterEach,
        HookKind::AfterAll,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HookKind::BeforeAll => "before_all",
            HookKind::BeforeEach => "before_each",
            HookKind::ActEach => "act_each",
            HookKind::AfterEach => "after_each",
            HookKind::AfterAll => "after_all",
        }
    }

    pub fn from_method_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// After hooks run innermost first; everything else outermost first.
    pub fn runs_inner_first(&self) -> bool {
        matches!(self, HookKind::AfterEach | HookKind::AfterAll)
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hook {
    pub kind: HookKind,
    pub method: MethodRef,
    pub is_async: bool,
}

/// Hooks that apply to one example, in execution order for each kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HookChain {
    pub before_all: Vec<MethodRef>,
    pub before_each: Vec<MethodRef>,
    pub act_each: Vec<MethodRef>,
    pub after_each: Vec<MethodRef>,
    pub after_all: Vec<MethodRef>,
}

impl HookChain {
    pub fn get(&self, kind: HookKind) -> &[MethodRef] {
        match kind {
            HookKind::BeforeAll => &self.before_all,
            HookKind::BeforeEach => &self.before_each,
            HookKind::ActEach => &self.act_each,
            HookKind::AfterEach => &self.after_each,
            HookKind::AfterAll => &self.after_all,
        }
    }

    fn get_mut(&mut self, kind: HookKind) -> &mut Vec<MethodRef> {
        match kind {
            HookKind::BeforeAll => &mut self.before_all,
            HookKind::BeforeEach => &mut self.before_each,
            HookKind::ActEach => &mut self.act_each,
            HookKind::AfterEach => &mut self.after_each,
            HookKind::AfterAll => &mut self.after_all,
        }
    }

    /// Builds the chain from per-context hooks ordered outermost first.
    pub fn from_ancestry<'a>(levels: impl IntoIterator<Item = &'a [Hook]>) -> Self {
        let mut chain = Self::default();
        for hooks in levels {
            for hook in hooks {
                chain.get_mut(hook.kind).push(hook.method.clone());
            }
        }
        for kind in HookKind::ALL {
            if kind.runs_inner_first() {
                chain.get_mut(kind).reverse();
            }
        }
        chain
    }

    pub fn is_empty(&self) -> bool {
        HookKind::ALL.iter().all(|kind| self.get(*kind).is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hook(kind: HookKind, type_name: &str) -> Hook {
        Hook {
            kind,
            method: MethodRef::new(type_name, kind.as_str()),
            is_async: false,
        }
    }

    #[test]
    fn test_from_method_name() {
        assert_eq!(HookKind::from_method_name("before_each"), Some(HookKind::BeforeEach));
        assert_eq!(HookKind::from_method_name("act_each"), Some(HookKind::ActEach));
        assert_eq!(HookKind::from_method_name("Before_Each"), None);
        assert_eq!(HookKind::from_method_name("it_works"), None);
    }

    #[test]
    fn test_chain_orders_before_outer_first_and_after_inner_first() {
        let outer = vec![hook(HookKind::BeforeEach, "outer"), hook(HookKind::AfterEach, "outer")];
        let inner = vec![hook(HookKind::BeforeEach, "inner"), hook(HookKind::AfterEach, "inner")];

        let chain = HookChain::from_ancestry([outer.as_slice(), inner.as_slice()]);

        let before: Vec<_> = chain.before_each.iter().map(|m| m.declaring_type.as_str()).collect();
        let after: Vec<_> = chain.after_each.iter().map(|m| m.declaring_type.as_str()).collect();
        assert_eq!(before, vec!["outer", "inner"]);
        assert_eq!(after, vec!["inner", "outer"]);
        assert!(chain.act_each.is_empty());
    }

    #[test]
    fn test_empty_chain() {
        let chain = HookChain::from_ancestry(std::iter::empty::<&[Hook]>());
        assert!(chain.is_empty());
    }
}
