use std::collections::HashSet;
use tracing::trace;

use crate::domain::{Context, ContextId, Example, ExampleId, HookChain};
use crate::error::BuildError;
use crate::utils::string::CONTEXT_SEPARATOR;

/// Context forest as produced by the builder, before finalization.
///
/// Only [`RawContextCollection::build`] turns it into something that can be
/// flattened into examples.
#[derive(Debug, Clone)]
pub struct RawContextCollection {
    root_name: String,
    contexts: Vec<Context>,
    examples: Vec<Example>,
    roots: Vec<ContextId>,
}

impl RawContextCollection {
    /// `root_name` prefixes every full name; pass an empty string for none.
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            root_name: root_name.into(),
            contexts: Vec::new(),
            examples: Vec::new(),
            roots: Vec::new(),
        }
    }

    pub fn add_context(&mut self, parent: Option<ContextId>, mut context: Context) -> ContextId {
        let id = ContextId(self.contexts.len());
        context.parent = parent;
        context.children.clear();
        context.examples.clear();
        self.contexts.push(context);

        match parent {
            Some(parent) => self.contexts[parent.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    pub fn add_example(&mut self, context: ContextId, mut example: Example) -> ExampleId {
        let id = ExampleId(self.examples.len());
        example.context = context;
        self.examples.push(example);
        self.contexts[context.0].examples.push(id);
        id
    }

    pub fn context_mut(&mut self, id: ContextId) -> &mut Context {
        &mut self.contexts[id.0]
    }

    pub fn roots(&self) -> &[ContextId] {
        &self.roots
    }

    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }

    pub fn example_count(&self) -> usize {
        self.examples.len()
    }

    /// Finalizes the forest: computes full names, validates hook wiring,
    /// resolves each context's hook chain and pushes inherited pending flags
    /// and tags down to the examples.
    pub fn build(self) -> Result<ContextCollection, BuildError> {
        let Self {
            root_name,
            contexts,
            mut examples,
            roots,
        } = self;

        // Parents are always inserted before their children, so one forward
        // pass sees every parent already resolved.
        let mut full_names: Vec<String> = Vec::with_capacity(contexts.len());
        let mut inherited_pending: Vec<bool> = Vec::with_capacity(contexts.len());
        let mut inherited_tags: Vec<Vec<String>> = Vec::with_capacity(contexts.len());

        for context in &contexts {
            let (full_name, pending, mut tags) = match context.parent {
                Some(parent) => (
                    join_name(&full_names[parent.0], &context.name),
                    inherited_pending[parent.0] || context.pending,
                    inherited_tags[parent.0].clone(),
                ),
                None => (join_name(&root_name, &context.name), context.pending, Vec::new()),
            };
            merge_tags(&mut tags, &context.tags);

            let mut seen = HashSet::new();
            for hook in &context.hooks {
                if !seen.insert(hook.kind) {
                    return Err(BuildError::conflicting_hook(full_name, hook.kind));
                }
            }

            full_names.push(full_name);
            inherited_pending.push(pending);
            inherited_tags.push(tags);
        }

        let hook_chains: Vec<HookChain> = (0..contexts.len())
            .map(|index| {
                let mut lineage = vec![index];
                let mut current = contexts[index].parent;
                while let Some(parent) = current {
                    lineage.push(parent.0);
                    current = contexts[parent.0].parent;
                }
                lineage.reverse();
                HookChain::from_ancestry(lineage.iter().map(|i| contexts[*i].hooks.as_slice()))
            })
            .collect();

        let mut seen_names = HashSet::new();
        for example in &mut examples {
            let context = example.context.0;
            example.full_name = join_name(&full_names[context], &example.name);
            example.pending |= inherited_pending[context];
            let own_tags = std::mem::take(&mut example.tags);
            example.tags = inherited_tags[context].clone();
            merge_tags(&mut example.tags, &own_tags);

            if !seen_names.insert(example.full_name.clone()) {
                return Err(BuildError::duplicate_example(example.full_name.clone()));
            }
        }

        trace!(
            "Built context collection: {} contexts, {} examples",
            contexts.len(),
            examples.len()
        );

        Ok(ContextCollection {
            root_name,
            contexts,
            examples,
            roots,
            full_names,
            hook_chains,
        })
    }
}

fn join_name(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}{CONTEXT_SEPARATOR}{name}")
    }
}

fn merge_tags(into: &mut Vec<String>, tags: &[String]) {
    for tag in tags {
        if !into.contains(tag) {
            into.push(tag.clone());
        }
    }
}

/// Finalized context forest for one module.
#[derive(Debug, Clone)]
pub struct ContextCollection {
    root_name: String,
    contexts: Vec<Context>,
    examples: Vec<Example>,
    roots: Vec<ContextId>,
    full_names: Vec<String>,
    hook_chains: Vec<HookChain>,
}

impl ContextCollection {
    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    pub fn roots(&self) -> &[ContextId] {
        &self.roots
    }

    /// `None` for an id handed out by a different collection.
    pub fn context(&self, id: ContextId) -> Option<&Context> {
        self.contexts.get(id.0)
    }

    pub fn context_full_name(&self, id: ContextId) -> Option<&str> {
        self.full_names.get(id.0).map(String::as_str)
    }

    pub fn example(&self, id: ExampleId) -> Option<&Example> {
        self.examples.get(id.0)
    }

    /// Hooks that wrap the given example, outermost context first. `None`
    /// unless the example belongs to this collection.
    pub fn hooks_for(&self, example: &Example) -> Option<&HookChain> {
        let context = self.contexts.get(example.context.0)?;
        let owned = context
            .examples
            .iter()
            .any(|id| self.examples.get(id.0) == Some(example));
        if !owned {
            return None;
        }
        self.hook_chains.get(example.context.0)
    }

    pub fn find_example(&self, full_name: &str) -> Option<&Example> {
        self.examples.iter().find(|e| e.full_name == full_name)
    }

    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }

    pub fn example_count(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Examples depth first: a context's own examples, then each child.
    pub fn examples(&self) -> ExampleIter<'_> {
        ExampleIter {
            collection: self,
            traversal: Traversal::new(self.roots.clone()),
        }
    }

    pub fn into_examples(self) -> IntoExamples {
        let traversal = Traversal::new(self.roots.clone());
        IntoExamples {
            collection: self,
            traversal,
        }
    }
}

#[derive(Debug, Clone)]
struct Frame {
    context: ContextId,
    next_example: usize,
    next_child: usize,
}

impl Frame {
    fn new(context: ContextId) -> Self {
        Self {
            context,
            next_example: 0,
            next_child: 0,
        }
    }
}

#[derive(Debug, Clone)]
struct Traversal {
    roots: Vec<ContextId>,
    next_root: usize,
    stack: Vec<Frame>,
}

impl Traversal {
    fn new(roots: Vec<ContextId>) -> Self {
        Self {
            roots,
            next_root: 0,
            stack: Vec::new(),
        }
    }

    fn next_id(&mut self, contexts: &[Context]) -> Option<ExampleId> {
        loop {
            let Some(frame) = self.stack.last_mut() else {
                let root = *self.roots.get(self.next_root)?;
                self.next_root += 1;
                self.stack.push(Frame::new(root));
                continue;
            };

            let context = &contexts[frame.context.0];
            if let Some(id) = context.examples.get(frame.next_example) {
                frame.next_example += 1;
                return Some(*id);
            }

            if let Some(child) = context.children.get(frame.next_child).copied() {
                frame.next_child += 1;
                self.stack.push(Frame::new(child));
                continue;
            }

            self.stack.pop();
        }
    }
}

pub struct ExampleIter<'a> {
    collection: &'a ContextCollection,
    traversal: Traversal,
}

impl<'a> Iterator for ExampleIter<'a> {
    type Item = &'a Example;

    fn next(&mut self) -> Option<Self::Item> {
        let collection = self.collection;
        self.traversal
            .next_id(&collection.contexts)
            .map(|id| &collection.examples[id.0])
    }
}

/// Owning, lazy flattening of a collection.
pub struct IntoExamples {
    collection: ContextCollection,
    traversal: Traversal,
}

impl IntoExamples {
    pub fn collection(&self) -> &ContextCollection {
        &self.collection
    }
}

impl Iterator for IntoExamples {
    type Item = Example;

    fn next(&mut self) -> Option<Self::Item> {
        self.traversal
            .next_id(&self.collection.contexts)
            .map(|id| self.collection.examples[id.0].clone())
    }
}
