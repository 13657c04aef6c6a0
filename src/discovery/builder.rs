use tracing::trace;

use crate::discovery::conventions::{Conventions, MethodRole};
use crate::discovery::manifest::{Declaration, MethodInfo, TypeInfo};
use crate::discovery::reflector::Reflector;
use crate::discovery::spec_finder::{SpecClass, SpecFinder};
use crate::domain::{Context, ContextId, ContextKind, Example, Hook, MethodRef, RawContextCollection};

/// Builds the context tree for one module.
///
/// Class contexts mirror the inheritance hierarchy below the root spec type;
/// context methods and the contexts declared inside them nest below their
/// class.
pub struct ContextBuilder<'a, R: Reflector + ?Sized> {
    finder: SpecFinder<'a, R>,
    conventions: Conventions,
}

impl<'a, R: Reflector + ?Sized> ContextBuilder<'a, R> {
    pub fn new(finder: SpecFinder<'a, R>, conventions: Conventions) -> Self {
        Self {
            finder,
            conventions,
        }
    }

    /// The unbuilt collection; call `build()` on it before flattening.
    pub fn contexts(&self) -> RawContextCollection {
        let classes = self.finder.spec_classes();
        let mut raw = RawContextCollection::new(self.conventions.root_type());

        self.build_level(&mut raw, &classes, self.conventions.root_type(), None);

        trace!(
            "Built {} contexts with {} examples from {} spec classes",
            raw.context_count(),
            raw.example_count(),
            classes.len()
        );
        raw
    }

    fn build_level(
        &self,
        raw: &mut RawContextCollection,
        classes: &[SpecClass<'a>],
        base: &str,
        parent: Option<ContextId>,
    ) {
        for class in classes.iter().filter(|c| c.base() == Some(base)) {
            let id = self.build_class(raw, class, parent);
            self.build_level(raw, classes, class.full_name(), Some(id));
        }
    }

    fn build_class(
        &self,
        raw: &mut RawContextCollection,
        class: &SpecClass<'a>,
        parent: Option<ContextId>,
    ) -> ContextId {
        let info = class.info;
        let context = Context::new(
            self.conventions.class_context_name(&info.full_name),
            ContextKind::Class,
        )
        .pending(self.conventions.is_pending(&info.attributes))
        .with_tags(self.conventions.tags(&info.attributes));
        let id = raw.add_context(parent, context);

        for method in &info.methods {
            match self.conventions.classify(method) {
                MethodRole::Hook(kind) => raw.context_mut(id).add_hook(Hook {
                    kind,
                    method: MethodRef::new(&info.full_name, &method.name),
                    is_async: method.is_async,
                }),
                MethodRole::Example { pending } if class.contributes_examples() => {
                    self.add_method_example(raw, id, info, method, pending);
                }
                MethodRole::Context { pending } if class.contributes_examples() => {
                    self.add_method_context(raw, id, info, method, pending);
                }
                MethodRole::Mismatch => {
                    trace!("Skipping {}::{}: no convention matches", info.full_name, method.name);
                }
                _ => {}
            }
        }

        id
    }

    fn add_method_example(
        &self,
        raw: &mut RawContextCollection,
        context: ContextId,
        info: &TypeInfo,
        method: &MethodInfo,
        pending: bool,
    ) {
        let example = Example::new(
            self.conventions.method_name(&method.name),
            MethodRef::new(&info.full_name, &method.name),
        )
        .pending(pending)
        .skip(self.conventions.is_skipped(&method.attributes))
        .with_tags(self.conventions.tags(&method.attributes));

        raw.add_example(context, example);
    }

    fn add_method_context(
        &self,
        raw: &mut RawContextCollection,
        parent: ContextId,
        info: &TypeInfo,
        method: &MethodInfo,
        pending: bool,
    ) {
        let context = Context::new(self.conventions.method_name(&method.name), ContextKind::Method)
            .pending(pending)
            .with_tags(self.conventions.tags(&method.attributes));
        let id = raw.add_context(Some(parent), context);

        add_declarations(raw, id, &info.full_name, &method.name, &method.declarations);
    }
}

fn add_declarations(
    raw: &mut RawContextCollection,
    parent: ContextId,
    type_name: &str,
    method_name: &str,
    declarations: &[Declaration],
) {
    for declaration in declarations {
        match declaration {
            Declaration::Context(declared) => {
                let context = Context::new(declared.name.clone(), ContextKind::Declared)
                    .pending(declared.pending)
                    .with_tags(declared.tags.clone());
                let id = raw.add_context(Some(parent), context);
                add_declarations(raw, id, type_name, method_name, &declared.declarations);
            }
            Declaration::Example(declared) => {
                let body = declared.body.as_deref().unwrap_or(method_name);
                let example = Example::new(declared.name.clone(), MethodRef::new(type_name, body))
                    .pending(declared.pending)
                    .skip(declared.skip)
                    .with_tags(declared.tags.clone());
                raw.add_example(parent, example);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::manifest::ModuleManifest;
    use crate::discovery::reflector::LoadedModule;
    use crate::domain::HookKind;
    use pretty_assertions::assert_eq;

    const BANK: &str = r#"
module: bank_specs
types:
  - full_name: bank_specs::base_spec
    base: nspec
    abstract: true
    methods:
      - name: before_each
      - name: it_is_never_reported
  - full_name: bank_specs::describe_account
    base: bank_specs::base_spec
    attributes:
      - { name: tag, value: accounts }
    methods:
      - name: before_each
      - name: it_starts_empty
      - name: xit_supports_overdraft
      - name: helper
        parameters: 2
      - name: when_depositing
        declarations:
          - context: with a positive amount
            declarations:
              - example: increases the balance
          - example: records a transaction
            body: "<when_depositing>b__1_0"
  - full_name: bank_specs::describe_savings
    base: bank_specs::describe_account
    methods:
      - name: specify_interest_accrues
        attributes:
          - { name: skip }
  - full_name: bank_specs::Unrelated
    methods:
      - name: it_is_not_a_spec
"#;

    fn module() -> LoadedModule {
        let manifest: ModuleManifest = serde_yaml::from_str(BANK).unwrap();
        LoadedModule::new("/tmp/bank.specs.yaml", manifest)
    }

    #[test]
    fn test_builds_expected_examples_in_order() {
        let module = module();
        let builder = ContextBuilder::new(SpecFinder::new(&module, "nspec"), Conventions::default());
        let collection = builder.contexts().build().unwrap();

        let names: Vec<&str> = collection.examples().map(|e| e.full_name()).collect();
        assert_eq!(
            names,
            vec![
                "nspec. base spec. describe account. it starts empty",
                "nspec. base spec. describe account. it supports overdraft",
                "nspec. base spec. describe account. when depositing. records a transaction",
                "nspec. base spec. describe account. when depositing. with a positive amount. increases the balance",
                "nspec. base spec. describe account. describe savings. specify interest accrues",
            ]
        );
    }

    #[test]
    fn test_example_flags_and_bodies() {
        let module = module();
        let builder = ContextBuilder::new(SpecFinder::new(&module, "nspec"), Conventions::default());
        let collection = builder.contexts().build().unwrap();
        let examples: Vec<_> = collection.examples().collect();

        assert_eq!(
            examples[0].body(),
            &MethodRef::new("bank_specs::describe_account", "it_starts_empty")
        );
        assert!(!examples[0].is_pending());
        assert!(examples[1].is_pending());
        assert_eq!(examples[2].body().method, "<when_depositing>b__1_0");
        assert_eq!(examples[3].body().method, "when_depositing");
        assert!(examples[4].is_skipped());
        assert!(examples.iter().all(|e| e.has_tag("accounts")));
    }

    #[test]
    fn test_hooks_are_wired_from_abstract_ancestors() {
        let module = module();
        let builder = ContextBuilder::new(SpecFinder::new(&module, "nspec"), Conventions::default());
        let collection = builder.contexts().build().unwrap();
        let first = collection.examples().next().unwrap();

        let chain = collection.hooks_for(first).unwrap();
        assert_eq!(
            chain.get(HookKind::BeforeEach),
            &[
                MethodRef::new("bank_specs::base_spec", "before_each"),
                MethodRef::new("bank_specs::describe_account", "before_each"),
            ]
        );
    }

    #[test]
    fn test_no_spec_classes_builds_empty_collection() {
        let manifest: ModuleManifest =
            serde_yaml::from_str("module: empty\ntypes:\n  - full_name: empty::Helper\n").unwrap();
        let module = LoadedModule::new("/tmp/empty.specs.yaml", manifest);
        let builder = ContextBuilder::new(SpecFinder::new(&module, "nspec"), Conventions::default());

        let collection = builder.contexts().build().unwrap();
        assert!(collection.is_empty());
        assert!(collection.roots().is_empty());
    }

    #[test]
    fn test_duplicate_hook_fails_build() {
        let yaml = r#"
module: m
types:
  - full_name: m::describe_x
    base: nspec
    methods:
      - name: before_each
      - name: before_each
        is_async: true
"#;
        let manifest: ModuleManifest = serde_yaml::from_str(yaml).unwrap();
        let module = LoadedModule::new("/tmp/m.specs.yaml", manifest);
        let builder = ContextBuilder::new(SpecFinder::new(&module, "nspec"), Conventions::default());

        assert!(builder.contexts().build().is_err());
    }
}
