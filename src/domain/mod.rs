//! Context tree and examples.
//!
//! Contexts and examples live in arenas owned by the collection and refer to
//! each other by index, so parent links never own anything.

pub mod collection;
pub mod context;
pub mod example;
pub mod hooks;

pub use collection::{ContextCollection, ExampleIter, IntoExamples, RawContextCollection};
pub use context::{Context, ContextId, ContextKind};
pub use example::{Example, ExampleId, MethodRef};
pub use hooks::{Hook, HookChain, HookKind};
