use thiserror::Error;

use crate::domain::HookKind;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("context '{context}' declares {hook} more than once")]
    ConflictingHook { context: String, hook: HookKind },

    #[error("duplicate example name '{full_name}'")]
    DuplicateExample { full_name: String },
}

impl BuildError {
    pub fn conflicting_hook(context: impl Into<String>, hook: HookKind) -> Self {
        Self::ConflictingHook {
            context: context.into(),
            hook,
        }
    }

    pub fn duplicate_example(full_name: impl Into<String>) -> Self {
        Self::DuplicateExample {
            full_name: full_name.into(),
        }
    }
}
