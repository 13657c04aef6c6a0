pub mod builder;
pub mod context_finder;
pub mod conventions;
pub mod example_finder;
pub mod formats;
pub mod loader;
pub mod manifest;
pub mod reflector;
pub mod spec_finder;
pub mod utils;

pub use builder::ContextBuilder;
pub use context_finder::{ContextFinder, DefaultContextFinder};
pub use conventions::{Conventions, MethodRole};
pub use example_finder::ExampleFinder;
pub use formats::{FormatRegistry, ModuleFormat};
pub use loader::{ManifestLoader, ModuleLoader};
pub use reflector::{LoadedModule, Reflector};
pub use spec_finder::{SpecClass, SpecFinder};
pub use utils::{expand_sources, SourceScan};
