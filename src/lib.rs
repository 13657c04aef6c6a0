//! Spec Adapter
//!
//! Discovers nspec-style specs in module manifests, builds their
//! context trees, and maps every example to an addressable test case with
//! source navigation.

pub mod adapter;
pub mod cli;
pub mod discovery;
pub mod domain;
pub mod error;
pub mod logging;
pub mod navigation;
pub mod output;
pub mod settings;
pub mod utils;

pub use adapter::{TestDiscoverer, TestExecutor};
pub use domain::{ContextCollection, Example};
pub use error::{Error, Result};
pub use output::TestCase;
pub use settings::RunSettings;
