use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::domain::Example;
use crate::navigation::SymbolSession;
use crate::utils::string::beautify_for_display;

pub const EXECUTOR_URI: &str = "executor://nspectestexecutor";

/// Host-facing record for one discovered example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestCase {
    pub fully_qualified_name: String,
    pub display_name: String,
    pub executor_uri: String,
    pub source: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_file_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub traits: Vec<String>,
}

impl TestCase {
    pub fn new(fully_qualified_name: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        let fully_qualified_name = fully_qualified_name.into();
        Self {
            display_name: beautify_for_display(&fully_qualified_name),
            fully_qualified_name,
            executor_uri: EXECUTOR_URI.to_string(),
            source: source.into(),
            code_file_path: None,
            line_number: None,
            traits: Vec::new(),
        }
    }

    /// Projects an example, looking up its body's location in the session.
    pub fn from_example(example: &Example, source: &Path, session: &SymbolSession) -> Self {
        let body = example.body();
        let navigation = session.navigation_data(&body.declaring_type, &body.method);

        Self {
            code_file_path: navigation.file_name,
            line_number: navigation.min_line_number,
            traits: example.tags().to_vec(),
            ..Self::new(example.full_name(), source)
        }
    }
}
