use std::path::Path;

use crate::discovery::manifest::ModuleManifest;

pub mod json;
pub mod yaml;

pub use json::JsonFormat;
pub use yaml::YamlFormat;

/// A module format the adapter knows how to read.
///
/// Formats are matched on the file name suffix, so a format can claim
/// compound extensions like `.specs.json`.
pub trait ModuleFormat: Send + Sync {
    fn name(&self) -> &'static str;

    fn extensions(&self) -> &'static [&'static str];

    fn parse(&self, content: &str) -> Result<ModuleManifest, String>;

    fn matches(&self, path: &Path) -> bool {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        self.extensions().iter().any(|ext| file_name.ends_with(ext))
    }
}

/// Registration table of module formats, built once at startup.
pub struct FormatRegistry {
    formats: Vec<Box<dyn ModuleFormat>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            formats: Vec::new(),
        };

        registry.register(Box::new(JsonFormat));
        registry.register(Box::new(YamlFormat));
        registry
    }

    pub fn register(&mut self, format: Box<dyn ModuleFormat>) {
        self.formats.push(format);
    }

    pub fn format_for(&self, path: &Path) -> Option<&dyn ModuleFormat> {
        self.formats
            .iter()
            .find(|f| f.matches(path))
            .map(|f| f.as_ref())
    }

    pub fn is_supported(&self, path: &Path) -> bool {
        self.format_for(path).is_some()
    }

    pub fn extensions(&self) -> Vec<&'static str> {
        self.formats
            .iter()
            .flat_map(|f| f.extensions().iter().copied())
            .collect()
    }

    pub fn all_formats(&self) -> &[Box<dyn ModuleFormat>] {
        &self.formats
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}
