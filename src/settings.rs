use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

use crate::domain::Example;
use crate::error::SettingsError;

/// Options for one discovery or execution run, read from a settings file and
/// then overridden by command-line flags.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunSettings {
    /// Run one job per binary on the rayon pool
    pub parallel: bool,
    /// Regular expression matched against spec class full names
    pub class_filter: Option<String>,
    pub include_tags: Vec<String>,
    pub exclude_tags: Vec<String>,
    /// Parse module sources when the manifest has no symbol for a method
    pub source_fallback: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            parallel: false,
            class_filter: None,
            include_tags: Vec::new(),
            exclude_tags: Vec::new(),
            source_fallback: true,
        }
    }
}

impl RunSettings {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        let settings: Self = match extension {
            "json" => serde_json::from_str(&content)
                .map_err(|e| SettingsError::parse(path, e.to_string()))?,
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .map_err(|e| SettingsError::parse(path, e.to_string()))?,
            _ => {
                return Err(SettingsError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };

        debug!("Loaded settings from {}: {:?}", path.display(), settings);
        Ok(settings)
    }

    pub fn compile_class_filter(&self) -> Result<Option<Regex>, SettingsError> {
        self.class_filter
            .as_deref()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| SettingsError::InvalidFilter {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .transpose()
    }

    pub fn tag_filter(&self) -> TagFilter {
        TagFilter {
            include: self.include_tags.clone(),
            exclude: self.exclude_tags.clone(),
        }
    }
}

/// Include/exclude filter over example tags. An empty include list admits
/// every example; exclusion wins over inclusion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl TagFilter {
    pub fn matches(&self, example: &Example) -> bool {
        if self.exclude.iter().any(|tag| example.has_tag(tag)) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|tag| example.has_tag(tag))
    }
}
