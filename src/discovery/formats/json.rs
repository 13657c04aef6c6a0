use crate::discovery::formats::ModuleFormat;
use crate::discovery::manifest::ModuleManifest;

pub const EXTENSIONS: &[&str] = &[".specs.json"];

pub struct JsonFormat;

impl ModuleFormat for JsonFormat {
    fn name(&self) -> &'static str {
        "json"
    }

    fn extensions(&self) -> &'static [&'static str] {
        EXTENSIONS
    }

    fn parse(&self, content: &str) -> Result<ModuleManifest, String> {
        serde_json::from_str(content).map_err(|e| e.to_string())
    }
}
