use crate::discovery::formats::ModuleFormat;
use crate::discovery::manifest::ModuleManifest;

pub const EXTENSIONS: &[&str] = &[".specs.yaml", ".specs.yml"];

pub struct YamlFormat;

impl ModuleFormat for YamlFormat {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn extensions(&self) -> &'static [&'static str] {
        EXTENSIONS
    }

    fn parse(&self, content: &str) -> Result<ModuleManifest, String> {
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_types_and_methods() {
        let yaml = r#"
module: bank_specs
types:
  - full_name: bank_specs::describe_account
    base: nspec
    methods:
      - name: before_each
      - name: it_starts_empty
"#;
        let manifest = YamlFormat.parse(yaml).unwrap();
        assert_eq!(manifest.types.len(), 1);
        assert_eq!(manifest.types[0].methods[1].name, "it_starts_empty");
    }
}
