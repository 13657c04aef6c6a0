/// Module manifest schema.
///
/// A manifest is what the build emits for a compiled spec module: the declared
/// types, their methods, attached attributes and the symbol table used for
/// source navigation. Both the JSON and YAML formats deserialize into these
/// structs.
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ModuleManifest {
    /// Module (assembly) name
    pub module: String,

    /// Source files of the module, relative to the manifest directory
    #[serde(default)]
    pub sources: Vec<PathBuf>,

    #[serde(default)]
    pub types: Vec<TypeInfo>,

    #[serde(default)]
    pub symbols: Vec<SymbolInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TypeInfo {
    pub full_name: String,

    /// Full name of the base type, if any
    #[serde(default)]
    pub base: Option<String>,

    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,

    #[serde(default)]
    pub attributes: Vec<Attribute>,

    #[serde(default)]
    pub methods: Vec<MethodInfo>,
}

impl TypeInfo {
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MethodInfo {
    pub name: String,

    #[serde(default)]
    pub is_async: bool,

    #[serde(default = "default_public")]
    pub is_public: bool,

    /// Number of declared parameters
    #[serde(default)]
    pub parameters: usize,

    #[serde(default)]
    pub attributes: Vec<Attribute>,

    /// Contexts and examples declared inside the method body
    #[serde(default)]
    pub declarations: Vec<Declaration>,
}

impl MethodInfo {
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }
}

fn default_public() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Attribute {
    pub name: String,

    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Declaration {
    Context(ContextDeclaration),
    Example(ExampleDeclaration),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ContextDeclaration {
    #[serde(rename = "context")]
    pub name: String,

    #[serde(default)]
    pub pending: bool,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub declarations: Vec<Declaration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExampleDeclaration {
    #[serde(rename = "example")]
    pub name: String,

    #[serde(default)]
    pub pending: bool,

    #[serde(default)]
    pub skip: bool,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Name of the method holding the example body; defaults to the
    /// enclosing method
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SymbolInfo {
    #[serde(rename = "type")]
    pub type_name: String,

    pub method: String,

    pub file: PathBuf,

    pub line: u32,
}
