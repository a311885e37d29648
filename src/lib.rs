pub mod ast;
pub mod emit;
pub mod error;
pub mod generator;
pub mod names;
pub mod render;

use serde::{Deserialize, Serialize};

pub use ast::{node_id, AstKind, AstNode, AstRef, EnumMember, Property};
pub use error::ModelgenError;
pub use generator::{generate, generate_model};
pub use names::{NamingStrategy, StructuralRole};

/// Banner block emitted ahead of the import header unless overridden.
pub const DEFAULT_BANNER: &str = concat!(
    "/* tslint:disable */\n",
    "/**\n",
    " * This file was automatically generated. DO NOT MODIFY IT BY HAND.\n",
    " * Regenerate it from the source schema instead.\n",
    " */"
);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Generation switches, loadable from caller configuration.
pub struct Options {
    /// Whether named interfaces other than the root get standalone
    /// declarations. Traversal still descends through skipped nodes.
    pub declare_externally_referenced: bool,
    /// Whether enums are emitted as `const enum`.
    pub enable_const_enums: bool,
    /// Comment block emitted above the import header. Empty disables it.
    pub banner_comment: String,
    /// Compound-name bases consulted by factory-name resolution.
    pub naming: NamingStrategy,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            declare_externally_referenced: true,
            enable_const_enums: true,
            banner_comment: DEFAULT_BANNER.to_string(),
            naming: NamingStrategy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Generated source plus review diagnostics.
pub struct GeneratedModel {
    /// Complete TypeScript source of the document model.
    pub source: String,
    /// Non-fatal flags collected during generation (naming fallbacks and
    /// placeholder emissions).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}
