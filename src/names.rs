//! Identifier safety, structural-key classification, and factory-name resolution.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::ast::{AstKind, AstRef, Property};

/// Prefix applied to generated declaration names (`OasDocument`, `IOasInfo`).
pub const MODEL_PREFIX: &str = "Oas";

/// Synthesized key of a string-indexed map property.
pub const DYNAMIC_KEY: &str = "[k: string]";

/// Pattern key marking an interface keyed by URL path.
pub const PATH_KEY: &str = "^\\/";

static PATH_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\^\\?/").expect("valid regex"));

static PATTERN_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\\^$|?*+()\[\]{}]").expect("valid regex"));

/// Structural position of an interface node, derived from its property key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralRole {
    /// Ordinary record reached through a literal key.
    PlainRecord,
    /// Map value addressed by a runtime name (string index or pattern key).
    DynamicMap,
    /// Map value addressed by a runtime URL path.
    PathMap,
    /// No key at all, e.g. the document root.
    Default,
}

impl StructuralRole {
    /// Whether instances carry their map key as a `_name` field set by the
    /// constructor.
    pub fn holds_name(self) -> bool {
        matches!(self, StructuralRole::DynamicMap | StructuralRole::PathMap)
    }
}

/// Classifies a property key into its structural role.
///
/// The one place that interprets key shapes; emitters and the factory
/// resolver dispatch on the result instead of re-examining key text.
pub fn classify_key(key_name: Option<&str>) -> StructuralRole {
    let Some(key) = key_name else {
        return StructuralRole::Default;
    };
    if key == DYNAMIC_KEY {
        return StructuralRole::DynamicMap;
    }
    if PATH_KEY_RE.is_match(key) {
        return StructuralRole::PathMap;
    }
    if PATTERN_KEY_RE.is_match(key) {
        return StructuralRole::DynamicMap;
    }
    StructuralRole::PlainRecord
}

/// Converts arbitrary schema text into a PascalCase identifier fragment.
pub fn to_safe_string(raw: &str) -> String {
    let mut out = String::new();
    for token in identifier_tokens(raw) {
        let mut chars = token.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            for ch in chars {
                out.push(ch.to_ascii_lowercase());
            }
        }
    }
    out
}

fn identifier_tokens(raw: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for chunk in raw.split(|c: char| !c.is_ascii_alphanumeric()) {
        if chunk.is_empty() {
            continue;
        }
        tokens.extend(split_camel_tokens(chunk));
    }
    tokens
}

fn split_camel_tokens(chunk: &str) -> Vec<String> {
    let chars: Vec<char> = chunk.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }

    let mut tokens = Vec::new();
    let mut start = 0usize;

    for i in 1..chars.len() {
        let prev = chars[i - 1];
        let curr = chars[i];
        let next = chars.get(i + 1).copied();

        let boundary = (prev.is_ascii_lowercase() && curr.is_ascii_uppercase())
            || (prev.is_ascii_alphabetic() && curr.is_ascii_digit())
            || (prev.is_ascii_digit() && curr.is_ascii_alphabetic())
            || (prev.is_ascii_uppercase()
                && curr.is_ascii_uppercase()
                && next.map(|n| n.is_ascii_lowercase()).unwrap_or(false));

        if boundary {
            let token: String = chars[start..i].iter().collect();
            if !token.is_empty() {
                tokens.push(token.to_ascii_lowercase());
            }
            start = i;
        }
    }

    let token: String = chars[start..].iter().collect();
    if !token.is_empty() {
        tokens.push(token.to_ascii_lowercase());
    }

    tokens
}

/// Escapes a property key for the left-hand side of an interface member.
///
/// Valid identifiers pass through bare, the dynamic index signature is kept
/// verbatim, everything else is JSON-quoted.
pub fn escape_key(key: &str) -> String {
    if is_valid_ts_identifier(key) || key == DYNAMIC_KEY {
        return key.to_string();
    }
    JsonValue::String(key.to_string()).to_string()
}

fn is_valid_ts_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    if !(first == '_' || first == '$' || first.is_ascii_alphabetic()) {
        return false;
    }

    chars.all(|ch| ch == '_' || ch == '$' || ch.is_ascii_alphanumeric())
}

// ─── Factory resolution ───────────────────────────────────────────────────────

/// Base names eligible for key-prefixed compounding when a child's declared
/// name does not mention the property key (`get` + `Operation` becomes
/// `GetOperation`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NamingStrategy {
    pub compound_bases: Vec<String>,
}

impl Default for NamingStrategy {
    fn default() -> Self {
        Self {
            compound_bases: vec!["Operation".to_string(), "Schema".to_string()],
        }
    }
}

impl NamingStrategy {
    fn is_compound_base(&self, name: &str) -> bool {
        self.compound_bases.iter().any(|base| base == name)
    }
}

/// Resolved child-factory method for one interface property.
#[derive(Debug, Clone)]
pub struct FactorySpec {
    /// Suffix of the emitted `create*` method name.
    pub method_suffix: String,
    /// Key mentioned in the factory doc comment.
    pub doc_key: String,
    /// Runtime argument forwarded to name-holding children (`name` or `path`).
    pub arg_name: Option<&'static str>,
    /// Node whose class the factory instantiates and returns.
    pub return_type: AstRef,
}

/// Resolves the factory method for one property, or `None` when the property
/// value is not something instances construct.
///
/// Never fails: unresolvable names come back as `??N` placeholder tokens
/// plus a review warning, so one odd property cannot sink the rest of the
/// class.
pub fn resolve_factory(
    property: &Property,
    naming: &NamingStrategy,
    warnings: &mut Vec<String>,
) -> Option<FactorySpec> {
    if property.unreachable_definition {
        return None;
    }

    let child = &property.value_type;
    match child.kind() {
        AstKind::Interface { properties, .. } => {
            let dynamic_grandchild = {
                let props = properties.borrow();
                (props.len() == 1 && props[0].key_name == DYNAMIC_KEY)
                    .then(|| props[0].value_type.clone())
            };
            if let Some(grandchild) = dynamic_grandchild {
                let (doc_key, method_suffix) = match grandchild.standalone_name() {
                    Some(name) => (name.to_string(), to_safe_string(name)),
                    None => {
                        flag_placeholder(&property.key_name, "??2", warnings);
                        ("??1".to_string(), "??2".to_string())
                    }
                };
                return Some(FactorySpec {
                    method_suffix,
                    doc_key,
                    arg_name: Some("name"),
                    return_type: grandchild,
                });
            }

            if property.pattern_property
                && classify_key(child.key_name()) == StructuralRole::PathMap
            {
                let (doc_key, method_suffix) = match child.standalone_name() {
                    Some(name) => (name.to_string(), to_safe_string(name)),
                    None => {
                        flag_placeholder(&property.key_name, "??4", warnings);
                        ("??3".to_string(), "??4".to_string())
                    }
                };
                return Some(FactorySpec {
                    method_suffix,
                    doc_key,
                    arg_name: Some("path"),
                    return_type: child.clone(),
                });
            }

            let method_suffix = match child.standalone_name() {
                Some(base) => compound_or_plain(base, &property.key_name, naming, warnings),
                None => {
                    flag_placeholder(&property.key_name, "??5", warnings);
                    "??5".to_string()
                }
            };
            Some(FactorySpec {
                method_suffix,
                doc_key: property.key_name.clone(),
                arg_name: None,
                return_type: child.clone(),
            })
        }
        AstKind::Array { element } => {
            if matches!(element.kind(), AstKind::String | AstKind::Any) {
                return None;
            }

            if let AstKind::Union { members } = element.kind() {
                let first = members.borrow().first().cloned()?;
                let doc_key = element
                    .standalone_name()
                    .unwrap_or(&property.key_name)
                    .to_string();
                let method_suffix = match first.standalone_name() {
                    Some(name) => {
                        format!("{}{}", to_safe_string(&doc_key), to_safe_string(name))
                    }
                    None => {
                        flag_placeholder(&property.key_name, "??5", warnings);
                        "??5".to_string()
                    }
                };
                return Some(FactorySpec {
                    method_suffix,
                    doc_key,
                    arg_name: None,
                    return_type: first,
                });
            }

            let method_suffix = match element.standalone_name() {
                Some(name) => to_safe_string(name),
                None => {
                    flag_placeholder(&property.key_name, "??5", warnings);
                    "??5".to_string()
                }
            };
            Some(FactorySpec {
                method_suffix,
                doc_key: property.key_name.clone(),
                arg_name: None,
                return_type: element.clone(),
            })
        }
        _ => None,
    }
}

fn compound_or_plain(
    base: &str,
    key_name: &str,
    naming: &NamingStrategy,
    warnings: &mut Vec<String>,
) -> String {
    let mentions_key = base.to_lowercase().contains(&key_name.to_lowercase());
    if mentions_key {
        return to_safe_string(base);
    }

    if naming.is_compound_base(base) {
        return format!("{}{}", to_safe_string(key_name), to_safe_string(base));
    }

    let message = format!(
        "factory name '{base}' does not mention property key '{key_name}'; \
         add '{base}' to compoundBases to derive a compound name"
    );
    tracing::warn!("{message}");
    warnings.push(message);
    to_safe_string(base)
}

fn flag_placeholder(key_name: &str, token: &str, warnings: &mut Vec<String>) {
    let message =
        format!("unresolvable factory name for property '{key_name}'; emitted placeholder {token}");
    tracing::warn!("{message}");
    warnings.push(message);
}

#[cfg(test)]
mod tests {
    use crate::ast::{AstKind, AstNode, Property};

    use super::{
        classify_key, escape_key, resolve_factory, to_safe_string, NamingStrategy,
        StructuralRole, DYNAMIC_KEY, PATH_KEY,
    };

    fn interface(name: Option<&str>, properties: Vec<Property>) -> crate::ast::AstRef {
        let kind = AstKind::interface(properties, Vec::new());
        match name {
            Some(name) => AstNode::named(name, kind).into_ref(),
            None => AstNode::new(kind).into_ref(),
        }
    }

    #[test]
    fn safe_string_handles_schema_shaped_names() {
        assert_eq!(to_safe_string("pathItem"), "PathItem");
        assert_eq!(to_safe_string("security-scheme"), "SecurityScheme");
        assert_eq!(to_safe_string("XMLObject"), "XmlObject");
        assert_eq!(to_safe_string("$ref"), "Ref");
        assert_eq!(to_safe_string(""), "");
    }

    #[test]
    fn escape_key_quotes_only_invalid_identifiers() {
        assert_eq!(escape_key("title"), "title");
        assert_eq!(escape_key("$ref"), "$ref");
        assert_eq!(escape_key(DYNAMIC_KEY), DYNAMIC_KEY);
        assert_eq!(escape_key("application/json"), "\"application/json\"");
        assert_eq!(escape_key("x-oai-\"quoted\""), "\"x-oai-\\\"quoted\\\"\"");
    }

    #[test]
    fn classify_key_covers_all_roles() {
        assert_eq!(classify_key(None), StructuralRole::Default);
        assert_eq!(classify_key(Some("info")), StructuralRole::PlainRecord);
        assert_eq!(classify_key(Some(DYNAMIC_KEY)), StructuralRole::DynamicMap);
        assert_eq!(classify_key(Some(PATH_KEY)), StructuralRole::PathMap);
        assert_eq!(classify_key(Some("^/")), StructuralRole::PathMap);
        assert_eq!(
            classify_key(Some("[1-5](?:\\d{2}|XX)")),
            StructuralRole::DynamicMap
        );
    }

    #[test]
    fn name_holding_roles_are_the_map_roles() {
        assert!(StructuralRole::DynamicMap.holds_name());
        assert!(StructuralRole::PathMap.holds_name());
        assert!(!StructuralRole::PlainRecord.holds_name());
        assert!(!StructuralRole::Default.holds_name());
    }

    #[test]
    fn dynamic_map_property_resolves_to_named_factory() {
        let response = interface(Some("Response"), Vec::new());
        let map = interface(
            None,
            vec![Property::new(DYNAMIC_KEY, response.clone()).pattern()],
        );
        let property = Property::new("responses", map);

        let mut warnings = Vec::new();
        let spec = resolve_factory(&property, &NamingStrategy::default(), &mut warnings)
            .expect("factory expected");

        assert_eq!(spec.method_suffix, "Response");
        assert_eq!(spec.doc_key, "Response");
        assert_eq!(spec.arg_name, Some("name"));
        assert_eq!(spec.return_type.standalone_name(), Some("Response"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn unnamed_dynamic_map_child_emits_placeholders() {
        let map = interface(
            None,
            vec![Property::new(
                DYNAMIC_KEY,
                interface(None, Vec::new()),
            )],
        );
        let property = Property::new("callbacks", map);

        let mut warnings = Vec::new();
        let spec = resolve_factory(&property, &NamingStrategy::default(), &mut warnings)
            .expect("factory expected");

        assert_eq!(spec.doc_key, "??1");
        assert_eq!(spec.method_suffix, "??2");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("??2"));
    }

    #[test]
    fn path_pattern_property_takes_a_path_argument() {
        let path_item = AstNode::named("PathItem", AstKind::interface(Vec::new(), Vec::new()))
            .with_key(PATH_KEY)
            .into_ref();
        let property = Property::new(PATH_KEY, path_item).pattern();

        let mut warnings = Vec::new();
        let spec = resolve_factory(&property, &NamingStrategy::default(), &mut warnings)
            .expect("factory expected");

        assert_eq!(spec.method_suffix, "PathItem");
        assert_eq!(spec.arg_name, Some("path"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn covered_base_compounds_with_property_key() {
        let operation = interface(Some("Operation"), Vec::new());
        let property = Property::new("get", operation);

        let mut warnings = Vec::new();
        let spec = resolve_factory(&property, &NamingStrategy::default(), &mut warnings)
            .expect("factory expected");

        assert_eq!(spec.method_suffix, "GetOperation");
        assert_eq!(spec.doc_key, "get");
        assert_eq!(spec.arg_name, None);
        assert!(warnings.is_empty());
    }

    #[test]
    fn uncovered_base_keeps_name_and_warns() {
        let callback = interface(Some("Callback"), Vec::new());
        let property = Property::new("webhook", callback);

        let mut warnings = Vec::new();
        let spec = resolve_factory(&property, &NamingStrategy::default(), &mut warnings)
            .expect("factory expected");

        assert_eq!(spec.method_suffix, "Callback");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("compoundBases"));
    }

    #[test]
    fn base_mentioning_key_stays_plain() {
        let info = interface(Some("Info"), Vec::new());
        let property = Property::new("info", info);

        let mut warnings = Vec::new();
        let spec = resolve_factory(&property, &NamingStrategy::default(), &mut warnings)
            .expect("factory expected");

        assert_eq!(spec.method_suffix, "Info");
        assert!(warnings.is_empty());
    }

    #[test]
    fn array_of_named_interfaces_builds_element_factory() {
        let server = interface(Some("Server"), Vec::new());
        let servers = AstNode::new(AstKind::Array { element: server }).into_ref();
        let property = Property::new("servers", servers);

        let mut warnings = Vec::new();
        let spec = resolve_factory(&property, &NamingStrategy::default(), &mut warnings)
            .expect("factory expected");

        assert_eq!(spec.method_suffix, "Server");
        assert_eq!(spec.doc_key, "servers");
        assert_eq!(spec.return_type.standalone_name(), Some("Server"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn array_of_union_uses_first_member() {
        let parameter = interface(Some("Parameter"), Vec::new());
        let reference = interface(Some("Reference"), Vec::new());
        let union = AstNode::new(AstKind::union(vec![parameter.clone(), reference])).into_ref();
        let array = AstNode::new(AstKind::Array { element: union }).into_ref();
        let property = Property::new("parameters", array);

        let mut warnings = Vec::new();
        let spec = resolve_factory(&property, &NamingStrategy::default(), &mut warnings)
            .expect("factory expected");

        assert_eq!(spec.method_suffix, "ParametersParameter");
        assert_eq!(spec.doc_key, "parameters");
        assert_eq!(
            crate::ast::node_id(&spec.return_type),
            crate::ast::node_id(&parameter)
        );
    }

    #[test]
    fn primitive_and_string_array_properties_get_no_factory() {
        let mut warnings = Vec::new();
        let strategy = NamingStrategy::default();

        let title = Property::new("title", AstNode::new(AstKind::String).into_ref());
        assert!(resolve_factory(&title, &strategy, &mut warnings).is_none());

        let tags = Property::new(
            "tags",
            AstNode::new(AstKind::Array {
                element: AstNode::new(AstKind::String).into_ref(),
            })
            .into_ref(),
        );
        assert!(resolve_factory(&tags, &strategy, &mut warnings).is_none());

        let unreachable = Property::new("ghost", interface(Some("Ghost"), Vec::new())).unreachable();
        assert!(resolve_factory(&unreachable, &strategy, &mut warnings).is_none());

        assert!(warnings.is_empty());
    }
}
