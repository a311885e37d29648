//! Inline TypeScript type expressions for AST nodes.

use crate::ast::{AstKind, AstNode, AstRef, Property};
use crate::error::ModelgenError;
use crate::names::{escape_key, to_safe_string, MODEL_PREFIX};

/// Renders the expression used when a node appears inside another declaration.
///
/// A named node renders as its declaration name; only anonymous nodes render
/// structurally. Pure, no dedup state: rendering the same node twice yields
/// the same text.
pub fn render_inline(node: &AstRef) -> Result<String, ModelgenError> {
    if let Some(name) = node.standalone_name() {
        return Ok(declaration_reference(node, name));
    }
    render_structure(node)
}

/// Renders a node's structural expression, ignoring its own standalone name.
///
/// Alias bodies go through here so `export type OasX = ...` cannot collapse
/// into a self-reference.
pub fn render_inline_unnamed(node: &AstRef) -> Result<String, ModelgenError> {
    render_structure(node)
}

fn declaration_reference(node: &AstNode, name: &str) -> String {
    // Enums are declared without the model prefix.
    if matches!(node.kind(), AstKind::Enum { .. }) {
        to_safe_string(name)
    } else {
        format!("{MODEL_PREFIX}{}", to_safe_string(name))
    }
}

fn render_structure(node: &AstRef) -> Result<String, ModelgenError> {
    match node.kind() {
        AstKind::Any => Ok("any".to_string()),
        AstKind::Boolean => Ok("boolean".to_string()),
        AstKind::Null => Ok("null".to_string()),
        AstKind::Number => Ok("number".to_string()),
        AstKind::Object => Ok("object".to_string()),
        AstKind::String => Ok("string".to_string()),
        AstKind::Literal(value) => serde_json::to_string(value)
            .map_err(|e| ModelgenError::SerializationError(e.to_string())),
        AstKind::Reference(name) => Ok(name.clone()),
        AstKind::Array { element } => {
            let element = render_inline(element)?;
            // Quoted literal elements need parens: ("red")[] not "red"[].
            if element.ends_with('"') {
                Ok(format!("({element})[]"))
            } else {
                Ok(format!("{element}[]"))
            }
        }
        AstKind::Tuple { elements } => {
            let rendered = elements
                .iter()
                .map(render_inline)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(format!("[{}]", rendered.join(", ")))
        }
        AstKind::Union { members } => render_set_operation(&members.borrow(), " | "),
        AstKind::Intersection { members } => render_set_operation(&members.borrow(), " & "),
        AstKind::Interface { properties, .. } => {
            let lines = render_property_lines(&properties.borrow())?;
            if lines.is_empty() {
                Ok("{\n}".to_string())
            } else {
                Ok(format!("{{\n{}\n}}", lines.join("\n")))
            }
        }
        AstKind::Enum { .. } => Err(ModelgenError::StructureError(
            "enum node without a standalone name cannot be rendered inline".to_string(),
        )),
    }
}

fn render_set_operation(members: &[AstRef], separator: &str) -> Result<String, ModelgenError> {
    let mut rendered = members
        .iter()
        .map(render_inline)
        .collect::<Result<Vec<_>, _>>()?;
    if rendered.len() == 1 {
        return Ok(rendered.remove(0));
    }
    Ok(format!("({})", rendered.join(separator)))
}

/// Renders the member lines shared by interface bodies and class field lists.
///
/// Pattern properties and unreachable definitions are skipped; a value's
/// comment is emitted only when the value renders structurally, since named
/// values carry the comment on their own declaration.
pub fn render_property_lines(properties: &[Property]) -> Result<Vec<String>, ModelgenError> {
    let mut lines = Vec::new();
    for property in properties
        .iter()
        .filter(|p| !p.pattern_property && !p.unreachable_definition)
    {
        let value = &property.value_type;
        if let Some(comment) = value.comment() {
            if value.standalone_name().is_none() {
                lines.push(render_comment(comment));
            }
        }
        let optional = if property.required { "" } else { "?" };
        lines.push(format!(
            "  {}{}: {};",
            escape_key(&property.key_name),
            optional,
            render_inline(value)?
        ));
    }
    Ok(lines)
}

/// Renders free text as a JSDoc block.
pub fn render_comment(comment: &str) -> String {
    let mut lines = vec!["/**".to_string()];
    for line in comment.split('\n') {
        lines.push(format!(" * {line}"));
    }
    lines.push(" */".to_string());
    lines.join("\n")
}
