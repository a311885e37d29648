//! Standalone declaration emitters: aliases, enums, interfaces, classes.

use crate::ast::{AstKind, AstRef};
use crate::error::ModelgenError;
use crate::names::{
    classify_key, resolve_factory, to_safe_string, FactorySpec, NamingStrategy, MODEL_PREFIX,
};
use crate::render::{render_comment, render_inline, render_inline_unnamed, render_property_lines};

/// Renders `export type OasX = ...` for a named non-interface node.
pub fn render_alias(node: &AstRef, name: &str) -> Result<String, ModelgenError> {
    let body = render_inline_unnamed(node)?;
    Ok(with_comment(
        node,
        format!("export type {MODEL_PREFIX}{} = {body}", to_safe_string(name)),
    ))
}

/// Renders `export enum X { ... }` with flush-left members.
pub fn render_enum(node: &AstRef, name: &str, const_enums: bool) -> Result<String, ModelgenError> {
    let AstKind::Enum { members } = node.kind() else {
        return Err(ModelgenError::StructureError(format!(
            "enum declaration requires an enum node, got {}",
            node.kind().name()
        )));
    };

    let mut lines = Vec::with_capacity(members.len());
    for member in members {
        let AstKind::Literal(value) = member.value.kind() else {
            return Err(ModelgenError::StructureError(format!(
                "enum '{name}' member '{}' must hold a literal value, got {}",
                member.key_name,
                member.value.kind().name()
            )));
        };
        let rendered = serde_json::to_string(value)
            .map_err(|e| ModelgenError::SerializationError(e.to_string()))?;
        lines.push(format!("{} = {}", member.key_name, rendered));
    }

    let keyword = if const_enums { "const " } else { "" };
    let safe = to_safe_string(name);
    let declaration = if lines.is_empty() {
        format!("export {keyword}enum {safe} {{\n}}")
    } else {
        format!("export {keyword}enum {safe} {{\n{}\n}}", lines.join(",\n"))
    };
    Ok(with_comment(node, declaration))
}

/// Renders `export interface IOasX extends ... { ... }`.
pub fn render_interface(node: &AstRef, name: &str) -> Result<String, ModelgenError> {
    let AstKind::Interface { super_types, .. } = node.kind() else {
        return Err(ModelgenError::StructureError(format!(
            "interface declaration requires an interface node, got {}",
            node.kind().name()
        )));
    };

    let extends = {
        let supers = super_types.borrow();
        let names: Vec<String> = supers
            .iter()
            .filter_map(|super_type| super_type.standalone_name().map(to_safe_string))
            .collect();
        if names.is_empty() {
            String::new()
        } else {
            format!("extends {} ", names.join(", "))
        }
    };

    let body = render_inline_unnamed(node)?;
    Ok(with_comment(
        node,
        format!(
            "export interface I{MODEL_PREFIX}{} {extends}{body}",
            to_safe_string(name)
        ),
    ))
}

/// Renders the visitor-accepting class backing a named interface.
///
/// Member blocks come out in a fixed order: fields (with a `_name` holder for
/// map-addressed roles), the name constructor, one factory per resolvable
/// property, and the visitor dispatch.
pub fn render_class(
    node: &AstRef,
    name: &str,
    naming: &NamingStrategy,
    warnings: &mut Vec<String>,
) -> Result<String, ModelgenError> {
    let AstKind::Interface { properties, .. } = node.kind() else {
        return Err(ModelgenError::StructureError(format!(
            "class declaration requires an interface node, got {}",
            node.kind().name()
        )));
    };

    let safe = to_safe_string(name);
    let role = classify_key(node.key_name());
    let mut blocks: Vec<String> = Vec::new();

    let mut field_lines = Vec::new();
    if role.holds_name() {
        field_lines.push("  _name: string;".to_string());
    }
    field_lines.extend(render_property_lines(&properties.borrow())?);
    if !field_lines.is_empty() {
        blocks.push(field_lines.join("\n"));
    }

    if role.holds_name() {
        blocks.push(
            "  constructor(name: string) {\n    super();\n    this._name = name;\n  }".to_string(),
        );
    }

    for property in properties.borrow().iter() {
        let Some(spec) = resolve_factory(property, naming, warnings) else {
            continue;
        };
        blocks.push(render_factory(&spec)?);
    }

    blocks.push(render_accept(&safe));

    let header = format!(
        "export class {MODEL_PREFIX}{safe} extends {MODEL_PREFIX}ExtensibleNode \
         implements I{MODEL_PREFIX}{safe} {{"
    );
    Ok(with_comment(
        node,
        format!("{header}\n{}\n}}", blocks.join("\n\n")),
    ))
}

fn render_factory(spec: &FactorySpec) -> Result<String, ModelgenError> {
    let type_text = render_inline(&spec.return_type)?;

    let rendered = match spec.arg_name {
        Some(arg) => format!(
            "  /**\n   * Creates an {MODEL_PREFIX} {key} object..\n   * @return {{{ty}}}\n   */\n  public create{suffix}({arg}: string): {ty} {{\n    let rval: {ty} = new {ty}({arg});\n    rval._ownerDocument = this._ownerDocument;\n    rval._parent = this;\n    return rval;\n  }}",
            key = spec.doc_key,
            ty = type_text,
            suffix = spec.method_suffix,
        ),
        None => {
            let mention = if spec
                .doc_key
                .to_lowercase()
                .contains(&type_text.to_lowercase())
            {
                String::new()
            } else {
                format!(" {type_text}")
            };
            format!(
                "  /**\n   * Creates an OAS 3.0 {key}{mention} object..\n   * @return {{{ty}}}\n   */\n  public create{suffix}(): {ty} {{\n    let rval: {ty} = new {ty}();\n    rval._ownerDocument = this._ownerDocument;\n    rval._parent = this;\n    return rval;\n  }}",
                key = spec.doc_key,
                ty = type_text,
                suffix = spec.method_suffix,
            )
        }
    };
    Ok(rendered)
}

fn render_accept(safe: &str) -> String {
    format!(
        "  /**\n   * Accepts the given OAS node visitor and calls the appropriate method on it to visit this node.\n   * @param visitor\n   */\n  public accept(visitor: I{MODEL_PREFIX}NodeVisitor): void {{\n    visitor.visit{safe}(<I{MODEL_PREFIX}{safe}>this);\n  }}"
    )
}

fn with_comment(node: &AstRef, declaration: String) -> String {
    match node.comment() {
        Some(comment) => format!("{}\n{declaration}", render_comment(comment)),
        None => declaration,
    }
}
