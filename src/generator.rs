//! Cycle-safe traversal deciding which nodes become standalone declarations.

use std::collections::HashSet;

use crate::ast::{node_id, AstKind, AstRef};
use crate::emit;
use crate::error::ModelgenError;
use crate::names::MODEL_PREFIX;
use crate::{GeneratedModel, Options};

const CORE_MODULE: &str = "oai-ts-core";

/// Generates the complete TypeScript document-model source for `root`.
pub fn generate(root: &AstRef, options: &Options) -> Result<String, ModelgenError> {
    generate_model(root, options).map(|model| model.source)
}

/// Generates the document-model source plus collected review warnings.
///
/// Output is the fixed header followed by the non-empty declaration sections
/// in category order (type aliases, interface/class pairs, enums), separated
/// by one blank line and closed by one trailing newline. Identical input and
/// options produce byte-identical output.
pub fn generate_model(
    root: &AstRef,
    options: &Options,
) -> Result<GeneratedModel, ModelgenError> {
    let Some(root_name) = root.standalone_name() else {
        return Err(ModelgenError::StructureError(
            "root node must have a standalone name".to_string(),
        ));
    };
    tracing::debug!(root = root_name, "generating document model");

    let mut warnings = Vec::new();

    let mut aliases = Vec::new();
    declare_named_types(root, &mut HashSet::new(), &mut aliases)?;

    let mut interfaces = Vec::new();
    declare_named_interfaces(
        root,
        root_name,
        options,
        &mut HashSet::new(),
        &mut interfaces,
        &mut warnings,
    )?;

    let mut enums = Vec::new();
    declare_enums(root, options.enable_const_enums, &mut HashSet::new(), &mut enums)?;

    let mut sections = vec![header(options)];
    for section in [aliases, interfaces, enums] {
        if !section.is_empty() {
            sections.push(section.join("\n"));
        }
    }

    let mut source = sections.join("\n\n");
    source.push('\n');
    Ok(GeneratedModel { source, warnings })
}

fn header(options: &Options) -> String {
    let import = format!(
        "import {{ {MODEL_PREFIX}ExtensibleNode, I{MODEL_PREFIX}NodeVisitor }} from '{CORE_MODULE}';"
    );
    if options.banner_comment.is_empty() {
        import
    } else {
        format!("{}\n{import}", options.banner_comment)
    }
}

/// Walks the graph collecting `export type` aliases for named non-interface,
/// non-enum nodes. Arrays declare their element before themselves; unions and
/// intersections declare themselves before their members.
fn declare_named_types(
    node: &AstRef,
    visited: &mut HashSet<usize>,
    out: &mut Vec<String>,
) -> Result<(), ModelgenError> {
    if !visited.insert(node_id(node)) {
        return Ok(());
    }

    match node.kind() {
        AstKind::Array { element } => {
            declare_named_types(element, visited, out)?;
            if let Some(name) = node.standalone_name() {
                tracing::trace!(name, "declaring type alias");
                out.push(emit::render_alias(node, name)?);
            }
        }
        AstKind::Enum { .. } => {}
        AstKind::Interface {
            properties,
            super_types,
        } => {
            for property in properties.borrow().iter() {
                declare_named_types(&property.value_type, visited, out)?;
            }
            for super_type in super_types.borrow().iter() {
                declare_named_types(super_type, visited, out)?;
            }
        }
        AstKind::Union { members } | AstKind::Intersection { members } => {
            if let Some(name) = node.standalone_name() {
                tracing::trace!(name, "declaring type alias");
                out.push(emit::render_alias(node, name)?);
            }
            for member in members.borrow().iter() {
                declare_named_types(member, visited, out)?;
            }
        }
        _ => {
            if let Some(name) = node.standalone_name() {
                tracing::trace!(name, "declaring type alias");
                out.push(emit::render_alias(node, name)?);
            }
        }
    }
    Ok(())
}

/// Walks the graph collecting interface/class pairs for named interfaces.
///
/// Non-root interfaces are gated behind `declare_externally_referenced`, but
/// traversal continues regardless so nested eligible nodes are still found.
fn declare_named_interfaces(
    node: &AstRef,
    root_name: &str,
    options: &Options,
    visited: &mut HashSet<usize>,
    out: &mut Vec<String>,
    warnings: &mut Vec<String>,
) -> Result<(), ModelgenError> {
    if !visited.insert(node_id(node)) {
        return Ok(());
    }

    match node.kind() {
        AstKind::Array { element } => {
            declare_named_interfaces(element, root_name, options, visited, out, warnings)?;
        }
        AstKind::Interface {
            properties,
            super_types,
        } => {
            if let Some(name) = node.standalone_name() {
                if name == root_name || options.declare_externally_referenced {
                    tracing::trace!(name, "declaring interface and class");
                    out.push(emit::render_interface(node, name)?);
                    out.push(emit::render_class(node, name, &options.naming, warnings)?);
                }
            }
            for property in properties.borrow().iter() {
                declare_named_interfaces(
                    &property.value_type,
                    root_name,
                    options,
                    visited,
                    out,
                    warnings,
                )?;
            }
            for super_type in super_types.borrow().iter() {
                declare_named_interfaces(super_type, root_name, options, visited, out, warnings)?;
            }
        }
        AstKind::Union { members } | AstKind::Intersection { members } => {
            for member in members.borrow().iter() {
                declare_named_interfaces(member, root_name, options, visited, out, warnings)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Walks the graph collecting enum declarations. Unions and intersections are
/// not traversed here; enums hide there only when something else also reaches
/// them.
fn declare_enums(
    node: &AstRef,
    const_enums: bool,
    visited: &mut HashSet<usize>,
    out: &mut Vec<String>,
) -> Result<(), ModelgenError> {
    if !visited.insert(node_id(node)) {
        return Ok(());
    }

    match node.kind() {
        AstKind::Enum { .. } => {
            if let Some(name) = node.standalone_name() {
                tracing::trace!(name, "declaring enum");
                out.push(emit::render_enum(node, name, const_enums)?);
            }
        }
        AstKind::Array { element } => {
            declare_enums(element, const_enums, visited, out)?;
        }
        AstKind::Tuple { elements } => {
            for element in elements {
                declare_enums(element, const_enums, visited, out)?;
            }
        }
        AstKind::Interface {
            properties,
            super_types,
        } => {
            for property in properties.borrow().iter() {
                declare_enums(&property.value_type, const_enums, visited, out)?;
            }
            for super_type in super_types.borrow().iter() {
                declare_enums(super_type, const_enums, visited, out)?;
            }
        }
        _ => {}
    }
    Ok(())
}
