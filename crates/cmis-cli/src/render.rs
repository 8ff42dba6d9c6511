//! Text rendering for command output.

use std::io::{self, Write};

use colored::Colorize;

use cmis_repository::{ObjectData, ObjectInFolderContainer, RepositoryInfo};
use cmis_schema::{PropertyValue, TypeDefinition, TypeDefinitionContainer};

/// Comma-joined values, or a dimmed marker when unset.
pub fn value(value: &PropertyValue) -> String {
    let parts: Vec<String> = match value {
        PropertyValue::Boolean(v) => v.iter().map(ToString::to_string).collect(),
        PropertyValue::DateTime(v) => v.iter().map(|d| d.to_rfc3339()).collect(),
        PropertyValue::Decimal(v) => v.iter().map(ToString::to_string).collect(),
        PropertyValue::Integer(v) => v.iter().map(ToString::to_string).collect(),
        PropertyValue::Html(v)
        | PropertyValue::Id(v)
        | PropertyValue::String(v)
        | PropertyValue::Uri(v) => v.clone(),
    };
    if parts.is_empty() {
        "(not set)".dimmed().to_string()
    } else {
        parts.join(", ")
    }
}

pub fn repository_info(out: &mut impl Write, info: &RepositoryInfo) -> io::Result<()> {
    writeln!(out, "Repository {} ({})", info.id.bold(), info.name)?;
    writeln!(out, "  Description: {}", info.description)?;
    writeln!(
        out,
        "  Product: {} {} by {}",
        info.product_name, info.product_version, info.vendor_name
    )?;
    writeln!(out, "  CMIS version: {}", info.cmis_version_supported)?;
    writeln!(out, "  Root folder: {}", info.root_folder_id.yellow())?;
    let caps = &info.capabilities;
    writeln!(
        out,
        "  Capabilities: acl={:?} query={:?} changes={:?} descendants={} folder-tree={}",
        caps.acl, caps.query, caps.changes, caps.get_descendants, caps.get_folder_tree
    )?;
    let acl = &info.acl_capabilities;
    writeln!(
        out,
        "  ACL: {:?}, propagation {:?}, {} permissions, {} mappings",
        acl.supported_permissions,
        acl.propagation,
        acl.permissions.len(),
        acl.mappings.len()
    )?;
    Ok(())
}

pub fn type_tree(out: &mut impl Write, nodes: &[TypeDefinitionContainer]) -> io::Result<()> {
    let mut stack: Vec<(&TypeDefinitionContainer, usize)> =
        nodes.iter().rev().map(|n| (n, 0)).collect();
    while let Some((node, indent)) = stack.pop() {
        let def = &node.type_definition;
        writeln!(
            out,
            "{}{} {}",
            "  ".repeat(indent),
            def.id.cyan(),
            def.display_name.dimmed()
        )?;
        stack.extend(node.children.iter().rev().map(|c| (c, indent + 1)));
    }
    Ok(())
}

pub fn type_definition(out: &mut impl Write, def: &TypeDefinition) -> io::Result<()> {
    writeln!(out, "Type {} ({})", def.id.cyan().bold(), def.display_name)?;
    writeln!(out, "  Base: {}", def.base_type_id)?;
    if let Some(parent) = &def.parent_type_id {
        writeln!(out, "  Parent: {parent}")?;
    }
    writeln!(
        out,
        "  Creatable: {}  Fileable: {}  Queryable: {}",
        def.creatable, def.fileable, def.queryable
    )?;
    writeln!(out, "  Properties:")?;
    for prop in def.property_definitions.values() {
        let marker = if prop.inherited { " (inherited)".dimmed().to_string() } else { String::new() };
        writeln!(
            out,
            "    {} {:?} {:?} {:?}{}",
            prop.id, prop.property_type, prop.cardinality, prop.updatability, marker
        )?;
    }
    Ok(())
}

pub fn object(out: &mut impl Write, object: &ObjectData) -> io::Result<()> {
    writeln!(
        out,
        "{} {} [{}]",
        object.id().yellow().bold(),
        object.info.name,
        object.info.type_id
    )?;
    for (id, v) in &object.properties {
        writeln!(out, "  {id} = {}", value(v))?;
    }
    Ok(())
}

pub fn object_tree(out: &mut impl Write, nodes: &[ObjectInFolderContainer]) -> io::Result<()> {
    let mut stack: Vec<(&ObjectInFolderContainer, usize)> =
        nodes.iter().rev().map(|n| (n, 0)).collect();
    while let Some((node, indent)) = stack.pop() {
        let data = &node.object.object;
        let label = node
            .object
            .path_segment
            .as_deref()
            .unwrap_or(&data.info.name);
        writeln!(out, "{}{} {}", "  ".repeat(indent), data.id().yellow(), label)?;
        stack.extend(node.children.iter().rev().map(|c| (c, indent + 1)));
    }
    Ok(())
}
