//! Rust language adapter for semindex.
//!
//! Implements the capture dispatch table, AST-shape helpers and metadata
//! extractors for `tree-sitter-rust`, per spec.md §4.4's Rust edge cases:
//! `struct`/tuple struct -> `class`, `trait` -> `interface`, `enum` ->
//! `enum` (variants become enum members), `impl` blocks mint no definition
//! of their own but attach methods to the struct/trait they name, and
//! associated functions without a `self` receiver are `static` methods
//! (the common case being `new`, per the source note, but the rule applies
//! uniformly to every `self`-less associated function).

pub mod helpers;

use helpers::RustHelpers;
use semindex_core::adapter::{
    AstShapeHelpers, Capture, DispatchTable, LanguageAdapter, MetadataExtractors,
    ProcessingContext, Visibility,
};
use semindex_core::definition::{
    AccessModifier, Class, DefinitionHeader, Enum, EnumMember, EnumMemberValue, ExportKind, ExportMetadata,
    Function, Import, ImportKind, Interface, Method, Namespace, Parameter, Property, TypeAlias, Variable,
    VariableKind,
};
use semindex_core::{node_to_location, symbol, DefinitionBuilder, SymbolKind};
use std::collections::HashMap;
use tree_sitter::Node;

pub struct RustAdapter {
    dispatch: DispatchTable,
    helpers: RustHelpers,
}

impl Default for RustAdapter {
    fn default() -> Self {
        RustAdapter {
            dispatch: build_dispatch_table(),
            helpers: RustHelpers,
        }
    }
}

impl LanguageAdapter for RustAdapter {
    fn dispatch_table(&self) -> &DispatchTable {
        &self.dispatch
    }

    fn helpers(&self) -> &dyn AstShapeHelpers {
        &self.helpers
    }

    fn metadata_extractors(&self) -> &dyn MetadataExtractors {
        &self.helpers
    }
}

fn build_dispatch_table() -> DispatchTable {
    let mut table: DispatchTable = HashMap::new();
    table.insert("definition.class", Box::new(handle_class));
    table.insert("definition.interface", Box::new(handle_interface));
    table.insert("definition.enum", Box::new(handle_enum));
    table.insert("definition.namespace", Box::new(handle_namespace));
    table.insert("definition.variable", Box::new(handle_variable));
    table.insert("definition.type_alias", Box::new(handle_type_alias));
    table.insert("import.named", Box::new(handle_import));
    table.insert("definition.function", Box::new(handle_function));
    table.insert("definition.function.generic", Box::new(handle_function));
    table.insert("definition.method", Box::new(handle_method));
    table.insert("definition.property", Box::new(handle_property));
    table.insert("definition.enum_member", Box::new(handle_enum_member));
    table.insert("definition.parameter", Box::new(handle_parameter));
    table.insert("definition.parameter.self", Box::new(handle_parameter));
    table
}

fn is_exported(vis: Visibility) -> bool {
    !matches!(vis, Visibility::FilePrivate)
}

/// Rust has no parent-module or protected-level keyword distinct from
/// `pub`/`pub(crate)`; both forms of `pub` render as `AccessModifier::Public`
/// here, the closest fit in the shared three-level vocabulary. Private
/// (unmarked) items carry no access modifier at all.
fn access_modifier(vis: Visibility) -> Option<AccessModifier> {
    match vis {
        Visibility::FileExport | Visibility::PackageInternal | Visibility::Public => Some(AccessModifier::Public),
        Visibility::Protected => Some(AccessModifier::Protected),
        Visibility::Private => Some(AccessModifier::Private),
        Visibility::FilePrivate => None,
    }
}

fn name_field<'a>(node: Node, source: &'a str) -> Option<&'a str> {
    node.child_by_field_name("name")
        .and_then(|n| n.utf8_text(source.as_bytes()).ok())
}

fn handle_class(capture: &Capture, builder: &mut DefinitionBuilder, ctx: &ProcessingContext) {
    let helpers = RustHelpers;
    let Some(name) = name_field(capture.node, ctx.source) else {
        return;
    };
    let location = capture.location.clone();
    let id = symbol(SymbolKind::Class, name, &location);
    let scope = ctx.scopes.containing_scope(&location);
    let vis = helpers.extract_visibility(capture.node, ctx.source);
    let header = DefinitionHeader::new(id, name, location, scope).with_exported(is_exported(vis));
    let generics = helpers.extract_generics(capture.node, ctx.source);
    builder.add_class(Class::new(header).with_generics(generics));
}

fn handle_interface(capture: &Capture, builder: &mut DefinitionBuilder, ctx: &ProcessingContext) {
    let helpers = RustHelpers;
    let Some(name) = name_field(capture.node, ctx.source) else {
        return;
    };
    let location = capture.location.clone();
    let id = symbol(SymbolKind::Interface, name, &location);
    let scope = ctx.scopes.containing_scope(&location);
    let vis = helpers.extract_visibility(capture.node, ctx.source);
    let header = DefinitionHeader::new(id, name, location, scope).with_exported(is_exported(vis));
    let generics = helpers.extract_generics(capture.node, ctx.source);
    let supertraits = helpers.extract_extends(capture.node, ctx.source);
    builder.add_interface(
        Interface::new(header)
            .with_generics(generics)
            .with_extends(supertraits),
    );
}

fn handle_enum(capture: &Capture, builder: &mut DefinitionBuilder, ctx: &ProcessingContext) {
    let helpers = RustHelpers;
    let Some(name) = name_field(capture.node, ctx.source) else {
        return;
    };
    let location = capture.location.clone();
    let id = symbol(SymbolKind::Enum, name, &location);
    let scope = ctx.scopes.containing_scope(&location);
    let vis = helpers.extract_visibility(capture.node, ctx.source);
    let header = DefinitionHeader::new(id, name, location, scope).with_exported(is_exported(vis));
    let generics = helpers.extract_generics(capture.node, ctx.source);
    let mut e = Enum::new(header);
    e.generics = generics;
    builder.add_enum(e);
}

fn handle_namespace(capture: &Capture, builder: &mut DefinitionBuilder, ctx: &ProcessingContext) {
    let helpers = RustHelpers;
    let Some(name) = name_field(capture.node, ctx.source) else {
        return;
    };
    let location = capture.location.clone();
    let id = symbol(SymbolKind::Namespace, name, &location);
    let scope = ctx.scopes.containing_scope(&location);
    let vis = helpers.extract_visibility(capture.node, ctx.source);
    let header = DefinitionHeader::new(id, name, location, scope).with_exported(is_exported(vis));
    builder.add_namespace(Namespace::new(header));
}

fn handle_variable(capture: &Capture, builder: &mut DefinitionBuilder, ctx: &ProcessingContext) {
    let helpers = RustHelpers;
    let Some(name) = name_field(capture.node, ctx.source) else {
        return;
    };
    let location = capture.location.clone();
    let kind = if capture.node.kind() == "const_item" {
        VariableKind::Constant
    } else {
        VariableKind::Variable
    };
    let id = symbol(SymbolKind::Variable, name, &location);
    let scope = ctx.scopes.containing_scope(&location);
    let vis = helpers.extract_visibility(capture.node, ctx.source);
    let header = DefinitionHeader::new(id, name, location, scope).with_exported(is_exported(vis));
    let mut variable = Variable::new(header, kind);
    if let Some(ty) = helpers.extract_type_annotation(capture.node, ctx.source) {
        variable = variable.with_type(ty);
    }
    if let Some(value) = capture
        .node
        .child_by_field_name("value")
        .and_then(|n| n.utf8_text(ctx.source.as_bytes()).ok())
    {
        variable = variable.with_initial_value(value);
    }
    builder.add_variable(variable);
}

fn handle_type_alias(capture: &Capture, builder: &mut DefinitionBuilder, ctx: &ProcessingContext) {
    let helpers = RustHelpers;
    let Some(name) = name_field(capture.node, ctx.source) else {
        return;
    };
    let location = capture.location.clone();
    let id = symbol(SymbolKind::TypeAlias, name, &location);
    let scope = ctx.scopes.containing_scope(&location);
    let vis = helpers.extract_visibility(capture.node, ctx.source);
    let header = DefinitionHeader::new(id, name, location, scope).with_exported(is_exported(vis));
    let generics = helpers.extract_generics(capture.node, ctx.source);
    let mut alias = TypeAlias::new(header).with_generics(generics);
    if let Some(expr) = capture
        .node
        .child_by_field_name("type")
        .and_then(|n| n.utf8_text(ctx.source.as_bytes()).ok())
    {
        alias = alias.with_type_expression(expr);
    }
    builder.add_type_alias(alias);
}

struct UseEntry {
    name: String,
    original_name: Option<String>,
    path: String,
    is_wildcard: bool,
}

fn collect_uses(node: Node, prefix: &str, source: &str, out: &mut Vec<UseEntry>) {
    let text = |n: Node| n.utf8_text(source.as_bytes()).unwrap_or_default().to_string();
    match node.kind() {
        "use_wildcard" => out.push(UseEntry {
            name: "*".to_string(),
            original_name: None,
            path: prefix.to_string(),
            is_wildcard: true,
        }),
        "identifier" | "self" => out.push(UseEntry {
            name: text(node),
            original_name: None,
            path: prefix.to_string(),
            is_wildcard: false,
        }),
        "scoped_identifier" => {
            let Some(name_node) = node.child_by_field_name("name") else {
                return;
            };
            let module_path = node
                .child_by_field_name("path")
                .map(text)
                .unwrap_or_else(|| prefix.to_string());
            out.push(UseEntry {
                name: text(name_node),
                original_name: None,
                path: module_path,
                is_wildcard: false,
            });
        }
        "use_as_clause" => {
            let Some(path_field) = node.child_by_field_name("path") else {
                return;
            };
            let Some(alias_field) = node.child_by_field_name("alias") else {
                return;
            };
            let mut inner = Vec::new();
            collect_uses(path_field, prefix, source, &mut inner);
            if let Some(mut entry) = inner.pop() {
                entry.original_name = Some(entry.name.clone());
                entry.name = text(alias_field);
                out.push(entry);
            }
        }
        "scoped_use_list" => {
            let new_prefix = node
                .child_by_field_name("path")
                .map(text)
                .unwrap_or_else(|| prefix.to_string());
            let Some(list) = node.child_by_field_name("list") else {
                return;
            };
            let mut cursor = list.walk();
            for child in list.named_children(&mut cursor) {
                collect_uses(child, &new_prefix, source, out);
            }
        }
        "use_list" => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                collect_uses(child, prefix, source, out);
            }
        }
        _ => {}
    }
}

fn handle_import(capture: &Capture, builder: &mut DefinitionBuilder, ctx: &ProcessingContext) {
    let helpers = RustHelpers;
    let Some(argument) = capture.node.child_by_field_name("argument") else {
        return;
    };
    let mut entries = Vec::new();
    collect_uses(argument, "", ctx.source, &mut entries);

    let vis = helpers.extract_visibility(capture.node, ctx.source);
    let re_export = is_exported(vis);

    for entry in entries {
        let location = capture.location.clone();
        let display_name = if entry.is_wildcard {
            format!("{}::*", entry.path)
        } else {
            entry.name.clone()
        };
        let id = symbol(SymbolKind::Import, &display_name, &location);
        let scope = ctx.scopes.containing_scope(&location);
        let mut header = DefinitionHeader::new(id, display_name.as_str(), location, scope);
        if re_export {
            header = header.with_export_metadata(ExportMetadata::new(ExportKind::ReExport));
        }
        let import_kind = if entry.is_wildcard {
            ImportKind::Namespace
        } else {
            ImportKind::Named
        };
        let mut import = Import::new(header, entry.path.as_str(), import_kind);
        if let Some(original) = entry.original_name {
            import = import.with_original_name(original);
        }
        builder.add_import(import);
    }
}

fn handle_function(capture: &Capture, builder: &mut DefinitionBuilder, ctx: &ProcessingContext) {
    let helpers = RustHelpers;
    if helpers.is_method_context(capture.node) {
        // Methods register through `definition.method` instead; deferring
        // here avoids minting a duplicate top-level function (§4.4).
        return;
    }
    let Some(name) = name_field(capture.node, ctx.source) else {
        return;
    };
    let location = capture.location.clone();
    let id = symbol(SymbolKind::Function, name, &location);
    let scope = ctx.scopes.containing_scope(&location);
    let vis = helpers.extract_visibility(capture.node, ctx.source);
    let header = DefinitionHeader::new(id, name, location, scope).with_exported(is_exported(vis));
    let body_scope = ctx.scopes.body_scope_for(name, &capture.location);
    let mut function = Function::new(header, body_scope);
    function.generics = helpers.extract_generics(capture.node, ctx.source);
    function.return_type = helpers.extract_return_type(capture.node, ctx.source);
    builder.add_function(function);
}

fn handle_method(capture: &Capture, builder: &mut DefinitionBuilder, ctx: &ProcessingContext) {
    let helpers = RustHelpers;
    let Some(name) = name_field(capture.node, ctx.source) else {
        return;
    };
    let location = capture.location.clone();
    let id = symbol(SymbolKind::Method, name, &location);
    let scope = ctx.scopes.containing_scope(&location);
    let body_scope = ctx.scopes.body_scope_for(name, &capture.location);

    let mut method = Method::new(
        DefinitionHeader::new(id, name, location, scope),
        body_scope,
    );
    method.generics = helpers.extract_generics(capture.node, ctx.source);
    method.return_type = helpers.extract_return_type(capture.node, ctx.source);
    method.async_ = helpers.is_async(capture.node);
    method.static_ = helpers.is_associated_function(capture.node);
    method.abstract_ = capture.node.kind() == "function_signature_item";
    let vis = helpers.extract_visibility(capture.node, ctx.source);
    method.header.is_exported = is_exported(vis);
    method.access_modifier = access_modifier(vis);

    let owner_name = helpers.find_containing_impl(capture.node, ctx.source);
    if let Some(owner_name) = owner_name {
        if let Some(class_id) = builder.find_class_by_name(&owner_name) {
            builder.add_method_to_class(&class_id, method);
            return;
        }
        if let Some(interface_id) = builder.find_interface_by_name(&owner_name) {
            builder.add_method_signature_to_interface(&interface_id, method);
            return;
        }
        return;
    }

    // No enclosing `impl` block: a default method declared directly in a
    // trait body.
    if let Some(interface_id) = helpers.find_containing_interface(capture.node, ctx.file_path, ctx.source) {
        builder.add_method_signature_to_interface(&interface_id, method);
    }
}

fn handle_property(capture: &Capture, builder: &mut DefinitionBuilder, ctx: &ProcessingContext) {
    let helpers = RustHelpers;
    let Some(name) = name_field(capture.node, ctx.source) else {
        return;
    };
    let Some(class_id) = helpers.find_containing_class(capture.node, ctx.file_path, ctx.source) else {
        return;
    };
    let location = capture.location.clone();
    let id = symbol(SymbolKind::Property, name, &location);
    let mut property = Property::new(id, name, location);
    if let Some(ty) = helpers.extract_type_annotation(capture.node, ctx.source) {
        property = property.with_type(ty);
    }
    builder.add_property_to_class(&class_id, property);
}

fn handle_enum_member(capture: &Capture, builder: &mut DefinitionBuilder, ctx: &ProcessingContext) {
    let helpers = RustHelpers;
    let Some(name) = name_field(capture.node, ctx.source) else {
        return;
    };
    let Some(enum_id) = helpers.find_containing_enum(capture.node, ctx.file_path, ctx.source) else {
        return;
    };
    let location = capture.location.clone();
    let id = symbol(SymbolKind::EnumMember, name, &location);
    let mut member = EnumMember::new(id, name, location);
    if let Some(value_text) = capture
        .node
        .child_by_field_name("value")
        .and_then(|n| n.utf8_text(ctx.source.as_bytes()).ok())
    {
        if let Ok(n) = value_text.trim().parse::<f64>() {
            member = member.with_value(EnumMemberValue::Number(n));
        }
    }
    builder.add_enum_member(&enum_id, member);
}

fn handle_parameter(capture: &Capture, builder: &mut DefinitionBuilder, ctx: &ProcessingContext) {
    let helpers = RustHelpers;
    let Some(callable_id) = helpers.find_containing_callable(capture.node, ctx.file_path, ctx.source) else {
        return;
    };
    let location = capture.location.clone();

    if capture.node.kind() == "self_parameter" {
        let id = symbol(SymbolKind::Parameter, "self", &location);
        let mut param = Parameter::new(id, "self", location);
        if let Some(owner) = helpers.find_containing_impl(capture.node, ctx.source) {
            param = param.with_type(owner);
        }
        builder.add_parameter_to_callable(&callable_id, param);
        return;
    }

    let name = capture
        .node
        .child_by_field_name("pattern")
        .and_then(|n| n.utf8_text(ctx.source.as_bytes()).ok())
        .unwrap_or("_");
    let id = symbol(SymbolKind::Parameter, name, &location);
    let mut param = Parameter::new(id, name, location);
    if let Some(ty) = helpers.extract_parameter_type(capture.node, ctx.source) {
        param = param.with_type(ty);
    }
    builder.add_parameter_to_callable(&callable_id, param);
}

#[cfg(test)]
mod tests {
    use super::*;
    use semindex_core::adapter::Capture as AdapterCapture;
    use semindex_core::node_to_location;
    use streaming_iterator::StreamingIterator;
    use tree_sitter::{Parser, Query, QueryCursor};

    fn run(source: &str) -> semindex_core::IndexOutcome {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_rust::LANGUAGE.into()).unwrap();
        let tree = parser.parse(source, None).unwrap();
        let query_src = include_str!("queries/definitions.scm");
        let query = Query::new(&tree_sitter_rust::LANGUAGE.into(), query_src).unwrap();
        let mut cursor = QueryCursor::new();
        let mut captures = Vec::new();
        let mut matches = cursor.matches(&query, tree.root_node(), source.as_bytes());
        while let Some(m) = matches.next() {
            for qc in m.captures {
                let name = query.capture_names()[qc.index as usize].to_string();
                let node = qc.node;
                let text = node.utf8_text(source.as_bytes()).unwrap_or_default().to_string();
                let location = node_to_location(&node, "lib.rs");
                captures.push(AdapterCapture {
                    name,
                    node,
                    text,
                    location,
                });
            }
        }
        let adapter = RustAdapter::default();
        semindex_core::indexer::index(&adapter, captures, "lib.rs", source).unwrap()
    }

    #[test]
    fn struct_with_impl_new_and_method() {
        let source = "pub struct P { x: i32 }\nimpl P {\n    pub fn new() -> Self { P { x: 0 } }\n    pub fn get(&self) -> i32 { self.x }\n}\n";
        let outcome = run(source);
        assert_eq!(outcome.result.classes.len(), 1);
        let class = outcome.result.classes.values().next().unwrap();
        assert!(class.header.is_exported);
        assert_eq!(class.properties.len(), 1);
        assert_eq!(class.properties[0].name, "x");
        assert_eq!(class.properties[0].r#type.as_deref(), Some("i32"));
        assert_eq!(class.methods.len(), 2);
        let new_method = class.methods.iter().find(|m| m.header.name == "new").unwrap();
        assert!(new_method.static_);
        assert_eq!(new_method.return_type.as_deref(), Some("Self"));
        let get_method = class.methods.iter().find(|m| m.header.name == "get").unwrap();
        assert!(!get_method.static_);
        assert_eq!(get_method.return_type.as_deref(), Some("i32"));
        assert_eq!(get_method.parameters.len(), 1);
        assert_eq!(get_method.parameters[0].name, "self");
        assert_eq!(get_method.parameters[0].r#type.as_deref(), Some("P"));
    }

    #[test]
    fn free_function_is_not_duplicated_as_method() {
        let source = "pub fn helper(x: i32) -> i32 { x }\n";
        let outcome = run(source);
        assert_eq!(outcome.result.functions.len(), 1);
        let function = outcome.result.functions.values().next().unwrap();
        assert_eq!(function.parameters.len(), 1);
        assert_eq!(function.parameters[0].name, "x");
    }

    #[test]
    fn enum_variants_become_members_in_order() {
        let source = "pub enum Color { Red, Green, Blue }\n";
        let outcome = run(source);
        assert_eq!(outcome.result.enums.len(), 1);
        let e = outcome.result.enums.values().next().unwrap();
        let names: Vec<_> = e.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Red", "Green", "Blue"]);
    }

    #[test]
    fn trait_with_required_and_default_methods() {
        let source = "pub trait Greeter {\n    fn name(&self) -> String;\n    fn greet(&self) -> String { format!(\"hi {}\", self.name()) }\n}\n";
        let outcome = run(source);
        assert_eq!(outcome.result.interfaces.len(), 1);
        let interface = outcome.result.interfaces.values().next().unwrap();
        assert_eq!(interface.methods.len(), 2);
        let required = interface.methods.iter().find(|m| m.header.name == "name").unwrap();
        assert!(required.abstract_);
        let default = interface.methods.iter().find(|m| m.header.name == "greet").unwrap();
        assert!(!default.abstract_);
    }

    #[test]
    fn private_item_is_not_exported() {
        let source = "struct Hidden { y: i32 }\n";
        let outcome = run(source);
        let class = outcome.result.classes.values().next().unwrap();
        assert!(!class.header.is_exported);
    }

    #[test]
    fn use_declaration_fans_out_multiple_imports() {
        let source = "use std::collections::{HashMap, HashSet as Set};\n";
        let outcome = run(source);
        assert_eq!(outcome.result.imports.len(), 2);
        let set_import = outcome
            .result
            .imports
            .values()
            .find(|i| i.header.name == "Set")
            .unwrap();
        assert_eq!(set_import.original_name.as_deref(), Some("HashSet"));
        assert_eq!(set_import.import_path, "std::collections");
    }
}
