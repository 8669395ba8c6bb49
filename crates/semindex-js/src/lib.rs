//! JavaScript/TypeScript/TSX language adapter for semindex.
//!
//! One dispatch table and one `JsHelpers` bundle cover all three grammars
//! (spec.md §4.4): plain JavaScript source parses identically under either
//! grammar for every node kind this crate inspects, and TSX differs from
//! TypeScript only in how JSX is tokenized, never in declaration shape. TS-only
//! constructs (`interface`, `enum`, access modifiers, `abstract`, parameter
//! properties) simply never appear in a JS/TSX parse tree, so the same
//! handlers serve all three grammars without a language tag anywhere in this
//! file.

pub mod helpers;

use helpers::{definition_name, JsHelpers};
use semindex_core::adapter::{
    AstShapeHelpers, Capture, DispatchTable, LanguageAdapter, MetadataExtractors, ProcessingContext,
};
use semindex_core::definition::{
    AccessModifier, Class, Constructor, DecoratorRecord, DefinitionHeader, Enum, EnumMember,
    EnumMemberValue, ExportKind, ExportMetadata, Function, Import, ImportKind, Interface, Method,
    Namespace, Parameter, Property, TypeAlias, Variable, VariableKind,
};
use semindex_core::{node_to_location, symbol, DefinitionBuilder, SymbolKind};
use std::collections::HashMap;
use tree_sitter::Node;

pub struct JsAdapter {
    dispatch: DispatchTable,
    helpers: JsHelpers,
}

impl Default for JsAdapter {
    fn default() -> Self {
        JsAdapter {
            dispatch: build_dispatch_table(),
            helpers: JsHelpers,
        }
    }
}

impl LanguageAdapter for JsAdapter {
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
    table.insert("definition.method", Box::new(handle_method));
    table.insert("definition.property", Box::new(handle_property));
    table.insert("definition.enum_member", Box::new(handle_enum_member));
    table.insert("definition.parameter", Box::new(handle_parameter));
    table.insert("definition.decorator", Box::new(handle_decorator));
    table
}

fn header_for(
    kind: SymbolKind,
    name: &str,
    capture: &Capture,
    ctx: &ProcessingContext,
    helpers: &JsHelpers,
) -> DefinitionHeader {
    let location = capture.location.clone();
    let id = symbol(kind, name, &location);
    let scope = ctx.scopes.containing_scope(&location);
    let vis = helpers.extract_visibility(capture.node, ctx.source);
    let exported = matches!(vis, semindex_core::adapter::Visibility::FileExport);
    let mut header = DefinitionHeader::new(id, name, location, scope).with_exported(exported);
    if let Some(doc) = helpers.leading_docstring(capture.node, ctx.source) {
        header = header.with_docstring(doc);
    }
    header
}

fn handle_class(capture: &Capture, builder: &mut DefinitionBuilder, ctx: &ProcessingContext) {
    let helpers = JsHelpers;
    let Some(name) = definition_name(capture.node, ctx.source) else {
        return;
    };
    let header = header_for(SymbolKind::Class, name, capture, ctx, &helpers);
    let generics = helpers.extract_generics(capture.node, ctx.source);
    let extends = helpers.extract_heritage(capture.node, ctx.source);
    let implements = helpers.extract_implements(capture.node, ctx.source);
    let abstract_ = capture.node.kind() == "abstract_class_declaration";
    builder.add_class(
        Class::new(header)
            .with_generics(generics)
            .with_extends(extends)
            .with_implements(implements)
            .with_abstract(abstract_),
    );
}

fn handle_interface(capture: &Capture, builder: &mut DefinitionBuilder, ctx: &ProcessingContext) {
    let helpers = JsHelpers;
    let Some(name) = definition_name(capture.node, ctx.source) else {
        return;
    };
    let header = header_for(SymbolKind::Interface, name, capture, ctx, &helpers);
    let generics = helpers.extract_generics(capture.node, ctx.source);
    let extends = helpers.extract_heritage(capture.node, ctx.source);
    builder.add_interface(
        Interface::new(header.clone())
            .with_generics(generics.clone())
            .with_extends(extends),
    );

    // A TS `interface` also describes a type shape (spec.md §4.4): register
    // a parallel type alias under the same name so both views are queryable.
    let alias_location = capture.location.clone();
    let alias_id = symbol(SymbolKind::TypeAlias, name, &alias_location);
    let alias_header = DefinitionHeader::new(alias_id, name, alias_location, header.defining_scope_id)
        .with_exported(header.is_exported);
    builder.add_type_alias(
        TypeAlias::new(alias_header)
            .with_generics(generics)
            .with_type_expression(name),
    );
}

fn handle_enum(capture: &Capture, builder: &mut DefinitionBuilder, ctx: &ProcessingContext) {
    let helpers = JsHelpers;
    let Some(name) = definition_name(capture.node, ctx.source) else {
        return;
    };
    let header = header_for(SymbolKind::Enum, name, capture, ctx, &helpers);
    let is_const = capture
        .node
        .children(&mut capture.node.walk())
        .any(|c| c.kind() == "const");
    builder.add_enum(Enum::new(header).with_const(is_const));
}

fn handle_namespace(capture: &Capture, builder: &mut DefinitionBuilder, ctx: &ProcessingContext) {
    let helpers = JsHelpers;
    let Some(name) = definition_name(capture.node, ctx.source) else {
        return;
    };
    let header = header_for(SymbolKind::Namespace, name, capture, ctx, &helpers);
    builder.add_namespace(Namespace::new(header));
}

fn handle_variable(capture: &Capture, builder: &mut DefinitionBuilder, ctx: &ProcessingContext) {
    let helpers = JsHelpers;
    if let Some(value) = capture.node.child_by_field_name("value") {
        if helpers.is_definition_value(value) {
            // Registered via `definition.function`/`definition.class` instead.
            return;
        }
    }
    let Some(name) = definition_name(capture.node, ctx.source) else {
        return;
    };
    let decl_kind = capture
        .node
        .parent()
        .and_then(|p| p.child(0))
        .map(|t| t.kind())
        .unwrap_or("let");
    let kind = if decl_kind == "const" {
        VariableKind::Constant
    } else {
        VariableKind::Variable
    };
    let header = header_for(SymbolKind::Variable, name, capture, ctx, &helpers);
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
    let helpers = JsHelpers;
    let Some(name) = definition_name(capture.node, ctx.source) else {
        return;
    };
    let header = header_for(SymbolKind::TypeAlias, name, capture, ctx, &helpers);
    let generics = helpers.extract_generics(capture.node, ctx.source);
    let mut alias = TypeAlias::new(header).with_generics(generics);
    if let Some(expr) = capture
        .node
        .child_by_field_name("value")
        .and_then(|n| n.utf8_text(ctx.source.as_bytes()).ok())
    {
        alias = alias.with_type_expression(expr);
    }
    builder.add_type_alias(alias);
}

struct ImportEntry {
    name: String,
    original_name: Option<String>,
    is_wildcard: bool,
    is_default: bool,
}

fn collect_import_clause(clause: Node, source: &str, out: &mut Vec<ImportEntry>) {
    let text = |n: Node| n.utf8_text(source.as_bytes()).unwrap_or_default().to_string();
    if clause.kind() == "identifier" {
        out.push(ImportEntry {
            name: text(clause),
            original_name: None,
            is_wildcard: false,
            is_default: true,
        });
        return;
    }
    let mut cursor = clause.walk();
    for child in clause.named_children(&mut cursor) {
        match child.kind() {
            "identifier" => out.push(ImportEntry {
                name: text(child),
                original_name: None,
                is_wildcard: false,
                is_default: true,
            }),
            "namespace_import" => {
                if let Some(name) = child.named_child(0) {
                    out.push(ImportEntry {
                        name: text(name),
                        original_name: None,
                        is_wildcard: true,
                        is_default: false,
                    });
                }
            }
            "named_imports" => {
                let mut inner = child.walk();
                for spec in child.named_children(&mut inner) {
                    if spec.kind() != "import_specifier" {
                        continue;
                    }
                    let Some(name_node) = spec.child_by_field_name("name") else {
                        continue;
                    };
                    let alias = spec.child_by_field_name("alias").map(text);
                    out.push(ImportEntry {
                        name: alias.clone().unwrap_or_else(|| text(name_node)),
                        original_name: alias.map(|_| text(name_node)),
                        is_wildcard: false,
                        is_default: false,
                    });
                }
            }
            _ => {}
        }
    }
}

fn collect_export_clause(node: Node, source: &str, out: &mut Vec<ImportEntry>) {
    let text = |n: Node| n.utf8_text(source.as_bytes()).unwrap_or_default().to_string();
    let mut cursor = node.walk();
    let mut has_export_clause = false;
    let mut has_star = false;
    for child in node.children(&mut cursor) {
        if child.kind() == "export_clause" {
            has_export_clause = true;
            let mut inner = child.walk();
            for spec in child.named_children(&mut inner) {
                if spec.kind() != "export_specifier" {
                    continue;
                }
                let Some(name_node) = spec.child_by_field_name("name") else {
                    continue;
                };
                let alias = spec.child_by_field_name("alias").map(text);
                let is_default = text(name_node) == "default";
                out.push(ImportEntry {
                    name: alias.clone().unwrap_or_else(|| text(name_node)),
                    original_name: alias.map(|_| text(name_node)),
                    is_wildcard: false,
                    is_default,
                });
            }
        } else if child.kind() == "*" {
            has_star = true;
        }
    }
    // `export * from "mod"` or `export * as ns from "mod"`: re-export
    // everything (or everything under a namespace alias) from the source
    // module. Neither shape carries an `export_clause`.
    if has_star && !has_export_clause {
        let alias = node.child_by_field_name("alias").map(text);
        out.push(ImportEntry {
            name: alias.unwrap_or_else(|| "*".to_string()),
            original_name: None,
            is_wildcard: true,
            is_default: false,
        });
    }
}

fn handle_import(capture: &Capture, builder: &mut DefinitionBuilder, ctx: &ProcessingContext) {
    let helpers = JsHelpers;
    let Some(path) = helpers.extract_import_path(capture.node, ctx.source) else {
        // A local `export { a, b }`/`export const x = 1` with no module
        // source is not an import; the wrapped declaration (if any) already
        // registered itself and picked up `is_exported` from its own parent
        // check.
        return;
    };

    let mut entries = Vec::new();
    match capture.node.kind() {
        "import_statement" => {
            let clause = capture
                .node
                .children(&mut capture.node.walk())
                .find(|c| c.kind() == "import_clause");
            if let Some(clause) = clause {
                collect_import_clause(clause, ctx.source, &mut entries);
            }
            // A bare `import "./side-effect";` has no clause and fans out to
            // nothing -- it is executed for effect, not bound to a name.
        }
        "export_statement" => collect_export_clause(capture.node, ctx.source, &mut entries),
        _ => return,
    }

    let is_export = capture.node.kind() == "export_statement";
    for entry in entries {
        let location = capture.location.clone();
        let display_name = if entry.is_wildcard {
            format!("{}::*", path)
        } else {
            entry.name.clone()
        };
        let id = symbol(SymbolKind::Import, &display_name, &location);
        let scope = ctx.scopes.containing_scope(&location);
        let mut header = DefinitionHeader::new(id, display_name.as_str(), location, scope);
        if is_export {
            header = header.with_export_metadata(ExportMetadata::new(ExportKind::ReExport));
        }
        let import_kind = if entry.is_wildcard {
            ImportKind::Namespace
        } else if entry.is_default {
            ImportKind::Default
        } else {
            ImportKind::Named
        };
        let mut import = Import::new(header, path.as_str(), import_kind);
        if let Some(original) = entry.original_name {
            import = import.with_original_name(original);
        }
        builder.add_import(import);
    }
}

fn handle_function(capture: &Capture, builder: &mut DefinitionBuilder, ctx: &ProcessingContext) {
    let helpers = JsHelpers;
    let Some(name) = definition_name(capture.node, ctx.source) else {
        return;
    };
    let header = header_for(SymbolKind::Function, name, capture, ctx, &helpers);
    let body_scope = ctx.scopes.body_scope_for(name, &capture.location);
    let mut function = Function::new(header, body_scope);
    function.generics = helpers.extract_generics(capture.node, ctx.source);
    function.return_type = helpers.extract_return_type(capture.node, ctx.source);
    builder.add_function(function);
}

fn handle_method(capture: &Capture, builder: &mut DefinitionBuilder, ctx: &ProcessingContext) {
    let helpers = JsHelpers;
    let Some(name) = definition_name(capture.node, ctx.source) else {
        return;
    };
    let location = capture.location.clone();
    let is_signature = matches!(capture.node.kind(), "method_signature" | "abstract_method_signature");
    let is_constructor = !is_signature && name == "constructor";

    if is_constructor {
        let Some(class_id) = helpers.find_containing_class(capture.node, ctx.file_path, ctx.source) else {
            return;
        };
        let id = symbol(SymbolKind::Constructor, name, &location);
        let scope = ctx.scopes.containing_scope(&location);
        let body_scope = ctx.scopes.body_scope_for(name, &location);
        let mut ctor = Constructor::new(DefinitionHeader::new(id, name, location, scope), body_scope);
        ctor.access_modifier = helpers.accessibility_modifier(capture.node, ctx.source);
        builder.add_constructor_to_class(&class_id, ctor);
        return;
    }

    let id = symbol(SymbolKind::Method, name, &location);
    let scope = ctx.scopes.containing_scope(&location);
    let body_scope = ctx.scopes.body_scope_for(name, &location);
    let mut method = Method::new(DefinitionHeader::new(id, name, location, scope), body_scope);
    method.generics = helpers.extract_generics(capture.node, ctx.source);
    method.return_type = helpers.extract_return_type(capture.node, ctx.source);
    method.async_ = helpers.is_async(capture.node);
    method.static_ = helpers.is_associated_function(capture.node);
    method.abstract_ = is_signature;
    method.access_modifier = helpers.accessibility_modifier(capture.node, ctx.source);

    if let Some(class_id) = helpers.find_containing_class(capture.node, ctx.file_path, ctx.source) {
        builder.add_method_to_class(&class_id, method);
        return;
    }
    if let Some(interface_id) = helpers.find_containing_interface(capture.node, ctx.file_path, ctx.source) {
        builder.add_method_signature_to_interface(&interface_id, method);
    }
}

fn handle_property(capture: &Capture, builder: &mut DefinitionBuilder, ctx: &ProcessingContext) {
    let helpers = JsHelpers;
    let Some(name) = definition_name(capture.node, ctx.source) else {
        return;
    };
    let location = capture.location.clone();
    let id = symbol(SymbolKind::Property, name, &location);

    let is_optional = capture
        .node
        .children(&mut capture.node.walk())
        .any(|c| c.kind() == "?");
    let readonly = capture
        .node
        .children(&mut capture.node.walk())
        .any(|c| c.kind() == "readonly");
    let static_ = helpers.is_associated_function(capture.node);

    let mut property = Property::new(id, name, location)
        .with_optional(is_optional)
        .with_readonly(readonly)
        .with_static(static_);
    if let Some(ty) = helpers.extract_type_annotation(capture.node, ctx.source) {
        property = property.with_type(ty);
    }
    if let Some(value) = capture
        .node
        .child_by_field_name("value")
        .and_then(|n| n.utf8_text(ctx.source.as_bytes()).ok())
    {
        property = property.with_initial_value(value);
    }

    if let Some(class_id) = helpers.find_containing_class(capture.node, ctx.file_path, ctx.source) {
        builder.add_property_to_class(&class_id, property);
        return;
    }
    if let Some(interface_id) = helpers.find_containing_interface(capture.node, ctx.file_path, ctx.source) {
        builder.add_property_signature_to_interface(&interface_id, property);
    }
}

fn handle_enum_member(capture: &Capture, builder: &mut DefinitionBuilder, ctx: &ProcessingContext) {
    let helpers = JsHelpers;
    let Some(enum_id) = helpers.find_containing_enum(capture.node, ctx.file_path, ctx.source) else {
        return;
    };
    let (name, value_node) = if capture.node.kind() == "enum_assignment" {
        let Some(name_node) = capture.node.child_by_field_name("name") else {
            return;
        };
        (
            name_node.utf8_text(ctx.source.as_bytes()).unwrap_or_default(),
            capture.node.child_by_field_name("value"),
        )
    } else {
        (capture.text.as_str(), None)
    };
    let location = capture.location.clone();
    let id = symbol(SymbolKind::EnumMember, name, &location);
    let mut member = EnumMember::new(id, name, location);
    if let Some(value) = value_node.and_then(|n| n.utf8_text(ctx.source.as_bytes()).ok()) {
        let trimmed = value.trim();
        if let Ok(n) = trimmed.parse::<f64>() {
            member = member.with_value(EnumMemberValue::Number(n));
        } else {
            member = member.with_value(EnumMemberValue::String(trimmed.trim_matches(|c| c == '"' || c == '\'').to_string()));
        }
    }
    builder.add_enum_member(&enum_id, member);
}

fn handle_parameter(capture: &Capture, builder: &mut DefinitionBuilder, ctx: &ProcessingContext) {
    let helpers = JsHelpers;
    let Some(callable_id) = helpers.find_containing_callable(capture.node, ctx.file_path, ctx.source) else {
        return;
    };
    let location = capture.location.clone();

    let (name_node, is_optional) = match capture.node.kind() {
        "required_parameter" => (capture.node.child_by_field_name("pattern"), false),
        "optional_parameter" => (capture.node.child_by_field_name("pattern"), true),
        _ => (Some(capture.node), false),
    };
    let Some(name_node) = name_node else {
        return;
    };
    let Ok(name) = name_node.utf8_text(ctx.source.as_bytes()) else {
        return;
    };

    let id = symbol(SymbolKind::Parameter, name, &location);
    let mut param = Parameter::new(id, name, location).with_optional(is_optional);
    if let Some(ty) = helpers.extract_parameter_type(capture.node, ctx.source) {
        param = param.with_type(ty);
    }
    if let Some(default) = helpers.extract_default_value(capture.node, ctx.source) {
        param = param.with_default_value(default);
    }
    let is_parameter_property = capture
        .node
        .children(&mut capture.node.walk())
        .any(|c| matches!(c.kind(), "public" | "private" | "protected" | "readonly"));
    param = param.with_parameter_property(is_parameter_property);
    builder.add_parameter_to_callable(&callable_id, param);
}

fn handle_decorator(capture: &Capture, builder: &mut DefinitionBuilder, ctx: &ProcessingContext) {
    let helpers = JsHelpers;
    let Some(target_id) = helpers.find_decorator_target(capture.node, ctx.file_path, ctx.source) else {
        return;
    };
    let inner = capture
        .node
        .named_child(0)
        .map(|n| n.utf8_text(ctx.source.as_bytes()).unwrap_or_default())
        .unwrap_or_default();
    let (name, arguments) = match inner.split_once('(') {
        Some((name, rest)) => (name.to_string(), Some(vec![rest.trim_end_matches(')').to_string()])),
        None => (inner.to_string(), None),
    };
    let location = capture.location.clone();
    let id = symbol(SymbolKind::Decorator, &name, &location);
    let mut decorator = DecoratorRecord::new(id, name, location);
    if let Some(args) = arguments {
        decorator = decorator.with_arguments(args);
    }
    builder.add_decorator_to_target(&target_id, decorator);
}

#[cfg(test)]
mod tests {
    use super::*;
    use semindex_core::adapter::Capture as AdapterCapture;
    use streaming_iterator::StreamingIterator;
    use tree_sitter::{Parser, Query, QueryCursor};

    fn run_ts(source: &str) -> semindex_core::IndexOutcome {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
            .unwrap();
        let tree = parser.parse(source, None).unwrap();
        let query_src = include_str!("queries/definitions.scm");
        let query = Query::new(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(), query_src).unwrap();
        run_query(query, tree, source)
    }

    /// Plain JavaScript source, parsed and queried against the TypeScript
    /// grammar: every query pattern (including TS-only node kinds like
    /// `interface_declaration`) must compile against whichever grammar
    /// actually runs it, and the TypeScript grammar is a strict syntactic
    /// superset of JavaScript, so this is the only grammar one shared query
    /// file can target for both. `semindex` (the root crate) makes the same
    /// choice for `.js`/`.jsx` files at the crate boundary.
    fn run_js(source: &str) -> semindex_core::IndexOutcome {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
            .unwrap();
        let tree = parser.parse(source, None).unwrap();
        let query_src = include_str!("queries/definitions.scm");
        let query = Query::new(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(), query_src).unwrap();
        run_query(query, tree, source)
    }

    fn run_query(query: Query, tree: tree_sitter::Tree, source: &str) -> semindex_core::IndexOutcome {
        let mut cursor = QueryCursor::new();
        let mut captures = Vec::new();
        let mut matches = cursor.matches(&query, tree.root_node(), source.as_bytes());
        while let Some(m) = matches.next() {
            for qc in m.captures {
                let name = query.capture_names()[qc.index as usize].to_string();
                let node = qc.node;
                let text = node.utf8_text(source.as_bytes()).unwrap_or_default().to_string();
                let location = node_to_location(&node, "f.ts");
                captures.push(AdapterCapture {
                    name,
                    node,
                    text,
                    location,
                });
            }
        }
        let adapter = JsAdapter::default();
        semindex_core::indexer::index(&adapter, captures, "f.ts", source).unwrap()
    }

    #[test]
    fn class_with_constructor_and_method() {
        let source = "export class Point {\n  x: number;\n  constructor(x: number) { this.x = x; }\n  get(): number { return this.x; }\n}\n";
        let outcome = run_ts(source);
        assert_eq!(outcome.result.classes.len(), 1);
        let class = outcome.result.classes.values().next().unwrap();
        assert!(class.header.is_exported);
        assert_eq!(class.properties.len(), 1);
        assert_eq!(class.constructors.len(), 1);
        assert_eq!(class.constructors[0].parameters.len(), 1);
        assert_eq!(class.methods.len(), 1);
        assert_eq!(class.methods[0].header.name, "get");
        assert_eq!(class.methods[0].return_type.as_deref(), Some("number"));
    }

    #[test]
    fn interface_registers_parallel_type_alias() {
        let source = "export interface Shape {\n  area(): number;\n}\n";
        let outcome = run_ts(source);
        assert_eq!(outcome.result.interfaces.len(), 1);
        assert_eq!(outcome.result.type_aliases.len(), 1);
        let interface = outcome.result.interfaces.values().next().unwrap();
        assert_eq!(interface.methods.len(), 1);
        assert!(interface.methods[0].abstract_);
    }

    #[test]
    fn arrow_function_bound_to_const_is_a_function_not_a_variable() {
        let source = "export const add = (a: number, b: number): number => a + b;\n";
        let outcome = run_ts(source);
        assert_eq!(outcome.result.functions.len(), 1);
        assert_eq!(outcome.result.variables.len(), 0);
        let function = outcome.result.functions.values().next().unwrap();
        assert_eq!(function.parameters.len(), 2);
        assert_eq!(function.return_type.as_deref(), Some("number"));
    }

    #[test]
    fn enum_members_in_declared_order() {
        let source = "export enum Color { Red, Green, Blue }\n";
        let outcome = run_ts(source);
        let e = outcome.result.enums.values().next().unwrap();
        let names: Vec<_> = e.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Red", "Green", "Blue"]);
    }

    #[test]
    fn named_import_with_alias() {
        let source = "import { readFile as rf } from \"fs\";\n";
        let outcome = run_ts(source);
        assert_eq!(outcome.result.imports.len(), 1);
        let import = outcome.result.imports.values().next().unwrap();
        assert_eq!(import.header.name, "rf");
        assert_eq!(import.original_name.as_deref(), Some("readFile"));
        assert_eq!(import.import_path, "fs");
    }

    #[test]
    fn re_export_from_another_module_is_an_import(){
        let source = "export { helper } from \"./util\";\n";
        let outcome = run_ts(source);
        assert_eq!(outcome.result.imports.len(), 1);
        let import = outcome.result.imports.values().next().unwrap();
        assert_eq!(import.header.name, "helper");
        assert!(import.header.is_exported);
    }

    #[test]
    fn plain_javascript_function_declaration() {
        let source = "function helper(x) { return x; }\n";
        let outcome = run_js(source);
        assert_eq!(outcome.result.functions.len(), 1);
        let function = outcome.result.functions.values().next().unwrap();
        assert_eq!(function.parameters.len(), 1);
        assert_eq!(function.parameters[0].name, "x");
    }

    #[test]
    fn unexported_class_is_not_exported() {
        let source = "class Hidden {}\n";
        let outcome = run_ts(source);
        let class = outcome.result.classes.values().next().unwrap();
        assert!(!class.header.is_exported);
    }
}
