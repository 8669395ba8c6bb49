//! Python language adapter for semindex.
//!
//! Implements the capture dispatch table, AST-shape helpers and metadata
//! extractors for `tree-sitter-python`, per spec.md §4.4's Python edge
//! cases: a class subclassing `Enum`/`IntEnum`/`Flag`/`IntFlag` registers as
//! an enum (its body assignments become enum members, not properties); a
//! class subclassing `typing.Protocol` registers as an interface; `__init__`
//! is a constructor; `@staticmethod` sets `static_`, `@classmethod` sets
//! `abstract_` (the two are independent, not folded into one flag);
//! `@abstractmethod` also sets `abstract_`; single- and
//! double-underscore-prefixed names are not exported.

pub mod helpers;

use helpers::PythonHelpers;
use semindex_core::adapter::{
    AstShapeHelpers, Capture, DispatchTable, LanguageAdapter, MetadataExtractors, ProcessingContext,
};
use semindex_core::definition::{
    Class, Constructor, DecoratorRecord, DefinitionHeader, Enum, EnumMember, EnumMemberValue, Function,
    Import, ImportKind, Interface, Method, Parameter, Property, TypeAlias, Variable, VariableKind,
};
use semindex_core::{node_to_location, symbol, DefinitionBuilder, SymbolKind};
use std::collections::HashMap;
use tree_sitter::Node;

pub struct PythonAdapter {
    dispatch: DispatchTable,
    helpers: PythonHelpers,
}

impl Default for PythonAdapter {
    fn default() -> Self {
        PythonAdapter {
            dispatch: build_dispatch_table(),
            helpers: PythonHelpers,
        }
    }
}

impl LanguageAdapter for PythonAdapter {
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
    table.insert("definition.type_alias", Box::new(handle_type_alias));
    table.insert("definition.variable", Box::new(handle_variable));
    table.insert("definition.property", Box::new(handle_property));
    table.insert("import.named", Box::new(handle_import));
    table.insert("definition.function", Box::new(handle_function));
    table.insert("definition.method", Box::new(handle_method));
    table.insert("definition.parameter", Box::new(handle_parameter));
    table.insert("definition.decorator", Box::new(handle_decorator));
    table
}

fn name_field<'a>(node: Node, source: &'a str) -> Option<&'a str> {
    node.child_by_field_name("name")
        .and_then(|n| n.utf8_text(source.as_bytes()).ok())
}

fn is_exported(vis: semindex_core::adapter::Visibility) -> bool {
    matches!(vis, semindex_core::adapter::Visibility::FileExport)
}

/// Same name-convention rule `PythonHelpers::extract_visibility` applies to
/// a `class_definition`/`function_definition`'s `name` field, applied
/// directly to a module-level assignment's target name (an `assignment`
/// node has no `name` field for the helper to read).
fn visibility_by_name(name: &str) -> semindex_core::adapter::Visibility {
    use semindex_core::adapter::Visibility;
    if name.starts_with("__") && !name.ends_with("__") {
        Visibility::Private
    } else if name.starts_with('_') {
        Visibility::FilePrivate
    } else {
        Visibility::FileExport
    }
}

fn handle_class(capture: &Capture, builder: &mut DefinitionBuilder, ctx: &ProcessingContext) {
    let helpers = PythonHelpers;
    let Some(name) = name_field(capture.node, ctx.source) else {
        return;
    };
    let location = capture.location.clone();
    let scope = ctx.scopes.containing_scope(&location);
    let vis = helpers.extract_visibility(capture.node, ctx.source);
    let docstring = helpers.leading_docstring(capture.node, ctx.source);

    if helpers.is_enum_subclass(capture.node, ctx.source) {
        let id = symbol(SymbolKind::Enum, name, &location);
        let mut header = DefinitionHeader::new(id, name, location, scope).with_exported(is_exported(vis));
        if let Some(doc) = docstring {
            header = header.with_docstring(doc);
        }
        builder.add_enum(Enum::new(header));
        return;
    }

    if helpers.is_protocol_subclass(capture.node, ctx.source) {
        let id = symbol(SymbolKind::Interface, name, &location);
        let mut header = DefinitionHeader::new(id, name, location, scope).with_exported(is_exported(vis));
        if let Some(doc) = docstring {
            header = header.with_docstring(doc);
        }
        let extends = helpers.extract_extends(capture.node, ctx.source);
        builder.add_interface(Interface::new(header).with_extends(extends));
        return;
    }

    let id = symbol(SymbolKind::Class, name, &location);
    let mut header = DefinitionHeader::new(id, name, location, scope).with_exported(is_exported(vis));
    if let Some(doc) = docstring {
        header = header.with_docstring(doc);
    }
    let extends = helpers.extract_extends(capture.node, ctx.source);
    builder.add_class(Class::new(header).with_extends(extends));
}

fn handle_type_alias(capture: &Capture, builder: &mut DefinitionBuilder, ctx: &ProcessingContext) {
    let helpers = PythonHelpers;
    let Some(name) = name_field(capture.node, ctx.source) else {
        return;
    };
    let location = capture.location.clone();
    let id = symbol(SymbolKind::TypeAlias, name, &location);
    let scope = ctx.scopes.containing_scope(&location);
    let vis = helpers.extract_visibility(capture.node, ctx.source);
    let header = DefinitionHeader::new(id, name, location, scope).with_exported(is_exported(vis));
    let mut alias = TypeAlias::new(header);
    if let Some(expr) = capture
        .node
        .child_by_field_name("value")
        .and_then(|n| n.utf8_text(ctx.source.as_bytes()).ok())
    {
        alias = alias.with_type_expression(expr);
    }
    builder.add_type_alias(alias);
}

fn classify_name(name: &str) -> VariableKind {
    // ALL_CAPS containing an underscore is Python's module-level constant
    // convention (spec: `PI = 3.14` stays a plain variable, no underscore);
    // anything else is a plain variable.
    let all_caps = !name.is_empty() && name.chars().all(|c| c.is_ascii_uppercase() || c == '_' || c.is_ascii_digit());
    if all_caps && name.contains('_') {
        VariableKind::Constant
    } else {
        VariableKind::Variable
    }
}

fn handle_variable(capture: &Capture, builder: &mut DefinitionBuilder, ctx: &ProcessingContext) {
    let helpers = PythonHelpers;
    let Some(name) = capture
        .node
        .child_by_field_name("left")
        .and_then(|n| n.utf8_text(ctx.source.as_bytes()).ok())
    else {
        return;
    };
    let location = capture.location.clone();
    let id = symbol(SymbolKind::Variable, name, &location);
    let scope = ctx.scopes.containing_scope(&location);
    let vis = visibility_by_name(name);
    let header = DefinitionHeader::new(id, name, location, scope).with_exported(is_exported(vis));
    let mut variable = Variable::new(header, classify_name(name));
    if let Some(ty) = helpers.extract_type_annotation(capture.node, ctx.source) {
        variable = variable.with_type(ty);
    }
    if let Some(value) = capture
        .node
        .child_by_field_name("right")
        .and_then(|n| n.utf8_text(ctx.source.as_bytes()).ok())
    {
        variable = variable.with_initial_value(value);
    }
    builder.add_variable(variable);
}

fn handle_property(capture: &Capture, builder: &mut DefinitionBuilder, ctx: &ProcessingContext) {
    let helpers = PythonHelpers;
    let Some(name) = capture
        .node
        .child_by_field_name("left")
        .and_then(|n| n.utf8_text(ctx.source.as_bytes()).ok())
    else {
        return;
    };
    let location = capture.location.clone();
    let value_text = capture
        .node
        .child_by_field_name("right")
        .and_then(|n| n.utf8_text(ctx.source.as_bytes()).ok());

    if let Some(enum_id) = helpers.find_containing_enum(capture.node, ctx.file_path, ctx.source) {
        let id = symbol(SymbolKind::EnumMember, name, &location);
        let mut member = EnumMember::new(id, name, location);
        if let Some(value) = value_text {
            let trimmed = value.trim();
            if let Ok(n) = trimmed.parse::<f64>() {
                member = member.with_value(EnumMemberValue::Number(n));
            } else {
                member = member.with_value(EnumMemberValue::String(
                    trimmed.trim_matches(|c| c == '"' || c == '\'').to_string(),
                ));
            }
        }
        builder.add_enum_member(&enum_id, member);
        return;
    }

    let Some(class_id) = helpers.find_containing_class(capture.node, ctx.file_path, ctx.source) else {
        return;
    };
    let id = symbol(SymbolKind::Property, name, &location);
    let mut property = Property::new(id, name, location);
    if let Some(ty) = helpers.extract_type_annotation(capture.node, ctx.source) {
        property = property.with_type(ty);
    }
    if let Some(value) = value_text {
        property = property.with_initial_value(value);
    }
    builder.add_property_to_class(&class_id, property);
}

struct ImportEntry {
    name: String,
    original_name: Option<String>,
    is_wildcard: bool,
}

fn collect_dotted_names(node: Node, source: &str, out: &mut Vec<ImportEntry>) {
    let text = |n: Node| n.utf8_text(source.as_bytes()).unwrap_or_default().to_string();
    match node.kind() {
        "dotted_name" => out.push(ImportEntry {
            name: text(node),
            original_name: None,
            is_wildcard: false,
        }),
        "aliased_import" => {
            let Some(name_node) = node.child_by_field_name("name") else {
                return;
            };
            let Some(alias_node) = node.child_by_field_name("alias") else {
                return;
            };
            out.push(ImportEntry {
                name: text(alias_node),
                original_name: Some(text(name_node)),
                is_wildcard: false,
            });
        }
        "wildcard_import" => out.push(ImportEntry {
            name: "*".to_string(),
            original_name: None,
            is_wildcard: true,
        }),
        _ => {}
    }
}

fn handle_import(capture: &Capture, builder: &mut DefinitionBuilder, ctx: &ProcessingContext) {
    let helpers = PythonHelpers;
    // `import_from_statement` names a module (`from os import path`); a
    // bare `import_statement` has no `module_name` field at all -- each
    // dotted name it lists *is* its own module path.
    let from_module = helpers.extract_import_path(capture.node, ctx.source);

    let mut entries = Vec::new();
    match capture.node.kind() {
        "import_statement" | "import_from_statement" => {
            let mut cursor = capture.node.walk();
            for child in capture.node.children_by_field_name("name", &mut cursor) {
                collect_dotted_names(child, ctx.source, &mut entries);
            }
        }
        _ => return,
    }

    for entry in entries {
        let location = capture.location.clone();
        // For `from x import y`, `entry.name` is the bound local name and
        // `from_module` is the module path. For bare `import a.b as c`,
        // there is no `from_module`: `entry.original_name` (the dotted
        // path) is the module path, and `entry.name` (set to the alias in
        // that case by `collect_dotted_names`) is the bound local name.
        let module_path = from_module
            .clone()
            .or_else(|| entry.original_name.clone())
            .unwrap_or_else(|| entry.name.clone());
        let display_name = if entry.is_wildcard {
            format!("{}::*", module_path)
        } else {
            entry.name.clone()
        };
        let id = symbol(SymbolKind::Import, &display_name, &location);
        let scope = ctx.scopes.containing_scope(&location);
        let header = DefinitionHeader::new(id, display_name.as_str(), location, scope);
        let import_kind = if entry.is_wildcard {
            ImportKind::Namespace
        } else {
            ImportKind::Named
        };
        let mut import = Import::new(header, module_path.as_str(), import_kind);
        if from_module.is_some() {
            if let Some(original) = entry.original_name {
                import = import.with_original_name(original);
            }
        }
        builder.add_import(import);
    }
}

fn handle_function(capture: &Capture, builder: &mut DefinitionBuilder, ctx: &ProcessingContext) {
    let helpers = PythonHelpers;
    if helpers.is_method_context(capture.node) {
        // Registered through `definition.method` instead (§4.4).
        return;
    }
    let Some(name) = name_field(capture.node, ctx.source) else {
        return;
    };
    let location = capture.location.clone();
    let id = symbol(SymbolKind::Function, name, &location);
    let scope = ctx.scopes.containing_scope(&location);
    let vis = helpers.extract_visibility(capture.node, ctx.source);
    let mut header = DefinitionHeader::new(id, name, location, scope).with_exported(is_exported(vis));
    if let Some(doc) = helpers.leading_docstring(capture.node, ctx.source) {
        header = header.with_docstring(doc);
    }
    let body_scope = ctx.scopes.body_scope_for(name, &capture.location);
    let mut function = Function::new(header, body_scope);
    function.return_type = helpers.extract_return_type(capture.node, ctx.source);
    builder.add_function(function);
}

fn handle_method(capture: &Capture, builder: &mut DefinitionBuilder, ctx: &ProcessingContext) {
    let helpers = PythonHelpers;
    let Some(name) = name_field(capture.node, ctx.source) else {
        return;
    };
    let location = capture.location.clone();
    let body_scope = ctx.scopes.body_scope_for(name, &location);

    if name == "__init__" {
        if let Some(class_id) = helpers.find_containing_class(capture.node, ctx.file_path, ctx.source) {
            let id = symbol(SymbolKind::Constructor, name, &location);
            let scope = ctx.scopes.containing_scope(&location);
            let ctor = Constructor::new(DefinitionHeader::new(id, name, location, scope), body_scope);
            builder.add_constructor_to_class(&class_id, ctor);
            return;
        }
    }

    let id = symbol(SymbolKind::Method, name, &location);
    let scope = ctx.scopes.containing_scope(&location);
    let mut method = Method::new(DefinitionHeader::new(id, name, location, scope), body_scope);
    method.return_type = helpers.extract_return_type(capture.node, ctx.source);
    method.async_ = helpers.is_async(capture.node);
    method.static_ = helpers.has_decorator(capture.node, "staticmethod", ctx.source);
    method.abstract_ = helpers.has_decorator(capture.node, "classmethod", ctx.source)
        || helpers.has_decorator(capture.node, "abstractmethod", ctx.source);

    if let Some(class_id) = helpers.find_containing_class(capture.node, ctx.file_path, ctx.source) {
        builder.add_method_to_class(&class_id, method);
        return;
    }
    if let Some(interface_id) = helpers.find_containing_interface(capture.node, ctx.file_path, ctx.source) {
        builder.add_method_signature_to_interface(&interface_id, method);
    }
}

fn handle_parameter(capture: &Capture, builder: &mut DefinitionBuilder, ctx: &ProcessingContext) {
    let helpers = PythonHelpers;
    let Some(callable_id) = helpers.find_containing_callable(capture.node, ctx.file_path, ctx.source) else {
        return;
    };
    let location = capture.location.clone();

    let (name, is_splat) = match capture.node.kind() {
        "identifier" => (capture.node.utf8_text(ctx.source.as_bytes()).unwrap_or("_"), false),
        "list_splat_pattern" | "dictionary_splat_pattern" => (
            capture
                .node
                .named_child(0)
                .and_then(|n| n.utf8_text(ctx.source.as_bytes()).ok())
                .unwrap_or("_"),
            true,
        ),
        // `typed_parameter` (`x: int`) has no `name` field -- the
        // identifier is its first named child, positional before `:`.
        "typed_parameter" => (
            capture
                .node
                .named_child(0)
                .and_then(|n| n.utf8_text(ctx.source.as_bytes()).ok())
                .unwrap_or("_"),
            false,
        ),
        _ => (
            capture
                .node
                .child_by_field_name("name")
                .and_then(|n| n.utf8_text(ctx.source.as_bytes()).ok())
                .unwrap_or("_"),
            false,
        ),
    };
    let prefixed_name = match capture.node.kind() {
        "list_splat_pattern" => format!("*{name}"),
        "dictionary_splat_pattern" => format!("**{name}"),
        _ => name.to_string(),
    };

    let id = symbol(SymbolKind::Parameter, &prefixed_name, &location);
    let mut param = Parameter::new(id, prefixed_name, location);
    if !is_splat {
        if let Some(ty) = helpers.extract_parameter_type(capture.node, ctx.source) {
            param = param.with_type(ty);
        }
        if let Some(default) = helpers.extract_default_value(capture.node, ctx.source) {
            param = param.with_default_value(default);
        }
    }
    builder.add_parameter_to_callable(&callable_id, param);
}

fn handle_decorator(capture: &Capture, builder: &mut DefinitionBuilder, ctx: &ProcessingContext) {
    let helpers = PythonHelpers;
    let Some(target_id) = helpers.find_decorator_target(capture.node, ctx.file_path, ctx.source) else {
        return;
    };
    let Some(inner) = capture.node.named_child(0) else {
        return;
    };
    let (name_node, arguments) = if inner.kind() == "call" {
        (
            inner.child_by_field_name("function"),
            inner
                .child_by_field_name("arguments")
                .map(|args| vec![args.utf8_text(ctx.source.as_bytes()).unwrap_or_default().to_string()]),
        )
    } else {
        (Some(inner), None)
    };
    let Some(name) = name_node.and_then(|n| n.utf8_text(ctx.source.as_bytes()).ok()) else {
        return;
    };
    let location = capture.location.clone();
    let id = symbol(SymbolKind::Decorator, name, &location);
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

    fn run(source: &str) -> semindex_core::IndexOutcome {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_python::LANGUAGE.into()).unwrap();
        let tree = parser.parse(source, None).unwrap();
        let query_src = include_str!("queries/definitions.scm");
        let query = Query::new(&tree_sitter_python::LANGUAGE.into(), query_src).unwrap();
        let mut cursor = QueryCursor::new();
        let mut captures = Vec::new();
        let mut matches = cursor.matches(&query, tree.root_node(), source.as_bytes());
        while let Some(m) = matches.next() {
            for qc in m.captures {
                let name = query.capture_names()[qc.index as usize].to_string();
                let node = qc.node;
                let text = node.utf8_text(source.as_bytes()).unwrap_or_default().to_string();
                let location = node_to_location(&node, "m.py");
                captures.push(AdapterCapture {
                    name,
                    node,
                    text,
                    location,
                });
            }
        }
        let adapter = PythonAdapter::default();
        semindex_core::indexer::index(&adapter, captures, "m.py", source).unwrap()
    }

    #[test]
    fn class_with_init_and_method() {
        let source = "class Point:\n    def __init__(self, x):\n        self.x = x\n\n    def get(self):\n        return self.x\n";
        let outcome = run(source);
        assert_eq!(outcome.result.classes.len(), 1);
        let class = outcome.result.classes.values().next().unwrap();
        assert!(class.header.is_exported);
        assert_eq!(class.constructors.len(), 1);
        assert_eq!(class.constructors[0].parameters.len(), 2);
        assert_eq!(class.methods.len(), 1);
        assert_eq!(class.methods[0].header.name, "get");
    }

    #[test]
    fn free_function_is_not_duplicated_as_method() {
        let source = "def helper(x):\n    return x\n";
        let outcome = run(source);
        assert_eq!(outcome.result.functions.len(), 1);
        let function = outcome.result.functions.values().next().unwrap();
        assert_eq!(function.parameters.len(), 1);
    }

    #[test]
    fn enum_subclass_members_become_enum_members() {
        let source = "from enum import Enum\n\nclass Color(Enum):\n    RED = 1\n    GREEN = 2\n";
        let outcome = run(source);
        assert_eq!(outcome.result.enums.len(), 1);
        assert_eq!(outcome.result.classes.len(), 0);
        let e = outcome.result.enums.values().next().unwrap();
        let names: Vec<_> = e.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["RED", "GREEN"]);
    }

    #[test]
    fn protocol_subclass_is_an_interface() {
        let source = "from typing import Protocol\n\nclass Greeter(Protocol):\n    def greet(self) -> str:\n        ...\n";
        let outcome = run(source);
        assert_eq!(outcome.result.interfaces.len(), 1);
        assert_eq!(outcome.result.classes.len(), 0);
    }

    #[test]
    fn staticmethod_is_static_and_classmethod_is_abstract() {
        let source = "class Factory:\n    @staticmethod\n    def make():\n        pass\n\n    @classmethod\n    def create(cls):\n        pass\n";
        let outcome = run(source);
        let class = outcome.result.classes.values().next().unwrap();
        assert_eq!(class.methods.len(), 2);
        let make = class.methods.iter().find(|m| m.header.name == "make").unwrap();
        assert!(make.static_);
        assert!(!make.abstract_);
        let create = class.methods.iter().find(|m| m.header.name == "create").unwrap();
        assert!(!create.static_);
        assert!(create.abstract_);
    }

    #[test]
    fn leading_underscore_name_is_not_exported() {
        let source = "def _private():\n    pass\n";
        let outcome = run(source);
        let function = outcome.result.functions.values().next().unwrap();
        assert!(!function.header.is_exported);
    }

    #[test]
    fn from_import_with_alias() {
        let source = "from os import path as p\n";
        let outcome = run(source);
        assert_eq!(outcome.result.imports.len(), 1);
        let import = outcome.result.imports.values().next().unwrap();
        assert_eq!(import.header.name, "p");
        assert_eq!(import.original_name.as_deref(), Some("path"));
        assert_eq!(import.import_path, "os");
    }
}
