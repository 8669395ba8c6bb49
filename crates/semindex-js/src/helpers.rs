//! AST-shape helpers and metadata extractors shared by JavaScript,
//! TypeScript and TSX.
//!
//! One bundle covers all three grammars (SPEC_FULL.md §C): TSX is a strict
//! syntactic superset for the constructs this adapter cares about, and plain
//! JavaScript source parses identically whether read by the JS or the TS
//! grammar for every node kind this file inspects. JS/TS-only edge cases
//! (accessibility modifiers, `abstract`, `readonly`, parameter properties,
//! interfaces) simply never match against JS source, since the grammar never
//! produces those nodes for it.

use semindex_core::adapter::{AstShapeHelpers, MetadataExtractors, ReceiverKind, Visibility};
use semindex_core::definition::SymbolName;
use semindex_core::SymbolId;
use tree_sitter::Node;

#[derive(Debug, Default)]
pub struct JsHelpers;

fn ancestor_of_kind<'tree>(node: Node<'tree>, kinds: &[&str]) -> Option<Node<'tree>> {
    let mut current = node.parent();
    while let Some(n) = current {
        if kinds.contains(&n.kind()) {
            return Some(n);
        }
        current = n.parent();
    }
    None
}

fn text<'a>(node: Node<'a>, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or_default()
}

fn field_text<'a>(node: Node<'a>, field: &str, source: &'a str) -> Option<&'a str> {
    node.child_by_field_name(field)
        .and_then(|n| n.utf8_text(source.as_bytes()).ok())
}

fn has_child_of_kind(node: Node, kind: &str) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor).any(|c| c.kind() == kind)
}

fn mint_for_ancestor(ancestor: Node, file_path: &str, kind: semindex_core::SymbolKind, source: &str) -> Option<SymbolId> {
    let name = definition_name(ancestor, source)?;
    let location = semindex_core::node_to_location(&ancestor, file_path);
    Some(semindex_core::symbol(kind, name, &location))
}

/// The name of a definition node. Declarations carry their own `name` field;
/// an anonymous function/arrow/class *expression* assigned via `const foo =
/// ...` has none, so the name is read off the enclosing `variable_declarator`
/// instead.
pub fn definition_name<'a>(node: Node<'a>, source: &'a str) -> Option<&'a str> {
    if let Some(name) = field_text(node, "name", source) {
        return Some(name);
    }
    if let Some(parent) = node.parent() {
        if parent.kind() == "variable_declarator" {
            return field_text(parent, "name", source);
        }
    }
    None
}

impl JsHelpers {
    /// True for `function`/`arrow_function`/`class` values bound by a
    /// `variable_declarator` -- these register via `definition.function`/
    /// `definition.class` instead of also being offered as a plain variable.
    pub fn is_definition_value(&self, value: Node) -> bool {
        matches!(
            value.kind(),
            "function" | "function_expression" | "arrow_function" | "generator_function" | "class"
        )
    }

    /// The leading JSDoc block comment immediately preceding `node` (or its
    /// wrapping `export_statement`), if any.
    pub fn leading_docstring(&self, node: Node, source: &str) -> Option<String> {
        let anchor = if node.parent().map(|p| p.kind() == "export_statement").unwrap_or(false) {
            node.parent().unwrap()
        } else {
            node
        };
        let mut sibling = anchor.prev_sibling();
        while let Some(s) = sibling {
            if s.kind() == "comment" {
                let comment_text = text(s, source);
                if comment_text.starts_with("/**") {
                    return Some(comment_text.to_string());
                }
                return None;
            }
            if !s.is_extra() {
                return None;
            }
            sibling = s.prev_sibling();
        }
        None
    }

    /// Extract TS `extends_type_clause`/class `extends_clause` supertypes
    /// (used for both interface supertypes and a class's single base).
    pub fn extract_heritage(&self, node: Node, source: &str) -> Vec<SymbolName> {
        let mut names = Vec::new();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "extends_type_clause" => {
                    let mut inner = child.walk();
                    for ty in child.children(&mut inner) {
                        if ty.kind() == "type_identifier" || ty.kind() == "nested_type_identifier" {
                            names.push(text(ty, source).to_string());
                        }
                    }
                }
                "class_heritage" => {
                    let mut inner = child.walk();
                    for clause in child.children(&mut inner) {
                        if clause.kind() == "extends_clause" {
                            if let Some(value) = field_text(clause, "value", source) {
                                names.push(value.to_string());
                            }
                        }
                    }
                }
                _ => {}
            }
        }
        names
    }

    /// A class's `implements` list, read from its `class_heritage`'s
    /// `implements_clause` (TS-only).
    pub fn extract_implements(&self, node: Node, source: &str) -> Vec<SymbolName> {
        let mut names = Vec::new();
        let Some(heritage) = node.children(&mut node.walk()).find(|c| c.kind() == "class_heritage") else {
            return names;
        };
        let mut cursor = heritage.walk();
        for clause in heritage.children(&mut cursor) {
            if clause.kind() == "implements_clause" {
                let mut inner = clause.walk();
                for ty in clause.children(&mut inner) {
                    if ty.kind() == "type_identifier" || ty.kind() == "nested_type_identifier" {
                        names.push(text(ty, source).to_string());
                    }
                }
            }
        }
        names
    }

    pub fn accessibility_modifier(&self, node: Node, source: &str) -> Option<semindex_core::definition::AccessModifier> {
        use semindex_core::definition::AccessModifier;
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "accessibility_modifier" {
                return match text(child, source) {
                    "public" => Some(AccessModifier::Public),
                    "private" => Some(AccessModifier::Private),
                    "protected" => Some(AccessModifier::Protected),
                    _ => None,
                };
            }
        }
        None
    }
}

impl AstShapeHelpers for JsHelpers {
    fn find_containing_class(&self, node: Node, file_path: &str, source: &str) -> Option<SymbolId> {
        let ancestor = ancestor_of_kind(node, &["class_declaration"])?;
        mint_for_ancestor(ancestor, file_path, semindex_core::SymbolKind::Class, source)
    }

    fn find_containing_interface(&self, node: Node, file_path: &str, source: &str) -> Option<SymbolId> {
        let ancestor = ancestor_of_kind(node, &["interface_declaration"])?;
        mint_for_ancestor(ancestor, file_path, semindex_core::SymbolKind::Interface, source)
    }

    fn find_containing_enum(&self, node: Node, file_path: &str, source: &str) -> Option<SymbolId> {
        let ancestor = ancestor_of_kind(node, &["enum_declaration"])?;
        mint_for_ancestor(ancestor, file_path, semindex_core::SymbolKind::Enum, source)
    }

    fn find_containing_callable(&self, node: Node, file_path: &str, source: &str) -> Option<SymbolId> {
        let ancestor = ancestor_of_kind(
            node,
            &["function_declaration", "method_definition", "method_signature", "arrow_function", "function_expression"],
        )?;
        let kind = if ancestor_of_kind(ancestor, &["class_body", "interface_body"]).is_some() {
            if ancestor.kind() == "method_definition" && definition_name(ancestor, source) == Some("constructor") {
                semindex_core::SymbolKind::Constructor
            } else {
                semindex_core::SymbolKind::Method
            }
        } else {
            semindex_core::SymbolKind::Function
        };
        mint_for_ancestor(ancestor, file_path, kind, source)
    }

    fn extract_visibility(&self, node: Node, source: &str) -> Visibility {
        let _ = source;
        let exported = node
            .parent()
            .map(|p| p.kind() == "export_statement")
            .unwrap_or(false);
        if exported {
            Visibility::FileExport
        } else {
            Visibility::FilePrivate
        }
    }

    fn extract_generics(&self, node: Node, source: &str) -> Vec<SymbolName> {
        let mut generics = Vec::new();
        if let Some(params) = node.child_by_field_name("type_parameters") {
            let mut cursor = params.walk();
            for child in params.children(&mut cursor) {
                if child.kind() == "type_parameter" {
                    if let Some(name) = field_text(child, "name", source) {
                        generics.push(name.to_string());
                    }
                }
            }
        }
        generics
    }

    fn extract_return_type(&self, node: Node, source: &str) -> Option<SymbolName> {
        node.child_by_field_name("return_type").map(|n| text(n, source).trim_start_matches(':').trim().to_string())
    }

    fn extract_parameter_type(&self, node: Node, source: &str) -> Option<SymbolName> {
        node.child_by_field_name("type").map(|n| text(n, source).trim_start_matches(':').trim().to_string())
    }

    fn extract_default_value(&self, node: Node, source: &str) -> Option<String> {
        node.child_by_field_name("value").map(|n| text(n, source).to_string())
    }

    fn extract_type_annotation(&self, node: Node, source: &str) -> Option<SymbolName> {
        node.child_by_field_name("type").map(|n| text(n, source).trim_start_matches(':').trim().to_string())
    }

    fn extract_extends(&self, node: Node, source: &str) -> Vec<SymbolName> {
        self.extract_heritage(node, source)
    }

    fn extract_import_path(&self, node: Node, source: &str) -> Option<String> {
        field_text(node, "source", source).map(|s| s.trim_matches(|c| c == '\'' || c == '"').to_string())
    }

    fn extract_import_alias(&self, node: Node, source: &str) -> Option<String> {
        if node.kind() == "import_specifier" || node.kind() == "export_specifier" {
            field_text(node, "alias", source).map(str::to_string)
        } else {
            None
        }
    }

    fn is_async(&self, node: Node) -> bool {
        has_child_of_kind(node, "async")
    }

    fn is_wildcard_import(&self, node: Node) -> bool {
        has_child_of_kind(node, "namespace_import") || has_child_of_kind(node, "namespace_export")
    }

    fn is_associated_function(&self, node: Node) -> bool {
        has_child_of_kind(node, "static")
    }

    fn has_decorator(&self, node: Node, name: &str, source: &str) -> bool {
        let mut sibling = node.prev_sibling();
        while let Some(s) = sibling {
            if s.kind() == "decorator" {
                if text(s, source).trim_start_matches('@').starts_with(name) {
                    return true;
                }
                sibling = s.prev_sibling();
                continue;
            }
            break;
        }
        false
    }

    fn find_decorator_target(&self, node: Node, file_path: &str, source: &str) -> Option<SymbolId> {
        let mut target = node.next_sibling();
        while let Some(t) = target {
            match t.kind() {
                "decorator" => {
                    target = t.next_sibling();
                    continue;
                }
                "class_declaration" => {
                    return mint_for_ancestor(t, file_path, semindex_core::SymbolKind::Class, source);
                }
                "method_definition" => {
                    let name = definition_name(t, source)?;
                    if name == "constructor" {
                        return mint_for_ancestor(t, file_path, semindex_core::SymbolKind::Constructor, source);
                    }
                    return mint_for_ancestor(t, file_path, semindex_core::SymbolKind::Method, source);
                }
                "public_field_definition" | "field_definition" => {
                    return mint_for_ancestor(t, file_path, semindex_core::SymbolKind::Property, source);
                }
                _ => return None,
            }
        }
        None
    }
}

impl MetadataExtractors for JsHelpers {
    fn extract_type_from_annotation(&self, node: Node, source: &str) -> Option<SymbolName> {
        node.child_by_field_name("type").map(|n| text(n, source).to_string())
    }

    fn extract_call_receiver(&self, node: Node, source: &str) -> Option<String> {
        node.child_by_field_name("function")
            .and_then(|f| f.child_by_field_name("object"))
            .map(|n| text(n, source).to_string())
    }

    fn extract_property_chain(&self, node: Node, source: &str) -> Vec<String> {
        let mut chain = Vec::new();
        let mut current = Some(node);
        while let Some(n) = current {
            if n.kind() != "member_expression" {
                break;
            }
            if let Some(property) = n.child_by_field_name("property") {
                chain.push(text(property, source).to_string());
            }
            current = n.child_by_field_name("object");
        }
        chain.reverse();
        chain
    }

    fn extract_receiver_info(&self, node: Node, _source: &str) -> Option<ReceiverKind> {
        if node.kind() == "this" {
            Some(ReceiverKind::This)
        } else {
            None
        }
    }

    fn extract_assignment_parts(&self, node: Node, source: &str) -> Option<(String, String)> {
        let left = node.child_by_field_name("left")?;
        let right = node.child_by_field_name("right")?;
        Some((text(left, source).to_string(), text(right, source).to_string()))
    }

    fn extract_construct_target(&self, node: Node, source: &str) -> Option<SymbolName> {
        if node.kind() == "new_expression" {
            node.child_by_field_name("constructor").map(|n| text(n, source).to_string())
        } else {
            None
        }
    }

    fn extract_type_arguments(&self, node: Node, source: &str) -> Vec<SymbolName> {
        let mut args = Vec::new();
        if let Some(type_args) = node.child_by_field_name("type_arguments") {
            let mut cursor = type_args.walk();
            for child in type_args.children(&mut cursor) {
                if child.kind() == "type_identifier" {
                    args.push(text(child, source).to_string());
                }
            }
        }
        args
    }

    fn extract_is_optional_chain(&self, node: Node) -> bool {
        node.kind() == "optional_chain" || has_child_of_kind(node, "optional_chain")
    }

    fn is_method_call(&self, node: Node) -> bool {
        node.kind() == "call_expression"
            && node
                .child_by_field_name("function")
                .map(|f| f.kind() == "member_expression")
                .unwrap_or(false)
    }

    fn extract_call_name(&self, node: Node, source: &str) -> Option<String> {
        node.child_by_field_name("function").map(|n| text(n, source).to_string())
    }
}
