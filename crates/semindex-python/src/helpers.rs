//! AST-shape helpers and metadata extractors for `tree-sitter-python`.
//!
//! Python edge cases (spec.md §4.4): a class subclassing `Enum`/`IntEnum`/
//! `Flag`/`IntFlag` registers as an enum rather than a class, its body
//! assignments becoming enum members instead of properties; a class
//! subclassing `typing.Protocol` registers as an interface; `__init__`
//! becomes a constructor; `@staticmethod`/`@classmethod` both drop the
//! implicit receiver and so both read as `static_`; `@abstractmethod` sets
//! `abstract_`; name-mangled (`__x`) and single-underscore (`_x`) names are
//! not exported, everything else is (Python has no `export` keyword).

use semindex_core::adapter::{AstShapeHelpers, MetadataExtractors, ReceiverKind, Visibility};
use semindex_core::definition::SymbolName;
use semindex_core::SymbolId;
use tree_sitter::Node;

#[derive(Debug, Default)]
pub struct PythonHelpers;

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

fn mint_for_ancestor(ancestor: Node, file_path: &str, kind: semindex_core::SymbolKind, source: &str) -> Option<SymbolId> {
    let name = field_text(ancestor, "name", source)?;
    let location = semindex_core::node_to_location(&ancestor, file_path);
    Some(semindex_core::symbol(kind, name, &location))
}

/// A `decorated_definition`'s own `class_definition`/`function_definition`,
/// or `node` itself if it is not decorated.
fn inner_definition(node: Node) -> Node {
    if node.kind() == "decorated_definition" {
        node.child_by_field_name("definition").unwrap_or(node)
    } else {
        node
    }
}

/// The `class_definition`/`function_definition` a decorator sits above, for
/// `has_decorator`'s sibling walk.
fn decorated_parent(decorator: Node) -> Option<Node> {
    let wrapper = decorator.parent()?;
    if wrapper.kind() == "decorated_definition" {
        wrapper.child_by_field_name("definition")
    } else {
        None
    }
}

impl PythonHelpers {
    pub fn is_method_context(&self, node: Node) -> bool {
        ancestor_of_kind(node, &["class_definition"]).is_some()
    }

    pub fn is_dunder_init(&self, node: Node, source: &str) -> bool {
        field_text(inner_definition(node), "name", source) == Some("__init__")
    }

    fn superclass_names<'a>(&self, class_node: Node, source: &'a str) -> Vec<&'a str> {
        let mut names = Vec::new();
        let Some(superclasses) = inner_definition(class_node).child_by_field_name("superclasses") else {
            return names;
        };
        let mut cursor = superclasses.walk();
        for child in superclasses.named_children(&mut cursor) {
            match child.kind() {
                "identifier" => names.push(text(child, source)),
                "attribute" => {
                    if let Some(attr) = child.child_by_field_name("attribute") {
                        names.push(text(attr, source));
                    }
                }
                _ => {}
            }
        }
        names
    }

    pub fn is_enum_subclass(&self, class_node: Node, source: &str) -> bool {
        self.superclass_names(class_node, source)
            .iter()
            .any(|n| matches!(*n, "Enum" | "IntEnum" | "StrEnum" | "Flag" | "IntFlag"))
    }

    pub fn is_protocol_subclass(&self, class_node: Node, source: &str) -> bool {
        self.superclass_names(class_node, source).iter().any(|n| *n == "Protocol")
    }

    /// The first child of a `def`/`class` body that is a bare string literal
    /// statement (Python's docstring convention).
    pub fn leading_docstring(&self, definition_node: Node, source: &str) -> Option<String> {
        let body = inner_definition(definition_node).child_by_field_name("body")?;
        let first = body.named_child(0)?;
        if first.kind() != "expression_statement" {
            return None;
        }
        let expr = first.named_child(0)?;
        if expr.kind() != "string" {
            return None;
        }
        Some(text(expr, source).to_string())
    }

}

impl AstShapeHelpers for PythonHelpers {
    fn find_containing_class(&self, node: Node, file_path: &str, source: &str) -> Option<SymbolId> {
        let ancestor = ancestor_of_kind(node, &["class_definition"])?;
        if self.is_enum_subclass(ancestor, source) || self.is_protocol_subclass(ancestor, source) {
            return None;
        }
        mint_for_ancestor(ancestor, file_path, semindex_core::SymbolKind::Class, source)
    }

    fn find_containing_interface(&self, node: Node, file_path: &str, source: &str) -> Option<SymbolId> {
        let ancestor = ancestor_of_kind(node, &["class_definition"])?;
        if !self.is_protocol_subclass(ancestor, source) {
            return None;
        }
        mint_for_ancestor(ancestor, file_path, semindex_core::SymbolKind::Interface, source)
    }

    fn find_containing_enum(&self, node: Node, file_path: &str, source: &str) -> Option<SymbolId> {
        let ancestor = ancestor_of_kind(node, &["class_definition"])?;
        if !self.is_enum_subclass(ancestor, source) {
            return None;
        }
        mint_for_ancestor(ancestor, file_path, semindex_core::SymbolKind::Enum, source)
    }

    fn find_containing_callable(&self, node: Node, file_path: &str, source: &str) -> Option<SymbolId> {
        let ancestor = ancestor_of_kind(node, &["function_definition"])?;
        let kind = if ancestor_of_kind(ancestor, &["class_definition"]).is_some() {
            if self.is_dunder_init(ancestor, source) {
                semindex_core::SymbolKind::Constructor
            } else {
                semindex_core::SymbolKind::Method
            }
        } else {
            semindex_core::SymbolKind::Function
        };
        mint_for_ancestor(inner_definition(ancestor), file_path, kind, source)
    }

    fn extract_visibility(&self, node: Node, source: &str) -> Visibility {
        let Some(name) = field_text(inner_definition(node), "name", source) else {
            return Visibility::FileExport;
        };
        if name.starts_with("__") && !name.ends_with("__") {
            Visibility::Private
        } else if name.starts_with('_') {
            Visibility::FilePrivate
        } else {
            Visibility::FileExport
        }
    }

    fn extract_generics(&self, node: Node, source: &str) -> Vec<SymbolName> {
        let Some(params) = inner_definition(node).child_by_field_name("type_parameters") else {
            return Vec::new();
        };
        let mut cursor = params.walk();
        params
            .named_children(&mut cursor)
            .map(|child| text(child, source).to_string())
            .collect()
    }

    fn extract_return_type(&self, node: Node, source: &str) -> Option<SymbolName> {
        field_text(inner_definition(node), "return_type", source).map(str::to_string)
    }

    fn extract_parameter_type(&self, node: Node, source: &str) -> Option<SymbolName> {
        field_text(node, "type", source).map(str::to_string)
    }

    fn extract_default_value(&self, node: Node, source: &str) -> Option<String> {
        field_text(node, "value", source).map(str::to_string)
    }

    fn extract_type_annotation(&self, node: Node, source: &str) -> Option<SymbolName> {
        field_text(node, "type", source).map(str::to_string)
    }

    fn extract_extends(&self, node: Node, source: &str) -> Vec<SymbolName> {
        self.superclass_names(node, source).into_iter().map(str::to_string).collect()
    }

    fn extract_import_path(&self, node: Node, source: &str) -> Option<String> {
        field_text(node, "module_name", source).map(str::to_string)
    }

    fn extract_import_alias(&self, node: Node, source: &str) -> Option<String> {
        if node.kind() == "aliased_import" {
            field_text(node, "alias", source).map(str::to_string)
        } else {
            None
        }
    }

    fn is_async(&self, node: Node) -> bool {
        let mut cursor = inner_definition(node).walk();
        inner_definition(node).children(&mut cursor).any(|c| c.kind() == "async")
    }

    fn is_wildcard_import(&self, node: Node) -> bool {
        node.kind() == "wildcard_import"
    }

    fn has_decorator(&self, node: Node, name: &str, source: &str) -> bool {
        let target = inner_definition(node);
        let Some(wrapper) = target.parent() else {
            return false;
        };
        if wrapper.kind() != "decorated_definition" {
            return false;
        }
        let mut cursor = wrapper.walk();
        wrapper.children(&mut cursor).any(|c| {
            c.kind() == "decorator"
                && c.named_child(0)
                    .map(|inner| text(inner, source).trim_start_matches('@') == name)
                    .unwrap_or(false)
        })
    }

    fn find_decorator_target(&self, node: Node, file_path: &str, source: &str) -> Option<SymbolId> {
        let target = decorated_parent(node)?;
        let kind = match target.kind() {
            "class_definition" => {
                if self.is_enum_subclass(target, source) {
                    semindex_core::SymbolKind::Enum
                } else if self.is_protocol_subclass(target, source) {
                    semindex_core::SymbolKind::Interface
                } else {
                    semindex_core::SymbolKind::Class
                }
            }
            "function_definition" => {
                if ancestor_of_kind(target, &["class_definition"]).is_some() {
                    if self.is_dunder_init(target, source) {
                        semindex_core::SymbolKind::Constructor
                    } else {
                        semindex_core::SymbolKind::Method
                    }
                } else {
                    semindex_core::SymbolKind::Function
                }
            }
            _ => return None,
        };
        mint_for_ancestor(target, file_path, kind, source)
    }
}

impl MetadataExtractors for PythonHelpers {
    fn extract_type_from_annotation(&self, node: Node, source: &str) -> Option<SymbolName> {
        field_text(node, "type", source).map(str::to_string)
    }

    fn extract_call_receiver(&self, node: Node, source: &str) -> Option<String> {
        node.child_by_field_name("function")
            .filter(|f| f.kind() == "attribute")
            .and_then(|f| f.child_by_field_name("object"))
            .map(|n| text(n, source).to_string())
    }

    fn extract_property_chain(&self, node: Node, source: &str) -> Vec<String> {
        let mut chain = Vec::new();
        let mut current = Some(node);
        while let Some(n) = current {
            if n.kind() != "attribute" {
                break;
            }
            if let Some(attr) = n.child_by_field_name("attribute") {
                chain.push(text(attr, source).to_string());
            }
            current = n.child_by_field_name("object");
        }
        chain.reverse();
        chain
    }

    fn extract_receiver_info(&self, node: Node, source: &str) -> Option<ReceiverKind> {
        if node.kind() != "identifier" {
            return None;
        }
        match text(node, source) {
            "self" => Some(ReceiverKind::SelfValue),
            "cls" => Some(ReceiverKind::Cls),
            _ => None,
        }
    }

    fn extract_assignment_parts(&self, node: Node, source: &str) -> Option<(String, String)> {
        let left = node.child_by_field_name("left")?;
        let right = node.child_by_field_name("right")?;
        Some((text(left, source).to_string(), text(right, source).to_string()))
    }

    fn extract_construct_target(&self, node: Node, source: &str) -> Option<SymbolName> {
        if node.kind() == "call" {
            node.child_by_field_name("function").map(|n| text(n, source).to_string())
        } else {
            None
        }
    }

    fn extract_type_arguments(&self, node: Node, source: &str) -> Vec<SymbolName> {
        let Some(subscript) = node.child_by_field_name("subscript") else {
            return Vec::new();
        };
        let mut cursor = subscript.walk();
        subscript
            .named_children(&mut cursor)
            .map(|c| text(c, source).to_string())
            .collect()
    }

    fn extract_is_optional_chain(&self, _node: Node) -> bool {
        false
    }

    fn is_method_call(&self, node: Node) -> bool {
        node.kind() == "call"
            && node
                .child_by_field_name("function")
                .map(|f| f.kind() == "attribute")
                .unwrap_or(false)
    }

    fn extract_call_name(&self, node: Node, source: &str) -> Option<String> {
        node.child_by_field_name("function").map(|n| text(n, source).to_string())
    }
}
