//! AST-shape helpers and metadata extractors for the `tree-sitter-rust`
//! grammar.
//!
//! Rust's definition-extraction edge cases (spec.md §4.4): `struct`/tuple
//! struct -> `class`, `trait` -> `interface`, `enum` -> `enum`. `impl`
//! blocks mint no definition of their own -- `find_containing_impl` returns
//! the implemented type's *name*, to be resolved against the Builder by
//! name (`find_class_by_name`/`find_interface_by_name`), since the `impl`
//! header names its target textually, not by `SymbolId`.

use semindex_core::adapter::{AstShapeHelpers, MetadataExtractors, ReceiverKind, Visibility};
use semindex_core::{SymbolId, SymbolName};
use tree_sitter::Node;

#[derive(Debug, Default)]
pub struct RustHelpers;

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

/// Mint the `SymbolId` that the aggregate-creating handler would have
/// minted for `ancestor`'s name node -- used to resolve a containing
/// struct/trait/enum/function by re-deriving its id from source, since
/// helpers never hold a reference to the Builder.
fn mint_for_ancestor(ancestor: Node, file_path: &str, kind: semindex_core::SymbolKind, source: &str) -> Option<SymbolId> {
    let name = field_text(ancestor, "name", source)?;
    let location = semindex_core::node_to_location(&ancestor, file_path);
    Some(semindex_core::symbol(kind, name, &location))
}

impl RustHelpers {
    /// True when `node` (a `function_item`) sits directly inside an
    /// `impl`/`trait` body and is therefore a method, not a free function.
    pub fn is_method_context(&self, node: Node) -> bool {
        ancestor_of_kind(node, &["impl_item", "trait_item"]).is_some()
    }

    /// The name of the type an `impl` block targets, read from its `type`
    /// field. Covers both `impl Type { ... }` and `impl Trait for Type`
    /// (the `type` field always names the implementing type, never the
    /// trait, in tree-sitter-rust's grammar).
    pub fn impl_target_name<'a>(&self, impl_node: Node, source: &'a str) -> Option<&'a str> {
        let ty = impl_node.child_by_field_name("type")?;
        // `type` may itself be a `generic_type` wrapping a `type_identifier`;
        // walk down to the identifier so `impl P<T> { .. }` still resolves
        // to bare `P`.
        let mut cursor = ty;
        loop {
            if cursor.kind() == "type_identifier" {
                return cursor.utf8_text(source.as_bytes()).ok();
            }
            match cursor.child_by_field_name("type") {
                Some(inner) => cursor = inner,
                None => return cursor.utf8_text(source.as_bytes()).ok(),
            }
        }
    }

    /// True for a `trait Name for Type` impl (as opposed to an inherent
    /// `impl Type`).
    pub fn is_trait_impl(&self, impl_node: Node) -> bool {
        impl_node.child_by_field_name("trait").is_some()
    }
}

impl AstShapeHelpers for RustHelpers {
    fn find_containing_class(&self, node: Node, file_path: &str, source: &str) -> Option<SymbolId> {
        let ancestor = ancestor_of_kind(node, &["struct_item"])?;
        mint_for_ancestor(ancestor, file_path, semindex_core::SymbolKind::Class, source)
    }

    fn find_containing_interface(&self, node: Node, file_path: &str, source: &str) -> Option<SymbolId> {
        let ancestor = ancestor_of_kind(node, &["trait_item"])?;
        mint_for_ancestor(ancestor, file_path, semindex_core::SymbolKind::Interface, source)
    }

    fn find_containing_enum(&self, node: Node, file_path: &str, source: &str) -> Option<SymbolId> {
        let ancestor = ancestor_of_kind(node, &["enum_item"])?;
        mint_for_ancestor(ancestor, file_path, semindex_core::SymbolKind::Enum, source)
    }

    fn find_containing_callable(&self, node: Node, file_path: &str, source: &str) -> Option<SymbolId> {
        let ancestor = ancestor_of_kind(node, &["function_item", "function_signature_item"])?;
        let kind = if self.is_method_context(ancestor) {
            semindex_core::SymbolKind::Method
        } else {
            semindex_core::SymbolKind::Function
        };
        mint_for_ancestor(ancestor, file_path, kind, source)
    }

    fn find_containing_impl(&self, node: Node, source: &str) -> Option<String> {
        let impl_node = ancestor_of_kind(node, &["impl_item"])?;
        self.impl_target_name(impl_node, source).map(str::to_string)
    }

    fn extract_visibility(&self, node: Node, source: &str) -> Visibility {
        match node.child_by_field_name("visibility_modifier") {
            None => Visibility::FilePrivate,
            Some(modifier) => {
                let raw = text(modifier, source);
                if raw == "pub" {
                    Visibility::FileExport
                } else if raw.contains("crate") {
                    Visibility::PackageInternal
                } else if raw.contains("super") || raw.contains("self") {
                    // pub(super)/pub(self) -- modelled as file-private per
                    // spec.md §4.4 (no parent-module visibility variant
                    // exists in the shared `Visibility` vocabulary).
                    Visibility::FilePrivate
                } else {
                    Visibility::PackageInternal
                }
            }
        }
    }

    fn extract_generics(&self, node: Node, source: &str) -> Vec<SymbolName> {
        let mut generics = Vec::new();
        if let Some(params) = node.child_by_field_name("type_parameters") {
            let mut cursor = params.walk();
            for child in params.children(&mut cursor) {
                if child.kind() == "type_identifier" || child.kind() == "lifetime" {
                    generics.push(text(child, source).to_string());
                }
            }
        }
        generics
    }

    fn extract_return_type(&self, node: Node, source: &str) -> Option<SymbolName> {
        node.child_by_field_name("return_type").map(|n| text(n, source).to_string())
    }

    fn extract_parameter_type(&self, node: Node, source: &str) -> Option<SymbolName> {
        node.child_by_field_name("type").map(|n| text(n, source).to_string())
    }

    fn extract_default_value(&self, _node: Node, _source: &str) -> Option<String> {
        // Rust function parameters carry no default-value syntax.
        None
    }

    fn extract_type_annotation(&self, node: Node, source: &str) -> Option<SymbolName> {
        node.child_by_field_name("type").map(|n| text(n, source).to_string())
    }

    fn extract_extends(&self, node: Node, source: &str) -> Vec<SymbolName> {
        let mut bounds = Vec::new();
        if let Some(trait_bounds) = node.child_by_field_name("bounds") {
            let mut cursor = trait_bounds.walk();
            for child in trait_bounds.children(&mut cursor) {
                if child.kind() == "type_identifier" {
                    bounds.push(text(child, source).to_string());
                }
            }
        }
        bounds
    }

    fn extract_import_path(&self, node: Node, source: &str) -> Option<String> {
        let clause = node.child_by_field_name("argument").unwrap_or(node);
        Some(text(clause, source).to_string())
    }

    fn extract_import_alias(&self, node: Node, source: &str) -> Option<String> {
        if node.kind() == "use_as_clause" {
            node.child_by_field_name("alias").map(|n| text(n, source).to_string())
        } else {
            None
        }
    }

    fn is_async(&self, node: Node) -> bool {
        let mut cursor = node.walk();
        node.children(&mut cursor).any(|c| c.kind() == "async")
    }

    fn is_wildcard_import(&self, node: Node) -> bool {
        let mut cursor = node.walk();
        node.children(&mut cursor).any(|c| c.kind() == "use_wildcard")
    }

    fn is_associated_function(&self, node: Node) -> bool {
        match node.child_by_field_name("parameters") {
            Some(params) => {
                let mut cursor = params.walk();
                !params.children(&mut cursor).any(|c| c.kind() == "self_parameter")
            }
            None => true,
        }
    }

    fn find_decorator_target(&self, _node: Node, _file_path: &str, _source: &str) -> Option<SymbolId> {
        // Rust attributes (`#[derive(..)]`) are not modelled as decorators;
        // this adapter's query file emits no decorator captures.
        None
    }
}

impl MetadataExtractors for RustHelpers {
    fn extract_type_from_annotation(&self, node: Node, source: &str) -> Option<SymbolName> {
        node.child_by_field_name("type").map(|n| text(n, source).to_string())
    }

    fn extract_call_receiver(&self, node: Node, source: &str) -> Option<String> {
        node.child_by_field_name("receiver").map(|n| text(n, source).to_string())
    }

    fn extract_property_chain(&self, node: Node, source: &str) -> Vec<String> {
        let mut chain = Vec::new();
        let mut current = Some(node);
        while let Some(n) = current {
            if n.kind() != "field_expression" {
                break;
            }
            if let Some(field) = n.child_by_field_name("field") {
                chain.push(text(field, source).to_string());
            }
            current = n.child_by_field_name("value");
        }
        chain.reverse();
        chain
    }

    fn extract_receiver_info(&self, node: Node, _source: &str) -> Option<ReceiverKind> {
        if node.kind() == "self" {
            Some(ReceiverKind::SelfValue)
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
        if node.kind() == "struct_expression" {
            node.child_by_field_name("name").map(|n| text(n, source).to_string())
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
        node.kind() == "try_expression"
    }

    fn is_method_call(&self, node: Node) -> bool {
        node.kind() == "call_expression"
            && node
                .child_by_field_name("function")
                .map(|f| f.kind() == "field_expression")
                .unwrap_or(false)
    }

    fn extract_call_name(&self, node: Node, source: &str) -> Option<String> {
        node.child_by_field_name("function").map(|n| text(n, source).to_string())
    }
}
