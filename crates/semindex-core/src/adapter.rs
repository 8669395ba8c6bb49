//! Language Adapter: the per-language bundle of capture dispatch, AST-shape
//! helpers, and metadata extractors.
//!
//! A `LanguageAdapter` is the single seam where grammar-specific knowledge
//! enters the pipeline. Everything upstream (captures, locations) and
//! downstream (the Definition model, the Builder) is language-neutral; this
//! module defines the shape every per-language crate (`semindex-js`,
//! `semindex-python`, `semindex-rust`) implements, not the implementations
//! themselves.

use crate::builder::DefinitionBuilder;
use crate::definition::SymbolName;
use crate::error::IndexError;
use crate::identifier::SymbolId;
use crate::location::Location;
use crate::scope::{ScopeId, ScopeTree};
use std::collections::HashMap;
use tree_sitter::Node;

/// A `(name, node, text, location)` tuple produced by running a language
/// adapter's S-expression queries against a parsed file.
pub struct Capture<'tree> {
    pub name: String,
    pub node: Node<'tree>,
    pub text: String,
    pub location: Location,
}

/// Read-only context threaded through every handler invocation.
pub struct ProcessingContext<'a> {
    pub scopes: &'a ScopeTree,
    pub file_path: &'a str,
    pub root_scope_id: ScopeId,
    /// The full source text of the file being indexed. `tree_sitter::Node`
    /// holds only byte ranges into this buffer, never owns text itself, so
    /// every AST-shape helper that needs to read an identifier takes this
    /// alongside the node.
    pub source: &'a str,
}

/// The category named by a capture's first dot-delimited segment. Scope
/// captures never reach a dispatch table -- the Indexer consumes them while
/// building the `ScopeTree`, before Pass A begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureCategory {
    Definition,
    Import,
    Scope,
}

/// A capture name split into its dot-delimited segments: `category.entity`,
/// with any further segments kept as modifiers (e.g. `async`, `generic`,
/// `alias`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCaptureName<'a> {
    pub category: CaptureCategory,
    pub entity: &'a str,
    pub modifiers: Vec<&'a str>,
}

/// Split a capture name into category/entity/modifiers, rejecting anything
/// whose category segment is not one of the enumerated values. This is the
/// only source of `IndexError::MalformedCapture`.
pub fn parse_capture_name(name: &str) -> Result<ParsedCaptureName<'_>, IndexError> {
    let mut segments = name.split('.');
    let category = match segments.next() {
        Some("definition") => CaptureCategory::Definition,
        Some("import") => CaptureCategory::Import,
        Some("scope") => CaptureCategory::Scope,
        _ => return Err(IndexError::MalformedCapture(name.to_string())),
    };
    let entity = segments
        .next()
        .ok_or_else(|| IndexError::MalformedCapture(name.to_string()))?;
    Ok(ParsedCaptureName {
        category,
        entity,
        modifiers: segments.collect(),
    })
}

/// Which of the Indexer's two passes a capture's entity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapturePass {
    /// Aggregate-creating: class, interface, enum, namespace, function,
    /// variable, import, type_alias.
    Aggregate,
    /// Parent-attaching or decorator: method, constructor, property,
    /// parameter, enum_member, decorator, field.
    Child,
    /// Exists only to constrain the grammar query; the handler is an
    /// explicit no-op. Dispatched in Pass A, since order never matters for
    /// a handler that does nothing.
    NoOp,
}

const AGGREGATE_ENTITIES: &[&str] = &[
    "class",
    "interface",
    "enum",
    "namespace",
    "function",
    "variable",
    "import",
    "type_alias",
];

const CHILD_ENTITIES: &[&str] = &[
    "method",
    "constructor",
    "property",
    "parameter",
    "enum_member",
    "decorator",
    "field",
];

/// Classify an entity segment (the second component of a capture name) into
/// the pass it belongs to. Shared across every language adapter -- the
/// aggregate/child split is a property of the Definition model, not of any
/// one grammar.
pub fn classify_entity(entity: &str) -> CapturePass {
    if AGGREGATE_ENTITIES.contains(&entity) {
        CapturePass::Aggregate
    } else if CHILD_ENTITIES.contains(&entity) {
        CapturePass::Child
    } else {
        CapturePass::NoOp
    }
}

/// A handler reacts to one capture by mutating the builder. Handlers are
/// side-effecting only on the builder, never on each other, and MUST be
/// idempotent with respect to receiving the same capture twice.
pub trait Handler {
    fn handle(&self, capture: &Capture, builder: &mut DefinitionBuilder, context: &ProcessingContext);
}

impl<F> Handler for F
where
    F: Fn(&Capture, &mut DefinitionBuilder, &ProcessingContext),
{
    fn handle(&self, capture: &Capture, builder: &mut DefinitionBuilder, context: &ProcessingContext) {
        self(capture, builder, context)
    }
}

pub type DispatchTable = HashMap<&'static str, Box<dyn Handler>>;

/// Coarse visibility/export vocabulary shared by every language; each
/// adapter maps its grammar's modifiers onto this set and then decides, per
/// its own export rule (§I6), which variants set `is_exported`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    Private,
    FilePrivate,
    PackageInternal,
    FileExport,
}

/// Which implicit receiver a member-access node uses, as recognised by
/// `extract_receiver_info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverKind {
    This,
    SelfValue,
    Super,
    Cls,
}

/// Per-language AST-shape lookups. Every method walks the grammar's parent
/// chain or sibling structure and returns a language-neutral identifier;
/// none of them mutate the tree or hold state across calls.
pub trait AstShapeHelpers {
    fn find_containing_class(&self, node: Node, file_path: &str, source: &str) -> Option<SymbolId>;
    fn find_containing_interface(&self, node: Node, file_path: &str, source: &str)
        -> Option<SymbolId>;
    fn find_containing_enum(&self, node: Node, file_path: &str, source: &str) -> Option<SymbolId>;
    fn find_containing_callable(&self, node: Node, file_path: &str, source: &str)
        -> Option<SymbolId>;

    /// Rust-specific: an `impl` block owns no definition of its own, so this
    /// returns the *name* of the struct/trait it implements, to be resolved
    /// against the builder via `find_class_by_name`/`find_interface_by_name`.
    fn find_containing_impl(&self, node: Node, source: &str) -> Option<String> {
        let _ = (node, source);
        None
    }

    fn extract_visibility(&self, node: Node, source: &str) -> Visibility;
    fn extract_generics(&self, node: Node, source: &str) -> Vec<SymbolName>;
    fn extract_return_type(&self, node: Node, source: &str) -> Option<SymbolName>;
    fn extract_parameter_type(&self, node: Node, source: &str) -> Option<SymbolName>;
    fn extract_default_value(&self, node: Node, source: &str) -> Option<String>;
    fn extract_type_annotation(&self, node: Node, source: &str) -> Option<SymbolName>;
    fn extract_extends(&self, node: Node, source: &str) -> Vec<SymbolName>;
    fn extract_import_path(&self, node: Node, source: &str) -> Option<String>;
    fn extract_import_alias(&self, node: Node, source: &str) -> Option<String>;
    fn is_async(&self, node: Node) -> bool;
    fn is_wildcard_import(&self, node: Node) -> bool;

    /// Rust-specific: true when a function inside an `impl` takes no `self`
    /// receiver (an associated function rather than a method).
    fn is_associated_function(&self, node: Node) -> bool {
        let _ = node;
        false
    }

    /// Python-specific: true when `node` carries a decorator named `name`.
    fn has_decorator(&self, node: Node, name: &str, source: &str) -> bool {
        let _ = (node, name, source);
        false
    }

    fn find_decorator_target(&self, node: Node, file_path: &str, source: &str) -> Option<SymbolId>;

    /// The name to associate with a scope-delimiter capture, used by
    /// `ScopeTree::child_scope_with_name`/`body_scope_for`. A scope capture
    /// typically lands on a definition's *body* node (the grammar rule is
    /// `(function_item body: (block) @scope.function)`), so the name lives
    /// on the body's parent, not the body itself. The default walks up to
    /// the nearest ancestor exposing a `name` field; grammars whose scope
    /// node already names its own construct (or whose name field is called
    /// something else) override this.
    fn scope_name_for(&self, scope_node: Node, source: &str) -> Option<String> {
        let mut current = Some(scope_node);
        while let Some(n) = current {
            if let Some(name_node) = n.child_by_field_name("name") {
                return name_node.utf8_text(source.as_bytes()).ok().map(str::to_string);
            }
            current = n.parent();
        }
        None
    }
}

/// Uniform per-language interface consumed by the (external) reference
/// extraction pipeline. None of these operations are exercised by the
/// definition-extraction core itself; every method returns `None`/`false`/
/// empty rather than panicking when the AST does not match the expected
/// shape.
pub trait MetadataExtractors {
    fn extract_type_from_annotation(&self, node: Node, source: &str) -> Option<SymbolName>;
    fn extract_call_receiver(&self, node: Node, source: &str) -> Option<String>;
    fn extract_property_chain(&self, node: Node, source: &str) -> Vec<String>;
    fn extract_receiver_info(&self, node: Node, source: &str) -> Option<ReceiverKind>;
    fn extract_assignment_parts(&self, node: Node, source: &str) -> Option<(String, String)>;
    fn extract_construct_target(&self, node: Node, source: &str) -> Option<SymbolName>;
    fn extract_type_arguments(&self, node: Node, source: &str) -> Vec<SymbolName>;
    fn extract_is_optional_chain(&self, node: Node) -> bool;
    fn is_method_call(&self, node: Node) -> bool;
    fn extract_call_name(&self, node: Node, source: &str) -> Option<String>;
}

/// The full per-language bundle: `{ dispatch, helpers, metadata_extractors }`.
pub trait LanguageAdapter {
    fn dispatch_table(&self) -> &DispatchTable;
    fn helpers(&self) -> &dyn AstShapeHelpers;
    fn metadata_extractors(&self) -> &dyn MetadataExtractors;

    /// Which pass a claimed capture belongs to. Returns `MalformedCapture`
    /// only for a name this adapter's dispatch table *does* contain but
    /// whose category/entity segments are unparseable -- a query/dispatch
    /// mismatch, not a property of the source file.
    fn pass_of(&self, capture_name: &str) -> Result<CapturePass, IndexError> {
        parse_capture_name(capture_name).map(|parsed| classify_entity(parsed.entity))
    }

    /// Route one capture to its handler. A capture absent from the dispatch
    /// table is silently ignored -- "captures the adapter does not claim are
    /// not its concern."
    fn dispatch(
        &self,
        capture: &Capture,
        builder: &mut DefinitionBuilder,
        context: &ProcessingContext,
    ) {
        if let Some(handler) = self.dispatch_table().get(capture.name.as_str()) {
            handler.handle(capture, builder, context);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_capture_name_splits_category_entity_modifiers() {
        let parsed = parse_capture_name("definition.method.async").unwrap();
        assert_eq!(parsed.category, CaptureCategory::Definition);
        assert_eq!(parsed.entity, "method");
        assert_eq!(parsed.modifiers, vec!["async"]);
    }

    #[test]
    fn parse_capture_name_rejects_unknown_category() {
        let err = parse_capture_name("reference.call").unwrap_err();
        assert!(matches!(err, IndexError::MalformedCapture(_)));
    }

    #[test]
    fn classify_entity_splits_aggregate_from_child() {
        assert_eq!(classify_entity("class"), CapturePass::Aggregate);
        assert_eq!(classify_entity("method"), CapturePass::Child);
        assert_eq!(classify_entity("body"), CapturePass::NoOp);
    }

    #[test]
    fn pass_of_is_malformed_for_unparseable_claimed_capture() {
        assert!(matches!(
            parse_capture_name("bogus.entity"),
            Err(IndexError::MalformedCapture(_))
        ));
    }
}
